//! Navigable document structure.
//!
//! A [`TypedStructure`] owns the flat element list of one parsed document
//! together with the document's [`RevealType`]. Hierarchy is never stored:
//! parent, children, depth and path are inferred from inclusive line ranges
//! whenever they are asked for, through [`TypedElement`] handles.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use reveal_core::schema::{EntityDef, RevealType};
//! use reveal_core::structure::{Element, TypedStructure};
//!
//! let python = RevealType::builder("python")
//!     .extension(".py")
//!     .entity("class", EntityDef::new().contains(["function"]))
//!     .entity("function", EntityDef::new())
//!     .build()
//!     .unwrap();
//!
//! let structure = TypedStructure::new(
//!     "app.py",
//!     Arc::new(python),
//!     vec![
//!         Element::new("MyClass", 10, 50, "class"),
//!         Element::new("process", 15, 25, "function"),
//!     ],
//! );
//!
//! let process = structure.get("MyClass.process").unwrap();
//! assert_eq!(process.depth(), 1);
//! assert_eq!(structure.find_by_line(20), Some(process));
//! ```

mod element;
mod query;

pub use element::{Element, TypedElement, Walk};
pub use query::{ElementQuery, Find};

use std::cmp::Reverse;
use std::collections::BTreeSet;
use std::fmt;
use std::ops::{Div, Range};
use std::sync::Arc;

use crate::config::PATH_SEPARATOR;
use crate::schema::RevealType;

/// The full element list of one document plus its schema.
///
/// Read-only after construction.
#[derive(Debug, Clone)]
pub struct TypedStructure {
    path: String,
    reveal_type: Arc<RevealType>,
    elements: Vec<Element>,
}

impl TypedStructure {
    pub fn new(
        path: impl Into<String>,
        reveal_type: Arc<RevealType>,
        elements: impl IntoIterator<Item = Element>,
    ) -> Self {
        let structure = Self {
            path: path.into(),
            reveal_type,
            elements: elements.into_iter().collect(),
        };
        structure.report_anomalies();
        structure
    }

    fn report_anomalies(&self) {
        let mut unknown = BTreeSet::new();
        for el in &self.elements {
            if el.is_inverted() {
                tracing::warn!(
                    path = %self.path,
                    element = %el.name,
                    line = el.line,
                    line_end = el.line_end,
                    "element has an inverted line range"
                );
            }
            if !self.reveal_type.has_entity(&el.category) {
                unknown.insert(el.category.as_str());
            }
        }
        for category in unknown {
            tracing::warn!(
                path = %self.path,
                schema = self.reveal_type.name(),
                category,
                "category is not an entity kind of the schema"
            );
        }
        tracing::debug!(
            path = %self.path,
            schema = self.reveal_type.name(),
            elements = self.elements.len(),
            "built typed structure"
        );
    }

    /// Document identifier.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn reveal_type(&self) -> &RevealType {
        &self.reveal_type
    }

    /// Shared handle to the schema.
    pub fn reveal_type_arc(&self) -> Arc<RevealType> {
        Arc::clone(&self.reveal_type)
    }

    /// Raw records in document order.
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// Total number of elements at every level.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn element(&self, index: usize) -> Option<TypedElement<'_>> {
        (index < self.elements.len()).then(|| TypedElement::new(self, index))
    }

    /// Handles for every element, in document order.
    pub fn iter(&self) -> Elements<'_> {
        Elements {
            structure: self,
            range: 0..self.elements.len(),
        }
    }

    /// Elements without a parent.
    pub fn roots(&self) -> Vec<TypedElement<'_>> {
        self.iter().filter(TypedElement::is_root).collect()
    }

    /// Root element with the given name.
    pub fn child(&self, name: &str) -> Option<TypedElement<'_>> {
        self.iter().find(|el| el.name() == name && el.is_root())
    }

    /// Resolve a dotted path (`"MyClass.process"`) one segment at a time.
    pub fn get(&self, path: &str) -> Option<TypedElement<'_>> {
        let mut segments = path.split(PATH_SEPARATOR);
        let first = self.child(segments.next()?)?;
        segments.try_fold(first, |el, name| el.child(name))
    }

    /// Elements whose category equals `category` exactly.
    pub fn of_category(&self, category: &str) -> Vec<TypedElement<'_>> {
        self.find(ElementQuery::category(category)).collect()
    }

    pub fn functions(&self) -> Vec<TypedElement<'_>> {
        self.of_category("function")
    }

    pub fn methods(&self) -> Vec<TypedElement<'_>> {
        self.of_category("method")
    }

    pub fn classes(&self) -> Vec<TypedElement<'_>> {
        self.of_category("class")
    }

    pub fn imports(&self) -> Vec<TypedElement<'_>> {
        self.of_category("import")
    }

    pub fn headings(&self) -> Vec<TypedElement<'_>> {
        self.of_category("heading")
    }

    pub fn sections(&self) -> Vec<TypedElement<'_>> {
        self.of_category("section")
    }

    /// Lazily filter every element (not only roots).
    pub fn find<'s, 'q>(&'s self, query: ElementQuery<'q>) -> Find<'s, 'q> {
        Find::new(self.iter(), query)
    }

    /// The innermost element whose range covers `line`.
    pub fn find_by_line(&self, line: u32) -> Option<TypedElement<'_>> {
        self.iter()
            .filter(|el| el.data().covers_line(line))
            .min_by_key(|el| (el.line_count(), Reverse(el.index())))
    }

    /// Parent/child pairs the schema does not declare as allowed.
    ///
    /// Range nesting is never rejected; this only reports it for rule
    /// engines and linters.
    pub fn schema_violations(&self) -> Vec<ContainmentViolation<'_>> {
        self.iter()
            .filter_map(|child| {
                let parent = child.parent()?;
                (!self
                    .reveal_type
                    .can_contain(parent.category(), child.category()))
                .then_some(ContainmentViolation { parent, child })
            })
            .collect()
    }
}

/// `&structure / "name"` looks up a root element by name.
impl<'s> Div<&str> for &'s TypedStructure {
    type Output = Option<TypedElement<'s>>;

    fn div(self, name: &str) -> Self::Output {
        self.child(name)
    }
}

impl<'s> IntoIterator for &'s TypedStructure {
    type Item = TypedElement<'s>;
    type IntoIter = Elements<'s>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the handles of a structure, in document order.
#[derive(Debug, Clone)]
pub struct Elements<'s> {
    structure: &'s TypedStructure,
    range: Range<usize>,
}

impl<'s> Iterator for Elements<'s> {
    type Item = TypedElement<'s>;

    fn next(&mut self) -> Option<Self::Item> {
        self.range
            .next()
            .map(|index| TypedElement::new(self.structure, index))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.range.size_hint()
    }
}

impl DoubleEndedIterator for Elements<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.range
            .next_back()
            .map(|index| TypedElement::new(self.structure, index))
    }
}

impl ExactSizeIterator for Elements<'_> {}

/// A parent/child pair whose kinds the schema does not allow together.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContainmentViolation<'s> {
    pub parent: TypedElement<'s>,
    pub child: TypedElement<'s>,
}

impl fmt::Display for ContainmentViolation<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} '{}' (line {}) may not contain {} '{}' (line {})",
            self.parent.category(),
            self.parent.name(),
            self.parent.line(),
            self.child.category(),
            self.child.name(),
            self.child.line()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::EntityDef;

    fn schema() -> Arc<RevealType> {
        Arc::new(
            RevealType::builder("test")
                .entity("class", EntityDef::new().contains(["function"]))
                .entity("function", EntityDef::new())
                .build()
                .unwrap(),
        )
    }

    #[test]
    fn test_element_out_of_bounds() {
        let s = TypedStructure::new("t", schema(), vec![Element::new("a", 1, 2, "function")]);
        assert!(s.element(0).is_some());
        assert!(s.element(1).is_none());
    }

    #[test]
    fn test_full_range_element_is_outermost() {
        let s = TypedStructure::new(
            "t",
            schema(),
            vec![
                Element::new("file", 0, u32::MAX, "class"),
                Element::new("f", 3, 8, "function"),
            ],
        );
        assert_eq!(s.find_by_line(5).unwrap().name(), "f");
        assert_eq!(s.find_by_line(9).unwrap().name(), "file");
        assert_eq!(s.element(1).unwrap().parent().unwrap().name(), "file");
        assert_eq!(s.roots().len(), 1);
    }

    #[test]
    fn test_identical_ranges_do_not_cycle() {
        let s = TypedStructure::new(
            "t",
            schema(),
            vec![
                Element::new("first", 1, 10, "class"),
                Element::new("second", 1, 10, "class"),
            ],
        );
        let first = s.element(0).unwrap();
        let second = s.element(1).unwrap();

        assert!(first.contains(&second));
        assert!(!second.contains(&first));
        assert_eq!(second.parent(), Some(first));
        assert_eq!(second.depth(), 1);
        assert_eq!(s.roots(), vec![first]);
    }

    #[test]
    fn test_schema_violations() {
        let s = TypedStructure::new(
            "t",
            schema(),
            vec![
                Element::new("Outer", 1, 50, "class"),
                Element::new("helper", 2, 40, "function"),
                Element::new("Inner", 5, 10, "class"),
            ],
        );

        let violations = s.schema_violations();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].parent.name(), "helper");
        assert_eq!(violations[0].child.name(), "Inner");
        assert!(violations[0].to_string().contains("may not contain"));
    }

    #[test]
    fn test_elements_iterator_is_exact() {
        let s = TypedStructure::new(
            "t",
            schema(),
            vec![Element::new("a", 1, 2, "function"), Element::new("b", 3, 4, "function")],
        );
        assert_eq!(s.iter().len(), 2);
        assert_eq!(s.iter().rev().next().unwrap().name(), "b");
    }
}
