//! Elements and the navigation handle over them.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::cmp::Reverse;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Div;

use super::TypedStructure;
use crate::config::PATH_SEPARATOR;
use crate::schema::{EntityDef, RevealType};

// =============================================================================
// ELEMENT RECORD
// =============================================================================

/// One structural occurrence as emitted by an analyzer.
///
/// Lines are 1-based and inclusive. Fields the analyzer adds beyond the four
/// core ones (e.g. `complexity`) are kept in `extra` and passed through
/// untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    /// Element name; may be a placeholder for anonymous constructs.
    pub name: String,

    /// First line.
    pub line: u32,

    /// Last line.
    pub line_end: u32,

    /// Entity kind, matched against the document's schema.
    pub category: String,

    /// Analyzer-specific fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Element {
    pub fn new(
        name: impl Into<String>,
        line: u32,
        line_end: u32,
        category: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            line,
            line_end,
            category: category.into(),
            extra: Map::new(),
        }
    }

    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Number of lines spanned; zero for an inverted range.
    pub fn line_count(&self) -> u64 {
        if self.is_inverted() {
            0
        } else {
            u64::from(self.line_end) - u64::from(self.line) + 1
        }
    }

    /// `line_end < line`. Such an element neither contains nor is contained.
    pub fn is_inverted(&self) -> bool {
        self.line_end < self.line
    }

    /// Whether `line` falls inside the inclusive range.
    pub fn covers_line(&self, line: u32) -> bool {
        !self.is_inverted() && self.line <= line && line <= self.line_end
    }

    /// Range-only enclosure test (ignores identity).
    pub fn encloses(&self, other: &Element) -> bool {
        !self.is_inverted()
            && !other.is_inverted()
            && self.line <= other.line
            && other.line_end <= self.line_end
    }

    fn same_range(&self, other: &Element) -> bool {
        self.line == other.line && self.line_end == other.line_end
    }
}

// =============================================================================
// TYPED ELEMENT
// =============================================================================

/// Navigation handle for one element of a [`TypedStructure`].
///
/// A handle is the structure reference plus the element's index in the
/// document's element list. It owns nothing, so copying it is free and
/// holding one keeps no cycle alive. Relations (parent, children, depth,
/// path) are computed from ranges on every call.
#[derive(Clone, Copy)]
pub struct TypedElement<'s> {
    structure: &'s TypedStructure,
    index: usize,
}

impl<'s> TypedElement<'s> {
    pub(crate) fn new(structure: &'s TypedStructure, index: usize) -> Self {
        Self { structure, index }
    }

    /// The underlying record.
    pub fn data(&self) -> &'s Element {
        &self.structure.elements()[self.index]
    }

    /// Position in the document's element list.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn name(&self) -> &'s str {
        &self.data().name
    }

    pub fn line(&self) -> u32 {
        self.data().line
    }

    pub fn line_end(&self) -> u32 {
        self.data().line_end
    }

    pub fn line_count(&self) -> u64 {
        self.data().line_count()
    }

    pub fn category(&self) -> &'s str {
        &self.data().category
    }

    /// An analyzer-specific field.
    pub fn extra(&self, key: &str) -> Option<&'s Value> {
        self.data().extra.get(key)
    }

    pub fn structure(&self) -> &'s TypedStructure {
        self.structure
    }

    pub fn reveal_type(&self) -> &'s RevealType {
        self.structure.reveal_type()
    }

    /// Resolved schema entry for this element's category.
    pub fn entity(&self) -> Option<&'s EntityDef> {
        self.reveal_type().get_entity(self.category())
    }

    /// Every element of the document, this one included.
    pub fn siblings(&self) -> super::Elements<'s> {
        self.structure.iter()
    }

    /// Whether `other` lies inside this element's range.
    ///
    /// True when `other` starts no earlier and ends no later than `self`
    /// and is a different element of the same document. Two elements with
    /// identical ranges are ordered by position: the earlier one contains
    /// the later one. Schema containment rules are not consulted.
    pub fn contains(&self, other: &TypedElement<'_>) -> bool {
        if !std::ptr::eq(self.structure, other.structure) || self.index == other.index {
            return false;
        }

        let (outer, inner) = (self.data(), other.data());
        if !outer.encloses(inner) {
            return false;
        }
        if outer.same_range(inner) {
            return self.index < other.index;
        }
        true
    }

    /// The innermost element that contains this one.
    ///
    /// Among candidates spanning the same number of lines, the one appearing
    /// latest in the document wins.
    pub fn parent(&self) -> Option<TypedElement<'s>> {
        self.siblings()
            .filter(|candidate| candidate.contains(self))
            .min_by_key(|candidate| (candidate.line_count(), Reverse(candidate.index)))
    }

    /// Elements whose parent is this element, in document order.
    pub fn children(&self) -> Vec<TypedElement<'s>> {
        self.siblings()
            .filter(|candidate| self.contains(candidate) && candidate.parent() == Some(*self))
            .collect()
    }

    /// Immediate child with the given name.
    pub fn child(&self, name: &str) -> Option<TypedElement<'s>> {
        self.children().into_iter().find(|c| c.name() == name)
    }

    /// Enclosing elements from the parent outwards.
    pub fn ancestors(&self) -> impl Iterator<Item = TypedElement<'s>> {
        std::iter::successors(self.parent(), |el| el.parent())
    }

    pub fn is_root(&self) -> bool {
        self.parent().is_none()
    }

    /// Number of ancestors; zero for a root element.
    pub fn depth(&self) -> usize {
        self.ancestors().count()
    }

    /// Dotted names from the outermost ancestor down to this element.
    pub fn path(&self) -> String {
        let mut names: Vec<&str> = self.ancestors().map(|a| a.name()).collect();
        names.reverse();
        names.push(self.name());
        names.join(PATH_SEPARATOR)
    }

    /// Pre-order traversal: this element, then its descendants.
    ///
    /// Each call starts a fresh traversal.
    pub fn walk(&self) -> Walk<'s> {
        Walk { stack: vec![*self] }
    }

    /// Number of elements below this one at any depth.
    pub fn descendant_count(&self) -> usize {
        self.walk().count() - 1
    }
}

impl PartialEq for TypedElement<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.structure, other.structure) && self.index == other.index
    }
}

impl Eq for TypedElement<'_> {}

impl Hash for TypedElement<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::ptr::hash(self.structure, state);
        self.index.hash(state);
    }
}

impl fmt::Debug for TypedElement<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypedElement")
            .field("name", &self.name())
            .field("category", &self.category())
            .field("line", &self.line())
            .field("line_end", &self.line_end())
            .field("index", &self.index)
            .finish()
    }
}

impl fmt::Display for TypedElement<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} [{}-{}]",
            self.category(),
            self.name(),
            self.line(),
            self.line_end()
        )
    }
}

/// `element / "name"` looks up an immediate child by name.
impl<'s> Div<&str> for TypedElement<'s> {
    type Output = Option<TypedElement<'s>>;

    fn div(self, name: &str) -> Self::Output {
        self.child(name)
    }
}

// =============================================================================
// WALK
// =============================================================================

/// Lazy pre-order traversal produced by [`TypedElement::walk`].
#[derive(Debug, Clone)]
pub struct Walk<'s> {
    stack: Vec<TypedElement<'s>>,
}

impl<'s> Iterator for Walk<'s> {
    type Item = TypedElement<'s>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.stack.pop()?;
        self.stack.extend(current.children().into_iter().rev());
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_count() {
        assert_eq!(Element::new("f", 10, 20, "function").line_count(), 11);
        assert_eq!(Element::new("f", 7, 7, "function").line_count(), 1);
        assert_eq!(Element::new("f", 20, 10, "function").line_count(), 0);
    }

    #[test]
    fn test_line_count_full_u32_range() {
        let whole = Element::new("x", 0, u32::MAX, "function");
        assert_eq!(whole.line_count(), u64::from(u32::MAX) + 1);

        let inner = Element::new("y", 5, 9, "function");
        assert!(whole.encloses(&inner));
        assert!(whole.line_count() > inner.line_count());
    }

    #[test]
    fn test_inverted_range_encloses_nothing() {
        let inverted = Element::new("bad", 30, 5, "function");
        let normal = Element::new("ok", 1, 100, "class");

        assert!(!inverted.encloses(&normal));
        assert!(!normal.encloses(&inverted));
        assert!(!inverted.covers_line(10));
    }

    #[test]
    fn test_extra_fields_flatten() {
        let json = r#"{"name":"f","line":1,"line_end":3,"category":"function","complexity":7}"#;
        let el: Element = serde_json::from_str(json).unwrap();

        assert_eq!(el.extra["complexity"], 7);
        let back = serde_json::to_value(&el).unwrap();
        assert_eq!(back["complexity"], 7);
        assert_eq!(back["line_end"], 3);
    }
}
