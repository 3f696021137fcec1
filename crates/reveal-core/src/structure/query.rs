//! Element filtering for [`TypedStructure::find`](super::TypedStructure::find).

use std::fmt;

use super::{Elements, TypedElement};

type Predicate<'q> = Box<dyn for<'a, 'b> Fn(&'a TypedElement<'b>) -> bool + 'q>;

/// Filter applied by `find`.
///
/// A predicate, when set, takes precedence over the category; with neither
/// set every element matches.
#[derive(Default)]
pub struct ElementQuery<'q> {
    category: Option<String>,
    predicate: Option<Predicate<'q>>,
}

impl<'q> ElementQuery<'q> {
    /// Match every element.
    pub fn all() -> Self {
        Self::default()
    }

    /// Match elements whose category equals `category` (case-sensitive).
    pub fn category(category: impl Into<String>) -> Self {
        Self::default().with_category(category)
    }

    /// Match elements accepted by `predicate`.
    pub fn matching<F>(predicate: F) -> Self
    where
        F: for<'a, 'b> Fn(&'a TypedElement<'b>) -> bool + 'q,
    {
        Self::default().with_predicate(predicate)
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_predicate<F>(mut self, predicate: F) -> Self
    where
        F: for<'a, 'b> Fn(&'a TypedElement<'b>) -> bool + 'q,
    {
        self.predicate = Some(Box::new(predicate));
        self
    }

    pub fn matches(&self, element: &TypedElement<'_>) -> bool {
        match (&self.predicate, &self.category) {
            (Some(predicate), _) => predicate(element),
            (None, Some(category)) => element.category() == category,
            (None, None) => true,
        }
    }
}

impl fmt::Debug for ElementQuery<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElementQuery")
            .field("category", &self.category)
            .field("predicate", &self.predicate.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

/// Lazy result of [`TypedStructure::find`](super::TypedStructure::find).
///
/// Every `find` call starts over from the first element.
#[derive(Debug)]
pub struct Find<'s, 'q> {
    elements: Elements<'s>,
    query: ElementQuery<'q>,
}

impl<'s, 'q> Find<'s, 'q> {
    pub(super) fn new(elements: Elements<'s>, query: ElementQuery<'q>) -> Self {
        Self { elements, query }
    }
}

impl<'s> Iterator for Find<'s, '_> {
    type Item = TypedElement<'s>;

    fn next(&mut self) -> Option<Self::Item> {
        let query = &self.query;
        self.elements.find(|el| query.matches(el))
    }
}
