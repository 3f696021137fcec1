//! Output models for `--json` mode.
//!
//! These are Data Transfer Objects that define the shape of the JSON
//! written to stdout.

use serde::Serialize;
use serde_json::{Map, Value};

use reveal_core::{RevealType, TypedElement};

/// One element, optionally with its subtree.
#[derive(Debug, Serialize)]
pub struct ElementView {
    pub name: String,
    pub category: String,
    pub line: u32,
    pub line_end: u32,
    pub path: String,
    pub depth: usize,
    /// Analyzer-specific fields, passed through.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ElementView>,
}

impl ElementView {
    /// A single element without children.
    pub fn flat(el: TypedElement<'_>) -> Self {
        Self {
            name: el.name().to_string(),
            category: el.category().to_string(),
            line: el.line(),
            line_end: el.line_end(),
            path: el.path(),
            depth: el.depth(),
            extra: el.data().extra.clone(),
            children: Vec::new(),
        }
    }

    /// An element and its descendants down to `max_depth`.
    pub fn tree(el: TypedElement<'_>, max_depth: Option<usize>) -> Self {
        let mut view = Self::flat(el);
        if max_depth.map_or(true, |max| view.depth < max) {
            view.children = el
                .children()
                .into_iter()
                .map(|child| Self::tree(child, max_depth))
                .collect();
        }
        view
    }
}

/// Summary line for `reveal types`.
#[derive(Debug, Serialize)]
pub struct TypeSummary {
    pub name: String,
    pub scheme: String,
    pub extensions: Vec<String>,
    pub entities: usize,
}

impl From<&RevealType> for TypeSummary {
    fn from(ty: &RevealType) -> Self {
        Self {
            name: ty.name().to_string(),
            scheme: ty.scheme().to_string(),
            extensions: ty.extensions().to_vec(),
            entities: ty.entities().len(),
        }
    }
}

/// A schema violation for `reveal check`.
#[derive(Debug, Serialize)]
pub struct ViolationView {
    pub parent: ElementView,
    pub child: ElementView,
}
