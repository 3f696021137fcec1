//! Contract between language analyzers and the navigation core.
//!
//! Analyzers (tree-sitter or otherwise) live outside this crate. They turn a
//! document into a flat list of [`Element`]s; [`analyze_document`] pairs that
//! list with the schema registered for the document's extension.

use thiserror::Error;

use crate::registry::TypeRegistry;
use crate::structure::{Element, TypedStructure};

/// Language-agnostic analyzer trait.
///
/// # Example Implementation
///
/// ```ignore
/// impl Analyzer for PythonAnalyzer {
///     fn analyze(&self, path: &str, content: &str) -> Result<Vec<Element>, String> {
///         let tree = self.parser.parse(content, None).ok_or("parse failed")?;
///         // Walk the tree and emit one Element per definition...
///     }
///
///     fn language_name(&self) -> &'static str { "python" }
///     fn supported_extensions(&self) -> &[&'static str] { &[".py", ".pyi"] }
/// }
/// ```
pub trait Analyzer: Send + Sync {
    /// Extract the flat element list of a document.
    ///
    /// # Arguments
    /// * `path` - Document identifier
    /// * `content` - Document text
    fn analyze(&self, path: &str, content: &str) -> Result<Vec<Element>, String>;

    /// Name of the schema this analyzer emits categories for.
    fn language_name(&self) -> &'static str;

    /// File extensions this analyzer handles, with leading dot.
    fn supported_extensions(&self) -> &[&'static str];

    /// Check if this analyzer can handle the given file extension.
    fn can_analyze(&self, extension: &str) -> bool {
        self.supported_extensions()
            .iter()
            .any(|ext| ext.eq_ignore_ascii_case(extension))
    }
}

/// Errors from [`analyze_document`].
#[derive(Debug, Error)]
pub enum AnalyzeError {
    #[error("No schema registered for {0}")]
    UnknownType(String),

    #[error("Analysis failed for {path}: {message}")]
    Analyzer { path: String, message: String },
}

/// Analyze `content` and wrap the result in a [`TypedStructure`].
///
/// The schema is chosen by the extension of `path`.
pub fn analyze_document(
    registry: &TypeRegistry,
    analyzer: &dyn Analyzer,
    path: &str,
    content: &str,
) -> Result<TypedStructure, AnalyzeError> {
    let reveal_type = registry
        .from_path(path)
        .ok_or_else(|| AnalyzeError::UnknownType(path.to_string()))?;

    let elements = analyzer
        .analyze(path, content)
        .map_err(|message| AnalyzeError::Analyzer {
            path: path.to_string(),
            message,
        })?;

    Ok(TypedStructure::new(path, reveal_type, elements))
}
