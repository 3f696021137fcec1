//! Element dumps written by analyzers.
//!
//! A dump is a JSON or YAML document:
//!
//! ```json
//! {
//!   "path": "src/app.py",
//!   "type": "python",
//!   "elements": [
//!     { "name": "MyClass", "line": 10, "line_end": 50, "category": "class" }
//!   ]
//! }
//! ```
//!
//! `type` is optional; without it the schema is chosen by the extension of
//! `path`.

use color_eyre::eyre::{eyre, Result, WrapErr};
use serde::Deserialize;
use std::path::Path;

use reveal_core::{Element, TypeRegistry, TypedStructure};

#[derive(Debug, Deserialize)]
pub struct Dump {
    pub path: String,
    #[serde(rename = "type", default)]
    pub reveal_type: Option<String>,
    #[serde(default)]
    pub elements: Vec<Element>,
}

impl Dump {
    pub fn read(file: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(file)
            .wrap_err_with(|| format!("Failed to read {}", file.display()))?;

        let is_yaml = file
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"))
            .unwrap_or(false);

        let dump = if is_yaml {
            serde_yaml::from_str(&content)
                .wrap_err_with(|| format!("Invalid YAML dump {}", file.display()))?
        } else {
            serde_json::from_str(&content)
                .wrap_err_with(|| format!("Invalid JSON dump {}", file.display()))?
        };
        Ok(dump)
    }

    /// Pair the elements with their schema.
    pub fn into_structure(self, registry: &TypeRegistry) -> Result<TypedStructure> {
        let reveal_type = match &self.reveal_type {
            Some(name) => registry
                .get(name)
                .or_else(|| registry.from_scheme(name))
                .ok_or_else(|| eyre!("Unknown type '{name}'. Run 'reveal types' to list them."))?,
            None => registry
                .from_path(&self.path)
                .ok_or_else(|| eyre!("No schema registered for '{}'", self.path))?,
        };

        tracing::debug!(path = %self.path, schema = reveal_type.name(), "resolved dump schema");
        Ok(TypedStructure::new(self.path, reveal_type, self.elements))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reveal_core::{EntityDef, RevealType};
    use std::io::Write;
    use tempfile::Builder;

    fn write_temp(suffix: &str, content: &str) -> tempfile::NamedTempFile {
        let mut file = Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    fn registry() -> TypeRegistry {
        let mut registry = TypeRegistry::with_builtins().unwrap();
        registry
            .register(
                RevealType::builder("serpent")
                    .extension(".srp")
                    .scheme("snake")
                    .entity("function", EntityDef::new())
                    .build()
                    .unwrap(),
            )
            .unwrap();
        registry
    }

    #[test]
    fn test_read_json_type_by_name() {
        let file = write_temp(
            ".json",
            r#"{"path": "x.txt", "type": "Python",
                "elements": [{"name": "f", "line": 1, "line_end": 3, "category": "function"}]}"#,
        );
        let structure = Dump::read(file.path()).unwrap().into_structure(&registry()).unwrap();
        assert_eq!(structure.reveal_type().name(), "python");
        assert_eq!(structure.len(), 1);
    }

    #[test]
    fn test_type_falls_back_to_scheme() {
        let file = write_temp(".json", r#"{"path": "x.txt", "type": "snake"}"#);
        let structure = Dump::read(file.path()).unwrap().into_structure(&registry()).unwrap();
        assert_eq!(structure.reveal_type().name(), "serpent");
        assert!(structure.is_empty());
    }

    #[test]
    fn test_read_yaml_type_from_path() {
        let file = write_temp(
            ".yml",
            "path: src/app.rs\nelements:\n  - name: Config\n    line: 1\n    line_end: 9\n    category: struct\n    visibility: pub\n",
        );
        let structure = Dump::read(file.path()).unwrap().into_structure(&registry()).unwrap();
        assert_eq!(structure.reveal_type().name(), "rust");
        let el = structure.get("Config").unwrap();
        assert_eq!(el.extra("visibility").and_then(|v| v.as_str()), Some("pub"));
    }

    #[test]
    fn test_unresolvable_schema_is_error() {
        let unknown = write_temp(".json", r#"{"path": "x.py", "type": "cobol"}"#);
        assert!(Dump::read(unknown.path()).unwrap().into_structure(&registry()).is_err());

        let no_ext = write_temp(".json", r#"{"path": "Makefile"}"#);
        assert!(Dump::read(no_ext.path()).unwrap().into_structure(&registry()).is_err());
    }

    #[test]
    fn test_invalid_yaml_is_error() {
        let file = write_temp(".yaml", "path: [unterminated\n");
        assert!(Dump::read(file.path()).is_err());
    }
}
