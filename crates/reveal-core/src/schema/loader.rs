//! Schema files.
//!
//! A schema file holds one [`RevealType`] in TOML or YAML:
//!
//! ```toml
//! name = "python"
//! extensions = [".py", ".pyi"]
//! scheme = "python"
//!
//! [entities.function]
//! contains = ["function", "class"]
//! properties = { signature = "string" }
//!
//! [entities.method]
//! inherits = "function"
//! ```

use std::path::{Path, PathBuf};

use super::{RevealType, SchemaError};

/// Parse a schema from TOML text.
pub fn from_toml_str(content: &str) -> Result<RevealType, SchemaError> {
    Ok(toml::from_str(content)?)
}

/// Parse a schema from YAML text.
pub fn from_yaml_str(content: &str) -> Result<RevealType, SchemaError> {
    Ok(serde_yaml::from_str(content)?)
}

/// Load a single schema file, choosing the format by extension.
pub fn load_file(path: impl AsRef<Path>) -> Result<RevealType, SchemaError> {
    let path = path.as_ref();
    let format = SchemaFormat::from_path(path)
        .ok_or_else(|| SchemaError::UnsupportedFormat(path.to_path_buf()))?;

    let content = std::fs::read_to_string(path).map_err(|e| SchemaError::io(path, e))?;
    let ty = match format {
        SchemaFormat::Toml => from_toml_str(&content)?,
        SchemaFormat::Yaml => from_yaml_str(&content)?,
    };

    tracing::debug!(schema = ty.name(), path = %path.display(), "loaded schema file");
    Ok(ty)
}

/// Load every schema file in `dir`, in file-name order.
///
/// Files with other extensions are skipped.
pub fn load_dir(dir: impl AsRef<Path>) -> Result<Vec<RevealType>, SchemaError> {
    let dir = dir.as_ref();
    let entries = std::fs::read_dir(dir).map_err(|e| SchemaError::io(dir, e))?;

    let mut paths: Vec<PathBuf> = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| SchemaError::io(dir, e))?.path();
        if path.is_file() && SchemaFormat::from_path(&path).is_some() {
            paths.push(path);
        }
    }
    paths.sort();

    paths.iter().map(|p| load_file(p)).collect()
}

/// Load a path that may be either a schema file or a directory of them.
pub fn load_path(path: impl AsRef<Path>) -> Result<Vec<RevealType>, SchemaError> {
    let path = path.as_ref();
    if path.is_dir() {
        load_dir(path)
    } else {
        Ok(vec![load_file(path)?])
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SchemaFormat {
    Toml,
    Yaml,
}

impl SchemaFormat {
    fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "toml" => Some(Self::Toml),
            "yaml" | "yml" => Some(Self::Yaml),
            _ => None,
        }
    }
}
