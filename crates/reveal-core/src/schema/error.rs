use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while defining, loading, or registering schemas.
///
/// These are authoring bugs in a language definition, so they surface when
/// the schema is built or registered, never during navigation.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("Schema name must not be empty")]
    EmptyName,

    #[error("Entity '{kind}' in '{reveal_type}' inherits from undefined kind '{parent}'")]
    UnknownParent {
        reveal_type: String,
        kind: String,
        parent: String,
    },

    #[error("Inheritance cycle in '{reveal_type}': {}", chain.join(" -> "))]
    InheritanceCycle {
        reveal_type: String,
        chain: Vec<String>,
    },

    #[error("Extension '{extension}' is already registered by '{existing}' (while registering '{incoming}')")]
    ExtensionCollision {
        extension: String,
        existing: String,
        incoming: String,
    },

    #[error("Scheme '{scheme}' is already registered by '{existing}' (while registering '{incoming}')")]
    SchemeCollision {
        scheme: String,
        existing: String,
        incoming: String,
    },

    #[error("IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("TOML schema error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("YAML schema error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Unsupported schema file format: {0}")]
    UnsupportedFormat(PathBuf),
}

impl SchemaError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SchemaError::Io {
            path: path.into(),
            source,
        }
    }
}
