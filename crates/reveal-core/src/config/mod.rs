//! Configuration management for Reveal.
//!
//! Configuration is loaded from multiple sources with the following priority:
//! 1. Environment variables (highest priority)
//! 2. Project-local `reveal.toml` file
//! 3. User config `~/.config/reveal/config.toml`
//! 4. Built-in defaults (lowest priority)

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

mod defaults;

pub use defaults::*;

use crate::registry::CollisionPolicy;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Main configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Schema registry configuration.
    pub registry: RegistryConfig,

    /// Navigation/rendering configuration.
    pub navigation: NavigationConfig,
}

impl Config {
    /// Load configuration from default locations.
    ///
    /// Searches for config in order:
    /// 1. `./reveal.toml` (project local)
    /// 2. `~/.config/reveal/config.toml` (user config)
    /// 3. Falls back to defaults
    pub fn load() -> Result<Self, ConfigError> {
        if Path::new(PROJECT_CONFIG_FILE).exists() {
            return Self::from_file(PROJECT_CONFIG_FILE);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join(USER_CONFIG_DIR).join(USER_CONFIG_FILE);
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        let mut config = Self::default();
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Load configuration from a specific file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let mut config: Config = toml::from_str(&content)?;

        config.apply_env_overrides()?;

        tracing::debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Apply environment variable overrides.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary variable source.
    pub fn apply_overrides<F>(&mut self, var: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Registry overrides
        if let Some(policy) = var(ENV_COLLISION_POLICY) {
            self.registry.collision_policy = policy.parse().map_err(ConfigError::Invalid)?;
        }
        if let Some(paths) = var(ENV_SCHEMA_PATH) {
            self.registry.schema_paths = std::env::split_paths(&paths)
                .filter(|p| !p.as_os_str().is_empty())
                .map(|p| p.to_string_lossy().into_owned())
                .collect();
        }
        if let Some(flag) = var(ENV_LOAD_BUILTINS) {
            self.registry.load_builtins = parse_flag(&flag).ok_or_else(|| {
                ConfigError::Invalid(format!("{ENV_LOAD_BUILTINS} must be a boolean, got '{flag}'"))
            })?;
        }

        // Navigation overrides
        if let Some(depth) = var(ENV_MAX_DEPTH) {
            let depth = depth.trim();
            self.navigation.max_depth = if depth.is_empty() {
                None
            } else {
                Some(depth.parse().map_err(|_| {
                    ConfigError::Invalid(format!("{ENV_MAX_DEPTH} must be a number, got '{depth}'"))
                })?)
            };
        }

        Ok(())
    }

    /// Create a default config file content as a string.
    pub fn default_config_string() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Schema registry configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// What to do when two schemas claim the same extension or scheme.
    pub collision_policy: CollisionPolicy,

    /// Register the built-in language schemas.
    pub load_builtins: bool,

    /// Extra schema files or directories, registered after the built-ins.
    pub schema_paths: Vec<String>,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            collision_policy: DEFAULT_COLLISION_POLICY,
            load_builtins: DEFAULT_LOAD_BUILTINS,
            schema_paths: Vec::new(),
        }
    }
}

/// Navigation and outline configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationConfig {
    /// Deepest level shown in outlines (0 = roots only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_depth: Option<usize>,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}
