//! Default values for Reveal configuration.
//!
//! All hardcoded defaults are centralized here for easy maintenance.

use crate::registry::CollisionPolicy;

// ============================================================================
// Config Locations
// ============================================================================

/// Project-local config file name.
pub const PROJECT_CONFIG_FILE: &str = "reveal.toml";

/// Directory under the user config dir (`~/.config/reveal`).
pub const USER_CONFIG_DIR: &str = "reveal";

/// User config file name.
pub const USER_CONFIG_FILE: &str = "config.toml";

// ============================================================================
// Registry Defaults
// ============================================================================

/// Extensions and schemes shadow earlier registrations.
pub const DEFAULT_COLLISION_POLICY: CollisionPolicy = CollisionPolicy::LastWins;

/// Built-in schemas are registered unless disabled.
pub const DEFAULT_LOAD_BUILTINS: bool = true;

// ============================================================================
// Navigation Defaults
// ============================================================================

/// Separator used when joining element names into a path.
pub const PATH_SEPARATOR: &str = ".";

/// No depth cap on outlines.
pub const DEFAULT_MAX_DEPTH: Option<usize> = None;

// ============================================================================
// Environment Variables
// ============================================================================

pub const ENV_COLLISION_POLICY: &str = "REVEAL_COLLISION_POLICY";
pub const ENV_SCHEMA_PATH: &str = "REVEAL_SCHEMA_PATH";
pub const ENV_LOAD_BUILTINS: &str = "REVEAL_LOAD_BUILTINS";
pub const ENV_MAX_DEPTH: &str = "REVEAL_MAX_DEPTH";
