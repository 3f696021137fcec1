//! Registry of language schemas.
//!
//! Maps file extensions, URI schemes and type names to their [`RevealType`].
//! Lookups are case-insensitive on all three keys.
//!
//! ## Lifecycle
//!
//! The process-wide instance returned by [`global`] is built on first use
//! from the built-in schemas, populated further at startup, and read
//! afterwards. Writers take the lock for `register`/`clear`; hosts that need
//! isolation (tests, embedders) construct their own [`TypeRegistry`] instead.
//!
//! ## Collisions
//!
//! When two differently-named types claim the same extension or scheme, the
//! most recent registration wins under [`CollisionPolicy::LastWins`]. This is
//! intended; a user schema can take over a built-in one's extensions.
//! [`CollisionPolicy::Strict`] turns such a collision into a [`SchemaError`]
//! at startup.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, OnceLock, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::config::RegistryConfig;
use crate::schema::{builtin, loader, RevealType, SchemaError};

/// Canonical lookup key for names, extensions and schemes.
///
/// Used on both the store and the query path so they cannot drift apart.
pub fn canonical_key(key: &str) -> String {
    key.trim().to_lowercase()
}

/// How to treat an extension or scheme already claimed by another type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CollisionPolicy {
    /// The newest registration shadows the older one.
    #[default]
    LastWins,
    /// Collisions across different type names are rejected.
    Strict,
}

impl std::str::FromStr for CollisionPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match canonical_key(s).as_str() {
            "last-wins" | "last_wins" | "lastwins" => Ok(Self::LastWins),
            "strict" => Ok(Self::Strict),
            other => Err(format!("unknown collision policy: {other}")),
        }
    }
}

impl std::fmt::Display for CollisionPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LastWins => write!(f, "last-wins"),
            Self::Strict => write!(f, "strict"),
        }
    }
}

/// Directory of registered language schemas.
#[derive(Debug, Default)]
pub struct TypeRegistry {
    by_name: HashMap<String, Arc<RevealType>>,
    by_extension: HashMap<String, Arc<RevealType>>,
    by_scheme: HashMap<String, Arc<RevealType>>,
    /// Registration sequence number per canonical name.
    order: HashMap<String, u64>,
    next_order: u64,
    policy: CollisionPolicy,
}

#[allow(clippy::wrong_self_convention)]
impl TypeRegistry {
    /// Create an empty registry with the last-wins policy.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: CollisionPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    /// Create a registry holding every built-in schema.
    pub fn with_builtins() -> Result<Self, SchemaError> {
        let mut registry = Self::new();
        for ty in builtin::all()? {
            registry.register(ty)?;
        }
        Ok(registry)
    }

    /// Build a registry from configuration: built-ins first, then every
    /// schema file or directory listed in `schema_paths`.
    pub fn from_config(config: &RegistryConfig) -> Result<Self, SchemaError> {
        let mut registry = Self::with_policy(config.collision_policy);

        if config.load_builtins {
            for ty in builtin::all()? {
                registry.register(ty)?;
            }
        }

        for path in &config.schema_paths {
            for ty in loader::load_path(path)? {
                registry.register(ty)?;
            }
        }

        Ok(registry)
    }

    pub fn policy(&self) -> CollisionPolicy {
        self.policy
    }

    /// Register a schema, replacing any type with the same name.
    ///
    /// Re-registering under the same name drops the old type's extension and
    /// scheme entries before the new ones are wired in. A dropped key that
    /// another registered type also declares falls back to the most recently
    /// registered of those types.
    pub fn register(&mut self, ty: RevealType) -> Result<Arc<RevealType>, SchemaError> {
        let ty = Arc::new(ty);
        let name = canonical_key(ty.name());

        if self.policy == CollisionPolicy::Strict {
            self.check_collisions(&ty, &name)?;
        }

        self.order.insert(name.clone(), self.next_order);
        self.next_order += 1;

        if let Some(previous) = self.by_name.insert(name.clone(), Arc::clone(&ty)) {
            tracing::debug!(schema = ty.name(), "replacing schema registered under the same name");
            self.drop_references(&previous);
        }

        for ext in ty.extensions() {
            let key = canonical_key(ext);
            if let Some(shadowed) = self.by_extension.insert(key, Arc::clone(&ty)) {
                if canonical_key(shadowed.name()) != name {
                    tracing::warn!(
                        extension = %ext,
                        previous = shadowed.name(),
                        current = ty.name(),
                        "extension now resolves to a different schema"
                    );
                }
            }
        }

        if let Some(shadowed) = self
            .by_scheme
            .insert(canonical_key(ty.scheme()), Arc::clone(&ty))
        {
            if canonical_key(shadowed.name()) != name {
                tracing::warn!(
                    scheme = ty.scheme(),
                    previous = shadowed.name(),
                    current = ty.name(),
                    "scheme now resolves to a different schema"
                );
            }
        }

        tracing::debug!(
            schema = ty.name(),
            scheme = ty.scheme(),
            extensions = ?ty.extensions(),
            "registered schema"
        );
        Ok(ty)
    }

    /// Remove a type by name together with its extension and scheme entries.
    ///
    /// Keys the removed type held fall back to the most recently registered
    /// remaining type that declares them, if any.
    pub fn unregister(&mut self, name: &str) -> Option<Arc<RevealType>> {
        let key = canonical_key(name);
        let removed = self.by_name.remove(&key)?;
        self.order.remove(&key);
        self.drop_references(&removed);
        Some(removed)
    }

    pub fn from_extension(&self, extension: &str) -> Option<Arc<RevealType>> {
        self.by_extension.get(&canonical_key(extension)).cloned()
    }

    pub fn from_scheme(&self, scheme: &str) -> Option<Arc<RevealType>> {
        self.by_scheme.get(&canonical_key(scheme)).cloned()
    }

    pub fn get(&self, name: &str) -> Option<Arc<RevealType>> {
        self.by_name.get(&canonical_key(name)).cloned()
    }

    /// Resolve a type from a file path's extension (`src/app.py` -> `.py`).
    pub fn from_path(&self, path: impl AsRef<Path>) -> Option<Arc<RevealType>> {
        let ext = path.as_ref().extension()?.to_str()?;
        self.from_extension(&format!(".{ext}"))
    }

    /// Empty every lookup table.
    pub fn clear(&mut self) {
        self.by_name.clear();
        self.by_extension.clear();
        self.by_scheme.clear();
        self.order.clear();
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    /// Registered type names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.by_name.values().map(|t| t.name()).collect();
        names.sort_unstable();
        names
    }

    /// Registered types, sorted by name.
    pub fn types(&self) -> Vec<Arc<RevealType>> {
        let mut types: Vec<_> = self.by_name.values().cloned().collect();
        types.sort_by(|a, b| a.name().cmp(b.name()));
        types
    }

    fn check_collisions(&self, ty: &RevealType, name: &str) -> Result<(), SchemaError> {
        for ext in ty.extensions() {
            if let Some(existing) = self.by_extension.get(&canonical_key(ext)) {
                if canonical_key(existing.name()) != name {
                    return Err(SchemaError::ExtensionCollision {
                        extension: ext.clone(),
                        existing: existing.name().to_string(),
                        incoming: ty.name().to_string(),
                    });
                }
            }
        }

        if let Some(existing) = self.by_scheme.get(&canonical_key(ty.scheme())) {
            if canonical_key(existing.name()) != name {
                return Err(SchemaError::SchemeCollision {
                    scheme: ty.scheme().to_string(),
                    existing: existing.name().to_string(),
                    incoming: ty.name().to_string(),
                });
            }
        }

        Ok(())
    }

    /// Drop extension/scheme entries that still point at `ty`, handing each
    /// one to the latest remaining type that declares it.
    fn drop_references(&mut self, ty: &Arc<RevealType>) {
        let mut orphaned_extensions = Vec::new();
        self.by_extension.retain(|key, t| {
            let keep = !Arc::ptr_eq(t, ty);
            if !keep {
                orphaned_extensions.push(key.clone());
            }
            keep
        });

        let mut orphaned_schemes = Vec::new();
        self.by_scheme.retain(|key, t| {
            let keep = !Arc::ptr_eq(t, ty);
            if !keep {
                orphaned_schemes.push(key.clone());
            }
            keep
        });

        for key in orphaned_extensions {
            let heir = self.latest_claimant(|t| {
                t.extensions().iter().any(|ext| canonical_key(ext) == key)
            });
            if let Some(heir) = heir {
                tracing::debug!(extension = %key, schema = heir.name(), "extension falls back");
                self.by_extension.insert(key, heir);
            }
        }

        for key in orphaned_schemes {
            let heir = self.latest_claimant(|t| canonical_key(t.scheme()) == key);
            if let Some(heir) = heir {
                tracing::debug!(scheme = %key, schema = heir.name(), "scheme falls back");
                self.by_scheme.insert(key, heir);
            }
        }
    }

    fn latest_claimant(&self, claims: impl Fn(&RevealType) -> bool) -> Option<Arc<RevealType>> {
        self.by_name
            .iter()
            .filter(|(_, t)| claims(t))
            .max_by_key(|(name, _)| self.order.get(*name).copied().unwrap_or_default())
            .map(|(_, t)| Arc::clone(t))
    }
}

// =============================================================================
// PROCESS-WIDE REGISTRY
// =============================================================================

static GLOBAL: OnceLock<RwLock<TypeRegistry>> = OnceLock::new();

/// The process-wide registry, seeded with the built-in schemas on first use.
pub fn global() -> &'static RwLock<TypeRegistry> {
    GLOBAL.get_or_init(|| {
        let registry = TypeRegistry::with_builtins().unwrap_or_else(|err| {
            tracing::error!(error = %err, "built-in schemas failed to register");
            TypeRegistry::new()
        });
        RwLock::new(registry)
    })
}

/// Shared read access to the process-wide registry.
pub fn read_global() -> RwLockReadGuard<'static, TypeRegistry> {
    global().read().unwrap_or_else(PoisonError::into_inner)
}

/// Exclusive access to the process-wide registry, for startup registration.
pub fn write_global() -> RwLockWriteGuard<'static, TypeRegistry> {
    global().write().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::EntityDef;

    fn lang(name: &str, ext: &str, scheme: &str) -> RevealType {
        RevealType::builder(name)
            .extension(ext)
            .scheme(scheme)
            .entity("function", EntityDef::new())
            .build()
            .unwrap()
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let mut registry = TypeRegistry::new();
        registry.register(lang("Python", ".py", "python")).unwrap();

        assert!(registry.from_extension(".PY").is_some());
        assert!(registry.from_scheme("PYTHON").is_some());
        assert!(registry.get("python").is_some());
        assert!(registry.from_extension(".rs").is_none());
    }

    #[test]
    fn test_same_name_reregistration_rewires() {
        let mut registry = TypeRegistry::new();
        registry.register(lang("python", ".py", "python")).unwrap();
        registry.register(lang("python", ".pyx", "py")).unwrap();

        assert_eq!(registry.len(), 1);
        assert!(registry.from_extension(".py").is_none());
        assert!(registry.from_scheme("python").is_none());
        assert!(registry.from_extension(".pyx").is_some());
        assert!(registry.from_scheme("py").is_some());
    }

    #[test]
    fn test_strict_policy_rejects_collision() {
        let mut registry = TypeRegistry::with_policy(CollisionPolicy::Strict);
        registry.register(lang("python", ".py", "python")).unwrap();

        let err = registry.register(lang("snake", ".PY", "snake")).unwrap_err();
        assert!(matches!(err, SchemaError::ExtensionCollision { .. }));

        let err = registry.register(lang("serpent", ".srp", "Python")).unwrap_err();
        assert!(matches!(err, SchemaError::SchemeCollision { .. }));

        // Same name is not a collision
        registry.register(lang("python", ".py", "python")).unwrap();
        assert_eq!(registry.names(), vec!["python"]);
    }

    #[test]
    fn test_shadowed_extension_returns_after_unregister() {
        let mut registry = TypeRegistry::new();
        registry.register(lang("a", ".x", "a")).unwrap();
        registry.register(lang("b", ".x", "b")).unwrap();
        assert_eq!(registry.from_extension(".x").unwrap().name(), "b");

        registry.unregister("b");
        assert_eq!(registry.from_extension(".X").unwrap().name(), "a");
    }

    #[test]
    fn test_shadowed_keys_return_after_reregistration() {
        let mut registry = TypeRegistry::new();
        registry.register(lang("a", ".x", "shared")).unwrap();
        registry.register(lang("c", ".x", "other")).unwrap();
        registry.register(lang("b", ".x", "shared")).unwrap();

        registry.register(lang("b", ".y", "bee")).unwrap();

        // Latest surviving claimant of .x is c, of scheme "shared" is a
        assert_eq!(registry.from_extension(".x").unwrap().name(), "c");
        assert_eq!(registry.from_scheme("shared").unwrap().name(), "a");
        assert_eq!(registry.from_extension(".y").unwrap().name(), "b");
    }

    #[test]
    fn test_unregister() {
        let mut registry = TypeRegistry::new();
        registry.register(lang("go", ".go", "go")).unwrap();

        assert!(registry.unregister("GO").is_some());
        assert!(registry.is_empty());
        assert!(registry.from_extension(".go").is_none());
        assert!(registry.unregister("go").is_none());
    }

    #[test]
    fn test_from_path() {
        let registry = TypeRegistry::with_builtins().unwrap();
        assert_eq!(registry.from_path("src/app.py").unwrap().name(), "python");
        assert_eq!(registry.from_path("README.MD").unwrap().name(), "markdown");
        assert!(registry.from_path("Makefile").is_none());
    }

    #[test]
    fn test_policy_from_str() {
        assert_eq!("Strict".parse::<CollisionPolicy>().unwrap(), CollisionPolicy::Strict);
        assert_eq!("last-wins".parse::<CollisionPolicy>().unwrap(), CollisionPolicy::LastWins);
        assert!("sometimes".parse::<CollisionPolicy>().is_err());
    }

    #[test]
    fn test_global_has_builtins() {
        assert!(read_global().from_extension(".rs").is_some());
    }

    #[test]
    fn test_write_global_registers_for_readers() {
        write_global()
            .register(lang("globaltest", ".globaltest", "globaltest"))
            .unwrap();
        assert_eq!(
            read_global().from_extension(".GLOBALTEST").unwrap().name(),
            "globaltest"
        );
    }
}
