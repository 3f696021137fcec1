//! Declarative per-language schemas.
//!
//! A [`RevealType`] describes one language or document format: the file
//! extensions it claims, its URI scheme, and one [`EntityDef`] per entity
//! kind stating which child kinds it may contain and which properties it
//! carries. Entity definitions may inherit from another kind of the same
//! type; inheritance is resolved once, when the type is built.
//!
//! ## Components
//!
//! - [`EntityDef`] - containment/property contract for a single kind
//! - [`RevealType`] - a validated schema with resolved entity definitions
//! - [`RevealTypeBuilder`] - fluent construction used by built-in schemas
//! - [`loader`] - TOML/YAML schema files
//! - [`builtin`] - schemas shipped with the crate

pub mod builtin;
mod error;
pub mod loader;

pub use error::SchemaError;

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashSet};

use crate::registry::canonical_key;

// =============================================================================
// ENTITY DEFINITION
// =============================================================================

/// Containment and property contract for one entity kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EntityDef {
    /// Kind this definition inherits from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inherits: Option<String>,

    /// Kinds this entity may directly contain.
    #[serde(skip_serializing_if = "BTreeSet::is_empty")]
    pub contains: BTreeSet<String>,

    /// Property name to semantic type (e.g. `"signature" = "string"`).
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, String>,
}

impl EntityDef {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains<I, S>(mut self, kinds: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.contains.extend(kinds.into_iter().map(Into::into));
        self
    }

    pub fn property(mut self, name: impl Into<String>, ty: impl Into<String>) -> Self {
        self.properties.insert(name.into(), ty.into());
        self
    }

    pub fn inherits(mut self, parent: impl Into<String>) -> Self {
        self.inherits = Some(parent.into());
        self
    }

    /// Whether `kind` is listed in this definition's `contains` set.
    pub fn allows(&self, kind: &str) -> bool {
        self.contains.contains(kind)
    }
}

// =============================================================================
// REVEAL TYPE
// =============================================================================

/// Schema for one language or document format.
///
/// Always constructed through [`RevealTypeBuilder::build`] or deserialization,
/// both of which resolve every entity kind up front. A `RevealType` that
/// exists is therefore free of dangling `inherits` references and cycles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RevealTypeSpec", into = "RevealTypeSpec")]
pub struct RevealType {
    name: String,
    extensions: Vec<String>,
    scheme: String,
    entities: BTreeMap<String, EntityDef>,
    resolved: BTreeMap<String, EntityDef>,
}

impl RevealType {
    pub fn builder(name: impl Into<String>) -> RevealTypeBuilder {
        RevealTypeBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Extensions in registration order, as declared.
    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// Declared (unresolved) entity definitions keyed by kind.
    pub fn entities(&self) -> &BTreeMap<String, EntityDef> {
        &self.entities
    }

    pub fn entity_kinds(&self) -> impl Iterator<Item = &str> {
        self.entities.keys().map(String::as_str)
    }

    pub fn has_entity(&self, kind: &str) -> bool {
        self.entities.contains_key(kind)
    }

    /// The definition exactly as declared, without inherited entries.
    pub fn declared_entity(&self, kind: &str) -> Option<&EntityDef> {
        self.entities.get(kind)
    }

    /// The resolved definition for `kind`.
    ///
    /// `contains` is the union of the kind's own set and every ancestor's;
    /// `properties` start from the ancestors' and are overridden by the
    /// kind's own entries. Unknown kinds yield `None`.
    pub fn get_entity(&self, kind: &str) -> Option<&EntityDef> {
        self.resolved.get(kind)
    }

    /// Whether the schema declares that `parent` may contain `child`.
    ///
    /// Purely declarative: it says nothing about any document's ranges.
    pub fn can_contain(&self, parent: &str, child: &str) -> bool {
        self.get_entity(parent)
            .map(|def| def.allows(child))
            .unwrap_or(false)
    }

    /// Case-insensitive check against this type's extensions.
    pub fn handles_extension(&self, extension: &str) -> bool {
        let wanted = canonical_key(extension);
        self.extensions.iter().any(|ext| canonical_key(ext) == wanted)
    }
}

impl std::fmt::Display for RevealType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({}://)", self.name, self.scheme)
    }
}

/// Fluent builder for [`RevealType`].
#[derive(Debug, Clone)]
pub struct RevealTypeBuilder {
    name: String,
    extensions: Vec<String>,
    scheme: Option<String>,
    entities: BTreeMap<String, EntityDef>,
}

impl RevealTypeBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            extensions: Vec::new(),
            scheme: None,
            entities: BTreeMap::new(),
        }
    }

    pub fn extension(mut self, ext: impl Into<String>) -> Self {
        self.extensions.push(ext.into());
        self
    }

    pub fn extensions<I, S>(mut self, exts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions.extend(exts.into_iter().map(Into::into));
        self
    }

    /// URI scheme; defaults to the type name.
    pub fn scheme(mut self, scheme: impl Into<String>) -> Self {
        self.scheme = Some(scheme.into());
        self
    }

    pub fn entity(mut self, kind: impl Into<String>, def: EntityDef) -> Self {
        self.entities.insert(kind.into(), def);
        self
    }

    /// Validate and resolve every entity kind.
    pub fn build(self) -> Result<RevealType, SchemaError> {
        if self.name.trim().is_empty() {
            return Err(SchemaError::EmptyName);
        }

        let mut resolved = BTreeMap::new();
        for kind in self.entities.keys() {
            if let Some(def) = resolve_entity(&self.name, &self.entities, kind)? {
                resolved.insert(kind.clone(), def);
            }
        }

        let scheme = self.scheme.unwrap_or_else(|| self.name.clone());

        Ok(RevealType {
            name: self.name,
            extensions: self.extensions,
            scheme,
            entities: self.entities,
            resolved,
        })
    }
}

/// Walk the `inherits` chain of `kind` and merge it root-first.
///
/// Returns `Ok(None)` when `kind` itself is not defined.
fn resolve_entity(
    type_name: &str,
    entities: &BTreeMap<String, EntityDef>,
    kind: &str,
) -> Result<Option<EntityDef>, SchemaError> {
    let mut chain: Vec<&str> = Vec::new();
    let mut visited: HashSet<&str> = HashSet::new();
    let mut current = kind;

    loop {
        let Some(def) = entities.get(current) else {
            return match chain.last() {
                None => Ok(None),
                Some(child) => Err(SchemaError::UnknownParent {
                    reveal_type: type_name.to_string(),
                    kind: child.to_string(),
                    parent: current.to_string(),
                }),
            };
        };

        if !visited.insert(current) {
            chain.push(current);
            return Err(SchemaError::InheritanceCycle {
                reveal_type: type_name.to_string(),
                chain: chain.into_iter().map(String::from).collect(),
            });
        }
        chain.push(current);

        match def.inherits.as_deref() {
            Some(parent) => current = parent,
            None => break,
        }
    }

    let mut merged = EntityDef::default();
    for ancestor in chain.iter().rev() {
        let def = &entities[*ancestor];
        merged.contains.extend(def.contains.iter().cloned());
        merged
            .properties
            .extend(def.properties.iter().map(|(k, v)| (k.clone(), v.clone())));
    }
    merged.inherits = entities[kind].inherits.clone();

    Ok(Some(merged))
}

// =============================================================================
// SERIALIZED FORM
// =============================================================================

/// On-disk shape of a schema; converted into a validated [`RevealType`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevealTypeSpec {
    pub name: String,

    #[serde(default)]
    pub extensions: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheme: Option<String>,

    #[serde(default)]
    pub entities: BTreeMap<String, EntityDef>,
}

impl TryFrom<RevealTypeSpec> for RevealType {
    type Error = SchemaError;

    fn try_from(spec: RevealTypeSpec) -> Result<Self, Self::Error> {
        let mut builder = RevealTypeBuilder::new(spec.name).extensions(spec.extensions);
        if let Some(scheme) = spec.scheme {
            builder = builder.scheme(scheme);
        }
        builder.entities = spec.entities;
        builder.build()
    }
}

impl From<RevealType> for RevealTypeSpec {
    fn from(ty: RevealType) -> Self {
        Self {
            name: ty.name,
            extensions: ty.extensions,
            scheme: Some(ty.scheme),
            entities: ty.entities,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_inherited_contains_are_merged() {
        let ty = RevealType::builder("lang")
            .entity("function", EntityDef::new().contains(["variable"]))
            .entity(
                "method",
                EntityDef::new().contains(["local"]).inherits("function"),
            )
            .build()
            .unwrap();

        let method = ty.get_entity("method").unwrap();
        assert_eq!(method.contains, set(&["variable", "local"]));
        assert_eq!(method.inherits.as_deref(), Some("function"));

        // Declared form is untouched
        assert_eq!(ty.declared_entity("method").unwrap().contains, set(&["local"]));
    }

    #[test]
    fn test_own_properties_override_parent() {
        let ty = RevealType::builder("lang")
            .entity(
                "base",
                EntityDef::new()
                    .property("name", "string")
                    .property("returns", "string"),
            )
            .entity(
                "derived",
                EntityDef::new().property("returns", "type").inherits("base"),
            )
            .build()
            .unwrap();

        let derived = ty.get_entity("derived").unwrap();
        assert_eq!(derived.properties["name"], "string");
        assert_eq!(derived.properties["returns"], "type");
    }

    #[test]
    fn test_multi_level_chain() {
        let ty = RevealType::builder("lang")
            .entity("a", EntityDef::new().contains(["x"]))
            .entity("b", EntityDef::new().contains(["y"]).inherits("a"))
            .entity("c", EntityDef::new().contains(["z"]).inherits("b"))
            .build()
            .unwrap();

        assert_eq!(ty.get_entity("c").unwrap().contains, set(&["x", "y", "z"]));
        assert!(ty.can_contain("c", "x"));
        assert!(!ty.can_contain("a", "z"));
    }

    #[test]
    fn test_unknown_kind_is_none() {
        let ty = RevealType::builder("lang").build().unwrap();
        assert!(ty.get_entity("missing").is_none());
        assert!(!ty.can_contain("missing", "anything"));
    }

    #[test]
    fn test_cycle_is_rejected() {
        let err = RevealType::builder("lang")
            .entity("a", EntityDef::new().inherits("b"))
            .entity("b", EntityDef::new().inherits("a"))
            .build()
            .unwrap_err();

        assert!(matches!(err, SchemaError::InheritanceCycle { .. }));
    }

    #[test]
    fn test_self_inheritance_is_a_cycle() {
        let err = RevealType::builder("lang")
            .entity("a", EntityDef::new().inherits("a"))
            .build()
            .unwrap_err();

        match err {
            SchemaError::InheritanceCycle { chain, .. } => assert_eq!(chain, vec!["a", "a"]),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_unknown_parent_is_rejected() {
        let err = RevealType::builder("lang")
            .entity("method", EntityDef::new().inherits("function"))
            .build()
            .unwrap_err();

        match err {
            SchemaError::UnknownParent { kind, parent, .. } => {
                assert_eq!(kind, "method");
                assert_eq!(parent, "function");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_scheme_defaults_to_name() {
        let ty = RevealType::builder("python").extension(".py").build().unwrap();
        assert_eq!(ty.scheme(), "python");
        assert!(ty.handles_extension(".PY"));
    }

    #[test]
    fn test_empty_name_is_rejected() {
        assert!(matches!(
            RevealType::builder("  ").build(),
            Err(SchemaError::EmptyName)
        ));
    }
}
