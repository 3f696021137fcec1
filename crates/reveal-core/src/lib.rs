//! Structural navigation core for Reveal.
//!
//! Analyzers turn a document into a flat list of named, line-ranged
//! elements. This crate gives that list a hierarchy (parent, children,
//! depth, dotted path) inferred purely from the ranges, under a declarative
//! per-language schema.
//!
//! - [`schema`] - entity definitions and language schemas
//! - [`registry`] - schema lookup by extension, scheme, or name
//! - [`structure`] - typed elements and documents
//! - [`analyzer`] - the analyzer contract
//! - [`config`] - configuration loading

pub mod analyzer;
pub mod config;
pub mod registry;
pub mod schema;
pub mod structure;

pub use analyzer::{analyze_document, AnalyzeError, Analyzer};
pub use config::{Config, ConfigError, NavigationConfig, RegistryConfig};
pub use registry::{CollisionPolicy, TypeRegistry};
pub use schema::{EntityDef, RevealType, SchemaError};
pub use structure::{Element, ElementQuery, TypedElement, TypedStructure};
