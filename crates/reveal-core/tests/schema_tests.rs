use std::collections::BTreeSet;

use reveal_core::schema::{builtin, loader};
use reveal_core::{EntityDef, RevealType, SchemaError};

fn set(items: &[&str]) -> BTreeSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_method_inherits_function_contains() {
    let ty = RevealType::builder("lang")
        .entity("function", EntityDef::new().contains(["variable"]))
        .entity("method", EntityDef::new().inherits("function").contains(["local"]))
        .build()
        .unwrap();

    assert_eq!(ty.get_entity("method").unwrap().contains, set(&["variable", "local"]));
}

#[test]
fn test_merge_law_holds_for_every_builtin_kind() {
    for ty in builtin::all().unwrap() {
        for kind in ty.entity_kinds() {
            let declared = ty.declared_entity(kind).unwrap();
            let resolved = ty.get_entity(kind).unwrap();

            let Some(parent) = declared.inherits.as_deref() else {
                assert_eq!(resolved.contains, declared.contains);
                assert_eq!(resolved.properties, declared.properties);
                continue;
            };

            let parent_resolved = ty.get_entity(parent).unwrap();

            let mut expected_contains = declared.contains.clone();
            expected_contains.extend(parent_resolved.contains.iter().cloned());
            assert_eq!(resolved.contains, expected_contains, "{}::{kind}", ty.name());

            let mut expected_props = parent_resolved.properties.clone();
            expected_props.extend(declared.properties.clone());
            assert_eq!(resolved.properties, expected_props, "{}::{kind}", ty.name());
        }
    }
}

#[test]
fn test_can_contain_is_declarative() {
    let py = builtin::python().unwrap();
    assert!(py.can_contain("class", "method"));
    assert!(!py.can_contain("import", "class"));
    assert!(!py.can_contain("unknown", "class"));
}

#[test]
fn test_three_way_cycle_fails_fast() {
    let err = RevealType::builder("lang")
        .entity("a", EntityDef::new().inherits("b"))
        .entity("b", EntityDef::new().inherits("c"))
        .entity("c", EntityDef::new().inherits("a"))
        .build()
        .unwrap_err();

    match err {
        SchemaError::InheritanceCycle { reveal_type, chain } => {
            assert_eq!(reveal_type, "lang");
            assert_eq!(chain.len(), 4);
            assert_eq!(chain.first(), chain.last());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_schema_serializes_declared_form() {
    let ty = builtin::markdown().unwrap();
    let toml_str = toml::to_string(&ty).unwrap();
    assert!(toml_str.contains("inherits = \"section\""));

    let back = loader::from_toml_str(&toml_str).unwrap();
    assert_eq!(back, ty);
}
