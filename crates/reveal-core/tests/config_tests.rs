use reveal_core::config::{ENV_MAX_DEPTH, ENV_SCHEMA_PATH};
use reveal_core::{CollisionPolicy, Config};
use tempfile::TempDir;

#[test]
fn test_config_from_toml() {
    let toml_str = r#"
[registry]
collision_policy = "strict"
load_builtins = false
schema_paths = ["schemas"]

[navigation]
max_depth = 3
"#;
    let config: Config = toml::from_str(toml_str).unwrap();
    assert_eq!(config.registry.collision_policy, CollisionPolicy::Strict);
    assert!(!config.registry.load_builtins);
    assert_eq!(config.registry.schema_paths, vec!["schemas".to_string()]);
    assert_eq!(config.navigation.max_depth, Some(3));
}

#[test]
fn test_partial_config_uses_defaults() {
    let config: Config = toml::from_str("[navigation]\nmax_depth = 1\n").unwrap();
    assert_eq!(config.registry.collision_policy, CollisionPolicy::LastWins);
    assert!(config.registry.load_builtins);
}

#[test]
fn test_from_file() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("reveal.toml");
    std::fs::write(&path, "[registry]\nload_builtins = false\n").unwrap();

    let config = Config::from_file(&path).unwrap();
    assert!(!config.registry.load_builtins);
}

#[test]
fn test_default_config_round_trips() {
    let config: Config = toml::from_str(&Config::default_config_string()).unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn test_schema_path_override_splits_list() {
    let joined = std::env::join_paths(["a", "b"]).unwrap();
    let joined = joined.to_string_lossy().into_owned();

    let mut config = Config::default();
    config
        .apply_overrides(|key| match key {
            k if k == ENV_SCHEMA_PATH => Some(joined.clone()),
            k if k == ENV_MAX_DEPTH => Some(String::new()),
            _ => None,
        })
        .unwrap();

    assert_eq!(config.registry.schema_paths, vec!["a", "b"]);
    assert_eq!(config.navigation.max_depth, None);
}

#[test]
fn test_invalid_file_is_parse_error() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("reveal.toml");
    std::fs::write(&path, "[registry\n").unwrap();
    assert!(Config::from_file(&path).is_err());
}
