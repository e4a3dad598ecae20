//! Tests for TOML config loading, creation, and path resolution.

use super::*;
use crate::schema::{FailurePolicy, LogLevel};
use kitchen_common::ConfigError;
use std::path::Path;

#[test]
fn load_from_nonexistent_returns_file_not_found() {
    let result = load_from_path(Path::new("/tmp/nonexistent_kitchen_config.toml"));
    assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
}

#[test]
fn load_valid_partial_toml() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r##"
[gemini]
chat_model = "gemini-2.0-flash"
temperature = 0.3

[logging]
level = "DEBUG"
"##,
    )
    .unwrap();

    let config = load_from_path(&path).unwrap();
    assert_eq!(config.gemini.chat_model, "gemini-2.0-flash");
    assert!((config.gemini.temperature - 0.3).abs() < f64::EPSILON);
    assert_eq!(config.logging.level, LogLevel::Debug);
    // Defaults preserved
    assert_eq!(config.gemini.max_tokens, 4096);
    assert_eq!(config.assistant.failure_policy, FailurePolicy::Discard);
}

#[test]
fn load_invalid_toml_returns_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "this is not valid toml {{{").unwrap();

    let result = load_from_path(&path);
    assert!(matches!(result, Err(ConfigError::ParseError(_))));
}

#[test]
fn load_with_invalid_values_returns_parsed_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[gemini]\nmax_tokens = 0\n").unwrap();

    let config = load_from_path(&path).unwrap();
    assert_eq!(config.gemini.max_tokens, 0);
}

#[test]
fn create_and_load_default_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ai-kitchen").join("config.toml");

    create_default_config(&path).unwrap();
    assert!(path.exists());

    let config = load_from_path(&path).unwrap();
    assert_eq!(config.gemini.chat_model, "gemini-2.5-flash");
    assert_eq!(config.assistant.failure_policy, FailurePolicy::Discard);
}

#[test]
fn default_template_is_valid_toml() {
    let parsed: Result<toml::Value, _> = toml::from_str(template::default_config_toml());
    assert!(parsed.is_ok());
}

#[test]
fn default_config_path_ends_with_app_dir() {
    if let Ok(path) = default_config_path() {
        assert!(path.ends_with("ai-kitchen/config.toml"));
    }
}
