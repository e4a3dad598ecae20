//! AI Kitchen configuration system.
//!
//! Provides TOML-based configuration with full validation. All config
//! sections use sensible defaults so partial configs work out of the box.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use kitchen_config::{load_config, config_to_json};
//!
//! let config = load_config().expect("failed to load config");
//! let json = config_to_json(&config);
//! println!("{json}");
//! ```

pub mod schema;
pub mod toml_loader;
pub mod validation;

pub use schema::{
    AssistantConfig, FailurePolicy, GeminiSection, KitchenConfig, LogLevel, LoggingConfig,
    CONFIG_SCHEMA_VERSION,
};

use kitchen_common::ConfigError;
use std::path::Path;

/// Load config from the platform default path, creating it on first run.
pub fn load_config() -> Result<KitchenConfig, ConfigError> {
    let config = toml_loader::load_default()?;
    validation::validate(&config)?;
    Ok(config)
}

/// Load and validate config from an explicit path.
pub fn load_config_from(path: &Path) -> Result<KitchenConfig, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.to_path_buf()));
    }
    let config = toml_loader::load_from_path(path)?;
    validation::validate(&config)?;
    Ok(config)
}

/// Serialize a config to a pretty-printed JSON string with the API key redacted.
pub fn config_to_json(config: &KitchenConfig) -> String {
    let mut value = match serde_json::to_value(config) {
        Ok(v) => v,
        Err(e) => return format!("{{\"error\": \"failed to serialize config: {e}\"}}"),
    };
    if let Some(key) = value.pointer_mut("/gemini/api_key") {
        if key.as_str().is_some_and(|k| !k.is_empty()) {
            *key = serde_json::Value::String("[REDACTED]".into());
        }
    }
    serde_json::to_string_pretty(&value)
        .unwrap_or_else(|e| format!("{{\"error\": \"failed to serialize config: {e}\"}}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_to_json_contains_all_sections() {
        let json = config_to_json(&KitchenConfig::default());
        assert!(json.contains("\"gemini\""));
        assert!(json.contains("\"assistant\""));
        assert!(json.contains("\"logging\""));
        assert!(json.contains("\"gemini-2.5-flash\""));
    }

    #[test]
    fn config_to_json_redacts_api_key() {
        let mut config = KitchenConfig::default();
        config.gemini.api_key = "secret-key-123".into();
        let json = config_to_json(&config);
        assert!(!json.contains("secret-key-123"));
        assert!(json.contains("[REDACTED]"));
    }

    #[test]
    fn config_to_json_leaves_empty_key_alone() {
        let json = config_to_json(&KitchenConfig::default());
        assert!(!json.contains("[REDACTED]"));
    }

    #[test]
    fn load_config_from_missing_path_is_file_not_found() {
        let err = load_config_from(Path::new("/tmp/nonexistent_kitchen_config.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound(_)));
    }

    #[test]
    fn load_config_from_rejects_invalid_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[gemini]\ntemperature = 9.0\n").unwrap();
        let err = load_config_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn config_schema_version_is_1() {
        assert_eq!(CONFIG_SCHEMA_VERSION, 1);
    }
}
