/*
 * config.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Converter configuration.
//!
//! ```toml
//! if = ["isActive", "hasItems"]
//! each = ["items"]
//! with = ["person"]
//!
//! [whitespace]
//! after_open = true
//! after_close = true
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::classify::ClassificationSets;
use crate::whitespace::WhitespacePolicy;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },
}

/// Everything a conversion run needs besides the templates themselves.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConverterConfig {
    #[serde(flatten)]
    pub classification: ClassificationSets,
    #[serde(default)]
    pub whitespace: WhitespacePolicy,
}

impl ConverterConfig {
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Self, ConfigError> {
        let config_path = config_path.as_ref();
        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        Self::from_toml(&content).map_err(|source| ConfigError::ConfigParseError {
            config_path: config_path.to_path_buf(),
            source,
        })
    }

    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Switch on every policy flag set in `other`.
    pub fn enable_whitespace(&mut self, other: WhitespacePolicy) {
        let policy = &mut self.whitespace;
        policy.before_open |= other.before_open;
        policy.after_open |= other.after_open;
        policy.before_close |= other.before_close;
        policy.after_close |= other.after_close;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_config() {
        let config = ConverterConfig::from_toml(
            r#"
if = ["isActive"]
each = ["items", "rows"]
with = ["person"]

[whitespace]
after_open = true
before_close = true
"#,
        )
        .unwrap();

        assert!(config.classification.if_names.contains("isActive"));
        assert_eq!(config.classification.each_names.len(), 2);
        assert!(config.classification.with_names.contains("person"));
        assert_eq!(
            config.whitespace,
            WhitespacePolicy {
                after_open: true,
                before_close: true,
                ..Default::default()
            }
        );
    }

    #[test]
    fn test_empty_config_is_default() {
        assert_eq!(ConverterConfig::from_toml("").unwrap(), ConverterConfig::default());
    }

    #[test]
    fn test_non_string_names_are_rejected() {
        assert!(ConverterConfig::from_toml("if = [1, 2]").is_err());
        assert!(ConverterConfig::from_toml("each = \"items\"").is_err());
    }

    #[test]
    fn test_unknown_whitespace_flag_is_rejected() {
        assert!(ConverterConfig::from_toml("[whitespace]\nbefore = true").is_err());
    }

    #[test]
    fn test_missing_file() {
        let err = ConverterConfig::load_from_path("does-not-exist.toml").unwrap_err();
        assert!(matches!(err, ConfigError::ConfigReadError { .. }));
    }

    #[test]
    fn test_enable_whitespace_only_adds_flags() {
        let mut config = ConverterConfig::default();
        config.whitespace.after_close = true;
        config.enable_whitespace(WhitespacePolicy {
            before_open: true,
            ..Default::default()
        });
        assert!(config.whitespace.before_open);
        assert!(config.whitespace.after_close);
        assert!(!config.whitespace.after_open);
    }
}
