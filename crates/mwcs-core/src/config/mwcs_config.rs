//! Top-level MWCS configuration with layered resolution.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{IndexRebuild, LoggingConfig, PreprocessConfig};
use crate::constants::CONFIG_FILE_NAME;
use crate::errors::ConfigError;

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. Explicit overrides (applied via `apply_overrides`)
/// 2. Environment variables (`MWCS_*`)
/// 3. Project config (`mwcs.toml` in the project root)
/// 4. Compiled defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct MwcsConfig {
    pub preprocess: PreprocessConfig,
    pub logging: LoggingConfig,
}

/// Override values supplied by the embedding application.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub label_separator: Option<String>,
    pub index_rebuild: Option<IndexRebuild>,
    pub verify_invariants: Option<bool>,
    pub log_level: Option<String>,
}

impl MwcsConfig {
    /// Load configuration with layered resolution rooted at `root`.
    pub fn load(root: &Path, overrides: Option<&ConfigOverrides>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        // Layer 3: project config
        let project_config_path = root.join(CONFIG_FILE_NAME);
        if project_config_path.exists() {
            Self::merge_toml_file(&mut config, &project_config_path)?;
        }

        // Layer 2: environment variables
        Self::apply_env_overrides(&mut config)?;

        // Layer 1 (highest priority): explicit overrides
        if let Some(overrides) = overrides {
            Self::apply_overrides(&mut config, overrides);
        }

        Self::validate(&config)?;

        Ok(config)
    }

    /// Load configuration from a TOML string (for testing).
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })?;
        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate the configuration values.
    pub fn validate(config: &MwcsConfig) -> Result<(), ConfigError> {
        config.preprocess.validate()?;
        if let Some(level) = &config.logging.level {
            if level.trim().is_empty() {
                return Err(ConfigError::ValidationFailed {
                    field: "logging.level".to_string(),
                    message: "must not be empty".to_string(),
                });
            }
        }
        Ok(())
    }

    /// Merge a TOML file into the existing config.
    fn merge_toml_file(config: &mut MwcsConfig, path: &Path) -> Result<(), ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;

        let file_config: MwcsConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        Self::merge(config, &file_config);
        Ok(())
    }

    /// Merge `other` into `base`; `Some` values in `other` win.
    fn merge(base: &mut MwcsConfig, other: &MwcsConfig) {
        if other.preprocess.label_separator.is_some() {
            base.preprocess.label_separator = other.preprocess.label_separator.clone();
        }
        if other.preprocess.index_rebuild.is_some() {
            base.preprocess.index_rebuild = other.preprocess.index_rebuild;
        }
        if other.preprocess.verify_invariants.is_some() {
            base.preprocess.verify_invariants = other.preprocess.verify_invariants;
        }
        if other.preprocess.phases.is_some() {
            base.preprocess.phases = other.preprocess.phases.clone();
        }

        if other.logging.level.is_some() {
            base.logging.level = other.logging.level.clone();
        }
        if other.logging.json.is_some() {
            base.logging.json = other.logging.json;
        }
    }

    /// Apply environment variable overrides.
    /// Unparseable booleans are ignored; an unknown index policy is an error.
    fn apply_env_overrides(config: &mut MwcsConfig) -> Result<(), ConfigError> {
        if let Ok(val) = std::env::var("MWCS_LABEL_SEPARATOR") {
            config.preprocess.label_separator = Some(val);
        }
        if let Ok(val) = std::env::var("MWCS_INDEX_REBUILD") {
            config.preprocess.index_rebuild = Some(val.parse()?);
        }
        if let Ok(val) = std::env::var("MWCS_VERIFY_INVARIANTS") {
            if let Ok(v) = val.parse::<bool>() {
                config.preprocess.verify_invariants = Some(v);
            }
        }
        if let Ok(val) = std::env::var("MWCS_LOG_LEVEL") {
            config.logging.level = Some(val);
        }
        Ok(())
    }

    /// Apply explicit overrides (highest priority).
    fn apply_overrides(config: &mut MwcsConfig, overrides: &ConfigOverrides) {
        if let Some(ref v) = overrides.label_separator {
            config.preprocess.label_separator = Some(v.clone());
        }
        if let Some(v) = overrides.index_rebuild {
            config.preprocess.index_rebuild = Some(v);
        }
        if let Some(v) = overrides.verify_invariants {
            config.preprocess.verify_invariants = Some(v);
        }
        if let Some(ref v) = overrides.log_level {
            config.logging.level = Some(v.clone());
        }
    }

    /// Serialize the config back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            path: "<serialization>".to_string(),
            message: e.to_string(),
        })
    }
}
