//! Configuration system for the MWCS engine.
//! TOML-based, 3-layer resolution: overrides > env > project > defaults.

pub mod logging_config;
pub mod mwcs_config;
pub mod preprocess_config;

pub use logging_config::LoggingConfig;
pub use mwcs_config::{ConfigOverrides, MwcsConfig};
pub use preprocess_config::{IndexRebuild, PreprocessConfig, RuleKind};
