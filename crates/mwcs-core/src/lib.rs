//! # mwcs-core
//!
//! Foundation crate for the MWCS preprocessing engine.
//! Defines errors, config, events, tracing setup, shared collections, and constants.
//! The reduction engine in `mwcs-preprocess` depends on this.

pub mod config;
pub mod constants;
pub mod errors;
pub mod events;
pub mod tracing;
pub mod types;

// Re-export the most commonly used types at the crate root.
pub use config::{MwcsConfig, PreprocessConfig, RuleKind};
pub use errors::{ConfigError, GraphError, InvariantError, MwcsErrorCode};
pub use events::{EventDispatcher, PreprocessEventHandler};
