//! Error handling for the MWCS engine.
//! One error enum per subsystem, `thiserror` only.
//!
//! Contract violations inside the reduction engine (stale handles, eliminating
//! a root) are not represented here: they panic at the call site.

pub mod config_error;
pub mod error_code;
pub mod graph_error;
pub mod invariant_error;

pub use config_error::ConfigError;
pub use error_code::MwcsErrorCode;
pub use graph_error::GraphError;
pub use invariant_error::InvariantError;
