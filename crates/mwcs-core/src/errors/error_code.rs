//! Stable string codes for every error category.

/// Implemented by every error enum so callers can branch on a stable code
/// instead of the display text.
pub trait MwcsErrorCode {
    fn error_code(&self) -> &'static str;
}

pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
pub const CONFIG_PARSE_ERROR: &str = "CONFIG_PARSE_ERROR";
pub const CONFIG_VALIDATION_ERROR: &str = "CONFIG_VALIDATION_ERROR";
pub const GRAPH_INPUT_ERROR: &str = "GRAPH_INPUT_ERROR";
pub const UNKNOWN_NODE: &str = "UNKNOWN_NODE";
pub const INVARIANT_VIOLATION: &str = "INVARIANT_VIOLATION";
