//! Errors raised while building the original graph.

use super::error_code::{self, MwcsErrorCode};

/// Errors reported by the graph builder for malformed loader input.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    #[error("duplicate node label: {label}")]
    DuplicateLabel { label: String },

    #[error("unknown node label: {label}")]
    UnknownLabel { label: String },

    #[error("unknown node index: {index}")]
    UnknownNode { index: usize },

    #[error("self-loop on node {label}")]
    SelfLoop { label: String },

    #[error("score of node {label} is not finite: {score}")]
    InvalidScore { label: String, score: f64 },

    #[error("p-value of node {label} must lie in (0, 1], got {p_value}")]
    InvalidPValue { label: String, p_value: f64 },
}

impl MwcsErrorCode for GraphError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownLabel { .. } | Self::UnknownNode { .. } => error_code::UNKNOWN_NODE,
            _ => error_code::GRAPH_INPUT_ERROR,
        }
    }
}
