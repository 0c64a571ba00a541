//! Bookkeeping invariant violations detected by a consistency check.

use super::error_code::{self, MwcsErrorCode};

/// A broken invariant of the working graph.
///
/// Only produced by explicit verification; a violation means a rule or an edit
/// primitive broke its contract.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InvariantError {
    #[error("{counter} count is {recorded} but the graph holds {actual}")]
    CountMismatch {
        counter: &'static str,
        recorded: usize,
        actual: usize,
    },

    #[error("pre-node {pre_node} lists original node {original} which does not map back")]
    MissingBackReference { pre_node: usize, original: usize },

    #[error("original node {original} maps to pre-node {pre_node} which does not list it")]
    MissingForwardReference { original: usize, pre_node: usize },

    #[error("original node {original} maps to dead pre-node {pre_node}")]
    DeadPreNode { original: usize, pre_node: usize },

    #[error("original node {original} is neither represented nor eliminated")]
    UnaccountedOriginal { original: usize },

    #[error("original node {original} is both represented and marked eliminated")]
    EliminatedButLive { original: usize },

    #[error("{index} index is stale at pre-node {pre_node}")]
    StaleIndex { index: &'static str, pre_node: usize },
}

impl MwcsErrorCode for InvariantError {
    fn error_code(&self) -> &'static str {
        error_code::INVARIANT_VIOLATION
    }
}
