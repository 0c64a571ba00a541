//! Seam to the external scoring subsystem.
//!
//! Statistical transforms (p-value or FDR based reweighting) live outside this
//! crate. They plug in through [`ScoreModel`]; rescoring a [`GraphState`]
//! discards every reduction made so far.
//!
//! [`GraphState`]: crate::graph::GraphState

use crate::graph::OrigNodeData;

/// Computes a fresh score for one original node.
pub trait ScoreModel {
    fn score(&self, node: &OrigNodeData) -> f64;
}

impl<F> ScoreModel for F
where
    F: Fn(&OrigNodeData) -> f64,
{
    fn score(&self, node: &OrigNodeData) -> f64 {
        self(node)
    }
}
