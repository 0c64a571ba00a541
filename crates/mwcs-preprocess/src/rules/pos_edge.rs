//! Contraction of edges between non-negative nodes.

use super::{Rule, RuleContext};
use crate::graph::PreNode;

/// Merges every edge whose endpoints both score ≥ 0.
///
/// Any solution touching one endpoint can take the other for free, so the
/// pair is always selected together. A root endpoint survives the merge; an
/// edge between two roots is left alone.
#[derive(Debug, Clone, Copy, Default)]
pub struct PosEdge;

impl PosEdge {
    fn partner(ctx: &RuleContext<'_>, node: PreNode) -> Option<PreNode> {
        ctx.neighbors(node)
            .iter()
            .copied()
            .find(|&w| ctx.score(w) >= 0.0 && !(ctx.is_root(node) && ctx.is_root(w)))
    }
}

impl Rule for PosEdge {
    fn name(&self) -> &'static str {
        "pos_edge"
    }

    fn apply(&self, ctx: &mut RuleContext<'_>) -> usize {
        let mut merged = 0;
        for start in ctx.pre_nodes() {
            let mut node = start;
            while ctx.is_live(node) && ctx.score(node) >= 0.0 {
                let Some(w) = Self::partner(ctx, node) else {
                    break;
                };
                node = if ctx.is_root(node) {
                    ctx.merge(w, node)
                } else {
                    ctx.merge(node, w)
                };
                merged += 1;
            }
        }
        merged
    }
}
