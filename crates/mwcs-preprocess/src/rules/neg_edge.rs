//! Contraction of non-positive degree-2 chains.

use super::{Rule, RuleContext};
use crate::graph::PreNode;

/// Merges adjacent non-root nodes that both have degree 2 and score ≤ 0.
///
/// Such a pair sits inside a chain: an optimal solution either crosses the
/// whole chain or leaves it out, so the two nodes can be treated as one.
#[derive(Debug, Clone, Copy, Default)]
pub struct NegEdge;

impl NegEdge {
    fn eligible(ctx: &RuleContext<'_>, node: PreNode) -> bool {
        ctx.is_live(node) && !ctx.is_root(node) && ctx.degree(node) == 2 && ctx.score(node) <= 0.0
    }
}

impl Rule for NegEdge {
    fn name(&self) -> &'static str {
        "neg_edge"
    }

    fn apply(&self, ctx: &mut RuleContext<'_>) -> usize {
        let mut merged = 0;
        // Adjacency shifts as the scan merges, so every candidate is re-checked.
        for u in ctx.indices().nodes_of_degree(2) {
            if !Self::eligible(ctx, u) {
                continue;
            }
            let partner = ctx
                .neighbors(u)
                .iter()
                .copied()
                .find(|&v| Self::eligible(ctx, v));
            if let Some(v) = partner {
                ctx.merge(u, v);
                merged += 1;
            }
        }
        merged
    }
}
