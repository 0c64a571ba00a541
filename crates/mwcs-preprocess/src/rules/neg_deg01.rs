//! Removal of isolated and pendant nodes that cannot improve a solution.

use super::{Rule, RuleContext};
use crate::graph::PreNode;

/// Removes non-root nodes of degree 0 or 1 that no optimal solution needs.
///
/// - degree ≤ 1 with score ≤ 0
/// - isolated, when roots exist (unreachable from any root)
/// - isolated with score below the lower bound, when there are no roots
///
/// Removing a pendant may turn its neighbor into a pendant; that neighbor is
/// re-examined in the same pass.
#[derive(Debug, Clone, Copy, Default)]
pub struct NegDeg01;

impl NegDeg01 {
    fn removable(ctx: &RuleContext<'_>, node: PreNode) -> bool {
        if !ctx.is_live(node) || ctx.is_root(node) {
            return false;
        }
        let degree = ctx.degree(node);
        if degree > 1 {
            return false;
        }
        let score = ctx.score(node);
        score <= 0.0 || (degree == 0 && (ctx.has_roots() || score < ctx.lower_bound()))
    }
}

impl Rule for NegDeg01 {
    fn name(&self) -> &'static str {
        "neg_deg01"
    }

    fn apply(&self, ctx: &mut RuleContext<'_>) -> usize {
        let mut worklist = ctx.indices().nodes_of_degree_at_most(1);
        worklist.reverse();

        let mut removed = 0;
        while let Some(node) = worklist.pop() {
            if !Self::removable(ctx, node) {
                continue;
            }
            let neighbor = ctx.neighbors(node).first().copied();
            ctx.remove(node);
            removed += 1;
            if let Some(w) = neighbor {
                if ctx.degree(w) <= 1 {
                    worklist.push(w);
                }
            }
        }
        removed
    }
}
