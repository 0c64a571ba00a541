use super::{Rule, RuleContext};
use crate::graph::PreNode;

/// Removes a non-positive, non-root node of degree 2 or 3 whose neighbors
/// form a clique (triangle or K4 motif). Its neighbors stay connected without
/// it, so it never helps a solution.
#[derive(Debug, Clone, Copy, Default)]
pub struct NegCircuit;

impl NegCircuit {
    fn closes_circuit(ctx: &RuleContext<'_>, node: PreNode) -> bool {
        if !ctx.is_live(node) || ctx.is_root(node) || ctx.score(node) > 0.0 {
            return false;
        }
        if !matches!(ctx.degree(node), 2 | 3) {
            return false;
        }
        let adjacent: Vec<PreNode> = ctx.neighbors(node).iter().copied().collect();
        adjacent.iter().enumerate().all(|(i, &a)| {
            adjacent[i + 1..]
                .iter()
                .all(|b| ctx.neighbors(a).contains(b))
        })
    }
}

impl Rule for NegCircuit {
    fn name(&self) -> &'static str {
        "neg_circuit"
    }

    fn apply(&self, ctx: &mut RuleContext<'_>) -> usize {
        let mut candidates = ctx.indices().nodes_of_degree(2);
        candidates.extend(ctx.indices().nodes_of_degree(3));
        candidates.sort_unstable();

        let mut removed = 0;
        for node in candidates {
            if Self::closes_circuit(ctx, node) {
                ctx.remove(node);
                removed += 1;
            }
        }
        removed
    }
}
