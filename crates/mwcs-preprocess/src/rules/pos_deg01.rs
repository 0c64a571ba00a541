use super::{Rule, RuleContext};

/// Folds a non-negative, non-root pendant into its only neighbor.
///
/// Applies when the neighbor also scores ≥ 0, or whenever roots exist: a
/// rooted solution can only reach the pendant through its neighbor.
#[derive(Debug, Clone, Copy, Default)]
pub struct PosDeg01;

impl Rule for PosDeg01 {
    fn name(&self) -> &'static str {
        "pos_deg01"
    }

    fn apply(&self, ctx: &mut RuleContext<'_>) -> usize {
        let mut merged = 0;
        for u in ctx.indices().nodes_of_degree(1) {
            if !ctx.is_live(u) || ctx.is_root(u) || ctx.degree(u) != 1 || ctx.score(u) < 0.0 {
                continue;
            }
            let Some(v) = ctx.neighbors(u).first().copied() else {
                continue;
            };
            if ctx.has_roots() || ctx.score(v) >= 0.0 {
                ctx.merge(u, v);
                merged += 1;
            }
        }
        merged
    }
}
