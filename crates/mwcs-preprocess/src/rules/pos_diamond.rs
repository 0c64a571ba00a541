use super::neg_diamond::group_by_pair;
use super::{Rule, RuleContext};
use crate::graph::PreNode;

/// Degree-2 nodes sharing a neighbor pair with a positive degree-2 node:
/// the positive one always connects the pair at least as well, so every
/// non-positive non-root member is removed.
#[derive(Debug, Clone, Copy, Default)]
pub struct PosDiamond;

impl Rule for PosDiamond {
    fn name(&self) -> &'static str {
        "pos_diamond"
    }

    fn apply(&self, ctx: &mut RuleContext<'_>) -> usize {
        let groups = group_by_pair(ctx, |_| true);

        let mut removed = 0;
        for ((a, b), group) in groups {
            let still_attached = |n: PreNode| {
                ctx.is_live(n) && ctx.degree(n) == 2 && {
                    let adjacent = ctx.neighbors(n);
                    adjacent.contains(&a) && adjacent.contains(&b)
                }
            };
            let members: Vec<PreNode> = group.into_iter().filter(|&n| still_attached(n)).collect();
            if !members.iter().any(|&n| ctx.score(n) > 0.0) {
                continue;
            }
            let dominated: Vec<PreNode> = members
                .into_iter()
                .filter(|&n| ctx.score(n) <= 0.0 && !ctx.is_root(n))
                .collect();
            removed += ctx.remove_all(dominated);
        }
        removed
    }
}
