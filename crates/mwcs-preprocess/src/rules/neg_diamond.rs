//! Parallel non-positive degree-2 paths between the same two nodes.

use std::collections::BTreeMap;

use smallvec::SmallVec;

use super::{all_but_best, Rule, RuleContext};
use crate::graph::PreNode;

pub(crate) type Group = SmallVec<[PreNode; 4]>;

/// Degree-2 nodes keyed by their (ordered) neighbor pair.
pub(crate) fn group_by_pair<F>(ctx: &RuleContext<'_>, keep: F) -> BTreeMap<(PreNode, PreNode), Group>
where
    F: Fn(PreNode) -> bool,
{
    let mut groups: BTreeMap<(PreNode, PreNode), Group> = BTreeMap::new();
    for node in ctx.indices().nodes_of_degree(2) {
        if !keep(node) {
            continue;
        }
        let mut pair = ctx.neighbors(node).iter().copied();
        if let (Some(a), Some(b)) = (pair.next(), pair.next()) {
            groups.entry((a, b)).or_default().push(node);
        }
    }
    groups
}

/// Among ≥2 non-positive non-root degree-2 nodes attached to the same pair,
/// keeps the best-scoring one and removes the others.
#[derive(Debug, Clone, Copy, Default)]
pub struct NegDiamond;

impl Rule for NegDiamond {
    fn name(&self) -> &'static str {
        "neg_diamond"
    }

    fn apply(&self, ctx: &mut RuleContext<'_>) -> usize {
        let groups = group_by_pair(ctx, |n| !ctx.is_root(n) && ctx.score(n) <= 0.0);

        let mut removed = 0;
        for ((a, b), group) in groups {
            let members: Vec<PreNode> = group
                .into_iter()
                .filter(|&n| {
                    ctx.is_live(n) && ctx.degree(n) == 2 && {
                        let adjacent = ctx.neighbors(n);
                        adjacent.contains(&a) && adjacent.contains(&b)
                    }
                })
                .collect();
            if members.len() < 2 {
                continue;
            }
            let dominated = all_but_best(ctx, &members);
            removed += ctx.remove_all(dominated);
        }
        removed
    }
}
