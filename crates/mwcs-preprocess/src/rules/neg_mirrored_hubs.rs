//! Nodes with identical neighborhoods ("mirrored hubs").

use std::collections::BTreeMap;

use super::{all_but_best, Rule, RuleContext};
use crate::graph::PreNode;

/// Groups nodes by their exact, non-empty neighbor set.
///
/// Members of a group are interchangeable for connectivity, so a
/// non-positive non-root member is dominated by any kept member: a root, a
/// positive member, or else the best-scoring member. Dominated members are
/// removed.
#[derive(Debug, Clone, Copy, Default)]
pub struct NegMirroredHubs;

impl Rule for NegMirroredHubs {
    fn name(&self) -> &'static str {
        "neg_mirrored_hubs"
    }

    fn apply(&self, ctx: &mut RuleContext<'_>) -> usize {
        let mut groups: BTreeMap<Vec<PreNode>, Vec<PreNode>> = BTreeMap::new();
        for node in ctx.pre_nodes() {
            let adjacent = ctx.neighbors(node);
            if adjacent.is_empty() {
                continue;
            }
            groups
                .entry(adjacent.iter().copied().collect())
                .or_default()
                .push(node);
        }

        let mut removed = 0;
        for (key, group) in groups {
            if group.len() < 2 {
                continue;
            }
            let members: Vec<PreNode> = group
                .into_iter()
                .filter(|&n| ctx.is_live(n) && ctx.neighbors(n).iter().eq(key.iter()))
                .collect();
            if members.len() < 2 {
                continue;
            }

            let anchored = members
                .iter()
                .any(|&n| ctx.is_root(n) || ctx.score(n) > 0.0);
            let dominated: Vec<PreNode> = if anchored {
                members
                    .into_iter()
                    .filter(|&n| !ctx.is_root(n) && ctx.score(n) <= 0.0)
                    .collect()
            } else {
                all_but_best(ctx, &members)
            };
            removed += ctx.remove_all(dominated);
        }
        removed
    }
}
