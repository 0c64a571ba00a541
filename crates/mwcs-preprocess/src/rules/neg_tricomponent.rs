//! Non-positive regions attached to the rest of the graph by at most two nodes.

use std::cmp::Ordering;
use std::collections::{BTreeSet, BinaryHeap, VecDeque};

use mwcs_core::types::collections::{FxHashMap, FxHashSet};

use super::{Rule, RuleContext};
use crate::graph::PreNode;

/// Finds maximal connected regions `R` of non-positive non-root nodes and
/// their attachment set `A` (neighbors outside `R`).
///
/// - `|A| <= 1`, or two adjacent attachments: `R` is never needed; remove it.
/// - two non-adjacent attachments: `R` only serves to connect them, so keep
///   the least negative attachment-to-attachment path through `R` and remove
///   the rest.
/// - more attachments: left alone.
#[derive(Debug, Clone, Copy, Default)]
pub struct NegTricomponent;

struct Region {
    members: Vec<PreNode>,
    attachments: BTreeSet<PreNode>,
}

impl NegTricomponent {
    fn free(ctx: &RuleContext<'_>, node: PreNode) -> bool {
        !ctx.is_root(node) && ctx.score(node) <= 0.0
    }

    fn regions(ctx: &RuleContext<'_>) -> Vec<Region> {
        let mut seen: FxHashSet<PreNode> = FxHashSet::default();
        let mut regions = Vec::new();

        for start in ctx.pre_nodes() {
            if !Self::free(ctx, start) || !seen.insert(start) {
                continue;
            }
            let mut members = vec![start];
            let mut attachments = BTreeSet::new();
            let mut queue = VecDeque::from([start]);
            while let Some(u) = queue.pop_front() {
                for &w in ctx.neighbors(u) {
                    if !Self::free(ctx, w) {
                        attachments.insert(w);
                    } else if seen.insert(w) {
                        members.push(w);
                        queue.push_back(w);
                    }
                }
            }
            regions.push(Region {
                members,
                attachments,
            });
        }
        regions
    }

    /// Least-cost path through `region` from a node adjacent to `from` to a
    /// node adjacent to `to`, where entering a node costs `-score`.
    fn best_path(
        ctx: &RuleContext<'_>,
        region: &FxHashSet<PreNode>,
        from: PreNode,
        to: PreNode,
    ) -> Option<Vec<PreNode>> {
        let mut dist: FxHashMap<PreNode, f64> = FxHashMap::default();
        let mut prev: FxHashMap<PreNode, PreNode> = FxHashMap::default();
        let mut heap = BinaryHeap::new();

        for &w in ctx.neighbors(from) {
            if region.contains(&w) {
                let cost = -ctx.score(w);
                dist.insert(w, cost);
                heap.push(DijkstraState { cost, node: w });
            }
        }

        while let Some(DijkstraState { cost, node }) = heap.pop() {
            if let Some(&best) = dist.get(&node) {
                if cost > best {
                    continue;
                }
            }
            if ctx.neighbors(node).contains(&to) {
                let mut path = vec![node];
                let mut current = node;
                while let Some(&p) = prev.get(&current) {
                    path.push(p);
                    current = p;
                }
                return Some(path);
            }

            for &next in ctx.neighbors(node) {
                if !region.contains(&next) {
                    continue;
                }
                let next_cost = cost - ctx.score(next);
                let is_better = dist.get(&next).map(|&d| next_cost < d).unwrap_or(true);
                if is_better {
                    dist.insert(next, next_cost);
                    prev.insert(next, node);
                    heap.push(DijkstraState {
                        cost: next_cost,
                        node: next,
                    });
                }
            }
        }
        None
    }
}

impl Rule for NegTricomponent {
    fn name(&self) -> &'static str {
        "neg_tricomponent"
    }

    fn apply(&self, ctx: &mut RuleContext<'_>) -> usize {
        let mut removed = 0;
        for region in Self::regions(ctx) {
            let attached: Vec<PreNode> = region.attachments.iter().copied().collect();
            let doomed: Vec<PreNode> = match attached.as_slice() {
                [] | [_] => region.members,
                &[a, b] if ctx.neighbors(a).contains(&b) => region.members,
                &[a, b] => {
                    let members: FxHashSet<PreNode> = region.members.iter().copied().collect();
                    let Some(path) = Self::best_path(ctx, &members, a, b) else {
                        continue;
                    };
                    let keep: FxHashSet<PreNode> = path.into_iter().collect();
                    region
                        .members
                        .into_iter()
                        .filter(|n| !keep.contains(n))
                        .collect()
                }
                _ => continue,
            };
            removed += ctx.remove_all(doomed);
        }
        removed
    }
}

/// Min-heap entry; ties go to the lower handle so paths are deterministic.
#[derive(Debug, Clone, Copy)]
struct DijkstraState {
    cost: f64,
    node: PreNode,
}

impl PartialEq for DijkstraState {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for DijkstraState {}

impl PartialOrd for DijkstraState {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for DijkstraState {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for min-heap
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.node.cmp(&self.node))
    }
}
