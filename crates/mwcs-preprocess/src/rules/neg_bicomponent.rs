//! Removal of non-positive pieces hanging off a single cut vertex.
//!
//! One iterative DFS per connected component computes discovery times and
//! low-points. A DFS child `v` of `p` with `low[v] >= disc[p]` has a subtree
//! that reaches the rest of the graph only through `p`; if that subtree holds
//! no root and no positive node, no optimal solution needs any of it.

use mwcs_core::types::collections::FxHashMap;

use super::{Rule, RuleContext};
use crate::graph::PreNode;

const UNVISITED: usize = usize::MAX;

#[derive(Debug, Clone, Copy, Default)]
pub struct NegBicomponent;

/// DFS bookkeeping over dense node ids.
struct Dfs {
    disc: Vec<usize>,
    low: Vec<usize>,
    parent: Vec<usize>,
    /// Preorder: `order[disc[v]] == v`; a subtree is a contiguous slice.
    order: Vec<usize>,
    size: Vec<usize>,
    /// Roots or positive nodes in the subtree.
    anchors: Vec<usize>,
    /// Roots in the subtree.
    rooted: Vec<usize>,
}

impl Dfs {
    fn new(n: usize) -> Self {
        Self {
            disc: vec![UNVISITED; n],
            low: vec![0; n],
            parent: vec![UNVISITED; n],
            order: Vec::with_capacity(n),
            size: vec![1; n],
            anchors: vec![0; n],
            rooted: vec![0; n],
        }
    }

    fn discover(&mut self, v: usize, parent: usize, is_root: bool, is_anchor: bool) {
        self.disc[v] = self.order.len();
        self.low[v] = self.disc[v];
        self.parent[v] = parent;
        self.order.push(v);
        self.rooted[v] = usize::from(is_root);
        self.anchors[v] = usize::from(is_anchor);
    }
}

impl Rule for NegBicomponent {
    fn name(&self) -> &'static str {
        "neg_bicomponent"
    }

    fn apply(&self, ctx: &mut RuleContext<'_>) -> usize {
        let nodes = ctx.pre_nodes();
        let dense: FxHashMap<PreNode, usize> =
            nodes.iter().enumerate().map(|(i, &p)| (p, i)).collect();
        let adjacency: Vec<Vec<usize>> = nodes
            .iter()
            .map(|&p| ctx.neighbors(p).iter().map(|w| dense[w]).collect())
            .collect();
        let root_at = |v: usize| ctx.is_root(nodes[v]);
        let anchor_at = |v: usize| ctx.is_root(nodes[v]) || ctx.score(nodes[v]) > 0.0;

        let mut dfs = Dfs::new(nodes.len());
        // Subtree tops whose subtree can be dropped.
        let mut removable: Vec<usize> = Vec::new();

        for start in 0..nodes.len() {
            if dfs.disc[start] != UNVISITED {
                continue;
            }
            dfs.discover(start, UNVISITED, root_at(start), anchor_at(start));
            let mut stack: Vec<(usize, usize)> = vec![(start, 0)];

            while let Some(top) = stack.last_mut() {
                let u = top.0;
                if let Some(&w) = adjacency[u].get(top.1) {
                    top.1 += 1;
                    if dfs.disc[w] == UNVISITED {
                        dfs.discover(w, u, root_at(w), anchor_at(w));
                        stack.push((w, 0));
                    } else if w != dfs.parent[u] {
                        dfs.low[u] = dfs.low[u].min(dfs.disc[w]);
                    }
                    continue;
                }

                stack.pop();
                match stack.last() {
                    Some(&(p, _)) => {
                        dfs.low[p] = dfs.low[p].min(dfs.low[u]);
                        dfs.size[p] += dfs.size[u];
                        dfs.anchors[p] += dfs.anchors[u];
                        dfs.rooted[p] += dfs.rooted[u];
                        if dfs.low[u] >= dfs.disc[p] && dfs.anchors[u] == 0 {
                            removable.push(u);
                        }
                    }
                    None => {
                        // A whole component: droppable when nothing in it can
                        // score, or when roots exist elsewhere.
                        let unreachable = ctx.has_roots() && dfs.rooted[u] == 0;
                        if dfs.anchors[u] == 0 || unreachable {
                            removable.push(u);
                        }
                    }
                }
            }
        }

        removable.sort_unstable_by_key(|&v| dfs.disc[v]);
        let mut doomed: Vec<PreNode> = Vec::new();
        let mut covered_until = 0;
        for top in removable {
            let start = dfs.disc[top];
            if start < covered_until {
                continue;
            }
            covered_until = start + dfs.size[top];
            doomed.extend(dfs.order[start..covered_until].iter().map(|&v| nodes[v]));
        }
        ctx.remove_all(doomed)
    }
}
