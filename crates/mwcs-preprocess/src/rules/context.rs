//! RuleContext: the mutable view a rule edits through.

use std::collections::BTreeSet;

use crate::graph::{GraphState, PreNode};
use crate::indices::Indices;

/// Working graph, indices, root set and lower bound for one `apply()` call.
///
/// Edits must go through [`RuleContext::remove`] and [`RuleContext::merge`],
/// which keep the indices consistent and refuse to eliminate a root.
pub struct RuleContext<'a> {
    state: &'a mut GraphState,
    indices: &'a mut Indices,
    roots: &'a BTreeSet<PreNode>,
    lower_bound: &'a mut f64,
}

impl<'a> RuleContext<'a> {
    pub fn new(
        state: &'a mut GraphState,
        indices: &'a mut Indices,
        roots: &'a BTreeSet<PreNode>,
        lower_bound: &'a mut f64,
    ) -> Self {
        Self {
            state,
            indices,
            roots,
            lower_bound,
        }
    }

    pub fn state(&self) -> &GraphState {
        self.state
    }

    pub fn indices(&self) -> &Indices {
        self.indices
    }

    pub fn roots(&self) -> &BTreeSet<PreNode> {
        self.roots
    }

    pub fn is_root(&self, node: PreNode) -> bool {
        self.roots.contains(&node)
    }

    pub fn has_roots(&self) -> bool {
        !self.roots.is_empty()
    }

    pub fn lower_bound(&self) -> f64 {
        *self.lower_bound
    }

    pub fn is_live(&self, node: PreNode) -> bool {
        self.state.contains(node)
    }

    pub fn score(&self, node: PreNode) -> f64 {
        self.state.score(node)
    }

    pub fn degree(&self, node: PreNode) -> usize {
        self.indices.degree(node)
    }

    pub fn neighbors(&self, node: PreNode) -> &BTreeSet<PreNode> {
        self.indices.neighbors(node)
    }

    /// Live pre-nodes in ascending handle order.
    pub fn pre_nodes(&self) -> Vec<PreNode> {
        let mut nodes: Vec<PreNode> = self.state.pre_nodes().collect();
        nodes.sort_unstable();
        nodes
    }

    /// Delete a non-root pre-node.
    pub fn remove(&mut self, node: PreNode) {
        assert!(
            !self.is_root(node),
            "rule attempted to remove root pre-node {}",
            node.index()
        );
        self.indices.detach(node);
        self.state.remove(node);
    }

    /// Remove every member of `nodes`; returns how many were removed.
    pub fn remove_all<I>(&mut self, nodes: I) -> usize
    where
        I: IntoIterator<Item = PreNode>,
    {
        let mut removed = 0;
        for node in nodes {
            self.remove(node);
            removed += 1;
        }
        removed
    }

    /// Fold the non-root `u` into its neighbor `v`; returns `v`.
    ///
    /// Raises the lower bound to the merged score, which is realised by a
    /// connected set of original nodes.
    pub fn merge(&mut self, u: PreNode, v: PreNode) -> PreNode {
        assert!(
            !self.is_root(u),
            "rule attempted to merge away root pre-node {}",
            u.index()
        );
        let survivor = self.state.merge_nodes(u, v);
        self.indices.contract(u, v);

        let merged = self.state.score(survivor);
        if merged > *self.lower_bound {
            *self.lower_bound = merged;
        }
        survivor
    }
}
