//! Degree and adjacency indices consulted by the reduction rules.
//!
//! Neighbor sets are ordered so rule scans are deterministic regardless of
//! the working graph's internal edge order.

use std::collections::BTreeSet;

use mwcs_core::errors::InvariantError;
use mwcs_core::types::collections::FxHashMap;

use crate::graph::{GraphState, PreNode};

static EMPTY: BTreeSet<PreNode> = BTreeSet::new();

/// Degree map, degree buckets and neighbor sets of the live pre-nodes.
#[derive(Debug, Clone, Default)]
pub struct Indices {
    degree: FxHashMap<PreNode, usize>,
    by_degree: Vec<BTreeSet<PreNode>>,
    neighbors: FxHashMap<PreNode, BTreeSet<PreNode>>,
}

impl Indices {
    /// Build all indices from the current working graph.
    pub fn build(state: &GraphState) -> Self {
        let mut indices = Self::default();
        for node in state.pre_nodes() {
            let adjacent: BTreeSet<PreNode> = state.neighbors(node).collect();
            indices.place(node, adjacent.len());
            indices.neighbors.insert(node, adjacent);
        }
        indices
    }

    pub fn degree(&self, node: PreNode) -> usize {
        self.degree.get(&node).copied().unwrap_or(0)
    }

    /// Snapshot of the nodes currently holding degree `d`.
    pub fn nodes_of_degree(&self, d: usize) -> Vec<PreNode> {
        self.by_degree
            .get(d)
            .map(|bucket| bucket.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Snapshot of the nodes with degree at most `d`, in ascending handle order.
    pub fn nodes_of_degree_at_most(&self, d: usize) -> Vec<PreNode> {
        let mut nodes: Vec<PreNode> = self
            .by_degree
            .iter()
            .take(d + 1)
            .flat_map(|bucket| bucket.iter().copied())
            .collect();
        nodes.sort_unstable();
        nodes
    }

    pub fn neighbors(&self, node: PreNode) -> &BTreeSet<PreNode> {
        self.neighbors.get(&node).unwrap_or(&EMPTY)
    }

    pub fn len(&self) -> usize {
        self.degree.len()
    }

    pub fn is_empty(&self) -> bool {
        self.degree.is_empty()
    }

    /// Drop `node` and its incident edges. Mirrors `GraphState::remove`.
    pub fn detach(&mut self, node: PreNode) {
        let adjacent = self.neighbors.remove(&node).unwrap_or_default();
        self.unplace(node);
        for w in adjacent {
            if let Some(set) = self.neighbors.get_mut(&w) {
                set.remove(&node);
            }
            self.shift(w, -1);
        }
    }

    /// Fold `u` into `v`. Mirrors `GraphState::merge_nodes`.
    pub fn contract(&mut self, u: PreNode, v: PreNode) {
        let adjacent = self.neighbors.remove(&u).unwrap_or_default();
        self.unplace(u);

        if let Some(set) = self.neighbors.get_mut(&v) {
            set.remove(&u);
        }
        for w in adjacent.into_iter().filter(|&w| w != v) {
            let Some(set) = self.neighbors.get_mut(&w) else {
                continue;
            };
            set.remove(&u);
            if set.insert(v) {
                self.neighbors.entry(v).or_default().insert(w);
            } else {
                self.shift(w, -1);
            }
        }

        let degree = self.neighbors(v).len();
        self.sync_degree(v, degree);
    }

    /// Compare every index against the working graph.
    pub fn verify(&self, state: &GraphState) -> Result<(), InvariantError> {
        if self.degree.len() != state.node_count() {
            return Err(InvariantError::CountMismatch {
                counter: "indexed node",
                recorded: self.degree.len(),
                actual: state.node_count(),
            });
        }
        for node in state.pre_nodes() {
            let adjacent: BTreeSet<PreNode> = state.neighbors(node).collect();
            if self.neighbors.get(&node) != Some(&adjacent) {
                return Err(InvariantError::StaleIndex {
                    index: "neighbors",
                    pre_node: node.index(),
                });
            }
            if self.degree.get(&node) != Some(&adjacent.len()) {
                return Err(InvariantError::StaleIndex {
                    index: "degree",
                    pre_node: node.index(),
                });
            }
            let bucketed = self
                .by_degree
                .get(adjacent.len())
                .is_some_and(|bucket| bucket.contains(&node));
            if !bucketed {
                return Err(InvariantError::StaleIndex {
                    index: "degree bucket",
                    pre_node: node.index(),
                });
            }
        }
        Ok(())
    }

    fn place(&mut self, node: PreNode, degree: usize) {
        if self.by_degree.len() <= degree {
            self.by_degree.resize_with(degree + 1, BTreeSet::new);
        }
        self.by_degree[degree].insert(node);
        self.degree.insert(node, degree);
    }

    fn unplace(&mut self, node: PreNode) {
        if let Some(old) = self.degree.remove(&node) {
            self.by_degree[old].remove(&node);
        }
    }

    fn sync_degree(&mut self, node: PreNode, degree: usize) {
        self.unplace(node);
        self.place(node, degree);
    }

    fn shift(&mut self, node: PreNode, delta: isize) {
        let Some(&old) = self.degree.get(&node) else {
            return;
        };
        let new = old.saturating_add_signed(delta);
        self.sync_degree(node, new);
    }
}
