//! GraphState: the mutable working graph with node provenance.
//!
//! Every topological edit goes through this type so that live counts and the
//! two provenance maps stay in lockstep:
//! - `PreNodeData::original`: pre-node → original nodes it represents
//! - `map_to_pre`: original node → pre-nodes representing it
//!
//! Handles are `StableGraph` indices. Operating on a removed handle is a
//! contract violation and panics.

use std::collections::BTreeSet;

use mwcs_core::config::PreprocessConfig;
use mwcs_core::constants::DEFAULT_LABEL_SEPARATOR;
use mwcs_core::errors::{GraphError, InvariantError};
use mwcs_core::events::{EventDispatcher, GraphResetEvent};
use mwcs_core::types::collections::FxHashMap;
use petgraph::stable_graph::{EdgeIndex, StableUnGraph};
use petgraph::unionfind::UnionFind;
use petgraph::visit::NodeIndexable;
use serde::Serialize;
use tracing::debug;

use super::original::{OrigNode, OriginalGraph};
use super::PreNode;
use crate::scoring::ScoreModel;

/// Attributes of a pre-node.
#[derive(Debug, Clone, PartialEq)]
pub struct PreNodeData {
    pub label: String,
    pub score: f64,
    pub component: usize,
    /// Original nodes this pre-node stands for.
    pub original: BTreeSet<OrigNode>,
    /// Created by `extract`; duplicates membership of other pre-nodes.
    pub synthetic: bool,
}

/// Live cardinalities of the working graph.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GraphCounts {
    pub nodes: usize,
    pub edges: usize,
    /// Always `2 * edges`.
    pub arcs: usize,
    /// Exact after `reset` and `recompute_components`, an estimate in between.
    pub components: usize,
}

/// The working graph plus attribute and provenance maps.
#[derive(Debug, Clone)]
pub struct GraphState {
    original: OriginalGraph,
    graph: StableUnGraph<PreNodeData, ()>,
    map_to_pre: Vec<BTreeSet<PreNode>>,
    counts: GraphCounts,
    eliminated: BTreeSet<OrigNode>,
    eliminated_score: f64,
    next_component: usize,
    separator: String,
    dispatcher: EventDispatcher,
}

impl GraphState {
    /// Take ownership of the original graph and build an identity working copy.
    pub fn new(original: OriginalGraph) -> Self {
        Self::with_separator(original, DEFAULT_LABEL_SEPARATOR)
    }

    pub fn with_separator(original: OriginalGraph, separator: &str) -> Self {
        let mut state = Self {
            original,
            graph: StableUnGraph::default(),
            map_to_pre: Vec::new(),
            counts: GraphCounts::default(),
            eliminated: BTreeSet::new(),
            eliminated_score: 0.0,
            next_component: 0,
            separator: separator.to_string(),
            dispatcher: EventDispatcher::new(),
        };
        state.reset();
        state
    }

    /// Build with the label separator from `config`.
    pub fn from_config(original: OriginalGraph, config: &PreprocessConfig) -> Self {
        Self::with_separator(original, config.effective_label_separator())
    }

    /// Attach observers notified on every `reset`.
    pub fn set_dispatcher(&mut self, dispatcher: EventDispatcher) {
        self.dispatcher = dispatcher;
    }

    /// Rebuild the working graph as an identity copy of the original.
    ///
    /// Pre-node `i` represents exactly original node `i` afterwards; all prior
    /// edits, the eliminated ledger and component relabelings are discarded.
    pub fn reset(&mut self) {
        let original = &self.original;
        let mut graph =
            StableUnGraph::with_capacity(original.node_count(), original.edge_count());
        let mut map_to_pre = Vec::with_capacity(original.node_count());

        for node in original.nodes() {
            let data = original.data(node);
            let pre = graph.add_node(PreNodeData {
                label: data.label.clone(),
                score: data.score,
                component: data.component,
                original: BTreeSet::from([node]),
                synthetic: false,
            });
            debug_assert_eq!(pre.index(), node.index());
            map_to_pre.push(BTreeSet::from([pre]));
        }
        for (a, b) in original.edges() {
            graph.add_edge(PreNode::new(a.index()), PreNode::new(b.index()), ());
        }

        self.graph = graph;
        self.map_to_pre = map_to_pre;
        self.counts = GraphCounts {
            nodes: original.node_count(),
            edges: original.edge_count(),
            arcs: original.arc_count(),
            components: original.component_count(),
        };
        self.eliminated.clear();
        self.eliminated_score = 0.0;
        self.next_component = original.component_count();

        debug!(
            nodes = self.counts.nodes,
            edges = self.counts.edges,
            components = self.counts.components,
            "working graph reset"
        );
        self.dispatcher.emit_reset(&GraphResetEvent {
            nodes: self.counts.nodes,
            edges: self.counts.edges,
            components: self.counts.components,
        });
    }

    /// Rescore the original graph and start over from an identity copy.
    pub fn rescore(&mut self, model: &dyn ScoreModel) -> Result<(), GraphError> {
        self.original.apply_scores(model)?;
        self.reset();
        Ok(())
    }

    // ---- Edit primitives ----

    /// Delete a pre-node and its incident edges.
    ///
    /// Original nodes left without any representative move to the eliminated
    /// ledger. Callers must never pass a root.
    pub fn remove(&mut self, node: PreNode) {
        self.live(node, "remove");
        let degree = self.graph.neighbors(node).count();
        let Some(data) = self.graph.remove_node(node) else {
            unreachable!("liveness checked above");
        };

        self.counts.nodes -= 1;
        self.counts.edges -= degree;
        self.counts.arcs -= 2 * degree;
        if degree == 0 {
            self.counts.components = self.counts.components.saturating_sub(1);
        }

        for orig in &data.original {
            let pre = &mut self.map_to_pre[orig.index()];
            pre.remove(&node);
            if pre.is_empty() {
                self.eliminated.insert(*orig);
            }
        }
        if !data.synthetic {
            self.eliminated_score += data.score;
        }
    }

    /// Remove every member of `nodes`.
    pub fn remove_all<I>(&mut self, nodes: I)
    where
        I: IntoIterator<Item = PreNode>,
    {
        for node in nodes {
            self.remove(node);
        }
    }

    /// Contract the edge `(u, v)`: `u` is folded into `v`, which is returned.
    pub fn merge(&mut self, edge: EdgeIndex) -> PreNode {
        let Some((u, v)) = self.graph.edge_endpoints(edge) else {
            panic!("merge: edge {} is not live", edge.index());
        };
        self.contract(u, v)
    }

    /// Contract the edge between `u` and `v`, folding `u` into `v`.
    pub fn merge_nodes(&mut self, u: PreNode, v: PreNode) -> PreNode {
        self.live(u, "merge");
        self.live(v, "merge");
        assert!(
            self.graph.find_edge(u, v).is_some(),
            "merge: pre-nodes {} and {} are not adjacent",
            u.index(),
            v.index()
        );
        self.contract(u, v)
    }

    /// Contract every edge induced by `nodes`.
    ///
    /// Connected pieces of the induced subgraph each coalesce into one
    /// pre-node. Returns the last surviving representative, or `None` when
    /// `nodes` induces no edge.
    pub fn merge_set(&mut self, nodes: &BTreeSet<PreNode>) -> Option<PreNode> {
        let induced: Vec<(PreNode, PreNode)> = self
            .graph
            .edge_indices()
            .filter_map(|e| self.graph.edge_endpoints(e))
            .filter(|(a, b)| nodes.contains(a) && nodes.contains(b))
            .collect();

        let mut absorbed_into: FxHashMap<PreNode, PreNode> = FxHashMap::default();
        let representative = |map: &FxHashMap<PreNode, PreNode>, mut node: PreNode| {
            while let Some(&next) = map.get(&node) {
                node = next;
            }
            node
        };

        let mut last = None;
        for (a, b) in induced {
            let ra = representative(&absorbed_into, a);
            let rb = representative(&absorbed_into, b);
            if ra == rb {
                continue;
            }
            let survivor = self.merge_nodes(ra, rb);
            absorbed_into.insert(ra, survivor);
            last = Some(survivor);
        }
        last
    }

    /// Create a synthetic, isolated pre-node standing for the union of `nodes`.
    ///
    /// Members stay in the graph untouched; their original nodes gain the new
    /// pre-node as an extra representative.
    pub fn extract(&mut self, nodes: &BTreeSet<PreNode>) -> PreNode {
        assert!(!nodes.is_empty(), "extract: empty node set");

        let mut score = 0.0;
        let mut original = BTreeSet::new();
        for &node in nodes {
            let data = self.node(node, "extract");
            score += data.score;
            original.extend(data.original.iter().copied());
        }
        let label = nodes
            .iter()
            .map(|&n| self.graph[n].label.as_str())
            .collect::<Vec<_>>()
            .join(&self.separator);

        let component = self.next_component;
        self.next_component += 1;
        let extracted = self.graph.add_node(PreNodeData {
            label,
            score,
            component,
            original: original.clone(),
            synthetic: true,
        });
        for orig in original {
            self.map_to_pre[orig.index()].insert(extracted);
        }

        self.counts.nodes += 1;
        self.counts.components += 1;
        extracted
    }

    /// Fold `u` into `v`. Caller has checked both are live; `u` and `v` are
    /// adjacent for every public entry point.
    fn contract(&mut self, u: PreNode, v: PreNode) -> PreNode {
        assert_ne!(u, v, "merge: cannot contract pre-node {} into itself", u.index());

        let rewired: Vec<PreNode> = self.graph.neighbors(u).filter(|&w| w != v).collect();
        for w in rewired {
            if self.graph.find_edge(v, w).is_none() {
                self.graph.add_edge(v, w, ());
            } else {
                // u–w collapses onto the existing v–w.
                self.counts.edges -= 1;
                self.counts.arcs -= 2;
            }
        }

        let Some(data) = self.graph.remove_node(u) else {
            panic!("merge: pre-node {} is not live", u.index());
        };
        self.counts.nodes -= 1;
        self.counts.edges -= 1;
        self.counts.arcs -= 2;

        let target = &mut self.graph[v];
        target.score += data.score;
        target.label.push_str(&self.separator);
        target.label.push_str(&data.label);
        target.synthetic |= data.synthetic;
        for orig in data.original {
            let pre = &mut self.map_to_pre[orig.index()];
            pre.remove(&u);
            pre.insert(v);
            target.original.insert(orig);
        }
        v
    }

    /// Relabel connected components from scratch. Returns the component count.
    pub fn recompute_components(&mut self) -> usize {
        let mut sets = UnionFind::<usize>::new(self.graph.node_bound());
        for edge in self.graph.edge_indices() {
            if let Some((a, b)) = self.graph.edge_endpoints(edge) {
                sets.union(a.index(), b.index());
            }
        }

        let nodes: Vec<PreNode> = self.graph.node_indices().collect();
        let mut dense: FxHashMap<usize, usize> = FxHashMap::default();
        for node in nodes {
            let next = dense.len();
            let component = *dense.entry(sets.find_mut(node.index())).or_insert(next);
            self.graph[node].component = component;
        }

        self.counts.components = dense.len();
        self.next_component = dense.len();
        self.counts.components
    }

    // ---- Verification ----

    /// Check counts against enumeration and both provenance directions.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        let actual_nodes = self.graph.node_count();
        let actual_edges = self.graph.edge_count();
        for (counter, recorded, actual) in [
            ("node", self.counts.nodes, actual_nodes),
            ("edge", self.counts.edges, actual_edges),
            ("arc", self.counts.arcs, 2 * actual_edges),
        ] {
            if recorded != actual {
                return Err(InvariantError::CountMismatch {
                    counter,
                    recorded,
                    actual,
                });
            }
        }

        for pre in self.graph.node_indices() {
            for orig in &self.graph[pre].original {
                if !self.map_to_pre[orig.index()].contains(&pre) {
                    return Err(InvariantError::MissingBackReference {
                        pre_node: pre.index(),
                        original: orig.index(),
                    });
                }
            }
        }

        for (index, pres) in self.map_to_pre.iter().enumerate() {
            let orig = OrigNode::from_index(index);
            for &pre in pres {
                let Some(data) = self.graph.node_weight(pre) else {
                    return Err(InvariantError::DeadPreNode {
                        original: index,
                        pre_node: pre.index(),
                    });
                };
                if !data.original.contains(&orig) {
                    return Err(InvariantError::MissingForwardReference {
                        original: index,
                        pre_node: pre.index(),
                    });
                }
            }
            match (pres.is_empty(), self.eliminated.contains(&orig)) {
                (true, false) => {
                    return Err(InvariantError::UnaccountedOriginal { original: index })
                }
                (false, true) => {
                    return Err(InvariantError::EliminatedButLive { original: index })
                }
                _ => {}
            }
        }
        Ok(())
    }

    // ---- Accessors ----

    fn live(&self, node: PreNode, op: &str) {
        assert!(
            self.graph.contains_node(node),
            "{op}: pre-node {} is not live",
            node.index()
        );
    }

    fn node(&self, node: PreNode, op: &str) -> &PreNodeData {
        match self.graph.node_weight(node) {
            Some(data) => data,
            None => panic!("{op}: pre-node {} is not live", node.index()),
        }
    }

    pub fn original(&self) -> &OriginalGraph {
        &self.original
    }

    /// Read-only view of the working graph for the downstream solver.
    pub fn graph(&self) -> &StableUnGraph<PreNodeData, ()> {
        &self.graph
    }

    pub fn separator(&self) -> &str {
        &self.separator
    }

    pub fn counts(&self) -> GraphCounts {
        self.counts
    }

    pub fn node_count(&self) -> usize {
        self.counts.nodes
    }

    pub fn edge_count(&self) -> usize {
        self.counts.edges
    }

    pub fn arc_count(&self) -> usize {
        self.counts.arcs
    }

    pub fn component_count(&self) -> usize {
        self.counts.components
    }

    pub fn contains(&self, node: PreNode) -> bool {
        self.graph.contains_node(node)
    }

    pub fn data(&self, node: PreNode) -> &PreNodeData {
        self.node(node, "data")
    }

    pub fn label(&self, node: PreNode) -> &str {
        &self.node(node, "label").label
    }

    pub fn score(&self, node: PreNode) -> f64 {
        self.node(node, "score").score
    }

    pub fn component(&self, node: PreNode) -> usize {
        self.node(node, "component").component
    }

    pub fn is_synthetic(&self, node: PreNode) -> bool {
        self.node(node, "is_synthetic").synthetic
    }

    pub fn degree(&self, node: PreNode) -> usize {
        self.live(node, "degree");
        self.graph.neighbors(node).count()
    }

    pub fn neighbors(&self, node: PreNode) -> impl Iterator<Item = PreNode> + '_ {
        self.live(node, "neighbors");
        self.graph.neighbors(node)
    }

    pub fn find_edge(&self, u: PreNode, v: PreNode) -> Option<EdgeIndex> {
        self.graph.find_edge(u, v)
    }

    pub fn pre_nodes(&self) -> impl Iterator<Item = PreNode> + '_ {
        self.graph.node_indices()
    }

    pub fn edges(&self) -> impl Iterator<Item = (PreNode, PreNode)> + '_ {
        self.graph
            .edge_indices()
            .filter_map(|e| self.graph.edge_endpoints(e))
    }

    /// Highest pre-node score, `None` on an empty graph.
    pub fn max_score(&self) -> Option<f64> {
        self.graph.node_weights().map(|n| n.score).reduce(f64::max)
    }

    /// Summed score of live pre-nodes created from original nodes (not by `extract`).
    pub fn total_score(&self) -> f64 {
        self.graph
            .node_weights()
            .filter(|n| !n.synthetic)
            .map(|n| n.score)
            .sum()
    }

    /// Original nodes represented by `node`.
    pub fn original_nodes(&self, node: PreNode) -> &BTreeSet<OrigNode> {
        &self.node(node, "original_nodes").original
    }

    /// Expand a solution on the working graph back onto original nodes.
    pub fn expand<I>(&self, nodes: I) -> BTreeSet<OrigNode>
    where
        I: IntoIterator<Item = PreNode>,
    {
        let mut expanded = BTreeSet::new();
        for node in nodes {
            expanded.extend(self.original_nodes(node).iter().copied());
        }
        expanded
    }

    /// Pre-nodes currently representing original node `orig`.
    pub fn pre_nodes_of(&self, orig: OrigNode) -> &BTreeSet<PreNode> {
        &self.map_to_pre[orig.index()]
    }

    /// Pre-nodes representing the original node labelled `label`; empty when
    /// the label is unknown or its node was eliminated.
    pub fn pre_nodes_by_label(&self, label: &str) -> BTreeSet<PreNode> {
        self.original
            .node_by_label(label)
            .map(|orig| self.map_to_pre[orig.index()].clone())
            .unwrap_or_default()
    }

    /// Original nodes whose every representative has been removed.
    pub fn eliminated(&self) -> &BTreeSet<OrigNode> {
        &self.eliminated
    }

    /// Summed score of removed non-synthetic pre-nodes.
    pub fn eliminated_score(&self) -> f64 {
        self.eliminated_score
    }
}
