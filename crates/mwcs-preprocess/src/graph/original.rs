//! Immutable input graph and the builder the loader fills it through.

use mwcs_core::errors::GraphError;
use mwcs_core::types::collections::FxHashMap;
use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::unionfind::UnionFind;
use petgraph::visit::EdgeRef;
use serde::Serialize;

use crate::scoring::ScoreModel;

/// Handle of a node of the original (input) graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct OrigNode(u32);

impl OrigNode {
    pub fn index(self) -> usize {
        self.0 as usize
    }

    pub(crate) fn from_index(index: usize) -> Self {
        Self(index as u32)
    }

    fn from_graph(idx: NodeIndex) -> Self {
        Self(idx.index() as u32)
    }

    fn graph_index(self) -> NodeIndex {
        NodeIndex::new(self.index())
    }
}

/// Attributes of an original node.
#[derive(Debug, Clone, PartialEq)]
pub struct OrigNodeData {
    pub label: String,
    pub score: f64,
    /// Raw p-value, when the loader supplied one for the scoring subsystem.
    pub p_value: Option<f64>,
    pub(crate) component: usize,
}

/// The immutable scored input graph.
///
/// Simple and undirected. Built once by [`OriginalGraphBuilder`]; the only
/// later mutation is rescoring through [`OriginalGraph::apply_scores`].
#[derive(Debug, Clone)]
pub struct OriginalGraph {
    graph: UnGraph<OrigNodeData, ()>,
    by_label: FxHashMap<String, OrigNode>,
    component_count: usize,
}

impl OriginalGraph {
    pub fn builder() -> OriginalGraphBuilder {
        OriginalGraphBuilder::new()
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn arc_count(&self) -> usize {
        2 * self.graph.edge_count()
    }

    pub fn component_count(&self) -> usize {
        self.component_count
    }

    pub fn data(&self, node: OrigNode) -> &OrigNodeData {
        &self.graph[node.graph_index()]
    }

    pub fn label(&self, node: OrigNode) -> &str {
        &self.data(node).label
    }

    pub fn score(&self, node: OrigNode) -> f64 {
        self.data(node).score
    }

    pub fn p_value(&self, node: OrigNode) -> Option<f64> {
        self.data(node).p_value
    }

    pub fn component(&self, node: OrigNode) -> usize {
        self.data(node).component
    }

    /// Label index lookup.
    pub fn node_by_label(&self, label: &str) -> Option<OrigNode> {
        self.by_label.get(label).copied()
    }

    pub fn nodes(&self) -> impl Iterator<Item = OrigNode> + '_ {
        self.graph.node_indices().map(OrigNode::from_graph)
    }

    pub fn edges(&self) -> impl Iterator<Item = (OrigNode, OrigNode)> + '_ {
        self.graph
            .edge_references()
            .map(|e| (OrigNode::from_graph(e.source()), OrigNode::from_graph(e.target())))
    }

    pub fn neighbors(&self, node: OrigNode) -> impl Iterator<Item = OrigNode> + '_ {
        self.graph
            .neighbors(node.graph_index())
            .map(OrigNode::from_graph)
    }

    pub fn has_edge(&self, a: OrigNode, b: OrigNode) -> bool {
        self.graph
            .find_edge(a.graph_index(), b.graph_index())
            .is_some()
    }

    /// Sum of all node scores.
    pub fn total_score(&self) -> f64 {
        self.graph.node_weights().map(|n| n.score).sum()
    }

    /// Replace every score with the model's output.
    ///
    /// All scores are computed first; if any is not finite, nothing changes.
    pub fn apply_scores(&mut self, model: &dyn ScoreModel) -> Result<(), GraphError> {
        let mut rescored = Vec::with_capacity(self.graph.node_count());
        for data in self.graph.node_weights() {
            let score = model.score(data);
            if !score.is_finite() {
                return Err(GraphError::InvalidScore {
                    label: data.label.clone(),
                    score,
                });
            }
            rescored.push(score);
        }
        for (data, score) in self.graph.node_weights_mut().zip(rescored) {
            data.score = score;
        }
        Ok(())
    }
}

/// Incremental builder for [`OriginalGraph`].
#[derive(Debug, Default)]
pub struct OriginalGraphBuilder {
    graph: UnGraph<OrigNodeData, ()>,
    by_label: FxHashMap<String, OrigNode>,
}

impl OriginalGraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a scored node. Labels must be unique and scores finite.
    pub fn add_node(&mut self, label: &str, score: f64) -> Result<OrigNode, GraphError> {
        self.insert(label, score, None)
    }

    /// Add a scored node carrying the raw p-value it was scored from.
    pub fn add_node_with_p_value(
        &mut self,
        label: &str,
        score: f64,
        p_value: f64,
    ) -> Result<OrigNode, GraphError> {
        if !(p_value > 0.0 && p_value <= 1.0) {
            return Err(GraphError::InvalidPValue {
                label: label.to_string(),
                p_value,
            });
        }
        self.insert(label, score, Some(p_value))
    }

    fn insert(
        &mut self,
        label: &str,
        score: f64,
        p_value: Option<f64>,
    ) -> Result<OrigNode, GraphError> {
        if self.by_label.contains_key(label) {
            return Err(GraphError::DuplicateLabel {
                label: label.to_string(),
            });
        }
        if !score.is_finite() {
            return Err(GraphError::InvalidScore {
                label: label.to_string(),
                score,
            });
        }
        let idx = self.graph.add_node(OrigNodeData {
            label: label.to_string(),
            score,
            p_value,
            component: 0,
        });
        let node = OrigNode::from_graph(idx);
        self.by_label.insert(label.to_string(), node);
        Ok(node)
    }

    /// Add an undirected edge. A repeated edge is ignored.
    pub fn add_edge(&mut self, a: OrigNode, b: OrigNode) -> Result<(), GraphError> {
        for node in [a, b] {
            if node.index() >= self.graph.node_count() {
                return Err(GraphError::UnknownNode {
                    index: node.index(),
                });
            }
        }
        if a == b {
            return Err(GraphError::SelfLoop {
                label: self.graph[a.graph_index()].label.clone(),
            });
        }
        if self
            .graph
            .find_edge(a.graph_index(), b.graph_index())
            .is_none()
        {
            self.graph.add_edge(a.graph_index(), b.graph_index(), ());
        }
        Ok(())
    }

    pub fn add_edge_by_label(&mut self, a: &str, b: &str) -> Result<(), GraphError> {
        let a = self.lookup(a)?;
        let b = self.lookup(b)?;
        self.add_edge(a, b)
    }

    fn lookup(&self, label: &str) -> Result<OrigNode, GraphError> {
        self.by_label
            .get(label)
            .copied()
            .ok_or_else(|| GraphError::UnknownLabel {
                label: label.to_string(),
            })
    }

    /// Finish the graph: label connected components 0..k in node order.
    pub fn build(self) -> OriginalGraph {
        let Self {
            mut graph,
            by_label,
        } = self;

        let mut sets = UnionFind::<usize>::new(graph.node_count());
        for edge in graph.edge_references() {
            sets.union(edge.source().index(), edge.target().index());
        }
        let labeling = sets.into_labeling();

        let mut dense: FxHashMap<usize, usize> = FxHashMap::default();
        for idx in graph.node_indices() {
            let next = dense.len();
            let component = *dense.entry(labeling[idx.index()]).or_insert(next);
            graph[idx].component = component;
        }

        OriginalGraph {
            graph,
            by_label,
            component_count: dense.len(),
        }
    }
}
