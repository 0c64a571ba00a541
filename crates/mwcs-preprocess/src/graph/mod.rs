//! Original input graph and the mutable working graph derived from it.

pub mod original;
pub mod state;

pub use original::{OrigNode, OrigNodeData, OriginalGraph, OriginalGraphBuilder};
pub use state::{GraphCounts, GraphState, PreNodeData};

/// Handle of a node of the working graph (a "pre-node").
pub type PreNode = petgraph::stable_graph::NodeIndex;
