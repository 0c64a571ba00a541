//! # mwcs-preprocess
//!
//! Lossless reduction of Maximum-Weight Connected Subgraph instances.
//!
//! The engine keeps a mutable working graph ([`GraphState`]) whose pre-nodes
//! each stand for a connected cluster of original nodes. Reduction rules
//! remove or contract pre-nodes without lowering the best achievable score
//! and without eliminating root nodes; the [`Scheduler`] runs them in phases
//! until nothing changes. A downstream solver works on the reduced graph and
//! maps its answer back through [`GraphState::expand`].

pub mod graph;
pub mod indices;
pub mod report;
pub mod rules;
pub mod scheduler;
pub mod scoring;

pub use graph::{
    GraphCounts, GraphState, OrigNode, OrigNodeData, OriginalGraph, OriginalGraphBuilder, PreNode,
    PreNodeData,
};
pub use indices::Indices;
pub use report::{PreprocessReport, RuleStats};
pub use rules::{build_rule, Rule, RuleContext};
pub use scheduler::{preprocess, Scheduler};
pub use scoring::ScoreModel;
