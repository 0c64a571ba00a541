//! Reduction rules.
//!
//! Each rule scans the working graph for one structural pattern and applies a
//! safe edit per match: the best achievable connected-subgraph score never
//! drops and no root is eliminated. `apply` returns the number of pre-nodes
//! eliminated and is a no-op when nothing matches.

pub mod context;
pub mod neg_bicomponent;
pub mod neg_circuit;
pub mod neg_deg01;
pub mod neg_diamond;
pub mod neg_edge;
pub mod neg_mirrored_hubs;
pub mod neg_tricomponent;
pub mod pos_deg01;
pub mod pos_diamond;
pub mod pos_edge;

pub use context::RuleContext;
pub use neg_bicomponent::NegBicomponent;
pub use neg_circuit::NegCircuit;
pub use neg_deg01::NegDeg01;
pub use neg_diamond::NegDiamond;
pub use neg_edge::NegEdge;
pub use neg_mirrored_hubs::NegMirroredHubs;
pub use neg_tricomponent::NegTricomponent;
pub use pos_deg01::PosDeg01;
pub use pos_diamond::PosDiamond;
pub use pos_edge::PosEdge;

use mwcs_core::config::RuleKind;

use crate::graph::PreNode;

/// A reduction rule run by the scheduler.
pub trait Rule: Send + Sync {
    /// Stable name used in logs, events and reports.
    fn name(&self) -> &'static str;

    /// Apply the rule once over the whole graph; returns pre-nodes eliminated.
    fn apply(&self, ctx: &mut RuleContext<'_>) -> usize;
}

/// Instantiate the rule registered under `kind`.
pub fn build_rule(kind: RuleKind) -> Box<dyn Rule> {
    match kind {
        RuleKind::NegDeg01 => Box::new(NegDeg01),
        RuleKind::PosEdge => Box::new(PosEdge),
        RuleKind::NegEdge => Box::new(NegEdge),
        RuleKind::NegCircuit => Box::new(NegCircuit),
        RuleKind::NegDiamond => Box::new(NegDiamond),
        RuleKind::PosDeg01 => Box::new(PosDeg01),
        RuleKind::PosDiamond => Box::new(PosDiamond),
        RuleKind::NegMirroredHubs => Box::new(NegMirroredHubs),
        RuleKind::NegBicomponent => Box::new(NegBicomponent),
        RuleKind::NegTricomponent => Box::new(NegTricomponent),
    }
}

/// Keep the best-scoring member of `group` (lowest handle on ties); return the rest.
pub(crate) fn all_but_best(ctx: &RuleContext<'_>, group: &[PreNode]) -> Vec<PreNode> {
    let Some(&best) = group.iter().reduce(|best, node| {
        if ctx.score(*node) > ctx.score(*best) {
            node
        } else {
            best
        }
    }) else {
        return Vec::new();
    };
    group.iter().copied().filter(|&n| n != best).collect()
}
