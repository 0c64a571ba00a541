//! Observer trait for preprocessing runs.

use super::types::*;

/// Receives preprocessing lifecycle events. Every method defaults to a no-op,
/// so handlers only implement what they care about.
pub trait PreprocessEventHandler: Send + Sync {
    fn on_reset(&self, _event: &GraphResetEvent) {}
    fn on_run_started(&self, _event: &RunStartedEvent) {}
    fn on_rule_applied(&self, _event: &RuleAppliedEvent) {}
    fn on_phase_exhausted(&self, _event: &PhaseExhaustedEvent) {}
    fn on_run_complete(&self, _event: &RunCompleteEvent) {}
}
