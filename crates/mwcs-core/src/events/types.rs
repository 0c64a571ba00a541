//! Event payload types.

/// Payload for `on_reset`.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphResetEvent {
    pub nodes: usize,
    pub edges: usize,
    pub components: usize,
}

/// Payload for `on_run_started`.
#[derive(Debug, Clone, PartialEq)]
pub struct RunStartedEvent {
    pub nodes: usize,
    pub edges: usize,
    pub roots: usize,
    pub phases: usize,
    pub lower_bound: f64,
}

/// Payload for `on_rule_applied`. Only emitted when the rule eliminated nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleAppliedEvent {
    /// 1-based phase number.
    pub phase: usize,
    pub rule: &'static str,
    pub eliminated: usize,
    pub nodes_remaining: usize,
}

/// Payload for `on_phase_exhausted`.
#[derive(Debug, Clone, PartialEq)]
pub struct PhaseExhaustedEvent {
    /// 1-based phase number.
    pub phase: usize,
    pub rounds: usize,
    pub eliminated: usize,
}

/// Payload for `on_run_complete`.
#[derive(Debug, Clone, PartialEq)]
pub struct RunCompleteEvent {
    pub nodes: usize,
    pub edges: usize,
    pub components: usize,
    pub eliminated: usize,
    pub rounds: usize,
    pub duration_us: u64,
}
