//! Summary of one `preprocess()` run.

use serde::Serialize;

use crate::graph::GraphCounts;

/// Per-rule statistics accumulated over a run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RuleStats {
    /// 1-based phase number.
    pub phase: usize,
    pub rule: &'static str,
    /// Times `apply` was called.
    pub applications: usize,
    /// Calls that eliminated at least one pre-node.
    pub effective_applications: usize,
    pub eliminated: usize,
}

impl RuleStats {
    pub(crate) fn new(phase: usize, rule: &'static str) -> Self {
        Self {
            phase,
            rule,
            applications: 0,
            effective_applications: 0,
            eliminated: 0,
        }
    }

    pub(crate) fn record(&mut self, eliminated: usize) {
        self.applications += 1;
        if eliminated > 0 {
            self.effective_applications += 1;
            self.eliminated += eliminated;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreprocessReport {
    /// Statistics grouped by phase, in scheduling order.
    pub phases: Vec<Vec<RuleStats>>,
    /// Rounds executed across all phases.
    pub rounds: usize,
    /// Pre-nodes eliminated by removal or merge.
    pub eliminated: usize,
    /// Counts after the final component recomputation.
    pub counts: GraphCounts,
    pub lower_bound: f64,
    pub duration_us: u64,
}

impl PreprocessReport {
    /// Statistics of the rule named `name`, if it was scheduled.
    pub fn rule(&self, name: &str) -> Option<&RuleStats> {
        self.phases.iter().flatten().find(|s| s.rule == name)
    }

    pub fn effective_applications(&self) -> usize {
        self.phases
            .iter()
            .flatten()
            .map(|s| s.effective_applications)
            .sum()
    }

    /// Serialize the report for logs or tooling.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
