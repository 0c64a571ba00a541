//! Fixed-point scheduler running the reduction rules phase by phase.
//!
//! Each phase is exhausted (rounds repeat until one eliminates nothing)
//! before the next runs. Progress in any phase after the first sends the run
//! back to phase 1, so the cheap local rules always see the latest graph. The
//! run ends once a pass over every phase leaves the graph unchanged.

use std::collections::BTreeSet;
use std::fmt;
use std::time::Instant;

use mwcs_core::config::{IndexRebuild, PreprocessConfig, RuleKind};
use mwcs_core::errors::ConfigError;
use mwcs_core::events::{
    EventDispatcher, PhaseExhaustedEvent, RuleAppliedEvent, RunCompleteEvent, RunStartedEvent,
};
use tracing::{debug, info, info_span, trace};

use crate::graph::{GraphState, PreNode};
use crate::indices::Indices;
use crate::report::{PreprocessReport, RuleStats};
use crate::rules::{build_rule, Rule, RuleContext};

/// Ordered rule phases plus run policy.
pub struct Scheduler {
    phases: Vec<Vec<Box<dyn Rule>>>,
    index_rebuild: IndexRebuild,
    verify_invariants: bool,
    dispatcher: EventDispatcher,
}

impl Scheduler {
    /// A scheduler with no rules; `preprocess` only recomputes components.
    pub fn new() -> Self {
        Self {
            phases: Vec::new(),
            index_rebuild: IndexRebuild::default(),
            verify_invariants: false,
            dispatcher: EventDispatcher::new(),
        }
    }

    /// Build the phase layout and run policy described by `config`.
    pub fn from_config(config: &PreprocessConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut scheduler = Self::from_layout(config.effective_phases());
        scheduler.index_rebuild = config.effective_index_rebuild();
        scheduler.verify_invariants = config.effective_verify_invariants();
        Ok(scheduler)
    }

    fn from_layout(layout: Vec<Vec<RuleKind>>) -> Self {
        let mut scheduler = Self::new();
        scheduler.phases = layout
            .into_iter()
            .map(|phase| phase.into_iter().map(build_rule).collect())
            .collect();
        scheduler
    }

    /// Append `rule` to the 1-based `phase`, creating intermediate phases empty.
    pub fn add_rule(&mut self, phase: usize, rule: Box<dyn Rule>) -> &mut Self {
        assert!(phase >= 1, "add_rule: phases are numbered from 1");
        if self.phases.len() < phase {
            self.phases.resize_with(phase, Vec::new);
        }
        self.phases[phase - 1].push(rule);
        self
    }

    pub fn with_dispatcher(mut self, dispatcher: EventDispatcher) -> Self {
        self.dispatcher = dispatcher;
        self
    }

    pub fn with_index_rebuild(mut self, policy: IndexRebuild) -> Self {
        self.index_rebuild = policy;
        self
    }

    /// Check graph invariants and index consistency after every rule call.
    pub fn with_verification(mut self, enabled: bool) -> Self {
        self.verify_invariants = enabled;
        self
    }

    pub fn phase_count(&self) -> usize {
        self.phases.len()
    }

    /// Rule names per phase, in execution order.
    pub fn rule_names(&self) -> Vec<Vec<&'static str>> {
        self.phases
            .iter()
            .map(|phase| phase.iter().map(|r| r.name()).collect())
            .collect()
    }

    /// Reduce `state` to a fixed point of the configured rules.
    ///
    /// Every member of `roots` must be live and survives the run.
    pub fn preprocess(&self, state: &mut GraphState, roots: &BTreeSet<PreNode>) -> PreprocessReport {
        let started = Instant::now();
        for &root in roots {
            assert!(
                state.contains(root),
                "preprocess: root pre-node {} is not live",
                root.index()
            );
        }

        let _span = info_span!("preprocess", nodes = state.node_count(), roots = roots.len()).entered();

        let mut indices = Indices::build(state);
        let mut lower_bound = state.max_score().unwrap_or(0.0).max(0.0);
        let mut stats: Vec<Vec<RuleStats>> = self
            .phases
            .iter()
            .enumerate()
            .map(|(i, phase)| phase.iter().map(|r| RuleStats::new(i + 1, r.name())).collect())
            .collect();

        self.dispatcher.emit_run_started(&RunStartedEvent {
            nodes: state.node_count(),
            edges: state.edge_count(),
            roots: roots.len(),
            phases: self.phases.len(),
            lower_bound,
        });

        let mut run = Run {
            state,
            indices: &mut indices,
            roots,
            lower_bound: &mut lower_bound,
        };
        let mut rounds = 0;
        let mut eliminated = 0;
        let mut phase = 0;
        while phase < self.phases.len() {
            let (phase_eliminated, phase_rounds) = self.exhaust_phase(phase, &mut run, &mut stats[phase]);
            rounds += phase_rounds;
            eliminated += phase_eliminated;

            self.dispatcher.emit_phase_exhausted(&PhaseExhaustedEvent {
                phase: phase + 1,
                rounds: phase_rounds,
                eliminated: phase_eliminated,
            });

            if phase_eliminated > 0 && phase > 0 {
                trace!(phase = phase + 1, eliminated = phase_eliminated, "restarting from phase 1");
                phase = 0;
            } else {
                phase += 1;
            }
        }

        let components = run.state.recompute_components();
        let counts = run.state.counts();
        let duration_us = started.elapsed().as_micros() as u64;

        info!(
            nodes = counts.nodes,
            edges = counts.edges,
            components,
            eliminated,
            rounds,
            duration_us,
            "preprocessing complete"
        );
        self.dispatcher.emit_run_complete(&RunCompleteEvent {
            nodes: counts.nodes,
            edges: counts.edges,
            components,
            eliminated,
            rounds,
            duration_us,
        });

        PreprocessReport {
            phases: stats,
            rounds,
            eliminated,
            counts,
            lower_bound,
            duration_us,
        }
    }

    /// Run rounds of `phase` until one eliminates nothing.
    /// Returns (eliminated, rounds).
    fn exhaust_phase(&self, phase: usize, run: &mut Run<'_>, stats: &mut [RuleStats]) -> (usize, usize) {
        let mut eliminated = 0;
        let mut rounds = 0;
        loop {
            if self.index_rebuild == IndexRebuild::PerRound {
                *run.indices = Indices::build(run.state);
            }
            rounds += 1;

            let mut round_eliminated = 0;
            for (rule, stat) in self.phases[phase].iter().zip(stats.iter_mut()) {
                let mut ctx = RuleContext::new(run.state, run.indices, run.roots, run.lower_bound);
                let n = rule.apply(&mut ctx);
                stat.record(n);

                if n > 0 {
                    round_eliminated += n;
                    debug!(
                        phase = phase + 1,
                        rule = rule.name(),
                        eliminated = n,
                        nodes = run.state.node_count(),
                        "rule applied"
                    );
                    self.dispatcher.emit_rule_applied(&RuleAppliedEvent {
                        phase: phase + 1,
                        rule: rule.name(),
                        eliminated: n,
                        nodes_remaining: run.state.node_count(),
                    });
                }
                if self.verify_invariants {
                    run.verify(rule.name());
                }
            }

            eliminated += round_eliminated;
            if round_eliminated == 0 {
                return (eliminated, rounds);
            }
        }
    }
}

impl Default for Scheduler {
    /// The standard two-phase layout.
    fn default() -> Self {
        Self::from_layout(RuleKind::default_phases())
    }
}

impl fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scheduler")
            .field("phases", &self.rule_names())
            .field("index_rebuild", &self.index_rebuild)
            .field("verify_invariants", &self.verify_invariants)
            .field("dispatcher", &self.dispatcher)
            .finish()
    }
}

/// Mutable state threaded through one `preprocess` call.
struct Run<'a> {
    state: &'a mut GraphState,
    indices: &'a mut Indices,
    roots: &'a BTreeSet<PreNode>,
    lower_bound: &'a mut f64,
}

impl Run<'_> {
    fn verify(&self, rule: &str) {
        if let Err(e) = self.state.check_invariants() {
            panic!("invariant violated after {rule}: {e}");
        }
        if let Err(e) = self.indices.verify(self.state) {
            panic!("index out of sync after {rule}: {e}");
        }
        for &root in self.roots {
            assert!(
                self.state.contains(root),
                "{rule} eliminated root pre-node {}",
                root.index()
            );
        }
    }
}

/// Reduce `state` with the default rule layout.
pub fn preprocess(state: &mut GraphState, roots: &BTreeSet<PreNode>) -> PreprocessReport {
    Scheduler::default().preprocess(state, roots)
}
