//! Preprocessing configuration: rule layout, index policy, verification.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_LABEL_SEPARATOR;
use crate::errors::ConfigError;

/// Every reduction rule the engine knows, by configuration name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    NegDeg01,
    PosEdge,
    NegEdge,
    NegCircuit,
    NegDiamond,
    PosDeg01,
    PosDiamond,
    NegMirroredHubs,
    NegBicomponent,
    NegTricomponent,
}

impl RuleKind {
    pub const ALL: [RuleKind; 10] = [
        Self::NegDeg01,
        Self::PosEdge,
        Self::NegEdge,
        Self::NegCircuit,
        Self::NegDiamond,
        Self::PosDeg01,
        Self::PosDiamond,
        Self::NegMirroredHubs,
        Self::NegBicomponent,
        Self::NegTricomponent,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::NegDeg01 => "neg_deg01",
            Self::PosEdge => "pos_edge",
            Self::NegEdge => "neg_edge",
            Self::NegCircuit => "neg_circuit",
            Self::NegDiamond => "neg_diamond",
            Self::PosDeg01 => "pos_deg01",
            Self::PosDiamond => "pos_diamond",
            Self::NegMirroredHubs => "neg_mirrored_hubs",
            Self::NegBicomponent => "neg_bicomponent",
            Self::NegTricomponent => "neg_tricomponent",
        }
    }

    /// The default phase layout: cheap local rules first, global rules second.
    ///
    /// Phase 2 runs all three global rules. A lighter layout that keeps only
    /// `neg_mirrored_hubs` in phase 2 is available through `preprocess.phases`.
    pub fn default_phases() -> Vec<Vec<RuleKind>> {
        vec![
            vec![
                Self::NegDeg01,
                Self::PosEdge,
                Self::NegEdge,
                Self::NegCircuit,
                Self::NegDiamond,
                Self::PosDeg01,
                Self::PosDiamond,
            ],
            vec![
                Self::NegMirroredHubs,
                Self::NegBicomponent,
                Self::NegTricomponent,
            ],
        ]
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RuleKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| ConfigError::UnknownRule {
                name: s.to_string(),
            })
    }
}

/// When the scheduler rebuilds the degree and neighbor indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum IndexRebuild {
    /// Rebuild before every round of a phase.
    #[default]
    PerRound,
    /// Build once per `preprocess()` call; rules keep them in step.
    PerRun,
}

impl FromStr for IndexRebuild {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "per_round" => Ok(Self::PerRound),
            "per_run" => Ok(Self::PerRun),
            other => Err(ConfigError::ValidationFailed {
                field: "preprocess.index_rebuild".to_string(),
                message: format!("expected per_round or per_run, got {other}"),
            }),
        }
    }
}

/// Configuration for the preprocessing subsystem.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PreprocessConfig {
    /// Separator between labels of merged nodes. Default: tab.
    pub label_separator: Option<String>,
    /// Index rebuild policy. Default: per_round.
    pub index_rebuild: Option<IndexRebuild>,
    /// Check every bookkeeping invariant after each rule application. Default: false.
    pub verify_invariants: Option<bool>,
    /// Rule layout, one list per phase. Default: [`RuleKind::default_phases`].
    pub phases: Option<Vec<Vec<RuleKind>>>,
}

impl PreprocessConfig {
    pub fn effective_label_separator(&self) -> &str {
        self.label_separator
            .as_deref()
            .unwrap_or(DEFAULT_LABEL_SEPARATOR)
    }

    pub fn effective_index_rebuild(&self) -> IndexRebuild {
        self.index_rebuild.unwrap_or_default()
    }

    pub fn effective_verify_invariants(&self) -> bool {
        self.verify_invariants.unwrap_or(false)
    }

    pub fn effective_phases(&self) -> Vec<Vec<RuleKind>> {
        self.phases.clone().unwrap_or_else(RuleKind::default_phases)
    }

    /// Validate the configured values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(sep) = &self.label_separator {
            if sep.is_empty() {
                return Err(ConfigError::ValidationFailed {
                    field: "preprocess.label_separator".to_string(),
                    message: "must not be empty".to_string(),
                });
            }
        }
        if let Some(phases) = &self.phases {
            if phases.is_empty() {
                return Err(ConfigError::ValidationFailed {
                    field: "preprocess.phases".to_string(),
                    message: "at least one phase is required".to_string(),
                });
            }
            let mut seen = Vec::new();
            for (i, phase) in phases.iter().enumerate() {
                if phase.is_empty() {
                    return Err(ConfigError::ValidationFailed {
                        field: format!("preprocess.phases[{i}]"),
                        message: "a phase must name at least one rule".to_string(),
                    });
                }
                for kind in phase {
                    if seen.contains(kind) {
                        return Err(ConfigError::ValidationFailed {
                            field: format!("preprocess.phases[{i}]"),
                            message: format!("rule {kind} is listed more than once"),
                        });
                    }
                    seen.push(*kind);
                }
            }
        }
        Ok(())
    }
}
