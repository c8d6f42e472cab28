use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Diagnostic;

/// Lifecycle of one simulation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimulationPhase {
    Initialized,
    Ramping,
    PostRamp,
    Converged,
    HorizonReached,
}

impl SimulationPhase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Converged | Self::HorizonReached)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Initialized => "initialized",
            Self::Ramping => "ramping",
            Self::PostRamp => "post_ramp",
            Self::Converged => "converged",
            Self::HorizonReached => "horizon_reached",
        }
    }
}

/// Which terminal state a run ended in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Termination {
    /// The system stabilized at `step`.
    Converged { step: u32 },
    /// The horizon ran out first.
    HorizonReached { steps: u32 },
}

impl Termination {
    pub fn steps(&self) -> u32 {
        match *self {
            Self::Converged { step } => step,
            Self::HorizonReached { steps } => steps,
        }
    }

    pub fn converged(&self) -> bool {
        matches!(self, Self::Converged { .. })
    }
}

/// One `(year, node, value)` row of the output trajectory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryPoint {
    pub year: u32,
    pub node_id: String,
    pub value: f64,
}

/// Distribution summary of one endpoint across Monte Carlo draws.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UncertaintySummary {
    pub median: f64,
    pub ci_95: (f64, f64),
    pub mean: f64,
    pub std_dev: f64,
    /// Standard error of the median; shrinks as draws increase.
    pub median_standard_error: f64,
    pub samples: usize,
}

impl UncertaintySummary {
    pub fn ci_width(&self) -> f64 {
        self.ci_95.1 - self.ci_95.0
    }

    pub fn contains(&self, value: f64) -> bool {
        self.ci_95.0 <= value && value <= self.ci_95.1
    }
}

/// Projected outcome at one crisis endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionResult {
    pub node_id: String,
    /// Deterministic (point-estimate) value per step, step 0 = baseline.
    pub trajectory: Vec<f64>,
    /// Final value of every Monte Carlo draw.
    pub posterior_samples: Vec<f64>,
    pub median: f64,
    pub ci_95: (f64, f64),
    pub baseline: f64,
    /// Final point-estimate value minus baseline.
    pub change_from_baseline: f64,
    /// Change converted with the node's unit value, when it has one.
    pub monetized_change: Option<f64>,
    /// Change split by population group weight.
    pub stratified: BTreeMap<String, f64>,
}

/// Calibration facts surfaced to consumers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationSummary {
    pub iterations: usize,
    pub residual: f64,
    pub final_damping: f64,
    /// Max normalized endpoint error of the accepted baseline.
    pub endpoint_error: f64,
}

/// Everything one engine run returns to the API/report layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationOutput {
    pub run_id: Uuid,
    pub geography_id: String,
    pub bank_version: String,
    pub generated_at: DateTime<Utc>,
    pub termination: Termination,
    pub trajectory: Vec<TrajectoryPoint>,
    pub uncertainty: BTreeMap<String, UncertaintySummary>,
    pub projections: Vec<ProjectionResult>,
    pub calibration: CalibrationSummary,
    pub diagnostics: Vec<Diagnostic>,
}

impl SimulationOutput {
    pub fn projection(&self, node_id: &str) -> Option<&ProjectionResult> {
        self.projections.iter().find(|p| p.node_id == node_id)
    }

    pub fn has_diagnostic(&self, kind: &str) -> bool {
        self.diagnostics.iter().any(|d| d.kind() == kind)
    }
}
