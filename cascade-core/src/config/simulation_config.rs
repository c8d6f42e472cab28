use serde::{Deserialize, Serialize};

use super::defaults;

/// Time simulator configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Convergence tolerance on max |ΔS|, node-normalized.
    pub tolerance: f64,
    /// Horizon used when a request does not name one.
    pub default_time_horizon: u32,
    /// Consecutive sub-tolerance steps required to declare convergence.
    pub convergence_window: u32,
    /// Recompute only mechanisms whose inputs changed since the previous step.
    pub sparse_evaluation: bool,
    /// Wall-clock budget for one run. `None` = unbounded.
    pub time_budget_ms: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            tolerance: defaults::DEFAULT_SIMULATION_TOLERANCE,
            default_time_horizon: defaults::DEFAULT_TIME_HORIZON,
            convergence_window: defaults::DEFAULT_CONVERGENCE_WINDOW,
            sparse_evaluation: defaults::DEFAULT_SPARSE_EVALUATION,
            time_budget_ms: None,
        }
    }
}
