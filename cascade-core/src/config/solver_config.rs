use serde::{Deserialize, Serialize};

use super::defaults;

/// Equilibrium solver configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Convergence tolerance in node-normalized units.
    pub tolerance: f64,
    /// Iteration cap for the damped refinement loop.
    pub max_iterations: usize,
    /// Damping applied to refinement steps before any oscillation.
    pub initial_damping: f64,
    /// Floor below which damping is no longer halved.
    pub min_damping: f64,
    /// Finite-difference step for the Jacobian, node-normalized.
    pub finite_difference_step: f64,
    /// Singular values below this are treated as zero in the pseudo-inverse.
    pub singular_value_epsilon: f64,
    /// Extra initial guesses (fractions of each range) used to search for multiple equilibria.
    pub alternate_guesses: Vec<f64>,
    /// Wall-clock budget for one calibration. `None` = unbounded.
    pub time_budget_ms: Option<u64>,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            tolerance: defaults::DEFAULT_SOLVER_TOLERANCE,
            max_iterations: defaults::DEFAULT_MAX_ITERATIONS,
            initial_damping: defaults::DEFAULT_INITIAL_DAMPING,
            min_damping: defaults::DEFAULT_MIN_DAMPING,
            finite_difference_step: defaults::DEFAULT_FINITE_DIFFERENCE_STEP,
            singular_value_epsilon: defaults::DEFAULT_SINGULAR_VALUE_EPSILON,
            alternate_guesses: defaults::DEFAULT_ALTERNATE_GUESSES.to_vec(),
            time_budget_ms: None,
        }
    }
}
