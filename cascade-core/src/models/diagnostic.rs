use serde::{Deserialize, Serialize};

/// Non-fatal findings attached to a run's result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Diagnostic {
    /// Two initial guesses converged to materially different baselines.
    MultipleEquilibriaDetected {
        /// Node with the largest relative disagreement.
        node_id: String,
        chosen_value: f64,
        alternate_value: f64,
        relative_difference: f64,
        /// Endpoint error of the solution that was kept.
        chosen_error: f64,
        alternate_error: f64,
    },
    /// Moderator stacking exceeded the plausibility bound.
    ModeratorClipped {
        mechanism_id: String,
        raw_effect: f64,
        clipped_effect: f64,
        bound: f64,
    },
}

impl Diagnostic {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MultipleEquilibriaDetected { .. } => "multiple_equilibria_detected",
            Self::ModeratorClipped { .. } => "moderator_clipped",
        }
    }
}
