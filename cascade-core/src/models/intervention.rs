use serde::{Deserialize, Serialize};

/// Fraction of the full intervention change applied at each step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RampSchedule {
    /// Equal increments reaching the full change after `ramp_years` steps.
    /// Zero applies the full change at step 1.
    Linear { ramp_years: u32 },
    /// Explicit fraction for steps 1..=n; the last fraction holds afterwards.
    Explicit { fractions: Vec<f64> },
}

impl RampSchedule {
    /// Active fraction at `step` (1-based). Step 0 is the baseline.
    pub fn fraction_at(&self, step: u32) -> f64 {
        if step == 0 {
            return 0.0;
        }
        match self {
            Self::Linear { ramp_years: 0 } => 1.0,
            Self::Linear { ramp_years } => (f64::from(step) / f64::from(*ramp_years)).min(1.0),
            Self::Explicit { fractions } => {
                let idx = usize::try_from(step - 1).unwrap_or(usize::MAX);
                fractions
                    .get(idx)
                    .or_else(|| fractions.last())
                    .copied()
                    .unwrap_or(1.0)
            }
        }
    }

    /// Last step during which the applied fraction can still change.
    pub fn ramp_end(&self) -> u32 {
        match self {
            Self::Linear { ramp_years } => (*ramp_years).max(1),
            Self::Explicit { fractions } => {
                u32::try_from(fractions.len()).unwrap_or(u32::MAX).max(1)
            }
        }
    }
}

/// A change to one structural stock, phased in over time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterventionSpec {
    pub target_node: String,
    pub from_value: f64,
    pub to_value: f64,
    pub ramp_schedule: RampSchedule,
    /// Number of annual steps to simulate.
    pub time_horizon: u32,
}

impl InterventionSpec {
    /// Linear ramp over `ramp_years`.
    pub fn linear(
        target_node: impl Into<String>,
        from_value: f64,
        to_value: f64,
        ramp_years: u32,
        time_horizon: u32,
    ) -> Self {
        Self {
            target_node: target_node.into(),
            from_value,
            to_value,
            ramp_schedule: RampSchedule::Linear { ramp_years },
            time_horizon,
        }
    }

    /// Target value at `step`.
    pub fn value_at(&self, step: u32) -> f64 {
        let fraction = self.ramp_schedule.fraction_at(step);
        self.from_value + fraction * (self.to_value - self.from_value)
    }
}

/// Intervention as received from the API layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterventionRequest {
    pub target_node: String,
    pub from_value: f64,
    pub to_value: f64,
    pub ramp_years: u32,
}

/// One engine invocation as received from the API layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationRequest {
    pub geography_id: String,
    pub intervention: InterventionRequest,
    /// Steps to simulate; `None` uses the configured default.
    #[serde(default)]
    pub time_horizon: Option<u32>,
    /// Monte Carlo draws; `None` uses the configured default, `Some(0)` skips
    /// uncertainty propagation.
    #[serde(default)]
    pub uncertainty_samples: Option<usize>,
}

impl SimulationRequest {
    /// Build the simulator's intervention spec.
    pub fn intervention_spec(&self, default_horizon: u32) -> InterventionSpec {
        InterventionSpec::linear(
            self.intervention.target_node.clone(),
            self.intervention.from_value,
            self.intervention.to_value,
            self.intervention.ramp_years,
            self.time_horizon.unwrap_or(default_horizon),
        )
    }
}
