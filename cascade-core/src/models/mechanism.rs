use serde::{Deserialize, Serialize};

use crate::config::defaults;
use crate::constants::Z_95;

/// Which side of the threshold counts as "crossed".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThresholdDirection {
    #[default]
    Above,
    Below,
}

/// Functional form of a mechanism, with its parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "form", rename_all = "snake_case")]
pub enum FunctionalForm {
    /// `effect × from`; per-step change of the target is capped at
    /// `max_step_fraction` of its range.
    Linear {
        #[serde(default = "default_max_step_fraction")]
        max_step_fraction: f64,
    },
    /// `effect × from × (1 − from / from.max)`.
    Sigmoid,
    /// `effect` once `from` crosses `threshold`, otherwise 0.
    Threshold {
        threshold: f64,
        #[serde(default)]
        direction: ThresholdDirection,
    },
    /// `effect × ln(1 + from)`.
    Logarithmic,
    /// `effect × from × to`, capped by the target's range.
    Multiplicative,
}

fn default_max_step_fraction() -> f64 {
    defaults::DEFAULT_LINEAR_MAX_STEP_FRACTION
}

impl FunctionalForm {
    /// Linear form with the default per-step clip.
    pub fn linear() -> Self {
        Self::Linear {
            max_step_fraction: defaults::DEFAULT_LINEAR_MAX_STEP_FRACTION,
        }
    }

    /// Forms allowed on edges that participate in a feedback loop.
    pub fn is_self_limiting(&self) -> bool {
        !matches!(self, Self::Multiplicative)
    }

    /// Whether the contribution depends on the target's current value.
    pub fn reads_target(&self) -> bool {
        matches!(self, Self::Multiplicative)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Linear { .. } => "linear",
            Self::Sigmoid => "sigmoid",
            Self::Threshold { .. } => "threshold",
            Self::Logarithmic => "logarithmic",
            Self::Multiplicative => "multiplicative",
        }
    }
}

/// Point estimate with its 95% confidence interval.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EffectSize {
    pub point: f64,
    pub ci_lower: f64,
    pub ci_upper: f64,
}

impl EffectSize {
    pub fn new(point: f64, ci_lower: f64, ci_upper: f64) -> Self {
        Self {
            point,
            ci_lower,
            ci_upper,
        }
    }

    /// Symmetric interval of `±fraction × |point|`.
    pub fn with_relative_ci(point: f64, fraction: f64) -> Self {
        let half = (point * fraction).abs();
        Self::new(point, point - half, point + half)
    }

    pub fn ci_width(&self) -> f64 {
        self.ci_upper - self.ci_lower
    }

    /// Normal standard error implied by the 95% interval.
    pub fn standard_error(&self) -> f64 {
        self.ci_width() / (2.0 * Z_95)
    }
}

/// Context dimension a moderator reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModeratorKind {
    Policy,
    Demographic,
    Geographic,
    Implementation,
}

/// When a moderator's factor counts as satisfied.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "when", rename_all = "snake_case")]
pub enum ModeratorCondition {
    /// Factor present and truthy (non-zero).
    #[default]
    Present,
    /// Factor absent or zero.
    Absent,
    /// Factor strictly above `threshold`.
    Above { threshold: f64 },
    /// Factor strictly below `threshold`.
    Below { threshold: f64 },
}

/// Contextual adjustment to a mechanism's effect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Moderator {
    pub kind: ModeratorKind,
    pub factor: String,
    #[serde(default)]
    pub condition: ModeratorCondition,
    /// Added to the effect on its native scale (or `×(1 + adjustment)` under
    /// the multiplicative policy).
    pub adjustment: f64,
}

/// A directed causal edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mechanism {
    pub id: String,
    pub from_node: String,
    pub to_node: String,
    pub functional_form: FunctionalForm,
    pub base_effect: EffectSize,
    #[serde(default)]
    pub moderators: Vec<Moderator>,
    /// Empirical posterior draws; when present, Monte Carlo resamples these
    /// instead of the Normal implied by the CI.
    #[serde(default)]
    pub posterior_samples: Option<Vec<f64>>,
}

impl Mechanism {
    /// Minimal constructor with no moderators and no posterior.
    pub fn new(
        id: impl Into<String>,
        from_node: impl Into<String>,
        to_node: impl Into<String>,
        functional_form: FunctionalForm,
        base_effect: EffectSize,
    ) -> Self {
        Self {
            id: id.into(),
            from_node: from_node.into(),
            to_node: to_node.into(),
            functional_form,
            base_effect,
            moderators: Vec::new(),
            posterior_samples: None,
        }
    }
}
