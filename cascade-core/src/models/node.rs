use serde::{Deserialize, Serialize};

use crate::config::defaults;

/// Role a node plays in calibration and simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    /// Externally measured capacity; fixed during calibration, the only kind an
    /// intervention may target.
    Structural,
    /// Unobserved stock solved for by calibration.
    Intermediate,
    /// Observable, monetizable outcome that anchors calibration.
    CrisisEndpoint,
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Structural => "structural",
            Self::Intermediate => "intermediate",
            Self::CrisisEndpoint => "crisis_endpoint",
        }
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Semantic unit of a node's value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Unit {
    Count,
    Rate,
    /// Dimensionless index in [0, 1].
    Index,
    Currency,
    Other(String),
}

/// How a node's baseline value is obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Measurement {
    Observed,
    StructuralInput,
    Calibrated,
}

/// Closed interval a node's value must stay inside.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValidRange {
    pub min: f64,
    pub max: f64,
}

impl ValidRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// A range is usable when both bounds are finite and `min < max`.
    pub fn is_valid(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min < self.max
    }

    pub fn width(&self) -> f64 {
        self.max - self.min
    }

    pub fn midpoint(&self) -> f64 {
        self.min + 0.5 * self.width()
    }

    /// Value at `fraction` of the way from `min` to `max`.
    pub fn at_fraction(&self, fraction: f64) -> f64 {
        self.min + fraction * self.width()
    }

    pub fn contains(&self, value: f64) -> bool {
        (self.min..=self.max).contains(&value)
    }

    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }
}

/// A stock tracked by the network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    pub kind: NodeKind,
    pub unit: Unit,
    pub measurement: Measurement,
    pub valid_range: ValidRange,
    /// Fraction of the gap to the mechanism-implied level closed per step, in (0, 1].
    #[serde(default = "default_adjustment_rate")]
    pub adjustment_rate: f64,
    /// Fallback value for structural nodes the context does not measure.
    #[serde(default)]
    pub baseline_value: Option<f64>,
    /// Monetary value of one unit of this stock.
    #[serde(default)]
    pub unit_value: Option<f64>,
    #[serde(default)]
    pub label: Option<String>,
}

fn default_adjustment_rate() -> f64 {
    defaults::DEFAULT_ADJUSTMENT_RATE
}

impl Node {
    /// Minimal constructor; optional fields take their defaults.
    pub fn new(id: impl Into<String>, kind: NodeKind, min: f64, max: f64) -> Self {
        let measurement = match kind {
            NodeKind::Structural => Measurement::StructuralInput,
            NodeKind::Intermediate => Measurement::Calibrated,
            NodeKind::CrisisEndpoint => Measurement::Observed,
        };
        Self {
            id: id.into(),
            kind,
            unit: Unit::Count,
            measurement,
            valid_range: ValidRange::new(min, max),
            adjustment_rate: defaults::DEFAULT_ADJUSTMENT_RATE,
            baseline_value: None,
            unit_value: None,
            label: None,
        }
    }

    /// Structural nodes are never moved by flows.
    pub fn is_fixed(&self) -> bool {
        self.kind == NodeKind::Structural
    }

    /// Value normalized by the range width (not shifted), used for tolerances.
    pub fn normalized(&self, delta: f64) -> f64 {
        delta / self.valid_range.width()
    }
}
