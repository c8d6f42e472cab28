use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A policy environment entry: a boolean flag or a numeric setting.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PolicyValue {
    Flag(bool),
    Value(f64),
}

impl PolicyValue {
    /// Numeric view: flags map to 0/1.
    pub fn as_number(&self) -> f64 {
        match *self {
            Self::Flag(true) => 1.0,
            Self::Flag(false) => 0.0,
            Self::Value(v) => v,
        }
    }
}

/// Geographic/demographic context for one run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeographicContext {
    pub geography_id: String,
    #[serde(default)]
    pub policy_environment: BTreeMap<String, PolicyValue>,
    /// Population proportions; also the weights used to stratify outcomes.
    #[serde(default)]
    pub demographics: BTreeMap<String, f64>,
    /// Geographic and implementation factors read by moderators.
    #[serde(default)]
    pub characteristics: BTreeMap<String, f64>,
    /// Measured values of structural nodes.
    #[serde(default)]
    pub structural_values: BTreeMap<String, f64>,
    /// Observed baseline of each crisis endpoint.
    #[serde(default)]
    pub baseline_observed_endpoints: BTreeMap<String, f64>,
}

impl GeographicContext {
    pub fn new(geography_id: impl Into<String>) -> Self {
        Self {
            geography_id: geography_id.into(),
            ..Self::default()
        }
    }

    pub fn with_policy(mut self, factor: impl Into<String>, value: PolicyValue) -> Self {
        self.policy_environment.insert(factor.into(), value);
        self
    }

    pub fn with_demographic(mut self, group: impl Into<String>, proportion: f64) -> Self {
        self.demographics.insert(group.into(), proportion);
        self
    }

    pub fn with_characteristic(mut self, factor: impl Into<String>, value: f64) -> Self {
        self.characteristics.insert(factor.into(), value);
        self
    }

    pub fn with_structural(mut self, node_id: impl Into<String>, value: f64) -> Self {
        self.structural_values.insert(node_id.into(), value);
        self
    }

    pub fn with_observed(mut self, node_id: impl Into<String>, value: f64) -> Self {
        self.baseline_observed_endpoints.insert(node_id.into(), value);
        self
    }
}
