use serde::{Deserialize, Serialize};

use super::defaults;

/// How satisfied moderator adjustments combine with the base effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CombinationPolicy {
    /// `point + Σ adjustment`.
    #[default]
    Additive,
    /// `point × Π (1 + adjustment)`.
    Multiplicative,
}

/// Moderator engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModerationConfig {
    pub combination: CombinationPolicy,
    /// Adjusted effects are bounded by this multiple of the base CI width.
    pub clip_ci_multiple: f64,
}

impl Default for ModerationConfig {
    fn default() -> Self {
        Self {
            combination: CombinationPolicy::default(),
            clip_ci_multiple: defaults::DEFAULT_CLIP_CI_MULTIPLE,
        }
    }
}
