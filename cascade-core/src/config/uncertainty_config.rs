use serde::{Deserialize, Serialize};

use super::defaults;

/// Monte Carlo configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UncertaintyConfig {
    /// Draws per propagation when a request does not name a count.
    pub samples: usize,
    /// Base seed; draw `i` uses a stream derived from `(seed, i)`.
    pub seed: u64,
    /// Worker threads. `None` = one per available core.
    pub worker_threads: Option<usize>,
    /// Central interval level reported alongside the median.
    pub ci_level: f64,
}

impl Default for UncertaintyConfig {
    fn default() -> Self {
        Self {
            samples: defaults::DEFAULT_UNCERTAINTY_SAMPLES,
            seed: defaults::DEFAULT_SEED,
            worker_threads: None,
            ci_level: defaults::DEFAULT_CI_LEVEL,
        }
    }
}
