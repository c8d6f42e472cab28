//! Per-mechanism effect distributions, chosen once when a propagation starts.

use cascade_bank::MechanismBank;
use cascade_core::models::Mechanism;
use rand::distributions::Distribution;
use rand::seq::SliceRandom;
use rand::Rng;
use statrs::distribution::Normal;

/// Where a mechanism's Monte Carlo draws come from.
#[derive(Debug, Clone, PartialEq)]
pub enum EffectDistribution {
    /// Zero-width interval: every draw is the point estimate.
    Fixed(f64),
    /// `Normal(point, se)` with `se` backed out of the 95% CI.
    Normal(Normal),
    /// Resampled uniformly from stored posterior samples. An empty set draws zero.
    Empirical(Vec<f64>),
}

impl EffectDistribution {
    pub fn from_mechanism(mechanism: &Mechanism) -> Self {
        if let Some(samples) = mechanism.posterior_samples.as_ref().filter(|s| !s.is_empty()) {
            return Self::Empirical(samples.clone());
        }
        let effect = &mechanism.base_effect;
        let se = effect.standard_error();
        if se > 0.0 {
            if let Ok(normal) = Normal::new(effect.point, se) {
                return Self::Normal(normal);
            }
        }
        Self::Fixed(effect.point)
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        match self {
            Self::Fixed(value) => *value,
            Self::Normal(normal) => normal.sample(rng),
            Self::Empirical(samples) => samples.choose(rng).copied().unwrap_or(0.0),
        }
    }

    pub fn is_parametric(&self) -> bool {
        matches!(self, Self::Normal(_))
    }
}

/// Distributions for every mechanism of a bank, in mechanism order.
#[derive(Debug, Clone)]
pub struct EffectSampler {
    distributions: Vec<EffectDistribution>,
}

impl EffectSampler {
    pub fn for_bank(bank: &MechanismBank) -> Self {
        Self {
            distributions: bank
                .mechanisms()
                .iter()
                .map(EffectDistribution::from_mechanism)
                .collect(),
        }
    }

    pub fn distribution(&self, mechanism: usize) -> &EffectDistribution {
        &self.distributions[mechanism]
    }

    /// One base effect per mechanism, before moderation.
    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<f64> {
        self.distributions.iter().map(|d| d.sample(rng)).collect()
    }
}
