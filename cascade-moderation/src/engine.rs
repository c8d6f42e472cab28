use cascade_bank::MechanismBank;
use cascade_core::config::ModerationConfig;
use cascade_core::models::{Diagnostic, GeographicContext, Mechanism};
use tracing::debug;

use crate::{conditions, policy};

/// One mechanism's effect after moderation.
#[derive(Debug, Clone, PartialEq)]
pub struct AdjustedEffect {
    pub value: f64,
    /// Combined value before the plausibility bound was applied.
    pub raw: f64,
    /// Number of moderators that fired.
    pub applied: usize,
    /// Plausibility bound in force, if any.
    pub bound: Option<f64>,
    pub clipped: bool,
}

/// Adjusted effects for a whole bank, indexed like `bank.mechanisms()`.
#[derive(Debug, Clone, Default)]
pub struct ModeratedEffects {
    pub effects: Vec<f64>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Applies moderators to mechanism effects for a given context.
#[derive(Debug, Clone, Default)]
pub struct ModeratorEngine {
    config: ModerationConfig,
}

impl ModeratorEngine {
    pub fn new(config: ModerationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ModerationConfig {
        &self.config
    }

    /// Adjust a mechanism's point estimate for `ctx`.
    pub fn adjust(&self, mechanism: &Mechanism, ctx: &GeographicContext) -> AdjustedEffect {
        self.adjust_from(mechanism, mechanism.base_effect.point, ctx)
    }

    /// Re-apply the mechanism's moderators to an arbitrary base value (a
    /// Monte Carlo draw). Same policy and bound, no diagnostics.
    pub fn adjust_value(&self, mechanism: &Mechanism, base: f64, ctx: &GeographicContext) -> f64 {
        self.adjust_from(mechanism, base, ctx).value
    }

    fn adjust_from(&self, mechanism: &Mechanism, base: f64, ctx: &GeographicContext) -> AdjustedEffect {
        let applied = mechanism
            .moderators
            .iter()
            .filter(|m| conditions::is_satisfied(m, ctx))
            .count();
        let raw = policy::combine(
            self.config.combination,
            base,
            conditions::satisfied_adjustments(&mechanism.moderators, ctx),
        );
        let bound = policy::clip_bound(&mechanism.base_effect, self.config.clip_ci_multiple);
        let (value, clipped) = policy::clip(raw, bound);
        AdjustedEffect {
            value,
            raw,
            applied,
            bound,
            clipped,
        }
    }

    /// Adjust every mechanism in the bank. Each clip yields a
    /// `ModeratorClipped` diagnostic.
    pub fn adjust_bank(&self, bank: &MechanismBank, ctx: &GeographicContext) -> ModeratedEffects {
        let mut out = ModeratedEffects {
            effects: Vec::with_capacity(bank.mechanism_count()),
            diagnostics: Vec::new(),
        };
        for mechanism in bank.mechanisms() {
            let adjusted = self.adjust(mechanism, ctx);
            if adjusted.applied > 0 {
                debug!(
                    mechanism_id = %mechanism.id,
                    base = mechanism.base_effect.point,
                    adjusted = adjusted.value,
                    moderators = adjusted.applied,
                    "moderators applied"
                );
            }
            if adjusted.clipped {
                let bound = adjusted.bound.unwrap_or(adjusted.value.abs());
                out.diagnostics.push(Diagnostic::ModeratorClipped {
                    mechanism_id: mechanism.id.clone(),
                    raw_effect: adjusted.raw,
                    clipped_effect: adjusted.value,
                    bound,
                });
            }
            out.effects.push(adjusted.value);
        }
        out
    }
}
