//! Combination of satisfied adjustments and the plausibility bound.

use cascade_core::config::CombinationPolicy;
use cascade_core::models::EffectSize;

/// Combine a base value with satisfied adjustments.
pub fn combine(policy: CombinationPolicy, base: f64, adjustments: impl Iterator<Item = f64>) -> f64 {
    match policy {
        CombinationPolicy::Additive => base + adjustments.sum::<f64>(),
        CombinationPolicy::Multiplicative => {
            base * adjustments.map(|a| 1.0 + a).product::<f64>()
        }
    }
}

/// Largest admissible |adjusted effect|: `multiple × CI width`, falling back
/// to `multiple × |point|` for a degenerate interval. `None` means unbounded.
pub fn clip_bound(effect: &EffectSize, multiple: f64) -> Option<f64> {
    let width = effect.ci_width();
    let bound = if width > 0.0 {
        multiple * width
    } else {
        multiple * effect.point.abs()
    };
    (bound > 0.0).then_some(bound)
}

/// Clamp `value` into `[-bound, bound]`. Returns the value and whether it moved.
pub fn clip(value: f64, bound: Option<f64>) -> (f64, bool) {
    match bound {
        Some(b) if value.abs() > b => (value.clamp(-b, b), true),
        _ => (value, false),
    }
}
