//! Functional-form dispatch. Every form saturates: sigmoid and logarithmic
//! by shape, threshold by construction, multiplicative by an explicit cap,
//! linear through the per-step clip applied by the calculator.

use cascade_core::models::{FunctionalForm, ThresholdDirection};

/// Contribution of one mechanism to its target's implied level.
///
/// `from_max` is the upper bound of the source node's range (sigmoid
/// saturation point); `to_width` is the target's range width (multiplicative cap).
pub fn flow(
    form: &FunctionalForm,
    from: f64,
    to: f64,
    effect: f64,
    from_max: f64,
    to_width: f64,
) -> f64 {
    match *form {
        FunctionalForm::Linear { .. } => effect * from,
        FunctionalForm::Sigmoid => {
            if from_max == 0.0 {
                effect * from
            } else {
                effect * from * (1.0 - from / from_max)
            }
        }
        FunctionalForm::Threshold {
            threshold,
            direction,
        } => {
            let crossed = match direction {
                ThresholdDirection::Above => from >= threshold,
                ThresholdDirection::Below => from <= threshold,
            };
            if crossed {
                effect
            } else {
                0.0
            }
        }
        FunctionalForm::Logarithmic => effect * from.max(0.0).ln_1p(),
        FunctionalForm::Multiplicative => (effect * from * to).clamp(-to_width, to_width),
    }
}
