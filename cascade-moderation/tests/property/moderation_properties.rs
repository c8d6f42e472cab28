//! Property tests for the moderator engine.

use proptest::prelude::*;

use cascade_core::config::{CombinationPolicy, ModerationConfig};
use cascade_core::models::{
    EffectSize, FunctionalForm, GeographicContext, Mechanism, Moderator, ModeratorCondition,
    ModeratorKind,
};
use cascade_moderation::ModeratorEngine;

fn build(point: f64, half_width: f64, adjustments: &[f64]) -> (Mechanism, GeographicContext) {
    let mut m = Mechanism::new(
        "m",
        "A",
        "B",
        FunctionalForm::Sigmoid,
        EffectSize::new(point, point - half_width, point + half_width),
    );
    let mut ctx = GeographicContext::new("g");
    for (i, &adjustment) in adjustments.iter().enumerate() {
        let factor = format!("f{i}");
        m.moderators.push(Moderator {
            kind: ModeratorKind::Geographic,
            factor: factor.clone(),
            condition: ModeratorCondition::Above { threshold: 0.5 },
            adjustment,
        });
        ctx = ctx.with_characteristic(factor, 1.0);
    }
    (m, ctx)
}

proptest! {
    #[test]
    fn adjusted_effect_never_exceeds_bound(
        point in -5.0_f64..5.0,
        half_width in 0.01_f64..2.0,
        adjustments in prop::collection::vec(-10.0_f64..10.0, 0..6),
        multiplicative in any::<bool>(),
    ) {
        let (m, ctx) = build(point, half_width, &adjustments);
        let config = ModerationConfig {
            combination: if multiplicative {
                CombinationPolicy::Multiplicative
            } else {
                CombinationPolicy::Additive
            },
            ..ModerationConfig::default()
        };
        let adjusted = ModeratorEngine::new(config).adjust(&m, &ctx);
        let bound = 5.0 * m.base_effect.ci_width();
        prop_assert!(adjusted.value.abs() <= bound + 1e-9);
        prop_assert_eq!(adjusted.clipped, adjusted.raw.abs() > bound);
    }

    #[test]
    fn no_satisfied_moderators_leaves_point(
        point in -5.0_f64..5.0,
        half_width in 0.5_f64..2.0,
        adjustments in prop::collection::vec(-10.0_f64..10.0, 0..6),
    ) {
        let (m, _) = build(point, half_width, &adjustments);
        let adjusted = ModeratorEngine::default().adjust(&m, &GeographicContext::new("empty"));
        prop_assert_eq!(adjusted.value, point);
        prop_assert_eq!(adjusted.applied, 0);
    }
}
