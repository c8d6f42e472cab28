//! Property tests for summaries, stratification and effect sampling.

use std::collections::BTreeMap;

use proptest::prelude::*;

use cascade_core::models::{EffectSize, FunctionalForm, Mechanism};
use cascade_uncertainty::{draw_rng, stratify, summarize, EffectDistribution, EffectSampler};

proptest! {
    #[test]
    fn interval_brackets_the_median(
        samples in prop::collection::vec(-1.0e6f64..1.0e6, 1..200),
        level in 0.5f64..0.99,
    ) {
        let summary = summarize(&samples, level).unwrap();
        let min = samples.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = samples.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        prop_assert!(summary.ci_95.0 <= summary.median + 1e-9);
        prop_assert!(summary.median <= summary.ci_95.1 + 1e-9);
        prop_assert!(summary.ci_95.0 >= min - 1e-9);
        prop_assert!(summary.ci_95.1 <= max + 1e-9);
        prop_assert!(summary.std_dev >= 0.0);
    }

    #[test]
    fn stratified_change_sums_to_the_total(
        change in -1.0e4f64..1.0e4,
        weights in prop::collection::btree_map("[a-z]{1,6}", 0.01f64..10.0, 1..8),
    ) {
        let split = stratify(change, &weights);
        let total: f64 = split.values().sum();
        prop_assert_eq!(split.len(), weights.len());
        prop_assert!((total - change).abs() <= 1e-9 * change.abs().max(1.0));
    }

    #[test]
    fn draws_are_a_pure_function_of_seed_and_index(
        seed in any::<u64>(),
        index in 0usize..10_000,
        points in prop::collection::vec((0.1f64..10.0, 0.0f64..0.5), 1..10),
    ) {
        let mechanisms: Vec<Mechanism> = points
            .iter()
            .enumerate()
            .map(|(i, &(point, fraction))| {
                Mechanism::new(
                    format!("m{i}"),
                    "a",
                    "b",
                    FunctionalForm::Sigmoid,
                    EffectSize::with_relative_ci(point, fraction),
                )
            })
            .collect();
        let distributions: Vec<EffectDistribution> =
            mechanisms.iter().map(EffectDistribution::from_mechanism).collect();

        let mut first = draw_rng(seed, index);
        let mut second = draw_rng(seed, index);
        for dist in &distributions {
            let a = dist.sample(&mut first);
            let b = dist.sample(&mut second);
            prop_assert!(a.is_finite());
            prop_assert_eq!(a.to_bits(), b.to_bits());
        }
    }
}

#[test]
fn empty_weights_split_nothing() {
    assert!(stratify(3.0, &BTreeMap::new()).is_empty());
}

#[test]
fn sampler_covers_every_fixture_mechanism() {
    let document: cascade_bank::BankDocument =
        test_fixtures::load_fixture("banks/regional_cascade.json");
    let bank = cascade_bank::MechanismBank::from_document(document).unwrap();
    let sampler = EffectSampler::for_bank(&bank);
    let draw = sampler.draw(&mut draw_rng(0, 0));
    assert_eq!(draw.len(), bank.mechanism_count());
    let er = bank.mechanism_index_of("homelessness_to_er").unwrap();
    assert!(matches!(
        sampler.distribution(er),
        EffectDistribution::Empirical(_)
    ));
}
