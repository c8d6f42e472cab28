//! Property tests for the calculator and time simulator.

use proptest::prelude::*;

use cascade_bank::{BankDocument, MechanismBank};
use cascade_core::config::SimulationConfig;
use cascade_core::models::{GeographicContext, InterventionSpec};
use cascade_core::CancellationToken;
use cascade_moderation::ModeratorEngine;
use cascade_solver::{derive_residuals, CascadeCalculator, FlowCache, TimeSimulator};
use test_fixtures::load_fixture;

fn bank_and_effects(name: &str) -> (MechanismBank, Vec<f64>) {
    let document: BankDocument = load_fixture(&format!("banks/{name}.json"));
    let bank = MechanismBank::from_document(document).unwrap();
    let ctx: GeographicContext = load_fixture(&format!("contexts/{name}.json"));
    let effects = ModeratorEngine::new(Default::default())
        .adjust_bank(&bank, &ctx)
        .effects;
    (bank, effects)
}

/// A state drawn uniformly within every node's range.
fn state_in_range(bank: &MechanismBank, fractions: &[f64]) -> Vec<f64> {
    bank.nodes()
        .iter()
        .zip(fractions.iter().cycle())
        .map(|(n, &f)| n.valid_range.at_fraction(f))
        .collect()
}

const FIXTURES: [&str; 4] = ["three_node", "log_chain", "feedback_loop", "regional_cascade"];

proptest! {
    #[test]
    fn trajectories_stay_within_valid_ranges(
        fixture in 0..FIXTURES.len(),
        start in prop::collection::vec(0.0f64..=1.0, 6),
        to_fraction in 0.0f64..=1.0,
        ramp_years in 0u32..6,
        horizon in 1u32..25,
    ) {
        let (bank, effects) = bank_and_effects(FIXTURES[fixture]);
        let baseline = state_in_range(&bank, &start);
        let residuals = derive_residuals(&bank, &effects, &baseline).unwrap();
        let target = bank.structural()[0];
        let node = bank.node(target);
        let spec = InterventionSpec::linear(
            node.id.clone(),
            baseline[target],
            node.valid_range.at_fraction(to_fraction),
            ramp_years,
            horizon,
        );
        let run = TimeSimulator::new(&bank, &SimulationConfig::default())
            .run(&baseline, &residuals, &effects, &spec, &CancellationToken::new())
            .unwrap();

        prop_assert!(run.states.len() as u32 <= horizon + 1);
        for state in &run.states {
            for (j, &value) in state.iter().enumerate() {
                prop_assert!(value.is_finite());
                prop_assert!(bank.node(j).valid_range.contains(value));
            }
        }
    }

    #[test]
    fn sparse_flows_match_dense_flows(
        fixture in 0..FIXTURES.len(),
        walk in prop::collection::vec(prop::collection::vec(0.0f64..=1.0, 6), 1..6),
    ) {
        let (bank, effects) = bank_and_effects(FIXTURES[fixture]);
        let residuals = vec![0.0; bank.node_count()];
        let calculator = CascadeCalculator::new(&bank, &effects, &residuals).unwrap();
        let mut cache = FlowCache::new(bank.mechanism_count());
        for fractions in &walk {
            let state = state_in_range(&bank, fractions);
            prop_assert_eq!(cache.flows(&calculator, &state), calculator.flows(&state));
        }
    }

    #[test]
    fn derived_residuals_make_any_state_steady(
        fixture in 0..FIXTURES.len(),
        fractions in prop::collection::vec(0.0f64..=1.0, 6),
    ) {
        let (bank, effects) = bank_and_effects(FIXTURES[fixture]);
        let state = state_in_range(&bank, &fractions);
        let residuals = derive_residuals(&bank, &effects, &state).unwrap();
        let calculator = CascadeCalculator::new(&bank, &effects, &residuals).unwrap();
        for flow in calculator.flows(&state) {
            prop_assert!(flow.abs() < 1e-9);
        }
    }
}
