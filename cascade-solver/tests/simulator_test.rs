//! Time-stepped intervention runs from a calibrated baseline.

use cascade_bank::{BankDocument, MechanismBank};
use cascade_core::config::{ModerationConfig, SimulationConfig, SolverConfig};
use cascade_core::errors::{CascadeError, ContextError, SimulationError};
use cascade_core::models::{
    GeographicContext, InterventionSpec, RampSchedule, SimulationPhase, Termination,
};
use cascade_core::CancellationToken;
use cascade_moderation::ModeratorEngine;
use cascade_solver::{resolve_intervention, Anchors, Baseline, EquilibriumSolver, TimeSimulator};
use test_fixtures::load_fixture;

// ── Helpers ──────────────────────────────────────────────────────────────

struct Prepared {
    bank: MechanismBank,
    effects: Vec<f64>,
    baseline: Baseline,
}

fn prepare(name: &str) -> Prepared {
    let document: BankDocument = load_fixture(&format!("banks/{name}.json"));
    let bank = MechanismBank::from_document(document).unwrap();
    let ctx: GeographicContext = load_fixture(&format!("contexts/{name}.json"));
    let effects = ModeratorEngine::new(ModerationConfig::default())
        .adjust_bank(&bank, &ctx)
        .effects;
    let anchors = Anchors::from_context(&bank, &ctx).unwrap();
    let baseline = EquilibriumSolver::new(&bank, &SolverConfig::default())
        .solve(&effects, &anchors, &CancellationToken::new())
        .unwrap();
    Prepared {
        bank,
        effects,
        baseline,
    }
}

fn run(
    p: &Prepared,
    config: &SimulationConfig,
    spec: &InterventionSpec,
) -> Result<cascade_solver::SimulationRun, CascadeError> {
    TimeSimulator::new(&p.bank, config).run(
        &p.baseline.values,
        &p.baseline.residuals,
        &p.effects,
        spec,
        &CancellationToken::new(),
    )
}

fn assert_series(actual: &[f64], expected: &[f64]) {
    assert_eq!(actual.len(), expected.len(), "{actual:?}");
    for (a, e) in actual.iter().zip(expected) {
        assert!((a - e).abs() < 1e-3, "got {actual:?}, expected {expected:?}");
    }
}

// ── Concrete scenario ────────────────────────────────────────────────────

#[test]
fn doubling_a_over_three_years() {
    let p = prepare("three_node");
    let spec = InterventionSpec::linear("A", 20.0, 40.0, 3, 10);
    let result = run(&p, &SimulationConfig::default(), &spec).unwrap();

    assert_eq!(result.termination, Termination::Converged { step: 5 });
    assert_series(
        &result.series(0),
        &[20.0, 26.6667, 33.3333, 40.0, 40.0, 40.0],
    );
    assert_series(
        &result.series(1),
        &[50.0, 51.7778, 53.1111, 54.0, 54.0, 54.0],
    );
    assert_series(
        &result.series(2),
        &[100.0, 100.0, 103.5556, 106.2222, 108.0, 108.0],
    );
    let c = result.series(2);
    assert!(c.windows(2).all(|w| w[1] >= w[0]), "C must not decrease");
}

#[test]
fn phases_follow_the_state_machine() {
    let p = prepare("three_node");
    let spec = InterventionSpec::linear("A", 20.0, 40.0, 3, 10);
    let result = run(&p, &SimulationConfig::default(), &spec).unwrap();

    use SimulationPhase::*;
    assert_eq!(
        result.phases,
        vec![Initialized, Ramping, Ramping, Ramping, PostRamp, PostRamp, Converged]
    );
    assert_eq!(result.phase(), Converged);
    assert!(result.phase().is_terminal());
}

#[test]
fn short_horizon_reports_horizon_reached() {
    let p = prepare("three_node");
    let spec = InterventionSpec::linear("A", 20.0, 40.0, 3, 3);
    let result = run(&p, &SimulationConfig::default(), &spec).unwrap();

    assert_eq!(result.termination, Termination::HorizonReached { steps: 3 });
    assert_eq!(result.states.len(), 4);
    assert_eq!(result.phases.last(), Some(&SimulationPhase::HorizonReached));
}

#[test]
fn trajectory_rows_cover_every_node_and_year() {
    let p = prepare("three_node");
    let spec = InterventionSpec::linear("A", 20.0, 40.0, 3, 10);
    let result = run(&p, &SimulationConfig::default(), &spec).unwrap();
    let rows = result.trajectory(&p.bank);

    assert_eq!(rows.len(), result.states.len() * 3);
    assert_eq!(rows[0].year, 0);
    assert_eq!(rows[0].node_id, "A");
    let last = rows.last().unwrap();
    assert_eq!(last.year, 5);
    assert_eq!(last.node_id, "C");
    assert!((last.value - 108.0).abs() < 1e-3);
}

// ── Determinism and sparse evaluation ────────────────────────────────────

#[test]
fn identical_inputs_are_bit_identical() {
    let p = prepare("regional_cascade");
    let spec = InterventionSpec::linear("housing_supply", 80.0, 120.0, 3, 10);
    let first = run(&p, &SimulationConfig::default(), &spec).unwrap();
    let second = run(&p, &SimulationConfig::default(), &spec).unwrap();
    assert_eq!(first, second);
}

#[test]
fn sparse_and_dense_runs_agree_exactly() {
    for name in ["three_node", "feedback_loop", "regional_cascade"] {
        let p = prepare(name);
        let target = p.bank.structural()[0];
        let node = p.bank.node(target);
        let from = p.baseline.values[target];
        let to = node.valid_range.clamp(from * 1.5 + 1.0);
        let spec = InterventionSpec::linear(node.id.clone(), from, to, 2, 12);

        let sparse = run(&p, &SimulationConfig::default(), &spec).unwrap();
        let dense = run(
            &p,
            &SimulationConfig {
                sparse_evaluation: false,
                ..SimulationConfig::default()
            },
            &spec,
        )
        .unwrap();
        assert_eq!(sparse, dense, "{name}");
    }
}

#[test]
fn no_change_intervention_stays_at_baseline() {
    let p = prepare("regional_cascade");
    let spec = InterventionSpec::linear("housing_supply", 80.0, 80.0, 3, 10);
    let result = run(&p, &SimulationConfig::default(), &spec).unwrap();

    // Flat post-ramp from step 4; converged once the window fills.
    assert_eq!(result.termination, Termination::Converged { step: 5 });
    for state in &result.states {
        for (a, b) in state.iter().zip(&p.baseline.values) {
            assert!((a - b).abs() < 1e-9);
        }
    }
}

// ── Feedback and saturation ──────────────────────────────────────────────

#[test]
fn feedback_loop_reconverges() {
    let p = prepare("feedback_loop");
    let spec = InterventionSpec::linear("A", 40.0, 80.0, 2, 30);
    let result = run(&p, &SimulationConfig::default(), &spec).unwrap();

    assert!(result.termination.converged());
    let c = p.bank.index_of("C").unwrap();
    assert!(result.final_state()[c] > p.baseline.values[c]);
}

#[test]
fn regional_supply_increase_reduces_homelessness() {
    let p = prepare("regional_cascade");
    let spec = InterventionSpec::linear("housing_supply", 80.0, 120.0, 3, 10);
    let result = run(&p, &SimulationConfig::default(), &spec).unwrap();

    let h = p.bank.index_of("homelessness").unwrap();
    assert!(result.final_state()[h] < p.baseline.values[h]);
    for state in &result.states {
        for (j, v) in state.iter().enumerate() {
            assert!(p.bank.node(j).valid_range.contains(*v));
        }
    }
}

#[test]
fn explicit_ramp_holds_last_fraction() {
    let p = prepare("three_node");
    let spec = InterventionSpec {
        target_node: "A".to_string(),
        from_value: 20.0,
        to_value: 40.0,
        ramp_schedule: RampSchedule::Explicit {
            fractions: vec![0.5, 0.5],
        },
        time_horizon: 8,
    };
    let result = run(&p, &SimulationConfig::default(), &spec).unwrap();
    assert!(result.series(0)[1..].iter().all(|&a| a == 30.0));
}

// ── Failures ─────────────────────────────────────────────────────────────

#[test]
fn invalid_interventions_are_rejected() {
    let p = prepare("three_node");

    let not_structural = InterventionSpec::linear("B", 50.0, 60.0, 1, 5);
    assert!(matches!(
        resolve_intervention(&p.bank, &not_structural),
        Err(ContextError::InvalidIntervention { .. })
    ));
    let unknown = InterventionSpec::linear("Q", 1.0, 2.0, 1, 5);
    assert!(resolve_intervention(&p.bank, &unknown).is_err());
    let out_of_range = InterventionSpec::linear("A", 20.0, 400.0, 1, 5);
    assert!(matches!(
        resolve_intervention(&p.bank, &out_of_range),
        Err(ContextError::ValueOutOfRange { .. })
    ));
    let no_horizon = InterventionSpec::linear("A", 20.0, 40.0, 1, 0);
    assert!(resolve_intervention(&p.bank, &no_horizon).is_err());
    let bad_ramp = InterventionSpec {
        ramp_schedule: RampSchedule::Explicit {
            fractions: vec![0.5, 1.5],
        },
        ..InterventionSpec::linear("A", 20.0, 40.0, 1, 5)
    };
    assert!(resolve_intervention(&p.bank, &bad_ramp).is_err());
    assert_eq!(
        resolve_intervention(&p.bank, &InterventionSpec::linear("A", 20.0, 40.0, 3, 10)).unwrap(),
        0
    );
}

#[test]
fn cancellation_is_checked_per_step() {
    let p = prepare("three_node");
    let token = CancellationToken::new();
    token.cancel();
    let spec = InterventionSpec::linear("A", 20.0, 40.0, 3, 10);
    let err = TimeSimulator::new(&p.bank, &SimulationConfig::default())
        .run(
            &p.baseline.values,
            &p.baseline.residuals,
            &p.effects,
            &spec,
            &token,
        )
        .unwrap_err();
    assert!(matches!(
        err,
        CascadeError::Cancelled {
            stage: "simulation",
            progress: 0
        }
    ));
}

#[test]
fn exhausted_budget_is_a_simulation_timeout() {
    let p = prepare("three_node");
    let spec = InterventionSpec::linear("A", 20.0, 40.0, 3, 10);
    let config = SimulationConfig {
        time_budget_ms: Some(0),
        ..SimulationConfig::default()
    };
    let err = run(&p, &config, &spec).unwrap_err();
    assert!(err.is_timeout());
    assert!(matches!(
        err,
        CascadeError::SimulationError(SimulationError::Timeout { step: 1, .. })
    ));
}
