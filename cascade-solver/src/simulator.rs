//! Time Simulator: steps an intervention forward from a calibrated baseline.
//!
//! Each step sets the target from the ramp schedule, evaluates flows for
//! every other node from the same stock vector, then applies and clamps
//! them. Runs stop once the post-ramp change stays under tolerance for the
//! configured window, or at the horizon.

use cascade_bank::MechanismBank;
use cascade_core::config::SimulationConfig;
use cascade_core::constants::MAX_TIME_HORIZON;
use cascade_core::control::{CancellationToken, Deadline};
use cascade_core::errors::{CascadeError, CascadeResult, ContextError, SimulationError};
use cascade_core::models::{
    InterventionSpec, NodeKind, RampSchedule, SimulationPhase, Termination, TrajectoryPoint,
};
use tracing::debug;

use crate::calculator::{CascadeCalculator, FlowCache};

/// Check an intervention against the bank and return the target's index.
pub fn resolve_intervention(
    bank: &MechanismBank,
    spec: &InterventionSpec,
) -> Result<usize, ContextError> {
    let invalid = |reason: String| ContextError::InvalidIntervention { reason };

    let target = bank
        .index_of(&spec.target_node)
        .ok_or_else(|| invalid(format!("unknown target node '{}'", spec.target_node)))?;
    let node = bank.node(target);
    if node.kind != NodeKind::Structural {
        return Err(invalid(format!(
            "target '{}' is {}, only structural nodes can be intervened on",
            node.id, node.kind
        )));
    }
    for value in [spec.from_value, spec.to_value] {
        if !value.is_finite() || !node.valid_range.contains(value) {
            return Err(ContextError::ValueOutOfRange {
                node_id: node.id.clone(),
                value,
                min: node.valid_range.min,
                max: node.valid_range.max,
            });
        }
    }
    if spec.time_horizon == 0 || spec.time_horizon > MAX_TIME_HORIZON {
        return Err(invalid(format!(
            "time horizon {} is outside 1..={MAX_TIME_HORIZON}",
            spec.time_horizon
        )));
    }
    if let RampSchedule::Explicit { fractions } = &spec.ramp_schedule {
        if fractions.is_empty() || fractions.iter().any(|f| !(0.0..=1.0).contains(f)) {
            return Err(invalid(
                "explicit ramp fractions must be a non-empty list within [0, 1]".to_string(),
            ));
        }
    }
    Ok(target)
}

/// Result of one simulation: the stock vector at every step (step 0 is the
/// baseline), the phase each step ran in, and how the run ended.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationRun {
    pub states: Vec<Vec<f64>>,
    pub phases: Vec<SimulationPhase>,
    pub termination: Termination,
}

impl SimulationRun {
    pub fn final_state(&self) -> &[f64] {
        self.states.last().map(Vec::as_slice).unwrap_or_default()
    }

    /// Terminal phase of the run.
    pub fn phase(&self) -> SimulationPhase {
        match self.termination {
            Termination::Converged { .. } => SimulationPhase::Converged,
            Termination::HorizonReached { .. } => SimulationPhase::HorizonReached,
        }
    }

    /// Values of one node across all steps.
    pub fn series(&self, node: usize) -> Vec<f64> {
        self.states.iter().map(|s| s[node]).collect()
    }

    /// Flatten into `(year, node_id, value)` rows, step-major.
    pub fn trajectory(&self, bank: &MechanismBank) -> Vec<TrajectoryPoint> {
        let mut points = Vec::with_capacity(self.states.len() * bank.node_count());
        for (year, state) in self.states.iter().enumerate() {
            for (j, &value) in state.iter().enumerate() {
                points.push(TrajectoryPoint {
                    year: u32::try_from(year).unwrap_or(u32::MAX),
                    node_id: bank.node(j).id.clone(),
                    value,
                });
            }
        }
        points
    }
}

/// Steps interventions through one bank.
pub struct TimeSimulator<'a> {
    bank: &'a MechanismBank,
    config: &'a SimulationConfig,
}

impl<'a> TimeSimulator<'a> {
    pub fn new(bank: &'a MechanismBank, config: &'a SimulationConfig) -> Self {
        Self { bank, config }
    }

    /// Run `spec` from `baseline` with the given effects and residuals.
    pub fn run(
        &self,
        baseline: &[f64],
        residuals: &[f64],
        effects: &[f64],
        spec: &InterventionSpec,
        cancel: &CancellationToken,
    ) -> CascadeResult<SimulationRun> {
        let target = resolve_intervention(self.bank, spec)?;
        let calculator = CascadeCalculator::new(self.bank, effects, residuals)?;
        calculator.check_state(baseline)?;
        let deadline = Deadline::start(self.config.time_budget_ms);

        let ramp_end = spec.ramp_schedule.ramp_end();
        let window = self.config.convergence_window.max(1);
        let mut cache = FlowCache::new(self.bank.mechanism_count());
        let mut state = baseline.to_vec();
        let mut states = Vec::with_capacity(spec.time_horizon as usize + 1);
        let mut phases = Vec::with_capacity(spec.time_horizon as usize + 2);
        states.push(state.clone());
        phases.push(SimulationPhase::Initialized);

        let mut quiet_steps = 0;
        let mut termination = Termination::HorizonReached {
            steps: spec.time_horizon,
        };
        for step in 1..=spec.time_horizon {
            if cancel.is_cancelled() {
                return Err(CascadeError::Cancelled {
                    stage: "simulation",
                    progress: (step - 1) as usize,
                });
            }
            if deadline.expired() {
                return Err(SimulationError::Timeout {
                    elapsed_ms: deadline.elapsed_ms(),
                    step,
                }
                .into());
            }

            let phase = if step <= ramp_end {
                SimulationPhase::Ramping
            } else {
                SimulationPhase::PostRamp
            };
            state[target] = spec.value_at(step);

            let flows = if self.config.sparse_evaluation {
                cache.flows(&calculator, &state)
            } else {
                calculator.flows(&state)
            };

            let mut max_change = 0.0_f64;
            for (j, flow) in flows.iter().enumerate() {
                let node = self.bank.node(j);
                if j == target || node.is_fixed() {
                    continue;
                }
                let next = node.valid_range.clamp(state[j] + flow);
                max_change = max_change.max(node.normalized(next - state[j]).abs());
                state[j] = next;
            }
            debug!(step, ?phase, max_change, "simulation step");
            states.push(state.clone());
            phases.push(phase);

            if phase == SimulationPhase::PostRamp && max_change < self.config.tolerance {
                quiet_steps += 1;
            } else {
                quiet_steps = 0;
            }
            if quiet_steps >= window {
                termination = Termination::Converged { step };
                break;
            }
        }

        phases.push(match termination {
            Termination::Converged { .. } => SimulationPhase::Converged,
            Termination::HorizonReached { .. } => SimulationPhase::HorizonReached,
        });
        Ok(SimulationRun {
            states,
            phases,
            termination,
        })
    }
}
