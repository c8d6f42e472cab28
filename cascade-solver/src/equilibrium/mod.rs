//! Equilibrium Solver: inverse calibration of intermediate stocks.
//!
//! Structural and endpoint values are held fixed. Intermediates start at a
//! fraction of their range and move by Gauss–Newton steps until endpoint
//! predictions match the observations and unconstrained intermediates sit at
//! their mechanism-implied levels. The first step is the full linearized
//! solve; later steps are damped. Residuals are then derived so the accepted
//! baseline is an exact steady state.

pub mod anchors;
pub mod damping;
pub mod linearize;

use cascade_bank::MechanismBank;
use cascade_core::config::SolverConfig;
use cascade_core::constants::MULTIPLE_EQUILIBRIA_THRESHOLD;
use cascade_core::control::{CancellationToken, Deadline};
use cascade_core::errors::{CalibrationError, CascadeError, CascadeResult};
use cascade_core::models::{CalibrationSummary, Diagnostic};
use serde::Serialize;
use tracing::{debug, info};

pub use anchors::Anchors;
pub use damping::DampingController;
pub use linearize::{gauss_newton_step, inf_norm, linearize, Linearization};

use crate::calculator::{derive_residuals, CascadeCalculator};

/// Midpoint start; alternates come from `SolverConfig::alternate_guesses`.
const PRIMARY_START: f64 = 0.5;

/// Convergence record of the accepted calibration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalibrationReport {
    pub iterations: usize,
    pub residual: f64,
    pub final_damping: f64,
    pub damping_halvings: usize,
    /// Max normalized endpoint gap at the accepted iterate.
    pub endpoint_error: f64,
    /// Range fraction the accepted solution started from.
    pub start_fraction: f64,
    /// Initial guesses that were run.
    pub attempts: usize,
    pub residual_history: Vec<f64>,
    /// Step factor applied at each iteration (1.0 for the linearized step).
    pub damping_history: Vec<f64>,
}

impl CalibrationReport {
    pub fn summary(&self) -> CalibrationSummary {
        CalibrationSummary {
            iterations: self.iterations,
            residual: self.residual,
            final_damping: self.final_damping,
            endpoint_error: self.endpoint_error,
        }
    }
}

/// Calibrated steady state: stock values plus the residual inflows that hold it.
#[derive(Debug, Clone)]
pub struct Baseline {
    pub values: Vec<f64>,
    pub residuals: Vec<f64>,
    pub report: CalibrationReport,
    pub diagnostics: Vec<Diagnostic>,
}

/// One run of the iteration from one initial guess.
#[derive(Debug, Clone)]
struct Attempt {
    start: f64,
    values: Vec<f64>,
    iterations: usize,
    residual: f64,
    endpoint_error: f64,
    damping: DampingController,
    residual_history: Vec<f64>,
    damping_history: Vec<f64>,
}

/// Calibrates a bank's intermediate stocks for one context.
pub struct EquilibriumSolver<'a> {
    bank: &'a MechanismBank,
    config: &'a SolverConfig,
}

impl<'a> EquilibriumSolver<'a> {
    pub fn new(bank: &'a MechanismBank, config: &'a SolverConfig) -> Self {
        Self { bank, config }
    }

    /// Solve for the baseline under the given adjusted effects.
    ///
    /// Runs from the midpoint and every alternate guess. Distinct converged
    /// solutions raise `MultipleEquilibriaDetected`; the one with the smaller
    /// endpoint error is kept, ties going to the earlier start.
    pub fn solve(
        &self,
        effects: &[f64],
        anchors: &Anchors,
        cancel: &CancellationToken,
    ) -> CascadeResult<Baseline> {
        let zeros = vec![0.0; self.bank.node_count()];
        let calculator = CascadeCalculator::new(self.bank, effects, &zeros)?;
        calculator.check_state(&anchors.values)?;
        let free = self.bank.intermediates();
        let endpoints = self.bank.endpoints();
        let deadline = Deadline::start(self.config.time_budget_ms);

        let mut starts = vec![PRIMARY_START];
        if !free.is_empty() {
            starts.extend(self.config.alternate_guesses.iter().copied());
        }

        let mut converged: Vec<Attempt> = Vec::with_capacity(starts.len());
        let mut primary_failure: Option<CascadeError> = None;
        for (i, &start) in starts.iter().enumerate() {
            match self.attempt(&calculator, &free, &endpoints, anchors, start, &deadline, cancel) {
                Ok(attempt) => converged.push(attempt),
                Err(CascadeError::CalibrationError(e @ CalibrationError::DidNotConverge { .. })) => {
                    debug!(start, error = %e, "calibration start did not converge");
                    if i == 0 {
                        primary_failure = Some(e.into());
                    }
                }
                Err(other) => return Err(other),
            }
        }

        let Some(best) = select(&converged) else {
            return Err(primary_failure.unwrap_or_else(|| {
                CalibrationError::DidNotConverge {
                    iterations: self.config.max_iterations,
                    residual: f64::INFINITY,
                    last_iterate: Vec::new(),
                }
                .into()
            }));
        };
        let diagnostics = self.equilibria_diagnostics(&free, &converged, best);
        let chosen = &converged[best];

        let residuals = derive_residuals(self.bank, effects, &chosen.values)?;
        let report = CalibrationReport {
            iterations: chosen.iterations,
            residual: chosen.residual,
            final_damping: chosen.damping.current(),
            damping_halvings: chosen.damping.halvings(),
            endpoint_error: chosen.endpoint_error,
            start_fraction: chosen.start,
            attempts: starts.len(),
            residual_history: chosen.residual_history.clone(),
            damping_history: chosen.damping_history.clone(),
        };
        info!(
            iterations = report.iterations,
            residual = report.residual,
            endpoint_error = report.endpoint_error,
            start = report.start_fraction,
            "calibration converged"
        );
        Ok(Baseline {
            values: chosen.values.clone(),
            residuals,
            report,
            diagnostics,
        })
    }

    #[allow(clippy::too_many_arguments)]
    fn attempt(
        &self,
        calculator: &CascadeCalculator<'_>,
        free: &[usize],
        endpoints: &[usize],
        anchors: &Anchors,
        start: f64,
        deadline: &Deadline,
        cancel: &CancellationToken,
    ) -> CascadeResult<Attempt> {
        let config = self.config;
        let mut state = anchors.values.clone();
        for &j in free {
            state[j] = self.bank.node(j).valid_range.at_fraction(start);
        }
        let mut damping = DampingController::new(config.initial_damping, config.min_damping);
        let mut residual_history = Vec::new();
        let mut damping_history = Vec::new();

        if free.is_empty() {
            let lin = linearize(calculator, free, endpoints, &state, config.finite_difference_step);
            let gap = lin.gap_norm();
            // Nothing to move: the fixed values either reproduce the
            // observations or calibration has failed.
            if gap >= config.tolerance {
                return Err(CalibrationError::DidNotConverge {
                    iterations: 0,
                    residual: gap,
                    last_iterate: Vec::new(),
                }
                .into());
            }
            return Ok(Attempt {
                start,
                values: state,
                iterations: 0,
                residual: gap,
                endpoint_error: gap,
                damping,
                residual_history,
                damping_history,
            });
        }

        let mut residual = f64::INFINITY;
        for iteration in 1..=config.max_iterations {
            if cancel.is_cancelled() {
                return Err(CascadeError::Cancelled {
                    stage: "calibration",
                    progress: iteration - 1,
                });
            }
            if deadline.expired() {
                return Err(CalibrationError::Timeout {
                    elapsed_ms: deadline.elapsed_ms(),
                    iterations: iteration - 1,
                    residual,
                }
                .into());
            }

            let lin = linearize(calculator, free, endpoints, &state, config.finite_difference_step);
            let (step, null_norm) = gauss_newton_step(&lin, config.singular_value_epsilon)?;
            let gap = lin.gap_norm();
            residual = gap.max(null_norm);
            residual_history.push(residual);

            if inf_norm(&step) < config.tolerance && gap < config.tolerance {
                return Ok(Attempt {
                    start,
                    values: state,
                    iterations: iteration,
                    residual,
                    endpoint_error: gap,
                    damping,
                    residual_history,
                    damping_history,
                });
            }

            // The first step is the undamped linearized solve.
            let factor = if iteration == 1 {
                1.0
            } else {
                damping.observe(residual)
            };
            damping_history.push(factor);
            debug!(iteration, residual, factor, start, "calibration iteration");

            for (k, &j) in free.iter().enumerate() {
                let range = self.bank.node(j).valid_range;
                state[j] = range.clamp(state[j] + factor * step[k] * range.width());
            }
        }

        Err(CalibrationError::DidNotConverge {
            iterations: config.max_iterations,
            residual,
            last_iterate: free
                .iter()
                .map(|&j| (self.bank.node(j).id.clone(), state[j]))
                .collect(),
        }
        .into())
    }

    fn equilibria_diagnostics(
        &self,
        free: &[usize],
        converged: &[Attempt],
        best: usize,
    ) -> Vec<Diagnostic> {
        let chosen = &converged[best];
        let mut reported: Vec<&Attempt> = Vec::new();
        let mut diagnostics = Vec::new();
        for (i, other) in converged.iter().enumerate() {
            if i == best {
                continue;
            }
            let Some((node, difference)) = largest_relative_difference(free, chosen, other) else {
                continue;
            };
            if difference <= MULTIPLE_EQUILIBRIA_THRESHOLD {
                continue;
            }
            let already = reported.iter().any(|r| {
                largest_relative_difference(free, r, other)
                    .map_or(true, |(_, d)| d <= MULTIPLE_EQUILIBRIA_THRESHOLD)
            });
            if already {
                continue;
            }
            reported.push(other);
            diagnostics.push(Diagnostic::MultipleEquilibriaDetected {
                node_id: self.bank.node(node).id.clone(),
                chosen_value: chosen.values[node],
                alternate_value: other.values[node],
                relative_difference: difference,
                chosen_error: chosen.endpoint_error,
                alternate_error: other.endpoint_error,
            });
        }
        diagnostics
    }
}

/// Index of the attempt with the smallest endpoint error; ties keep the earlier one.
fn select(converged: &[Attempt]) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (i, attempt) in converged.iter().enumerate() {
        match best {
            Some(b) if converged[b].endpoint_error <= attempt.endpoint_error => {}
            _ => best = Some(i),
        }
    }
    best
}

/// Free node where two solutions disagree most, relative to the larger magnitude.
fn largest_relative_difference(free: &[usize], a: &Attempt, b: &Attempt) -> Option<(usize, f64)> {
    free.iter()
        .filter_map(|&j| {
            let scale = a.values[j].abs().max(b.values[j].abs());
            (scale > f64::EPSILON).then(|| (j, (a.values[j] - b.values[j]).abs() / scale))
        })
        .max_by(|x, y| x.1.total_cmp(&y.1))
}
