//! Uncertainty Propagator: Monte Carlo over effect sizes.
//!
//! Calibration runs once. Each draw redraws every base effect, re-applies the
//! moderators, re-anchors the residuals so the calibrated baseline stays a
//! steady state under the drawn effects, and reruns the Time Simulator. Draw
//! `i` reads ChaCha stream `i` of the configured seed, so results do not
//! depend on how draws are scheduled across workers.

use std::time::Instant;

use cascade_bank::MechanismBank;
use cascade_core::config::{SimulationConfig, UncertaintyConfig};
use cascade_core::control::CancellationToken;
use cascade_core::errors::{CascadeError, CascadeResult};
use cascade_core::models::{GeographicContext, InterventionSpec, Termination};
use cascade_moderation::ModeratorEngine;
use cascade_solver::{derive_residuals, TimeSimulator};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use tracing::{debug, info};

use crate::sampler::EffectSampler;

/// Outcome of one Monte Carlo draw.
#[derive(Debug, Clone, PartialEq)]
pub struct Draw {
    pub final_state: Vec<f64>,
    pub termination: Termination,
}

/// All draws of one propagation, in draw order.
#[derive(Debug, Clone, PartialEq)]
pub struct Propagation {
    pub draws: Vec<Draw>,
    pub elapsed_ms: u64,
}

impl Propagation {
    pub fn samples(&self) -> usize {
        self.draws.len()
    }

    /// Final value of `node` in every draw.
    pub fn node_samples(&self, node: usize) -> Vec<f64> {
        self.draws.iter().map(|d| d.final_state[node]).collect()
    }

    /// Draws that reconverged before the horizon.
    pub fn converged(&self) -> usize {
        self.draws
            .iter()
            .filter(|d| d.termination.converged())
            .count()
    }
}

/// Random stream for draw `index`.
pub fn draw_rng(seed: u64, index: usize) -> ChaCha8Rng {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    rng.set_stream(index as u64);
    rng
}

pub struct UncertaintyPropagator<'a> {
    bank: &'a MechanismBank,
    moderator: &'a ModeratorEngine,
    simulation: &'a SimulationConfig,
    config: &'a UncertaintyConfig,
}

impl<'a> UncertaintyPropagator<'a> {
    pub fn new(
        bank: &'a MechanismBank,
        moderator: &'a ModeratorEngine,
        simulation: &'a SimulationConfig,
        config: &'a UncertaintyConfig,
    ) -> Self {
        Self {
            bank,
            moderator,
            simulation,
            config,
        }
    }

    /// Run `samples` draws of `spec` from the calibrated `baseline`.
    ///
    /// Uses the global rayon pool unless `worker_threads` is set, in which
    /// case a dedicated pool of that size is built for this propagation.
    pub fn propagate(
        &self,
        ctx: &GeographicContext,
        baseline: &[f64],
        spec: &InterventionSpec,
        samples: usize,
        cancel: &CancellationToken,
    ) -> CascadeResult<Propagation> {
        let started = Instant::now();
        let sampler = EffectSampler::for_bank(self.bank);
        let run_all = || -> CascadeResult<Vec<Draw>> {
            (0..samples)
                .into_par_iter()
                .map(|index| self.draw(&sampler, index, ctx, baseline, spec, cancel))
                .collect()
        };

        let draws = match self.config.worker_threads {
            Some(threads) => rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .thread_name(|i| format!("cascade-mc-{i}"))
                .build()
                .map_err(|e| CascadeError::WorkerPoolError {
                    reason: e.to_string(),
                })?
                .install(run_all)?,
            None => run_all()?,
        };

        let propagation = Propagation {
            draws,
            elapsed_ms: u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
        };
        info!(
            samples,
            converged = propagation.converged(),
            elapsed_ms = propagation.elapsed_ms,
            "monte carlo propagation finished"
        );
        Ok(propagation)
    }

    /// One draw. Cancellation reports the index of the draw that saw it.
    pub fn draw(
        &self,
        sampler: &EffectSampler,
        index: usize,
        ctx: &GeographicContext,
        baseline: &[f64],
        spec: &InterventionSpec,
        cancel: &CancellationToken,
    ) -> CascadeResult<Draw> {
        if cancel.is_cancelled() {
            return Err(CascadeError::Cancelled {
                stage: "monte_carlo",
                progress: index,
            });
        }
        let mut rng = draw_rng(self.config.seed, index);
        let effects: Vec<f64> = self
            .bank
            .mechanisms()
            .iter()
            .zip(sampler.draw(&mut rng))
            .map(|(mechanism, base)| self.moderator.adjust_value(mechanism, base, ctx))
            .collect();
        let residuals = derive_residuals(self.bank, &effects, baseline)?;
        let run = TimeSimulator::new(self.bank, self.simulation).run(
            baseline, &residuals, &effects, spec, cancel,
        )?;
        debug!(draw = index, steps = run.termination.steps(), "draw finished");
        Ok(Draw {
            final_state: run.final_state().to_vec(),
            termination: run.termination,
        })
    }
}
