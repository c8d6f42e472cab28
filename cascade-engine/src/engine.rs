//! CascadeEngine: runs one request through the full pipeline.
//!
//! Input problems fail before any numerical work starts: unknown geography,
//! missing baseline data and invalid interventions are all checked before
//! the first solver iteration.

use std::path::Path;
use std::sync::Arc;

use cascade_bank::{MechanismBank, SharedBank};
use cascade_core::config::CascadeConfig;
use cascade_core::constants::MAX_UNCERTAINTY_SAMPLES;
use cascade_core::control::CancellationToken;
use cascade_core::errors::{CascadeResult, ContextError};
use cascade_core::models::{Diagnostic, SimulationOutput, SimulationRequest};
use cascade_core::traits::IContextProvider;
use cascade_moderation::ModeratorEngine;
use cascade_observability::tracing_setup::events;
use cascade_solver::{resolve_intervention, Anchors, EquilibriumSolver, TimeSimulator};
use cascade_uncertainty::{OutcomeProjector, UncertaintyPropagator};
use chrono::Utc;
use tracing::info;
use uuid::Uuid;

/// The mechanism cascade engine.
///
/// Holds an immutable shared bank and a context source; every call to
/// [`run`](Self::run) owns its own state, so one engine can serve
/// concurrent requests.
pub struct CascadeEngine {
    bank: SharedBank,
    provider: Arc<dyn IContextProvider>,
    config: CascadeConfig,
    moderator: ModeratorEngine,
}

impl CascadeEngine {
    /// Create an engine with default configuration.
    pub fn new(bank: SharedBank, provider: Arc<dyn IContextProvider>) -> Self {
        let config = CascadeConfig::default();
        Self {
            moderator: ModeratorEngine::new(config.moderation.clone()),
            bank,
            provider,
            config,
        }
    }

    /// Create an engine with a validated configuration.
    pub fn with_config(
        bank: SharedBank,
        provider: Arc<dyn IContextProvider>,
        config: CascadeConfig,
    ) -> CascadeResult<Self> {
        config.validate()?;
        Ok(Self {
            moderator: ModeratorEngine::new(config.moderation.clone()),
            bank,
            provider,
            config,
        })
    }

    /// Load a bank document (JSON or TOML) and build an engine around it.
    pub fn load(
        bank_path: impl AsRef<Path>,
        provider: Arc<dyn IContextProvider>,
        config: CascadeConfig,
    ) -> CascadeResult<Self> {
        let bank = MechanismBank::load_shared(bank_path)?;
        events::bank_loaded(
            bank.version(),
            bank.content_hash(),
            bank.node_count(),
            bank.mechanism_count(),
        );
        Self::with_config(bank, provider, config)
    }

    pub fn bank(&self) -> &MechanismBank {
        &self.bank
    }

    pub fn config(&self) -> &CascadeConfig {
        &self.config
    }

    /// Run a request to completion.
    pub fn run(&self, request: &SimulationRequest) -> CascadeResult<SimulationOutput> {
        self.run_with_cancellation(request, &CancellationToken::new())
    }

    /// Run a request, checking `cancel` once per solver iteration, simulation
    /// step and Monte Carlo draw.
    pub fn run_with_cancellation(
        &self,
        request: &SimulationRequest,
        cancel: &CancellationToken,
    ) -> CascadeResult<SimulationOutput> {
        let span = cascade_observability::run_span!(
            request.geography_id,
            request.intervention.target_node
        );
        let _guard = span.enter();

        let result = self.execute(request, cancel);
        if let Err(e) = &result {
            events::run_failed(&request.geography_id, e.code(), &e.to_string());
        }
        result
    }

    /// JSON in, JSON out.
    pub fn run_json(&self, request: &str) -> CascadeResult<String> {
        let request: SimulationRequest = serde_json::from_str(request)?;
        let output = self.run(&request)?;
        Ok(serde_json::to_string(&output)?)
    }

    fn execute(
        &self,
        request: &SimulationRequest,
        cancel: &CancellationToken,
    ) -> CascadeResult<SimulationOutput> {
        let bank = self.bank.as_ref();
        let samples = request
            .uncertainty_samples
            .unwrap_or(self.config.uncertainty.samples);
        if samples > MAX_UNCERTAINTY_SAMPLES {
            return Err(ContextError::RequestLimitExceeded {
                field: "uncertainty_samples",
                value: samples,
                limit: MAX_UNCERTAINTY_SAMPLES,
            }
            .into());
        }

        // Inputs first.
        let ctx = self.provider.context(&request.geography_id)?;
        let spec = request.intervention_spec(self.config.simulation.default_time_horizon);
        let target = resolve_intervention(bank, &spec)?;
        let anchors = Anchors::for_intervention(bank, &ctx, target, spec.from_value)?;

        let moderated = {
            let span = cascade_observability::moderation_span!(bank.mechanism_count());
            let _guard = span.enter();
            self.moderator.adjust_bank(bank, &ctx)
        };
        for diagnostic in &moderated.diagnostics {
            if let Diagnostic::ModeratorClipped {
                mechanism_id,
                raw_effect,
                clipped_effect,
                bound,
            } = diagnostic
            {
                events::moderator_clipped(mechanism_id, *raw_effect, *clipped_effect, *bound);
            }
        }

        let baseline = {
            let span = cascade_observability::calibration_span!(bank.intermediates().len());
            let _guard = span.enter();
            EquilibriumSolver::new(bank, &self.config.solver).solve(
                &moderated.effects,
                &anchors,
                cancel,
            )?
        };
        events::calibration_converged(
            baseline.report.iterations,
            baseline.report.residual,
            baseline.report.final_damping,
            baseline.report.attempts,
        );
        for diagnostic in &baseline.diagnostics {
            if let Diagnostic::MultipleEquilibriaDetected {
                node_id,
                chosen_value,
                alternate_value,
                ..
            } = diagnostic
            {
                events::multiple_equilibria_detected(node_id, *chosen_value, *alternate_value);
            }
        }

        let run = {
            let span =
                cascade_observability::simulation_span!(spec.target_node, spec.time_horizon);
            let _guard = span.enter();
            TimeSimulator::new(bank, &self.config.simulation).run(
                &baseline.values,
                &baseline.residuals,
                &moderated.effects,
                &spec,
                cancel,
            )?
        };
        events::simulation_terminated(
            &spec.target_node,
            run.phase().as_str(),
            run.termination.steps(),
        );

        let propagation = if samples == 0 {
            None
        } else {
            let span = cascade_observability::monte_carlo_span!(samples);
            let _guard = span.enter();
            let propagation = UncertaintyPropagator::new(
                bank,
                &self.moderator,
                &self.config.simulation,
                &self.config.uncertainty,
            )
            .propagate(&ctx, &baseline.values, &spec, samples, cancel)?;
            events::monte_carlo_completed(
                propagation.samples(),
                propagation.converged(),
                propagation.elapsed_ms,
            );
            Some(propagation)
        };

        let projection = {
            let span = cascade_observability::projection_span!(bank.endpoints().len());
            let _guard = span.enter();
            OutcomeProjector::new(bank, self.config.uncertainty.ci_level).project(
                &run,
                propagation.as_ref(),
                &ctx,
            )
        };

        let mut diagnostics = moderated.diagnostics;
        diagnostics.extend(baseline.diagnostics.iter().cloned());

        let output = SimulationOutput {
            run_id: Uuid::new_v4(),
            geography_id: ctx.geography_id.clone(),
            bank_version: bank.version().to_string(),
            generated_at: Utc::now(),
            termination: run.termination,
            trajectory: run.trajectory(bank),
            uncertainty: projection.uncertainty,
            projections: projection.projections,
            calibration: baseline.report.summary(),
            diagnostics,
        };
        info!(
            run_id = %output.run_id,
            steps = output.termination.steps(),
            diagnostics = output.diagnostics.len(),
            "simulation run complete"
        );
        Ok(output)
    }
}
