//! Structured log events for engine milestones.
//!
//! Each function emits a `tracing` event with structured fields.

/// Log a loaded mechanism bank.
pub fn bank_loaded(version: &str, content_hash: &str, nodes: usize, mechanisms: usize) {
    tracing::info!(
        event = "bank_loaded",
        version = %version,
        content_hash = %content_hash,
        nodes = nodes,
        mechanisms = mechanisms,
        "mechanism bank loaded"
    );
}

/// Log a moderator clip.
pub fn moderator_clipped(mechanism_id: &str, raw_effect: f64, clipped_effect: f64, bound: f64) {
    tracing::warn!(
        event = "moderator_clipped",
        mechanism_id = %mechanism_id,
        raw_effect = raw_effect,
        clipped_effect = clipped_effect,
        bound = bound,
        "moderated effect clipped to plausibility bound"
    );
}

/// Log a converged calibration.
pub fn calibration_converged(iterations: usize, residual: f64, final_damping: f64, attempts: usize) {
    tracing::info!(
        event = "calibration_converged",
        iterations = iterations,
        residual = residual,
        final_damping = final_damping,
        attempts = attempts,
        "calibration converged"
    );
}

/// Log distinct equilibria found from different initial guesses.
pub fn multiple_equilibria_detected(node_id: &str, chosen_value: f64, alternate_value: f64) {
    tracing::warn!(
        event = "multiple_equilibria_detected",
        node_id = %node_id,
        chosen_value = chosen_value,
        alternate_value = alternate_value,
        "multiple equilibria detected"
    );
}

/// Log how a simulation run ended.
pub fn simulation_terminated(target_node: &str, state: &str, steps: u32) {
    tracing::info!(
        event = "simulation_terminated",
        target_node = %target_node,
        state = %state,
        steps = steps,
        "simulation terminated"
    );
}

/// Log a finished Monte Carlo propagation.
pub fn monte_carlo_completed(samples: usize, converged: usize, elapsed_ms: u64) {
    tracing::info!(
        event = "monte_carlo_completed",
        samples = samples,
        converged = converged,
        elapsed_ms = elapsed_ms,
        "monte carlo propagation completed"
    );
}

/// Log a failed run.
pub fn run_failed(geography_id: &str, code: &str, error: &str) {
    tracing::error!(
        event = "run_failed",
        geography_id = %geography_id,
        code = %code,
        error = %error,
        "simulation run failed"
    );
}
