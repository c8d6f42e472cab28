/// Equilibrium solver failures. Numerical failures carry the state reached so far.
#[derive(Debug, thiserror::Error)]
pub enum CalibrationError {
    #[error("calibration did not converge after {iterations} iterations (residual {residual:.6})")]
    DidNotConverge {
        iterations: usize,
        residual: f64,
        /// Last iterate as (node id, value) pairs for every free node.
        last_iterate: Vec<(String, f64)>,
    },

    #[error("calibration exceeded its time budget after {elapsed_ms} ms ({iterations} iterations, residual {residual:.6})")]
    Timeout {
        elapsed_ms: u64,
        iterations: usize,
        residual: f64,
    },

    #[error("linearized calibration step could not be solved: {reason}")]
    LinearSolve { reason: String },
}
