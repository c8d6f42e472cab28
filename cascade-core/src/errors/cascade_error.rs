use super::{BankError, CalibrationError, ConfigError, ContextError, SimulationError};

/// Top-level error for every fallible engine operation.
#[derive(Debug, thiserror::Error)]
pub enum CascadeError {
    #[error("bank error: {0}")]
    BankError(#[from] BankError),

    #[error("context error: {0}")]
    ContextError(#[from] ContextError),

    #[error("calibration error: {0}")]
    CalibrationError(#[from] CalibrationError),

    #[error("simulation error: {0}")]
    SimulationError(#[from] SimulationError),

    #[error("config error: {0}")]
    ConfigError(#[from] ConfigError),

    #[error("{stage} cancelled after {progress} iterations")]
    Cancelled { stage: &'static str, progress: usize },

    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("worker pool error: {reason}")]
    WorkerPoolError { reason: String },
}

impl CascadeError {
    /// True when the caller's input was invalid (bank, context, request or
    /// config), as opposed to the model failing to find a stable solution.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::BankError(_) | Self::ContextError(_) | Self::ConfigError(_)
        )
    }

    /// True for wall-clock budget overruns in either solver.
    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            Self::CalibrationError(CalibrationError::Timeout { .. })
                | Self::SimulationError(SimulationError::Timeout { .. })
        )
    }

    /// Stable machine-readable code for the API layer.
    pub fn code(&self) -> &'static str {
        match self {
            Self::BankError(BankError::UnknownNodeReference { .. }) => "UNKNOWN_NODE_REFERENCE",
            Self::BankError(BankError::UnboundedFeedbackLoop { .. }) => "UNBOUNDED_FEEDBACK_LOOP",
            Self::BankError(_) => "INVALID_BANK",
            Self::ContextError(ContextError::MissingBaselineData { .. }) => "MISSING_BASELINE_DATA",
            Self::ContextError(ContextError::UnknownGeography { .. }) => "UNKNOWN_GEOGRAPHY",
            Self::ContextError(ContextError::RequestLimitExceeded { .. }) => {
                "REQUEST_LIMIT_EXCEEDED"
            }
            Self::ContextError(_) => "INVALID_REQUEST",
            Self::CalibrationError(CalibrationError::DidNotConverge { .. }) => {
                "CALIBRATION_DID_NOT_CONVERGE"
            }
            Self::CalibrationError(CalibrationError::Timeout { .. }) => "CALIBRATION_TIMEOUT",
            Self::CalibrationError(CalibrationError::LinearSolve { .. }) => "CALIBRATION_FAILED",
            Self::SimulationError(SimulationError::Timeout { .. }) => "SIMULATION_TIMEOUT",
            Self::SimulationError(_) => "SIMULATION_FAILED",
            Self::ConfigError(_) => "INVALID_CONFIG",
            Self::Cancelled { .. } => "CANCELLED",
            Self::SerializationError(_) => "SERIALIZATION_FAILED",
            Self::WorkerPoolError { .. } => "WORKER_POOL_FAILED",
        }
    }
}

/// Convenience alias used across the workspace.
pub type CascadeResult<T> = Result<T, CascadeError>;
