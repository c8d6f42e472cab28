//! Error handling for the cascade engine.
//! One error enum per subsystem, `thiserror` only, rolled up into `CascadeError`.

pub mod bank_error;
pub mod calibration_error;
pub mod cascade_error;
pub mod config_error;
pub mod context_error;
pub mod simulation_error;

pub use bank_error::BankError;
pub use calibration_error::CalibrationError;
pub use cascade_error::{CascadeError, CascadeResult};
pub use config_error::ConfigError;
pub use context_error::ContextError;
pub use simulation_error::SimulationError;
