//! Engine configuration, loaded from TOML with every field defaulted.
//!
//! # Examples
//!
//! ```
//! use cascade_core::config::CascadeConfig;
//!
//! let config = CascadeConfig::from_toml_str("[solver]\nmax_iterations = 200\n").unwrap();
//! assert_eq!(config.solver.max_iterations, 200);
//! assert!((config.solver.tolerance - 0.01).abs() < f64::EPSILON);
//! ```

pub mod defaults;
pub mod moderation_config;
pub mod observability_config;
pub mod simulation_config;
pub mod solver_config;
pub mod uncertainty_config;

use std::path::Path;

use serde::{Deserialize, Serialize};

pub use moderation_config::{CombinationPolicy, ModerationConfig};
pub use observability_config::ObservabilityConfig;
pub use simulation_config::SimulationConfig;
pub use solver_config::SolverConfig;
pub use uncertainty_config::UncertaintyConfig;

use crate::errors::{CascadeResult, ConfigError};

/// Root configuration for one engine instance.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CascadeConfig {
    pub solver: SolverConfig,
    pub simulation: SimulationConfig,
    pub uncertainty: UncertaintyConfig,
    pub moderation: ModerationConfig,
    pub observability: ObservabilityConfig,
}

impl CascadeConfig {
    /// Parse and validate a TOML document. Missing sections take their defaults.
    pub fn from_toml_str(content: &str) -> CascadeResult<Self> {
        let config: Self = toml::from_str(content).map_err(|e| ConfigError::Parse {
            reason: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn load(path: impl AsRef<Path>) -> CascadeResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_toml_str(&content)
    }

    /// Reject values the solvers cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("solver.tolerance", self.solver.tolerance)?;
        positive("simulation.tolerance", self.simulation.tolerance)?;
        positive("solver.finite_difference_step", self.solver.finite_difference_step)?;
        positive("moderation.clip_ci_multiple", self.moderation.clip_ci_multiple)?;

        if self.solver.max_iterations == 0 {
            return Err(ConfigError::Invalid {
                field: "solver.max_iterations",
                reason: "must be at least 1".to_string(),
            });
        }
        if !(self.solver.initial_damping > 0.0 && self.solver.initial_damping <= 1.0) {
            return Err(ConfigError::Invalid {
                field: "solver.initial_damping",
                reason: format!("{} is outside (0, 1]", self.solver.initial_damping),
            });
        }
        if !(self.solver.min_damping > 0.0 && self.solver.min_damping <= self.solver.initial_damping)
        {
            return Err(ConfigError::Invalid {
                field: "solver.min_damping",
                reason: format!(
                    "{} is outside (0, initial_damping]",
                    self.solver.min_damping
                ),
            });
        }
        if let Some(bad) = self
            .solver
            .alternate_guesses
            .iter()
            .find(|g| !(0.0..=1.0).contains(*g))
        {
            return Err(ConfigError::Invalid {
                field: "solver.alternate_guesses",
                reason: format!("{bad} is outside [0, 1]"),
            });
        }
        if self.simulation.convergence_window == 0 {
            return Err(ConfigError::Invalid {
                field: "simulation.convergence_window",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.uncertainty.samples == 0 {
            return Err(ConfigError::Invalid {
                field: "uncertainty.samples",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.uncertainty.worker_threads == Some(0) {
            return Err(ConfigError::Invalid {
                field: "uncertainty.worker_threads",
                reason: "must be at least 1 when set".to_string(),
            });
        }
        if !(self.uncertainty.ci_level > 0.0 && self.uncertainty.ci_level < 1.0) {
            return Err(ConfigError::Invalid {
                field: "uncertainty.ci_level",
                reason: format!("{} is outside (0, 1)", self.uncertainty.ci_level),
            });
        }
        Ok(())
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: format!("{value} must be a positive finite number"),
        })
    }
}
