//! # cascade-core
//!
//! Foundation crate for the mechanism cascade engine.
//! Defines the node/mechanism data model, run inputs and outputs, errors,
//! config, cancellation, and the traits collaborators implement.
//! Every other crate in the workspace depends on this.

pub mod config;
pub mod constants;
pub mod control;
pub mod errors;
pub mod models;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use config::CascadeConfig;
pub use control::{CancellationToken, Deadline};
pub use errors::{CascadeError, CascadeResult};
pub use models::{
    Diagnostic, EffectSize, FunctionalForm, GeographicContext, InterventionSpec, Mechanism,
    Moderator, Node, NodeKind, ValidRange,
};
