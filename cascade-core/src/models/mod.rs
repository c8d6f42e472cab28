//! Data model shared by every component: the bank records, run inputs and
//! run outputs.

pub mod context;
pub mod diagnostic;
pub mod intervention;
pub mod mechanism;
pub mod node;
pub mod output;

pub use context::{GeographicContext, PolicyValue};
pub use diagnostic::Diagnostic;
pub use intervention::{InterventionRequest, InterventionSpec, RampSchedule, SimulationRequest};
pub use mechanism::{
    EffectSize, FunctionalForm, Mechanism, Moderator, ModeratorCondition, ModeratorKind,
    ThresholdDirection,
};
pub use node::{Measurement, Node, NodeKind, Unit, ValidRange};
pub use output::{
    CalibrationSummary, ProjectionResult, SimulationOutput, SimulationPhase, Termination,
    TrajectoryPoint, UncertaintySummary,
};
