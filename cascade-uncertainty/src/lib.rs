//! # cascade-uncertainty
//!
//! Reruns the Time Simulator with every mechanism's effect redrawn from its
//! uncertainty distribution, summarizes endpoint outcomes across draws, and
//! projects the change at each crisis endpoint into monetary and
//! population-weighted terms.

pub mod projector;
pub mod propagator;
pub mod sampler;
pub mod summary;

pub use projector::{stratify, OutcomeProjector, Projection};
pub use propagator::{draw_rng, Draw, Propagation, UncertaintyPropagator};
pub use sampler::{EffectDistribution, EffectSampler};
pub use summary::summarize;
