//! # cascade-engine
//!
//! The single entry point for a simulation request. Resolves the geography's
//! context, moderates every mechanism, calibrates the baseline, steps the
//! intervention forward, propagates effect uncertainty and projects the
//! crisis endpoints into a serializable [`SimulationOutput`].
//!
//! [`SimulationOutput`]: cascade_core::models::SimulationOutput

pub mod engine;

pub use engine::CascadeEngine;
