//! # cascade-observability
//!
//! Structured tracing for the engine: subscriber setup driven by
//! `CASCADE_LOG` or the observability config, span definitions per pipeline
//! stage, and named events for calibration, moderation, simulation and
//! Monte Carlo milestones.

pub mod tracing_setup;

pub use tracing_setup::{init_tracing, init_tracing_from_config, init_tracing_with_filter};
