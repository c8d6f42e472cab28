//! Span definitions per pipeline stage: run, moderation, calibration,
//! simulation, Monte Carlo and projection.

/// Create a span for one full engine run.
#[macro_export]
macro_rules! run_span {
    ($geography_id:expr, $target_node:expr) => {
        tracing::info_span!("cascade.run", geography_id = %$geography_id, target_node = %$target_node)
    };
}

/// Create a moderation span.
#[macro_export]
macro_rules! moderation_span {
    ($mechanism_count:expr) => {
        tracing::info_span!("cascade.moderation", mechanism_count = $mechanism_count)
    };
}

/// Create a calibration span.
#[macro_export]
macro_rules! calibration_span {
    ($free_nodes:expr) => {
        tracing::info_span!("cascade.calibration", free_nodes = $free_nodes)
    };
}

/// Create a simulation span.
#[macro_export]
macro_rules! simulation_span {
    ($target_node:expr, $horizon:expr) => {
        tracing::info_span!("cascade.simulation", target_node = %$target_node, horizon = $horizon)
    };
}

/// Create a Monte Carlo span.
#[macro_export]
macro_rules! monte_carlo_span {
    ($samples:expr) => {
        tracing::info_span!("cascade.monte_carlo", samples = $samples)
    };
}

/// Create a projection span.
#[macro_export]
macro_rules! projection_span {
    ($endpoints:expr) => {
        tracing::info_span!("cascade.projection", endpoints = $endpoints)
    };
}

/// Span names as constants for programmatic use.
pub mod names {
    pub const RUN: &str = "cascade.run";
    pub const MODERATION: &str = "cascade.moderation";
    pub const CALIBRATION: &str = "cascade.calibration";
    pub const SIMULATION: &str = "cascade.simulation";
    pub const MONTE_CARLO: &str = "cascade.monte_carlo";
    pub const PROJECTION: &str = "cascade.projection";
}
