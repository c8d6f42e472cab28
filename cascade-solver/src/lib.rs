//! # cascade-solver
//!
//! The numerical core: the Cascade Calculator (flow vector for a stock
//! vector), the Equilibrium Solver (inverse calibration of intermediate
//! stocks against observed endpoints) and the Time Simulator (stepping an
//! intervention to reconvergence or the horizon).

pub mod calculator;
pub mod equilibrium;
pub mod flow;
pub mod simulator;

pub use calculator::{derive_residuals, CascadeCalculator, FlowCache};
pub use equilibrium::{Anchors, Baseline, CalibrationReport, EquilibriumSolver};
pub use simulator::{resolve_intervention, SimulationRun, TimeSimulator};
