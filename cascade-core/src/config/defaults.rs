// Single source of truth for all default values.

// --- Solver ---
pub const DEFAULT_SOLVER_TOLERANCE: f64 = 0.01;
pub const DEFAULT_MAX_ITERATIONS: usize = 500;
pub const DEFAULT_INITIAL_DAMPING: f64 = 0.5;
pub const DEFAULT_MIN_DAMPING: f64 = 1.0 / 1024.0;
pub const DEFAULT_FINITE_DIFFERENCE_STEP: f64 = 1e-6; // node-normalized
pub const DEFAULT_SINGULAR_VALUE_EPSILON: f64 = 1e-9;
pub const DEFAULT_ALTERNATE_GUESSES: [f64; 2] = [0.25, 0.75];

// --- Simulation ---
pub const DEFAULT_SIMULATION_TOLERANCE: f64 = 0.01;
pub const DEFAULT_TIME_HORIZON: u32 = 10;
pub const DEFAULT_CONVERGENCE_WINDOW: u32 = 2;
pub const DEFAULT_SPARSE_EVALUATION: bool = true;

// --- Mechanisms ---
pub const DEFAULT_LINEAR_MAX_STEP_FRACTION: f64 = 0.1;
pub const DEFAULT_ADJUSTMENT_RATE: f64 = 1.0;

// --- Moderation ---
pub const DEFAULT_CLIP_CI_MULTIPLE: f64 = 5.0;

// --- Uncertainty ---
pub const DEFAULT_UNCERTAINTY_SAMPLES: usize = 1_000;
pub const DEFAULT_SEED: u64 = 0x5EED_CA5C;
pub const DEFAULT_CI_LEVEL: f64 = 0.95;

// --- Observability ---
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_JSON_LOGS: bool = true;
