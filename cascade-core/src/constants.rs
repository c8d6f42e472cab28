/// Engine version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// z-score of the two-sided 95% interval, used to turn a CI into a standard error.
pub const Z_95: f64 = 1.96;

/// Relative difference above which two calibrated solutions count as distinct equilibria.
pub const MULTIPLE_EQUILIBRIA_THRESHOLD: f64 = 0.10;

/// Asymptotic efficiency factor of the sample median relative to the mean (sqrt(pi/2)).
pub const MEDIAN_SE_FACTOR: f64 = 1.253_314_137_315_500_3;

/// Upper bound on the time horizon a single run may request.
pub const MAX_TIME_HORIZON: u32 = 100;

/// Upper bound on Monte Carlo draws per propagation.
pub const MAX_UNCERTAINTY_SAMPLES: usize = 100_000;
