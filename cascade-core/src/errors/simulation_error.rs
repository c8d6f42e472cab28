/// Time simulator failures.
#[derive(Debug, thiserror::Error)]
pub enum SimulationError {
    #[error("simulation exceeded its time budget after {elapsed_ms} ms at step {step}")]
    Timeout { elapsed_ms: u64, step: u32 },

    #[error("stock vector has {actual} entries, bank has {expected} nodes")]
    DimensionMismatch { expected: usize, actual: usize },
}
