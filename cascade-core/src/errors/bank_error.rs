/// Mechanism/node bank errors. All of these are raised at load time,
/// before any solver iteration runs.
#[derive(Debug, thiserror::Error)]
pub enum BankError {
    #[error("mechanism {mechanism_id} references unknown {endpoint} node '{node_id}'")]
    UnknownNodeReference {
        mechanism_id: String,
        node_id: String,
        endpoint: &'static str,
    },

    #[error("duplicate node id '{node_id}'")]
    DuplicateNode { node_id: String },

    #[error("duplicate mechanism id '{mechanism_id}'")]
    DuplicateMechanism { mechanism_id: String },

    #[error("node {node_id} has an invalid valid range [{min}, {max}]")]
    InvalidRange { node_id: String, min: f64, max: f64 },

    #[error("node {node_id} is invalid: {reason}")]
    InvalidNode { node_id: String, reason: String },

    #[error("mechanism {mechanism_id} has an invalid effect: {reason}")]
    InvalidEffect {
        mechanism_id: String,
        reason: String,
    },

    #[error("mechanism {mechanism_id} uses a non-saturating form inside feedback loop {cycle}")]
    UnboundedFeedbackLoop { mechanism_id: String, cycle: String },

    #[error("invalid bank document: {reason}")]
    InvalidDocument { reason: String },

    #[error("failed to read bank {path}: {reason}")]
    Io { path: String, reason: String },
}
