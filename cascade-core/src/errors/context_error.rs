/// Geographic context and request validation errors.
#[derive(Debug, thiserror::Error)]
pub enum ContextError {
    #[error("missing baseline data for {kind} node '{node_id}'")]
    MissingBaselineData { node_id: String, kind: &'static str },

    #[error("unknown geography '{geography_id}'")]
    UnknownGeography { geography_id: String },

    #[error("invalid intervention: {reason}")]
    InvalidIntervention { reason: String },

    #[error("request field {field} is {value}, above the limit of {limit}")]
    RequestLimitExceeded {
        field: &'static str,
        value: usize,
        limit: usize,
    },

    #[error("value {value} for node {node_id} is outside its valid range [{min}, {max}]")]
    ValueOutOfRange {
        node_id: String,
        value: f64,
        min: f64,
        max: f64,
    },
}
