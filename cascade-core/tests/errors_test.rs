use cascade_core::errors::*;

#[test]
fn unknown_node_reference_names_mechanism_and_node() {
    let err = BankError::UnknownNodeReference {
        mechanism_id: "m1".into(),
        node_id: "ghost".into(),
        endpoint: "to_node",
    };
    let msg = err.to_string();
    assert!(msg.contains("m1"));
    assert!(msg.contains("ghost"));
    assert!(msg.contains("to_node"));
}

#[test]
fn did_not_converge_carries_residual() {
    let err = CalibrationError::DidNotConverge {
        iterations: 500,
        residual: 0.25,
        last_iterate: vec![("b".into(), 42.0)],
    };
    assert!(err.to_string().contains("500"));
    assert!(err.to_string().contains("0.25"));
}

// --- From impls ---

#[test]
fn bank_error_converts_to_cascade_error() {
    let err: CascadeError = BankError::DuplicateNode {
        node_id: "a".into(),
    }
    .into();
    assert!(matches!(err, CascadeError::BankError(_)));
    assert!(err.is_input_error());
    assert_eq!(err.code(), "INVALID_BANK");
}

#[test]
fn request_limit_has_its_own_code() {
    let err: CascadeError = ContextError::RequestLimitExceeded {
        field: "uncertainty_samples",
        value: 200_000,
        limit: 100_000,
    }
    .into();
    assert!(err.is_input_error());
    assert_eq!(err.code(), "REQUEST_LIMIT_EXCEEDED");
    assert!(err.to_string().contains("uncertainty_samples"));
}

#[test]
fn missing_baseline_is_input_error() {
    let err: CascadeError = ContextError::MissingBaselineData {
        node_id: "c".into(),
        kind: "crisis_endpoint",
    }
    .into();
    assert!(err.is_input_error());
    assert_eq!(err.code(), "MISSING_BASELINE_DATA");
}

#[test]
fn numerical_failures_are_not_input_errors() {
    let err: CascadeError = CalibrationError::DidNotConverge {
        iterations: 3,
        residual: 1.0,
        last_iterate: Vec::new(),
    }
    .into();
    assert!(!err.is_input_error());
    assert!(!err.is_timeout());
    assert_eq!(err.code(), "CALIBRATION_DID_NOT_CONVERGE");
}

#[test]
fn timeouts_are_distinct_from_non_convergence() {
    let calibration: CascadeError = CalibrationError::Timeout {
        elapsed_ms: 10,
        iterations: 2,
        residual: 0.5,
    }
    .into();
    let simulation: CascadeError = SimulationError::Timeout {
        elapsed_ms: 10,
        step: 4,
    }
    .into();
    assert!(calibration.is_timeout());
    assert!(simulation.is_timeout());
    assert_eq!(calibration.code(), "CALIBRATION_TIMEOUT");
    assert_eq!(simulation.code(), "SIMULATION_TIMEOUT");
}

#[test]
fn cancelled_reports_stage() {
    let err = CascadeError::Cancelled {
        stage: "calibration",
        progress: 7,
    };
    assert!(err.to_string().contains("calibration"));
    assert_eq!(err.code(), "CANCELLED");
}
