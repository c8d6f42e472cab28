//! Loading, validation and indexing of mechanism banks.

use cascade_bank::{BankDocument, MechanismBank};
use cascade_core::errors::{BankError, CascadeError};
use cascade_core::models::{EffectSize, FunctionalForm, Mechanism, Node, NodeKind};
use test_fixtures::{fixture_path, load_fixture, load_fixture_text};

// ── Helpers ──────────────────────────────────────────────────────────────

fn chain() -> BankDocument {
    BankDocument::new("test-v1")
        .with_node(Node::new("A", NodeKind::Structural, 0.0, 100.0))
        .with_node(Node::new("B", NodeKind::Intermediate, 0.0, 100.0))
        .with_node(Node::new("C", NodeKind::CrisisEndpoint, 0.0, 1000.0))
        .with_mechanism(Mechanism::new(
            "a_to_b",
            "A",
            "B",
            FunctionalForm::Sigmoid,
            EffectSize::new(0.5, 0.4, 0.6),
        ))
        .with_mechanism(Mechanism::new(
            "b_to_c",
            "B",
            "C",
            FunctionalForm::linear(),
            EffectSize::new(2.0, 1.6, 2.4),
        ))
}

fn bank_error(document: BankDocument) -> BankError {
    match MechanismBank::from_document(document) {
        Err(CascadeError::BankError(e)) => e,
        Err(other) => panic!("expected bank error, got {other}"),
        Ok(_) => panic!("expected bank error, bank loaded"),
    }
}

// ── Loading ──────────────────────────────────────────────────────────────

#[test]
fn loads_three_node_fixture() {
    let document: BankDocument = load_fixture("banks/three_node.json");
    let bank = MechanismBank::from_document(document).unwrap();

    assert_eq!(bank.version(), "three-node-v1");
    assert_eq!(bank.node_count(), 3);
    assert_eq!(bank.mechanism_count(), 2);
    assert_eq!(bank.structural(), vec![0]);
    assert_eq!(bank.intermediates(), vec![1]);
    assert_eq!(bank.endpoints(), vec![2]);
    assert!(bank.feedback_loops().is_empty());
}

#[test]
fn json_and_toml_banks_hash_identically() {
    let from_json = BankDocument::load(fixture_path("banks/three_node.json")).unwrap();
    let from_toml = BankDocument::from_toml_str(&load_fixture_text("banks/three_node.toml")).unwrap();

    assert_eq!(from_json, from_toml);
    assert_eq!(
        from_json.content_hash().unwrap(),
        from_toml.content_hash().unwrap()
    );
}

#[test]
fn content_hash_tracks_changes() {
    let a = chain();
    let mut b = chain();
    b.mechanisms[0].base_effect = EffectSize::new(0.55, 0.4, 0.6);

    let bank_a = MechanismBank::from_document(a).unwrap();
    let bank_b = MechanismBank::from_document(b).unwrap();
    assert_eq!(bank_a.content_hash().len(), 64);
    assert_ne!(bank_a.content_hash(), bank_b.content_hash());
}

#[test]
fn load_shared_reads_file() {
    let bank = MechanismBank::load_shared(fixture_path("banks/regional_cascade.json")).unwrap();
    assert_eq!(bank.version(), "regional-cascade-2024.1");
    assert_eq!(bank.endpoints().len(), 2);
    let shared = std::sync::Arc::clone(&bank);
    assert_eq!(shared.content_hash(), bank.content_hash());
}

#[test]
fn missing_file_is_io_error() {
    let err = BankDocument::load("/nonexistent/bank.json").unwrap_err();
    assert!(matches!(err, CascadeError::BankError(BankError::Io { .. })));
}

#[test]
fn malformed_document_is_rejected() {
    let err = BankDocument::from_json_str(r#"{"version": "x", "nodes": 3}"#).unwrap_err();
    assert!(matches!(
        err,
        CascadeError::BankError(BankError::InvalidDocument { .. })
    ));
}

// ── Indexing ─────────────────────────────────────────────────────────────

#[test]
fn index_lookups_are_consistent() {
    let bank = MechanismBank::from_document(chain()).unwrap();

    let b = bank.index_of("B").unwrap();
    assert_eq!(bank.node(b).id, "B");
    assert_eq!(bank.node_by_id("C").unwrap().kind, NodeKind::CrisisEndpoint);
    assert!(bank.index_of("Z").is_none());

    let m = bank.mechanism_index_of("b_to_c").unwrap();
    assert_eq!(bank.edge(m), (1, 2));
    assert_eq!(bank.incoming(2), &[m]);
    assert_eq!(bank.outgoing(1), &[m]);
    assert!(bank.mechanism_by_id("missing").is_none());
}

// ── Validation ───────────────────────────────────────────────────────────

#[test]
fn unknown_to_node_is_rejected() {
    let document: BankDocument = load_fixture("banks/unknown_to_node.json");
    match bank_error(document) {
        BankError::UnknownNodeReference {
            mechanism_id,
            node_id,
            endpoint,
        } => {
            assert_eq!(mechanism_id, "b_to_missing");
            assert_eq!(node_id, "Z");
            assert_eq!(endpoint, "to_node");
        }
        other => panic!("unexpected {other}"),
    }
}

#[test]
fn unknown_from_node_is_rejected() {
    let document = chain().with_mechanism(Mechanism::new(
        "ghost",
        "Q",
        "C",
        FunctionalForm::Logarithmic,
        EffectSize::new(1.0, 0.5, 1.5),
    ));
    assert!(matches!(
        bank_error(document),
        BankError::UnknownNodeReference { endpoint: "from_node", .. }
    ));
}

#[test]
fn duplicate_ids_are_rejected() {
    let document = chain().with_node(Node::new("B", NodeKind::Intermediate, 0.0, 1.0));
    assert!(matches!(bank_error(document), BankError::DuplicateNode { .. }));

    let mut document = chain();
    let copy = document.mechanisms[0].clone();
    document.mechanisms.push(copy);
    assert!(matches!(
        bank_error(document),
        BankError::DuplicateMechanism { .. }
    ));
}

#[test]
fn invalid_ranges_and_rates_are_rejected() {
    let document = chain().with_node(Node::new("D", NodeKind::Intermediate, 5.0, 5.0));
    assert!(matches!(bank_error(document), BankError::InvalidRange { .. }));

    let mut node = Node::new("D", NodeKind::Intermediate, 0.0, 10.0);
    node.adjustment_rate = 1.5;
    assert!(matches!(
        bank_error(chain().with_node(node)),
        BankError::InvalidNode { .. }
    ));

    let mut node = Node::new("D", NodeKind::Structural, 0.0, 10.0);
    node.baseline_value = Some(11.0);
    assert!(matches!(
        bank_error(chain().with_node(node)),
        BankError::InvalidNode { .. }
    ));
}

#[test]
fn invalid_effects_are_rejected() {
    let mut document = chain();
    document.mechanisms[0].base_effect = EffectSize::new(0.7, 0.4, 0.6);
    assert!(matches!(bank_error(document), BankError::InvalidEffect { .. }));

    let mut document = chain();
    document.mechanisms[1].functional_form = FunctionalForm::Linear {
        max_step_fraction: 0.0,
    };
    assert!(matches!(bank_error(document), BankError::InvalidEffect { .. }));

    let mut document = chain();
    document.mechanisms[1].posterior_samples = Some(Vec::new());
    assert!(matches!(bank_error(document), BankError::InvalidEffect { .. }));

    let mut document = chain();
    document.mechanisms[1].base_effect = EffectSize::new(f64::NAN, 1.0, 2.0);
    assert!(matches!(bank_error(document), BankError::InvalidEffect { .. }));
}

// ── Feedback loops ───────────────────────────────────────────────────────

#[test]
fn saturating_loop_is_accepted_and_indexed() {
    let document: BankDocument = load_fixture("banks/feedback_loop.json");
    let bank = MechanismBank::from_document(document).unwrap();

    assert_eq!(bank.feedback_loops().len(), 1);
    let feedback = &bank.feedback_loops()[0];
    let b = bank.index_of("B").unwrap();
    let d = bank.index_of("D").unwrap();
    assert_eq!(feedback.nodes, {
        let mut nodes = vec![b, d];
        nodes.sort_unstable();
        nodes
    });
    assert!(bank.is_in_loop(bank.mechanism_index_of("b_to_d").unwrap()));
    assert!(bank.is_in_loop(bank.mechanism_index_of("d_to_b").unwrap()));
    assert!(!bank.is_in_loop(bank.mechanism_index_of("d_to_c").unwrap()));
}

#[test]
fn multiplicative_edge_on_cycle_is_rejected() {
    let document: BankDocument = load_fixture("banks/unbounded_loop.json");
    match bank_error(document) {
        BankError::UnboundedFeedbackLoop {
            mechanism_id,
            cycle,
        } => {
            assert_eq!(mechanism_id, "b_times_d");
            assert!(cycle.contains('B') && cycle.contains('D'));
        }
        other => panic!("unexpected {other}"),
    }
}

#[test]
fn multiplicative_self_loop_is_rejected() {
    let document = chain().with_mechanism(Mechanism::new(
        "b_self",
        "B",
        "B",
        FunctionalForm::Multiplicative,
        EffectSize::new(0.01, 0.0, 0.02),
    ));
    assert!(matches!(
        bank_error(document),
        BankError::UnboundedFeedbackLoop { .. }
    ));
}

#[test]
fn multiplicative_edge_off_cycle_is_allowed() {
    let document = chain().with_mechanism(Mechanism::new(
        "a_times_c",
        "A",
        "C",
        FunctionalForm::Multiplicative,
        EffectSize::new(0.001, 0.0, 0.002),
    ));
    let bank = MechanismBank::from_document(document).unwrap();
    assert!(bank.feedback_loops().is_empty());
}
