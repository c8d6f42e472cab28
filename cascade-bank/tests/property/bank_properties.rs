//! Property tests for bank validation and feedback-loop detection.

use proptest::prelude::*;

use cascade_bank::{BankDocument, MechanismBank};
use cascade_core::errors::{BankError, CascadeError};
use cascade_core::models::{EffectSize, FunctionalForm, Mechanism, Node, NodeKind};

fn document(n: usize, edges: &[(usize, usize, bool)]) -> BankDocument {
    let mut doc = BankDocument::new("prop");
    for i in 0..n {
        doc = doc.with_node(Node::new(format!("n{i}"), NodeKind::Intermediate, 0.0, 100.0));
    }
    for (k, &(from, to, multiplicative)) in edges.iter().enumerate() {
        let form = if multiplicative {
            FunctionalForm::Multiplicative
        } else {
            FunctionalForm::Sigmoid
        };
        doc = doc.with_mechanism(Mechanism::new(
            format!("m{k}"),
            format!("n{from}"),
            format!("n{to}"),
            form,
            EffectSize::new(0.1, 0.05, 0.15),
        ));
    }
    doc
}

fn edge_strategy(n: usize) -> impl Strategy<Value = Vec<(usize, usize, bool)>> {
    prop::collection::vec((0..n, 0..n, any::<bool>()), 0..n * 3)
}

proptest! {
    #[test]
    fn self_limiting_graphs_always_load(edges in edge_strategy(12)) {
        let edges: Vec<_> = edges.into_iter().map(|(f, t, _)| (f, t, false)).collect();
        let bank = MechanismBank::from_document(document(12, &edges));
        prop_assert!(bank.is_ok());
    }

    #[test]
    fn loops_only_contain_internal_edges(edges in edge_strategy(10)) {
        let edges: Vec<_> = edges.into_iter().map(|(f, t, _)| (f, t, false)).collect();
        let bank = MechanismBank::from_document(document(10, &edges)).unwrap();
        for feedback in bank.feedback_loops() {
            for &m in &feedback.mechanisms {
                let (from, to) = bank.edge(m);
                prop_assert!(feedback.nodes.contains(&from));
                prop_assert!(feedback.nodes.contains(&to));
            }
        }
    }

    #[test]
    fn rejection_names_a_multiplicative_loop_edge(edges in edge_strategy(8)) {
        match MechanismBank::from_document(document(8, &edges)) {
            Ok(bank) => {
                for feedback in bank.feedback_loops() {
                    for &m in &feedback.mechanisms {
                        prop_assert!(bank.mechanism(m).functional_form.is_self_limiting());
                    }
                }
            }
            Err(CascadeError::BankError(BankError::UnboundedFeedbackLoop { mechanism_id, .. })) => {
                let k: usize = mechanism_id.trim_start_matches('m').parse().unwrap();
                prop_assert!(edges[k].2);
            }
            Err(other) => prop_assert!(false, "unexpected error {}", other),
        }
    }
}
