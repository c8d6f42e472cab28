//! Immutable arena of nodes and mechanisms. Runs refer to entries by index.

use std::collections::HashMap;
use std::sync::Arc;

use cascade_core::errors::CascadeResult;
use cascade_core::models::{Mechanism, Node, NodeKind};
use tracing::info;

use crate::document::BankDocument;
use crate::graph::{self, FeedbackLoop};
use crate::validation;

/// A bank shared read-only across runs and Monte Carlo workers.
pub type SharedBank = Arc<MechanismBank>;

/// Validated, frozen mechanism bank.
#[derive(Debug)]
pub struct MechanismBank {
    version: String,
    content_hash: String,
    nodes: Vec<Node>,
    mechanisms: Vec<Mechanism>,
    node_index: HashMap<String, usize>,
    mechanism_index: HashMap<String, usize>,
    /// Resolved `(from, to)` node positions per mechanism.
    edges: Vec<(usize, usize)>,
    incoming: Vec<Vec<usize>>,
    outgoing: Vec<Vec<usize>>,
    feedback_loops: Vec<FeedbackLoop>,
    in_loop: Vec<bool>,
}

impl MechanismBank {
    /// Validate a document and freeze it. All structural errors surface here.
    pub fn from_document(document: BankDocument) -> CascadeResult<Self> {
        let content_hash = document.content_hash()?;
        let BankDocument {
            version,
            nodes,
            mechanisms,
        } = document;

        let node_index = validation::validate_nodes(&nodes)?;
        let edges = validation::validate_mechanisms(&mechanisms, &node_index)?;

        let mechanism_graph = graph::build(nodes.len(), &edges);
        let feedback_loops = graph::find_feedback_loops(&mechanism_graph);
        graph::enforce_saturating_loops(&feedback_loops, &nodes, &mechanisms)?;

        let mut incoming = vec![Vec::new(); nodes.len()];
        let mut outgoing = vec![Vec::new(); nodes.len()];
        for (m, &(from, to)) in edges.iter().enumerate() {
            outgoing[from].push(m);
            incoming[to].push(m);
        }
        let mut in_loop = vec![false; mechanisms.len()];
        for feedback in &feedback_loops {
            for &m in &feedback.mechanisms {
                in_loop[m] = true;
            }
        }
        let mechanism_index = mechanisms
            .iter()
            .enumerate()
            .map(|(i, m)| (m.id.clone(), i))
            .collect();

        info!(
            version = %version,
            nodes = nodes.len(),
            mechanisms = mechanisms.len(),
            feedback_loops = feedback_loops.len(),
            "mechanism bank loaded"
        );

        Ok(Self {
            version,
            content_hash,
            nodes,
            mechanisms,
            node_index,
            mechanism_index,
            edges,
            incoming,
            outgoing,
            feedback_loops,
            in_loop,
        })
    }

    /// Load, validate and wrap a bank file for sharing.
    pub fn load_shared(path: impl AsRef<std::path::Path>) -> CascadeResult<SharedBank> {
        let document = BankDocument::load(path)?;
        Ok(Arc::new(Self::from_document(document)?))
    }

    pub fn into_shared(self) -> SharedBank {
        Arc::new(self)
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn content_hash(&self) -> &str {
        &self.content_hash
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn mechanisms(&self) -> &[Mechanism] {
        &self.mechanisms
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn mechanism_count(&self) -> usize {
        self.mechanisms.len()
    }

    pub fn node(&self, index: usize) -> &Node {
        &self.nodes[index]
    }

    pub fn mechanism(&self, index: usize) -> &Mechanism {
        &self.mechanisms[index]
    }

    pub fn index_of(&self, node_id: &str) -> Option<usize> {
        self.node_index.get(node_id).copied()
    }

    pub fn node_by_id(&self, node_id: &str) -> Option<&Node> {
        self.index_of(node_id).map(|i| &self.nodes[i])
    }

    pub fn mechanism_index_of(&self, mechanism_id: &str) -> Option<usize> {
        self.mechanism_index.get(mechanism_id).copied()
    }

    pub fn mechanism_by_id(&self, mechanism_id: &str) -> Option<&Mechanism> {
        self.mechanism_index_of(mechanism_id)
            .map(|i| &self.mechanisms[i])
    }

    /// `(from, to)` node positions of a mechanism.
    pub fn edge(&self, mechanism: usize) -> (usize, usize) {
        self.edges[mechanism]
    }

    pub fn edges(&self) -> &[(usize, usize)] {
        &self.edges
    }

    /// Mechanisms flowing into `node`.
    pub fn incoming(&self, node: usize) -> &[usize] {
        &self.incoming[node]
    }

    /// Mechanisms flowing out of `node`.
    pub fn outgoing(&self, node: usize) -> &[usize] {
        &self.outgoing[node]
    }

    pub fn feedback_loops(&self) -> &[FeedbackLoop] {
        &self.feedback_loops
    }

    pub fn is_in_loop(&self, mechanism: usize) -> bool {
        self.in_loop[mechanism]
    }

    /// Positions of all nodes of one kind, in bank order.
    pub fn indices_of_kind(&self, kind: NodeKind) -> Vec<usize> {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.kind == kind)
            .map(|(i, _)| i)
            .collect()
    }

    pub fn structural(&self) -> Vec<usize> {
        self.indices_of_kind(NodeKind::Structural)
    }

    pub fn intermediates(&self) -> Vec<usize> {
        self.indices_of_kind(NodeKind::Intermediate)
    }

    pub fn endpoints(&self) -> Vec<usize> {
        self.indices_of_kind(NodeKind::CrisisEndpoint)
    }
}
