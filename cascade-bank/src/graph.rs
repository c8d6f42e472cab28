//! Feedback-loop analysis over the mechanism graph.
//! Cycles are allowed; every edge inside one must use a saturating form.

use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;

use cascade_core::errors::BankError;
use cascade_core::models::{Mechanism, Node};

/// Directed graph: node weight = node position, edge weight = mechanism position.
pub type MechanismGraph = DiGraph<usize, usize>;

/// A strongly connected set of nodes and the mechanisms that close it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedbackLoop {
    pub nodes: Vec<usize>,
    pub mechanisms: Vec<usize>,
}

/// Build the graph from resolved `(from, to)` pairs.
pub fn build(node_count: usize, edges: &[(usize, usize)]) -> MechanismGraph {
    let mut graph = DiGraph::with_capacity(node_count, edges.len());
    for i in 0..node_count {
        graph.add_node(i);
    }
    for (m, &(from, to)) in edges.iter().enumerate() {
        graph.add_edge(NodeIndex::new(from), NodeIndex::new(to), m);
    }
    graph
}

/// Every SCC with more than one node, plus single nodes with a self-loop.
pub fn find_feedback_loops(graph: &MechanismGraph) -> Vec<FeedbackLoop> {
    let mut loops = Vec::new();
    for scc in tarjan_scc(graph) {
        let is_loop = scc.len() > 1 || graph.contains_edge(scc[0], scc[0]);
        if !is_loop {
            continue;
        }
        let mut mechanisms: Vec<usize> = scc
            .iter()
            .flat_map(|&n| graph.edges(n))
            .filter(|e| scc.contains(&e.target()))
            .map(|e| *e.weight())
            .collect();
        mechanisms.sort_unstable();
        let mut nodes: Vec<usize> = scc.iter().map(|n| graph[*n]).collect();
        nodes.sort_unstable();
        loops.push(FeedbackLoop { nodes, mechanisms });
    }
    loops
}

/// Reject any loop edge whose form does not saturate.
pub fn enforce_saturating_loops(
    loops: &[FeedbackLoop],
    nodes: &[Node],
    mechanisms: &[Mechanism],
) -> Result<(), BankError> {
    for feedback in loops {
        if let Some(&m) = feedback
            .mechanisms
            .iter()
            .find(|&&m| !mechanisms[m].functional_form.is_self_limiting())
        {
            let cycle = feedback
                .nodes
                .iter()
                .map(|&n| nodes[n].id.as_str())
                .collect::<Vec<_>>()
                .join(" -> ");
            return Err(BankError::UnboundedFeedbackLoop {
                mechanism_id: mechanisms[m].id.clone(),
                cycle,
            });
        }
    }
    Ok(())
}
