use std::collections::HashMap;

use crate::models::node_graph::{Edge, EvaluationInput, Node};
use crate::node_graph::EvaluationConfig;

/// Shared, read-only inputs that every node execution might need.
pub struct NodeExecutionContext<'a> {
    /// Valid edges per target node, in edge-declaration order
    pub incoming_edges: &'a HashMap<&'a str, Vec<&'a Edge>>,
    pub nodes_by_id: &'a HashMap<&'a str, &'a Node>,
    pub input: &'a EvaluationInput,
    pub config: &'a EvaluationConfig,
}

impl<'a> NodeExecutionContext<'a> {
    pub fn incoming(&self, node_id: &str) -> &[&'a Edge] {
        self.incoming_edges
            .get(node_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn incoming_on_port<'s>(
        &'s self,
        node_id: &str,
        port: usize,
    ) -> impl Iterator<Item = &'a Edge> + 's {
        self.incoming(node_id)
            .iter()
            .copied()
            .filter(move |e| e.target_port_index == port)
    }
}
