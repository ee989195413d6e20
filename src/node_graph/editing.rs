//! Editing helpers that keep a graph within its structural invariants.

use crate::error::GraphError;
use crate::models::node_graph::{Edge, Graph, Node};

impl Graph {
    pub fn add_node(&mut self, node: Node) -> Result<(), GraphError> {
        if self.node(&node.id).is_some() {
            return Err(GraphError::DuplicateNode(node.id));
        }
        self.nodes.push(node);
        Ok(())
    }

    /// Wire `source:source_port` into `target:target_port` and return the edge
    /// id. Connecting the same ports twice returns the existing edge.
    pub fn connect(
        &mut self,
        source: &str,
        source_port: usize,
        target: &str,
        target_port: usize,
    ) -> Result<String, GraphError> {
        if source == target {
            return Err(GraphError::SelfLoop(source.to_string()));
        }
        let source_node = self
            .node(source)
            .ok_or_else(|| GraphError::UnknownNode(source.to_string()))?;
        let target_node = self
            .node(target)
            .ok_or_else(|| GraphError::UnknownNode(target.to_string()))?;

        let outputs = source_node.kind.output_count();
        if source_port >= outputs {
            return Err(GraphError::PortOutOfRange {
                node: source.to_string(),
                port: source_port,
                available: outputs,
            });
        }
        let inputs = target_node.kind.input_count();
        if target_port >= inputs {
            return Err(GraphError::PortOutOfRange {
                node: target.to_string(),
                port: target_port,
                available: inputs,
            });
        }

        let edge = Edge::new(source, source_port, target, target_port);
        if let Some(existing) = self.edges.iter().find(|e| e.id == edge.id) {
            return Ok(existing.id.clone());
        }
        let id = edge.id.clone();
        self.edges.push(edge);
        Ok(id)
    }

    pub fn disconnect(&mut self, edge_id: &str) -> bool {
        let before = self.edges.len();
        self.edges.retain(|e| e.id != edge_id);
        self.edges.len() != before
    }

    /// Remove a node together with every edge touching it.
    pub fn remove_node(&mut self, id: &str) -> Option<Node> {
        let index = self.nodes.iter().position(|n| n.id == id)?;
        self.edges
            .retain(|e| e.source_node_id != id && e.target_node_id != id);
        Some(self.nodes.remove(index))
    }
}
