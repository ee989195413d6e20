use std::collections::HashMap;

use crate::models::node_graph::{Edge, NodeState};
use crate::models::universe::DeviceWrite;
use crate::node_graph::NodeExecutionContext;

pub struct ExecutionState {
    pub outputs: HashMap<String, Vec<f64>>,
    pub device_writes: Vec<DeviceWrite>,
    pub state_patches: HashMap<String, NodeState>,
}

impl ExecutionState {
    pub fn new() -> Self {
        Self {
            outputs: HashMap::new(),
            device_writes: Vec::new(),
            state_patches: HashMap::new(),
        }
    }

    /// Output vector of a source node: this pass if computed already, else the
    /// snapshot values from the previous tick.
    pub fn source_vector<'s>(
        &'s self,
        ctx: &'s NodeExecutionContext<'_>,
        node_id: &str,
    ) -> Option<&'s [f64]> {
        if let Some(values) = self.outputs.get(node_id) {
            return Some(values.as_slice());
        }
        ctx.nodes_by_id
            .get(node_id)
            .map(|node| node.values.as_slice())
    }

    /// Scalar carried by one edge. `None` when the edge is dangling or names a
    /// port the source does not have.
    pub fn source_value(&self, ctx: &NodeExecutionContext<'_>, edge: &Edge) -> Option<f64> {
        let source = ctx.nodes_by_id.get(edge.source_node_id.as_str())?;
        if edge.source_port_index >= source.kind.output_count() {
            return None;
        }
        let value = self
            .source_vector(ctx, &edge.source_node_id)
            .and_then(|values| values.get(edge.source_port_index).copied())
            .unwrap_or(0.0);
        Some(value)
    }

    pub fn set_output(&mut self, node_id: &str, values: Vec<f64>) {
        self.outputs.insert(node_id.to_string(), values);
    }

    pub fn patch(&mut self, node_id: &str, state: NodeState) {
        self.state_patches.insert(node_id.to_string(), state);
    }
}
