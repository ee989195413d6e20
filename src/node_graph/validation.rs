use std::collections::HashSet;

use crate::error::GraphError;
use crate::models::node_graph::{Graph, NodeKind};
use crate::models::universe::UNIVERSE_SIZE;

impl Graph {
    /// Every structural problem in the graph. Evaluation tolerates all of
    /// these; loaders and hosts use this to surface them.
    pub fn validate(&self) -> Vec<GraphError> {
        let mut errors = Vec::new();

        let mut seen = HashSet::new();
        for node in &self.nodes {
            if !seen.insert(node.id.as_str()) {
                errors.push(GraphError::DuplicateNode(node.id.clone()));
            }
            if let NodeKind::Fixture(params) = &node.kind {
                let expected = params.channel_count;
                for (field, actual) in [
                    ("manualValues", params.manual_values.len()),
                    ("mutes", params.mutes.len()),
                ] {
                    if actual != expected {
                        errors.push(GraphError::FixtureArrayLength {
                            node: node.id.clone(),
                            field,
                            actual,
                            expected,
                        });
                    }
                }
                if expected > 0 {
                    let first = params.start_channel as u32;
                    let last = first + expected as u32 - 1;
                    if first == 0 || last > UNIVERSE_SIZE as u32 {
                        errors.push(GraphError::ChannelRange {
                            node: node.id.clone(),
                            first,
                            last,
                        });
                    }
                }
            }
        }

        for edge in &self.edges {
            let endpoints = [
                (&edge.source_node_id, edge.source_port_index, true),
                (&edge.target_node_id, edge.target_port_index, false),
            ];
            for (node_id, port, is_source) in endpoints {
                let Some(node) = self.node(node_id) else {
                    errors.push(GraphError::DanglingEdge {
                        edge: edge.id.clone(),
                        node: node_id.clone(),
                    });
                    continue;
                };
                let available = if is_source {
                    node.kind.output_count()
                } else {
                    node.kind.input_count()
                };
                if port >= available {
                    errors.push(GraphError::PortOutOfRange {
                        node: node_id.clone(),
                        port,
                        available,
                    });
                }
            }
        }

        errors
    }
}
