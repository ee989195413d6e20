use std::collections::HashMap;

use crate::models::node_graph::{Edge, Graph, Node};

/// Index nodes by id. On duplicate ids the first declaration wins.
pub fn index_nodes(graph: &Graph) -> HashMap<&str, &Node> {
    let mut nodes_by_id = HashMap::with_capacity(graph.nodes.len());
    for node in &graph.nodes {
        nodes_by_id.entry(node.id.as_str()).or_insert(node);
    }
    nodes_by_id
}

/// Group usable edges by target, preserving edge-list order. Edges whose
/// target is missing or whose target port is out of range are dropped here;
/// dangling sources are resolved (to nothing) when read.
pub fn index_incoming_edges<'a>(
    graph: &'a Graph,
    nodes_by_id: &HashMap<&'a str, &'a Node>,
) -> HashMap<&'a str, Vec<&'a Edge>> {
    let mut incoming_edges: HashMap<&str, Vec<&Edge>> = HashMap::new();
    for edge in &graph.edges {
        let Some(target) = nodes_by_id.get(edge.target_node_id.as_str()) else {
            log::trace!("skipping edge '{}': unknown target", edge.id);
            continue;
        };
        if edge.target_port_index >= target.kind.input_count() {
            log::trace!(
                "skipping edge '{}': port {} out of range",
                edge.id,
                edge.target_port_index
            );
            continue;
        }
        incoming_edges
            .entry(edge.target_node_id.as_str())
            .or_default()
            .push(edge);
    }
    incoming_edges
}

/// Node evaluation order: stable sort by type priority.
pub fn evaluation_order(graph: &Graph) -> Vec<&Node> {
    let mut ordered: Vec<&Node> = graph.nodes.iter().collect();
    ordered.sort_by_key(|node| node.node_type().priority());
    ordered
}
