use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use crate::models::node_graph::{EvaluationInput, EvaluationResult, Graph};
use crate::node_graph::context::{evaluation_order, index_incoming_edges, index_nodes};
use crate::node_graph::state::ExecutionState;
use crate::node_graph::{nodes, NodeExecutionContext};

static RUN_COUNTER: AtomicU64 = AtomicU64::new(1);

#[derive(Clone, Debug, Default)]
pub struct EvaluationConfig {
    pub log_summary: bool,
}

/// One tick of the signal-flow graph. Pure: the graph is only read, and hidden
/// state comes back as patches for the caller to merge.
pub fn evaluate(graph: &Graph, input: &EvaluationInput) -> EvaluationResult {
    evaluate_with_config(graph, input, &EvaluationConfig::default())
}

pub fn evaluate_with_config(
    graph: &Graph,
    input: &EvaluationInput,
    config: &EvaluationConfig,
) -> EvaluationResult {
    let run_id = RUN_COUNTER.fetch_add(1, Ordering::Relaxed);
    let run_start = Instant::now();

    if graph.nodes.is_empty() {
        return EvaluationResult::default();
    }

    let nodes_by_id = index_nodes(graph);
    let incoming_edges = index_incoming_edges(graph, &nodes_by_id);
    let node_context = NodeExecutionContext {
        incoming_edges: &incoming_edges,
        nodes_by_id: &nodes_by_id,
        input,
        config,
    };

    let mut state = ExecutionState::new();
    for node in evaluation_order(graph) {
        nodes::run_node(node, &node_context, &mut state);
    }

    if config.log_summary {
        log::debug!(
            "[evaluate #{run_id}] nodes={} writes={} ms={:.3}",
            graph.nodes.len(),
            state.device_writes.len(),
            run_start.elapsed().as_secs_f64() * 1000.0
        );
    }

    EvaluationResult {
        node_outputs: state.outputs,
        device_writes: state.device_writes,
        state_patches: state.state_patches,
    }
}
