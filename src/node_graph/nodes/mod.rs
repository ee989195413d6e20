use crate::models::node_graph::*;
use crate::node_graph::state::ExecutionState;
use crate::node_graph::{clamp_channel, mix, NodeExecutionContext};

mod apply;
mod audio;
mod midi;
mod signals;

pub fn run_node(node: &Node, ctx: &NodeExecutionContext<'_>, state: &mut ExecutionState) {
    if audio::run_node(node, ctx, state) {
        return;
    }
    if midi::run_node(node, ctx, state) {
        return;
    }
    if signals::run_node(node, ctx, state) {
        return;
    }
    apply::run_node(node, ctx, state);
}

/// Source values of every usable edge landing on `port`, in edge order.
fn port_values(
    node: &Node,
    port: usize,
    ctx: &NodeExecutionContext<'_>,
    state: &ExecutionState,
) -> Vec<f64> {
    ctx.incoming_on_port(&node.id, port)
        .filter_map(|edge| state.source_value(ctx, edge))
        .collect()
}
