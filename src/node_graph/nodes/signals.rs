use super::*;

pub fn run_node(node: &Node, ctx: &NodeExecutionContext<'_>, state: &mut ExecutionState) -> bool {
    match &node.kind {
        NodeKind::Constant(params) => {
            state.set_output(&node.id, vec![clamp_channel(params.value)]);
            true
        }
        NodeKind::Math(params) => {
            let inputs = port_values(node, 0, ctx, state);
            let mixed = mix(&inputs, node.mixing);
            let value = clamp_channel(params.scale * mixed + params.offset);
            state.set_output(&node.id, vec![value]);
            true
        }
        _ => false,
    }
}
