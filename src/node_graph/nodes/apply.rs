use super::*;
use crate::models::universe::{DeviceWrite, UNIVERSE_SIZE};

pub fn run_node(node: &Node, ctx: &NodeExecutionContext<'_>, state: &mut ExecutionState) -> bool {
    let NodeKind::Fixture(params) = &node.kind else {
        return false;
    };

    let mut values = Vec::with_capacity(params.channel_count);
    for port in 0..params.channel_count {
        let has_edges = ctx.incoming_on_port(&node.id, port).next().is_some();
        let raw = if has_edges {
            mix(&port_values(node, port, ctx, state), node.mixing)
        } else {
            params.manual_values.get(port).copied().unwrap_or(0.0)
        };
        let muted = params.mutes.get(port).copied().unwrap_or(false);
        let value = if muted { 0.0 } else { clamp_channel(raw).round() };
        values.push(value);

        let channel = params.start_channel as usize + port;
        if channel == 0 || channel > UNIVERSE_SIZE {
            log::trace!(
                "fixture '{}' port {port} maps to channel {channel}, outside the universe",
                node.id
            );
            continue;
        }
        state.device_writes.push(DeviceWrite {
            channel: channel as u16,
            value: value as u8,
        });
    }

    state.set_output(&node.id, values);
    true
}
