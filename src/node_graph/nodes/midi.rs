use super::*;
use crate::midi::{lookup, MidiKey};

/// A toggle fires when the raw value crosses above this.
pub const TOGGLE_THRESHOLD: f64 = 127.0;
const LATCH_ON: f64 = 255.0;

pub fn run_node(node: &Node, ctx: &NodeExecutionContext<'_>, state: &mut ExecutionState) -> bool {
    let NodeKind::Midi(params) = &node.kind else {
        return false;
    };

    let raw = clamp_channel(lookup(&ctx.input.midi_state, &MidiKey::from_params(params)));
    let value = match params.mode {
        MidiMode::Momentary => momentary(raw),
        MidiMode::Toggle => {
            let previous = match &node.state {
                NodeState::Toggle(toggle_state) => toggle_state.clone(),
                _ => ToggleState::default(),
            };
            let next = toggle(raw, &previous);
            let latched = next.latched;
            state.patch(&node.id, NodeState::Toggle(next));
            latched
        }
    };

    state.set_output(&node.id, vec![value]);
    true
}

pub fn momentary(raw: f64) -> f64 {
    raw
}

/// Flip the latch on each rising edge through the threshold.
pub fn toggle(raw: f64, previous: &ToggleState) -> ToggleState {
    let rising = raw > TOGGLE_THRESHOLD && previous.prev_raw <= TOGGLE_THRESHOLD;
    let latched = match (rising, previous.latched > 0.0) {
        (true, true) => 0.0,
        (true, false) => LATCH_ON,
        (false, _) => previous.latched,
    };
    ToggleState {
        prev_raw: raw,
        latched,
    }
}
