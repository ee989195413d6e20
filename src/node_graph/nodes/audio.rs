use super::*;

/// Low-band level an onset has to exceed, before the gate margin.
const ONSET_FLOOR: f64 = 100.0;
const ONSET_GATE_MARGIN: f64 = 20.0;
const REFRACTORY_MS: f64 = 250.0;
const BEAT_TIMEOUT_MS: f64 = 2000.0;
const BPM_WINDOW: usize = 8;
const MIN_BPM: f64 = 40.0;
const MAX_BPM: f64 = 200.0;

pub fn run_node(node: &Node, ctx: &NodeExecutionContext<'_>, state: &mut ExecutionState) -> bool {
    match &node.kind {
        NodeKind::Input => {
            let levels = ctx
                .input
                .band_levels
                .get(&node.id)
                .copied()
                .unwrap_or_default()
                .to_array()
                .map(clamp_channel);
            state.set_output(&node.id, levels.to_vec());
            true
        }
        NodeKind::Audio(params) => {
            let previous = match &node.state {
                NodeState::Audio(audio_state) => audio_state.clone(),
                _ => AudioState::default(),
            };
            let raw = raw_bands(node, ctx, state);
            let held = follow_envelope(raw, previous.held, params);
            let next = track_beat(held[0], params.gate, ctx.input.now_ms, &previous);
            let next = AudioState { held, ..next };

            state.set_output(&node.id, held.to_vec());
            state.patch(&node.id, NodeState::Audio(next));
            true
        }
        _ => false,
    }
}

/// Bands feeding an analyzer: the whole vector behind `signal-in` when wired,
/// otherwise the numeric ports (one input broadcasts to all three bands).
fn raw_bands(node: &Node, ctx: &NodeExecutionContext<'_>, state: &ExecutionState) -> [f64; 3] {
    let signal = ctx
        .incoming_on_port(&node.id, AUDIO_SIGNAL_IN_PORT)
        .find_map(|edge| state.source_vector(ctx, &edge.source_node_id));
    if let Some(vector) = signal {
        return std::array::from_fn(|band| vector.get(band).copied().unwrap_or(0.0));
    }

    let numeric: Vec<f64> = ctx
        .incoming(&node.id)
        .iter()
        .filter(|edge| edge.target_port_index != AUDIO_SIGNAL_IN_PORT)
        .filter_map(|edge| state.source_value(ctx, edge))
        .take(3)
        .collect();
    match numeric.as_slice() {
        [] => [0.0; 3],
        [single] => [*single; 3],
        many => std::array::from_fn(|band| many.get(band).copied().unwrap_or(0.0)),
    }
}

/// Gain, gate and a peak-hold release per band.
pub fn follow_envelope(raw: [f64; 3], held: [f64; 3], params: &AudioParams) -> [f64; 3] {
    let hold = 0.5 + params.decay.clamp(0.0, 1.0) * 0.49;
    std::array::from_fn(|band| {
        let mut p = raw[band] * params.gain;
        if p < params.gate {
            p = 0.0;
        }
        if p < held[band] {
            p = p.max(held[band] * hold);
        }
        clamp_channel(p)
    })
}

/// Onset detection on the low band plus a rolling tempo estimate.
/// Returns the next state with `held` carried over from `previous`.
pub fn track_beat(low: f64, gate: f64, now_ms: f64, previous: &AudioState) -> AudioState {
    let mut next = AudioState {
        is_beat: false,
        ..previous.clone()
    };

    let threshold = ONSET_FLOOR.max(gate + ONSET_GATE_MARGIN);
    let since_onset = previous.last_onset_ms.map(|last| now_ms - last);
    let outside_refractory = since_onset.map_or(true, |elapsed| elapsed >= REFRACTORY_MS);

    if low > threshold && outside_refractory {
        next.is_beat = true;
        if let Some(interval) = since_onset {
            let bpm = 60_000.0 / interval;
            if (MIN_BPM..=MAX_BPM).contains(&bpm) {
                next.bpm_window.push(bpm);
                if next.bpm_window.len() > BPM_WINDOW {
                    next.bpm_window.remove(0);
                }
            }
        }
        if !next.bpm_window.is_empty() {
            next.bpm = next.bpm_window.iter().sum::<f64>() / next.bpm_window.len() as f64;
        }
        next.last_onset_ms = Some(now_ms);
    } else if since_onset.is_some_and(|elapsed| elapsed > BEAT_TIMEOUT_MS) {
        next.bpm = 0.0;
        next.bpm_window.clear();
    }

    next
}
