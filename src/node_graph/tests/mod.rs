use std::collections::HashMap;

use proptest::prelude::*;

use super::{
    evaluate, evaluate_with_config, AudioParams, BandLevels, ConstantParams, Edge,
    EvaluationConfig, EvaluationInput, EvaluationResult, FixtureParams, Graph, MathParams,
    MidiMode, MidiParams, MixingStrategy, Node, NodeKind, NodeState,
};
use crate::models::universe::DeviceWrite;

fn constant(id: &str, value: f64) -> Node {
    Node::new(id, id, NodeKind::Constant(ConstantParams { value }))
}

fn math(id: &str, scale: f64, offset: f64) -> Node {
    Node::new(id, id, NodeKind::Math(MathParams { scale, offset }))
}

fn fixture(id: &str, start_channel: u16, channel_count: usize) -> Node {
    Node::new(
        id,
        id,
        NodeKind::Fixture(FixtureParams {
            fixture_type: "dimmer".into(),
            start_channel,
            channel_count,
            manual_values: vec![0.0; channel_count],
            mutes: vec![false; channel_count],
        }),
    )
}

fn audio(id: &str, params: AudioParams) -> Node {
    Node::new(id, id, NodeKind::Audio(params))
}

fn midi(id: &str, mode: MidiMode) -> Node {
    Node::new(
        id,
        id,
        NodeKind::Midi(MidiParams {
            device_id: "pad".into(),
            channel: 1,
            index: 7,
            mode,
            ..MidiParams::default()
        }),
    )
}

fn midi_cc(id: &str, index: u8) -> Node {
    Node::new(
        id,
        id,
        NodeKind::Midi(MidiParams {
            device_id: "pad".into(),
            channel: 1,
            index,
            ..MidiParams::default()
        }),
    )
}

fn with_bands(node_id: &str, low: f64, mid: f64, high: f64) -> EvaluationInput {
    let mut input = EvaluationInput::default();
    input
        .band_levels
        .insert(node_id.to_string(), BandLevels::new(low, mid, high));
    input
}

fn write(channel: u16, value: u8) -> DeviceWrite {
    DeviceWrite { channel, value }
}

/// Merge a result back the way the host does between ticks.
fn merge(graph: &mut Graph, result: &EvaluationResult) {
    for node in &mut graph.nodes {
        if let Some(values) = result.node_outputs.get(&node.id) {
            node.values = values.clone();
        }
        if let Some(patch) = result.state_patches.get(&node.id) {
            node.state = patch.clone();
        }
    }
}

#[test]
fn empty_graph_evaluates_to_nothing() {
    let result = evaluate(&Graph::default(), &EvaluationInput::default());
    assert!(result.node_outputs.is_empty());
    assert!(result.device_writes.is_empty());
    assert!(result.state_patches.is_empty());
}

#[test]
fn input_node_forwards_band_levels() {
    let graph = Graph::new(vec![Node::new("in", "Input", NodeKind::Input)], Vec::new());
    let result = evaluate(&graph, &with_bands("in", 10.0, 300.0, -4.0));
    assert_eq!(result.node_outputs["in"], vec![10.0, 255.0, 0.0]);

    let silent = evaluate(&graph, &EvaluationInput::default());
    assert_eq!(silent.node_outputs["in"], vec![0.0, 0.0, 0.0]);
}

#[test]
fn fixture_mixes_each_port_and_writes_in_port_order() {
    let mut graph = Graph::new(
        vec![
            fixture("f", 10, 2),
            constant("a", 10.0),
            constant("b", 50.0),
            constant("c", 90.0),
        ],
        vec![
            Edge::new("a", 0, "f", 0),
            Edge::new("b", 0, "f", 0),
            Edge::new("c", 0, "f", 0),
        ],
    );
    if let NodeKind::Fixture(params) = &mut graph.nodes[0].kind {
        params.manual_values[1] = 42.4;
    }

    let expectations = [
        (MixingStrategy::Sum, 150),
        (MixingStrategy::Max, 90),
        (MixingStrategy::Avg, 50),
        (MixingStrategy::Last, 90),
    ];
    for (strategy, expected) in expectations {
        graph.nodes[0].mixing = strategy;
        let result = evaluate(&graph, &EvaluationInput::default());
        assert_eq!(
            result.device_writes,
            vec![write(10, expected), write(11, 42)],
            "{strategy:?}"
        );
    }
}

#[test]
fn last_mixing_follows_edge_order() {
    let mut graph = Graph::new(
        vec![constant("hi", 200.0), constant("lo", 5.0), fixture("f", 1, 1)],
        vec![Edge::new("hi", 0, "f", 0), Edge::new("lo", 0, "f", 0)],
    );
    graph.nodes[2].mixing = MixingStrategy::Last;
    let result = evaluate(&graph, &EvaluationInput::default());
    assert_eq!(result.device_writes, vec![write(1, 5)]);
}

#[test]
fn sum_overflow_is_clamped_at_the_fixture() {
    let mut target = fixture("f", 1, 1);
    target.mixing = MixingStrategy::Sum;
    let graph = Graph::new(
        vec![constant("a", 200.0), constant("b", 200.0), target],
        vec![Edge::new("a", 0, "f", 0), Edge::new("b", 0, "f", 0)],
    );
    let result = evaluate(&graph, &EvaluationInput::default());
    assert_eq!(result.device_writes, vec![write(1, 255)]);
    assert_eq!(result.node_outputs["f"], vec![255.0]);
}

#[test]
fn muted_channels_write_zero() {
    let mut target = fixture("f", 1, 2);
    if let NodeKind::Fixture(params) = &mut target.kind {
        params.manual_values = vec![120.0, 120.0];
        params.mutes = vec![true, false];
    }
    let graph = Graph::new(
        vec![constant("c", 250.0), target],
        vec![Edge::new("c", 0, "f", 0)],
    );
    let result = evaluate(&graph, &EvaluationInput::default());
    assert_eq!(result.device_writes, vec![write(1, 0), write(2, 120)]);
}

#[test]
fn writes_outside_the_universe_are_skipped() {
    let mut target = fixture("f", 511, 3);
    if let NodeKind::Fixture(params) = &mut target.kind {
        params.manual_values = vec![1.0, 2.0, 3.0];
    }
    let result = evaluate(&Graph::new(vec![target], Vec::new()), &EvaluationInput::default());
    assert_eq!(result.device_writes, vec![write(511, 1), write(512, 2)]);
    assert_eq!(result.node_outputs["f"], vec![1.0, 2.0, 3.0]);
}

#[test]
fn overlapping_fixtures_emit_duplicate_writes() {
    let mut first = fixture("a", 5, 1);
    let mut second = fixture("b", 5, 1);
    if let NodeKind::Fixture(params) = &mut first.kind {
        params.manual_values = vec![10.0];
    }
    if let NodeKind::Fixture(params) = &mut second.kind {
        params.manual_values = vec![20.0];
    }
    let result = evaluate(&Graph::new(vec![first, second], Vec::new()), &EvaluationInput::default());
    assert_eq!(result.device_writes, vec![write(5, 10), write(5, 20)]);
}

#[test]
fn invalid_edges_contribute_nothing() {
    let graph = Graph::new(
        vec![constant("c", 80.0), fixture("f", 1, 1)],
        vec![
            Edge::new("ghost", 0, "f", 0),
            Edge::new("c", 3, "f", 0),
            Edge::new("c", 0, "f", 4),
            Edge::new("c", 0, "nowhere", 0),
        ],
    );
    let result = evaluate(&graph, &EvaluationInput::default());
    // no usable edge on port 0 besides the invalid ones: mix of nothing is 0
    assert_eq!(result.device_writes, vec![write(1, 0)]);
}

#[test]
fn math_scales_and_offsets_mixed_input() {
    let mut m = math("m", 0.5, 10.0);
    m.mixing = MixingStrategy::Avg;
    let graph = Graph::new(
        vec![constant("a", 100.0), constant("b", 200.0), m],
        vec![Edge::new("a", 0, "m", 0), Edge::new("b", 0, "m", 0)],
    );
    let result = evaluate(&graph, &EvaluationInput::default());
    assert_eq!(result.node_outputs["m"], vec![85.0]);

    let unwired = Graph::new(vec![math("m", 2.0, -5.0)], Vec::new());
    let result = evaluate(&unwired, &EvaluationInput::default());
    assert_eq!(result.node_outputs["m"], vec![0.0]);
}

#[test]
fn evaluation_order_ignores_declaration_order() {
    let graph = Graph::new(
        vec![fixture("f", 1, 1), math("m", 1.0, 0.0), constant("c", 64.0)],
        vec![Edge::new("c", 0, "m", 0), Edge::new("m", 0, "f", 0)],
    );
    let result = evaluate(&graph, &EvaluationInput::default());
    assert_eq!(result.device_writes, vec![write(1, 64)]);
}

#[test]
fn math_chain_declared_backwards_reads_previous_tick() {
    // m2 is declared first, so it runs before m1 and sees m1's snapshot
    let mut graph = Graph::new(
        vec![
            math("m2", 1.0, 0.0),
            math("m1", 1.0, 0.0),
            constant("c", 100.0),
        ],
        vec![Edge::new("c", 0, "m1", 0), Edge::new("m1", 0, "m2", 0)],
    );
    let first = evaluate(&graph, &EvaluationInput::default());
    assert_eq!(first.node_outputs["m1"], vec![100.0]);
    assert_eq!(first.node_outputs["m2"], vec![0.0]);

    merge(&mut graph, &first);
    let second = evaluate(&graph, &EvaluationInput::default());
    assert_eq!(second.node_outputs["m2"], vec![100.0]);
}

#[test]
fn cycles_terminate_with_stale_values() {
    let mut graph = Graph::new(
        vec![math("a", 1.0, 10.0), math("b", 1.0, 10.0)],
        vec![Edge::new("a", 0, "b", 0), Edge::new("b", 0, "a", 0)],
    );
    let mut last_a = 0.0;
    for _ in 0..40 {
        let result = evaluate(&graph, &EvaluationInput::default());
        let a = result.node_outputs["a"][0];
        assert!(a >= last_a);
        last_a = a;
        merge(&mut graph, &result);
    }
    assert_eq!(last_a, 255.0);
}

#[test]
fn self_loop_does_not_hang() {
    let graph = Graph::new(
        vec![math("m", 1.0, 1.0)],
        vec![Edge::new("m", 0, "m", 0)],
    );
    let result = evaluate(&graph, &EvaluationInput::default());
    assert_eq!(result.node_outputs["m"], vec![1.0]);
}

#[test]
fn audio_reads_the_signal_in_vector() {
    let graph = Graph::new(
        vec![
            Node::new("in", "Input", NodeKind::Input),
            audio("au", AudioParams::default()),
        ],
        vec![Edge::new("in", 0, "au", 0)],
    );
    let result = evaluate(&graph, &with_bands("in", 30.0, 60.0, 90.0));
    assert_eq!(result.node_outputs["au"], vec![30.0, 60.0, 90.0]);
    assert!(matches!(
        result.state_patches.get("au"),
        Some(NodeState::Audio(state)) if state.held == [30.0, 60.0, 90.0]
    ));
}

#[test]
fn audio_broadcasts_a_single_numeric_input() {
    let graph = Graph::new(
        vec![midi_cc("fader", 1), audio("au", AudioParams::default())],
        vec![Edge::new("fader", 0, "au", 2)],
    );
    let mut input = EvaluationInput::default();
    input.midi_state.insert("pad__1-cc-1".into(), 40.0);
    let result = evaluate(&graph, &input);
    assert_eq!(result.node_outputs["au"], vec![40.0, 40.0, 40.0]);
}

#[test]
fn audio_takes_numeric_inputs_in_edge_order() {
    let graph = Graph::new(
        vec![
            midi_cc("a", 1),
            midi_cc("b", 2),
            audio("au", AudioParams::default()),
        ],
        vec![Edge::new("b", 0, "au", 1), Edge::new("a", 0, "au", 3)],
    );
    let mut input = EvaluationInput::default();
    input.midi_state.insert("pad__1-cc-1".into(), 10.0);
    input.midi_state.insert("pad__1-cc-2".into(), 20.0);
    let result = evaluate(&graph, &input);
    assert_eq!(result.node_outputs["au"], vec![20.0, 10.0, 0.0]);
}

#[test]
fn audio_fed_by_a_constant_lags_one_tick() {
    // constants run after analyzers, so the first tick sees the snapshot
    let mut graph = Graph::new(
        vec![constant("c", 40.0), audio("au", AudioParams::default())],
        vec![Edge::new("c", 0, "au", 2)],
    );
    let first = evaluate(&graph, &EvaluationInput::default());
    assert_eq!(first.node_outputs["au"], vec![0.0, 0.0, 0.0]);

    merge(&mut graph, &first);
    let second = evaluate(&graph, &EvaluationInput::default());
    assert_eq!(second.node_outputs["au"], vec![40.0, 40.0, 40.0]);
}

#[test]
fn audio_decay_survives_host_merge() {
    let params = AudioParams {
        gain: 1.0,
        gate: 0.0,
        decay: 0.9,
    };
    let mut graph = Graph::new(
        vec![Node::new("in", "Input", NodeKind::Input), audio("au", params)],
        vec![Edge::new("in", 0, "au", 0)],
    );
    let loud = evaluate(&graph, &with_bands("in", 200.0, 200.0, 200.0));
    merge(&mut graph, &loud);

    let quiet = evaluate(&graph, &with_bands("in", 0.0, 0.0, 0.0));
    for band in &quiet.node_outputs["au"] {
        assert!(*band >= 188.2 - 1e-9);
    }
}

#[test]
fn audio_beat_refractory_through_the_evaluator() {
    let mut graph = Graph::new(
        vec![
            Node::new("in", "Input", NodeKind::Input),
            audio(
                "au",
                AudioParams {
                    decay: 0.0,
                    ..AudioParams::default()
                },
            ),
        ],
        vec![Edge::new("in", 0, "au", 0)],
    );
    let mut beats = Vec::new();
    for now_ms in [0.0, 100.0] {
        let mut input = with_bands("in", 220.0, 0.0, 0.0);
        input.now_ms = now_ms;
        let result = evaluate(&graph, &input);
        if let Some(NodeState::Audio(state)) = result.state_patches.get("au") {
            beats.push(state.is_beat);
            assert_eq!(state.bpm, 0.0);
        }
        merge(&mut graph, &result);
    }
    assert_eq!(beats, vec![true, false]);
}

#[test]
fn midi_momentary_uses_fallback_keys() {
    let graph = Graph::new(vec![midi("m", MidiMode::Momentary)], Vec::new());
    let mut input = EvaluationInput::default();
    input.midi_state.insert("ALL__0-cc-7".into(), 77.0);
    let result = evaluate(&graph, &input);
    assert_eq!(result.node_outputs["m"], vec![77.0]);
    assert!(result.state_patches.get("m").is_none());

    input.midi_state.insert("pad__1-cc-7".into(), 12.0);
    let result = evaluate(&graph, &input);
    assert_eq!(result.node_outputs["m"], vec![12.0]);
}

#[test]
fn midi_toggle_sequence_through_host_merge() {
    let mut graph = Graph::new(vec![midi("m", MidiMode::Toggle)], Vec::new());
    let mut outputs = Vec::new();
    for raw in [0.0, 200.0, 0.0, 0.0, 200.0] {
        let mut input = EvaluationInput::default();
        input.midi_state.insert("pad__1-cc-7".into(), raw);
        let result = evaluate(&graph, &input);
        outputs.push(result.node_outputs["m"][0]);
        merge(&mut graph, &result);
    }
    assert_eq!(outputs, vec![0.0, 255.0, 255.0, 255.0, 0.0]);
}

#[test]
fn evaluation_is_idempotent_for_the_same_snapshot() {
    let graph = Graph::new(
        vec![
            Node::new("in", "Input", NodeKind::Input),
            audio("au", AudioParams::default()),
            midi("m", MidiMode::Toggle),
            math("x", 1.5, 3.0),
            fixture("f", 1, 3),
        ],
        vec![
            Edge::new("in", 0, "au", 0),
            Edge::new("au", 0, "x", 0),
            Edge::new("x", 0, "f", 0),
            Edge::new("m", 0, "f", 1),
            Edge::new("au", 2, "f", 2),
        ],
    );
    let mut input = with_bands("in", 140.0, 70.0, 35.0);
    input.midi_state.insert("pad__1-cc-7".into(), 255.0);
    input.now_ms = 1_234.0;

    let first = evaluate(&graph, &input);
    let second = evaluate_with_config(&graph, &input, &EvaluationConfig { log_summary: true });
    assert_eq!(first, second);
}

#[test]
fn every_output_stays_in_channel_range() {
    let mut sum = fixture("f", 1, 2);
    sum.mixing = MixingStrategy::Sum;
    let graph = Graph::new(
        vec![
            Node::new("in", "Input", NodeKind::Input),
            audio(
                "au",
                AudioParams {
                    gain: 40.0,
                    ..AudioParams::default()
                },
            ),
            constant("neg", -90.0),
            math("big", 1e9, 1e9),
            sum,
        ],
        vec![
            Edge::new("in", 0, "au", 0),
            Edge::new("au", 0, "big", 0),
            Edge::new("big", 0, "f", 0),
            Edge::new("neg", 0, "f", 1),
            Edge::new("au", 1, "f", 1),
        ],
    );
    let result = evaluate(&graph, &with_bands("in", 250.0, f64::NAN, 1e12));
    let all: HashMap<&String, &Vec<f64>> = result.node_outputs.iter().collect();
    for (id, values) in all {
        for value in values {
            assert!((0.0..=255.0).contains(value), "{id} produced {value}");
        }
    }
}

fn any_mixing() -> impl Strategy<Value = MixingStrategy> {
    prop_oneof![
        Just(MixingStrategy::Sum),
        Just(MixingStrategy::Max),
        Just(MixingStrategy::Avg),
        Just(MixingStrategy::Last),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(512))]

    /// Whatever the inputs and params, every output lands in 0..=255,
    /// including on the tick after hidden state has been merged.
    #[test]
    fn outputs_stay_in_channel_range_for_any_input(
        bands in prop::array::uniform3(any::<f64>()),
        (gain, gate, decay) in (any::<f64>(), any::<f64>(), any::<f64>()),
        (scale, offset) in (any::<f64>(), any::<f64>()),
        constant_value in any::<f64>(),
        manual in prop::array::uniform3(any::<f64>()),
        midi_raw in any::<f64>(),
        toggle_mode in any::<bool>(),
        mixing in any_mixing(),
        now_ms in 0.0f64..1e7,
    ) {
        let mode = if toggle_mode { MidiMode::Toggle } else { MidiMode::Momentary };
        let mut target = fixture("f", 1, 3);
        if let NodeKind::Fixture(params) = &mut target.kind {
            params.manual_values = manual.to_vec();
        }
        let mut graph = Graph::new(
            vec![
                Node::new("in", "Input", NodeKind::Input),
                midi("m", mode),
                audio("au", AudioParams { gain, gate, decay }),
                constant("c", constant_value),
                math("x", scale, offset).mixing(mixing),
                target.mixing(mixing),
            ],
            vec![
                Edge::new("in", 0, "au", 0),
                Edge::new("au", 0, "x", 0),
                Edge::new("m", 0, "x", 0),
                Edge::new("c", 0, "x", 0),
                Edge::new("x", 0, "f", 0),
                Edge::new("c", 0, "f", 1),
                Edge::new("au", 2, "f", 1),
            ],
        );

        let mut input = with_bands("in", bands[0], bands[1], bands[2]);
        input.midi_state.insert("pad__1-cc-7".into(), midi_raw);
        input.now_ms = now_ms;

        for _ in 0..2 {
            let result = evaluate(&graph, &input);
            for (id, values) in &result.node_outputs {
                for value in values {
                    prop_assert!((0.0..=255.0).contains(value), "{} produced {}", id, value);
                }
            }
            merge(&mut graph, &result);
            input.now_ms += 33.0;
        }
    }
}
