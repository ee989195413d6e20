use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use ts_rs::TS;

use super::universe::DeviceWrite;

/// Port index an audio node reads its full `{low, mid, high}` vector from.
pub const AUDIO_SIGNAL_IN_PORT: usize = 0;
/// Number of generic numeric inputs on an audio node (ports 1..=3).
pub const AUDIO_NUMERIC_INPUTS: usize = 3;

#[derive(TS, Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq)]
#[ts(export, export_to = "node_graph.ts")]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Reduction applied when several edges feed the same input port.
#[derive(TS, Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[ts(export, export_to = "node_graph.ts")]
#[serde(rename_all = "lowercase")]
pub enum MixingStrategy {
    Sum,
    #[default]
    Max,
    Avg,
    Last,
}

/// Bare node tag, used for ordering and layout heuristics.
#[derive(TS, Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[ts(export, export_to = "node_graph.ts")]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    Input,
    Midi,
    Audio,
    Constant,
    Math,
    Fixture,
}

impl NodeType {
    /// Evaluation priority: producers before consumers.
    pub fn priority(self) -> u8 {
        match self {
            NodeType::Input => 0,
            NodeType::Midi => 1,
            NodeType::Audio => 2,
            NodeType::Constant => 3,
            NodeType::Math => 4,
            NodeType::Fixture => 5,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            NodeType::Input => "input",
            NodeType::Midi => "midi",
            NodeType::Audio => "audio",
            NodeType::Constant => "constant",
            NodeType::Math => "math",
            NodeType::Fixture => "fixture",
        }
    }
}

#[derive(TS, Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[ts(export, export_to = "node_graph.ts")]
#[serde(rename_all = "lowercase")]
pub enum MidiMessageType {
    #[default]
    Cc,
    Note,
}

impl MidiMessageType {
    pub fn as_str(self) -> &'static str {
        match self {
            MidiMessageType::Cc => "cc",
            MidiMessageType::Note => "note",
        }
    }
}

#[derive(TS, Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[ts(export, export_to = "node_graph.ts")]
#[serde(rename_all = "lowercase")]
pub enum MidiMode {
    #[default]
    Momentary,
    Toggle,
}

#[derive(TS, Serialize, Deserialize, Clone, Debug, PartialEq)]
#[ts(export, export_to = "node_graph.ts")]
#[serde(rename_all = "camelCase", default)]
#[ts(rename_all = "camelCase")]
pub struct MidiParams {
    pub device_id: String,
    /// Last known device name, kept so a re-enumerated device can be matched again.
    pub device_name: Option<String>,
    /// MIDI channel 1-16, 0 = omni
    pub channel: u8,
    pub message_type: MidiMessageType,
    pub index: u8,
    pub mode: MidiMode,
}

impl Default for MidiParams {
    fn default() -> Self {
        Self {
            device_id: crate::midi::ALL_DEVICES.to_string(),
            device_name: None,
            channel: 1,
            message_type: MidiMessageType::Cc,
            index: 1,
            mode: MidiMode::Momentary,
        }
    }
}

#[derive(TS, Serialize, Deserialize, Clone, Debug, PartialEq)]
#[ts(export, export_to = "node_graph.ts")]
#[serde(default)]
pub struct AudioParams {
    pub gain: f64,
    pub gate: f64,
    /// 0.0 = fast release, 1.0 = ~99.5% hold per tick
    pub decay: f64,
}

impl Default for AudioParams {
    fn default() -> Self {
        Self {
            gain: 1.0,
            gate: 0.0,
            decay: 0.5,
        }
    }
}

#[derive(TS, Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[ts(export, export_to = "node_graph.ts")]
#[serde(default)]
pub struct ConstantParams {
    pub value: f64,
}

#[derive(TS, Serialize, Deserialize, Clone, Debug, PartialEq)]
#[ts(export, export_to = "node_graph.ts")]
#[serde(default)]
pub struct MathParams {
    pub scale: f64,
    pub offset: f64,
}

impl Default for MathParams {
    fn default() -> Self {
        Self {
            scale: 1.0,
            offset: 0.0,
        }
    }
}

#[derive(TS, Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[ts(export, export_to = "node_graph.ts")]
#[serde(rename_all = "camelCase", default)]
#[ts(rename_all = "camelCase")]
pub struct FixtureParams {
    /// Profile name from the fixture library (e.g. "led_par")
    pub fixture_type: String,
    pub start_channel: u16,
    pub channel_count: usize,
    pub manual_values: Vec<f64>,
    pub mutes: Vec<bool>,
}

/// Node behaviour tag plus its user-editable configuration.
#[derive(TS, Serialize, Deserialize, Clone, Debug, PartialEq)]
#[ts(export, export_to = "node_graph.ts")]
#[serde(tag = "type", content = "params", rename_all = "lowercase")]
#[ts(rename_all = "lowercase")]
pub enum NodeKind {
    Input,
    Midi(MidiParams),
    Audio(AudioParams),
    Constant(ConstantParams),
    Math(MathParams),
    Fixture(FixtureParams),
}

impl NodeKind {
    pub fn node_type(&self) -> NodeType {
        match self {
            NodeKind::Input => NodeType::Input,
            NodeKind::Midi(_) => NodeType::Midi,
            NodeKind::Audio(_) => NodeType::Audio,
            NodeKind::Constant(_) => NodeType::Constant,
            NodeKind::Math(_) => NodeType::Math,
            NodeKind::Fixture(_) => NodeType::Fixture,
        }
    }

    pub fn output_count(&self) -> usize {
        match self {
            NodeKind::Input | NodeKind::Audio(_) => 3,
            NodeKind::Midi(_) | NodeKind::Constant(_) | NodeKind::Math(_) => 1,
            NodeKind::Fixture(p) => p.channel_count,
        }
    }

    pub fn input_count(&self) -> usize {
        match self {
            NodeKind::Input | NodeKind::Midi(_) | NodeKind::Constant(_) => 0,
            NodeKind::Audio(_) => 1 + AUDIO_NUMERIC_INPUTS,
            NodeKind::Math(_) => 1,
            NodeKind::Fixture(p) => p.channel_count,
        }
    }
}

/// Envelope follower and tempo tracker state carried between ticks.
#[derive(TS, Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[ts(export, export_to = "node_graph.ts")]
#[serde(rename_all = "camelCase", default)]
#[ts(rename_all = "camelCase")]
pub struct AudioState {
    /// Output per band on the previous tick (low, mid, high)
    pub held: [f64; 3],
    pub last_onset_ms: Option<f64>,
    /// Recent accepted tempo estimates, oldest first
    pub bpm_window: Vec<f64>,
    pub bpm: f64,
    pub is_beat: bool,
}

#[derive(TS, Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[ts(export, export_to = "node_graph.ts")]
#[serde(rename_all = "camelCase", default)]
#[ts(rename_all = "camelCase")]
pub struct ToggleState {
    pub prev_raw: f64,
    pub latched: f64,
}

/// Engine-derived bookkeeping, kept apart from user params.
#[derive(TS, Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[ts(export, export_to = "node_graph.ts")]
#[serde(tag = "kind", rename_all = "lowercase")]
#[ts(rename_all = "lowercase")]
pub enum NodeState {
    #[default]
    Idle,
    Audio(AudioState),
    Toggle(ToggleState),
}

#[derive(TS, Serialize, Deserialize, Clone, Debug, PartialEq)]
#[ts(export, export_to = "node_graph.ts")]
#[serde(rename_all = "camelCase")]
#[ts(rename_all = "camelCase")]
pub struct Node {
    pub id: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub position: Position,
    #[serde(default)]
    pub mixing: MixingStrategy,
    pub kind: NodeKind,
    #[serde(default)]
    pub values: Vec<f64>,
    #[serde(default)]
    pub state: NodeState,
}

impl Node {
    pub fn new(id: impl Into<String>, label: impl Into<String>, kind: NodeKind) -> Self {
        let values = vec![0.0; kind.output_count()];
        Self {
            id: id.into(),
            label: label.into(),
            color: None,
            position: Position::default(),
            mixing: MixingStrategy::default(),
            kind,
            values,
            state: NodeState::Idle,
        }
    }

    /// New node with a `"{type}-{uuid}"` id.
    pub fn with_generated_id(label: impl Into<String>, kind: NodeKind) -> Self {
        let id = format!("{}-{}", kind.node_type().as_str(), uuid::Uuid::new_v4());
        Self::new(id, label, kind)
    }

    pub fn node_type(&self) -> NodeType {
        self.kind.node_type()
    }

    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.position = Position::new(x, y);
        self
    }

    pub fn mixing(mut self, mixing: MixingStrategy) -> Self {
        self.mixing = mixing;
        self
    }
}

#[derive(TS, Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[ts(export, export_to = "node_graph.ts")]
#[serde(rename_all = "camelCase")]
#[ts(rename_all = "camelCase")]
pub struct Edge {
    pub id: String,
    pub source_node_id: String,
    pub source_port_index: usize,
    pub target_node_id: String,
    pub target_port_index: usize,
}

impl Edge {
    pub fn new(
        source: impl Into<String>,
        source_port: usize,
        target: impl Into<String>,
        target_port: usize,
    ) -> Self {
        let source = source.into();
        let target = target.into();
        Self {
            id: format!("e-{source}-{target}-{source_port}-{target_port}"),
            source_node_id: source,
            source_port_index: source_port,
            target_node_id: target,
            target_port_index: target_port,
        }
    }
}

#[derive(TS, Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[ts(export, export_to = "node_graph.ts")]
pub struct Graph {
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub edges: Vec<Edge>,
}

impl Graph {
    pub fn new(nodes: Vec<Node>, edges: Vec<Edge>) -> Self {
        Self { nodes, edges }
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn node_mut(&mut self, id: &str) -> Option<&mut Node> {
        self.nodes.iter_mut().find(|n| n.id == id)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Externally analysed band energy for one producer node, each in [0, 255].
#[derive(TS, Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq)]
#[ts(export, export_to = "node_graph.ts")]
pub struct BandLevels {
    pub low: f64,
    pub mid: f64,
    pub high: f64,
}

impl BandLevels {
    pub fn new(low: f64, mid: f64, high: f64) -> Self {
        Self { low, mid, high }
    }

    pub fn to_array(self) -> [f64; 3] {
        [self.low, self.mid, self.high]
    }
}

/// Everything one tick of evaluation reads besides the graph itself.
#[derive(TS, Serialize, Deserialize, Clone, Debug, Default)]
#[ts(export, export_to = "node_graph.ts")]
#[serde(rename_all = "camelCase", default)]
#[ts(rename_all = "camelCase")]
pub struct EvaluationInput {
    pub band_levels: HashMap<String, BandLevels>,
    /// Keyed as `"<deviceId>__<channel>-<type>-<index>"`, values in [0, 255]
    pub midi_state: HashMap<String, f64>,
    pub now_ms: f64,
}

#[derive(TS, Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[ts(export, export_to = "node_graph.ts")]
#[serde(rename_all = "camelCase")]
#[ts(rename_all = "camelCase")]
pub struct EvaluationResult {
    pub node_outputs: HashMap<String, Vec<f64>>,
    pub device_writes: Vec<DeviceWrite>,
    /// Sparse: only nodes with engine-derived state appear here
    pub state_patches: HashMap<String, NodeState>,
}
