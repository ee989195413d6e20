//! The stock rig a fresh session starts with.

use crate::error::GraphError;
use crate::fixtures::library::create_fixture_node;
use crate::models::node_graph::{AudioParams, Graph, Node, NodeKind, AUDIO_SIGNAL_IN_PORT};

pub const INPUT_NODE_ID: &str = "input-1";
pub const ANALYZER_NODE_ID: &str = "audio-1";

const FIXTURES_PER_COLUMN: usize = 8;

/// (id, profile, name, start channel)
const STOCK_FIXTURES: &[(&str, &str, &str, u16)] = &[
    ("p1", "dimmer", "PAR Left - Red", 1),
    ("p2", "dimmer", "PAR Left - Green", 2),
    ("p3", "dimmer", "PAR Left - Blue", 3),
    ("p4", "dimmer", "PAR Left - White", 4),
    ("p5", "dimmer", "PAR Right - White", 5),
    ("p6", "dimmer", "PAR Right - Blue", 6),
    ("p7", "dimmer", "PAR Right - Green", 7),
    ("p8", "dimmer", "PAR Right - Red", 8),
    ("t1", "dimmer", "Top Wash 1", 9),
    ("t2", "dimmer", "Top Wash 2", 10),
    ("t3", "dimmer", "Top Wash 3", 11),
    ("t4", "dimmer", "Top Wash 4", 12),
    ("l1", "led_par", "Backdrop L", 33),
    ("l2", "led_par", "Backdrop R", 49),
    ("l3", "led_par", "Mid R", 65),
    ("l4", "led_par", "Mid L", 81),
    ("l5", "led_par", "Front R", 97),
    ("l6", "led_par", "Front L", 113),
    ("s1", "spider", "Spider Left", 129),
    ("s2", "spider", "Spider Center", 145),
    ("s3", "spider", "Spider Right", 161),
    ("cs1", "spark", "Spark 1", 177),
    ("cs2", "spark", "Spark 2", 179),
    ("ls1", "laser", "Laser F2750", 184),
];

/// Audio input feeding an analyzer, plus the stock fixtures stacked in
/// columns of eight to the right.
pub fn default_rig() -> Result<Graph, GraphError> {
    let mut graph = Graph::default();
    graph.add_node(Node::new(INPUT_NODE_ID, "Audio Input", NodeKind::Input).at(50.0, 50.0))?;
    graph.add_node(
        Node::new(
            ANALYZER_NODE_ID,
            "DSP Analyzer",
            NodeKind::Audio(AudioParams::default()),
        )
        .at(450.0, 50.0),
    )?;

    for (i, (id, profile, name, start_channel)) in STOCK_FIXTURES.iter().enumerate() {
        let mut node = create_fixture_node(profile, name, *start_channel)?;
        node.id = id.to_string();
        let column = (i / FIXTURES_PER_COLUMN) as f64;
        let row = (i % FIXTURES_PER_COLUMN) as f64;
        graph.add_node(node.at(850.0 + column * 300.0, 50.0 + row * 350.0))?;
    }

    graph.connect(INPUT_NODE_ID, 0, ANALYZER_NODE_ID, AUDIO_SIGNAL_IN_PORT)?;
    Ok(graph)
}
