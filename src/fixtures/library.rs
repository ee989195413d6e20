//! Built-in fixture profiles and fixture-node construction.

use crate::error::GraphError;
use crate::fixtures::models::{ChannelKind, FixtureProfile};
use crate::models::node_graph::{FixtureParams, Node, NodeKind};

use ChannelKind::*;

pub fn profiles() -> Vec<FixtureProfile> {
    vec![
        FixtureProfile::new("dimmer", &[("Int", Intensity)]),
        FixtureProfile::new(
            "led_par",
            &[
                ("Red", Red),
                ("Grn", Green),
                ("Blu", Blue),
                ("Macro", Fx),
                ("Strob", Strobe),
                ("Speed", Speed),
            ],
        ),
        FixtureProfile::new(
            "spider",
            &[
                ("TiltA", Tilt),
                ("TiltB", Tilt),
                ("Mast", Master),
                ("Strob", Strobe),
                ("R-A", Red),
                ("G-A", Green),
                ("B-A", Blue),
                ("W-A", White),
                ("R-B", Red),
                ("G-B", Green),
                ("B-B", Blue),
                ("W-B", White),
                ("Srvc", Fx),
            ],
        ),
        FixtureProfile::new("spark", &[("FIRE", Fx), ("Mode", Fx)]),
        FixtureProfile::new(
            "laser",
            &[
                ("Pat1", Fx),
                ("Pat2", Fx),
                ("Pat3", Fx),
                ("Pat4", Fx),
                ("Colr", Fx),
                ("Rotat", Fx),
                ("PosX", Pan),
                ("PosY", Tilt),
            ],
        ),
    ]
}

pub fn profile(name: &str) -> Option<FixtureProfile> {
    profiles().into_iter().find(|p| p.name == name)
}

/// Fixture node sized to its profile, with zeroed manual values and no mutes.
pub fn create_fixture_node(
    profile_name: &str,
    label: &str,
    start_channel: u16,
) -> Result<Node, GraphError> {
    let profile =
        profile(profile_name).ok_or_else(|| GraphError::UnknownProfile(profile_name.to_string()))?;
    let channel_count = profile.channel_count();
    let kind = NodeKind::Fixture(FixtureParams {
        fixture_type: profile.name,
        start_channel,
        channel_count,
        manual_values: vec![0.0; channel_count],
        mutes: vec![false; channel_count],
    });

    let mut node = Node::with_generated_id(label, kind);
    node.color = Some(accent_color(label).to_string());
    Ok(node)
}

/// Default accent colour for a fixture, picked from keywords in its name.
pub fn accent_color(name: &str) -> &'static str {
    let name = name.to_lowercase();
    let has = |needles: &[&str]| needles.iter().any(|n| name.contains(n));

    if has(&["red"]) {
        "#ef4444"
    } else if has(&["green", "grn"]) {
        "#10b981"
    } else if has(&["blue", "blu"]) {
        "#3b82f6"
    } else if has(&["white", "wht"]) {
        "#ffffff"
    } else if has(&["wash"]) {
        "#f59e0b"
    } else if has(&["top"]) {
        "#8b5cf6"
    } else if has(&["led"]) {
        "#ec4899"
    } else if has(&["fx", "spider"]) {
        "#06b6d4"
    } else if has(&["spark"]) {
        "#f97316"
    } else if has(&["laser"]) {
        "#d946ef"
    } else {
        "#10b981"
    }
}
