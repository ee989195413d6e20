use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// What a single DMX channel of a fixture controls.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, TS)]
#[ts(export, export_to = "fixtures.ts")]
#[serde(rename_all = "lowercase")]
pub enum ChannelKind {
    Intensity,
    Red,
    Green,
    Blue,
    White,
    Fx,
    Strobe,
    Speed,
    Master,
    Tilt,
    Pan,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, TS)]
#[ts(export, export_to = "fixtures.ts")]
pub struct ChannelDef {
    /// Offset from the fixture's start channel
    pub offset: usize,
    pub label: String,
    pub kind: ChannelKind,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, TS)]
#[ts(export, export_to = "fixtures.ts")]
#[serde(rename_all = "camelCase")]
#[ts(rename_all = "camelCase")]
pub struct FixtureProfile {
    pub name: String,
    pub channels: Vec<ChannelDef>,
}

impl FixtureProfile {
    pub fn new(name: &str, channels: &[(&str, ChannelKind)]) -> Self {
        Self {
            name: name.to_string(),
            channels: channels
                .iter()
                .enumerate()
                .map(|(offset, (label, kind))| ChannelDef {
                    offset,
                    label: label.to_string(),
                    kind: *kind,
                })
                .collect(),
        }
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }
}
