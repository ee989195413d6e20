//! MIDI state-table contract shared with the capture side.
//!
//! The capture collaborator keeps a flat `key -> value` table; MIDI nodes read
//! it during evaluation. Keys look like `"<deviceId>__<channel>-<type>-<index>"`
//! and values are already scaled to 0-255.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::node_graph::{MidiMessageType, MidiParams};

/// Aggregate device id that mirrors every input device.
pub const ALL_DEVICES: &str = "ALL";
/// Aggregate channel that mirrors every MIDI channel.
pub const OMNI_CHANNEL: u8 = 0;

const STATUS_CONTROL_CHANGE: u8 = 0xB0;
const STATUS_NOTE_ON: u8 = 0x90;
const STATUS_NOTE_OFF: u8 = 0x80;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct MidiKey {
    pub device_id: String,
    pub channel: u8,
    pub message_type: MidiMessageType,
    pub index: u8,
}

impl MidiKey {
    pub fn new(
        device_id: impl Into<String>,
        channel: u8,
        message_type: MidiMessageType,
        index: u8,
    ) -> Self {
        Self {
            device_id: device_id.into(),
            channel,
            message_type,
            index,
        }
    }

    pub fn from_params(params: &MidiParams) -> Self {
        Self::new(
            params.device_id.clone(),
            params.channel,
            params.message_type,
            params.index,
        )
    }

    /// Keys to try in order when resolving a node's binding.
    ///
    /// The exact key comes first. The remaining entries widen to the omni
    /// channel and then to the aggregate device, so a node bound to a device
    /// that has not produced a message yet still follows the same control.
    pub fn lookup_order(&self) -> Vec<MidiKey> {
        let mut keys = vec![self.clone()];
        if self.channel != OMNI_CHANNEL {
            keys.push(MidiKey {
                channel: OMNI_CHANNEL,
                ..self.clone()
            });
        }
        if self.device_id != ALL_DEVICES {
            keys.push(MidiKey {
                device_id: ALL_DEVICES.to_string(),
                ..self.clone()
            });
            if self.channel != OMNI_CHANNEL {
                keys.push(MidiKey {
                    device_id: ALL_DEVICES.to_string(),
                    channel: OMNI_CHANNEL,
                    ..self.clone()
                });
            }
        }
        keys
    }

    pub fn parse(key: &str) -> Option<Self> {
        let (device_id, rest) = key.split_once("__")?;
        let mut parts = rest.splitn(3, '-');
        let channel = parts.next()?.parse().ok()?;
        let message_type = match parts.next()? {
            "cc" => MidiMessageType::Cc,
            "note" => MidiMessageType::Note,
            _ => return None,
        };
        let index = parts.next()?.parse().ok()?;
        Some(Self::new(device_id, channel, message_type, index))
    }
}

impl fmt::Display for MidiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}__{}-{}-{}",
            self.device_id,
            self.channel,
            self.message_type.as_str(),
            self.index
        )
    }
}

/// A decoded channel message, reported to "learn" flows.
#[derive(TS, Serialize, Deserialize, Clone, Debug, PartialEq)]
#[ts(export, export_to = "midi.ts")]
#[serde(rename_all = "camelCase")]
#[ts(rename_all = "camelCase")]
pub struct MidiEvent {
    pub device_id: String,
    pub channel: u8,
    pub message_type: MidiMessageType,
    pub index: u8,
    pub value: f64,
}

/// Scale a 7-bit MIDI value to the 0-255 channel range.
pub fn scale_to_channel(value: u8) -> f64 {
    ((value.min(127) as f64 / 127.0) * 255.0).floor()
}

/// Decode CC / note-on / note-off; everything else is ignored.
pub fn decode_message(device_id: &str, data: &[u8]) -> Option<MidiEvent> {
    if data.len() < 2 {
        return None;
    }
    let status = data[0];
    let data1 = data[1];
    let data2 = data.get(2).copied().unwrap_or(0);

    let channel = (status & 0x0f) + 1;
    let (message_type, raw) = match status & 0xf0 {
        STATUS_CONTROL_CHANGE => (MidiMessageType::Cc, data2),
        STATUS_NOTE_ON => (MidiMessageType::Note, if data2 > 0 { 127 } else { 0 }),
        STATUS_NOTE_OFF => (MidiMessageType::Note, 0),
        _ => return None,
    };

    Some(MidiEvent {
        device_id: device_id.to_string(),
        channel,
        message_type,
        index: data1,
        value: scale_to_channel(raw),
    })
}

/// The table the capture side fills and MIDI nodes read.
#[derive(Clone, Debug, Default)]
pub struct MidiStateTable {
    values: HashMap<String, f64>,
    last_event: Option<MidiEvent>,
}

impl MidiStateTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode one raw message and store it under the device, aggregate-device,
    /// omni-channel and aggregate-omni keys. Returns the decoded event.
    pub fn apply(&mut self, device_id: &str, data: &[u8]) -> Option<MidiEvent> {
        let event = decode_message(device_id, data)?;

        for dev in [device_id, ALL_DEVICES] {
            for channel in [event.channel, OMNI_CHANNEL] {
                let key = MidiKey::new(dev, channel, event.message_type, event.index);
                self.values.insert(key.to_string(), event.value);
            }
        }

        self.last_event = Some(event.clone());
        Some(event)
    }

    /// Hand out the most recent event once.
    pub fn take_last_event(&mut self) -> Option<MidiEvent> {
        self.last_event.take()
    }

    pub fn get(&self, key: &MidiKey) -> Option<f64> {
        self.values.get(&key.to_string()).copied()
    }

    pub fn reset(&mut self) {
        self.values.clear();
        self.last_event = None;
    }

    /// Snapshot for an evaluation tick.
    pub fn snapshot(&self) -> HashMap<String, f64> {
        self.values.clone()
    }
}

/// Resolve a node binding against a table snapshot, 0 when nothing matches.
pub fn lookup(state: &HashMap<String, f64>, key: &MidiKey) -> f64 {
    key.lookup_order()
        .iter()
        .find_map(|k| state.get(&k.to_string()).copied())
        .unwrap_or(0.0)
}
