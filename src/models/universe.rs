use serde::{Deserialize, Serialize};
use ts_rs::TS;

pub const UNIVERSE_SIZE: usize = 512;
pub const MAX_CHANNEL_VALUE: f64 = 255.0;

/// One channel write emitted by a fixture node.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, TS)]
#[ts(export, export_to = "universe.ts")]
pub struct DeviceWrite {
    pub channel: u16, // 1 - 512
    pub value: u8,
}

/// Flattened 512-slot frame, the shape a transport puts on the wire.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, TS)]
#[ts(export, export_to = "universe.ts")]
pub struct UniverseFrame {
    // Index 0 is channel 1
    pub channels: Vec<u8>,
}

impl Default for UniverseFrame {
    fn default() -> Self {
        Self {
            channels: vec![0; UNIVERSE_SIZE],
        }
    }
}

impl UniverseFrame {
    /// Fold writes in emission order; later writes to the same channel win.
    pub fn from_writes(writes: &[DeviceWrite]) -> Self {
        let mut frame = Self::default();
        frame.apply(writes);
        frame
    }

    pub fn apply(&mut self, writes: &[DeviceWrite]) {
        for write in writes {
            let Some(slot) = (write.channel as usize)
                .checked_sub(1)
                .and_then(|idx| self.channels.get_mut(idx))
            else {
                continue;
            };
            *slot = write.value;
        }
    }

    pub fn get(&self, channel: u16) -> u8 {
        (channel as usize)
            .checked_sub(1)
            .and_then(|idx| self.channels.get(idx))
            .copied()
            .unwrap_or(0)
    }
}
