use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::SettingsError;

pub const MIN_LAYOUT_DENSITY: f64 = 0.6;
pub const MAX_LAYOUT_DENSITY: f64 = 1.6;

const SETTINGS_DIR: &str = "lumina";
const SETTINGS_FILE: &str = "settings.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "settings.ts")]
#[serde(rename_all = "camelCase", default)]
#[ts(rename_all = "camelCase")]
pub struct EngineSettings {
    /// Driver tick period; 25-40 ms is typical
    pub tick_period_ms: u64,
    pub blackout: bool,
    pub layout_density: f64,
    pub log_summary: bool,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            tick_period_ms: 33,
            blackout: false,
            layout_density: 1.0,
            log_summary: false,
        }
    }
}

impl EngineSettings {
    /// Build from a flat key/value table. Missing or unparsable keys fall back
    /// to their defaults.
    pub fn from_pairs(map: &HashMap<String, String>) -> Self {
        let defaults = Self::default();
        Self {
            tick_period_ms: map
                .get("tick_period_ms")
                .and_then(|v| v.parse::<u64>().ok())
                .filter(|v| *v > 0)
                .unwrap_or(defaults.tick_period_ms),
            blackout: map
                .get("blackout")
                .map(|v| v == "true")
                .unwrap_or(defaults.blackout),
            layout_density: map
                .get("layout_density")
                .and_then(|v| v.parse::<f64>().ok())
                .filter(|v| v.is_finite())
                .map(clamp_density)
                .unwrap_or(defaults.layout_density),
            log_summary: map
                .get("log_summary")
                .map(|v| v == "true")
                .unwrap_or(defaults.log_summary),
        }
    }

    pub fn to_pairs(&self) -> HashMap<String, String> {
        HashMap::from([
            ("tick_period_ms".to_string(), self.tick_period_ms.to_string()),
            ("blackout".to_string(), self.blackout.to_string()),
            ("layout_density".to_string(), self.layout_density.to_string()),
            ("log_summary".to_string(), self.log_summary.to_string()),
        ])
    }

    /// Apply one key/value update, as a settings UI would send it.
    pub fn set(&mut self, key: &str, value: &str) {
        let mut pairs = self.to_pairs();
        pairs.insert(key.to_string(), value.to_string());
        *self = Self::from_pairs(&pairs);
    }

    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let raw = fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut settings: Self = serde_json::from_str(&raw)?;
        settings.layout_density = clamp_density(settings.layout_density);
        Ok(settings)
    }

    /// Load from `path`, or defaults if the file does not exist yet.
    pub fn load_or_default(path: &Path) -> Result<Self, SettingsError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load(path)
    }

    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        let write_err = |source| SettingsError::Write {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(write_err)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).map_err(write_err)
    }

    pub fn default_path() -> Result<PathBuf, SettingsError> {
        let dir = dirs::config_dir().ok_or(SettingsError::NoConfigDir)?;
        Ok(dir.join(SETTINGS_DIR).join(SETTINGS_FILE))
    }
}

/// Keep a layout density inside the supported range; NaN falls back to 1.0.
pub fn clamp_density(density: f64) -> f64 {
    if density.is_nan() {
        return 1.0;
    }
    density.clamp(MIN_LAYOUT_DENSITY, MAX_LAYOUT_DENSITY)
}
