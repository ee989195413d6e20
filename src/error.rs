//! Error types for the fallible helpers around the evaluation core.
//!
//! Evaluation and layout never fail; these cover graph editing, validation,
//! fixture creation and settings persistence.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum GraphError {
    #[error("unknown node '{0}'")]
    UnknownNode(String),

    #[error("duplicate node id '{0}'")]
    DuplicateNode(String),

    #[error("port {port} out of range for node '{node}' ({available} available)")]
    PortOutOfRange {
        node: String,
        port: usize,
        available: usize,
    },

    #[error("refusing to connect node '{0}' to itself")]
    SelfLoop(String),

    #[error("edge '{edge}' references missing node '{node}'")]
    DanglingEdge { edge: String, node: String },

    #[error("fixture '{node}' has {field} of length {actual}, expected {expected}")]
    FixtureArrayLength {
        node: String,
        field: &'static str,
        actual: usize,
        expected: usize,
    },

    #[error("fixture '{node}' spans channels {first}..={last}, outside 1..=512")]
    ChannelRange { node: String, first: u32, last: u32 },

    #[error("unknown fixture profile '{0}'")]
    UnknownProfile(String),
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write settings '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("no platform config directory available")]
    NoConfigDir,
}
