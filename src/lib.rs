pub mod engine;
pub mod error;
pub mod fixtures;
pub mod layout;
pub mod midi;
pub mod models;
pub mod node_graph;
pub mod settings;

pub use engine::{DeviceTransport, Engine, TickOutput};
pub use error::{GraphError, SettingsError};
pub use layout::{layout, LayoutMode, LayoutRequest};
pub use node_graph::{evaluate, evaluate_with_config, EvaluationConfig};
pub use settings::EngineSettings;
