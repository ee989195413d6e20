mod context;
mod executor;
mod mixing;
mod node_execution_context;
mod state;

pub mod editing;
mod nodes;
pub mod validation;

pub use crate::models::node_graph::*;
pub use executor::{evaluate, evaluate_with_config, EvaluationConfig};
pub use mixing::{clamp_channel, mix};
pub use node_execution_context::NodeExecutionContext;

#[cfg(test)]
mod tests;
