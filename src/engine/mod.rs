//! Host-side driver around the pure evaluator.
//!
//! The engine owns the live graph. Each tick evaluates a snapshot, then merges
//! the new output values and hidden-state patches back into the nodes. User
//! params are never touched by a tick.

use std::time::Instant;

use crate::layout::{self, LayoutMode, LayoutRequest};
use crate::models::node_graph::{EvaluationInput, EvaluationResult, Graph};
use crate::models::universe::{DeviceWrite, UniverseFrame};
use crate::node_graph::{evaluate_with_config, EvaluationConfig};
use crate::settings::{clamp_density, EngineSettings};

/// Anything that can put channel writes on the wire (DMX widget, Art-Net, a
/// test recorder).
pub trait DeviceTransport {
    fn send(&mut self, writes: &[DeviceWrite]) -> Result<(), String>;
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct TickOutput {
    pub writes: Vec<DeviceWrite>,
    pub universe: UniverseFrame,
}

pub struct Engine {
    graph: Graph,
    settings: EngineSettings,
}

impl Engine {
    pub fn new(graph: Graph, settings: EngineSettings) -> Self {
        Self { graph, settings }
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn graph_mut(&mut self) -> &mut Graph {
        &mut self.graph
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    pub fn set_blackout(&mut self, blackout: bool) {
        self.settings.blackout = blackout;
    }

    pub fn tick(&mut self, input: &EvaluationInput) -> TickOutput {
        let config = EvaluationConfig {
            log_summary: self.settings.log_summary,
        };
        let result = evaluate_with_config(&self.graph, input, &config);

        let mut writes = self.merge(result);
        if self.settings.blackout {
            for write in &mut writes {
                write.value = 0;
            }
        }

        let universe = UniverseFrame::from_writes(&writes);
        TickOutput { writes, universe }
    }

    /// Tick, then hand the writes to `transport`. The graph keeps the new
    /// values even when sending fails.
    pub fn tick_and_send(
        &mut self,
        input: &EvaluationInput,
        transport: &mut dyn DeviceTransport,
    ) -> Result<TickOutput, String> {
        let output = self.tick(input);
        if let Err(err) = transport.send(&output.writes) {
            log::warn!("device transport failed: {err}");
            return Err(err);
        }
        Ok(output)
    }

    /// Lay out the graph and move nodes; returns how many moved. Without an
    /// explicit density the stored setting is used. Either way it is clamped.
    pub fn auto_layout(
        &mut self,
        mode: LayoutMode,
        density: Option<f64>,
        selection: Vec<String>,
    ) -> usize {
        let start = Instant::now();
        let density = clamp_density(density.unwrap_or(self.settings.layout_density));
        let request = LayoutRequest::new(mode, density).with_selection(selection);
        let positions = layout::layout(&self.graph, &request);
        let moved = layout::apply_positions(&mut self.graph, &positions);
        log::debug!(
            "[layout] mode={:?} targets={} moved={} ms={:.3}",
            mode,
            positions.len(),
            moved,
            start.elapsed().as_secs_f64() * 1000.0
        );
        moved
    }

    fn merge(&mut self, result: EvaluationResult) -> Vec<DeviceWrite> {
        let EvaluationResult {
            mut node_outputs,
            device_writes,
            mut state_patches,
        } = result;

        for node in &mut self.graph.nodes {
            if let Some(values) = node_outputs.remove(&node.id) {
                node.values = values;
            }
            if let Some(state) = state_patches.remove(&node.id) {
                node.state = state;
            }
        }
        device_writes
    }
}
