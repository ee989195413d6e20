//! Automatic placement of graph nodes on the editor canvas.
//!
//! Layout only produces positions. It reads a snapshot of the graph and
//! returns coordinates for the targeted nodes; applying them is up to the
//! caller (see [`apply_positions`]).

mod grid;
mod smart;

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::node_graph::{Graph, Node, Position};

/// Canvas origin used when laying out the whole graph.
pub const DEFAULT_ORIGIN: Position = Position { x: 50.0, y: 50.0 };
/// Horizontal pitch between columns/ranks at density 1.0.
pub const COLUMN_GAP: f64 = 400.0;
/// Vertical pitch between grid rows at density 1.0.
pub const ROW_GAP: f64 = 250.0;

#[derive(TS, Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[ts(export, export_to = "layout.ts")]
#[serde(rename_all = "lowercase")]
pub enum LayoutMode {
    Grid,
    #[default]
    Smart,
}

#[derive(TS, Serialize, Deserialize, Clone, Debug, PartialEq)]
#[ts(export, export_to = "layout.ts")]
#[serde(rename_all = "camelCase")]
#[ts(rename_all = "camelCase")]
pub struct LayoutRequest {
    pub mode: LayoutMode,
    /// Spacing multiplier, 1.0 = default pitch
    pub density: f64,
    /// Selected node ids. Fewer than two selected means "everything".
    #[serde(default)]
    pub selection: Vec<String>,
}

impl LayoutRequest {
    pub fn new(mode: LayoutMode, density: f64) -> Self {
        Self {
            mode,
            density,
            selection: Vec::new(),
        }
    }

    pub fn with_selection(mut self, selection: Vec<String>) -> Self {
        self.selection = selection;
        self
    }
}

/// Compute new positions for the targeted nodes.
pub fn layout(graph: &Graph, request: &LayoutRequest) -> HashMap<String, Position> {
    let (targets, origin) = targets_and_origin(graph, &request.selection);
    if targets.is_empty() {
        return HashMap::new();
    }

    match request.mode {
        LayoutMode::Grid => grid::place(&targets, origin, request.density),
        LayoutMode::Smart => smart::place(graph, &targets, origin, request.density),
    }
}

/// Write positions back into the graph; returns how many nodes moved.
pub fn apply_positions(graph: &mut Graph, positions: &HashMap<String, Position>) -> usize {
    let mut moved = 0;
    for node in &mut graph.nodes {
        if let Some(position) = positions.get(&node.id) {
            if node.position != *position {
                node.position = *position;
                moved += 1;
            }
        }
    }
    moved
}

fn targets_and_origin<'a>(graph: &'a Graph, selection: &[String]) -> (Vec<&'a Node>, Position) {
    let selected: HashSet<&str> = selection.iter().map(String::as_str).collect();
    let picked: Vec<&Node> = graph
        .nodes
        .iter()
        .filter(|n| selected.contains(n.id.as_str()))
        .collect();

    if picked.len() > 1 {
        let origin = Position::new(
            picked.iter().map(|n| n.position.x).fold(f64::INFINITY, f64::min),
            picked.iter().map(|n| n.position.y).fold(f64::INFINITY, f64::min),
        );
        (picked, origin)
    } else {
        (graph.nodes.iter().collect(), DEFAULT_ORIGIN)
    }
}
