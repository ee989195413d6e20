use std::collections::HashMap;

use super::{COLUMN_GAP, ROW_GAP};
use crate::models::node_graph::{Node, Position};

/// Square-ish grid sorted by node type, then label.
pub fn place(targets: &[&Node], origin: Position, density: f64) -> HashMap<String, Position> {
    let mut sorted = targets.to_vec();
    sorted.sort_by(|a, b| {
        a.node_type()
            .as_str()
            .cmp(b.node_type().as_str())
            .then_with(|| a.label.cmp(&b.label))
            .then_with(|| a.id.cmp(&b.id))
    });

    let columns = (sorted.len() as f64).sqrt().ceil().max(1.0) as usize;
    sorted
        .iter()
        .enumerate()
        .map(|(i, node)| {
            let col = (i % columns) as f64;
            let row = (i / columns) as f64;
            let position = Position::new(
                origin.x + col * COLUMN_GAP * density,
                origin.y + row * ROW_GAP * density,
            );
            (node.id.clone(), position)
        })
        .collect()
}
