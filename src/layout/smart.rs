use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

use petgraph::algo::toposort;
use petgraph::graph::DiGraph;

use super::COLUMN_GAP;
use crate::models::node_graph::{Graph, Node, NodeType, Position};

/// Fixtures never sit closer to the sources than this rank.
const FIXTURE_MIN_RANK: usize = 2;
const FIXTURE_HEIGHT: f64 = 350.0;
const NODE_HEIGHT: f64 = 150.0;
const VERTICAL_GAP: f64 = 50.0;

/// Layered left-to-right placement following signal flow.
pub fn place(
    graph: &Graph,
    targets: &[&Node],
    origin: Position,
    density: f64,
) -> HashMap<String, Position> {
    let index: HashMap<&str, usize> = targets
        .iter()
        .enumerate()
        .map(|(i, node)| (node.id.as_str(), i))
        .collect();

    let mut parents: Vec<Vec<usize>> = vec![Vec::new(); targets.len()];
    let mut dependency_graph: DiGraph<usize, ()> = DiGraph::new();
    let node_indices: Vec<_> = (0..targets.len())
        .map(|i| dependency_graph.add_node(i))
        .collect();

    for edge in &graph.edges {
        let (Some(&from), Some(&to)) = (
            index.get(edge.source_node_id.as_str()),
            index.get(edge.target_node_id.as_str()),
        ) else {
            continue;
        };
        parents[to].push(from);
        dependency_graph.add_edge(node_indices[from], node_indices[to], ());
    }

    let mut ranks = match toposort(&dependency_graph, None) {
        Ok(order) => longest_path_ranks(&parents, order.iter().map(|&ix| dependency_graph[ix])),
        Err(_) => fixed_point_ranks(targets, &parents),
    };

    for (i, node) in targets.iter().enumerate() {
        if node.node_type() == NodeType::Fixture {
            ranks[i] = ranks[i].max(FIXTURE_MIN_RANK);
        }
    }

    let mut layers: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
    for (i, &rank) in ranks.iter().enumerate() {
        layers.entry(rank).or_default().push(i);
    }

    let mut placed: Vec<Option<Position>> = vec![None; targets.len()];
    for (rank, mut layer) in layers {
        let barycenters: HashMap<usize, f64> = layer
            .iter()
            .map(|&i| (i, barycenter(&parents[i], &placed)))
            .collect();
        layer.sort_by(|&a, &b| {
            barycenters[&a]
                .partial_cmp(&barycenters[&b])
                .unwrap_or(Ordering::Equal)
                .then_with(|| targets[a].label.cmp(&targets[b].label))
                .then_with(|| targets[a].id.cmp(&targets[b].id))
        });

        let x = origin.x + rank as f64 * COLUMN_GAP * density;
        let mut y = origin.y;
        for i in layer {
            placed[i] = Some(Position::new(x, y));
            let height = if targets[i].node_type() == NodeType::Fixture {
                FIXTURE_HEIGHT
            } else {
                NODE_HEIGHT
            };
            y += height + VERTICAL_GAP * density;
        }
    }

    targets
        .iter()
        .zip(placed)
        .filter_map(|(node, position)| position.map(|p| (node.id.clone(), p)))
        .collect()
}

/// Exact longest path from any source, for acyclic subgraphs.
fn longest_path_ranks(parents: &[Vec<usize>], order: impl Iterator<Item = usize>) -> Vec<usize> {
    let mut ranks = vec![0; parents.len()];
    for node in order {
        ranks[node] = parents[node]
            .iter()
            .map(|&p| ranks[p] + 1)
            .max()
            .unwrap_or(0);
    }
    ranks
}

/// Bounded relaxation for graphs with feedback loops. Seeds stay at rank 0:
/// parentless nodes, or the producer types when every node has a parent.
fn fixed_point_ranks(targets: &[&Node], parents: &[Vec<usize>]) -> Vec<usize> {
    let mut seeds: Vec<bool> = parents.iter().map(Vec::is_empty).collect();
    if !seeds.iter().any(|&s| s) {
        seeds = targets
            .iter()
            .map(|n| {
                matches!(
                    n.node_type(),
                    NodeType::Input | NodeType::Midi | NodeType::Constant
                )
            })
            .collect();
    }

    let mut ranks = vec![0; targets.len()];
    for _ in 0..targets.len() + 2 {
        for i in 0..targets.len() {
            if seeds[i] {
                continue;
            }
            if let Some(max_parent) = parents[i].iter().map(|&p| ranks[p]).max() {
                ranks[i] = max_parent + 1;
            }
        }
    }
    ranks
}

/// Mean y of the parents that already have a position, 0 when none do.
fn barycenter(parents: &[usize], placed: &[Option<Position>]) -> f64 {
    let ys: Vec<f64> = parents
        .iter()
        .filter_map(|&p| placed[p].map(|pos| pos.y))
        .collect();
    if ys.is_empty() {
        0.0
    } else {
        ys.iter().sum::<f64>() / ys.len() as f64
    }
}
