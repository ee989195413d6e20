pub mod node_graph;
pub mod universe;
