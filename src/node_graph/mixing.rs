use crate::models::node_graph::MixingStrategy;
use crate::models::universe::MAX_CHANNEL_VALUE;

/// Reduce the values arriving on one port. Inputs are in edge-declaration
/// order, so `Last` picks the last-declared edge. Empty input reduces to 0.
/// `Sum` is left unclamped; the consuming node clamps at its boundary.
pub fn mix(values: &[f64], strategy: MixingStrategy) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    match strategy {
        MixingStrategy::Sum => values.iter().sum(),
        MixingStrategy::Max => values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        MixingStrategy::Avg => values.iter().sum::<f64>() / values.len() as f64,
        MixingStrategy::Last => values[values.len() - 1],
    }
}

/// Clamp into the 0-255 channel range. NaN collapses to 0.
pub fn clamp_channel(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, MAX_CHANNEL_VALUE)
}
