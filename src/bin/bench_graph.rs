//! Benchmark for per-tick graph evaluation and auto layout.
//!
//! Builds the stock rig, wires the analyzer into every fixture channel, and
//! times evaluation with randomized band levels and MIDI state.
//!
//! Run with: cargo run --profile perf --bin bench_graph

use std::time::Instant;

use lumina_lib::fixtures::default_rig;
use lumina_lib::fixtures::rig::{ANALYZER_NODE_ID, INPUT_NODE_ID};
use lumina_lib::layout::{layout, LayoutMode, LayoutRequest};
use lumina_lib::models::node_graph::{BandLevels, EvaluationInput, Graph, NodeKind};
use lumina_lib::node_graph::evaluate;
use lumina_lib::Engine;
use lumina_lib::EngineSettings;
use rand::Rng;

const TICK_MS: f64 = 33.0;

fn wired_rig() -> Result<Graph, String> {
    let mut graph = default_rig().map_err(|e| e.to_string())?;
    let fixtures: Vec<(String, usize)> = graph
        .nodes
        .iter()
        .filter_map(|node| match &node.kind {
            NodeKind::Fixture(params) => Some((node.id.clone(), params.channel_count)),
            _ => None,
        })
        .collect();

    for (id, channel_count) in fixtures {
        for port in 0..channel_count {
            graph
                .connect(ANALYZER_NODE_ID, port % 3, &id, port)
                .map_err(|e| e.to_string())?;
        }
    }
    Ok(graph)
}

fn random_inputs(count: usize) -> Vec<EvaluationInput> {
    let mut rng = rand::thread_rng();
    (0..count)
        .map(|i| {
            let mut input = EvaluationInput {
                now_ms: i as f64 * TICK_MS,
                ..EvaluationInput::default()
            };
            input.band_levels.insert(
                INPUT_NODE_ID.to_string(),
                BandLevels::new(
                    rng.gen_range(0.0..255.0),
                    rng.gen_range(0.0..255.0),
                    rng.gen_range(0.0..255.0),
                ),
            );
            input
                .midi_state
                .insert("ALL__0-cc-1".to_string(), rng.gen_range(0.0..255.0));
            input
        })
        .collect()
}

fn bench<F: FnMut() -> R, R>(name: &str, iterations: usize, mut f: F) -> std::time::Duration {
    // Warmup
    for _ in 0..2 {
        std::hint::black_box(f());
    }

    let start = Instant::now();
    for _ in 0..iterations {
        std::hint::black_box(f());
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;

    println!(
        "  {:<40} {:>8.3}ms  ({} iters, {:.2}ms total)",
        name,
        per_iter.as_secs_f64() * 1000.0,
        iterations,
        elapsed.as_secs_f64() * 1000.0,
    );
    per_iter
}

fn main() -> Result<(), String> {
    let graph = wired_rig()?;
    println!(
        "Stock rig: {} nodes, {} edges\n",
        graph.nodes.len(),
        graph.edges.len()
    );

    let iters = 1000;
    let inputs = random_inputs(iters);

    println!("=== Evaluation ({iters} iterations) ===\n");
    let mut cursor = 0;
    let t_eval = bench("evaluate (snapshot)", iters, || {
        cursor = (cursor + 1) % inputs.len();
        evaluate(&graph, &inputs[cursor])
    });

    let mut engine = Engine::new(graph.clone(), EngineSettings::default());
    let mut cursor = 0;
    let t_tick = bench("engine.tick (merge + universe)", iters, || {
        cursor = (cursor + 1) % inputs.len();
        engine.tick(&inputs[cursor])
    });

    println!("\n=== Layout ===\n");
    bench("layout (grid)", 200, || {
        layout(&graph, &LayoutRequest::new(LayoutMode::Grid, 1.0))
    });
    bench("layout (smart)", 200, || {
        layout(&graph, &LayoutRequest::new(LayoutMode::Smart, 1.0))
    });

    let budget = TICK_MS / 1000.0;
    println!(
        "\nTick budget used: evaluate {:.2}%, tick {:.2}%",
        t_eval.as_secs_f64() / budget * 100.0,
        t_tick.as_secs_f64() / budget * 100.0
    );
    Ok(())
}
