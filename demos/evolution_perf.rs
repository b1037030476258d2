//! Quick optimizer performance test

use planit::{
    compute::PlanOptimizer,
    schema::{EvolutionConfig, OptimizerConfig, Plan, Plant, SelectionMethod, SymbiosisTable},
};
use std::time::Instant;

const PLANTS: [&str; 4] = ["Carrot", "Beetroot", "Cabbage", "Celery"];

fn main() {
    println!("=== Optimizer Performance Test ===\n");

    let mut symbioses = SymbiosisTable::new();
    symbioses.insert("Carrot", "Beetroot", 1);
    symbioses.insert("Celery", "Beetroot", 1);
    symbioses.insert("Cabbage", "Carrot", -1);
    symbioses.insert("Cabbage", "Celery", -1);

    // Test different grid sizes
    for grid_size in [8, 16, 32] {
        println!("Grid size: {}x{}", grid_size, grid_size);

        let plan = Plan::from_rows((0..grid_size).map(|y| {
            (0..grid_size)
                .map(|x| Some(Plant::from(PLANTS[(x + y) % PLANTS.len()])))
                .collect::<Vec<_>>()
        }));

        let config = OptimizerConfig {
            evolution: EvolutionConfig {
                selection: SelectionMethod::Tournament { size: 3 },
                random_seed: Some(42),
                ..Default::default()
            },
            ..Default::default()
        };
        let optimizer = match PlanOptimizer::with_config(symbioses.clone(), &config) {
            Ok(optimizer) => optimizer,
            Err(e) => {
                eprintln!("Invalid config: {}", e);
                return;
            }
        };

        let generations = 200;
        let initial = optimizer.evaluate(&plan);
        let start = Instant::now();
        let best = match optimizer.optimize(&plan, generations) {
            Ok(best) => best,
            Err(e) => {
                eprintln!("Optimization failed: {}", e);
                return;
            }
        };
        let elapsed = start.elapsed();

        let evaluations = config.evolution.size + generations * config.evolution.offspring_count;
        println!("  Generations:    {}", generations);
        println!("  Evaluations:    {}", evaluations);
        println!("  Elapsed:        {:.2}s", elapsed.as_secs_f64());
        println!(
            "  Evals/sec:      {:.1}",
            evaluations as f64 / elapsed.as_secs_f64()
        );
        println!(
            "  Fitness:        {:.4} -> {:.4}",
            initial,
            best.fitness().unwrap_or(f32::NEG_INFINITY)
        );
        println!();
    }
}
