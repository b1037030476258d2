//! Planit CLI - Optimize a garden plan from JSON files.

#[cfg(feature = "dhat-heap")]
#[global_allocator]
static ALLOC: dhat::Alloc = dhat::Alloc;

use std::path::{Path, PathBuf};
use std::time::Instant;

use planit::{
    compute::PlanOptimizer,
    schema::{OptimizerConfig, Plan, PlanSnapshot, Plant, SymbiosisTable},
};

fn main() {
    #[cfg(feature = "dhat-heap")]
    let _profiler = dhat::Profiler::new_heap();

    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() > 1 && args[1] == "--example" {
        print_example_files();
        return;
    }

    if args.len() < 2 {
        eprintln!("Usage: {} <plan.json> [iterations]", args[0]);
        eprintln!();
        eprintln!("Rearrange the movable plants of a garden plan.");
        eprintln!();
        eprintln!("Arguments:");
        eprintln!("  plan.json   Path to the plan file");
        eprintln!("  iterations  Number of generations (default: 1000)");
        eprintln!();
        eprintln!("Symbiosis scores are read from <plan>.symbioses.json and optional");
        eprintln!("optimizer settings from <plan>.optimizer.json.");
        eprintln!("Example files are printed with the --example flag.");
        std::process::exit(1);
    }

    let plan_path = PathBuf::from(&args[1]);
    let iterations: usize = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(1000);

    // Load plan
    let snapshot = PlanSnapshot::load_json(&plan_path).unwrap_or_else(|e| {
        eprintln!("Error reading plan file: {}", e);
        std::process::exit(1);
    });
    let plan = Plan::from_snapshot(snapshot).unwrap_or_else(|e| {
        eprintln!("Invalid plan: {}", e);
        std::process::exit(1);
    });

    // Load symbioses
    let symbioses_path = sibling(&plan_path, "symbioses.json");
    let symbioses = SymbiosisTable::load_json(&symbioses_path).unwrap_or_else(|e| {
        eprintln!(
            "Error reading symbioses file {}: {}",
            symbioses_path.display(),
            e
        );
        std::process::exit(1);
    });

    // Load or default optimizer settings
    let config_path = sibling(&plan_path, "optimizer.json");
    let config = if config_path.exists() {
        OptimizerConfig::load_json(&config_path).unwrap_or_else(|e| {
            eprintln!("Error reading optimizer config: {}", e);
            std::process::exit(1);
        })
    } else {
        OptimizerConfig::default()
    };

    let optimizer = PlanOptimizer::with_config(symbioses, &config).unwrap_or_else(|e| {
        eprintln!("Invalid optimizer config: {}", e);
        std::process::exit(1);
    });

    println!("Planit Optimizer");
    println!("================");
    println!(
        "Cells: {} ({} movable)",
        plan.len(),
        plan.movable_positions().len()
    );
    println!(
        "Population: {} ({} offspring per generation)",
        config.evolution.size, config.evolution.offspring_count
    );
    println!("Iterations: {}", iterations);
    println!();
    println!("Before (fitness {:.4}):", optimizer.evaluate(&plan));
    println!("{}", plan);

    let start = Instant::now();
    let report_every = (iterations / 10).max(1);
    let best = optimizer
        .optimize_with_callback(&plan, iterations, |stats| {
            if stats.generation % report_every == 0 {
                println!(
                    "  Generation {}/{}: best={:.4}, avg={:.4}",
                    stats.generation, iterations, stats.best_fitness, stats.avg_fitness
                );
            }
        })
        .unwrap_or_else(|e| {
            eprintln!("Optimization failed: {}", e);
            std::process::exit(1);
        });
    let elapsed = start.elapsed();

    println!();
    println!("After (fitness {:.4}):", optimizer.evaluate(&best));
    println!("{}", best);
    println!(
        "Time: {:.2}s ({:.1} generations/s)",
        elapsed.as_secs_f32(),
        iterations as f32 / elapsed.as_secs_f32().max(f32::EPSILON)
    );

    let output_path = sibling(&plan_path, "optimized.json");
    if let Err(e) = best.to_snapshot().save_json(&output_path) {
        eprintln!("Error writing {}: {}", output_path.display(), e);
        std::process::exit(1);
    }
    println!("Saved to {}", output_path.display());
}

/// `garden.json` -> `garden.<suffix>`.
fn sibling(path: &Path, suffix: &str) -> PathBuf {
    path.with_extension(suffix)
}

fn print_example_files() {
    let plants = ["Carrot", "Beetroot", "Cabbage", "Celery"];
    let plan = Plan::from_rows((0..3).map(|y| {
        (0..4)
            .map(|x| Some(Plant::from(plants[(x + y) % plants.len()])))
            .collect::<Vec<_>>()
    }));

    let mut symbioses = SymbiosisTable::new();
    symbioses.insert("Carrot", "Beetroot", 1);
    symbioses.insert("Carrot", "Celery", 1);
    symbioses.insert("Celery", "Beetroot", 1);
    symbioses.insert("Cabbage", "Carrot", -1);
    symbioses.insert("Cabbage", "Celery", -1);

    let print_json = |name: &str, json: serde_json::Result<String>| match json {
        Ok(json) => {
            println!("Example {}:", name);
            println!("{}", json);
            println!();
        }
        Err(e) => eprintln!("Error serializing {}: {}", name, e),
    };

    print_json(
        "plan (garden.json)",
        serde_json::to_string_pretty(&plan.to_snapshot()),
    );
    print_json(
        "symbioses (garden.symbioses.json)",
        serde_json::to_string_pretty(&symbioses.entries()),
    );
    print_json(
        "optimizer settings (garden.optimizer.json)",
        serde_json::to_string_pretty(&OptimizerConfig::default()),
    );
}
