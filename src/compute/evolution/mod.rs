//! Evolutionary search over garden plans.
//!
//! # Overview
//!
//! The evolutionary search system consists of:
//!
//! - **Individuals** (`individual`): The operator set every genome provides
//! - **Genome Operations** (`genome`): Seeded randomness, plan randomization,
//!   swap mutation and inventory-preserving crossover
//! - **Selection** (`selection`): Tournament and fitness-rank parent pairing
//! - **Fitness Functions** (`fitness`): The neighbor-weighted symbiosis evaluator
//! - **Search** (`search`): The steady-state evolution engine
//!
//! # Example
//!
//! ```rust
//! use planit::compute::evolution::{EvolutionEngine, SymbiosisEvaluator};
//! use planit::schema::{EvolutionConfig, Plan, Plant, SymbiosisTable};
//!
//! let mut table = SymbiosisTable::new();
//! table.insert("Carrot", "Beetroot", 1);
//! table.insert("Cabbage", "Carrot", -1);
//!
//! let plan = Plan::from_rows([["Carrot", "Cabbage", "Beetroot"].map(|n| Some(Plant::from(n)))]);
//! let config = EvolutionConfig {
//!     size: 20,
//!     offspring_count: 5,
//!     random_seed: Some(42),
//!     ..Default::default()
//! };
//!
//! let mut engine = EvolutionEngine::new(&plan, SymbiosisEvaluator::new(table), config).unwrap();
//! let best = engine.run(50).unwrap();
//! println!("Best fitness: {:?}\n{}", best.fitness(), best);
//! ```

mod fitness;
mod genome;
mod individual;
mod search;
mod selection;

pub use fitness::{FitnessFunction, SymbiosisEvaluator};
pub use genome::GenomeRng;
pub use individual::{IdentityIndividual, Individual};
pub use search::{EvolutionEngine, EvolutionError, EvolutionHistory, GenerationStats};
pub use selection::{ParentPair, SelectionError, fittest, ranked, select_pairs, tournament};
