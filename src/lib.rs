//! Planit - Garden plan optimization by genetic search.
//!
//! This crate arranges plants on a grid so that neighboring plants get along,
//! using a steady-state genetic algorithm over the permutations of a fixed
//! plant inventory.
//!
//! # Architecture
//!
//! The crate is split into two main modules:
//!
//! - `schema`: Plans, configuration types and symbiosis tables
//! - `compute`: Neighborhoods, the evolution engine and the optimizer API
//!
//! # Example
//!
//! ```rust
//! use planit::{
//!     compute::PlanOptimizer,
//!     schema::{Plan, Plant, SymbiosisTable},
//! };
//!
//! let mut symbioses = SymbiosisTable::new();
//! symbioses.insert("Carrot", "Beetroot", 1);
//! symbioses.insert("Cabbage", "Carrot", -1);
//!
//! let plan = Plan::from_rows([
//!     ["Carrot", "Cabbage"].map(|n| Some(Plant::from(n))),
//!     ["Beetroot", "Carrot"].map(|n| Some(Plant::from(n))),
//! ]);
//!
//! let optimizer = PlanOptimizer::new(symbioses);
//! println!("Before: {:.3}", optimizer.evaluate(&plan));
//!
//! let best = optimizer.optimize(&plan, 100).unwrap();
//! println!("After: {:.3}\n{}", optimizer.evaluate(&best), best);
//! ```

pub mod compute;
pub mod schema;

// Re-export commonly used types
pub use compute::{PlanOptimizer, evaluate, evaluate_cell, optimize};
pub use schema::{OptimizerConfig, Plan, PlanSnapshot, Plant, Position, SymbiosisTable};
