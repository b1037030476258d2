//! Compute module - Neighborhoods, evolutionary search and the optimizer API.

pub mod evolution;

mod neighborhood;
mod optimizer;

pub use neighborhood::*;
pub use optimizer::*;
