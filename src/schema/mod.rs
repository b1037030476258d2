//! Schema module - Plan, configuration and symbiosis data types.

mod config;
mod plan;
mod symbiosis;

pub use config::*;
pub use plan::*;
pub use symbiosis::*;
