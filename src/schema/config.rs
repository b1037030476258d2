//! Configuration types for plan optimization.

use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Top-level optimizer configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OptimizerConfig {
    /// Population and variation settings.
    #[serde(default)]
    pub evolution: EvolutionConfig,
    /// Fitness evaluation settings.
    #[serde(default)]
    pub evaluator: EvaluatorConfig,
}

impl OptimizerConfig {
    /// Validate both sections.
    pub fn validate(&self) -> Result<(), EvolutionConfigError> {
        self.evolution.validate()?;
        self.evaluator.validate()
    }

    /// Read from a JSON file.
    pub fn load_json<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let content = fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }
}

/// Steady-state genetic algorithm configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvolutionConfig {
    /// Number of individuals kept in the population.
    #[serde(default = "default_population_size")]
    pub size: usize,
    /// Offspring produced (and weakest individuals replaced) per generation.
    #[serde(default = "default_offspring_count")]
    pub offspring_count: usize,
    /// Probability (0.0-1.0) that a fresh offspring gets one swap mutation.
    #[serde(default = "default_mutation_rate")]
    pub mutation_rate: f32,
    /// Parent selection method.
    #[serde(default)]
    pub selection: SelectionMethod,
    /// Random seed for reproducibility.
    #[serde(default)]
    pub random_seed: Option<u64>,
    /// Score offspring on the rayon thread pool.
    #[serde(default = "default_parallel_evaluation")]
    pub parallel_evaluation: bool,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            size: default_population_size(),
            offspring_count: default_offspring_count(),
            mutation_rate: default_mutation_rate(),
            selection: SelectionMethod::default(),
            random_seed: None,
            parallel_evaluation: default_parallel_evaluation(),
        }
    }
}

fn default_population_size() -> usize {
    50
}
fn default_offspring_count() -> usize {
    10
}
fn default_mutation_rate() -> f32 {
    1.0
}
fn default_parallel_evaluation() -> bool {
    true
}

impl EvolutionConfig {
    /// Validate population and variation settings.
    pub fn validate(&self) -> Result<(), EvolutionConfigError> {
        if self.size < 2 {
            return Err(EvolutionConfigError::PopulationTooSmall(self.size));
        }
        if self.offspring_count == 0 {
            return Err(EvolutionConfigError::NoOffspring);
        }
        if self.offspring_count > self.size / 2 {
            return Err(EvolutionConfigError::TooManyOffspring {
                offspring_count: self.offspring_count,
                size: self.size,
            });
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(EvolutionConfigError::InvalidMutationRate(self.mutation_rate));
        }
        if let SelectionMethod::Tournament { size: 0 } = self.selection {
            return Err(EvolutionConfigError::EmptyTournament);
        }
        Ok(())
    }
}

/// Parent selection method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method")]
pub enum SelectionMethod {
    /// Draw `size` contenders without replacement, keep the fittest, return
    /// the rest to the pool.
    Tournament {
        #[serde(default = "default_tournament_size")]
        size: usize,
    },
    /// Pair individuals by fitness rank: 0 with 1, 2 with 3, and so on.
    Fittest,
}

impl Default for SelectionMethod {
    fn default() -> Self {
        Self::Tournament {
            size: default_tournament_size(),
        }
    }
}

fn default_tournament_size() -> usize {
    2
}

/// Symbiosis evaluator configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluatorConfig {
    /// Multiplier for positive symbiosis scores.
    #[serde(default = "default_score_weight")]
    pub positive_weight: f32,
    /// Multiplier for negative symbiosis scores.
    #[serde(default = "default_score_weight")]
    pub negative_weight: f32,
    /// Which neighbors influence a cell, and how strongly.
    #[serde(default)]
    pub neighborhood: NeighborhoodConfig,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            positive_weight: default_score_weight(),
            negative_weight: default_score_weight(),
            neighborhood: NeighborhoodConfig::default(),
        }
    }
}

fn default_score_weight() -> f32 {
    1.0
}

impl EvaluatorConfig {
    pub fn validate(&self) -> Result<(), EvolutionConfigError> {
        let check_weight = |value: f32, name: &str| {
            if value.is_finite() && value >= 0.0 {
                Ok(())
            } else {
                Err(EvolutionConfigError::InvalidWeight(format!(
                    "{name} weight {value} must be finite and non-negative"
                )))
            }
        };

        check_weight(self.positive_weight, "positive")?;
        check_weight(self.negative_weight, "negative")?;
        for offset in self.neighborhood.offsets() {
            check_weight(offset.weight, "neighbor")?;
        }
        Ok(())
    }
}

/// A relative neighbor position with its influence weight.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NeighborOffset {
    pub dx: i32,
    pub dy: i32,
    #[serde(default = "default_score_weight")]
    pub weight: f32,
}

impl NeighborOffset {
    pub const fn new(dx: i32, dy: i32, weight: f32) -> Self {
        Self { dx, dy, weight }
    }

    /// True for offsets that share a row or column with the center.
    pub fn is_orthogonal(&self) -> bool {
        self.dx == 0 || self.dy == 0
    }
}

/// Neighborhood shape used by the evaluator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "type")]
pub enum NeighborhoodConfig {
    /// The 8 surrounding cells, all with weight 1.
    #[default]
    Moore,
    /// The 8 surrounding cells, diagonals weighted separately.
    WeightedMoore {
        #[serde(default = "default_orthogonal_weight")]
        orthogonal: f32,
        #[serde(default = "default_diagonal_weight")]
        diagonal: f32,
    },
    /// Arbitrary offsets.
    Custom { offsets: Vec<NeighborOffset> },
}

fn default_orthogonal_weight() -> f32 {
    1.0
}
fn default_diagonal_weight() -> f32 {
    0.5
}

/// Moore neighborhood in row order, top row first.
const MOORE: [(i32, i32); 8] = [
    (-1, 1),
    (0, 1),
    (1, 1),
    (-1, 0),
    (1, 0),
    (-1, -1),
    (0, -1),
    (1, -1),
];

impl NeighborhoodConfig {
    /// Orthogonal-favoring Moore neighborhood with default weights.
    pub fn weighted_moore() -> Self {
        Self::WeightedMoore {
            orthogonal: default_orthogonal_weight(),
            diagonal: default_diagonal_weight(),
        }
    }

    /// Expand into concrete offsets.
    pub fn offsets(&self) -> Vec<NeighborOffset> {
        match self {
            Self::Moore => MOORE
                .iter()
                .map(|&(dx, dy)| NeighborOffset::new(dx, dy, 1.0))
                .collect(),
            Self::WeightedMoore {
                orthogonal,
                diagonal,
            } => MOORE
                .iter()
                .map(|&(dx, dy)| {
                    let weight = if dx == 0 || dy == 0 {
                        *orthogonal
                    } else {
                        *diagonal
                    };
                    NeighborOffset::new(dx, dy, weight)
                })
                .collect(),
            Self::Custom { offsets } => offsets.clone(),
        }
    }
}

/// Configuration validation errors.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EvolutionConfigError {
    #[error("Population size must be at least 2, got {0}")]
    PopulationTooSmall(usize),
    #[error("Offspring count must be positive")]
    NoOffspring,
    #[error("Offspring count {offspring_count} exceeds half the population size {size}")]
    TooManyOffspring { offspring_count: usize, size: usize },
    #[error("Mutation rate {0} must be within [0, 1]")]
    InvalidMutationRate(f32),
    #[error("Tournament size must be positive")]
    EmptyTournament,
    #[error("Invalid weight: {0}")]
    InvalidWeight(String),
}
