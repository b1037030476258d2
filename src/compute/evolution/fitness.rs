//! Fitness evaluation for garden plans.
//!
//! The symbiosis evaluator sums weighted compatibility scores between each
//! planted cell and its planted neighbors, normalized so plans of different
//! size and density stay comparable.

use crate::compute::Neighborhood;
use crate::schema::{EvaluatorConfig, Plan, Plant, Position, SymbiosisLookup};

/// Scores an individual. Higher is better.
pub trait FitnessFunction<I> {
    fn fitness(&self, individual: &I) -> f32;
}

impl<I, F> FitnessFunction<I> for F
where
    F: Fn(&I) -> f32,
{
    fn fitness(&self, individual: &I) -> f32 {
        self(individual)
    }
}

/// Neighbor-weighted symbiosis evaluator.
#[derive(Debug, Clone)]
pub struct SymbiosisEvaluator<L> {
    lookup: L,
    neighborhood: Neighborhood,
    positive_weight: f32,
    negative_weight: f32,
}

impl<L: SymbiosisLookup> SymbiosisEvaluator<L> {
    /// Evaluator with unit score weights over the uniform Moore neighborhood.
    pub fn new(lookup: L) -> Self {
        Self::with_config(lookup, &EvaluatorConfig::default())
    }

    pub fn with_config(lookup: L, config: &EvaluatorConfig) -> Self {
        Self {
            lookup,
            neighborhood: Neighborhood::from_config(&config.neighborhood),
            positive_weight: config.positive_weight,
            negative_weight: config.negative_weight,
        }
    }

    /// Replace the neighborhood.
    pub fn with_neighborhood(mut self, neighborhood: Neighborhood) -> Self {
        self.neighborhood = neighborhood;
        self
    }

    pub fn neighborhood(&self) -> &Neighborhood {
        &self.neighborhood
    }

    pub fn lookup(&self) -> &L {
        &self.lookup
    }

    /// Compatibility score with the positive or negative weight applied.
    fn weighted_score(&self, plant: &Plant, neighbor: &Plant) -> f32 {
        let score = self.lookup.score(plant, neighbor) as f32;
        if score > 0.0 {
            score * self.positive_weight
        } else {
            score * self.negative_weight
        }
    }

    /// Unnormalized score of one planted cell against its neighbors.
    fn raw_cell_score(&self, plan: &Plan, pos: Position, plant: &Plant) -> f32 {
        self.neighborhood
            .neighbors_of(plan, pos)
            .map(|(neighbor, weight)| self.weighted_score(plant, neighbor) * weight)
            .sum()
    }

    /// Largest possible magnitude of one cell's raw score.
    fn normalizer(&self) -> f32 {
        self.neighborhood.total_weight() * self.positive_weight.max(self.negative_weight)
    }

    /// Fitness of a whole plan. An all-empty plan scores 0.
    pub fn evaluate(&self, plan: &Plan) -> f32 {
        let mut total_score = 0.0f32;
        let mut non_empty_count = 0usize;

        for (pos, cell) in plan.cells() {
            let Some(plant) = cell else {
                continue;
            };
            non_empty_count += 1;
            total_score += self.raw_cell_score(plan, pos, plant);
        }

        let normalizer = non_empty_count as f32 * self.normalizer();
        if normalizer == 0.0 {
            return 0.0;
        }
        total_score / normalizer
    }

    /// Local score of a single cell, normalized like [`Self::evaluate`].
    ///
    /// `evaluate` equals the mean of `evaluate_cell` over all planted cells.
    /// Empty and unknown cells score 0.
    pub fn evaluate_cell(&self, plan: &Plan, pos: Position) -> f32 {
        let Some(plant) = plan.plant_at(pos) else {
            return 0.0;
        };
        let normalizer = self.normalizer();
        if normalizer == 0.0 {
            return 0.0;
        }
        self.raw_cell_score(plan, pos, plant) / normalizer
    }
}

impl<L: SymbiosisLookup> FitnessFunction<Plan> for SymbiosisEvaluator<L> {
    fn fitness(&self, plan: &Plan) -> f32 {
        self.evaluate(plan)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Cell, NeighborOffset, NeighborhoodConfig, SymbiosisTable};

    fn plant(name: &str) -> Cell {
        Some(Plant::from(name))
    }

    fn table() -> SymbiosisTable {
        let mut table = SymbiosisTable::new();
        table.insert("Carrot", "Beetroot", 1);
        table.insert("Cabbage", "Carrot", -1);
        table
    }

    #[test]
    fn test_empty_plan_scores_zero() {
        let evaluator = SymbiosisEvaluator::new(table());
        let plan = Plan::from_rows([vec![None::<Plant>, None], vec![None, None]]);
        assert_eq!(evaluator.evaluate(&plan), 0.0);
        assert_eq!(evaluator.evaluate(&Plan::from_rows(Vec::<Vec<Cell>>::new())), 0.0);
    }

    #[test]
    fn test_row_scores() {
        let evaluator = SymbiosisEvaluator::new(table());

        // Carrot sees Cabbage (-1); Cabbage sees Carrot (-1) and Beetroot (0);
        // Beetroot sees Cabbage (0).
        let bad = Plan::from_rows([vec![plant("Carrot"), plant("Cabbage"), plant("Beetroot")]]);
        assert!((evaluator.evaluate(&bad) - (-2.0 / 24.0)).abs() < 1e-6);

        // Carrot sees Cabbage (-1) and Beetroot (+1).
        let good = Plan::from_rows([vec![plant("Cabbage"), plant("Carrot"), plant("Beetroot")]]);
        assert!((evaluator.evaluate(&good) - 0.0).abs() < 1e-6);
        assert!(evaluator.evaluate(&good) > evaluator.evaluate(&bad));
    }

    #[test]
    fn test_pair_order_irrelevant() {
        let evaluator = SymbiosisEvaluator::new(table());
        let a = Plan::from_rows([vec![plant("Carrot"), plant("Beetroot")]]);
        let b = Plan::from_rows([vec![plant("Beetroot"), plant("Carrot")]]);
        assert_eq!(evaluator.evaluate(&a), evaluator.evaluate(&b));
        assert!((evaluator.evaluate(&a) - 2.0 / 16.0).abs() < 1e-6);
    }

    #[test]
    fn test_score_weights() {
        let config = EvaluatorConfig {
            positive_weight: 1.0,
            negative_weight: 3.0,
            neighborhood: NeighborhoodConfig::Moore,
        };
        let evaluator = SymbiosisEvaluator::with_config(table(), &config);
        let plan = Plan::from_rows([vec![plant("Carrot"), plant("Cabbage")]]);

        // Two -1 pairs weighted by 3, normalized by 2 * 8 * 3.
        assert!((evaluator.evaluate(&plan) - (-6.0 / 48.0)).abs() < 1e-6);
    }

    #[test]
    fn test_neighbor_weights() {
        let config = EvaluatorConfig {
            neighborhood: NeighborhoodConfig::weighted_moore(),
            ..Default::default()
        };
        let evaluator = SymbiosisEvaluator::with_config(table(), &config);

        // Diagonal pair only.
        let plan = Plan::from_rows([vec![plant("Carrot"), None], vec![None, plant("Beetroot")]]);
        assert!((evaluator.evaluate(&plan) - (2.0 * 0.5) / (2.0 * 6.0)).abs() < 1e-6);
    }

    #[test]
    fn test_zero_weight_neighborhood() {
        let evaluator = SymbiosisEvaluator::new(table())
            .with_neighborhood(Neighborhood::new(vec![NeighborOffset::new(1, 0, 0.0)]));
        let plan = Plan::from_rows([vec![plant("Carrot"), plant("Beetroot")]]);
        assert_eq!(evaluator.evaluate(&plan), 0.0);
        assert_eq!(evaluator.evaluate_cell(&plan, Position::new(0, 0)), 0.0);
    }

    #[test]
    fn test_cells_average_to_plan_fitness() {
        let evaluator = SymbiosisEvaluator::new(table());
        let plan = Plan::from_rows([
            vec![plant("Carrot"), plant("Cabbage"), None],
            vec![plant("Beetroot"), plant("Carrot"), plant("Kale")],
        ]);

        let planted: Vec<_> = plan
            .cells()
            .filter(|(_, cell)| cell.is_some())
            .map(|(pos, _)| pos)
            .collect();
        let mean = planted
            .iter()
            .map(|&pos| evaluator.evaluate_cell(&plan, pos))
            .sum::<f32>()
            / planted.len() as f32;

        assert!((evaluator.evaluate(&plan) - mean).abs() < 1e-6);
        assert_eq!(evaluator.evaluate_cell(&plan, Position::new(2, 0)), 0.0);
        assert_eq!(evaluator.evaluate_cell(&plan, Position::new(9, 9)), 0.0);
    }

    #[test]
    fn test_far_edges_are_not_neighbors() {
        let evaluator = SymbiosisEvaluator::new(table());
        let plan = Plan::from_snapshot(crate::schema::PlanSnapshot {
            assignment: vec![
                (Position::new(i32::MAX, 0), plant("Carrot")),
                (Position::new(i32::MIN, 0), plant("Beetroot")),
            ],
            movable_positions: vec![],
        })
        .unwrap();

        assert_eq!(evaluator.evaluate(&plan), 0.0);
        assert_eq!(evaluator.evaluate_cell(&plan, Position::new(i32::MAX, 0)), 0.0);
    }

    #[test]
    fn test_closure_fitness_function() {
        let count_planted = |plan: &Plan| plan.cells().filter(|(_, c)| c.is_some()).count() as f32;
        let plan = Plan::from_rows([vec![plant("Carrot"), None]]);
        assert_eq!(count_planted.fitness(&plan), 1.0);
    }
}
