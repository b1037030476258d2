//! High-level plan optimization API.

use crate::schema::{
    EvolutionConfig, EvolutionConfigError, OptimizerConfig, Plan, Position, SymbiosisLookup,
};

use super::evolution::{EvolutionEngine, EvolutionError, GenerationStats, SymbiosisEvaluator};

/// Optimizes and scores plans against a symbiosis lookup.
#[derive(Debug, Clone)]
pub struct PlanOptimizer<L> {
    evaluator: SymbiosisEvaluator<L>,
    evolution: EvolutionConfig,
}

impl<L: SymbiosisLookup + Sync> PlanOptimizer<L> {
    /// Optimizer with default settings: 50 individuals, 10 offspring per
    /// generation, uniform Moore neighborhood.
    pub fn new(lookup: L) -> Self {
        Self {
            evaluator: SymbiosisEvaluator::new(lookup),
            evolution: EvolutionConfig::default(),
        }
    }

    pub fn with_config(lookup: L, config: &OptimizerConfig) -> Result<Self, EvolutionConfigError> {
        config.validate()?;
        Ok(Self {
            evaluator: SymbiosisEvaluator::with_config(lookup, &config.evaluator),
            evolution: config.evolution.clone(),
        })
    }

    pub fn evaluator(&self) -> &SymbiosisEvaluator<L> {
        &self.evaluator
    }

    pub fn evolution_config(&self) -> &EvolutionConfig {
        &self.evolution
    }

    /// Fitness of a whole plan.
    pub fn evaluate(&self, plan: &Plan) -> f32 {
        self.evaluator.evaluate(plan)
    }

    /// Local fitness of one cell.
    pub fn evaluate_cell(&self, plan: &Plan, pos: Position) -> f32 {
        self.evaluator.evaluate_cell(plan, pos)
    }

    /// Rearrange the movable cells of `plan` for `iterations` generations and
    /// return the best plan found, with its fitness set.
    pub fn optimize(&self, plan: &Plan, iterations: usize) -> Result<Plan, EvolutionError> {
        self.optimize_with_callback(plan, iterations, |_| {})
    }

    /// Like [`Self::optimize`], reporting every generation to `callback`.
    pub fn optimize_with_callback<C>(
        &self,
        plan: &Plan,
        iterations: usize,
        callback: C,
    ) -> Result<Plan, EvolutionError>
    where
        C: FnMut(&GenerationStats),
    {
        let evaluator = &self.evaluator;
        let fitness = |candidate: &Plan| evaluator.evaluate(candidate);

        log::info!(
            "Optimizing {} cells ({} movable): population={}, offspring={}, iterations={}",
            plan.len(),
            plan.movable_positions().len(),
            self.evolution.size,
            self.evolution.offspring_count,
            iterations
        );

        let mut engine = EvolutionEngine::new(plan, fitness, self.evolution.clone())?;
        let initial_best = engine.best().fitness();
        let best = engine.run_with_callback(iterations, callback)?.clone();

        log::info!(
            "Optimization finished after {} generations: best fitness {:?} -> {:?}",
            engine.generation(),
            initial_best,
            best.fitness()
        );

        Ok(best)
    }
}

/// Optimize `plan` with default settings.
pub fn optimize<L>(plan: &Plan, iterations: usize, lookup: L) -> Result<Plan, EvolutionError>
where
    L: SymbiosisLookup + Sync,
{
    PlanOptimizer::new(lookup).optimize(plan, iterations)
}

/// Fitness of `plan` with default evaluator settings.
pub fn evaluate<L: SymbiosisLookup>(plan: &Plan, lookup: L) -> f32 {
    SymbiosisEvaluator::new(lookup).evaluate(plan)
}

/// Local fitness of the cell at `pos` with default evaluator settings.
pub fn evaluate_cell<L: SymbiosisLookup>(plan: &Plan, pos: Position, lookup: L) -> f32 {
    SymbiosisEvaluator::new(lookup).evaluate_cell(plan, pos)
}
