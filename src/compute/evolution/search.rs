//! Steady-state genetic algorithm.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::schema::{EvolutionConfig, EvolutionConfigError};

use super::fitness::FitnessFunction;
use super::genome::GenomeRng;
use super::individual::Individual;
use super::selection::{SelectionError, select_pairs};

/// Errors that abort an evolution run.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EvolutionError {
    #[error("Invalid evolution configuration: {0}")]
    Config(#[from] EvolutionConfigError),
    #[error("Parent selection failed: {0}")]
    Selection(#[from] SelectionError),
}

/// Summary of one generation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationStats {
    /// Generations completed, including this one.
    pub generation: usize,
    /// Best fitness in the population.
    pub best_fitness: f32,
    /// Mean fitness of the population.
    pub avg_fitness: f32,
    /// Best fitness among this generation's offspring.
    pub offspring_best: f32,
}

/// Fitness history for plotting.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct EvolutionHistory {
    /// Best fitness per generation.
    pub best_fitness: Vec<f32>,
    /// Average fitness per generation.
    pub avg_fitness: Vec<f32>,
}

/// Evolution engine owning a fixed-size population.
///
/// The population is kept sorted by ascending fitness between generations.
pub struct EvolutionEngine<I, F> {
    config: EvolutionConfig,
    rng: GenomeRng,
    fitness: F,
    population: Vec<I>,
    history: EvolutionHistory,
    generation: usize,
}

impl<I, F> EvolutionEngine<I, F>
where
    I: Individual + Send,
    F: FitnessFunction<I> + Sync,
{
    /// Create an engine whose population is `config.size` randomized and
    /// evaluated copies of `template`.
    pub fn new(template: &I, fitness: F, config: EvolutionConfig) -> Result<Self, EvolutionError> {
        config.validate()?;

        let rng = match config.random_seed {
            Some(seed) => GenomeRng::new(seed),
            None => GenomeRng::random(),
        };

        let mut engine = Self {
            population: Vec::with_capacity(config.size + config.offspring_count),
            config,
            rng,
            fitness,
            history: EvolutionHistory::default(),
            generation: 0,
        };
        engine.initialize(template);
        Ok(engine)
    }

    fn initialize(&mut self, template: &I) {
        let mut population: Vec<I> = (0..self.config.size)
            .map(|_| {
                let mut individual = template.clone();
                individual.randomize(&mut self.rng);
                individual
            })
            .collect();
        self.evaluate_all(&mut population);

        self.population = population;
        self.sort_population();
    }

    /// Score individuals in place.
    fn evaluate_all(&self, individuals: &mut [I]) {
        let fitness = &self.fitness;
        if self.config.parallel_evaluation {
            individuals.par_iter_mut().for_each(|individual| {
                let score = fitness.fitness(individual);
                individual.set_fitness(score);
            });
        } else {
            for individual in individuals.iter_mut() {
                let score = fitness.fitness(individual);
                individual.set_fitness(score);
            }
        }
    }

    /// Ascending by fitness. Stable, so ties keep insertion order.
    fn sort_population(&mut self) {
        self.population
            .sort_by(|a, b| a.rank_fitness().total_cmp(&b.rank_fitness()));
    }

    /// Run one generation: select parents, breed and score offspring, then
    /// replace the weakest individuals with them.
    pub fn evolve(&mut self) -> Result<GenerationStats, EvolutionError> {
        let pairs = select_pairs(
            &self.config.selection,
            &self.population,
            self.config.offspring_count,
            &mut self.rng,
        )?;

        let mut offspring: Vec<I> = pairs
            .into_iter()
            .map(|(a, b)| {
                let mut child = self.population[a].crossover(&self.population[b], &mut self.rng);
                child.mutate(&mut self.rng, self.config.mutation_rate);
                child
            })
            .collect();
        self.evaluate_all(&mut offspring);

        let offspring_best = offspring
            .iter()
            .map(Individual::rank_fitness)
            .fold(f32::NEG_INFINITY, f32::max);

        let replaced = offspring.len();
        self.population.extend(offspring);
        self.sort_population();
        self.population.drain(..replaced);

        self.generation += 1;
        let stats = GenerationStats {
            generation: self.generation,
            best_fitness: self.best().rank_fitness(),
            avg_fitness: self.average_fitness(),
            offspring_best,
        };
        self.history.best_fitness.push(stats.best_fitness);
        self.history.avg_fitness.push(stats.avg_fitness);

        log::debug!(
            "Generation {}: best={:.4}, avg={:.4}, offspring best={:.4}",
            stats.generation,
            stats.best_fitness,
            stats.avg_fitness,
            stats.offspring_best
        );

        Ok(stats)
    }

    /// Run `generations` steps, reporting each to `callback`.
    pub fn run_with_callback<C>(
        &mut self,
        generations: usize,
        mut callback: C,
    ) -> Result<&I, EvolutionError>
    where
        C: FnMut(&GenerationStats),
    {
        for _ in 0..generations {
            let stats = self.evolve()?;
            callback(&stats);
        }
        Ok(self.best())
    }

    /// Run `generations` steps and return the best individual.
    pub fn run(&mut self, generations: usize) -> Result<&I, EvolutionError> {
        self.run_with_callback(generations, |_| {})
    }
}

impl<I: Individual, F> EvolutionEngine<I, F> {
    /// The fittest individual.
    pub fn best(&self) -> &I {
        // Construction guarantees at least two individuals.
        &self.population[self.population.len() - 1]
    }

    /// The `n` fittest individuals, best first.
    pub fn best_n(&self, n: usize) -> Vec<&I> {
        self.population.iter().rev().take(n).collect()
    }

    /// Population in ascending fitness order.
    pub fn population(&self) -> &[I] {
        &self.population
    }

    pub fn average_fitness(&self) -> f32 {
        if self.population.is_empty() {
            return 0.0;
        }
        self.population.iter().map(Individual::rank_fitness).sum::<f32>()
            / self.population.len() as f32
    }

    /// Generations completed so far.
    pub fn generation(&self) -> usize {
        self.generation
    }

    pub fn history(&self) -> &EvolutionHistory {
        &self.history
    }

    pub fn config(&self) -> &EvolutionConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compute::evolution::IdentityIndividual;
    use crate::schema::SelectionMethod;
    use rand::Rng;

    /// Integer genome that randomizes to 0..100 and mutates by +-1.
    #[derive(Debug, Clone)]
    struct Counter {
        value: i32,
        fitness: Option<f32>,
    }

    impl Individual for Counter {
        fn randomize<R: Rng + ?Sized>(&mut self, rng: &mut R) {
            self.value = rng.gen_range(0..100);
        }

        fn mutate<R: Rng + ?Sized>(&mut self, rng: &mut R, rate: f32) {
            if rng.r#gen::<f32>() < rate {
                self.value += if rng.gen_bool(0.5) { 1 } else { -1 };
            }
        }

        fn crossover<R: Rng + ?Sized>(&self, other: &Self, _rng: &mut R) -> Self {
            Counter {
                value: (self.value + other.value) / 2,
                fitness: None,
            }
        }

        fn fitness(&self) -> Option<f32> {
            self.fitness
        }

        fn set_fitness(&mut self, fitness: f32) {
            self.fitness = Some(fitness);
        }
    }

    fn target_fitness(c: &Counter) -> f32 {
        -((c.value - 70).abs() as f32)
    }

    fn config(size: usize, offspring_count: usize) -> EvolutionConfig {
        EvolutionConfig {
            size,
            offspring_count,
            random_seed: Some(42),
            ..Default::default()
        }
    }

    fn counter() -> Counter {
        Counter {
            value: 0,
            fitness: None,
        }
    }

    #[test]
    fn test_engine_creation() {
        let engine = EvolutionEngine::new(&counter(), target_fitness, config(20, 5)).unwrap();

        assert_eq!(engine.population().len(), 20);
        assert!(engine.population().iter().all(|c| c.fitness().is_some()));
        assert!(engine.population().windows(2).all(|w| w[0].rank_fitness() <= w[1].rank_fitness()));
        assert_eq!(engine.generation(), 0);
    }

    #[test]
    fn test_rejects_too_many_offspring() {
        let result = EvolutionEngine::new(&counter(), target_fitness, config(10, 6));
        assert!(matches!(
            result,
            Err(EvolutionError::Config(EvolutionConfigError::TooManyOffspring {
                offspring_count: 6,
                size: 10
            }))
        ));
    }

    #[test]
    fn test_population_size_invariant() {
        let mut engine = EvolutionEngine::new(&counter(), target_fitness, config(21, 10)).unwrap();
        for _ in 0..25 {
            engine.evolve().unwrap();
            assert_eq!(engine.population().len(), 21);
        }
        assert_eq!(engine.generation(), 25);
        assert_eq!(engine.history().best_fitness.len(), 25);
    }

    #[test]
    fn test_best_fitness_monotonic() {
        let mut engine = EvolutionEngine::new(&counter(), target_fitness, config(30, 8)).unwrap();
        let mut previous = engine.best().rank_fitness();

        for _ in 0..50 {
            let stats = engine.evolve().unwrap();
            assert!(stats.best_fitness >= previous);
            previous = stats.best_fitness;
        }
        assert!(previous > -10.0);
    }

    #[test]
    fn test_best_n_order() {
        let engine = EvolutionEngine::new(&counter(), target_fitness, config(10, 2)).unwrap();
        let top = engine.best_n(3);

        assert_eq!(top.len(), 3);
        assert!(std::ptr::eq(top[0], engine.best()));
        assert!(top[0].rank_fitness() >= top[1].rank_fitness());
        assert!(top[1].rank_fitness() >= top[2].rank_fitness());
        assert_eq!(engine.best_n(50).len(), 10);
    }

    #[test]
    fn test_selection_exhaustion_surfaces() {
        // Tournament of 2 over a population of exactly 2 * offspring runs dry.
        let mut engine = EvolutionEngine::new(&counter(), target_fitness, config(10, 5)).unwrap();
        assert!(matches!(
            engine.evolve(),
            Err(EvolutionError::Selection(SelectionError::PoolExhausted { .. }))
        ));
        assert_eq!(engine.population().len(), 10);
    }

    #[test]
    fn test_fittest_selection_run() {
        let config = EvolutionConfig {
            selection: SelectionMethod::Fittest,
            ..config(10, 5)
        };
        let mut engine = EvolutionEngine::new(&counter(), target_fitness, config).unwrap();
        let best = engine.run(20).unwrap();
        assert!(best.fitness().is_some());
    }

    #[test]
    fn test_seeded_runs_match() {
        let run = |parallel_evaluation: bool| {
            let config = EvolutionConfig {
                parallel_evaluation,
                ..config(20, 5)
            };
            let mut engine = EvolutionEngine::new(&counter(), target_fitness, config).unwrap();
            engine.run(10).unwrap();
            engine.population().iter().map(|c| c.value).collect::<Vec<_>>()
        };

        assert_eq!(run(true), run(false));
    }

    #[test]
    fn test_callback_sees_every_generation() {
        let mut engine = EvolutionEngine::new(&counter(), target_fitness, config(12, 3)).unwrap();
        let mut seen = Vec::new();
        engine
            .run_with_callback(4, |stats| seen.push(stats.generation))
            .unwrap();
        assert_eq!(seen, vec![1, 2, 3, 4]);
    }

    fn constant_fitness(_: &IdentityIndividual<&'static str>) -> f32 {
        1.0
    }

    #[test]
    fn test_identity_population() {
        let template = IdentityIndividual::new("fixed");
        let mut engine = EvolutionEngine::new(&template, constant_fitness, config(6, 2)).unwrap();
        engine.run(3).unwrap();

        assert!(engine.population().iter().all(|i| i.genome == "fixed"));
        assert_eq!(engine.average_fitness(), 1.0);
    }
}
