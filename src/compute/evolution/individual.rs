//! The individual abstraction the evolution engine operates on.

use rand::Rng;

/// One solution in a population together with its fitness.
///
/// Every operator is required; individuals that should not change under
/// variation use [`IdentityIndividual`].
pub trait Individual: Clone {
    /// Fill a freshly constructed individual with a random solution.
    fn randomize<R: Rng + ?Sized>(&mut self, rng: &mut R);

    /// Apply a random mutation with probability `rate`.
    fn mutate<R: Rng + ?Sized>(&mut self, rng: &mut R, rate: f32);

    /// Create one offspring from `self` and `other`.
    fn crossover<R: Rng + ?Sized>(&self, other: &Self, rng: &mut R) -> Self;

    /// Fitness from the last evaluation, `None` if never evaluated.
    fn fitness(&self) -> Option<f32>;

    fn set_fitness(&mut self, fitness: f32);

    /// Fitness used for ordering. Unevaluated individuals rank lowest.
    fn rank_fitness(&self) -> f32 {
        self.fitness().unwrap_or(f32::NEG_INFINITY)
    }
}

/// An individual whose operators leave the genome untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct IdentityIndividual<T> {
    pub genome: T,
    pub fitness: Option<f32>,
}

impl<T> IdentityIndividual<T> {
    pub fn new(genome: T) -> Self {
        Self {
            genome,
            fitness: None,
        }
    }
}

impl<T: Clone> Individual for IdentityIndividual<T> {
    fn randomize<R: Rng + ?Sized>(&mut self, _rng: &mut R) {}

    fn mutate<R: Rng + ?Sized>(&mut self, _rng: &mut R, _rate: f32) {}

    fn crossover<R: Rng + ?Sized>(&self, _other: &Self, _rng: &mut R) -> Self {
        Self::new(self.genome.clone())
    }

    fn fitness(&self) -> Option<f32> {
        self.fitness
    }

    fn set_fitness(&mut self, fitness: f32) {
        self.fitness = Some(fitness);
    }
}
