//! Parent selection strategies.
//!
//! Selection works on population indices so the engine can clone parents
//! after the borrow of the population ends.

use rand::Rng;

use crate::schema::SelectionMethod;

use super::individual::Individual;

/// A pair of population indices to breed.
pub type ParentPair = (usize, usize);

/// Selection failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectionError {
    #[error(
        "Tournament pool exhausted: round needs {needed} contenders but only {remaining} remain \
         after {winners} of {required} winners"
    )]
    PoolExhausted {
        needed: usize,
        remaining: usize,
        winners: usize,
        required: usize,
    },
    #[error("Fittest selection needs {required} individuals but the population has {available}")]
    PopulationTooSmall { required: usize, available: usize },
}

/// Pick `offspring_count` parent pairs using the configured method.
pub fn select_pairs<I, R>(
    method: &SelectionMethod,
    population: &[I],
    offspring_count: usize,
    rng: &mut R,
) -> Result<Vec<ParentPair>, SelectionError>
where
    I: Individual,
    R: Rng + ?Sized,
{
    match method {
        SelectionMethod::Tournament { size } => {
            tournament(population, offspring_count, *size, rng)
        }
        SelectionMethod::Fittest => fittest(population, offspring_count),
    }
}

/// Tournament selection without replacement of winners.
///
/// Each round draws `contenders` distinct individuals from the pool; the
/// fittest becomes a parent and leaves the pool, the others go back.
pub fn tournament<I, R>(
    population: &[I],
    offspring_count: usize,
    contenders: usize,
    rng: &mut R,
) -> Result<Vec<ParentPair>, SelectionError>
where
    I: Individual,
    R: Rng + ?Sized,
{
    let required = offspring_count * 2;
    let mut pool: Vec<usize> = (0..population.len()).collect();
    let mut winners = Vec::with_capacity(required);
    let mut round = Vec::with_capacity(contenders);

    while winners.len() < required {
        if contenders == 0 || pool.len() < contenders {
            return Err(SelectionError::PoolExhausted {
                needed: contenders,
                remaining: pool.len(),
                winners: winners.len(),
                required,
            });
        }

        round.clear();
        for _ in 0..contenders {
            let pick = rng.gen_range(0..pool.len());
            round.push(pool.swap_remove(pick));
        }

        // First drawn wins ties
        let mut best = 0;
        for (i, &idx) in round.iter().enumerate().skip(1) {
            if population[idx].rank_fitness() > population[round[best]].rank_fitness() {
                best = i;
            }
        }

        winners.push(round.swap_remove(best));
        pool.extend_from_slice(&round);
    }

    Ok(pair_up(&winners))
}

/// Pair the top `2 * offspring_count` individuals by rank.
pub fn fittest<I: Individual>(
    population: &[I],
    offspring_count: usize,
) -> Result<Vec<ParentPair>, SelectionError> {
    let required = offspring_count * 2;
    if population.len() < required {
        return Err(SelectionError::PopulationTooSmall {
            required,
            available: population.len(),
        });
    }

    Ok(pair_up(&ranked(population)[..required]))
}

/// Indices sorted by descending fitness. Stable, so equal fitness keeps
/// population order.
pub fn ranked<I: Individual>(population: &[I]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..population.len()).collect();
    order.sort_by(|&a, &b| {
        population[b]
            .rank_fitness()
            .total_cmp(&population[a].rank_fitness())
    });
    order
}

fn pair_up(indices: &[usize]) -> Vec<ParentPair> {
    indices
        .chunks_exact(2)
        .map(|pair| (pair[0], pair[1]))
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::compute::evolution::{GenomeRng, IdentityIndividual};

    fn population(fitness: &[f32]) -> Vec<IdentityIndividual<usize>> {
        fitness
            .iter()
            .enumerate()
            .map(|(i, &f)| {
                let mut individual = IdentityIndividual::new(i);
                individual.set_fitness(f);
                individual
            })
            .collect()
    }

    #[test]
    fn test_fittest_pairs_by_rank() {
        let pop = population(&[0.1, 0.9, 0.5, 0.7, 0.3]);
        let pairs = fittest(&pop, 2).unwrap();
        assert_eq!(pairs, vec![(1, 3), (2, 4)]);
    }

    #[test]
    fn test_fittest_too_small() {
        let pop = population(&[0.1, 0.9, 0.5]);
        assert_eq!(
            fittest(&pop, 2),
            Err(SelectionError::PopulationTooSmall {
                required: 4,
                available: 3
            })
        );
    }

    #[test]
    fn test_tournament_winners_are_distinct() {
        let mut rng = GenomeRng::new(42);
        let pop = population(&[0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8, 0.9, 1.0]);

        let pairs = tournament(&pop, 4, 2, &mut rng).unwrap();

        assert_eq!(pairs.len(), 4);
        let winners: HashSet<usize> = pairs.iter().flat_map(|&(a, b)| [a, b]).collect();
        assert_eq!(winners.len(), 8);
    }

    #[test]
    fn test_tournament_never_picks_weakest() {
        let mut rng = GenomeRng::new(1);
        let pop = population(&[0.0, 0.5, 0.6, 0.7, 0.8, 0.9]);

        for _ in 0..50 {
            let pairs = tournament(&pop, 2, 2, &mut rng).unwrap();
            assert!(pairs.iter().all(|&(a, b)| a != 0 && b != 0));
        }
    }

    #[test]
    fn test_tournament_exhaustion() {
        let mut rng = GenomeRng::new(42);
        let pop = population(&[0.1, 0.2, 0.3, 0.4]);

        // Last round would need 2 contenders with 1 left in the pool.
        let err = tournament(&pop, 2, 2, &mut rng).unwrap_err();
        assert_eq!(
            err,
            SelectionError::PoolExhausted {
                needed: 2,
                remaining: 1,
                winners: 3,
                required: 4
            }
        );
    }

    #[test]
    fn test_select_pairs_dispatch() {
        let mut rng = GenomeRng::new(42);
        let pop = population(&[0.4, 0.3, 0.2, 0.1, 0.0]);

        let pairs = select_pairs(&SelectionMethod::Fittest, &pop, 1, &mut rng).unwrap();
        assert_eq!(pairs, vec![(0, 1)]);

        let pairs =
            select_pairs(&SelectionMethod::Tournament { size: 5 }, &pop, 1, &mut rng);
        assert!(matches!(pairs, Err(SelectionError::PoolExhausted { .. })));
    }
}
