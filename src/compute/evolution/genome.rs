//! Genome manipulation for garden plans.
//!
//! Provides the seeded random source and the plan's randomization, swap
//! mutation and inventory-preserving crossover.

use std::collections::BTreeMap;

use rand::prelude::*;
use rand::seq::index;

use crate::schema::{Cell, Inventory, Plan};

use super::individual::Individual;

/// Random number generator wrapper for genome operations.
#[derive(Debug, Clone)]
pub struct GenomeRng {
    rng: StdRng,
}

impl GenomeRng {
    /// Create from seed.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Create with random seed.
    pub fn random() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }
}

impl RngCore for GenomeRng {
    fn next_u32(&mut self) -> u32 {
        self.rng.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.rng.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.rng.fill_bytes(dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.rng.try_fill_bytes(dest)
    }
}

impl Individual for Plan {
    /// Shuffle the plan's inventory onto its movable positions.
    fn randomize<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let mut cells: Vec<Cell> = self
            .movable
            .iter()
            .filter_map(|pos| self.assignment.get(pos).cloned())
            .collect();
        cells.shuffle(rng);

        for (pos, cell) in self.movable.iter().zip(cells) {
            self.assignment.insert(*pos, cell);
        }
        self.fitness = None;
    }

    /// Swap two distinct movable cells with probability `rate`.
    fn mutate<R: Rng + ?Sized>(&mut self, rng: &mut R, rate: f32) {
        if self.movable.len() < 2 || rng.r#gen::<f32>() >= rate {
            return;
        }

        let picked = index::sample(rng, self.movable.len(), 2);
        let (a, b) = (self.movable[picked.index(0)], self.movable[picked.index(1)]);
        self.swap(a, b);
    }

    /// Cell-wise crossover that keeps the first parent's inventory.
    ///
    /// Each movable position takes the cell of a randomly chosen donor parent,
    /// falling back to the other parent when the first choice would exceed
    /// the inventory. Positions where both donors are over budget are filled
    /// afterwards from the leftover inventory. Fixed positions are copied from
    /// `self`.
    fn crossover<R: Rng + ?Sized>(&self, other: &Self, rng: &mut R) -> Self {
        let total_counts = self.inventory();
        let mut current_counts: Inventory =
            total_counts.keys().map(|cell| (cell.clone(), 0)).collect();

        let mut assignment = BTreeMap::new();
        let mut skipped = Vec::new();

        for &pos in &self.movable {
            let (primary, secondary) = if rng.gen_bool(0.5) {
                (self, other)
            } else {
                (other, self)
            };

            let placed = [primary, secondary]
                .into_iter()
                .filter_map(|parent| parent.assignment.get(&pos))
                .find(|cell| take_from_budget(&total_counts, &mut current_counts, cell));

            match placed {
                Some(cell) => {
                    assignment.insert(pos, cell.clone());
                }
                None => skipped.push(pos),
            }
        }

        let remaining = total_counts.iter().flat_map(|(cell, total)| {
            let used = current_counts.get(cell).copied().unwrap_or(0);
            std::iter::repeat_n(cell, total - used)
        });
        for (pos, cell) in skipped.into_iter().zip(remaining) {
            assignment.insert(pos, cell.clone());
        }

        for (pos, cell) in &self.assignment {
            assignment.entry(*pos).or_insert_with(|| cell.clone());
        }

        Plan {
            assignment,
            movable: self.movable.clone(),
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

/// Consume one copy of `cell` from the budget if any is left.
fn take_from_budget(total: &Inventory, used: &mut Inventory, cell: &Cell) -> bool {
    let budget = total.get(cell).copied().unwrap_or(0);
    match used.get_mut(cell) {
        Some(count) if *count < budget => {
            *count += 1;
            true
        }
        _ => false,
    }
}
