//! Neighbor lookup over a plan grid.

use std::collections::BTreeSet;

use crate::schema::{NeighborOffset, NeighborhoodConfig, Plan, Plant, Position};

/// A fixed set of weighted relative offsets that influence a cell.
#[derive(Debug, Clone, PartialEq)]
pub struct Neighborhood {
    offsets: Vec<NeighborOffset>,
    total_weight: f32,
}

impl Neighborhood {
    pub fn new(offsets: Vec<NeighborOffset>) -> Self {
        let total_weight = offsets.iter().map(|o| o.weight).sum();
        Self {
            offsets,
            total_weight,
        }
    }

    /// The 8 surrounding cells with equal weight.
    pub fn moore() -> Self {
        Self::from_config(&NeighborhoodConfig::Moore)
    }

    pub fn from_config(config: &NeighborhoodConfig) -> Self {
        Self::new(config.offsets())
    }

    pub fn offsets(&self) -> &[NeighborOffset] {
        &self.offsets
    }

    /// Sum of all offset weights.
    #[inline]
    pub fn total_weight(&self) -> f32 {
        self.total_weight
    }

    /// Planted neighbors of `pos` with their offset weights, in offset order.
    /// Positions outside the plan or the coordinate range and empty cells are
    /// skipped.
    pub fn neighbors_of<'a>(
        &'a self,
        plan: &'a Plan,
        pos: Position,
    ) -> impl Iterator<Item = (&'a Plant, f32)> + 'a {
        self.offsets.iter().filter_map(move |offset| {
            pos.offset(offset.dx, offset.dy)
                .and_then(|neighbor| plan.plant_at(neighbor))
                .map(|plant| (plant, offset.weight))
        })
    }

    /// Positions whose local score depends on the cell at `pos`: the cell
    /// itself and every position that sees it as a neighbor.
    pub fn affected_positions(&self, plan: &Plan, pos: Position) -> BTreeSet<Position> {
        std::iter::once(pos)
            .chain(
                self.offsets
                    .iter()
                    .filter_map(|offset| pos.offset_from(offset.dx, offset.dy)),
            )
            .filter(|p| plan.contains(*p))
            .collect()
    }
}

impl Default for Neighborhood {
    fn default() -> Self {
        Self::moore()
    }
}
