//! Grid plan types: positions, plants and the plan genome.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// A grid cell coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Position shifted by a relative offset, `None` if either axis leaves
    /// the `i32` range.
    #[inline]
    pub const fn offset(self, dx: i32, dy: i32) -> Option<Self> {
        match (self.x.checked_add(dx), self.y.checked_add(dy)) {
            (Some(x), Some(y)) => Some(Self { x, y }),
            _ => None,
        }
    }

    /// Inverse of [`Self::offset`]: the position that reaches `self` by
    /// moving `(dx, dy)`.
    #[inline]
    pub const fn offset_from(self, dx: i32, dy: i32) -> Option<Self> {
        match (self.x.checked_sub(dx), self.y.checked_sub(dy)) {
            (Some(x), Some(y)) => Some(Self { x, y }),
            _ => None,
        }
    }
}

impl From<(i32, i32)> for Position {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// A plant species identifier. Compared by name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Plant(String);

impl Plant {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Plant {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl From<String> for Plant {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl fmt::Display for Plant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Content of a single cell. `None` is an unplanted cell.
pub type Cell = Option<Plant>;

/// Multiset of cell contents, keyed in a fixed order.
pub type Inventory = BTreeMap<Cell, usize>;

/// A garden plan: every position mapped to a cell, plus the positions the
/// optimizer is allowed to rearrange.
///
/// Positions outside `movable` are fixed scaffolding. The multiset of cells on
/// movable positions is the plan's inventory and is preserved by every
/// variation operator.
#[derive(Debug, Clone, PartialEq)]
pub struct Plan {
    pub(crate) assignment: BTreeMap<Position, Cell>,
    pub(crate) movable: Vec<Position>,
    pub(crate) fitness: Option<f32>,
}

impl Plan {
    /// Create a plan from an assignment and its movable positions.
    pub fn new(
        assignment: BTreeMap<Position, Cell>,
        movable: Vec<Position>,
    ) -> Result<Self, PlanError> {
        let mut seen = HashSet::with_capacity(movable.len());
        for pos in &movable {
            if !assignment.contains_key(pos) {
                return Err(PlanError::UnknownMovablePosition(*pos));
            }
            if !seen.insert(*pos) {
                return Err(PlanError::DuplicateMovablePosition(*pos));
            }
        }

        Ok(Self {
            assignment,
            movable,
            fitness: None,
        })
    }

    /// Build a plan from a row-major table. Row index is `y`, column index is
    /// `x`, and every cell is movable.
    pub fn from_rows<R, C>(rows: R) -> Self
    where
        R: IntoIterator,
        R::Item: IntoIterator<Item = C>,
        C: Into<Cell>,
    {
        let mut assignment = BTreeMap::new();
        for (y, row) in rows.into_iter().enumerate() {
            for (x, cell) in row.into_iter().enumerate() {
                assignment.insert(Position::new(x as i32, y as i32), cell.into());
            }
        }
        let movable = assignment.keys().copied().collect();

        Self {
            assignment,
            movable,
            fitness: None,
        }
    }

    /// Cell at a position, `None` when the position is outside the plan.
    pub fn get(&self, pos: Position) -> Option<&Cell> {
        self.assignment.get(&pos)
    }

    /// Plant at a position, `None` for empty or unknown cells.
    pub fn plant_at(&self, pos: Position) -> Option<&Plant> {
        self.assignment.get(&pos).and_then(Option::as_ref)
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.assignment.contains_key(&pos)
    }

    /// Iterate over all cells in position order.
    pub fn cells(&self) -> impl Iterator<Item = (Position, &Cell)> {
        self.assignment.iter().map(|(pos, cell)| (*pos, cell))
    }

    pub fn movable_positions(&self) -> &[Position] {
        &self.movable
    }

    /// Number of positions in the plan.
    pub fn len(&self) -> usize {
        self.assignment.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assignment.is_empty()
    }

    /// Fitness assigned by the last evaluation, if any.
    pub fn fitness(&self) -> Option<f32> {
        self.fitness
    }

    /// Multiset of cells on the movable positions.
    pub fn inventory(&self) -> Inventory {
        let mut counts = Inventory::new();
        for pos in &self.movable {
            if let Some(cell) = self.assignment.get(pos) {
                *counts.entry(cell.clone()).or_insert(0) += 1;
            }
        }
        counts
    }

    /// Exchange the cells at two positions. Returns false if either position
    /// is not part of the plan.
    pub fn swap(&mut self, a: Position, b: Position) -> bool {
        if !self.assignment.contains_key(&a) || !self.assignment.contains_key(&b) {
            return false;
        }
        if a != b {
            let cell_a = self.assignment.insert(a, None).flatten();
            let cell_b = self.assignment.insert(b, cell_a).flatten();
            self.assignment.insert(a, cell_b);
            self.fitness = None;
        }
        true
    }

    /// Convert to the plain interchange form.
    pub fn to_snapshot(&self) -> PlanSnapshot {
        PlanSnapshot {
            assignment: self
                .assignment
                .iter()
                .map(|(pos, cell)| (*pos, cell.clone()))
                .collect(),
            movable_positions: self.movable.clone(),
        }
    }

    /// Rebuild a plan from its interchange form.
    pub fn from_snapshot(snapshot: PlanSnapshot) -> Result<Self, PlanError> {
        let mut assignment = BTreeMap::new();
        for (pos, cell) in snapshot.assignment {
            if assignment.insert(pos, cell).is_some() {
                return Err(PlanError::DuplicatePosition(pos));
            }
        }
        Self::new(assignment, snapshot.movable_positions)
    }
}

/// Text grid over the occupied rows and columns. Coordinates with no
/// position in the plan are skipped, not drawn as blank space.
impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let columns: BTreeSet<i32> = self.assignment.keys().map(|p| p.x).collect();
        let rows: BTreeSet<i32> = self.assignment.keys().map(|p| p.y).collect();

        let width = self
            .assignment
            .values()
            .flatten()
            .map(|p| p.name().len())
            .max()
            .unwrap_or(0)
            .max(1);

        for &y in &rows {
            let row: Vec<String> = columns
                .iter()
                .map(|&x| {
                    let name = self
                        .plant_at(Position::new(x, y))
                        .map(Plant::name)
                        .unwrap_or("");
                    format!("{name:<width$}")
                })
                .collect();
            writeln!(f, "{}", row.join("  ").trim_end())?;
        }
        Ok(())
    }
}

/// Plain structural form of a plan used for persistence and interchange.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanSnapshot {
    /// Every position and its cell.
    pub assignment: Vec<(Position, Cell)>,
    /// Positions the optimizer may rearrange.
    pub movable_positions: Vec<Position>,
}

impl PlanSnapshot {
    /// Write as pretty JSON.
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)
    }

    /// Read from a JSON file.
    pub fn load_json<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let content = fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    /// Positions that are not movable.
    pub fn fixed_positions(&self) -> BTreeSet<Position> {
        let movable: HashSet<_> = self.movable_positions.iter().collect();
        self.assignment
            .iter()
            .map(|(pos, _)| *pos)
            .filter(|pos| !movable.contains(pos))
            .collect()
    }
}

/// Plan construction errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlanError {
    #[error("Position {0} appears more than once in the assignment")]
    DuplicatePosition(Position),
    #[error("Movable position {0} is not part of the assignment")]
    UnknownMovablePosition(Position),
    #[error("Movable position {0} is listed more than once")]
    DuplicateMovablePosition(Position),
}
