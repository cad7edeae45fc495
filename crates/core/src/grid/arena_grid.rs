//! Fixed-size terrain and cell store
//!
//! The arena is a square `size`×`size` grid stored row-major. Walls sit on
//! every coordinate whose x and y are both even; that lattice is fixed for the
//! lifetime of the grid and [`ArenaGrid::set`] refuses to break it. Grass is
//! scattered randomly over the remaining cells except the two spawn zones.

use super::cell::Cell;
use crate::core_types::Coord;
use crate::entities::player::PlayerId;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::trace;

/// Arena terrain and transient cell state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawGrid")]
pub struct ArenaGrid {
    size: usize,
    cells: Vec<Cell>,
}

/// Grid shape that breaks the storage or wall rules
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridError {
    /// `cells` does not hold `size * size` entries
    CellCount { expected: usize, found: usize },
    /// A wall off the lattice, or a lattice point without a wall
    WallLattice(Coord),
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GridError::CellCount { expected, found } => {
                write!(f, "expected {expected} cells, found {found}")
            }
            GridError::WallLattice(coord) => write!(f, "wall lattice broken at {coord}"),
        }
    }
}

impl std::error::Error for GridError {}

#[derive(Deserialize)]
struct RawGrid {
    size: usize,
    cells: Vec<Cell>,
}

impl TryFrom<RawGrid> for ArenaGrid {
    type Error = GridError;

    fn try_from(raw: RawGrid) -> Result<Self, Self::Error> {
        let grid = ArenaGrid {
            size: raw.size,
            cells: raw.cells,
        };
        grid.validate()?;
        Ok(grid)
    }
}

impl ArenaGrid {
    /// A grid holding only the wall lattice (no grass)
    #[must_use]
    pub fn open(size: usize) -> Self {
        let cells = (0..size * size)
            .map(|i| {
                if Self::is_wall_coord(Coord::new(i % size, i / size)) {
                    Cell::Wall
                } else {
                    Cell::Empty
                }
            })
            .collect();
        ArenaGrid { size, cells }
    }

    /// Generate round terrain: wall lattice plus random grass.
    ///
    /// Every non-wall cell outside both spawn zones becomes grass with
    /// probability `grass_chance`.
    pub fn generate<R: Rng + ?Sized>(size: usize, grass_chance: f64, rng: &mut R) -> Self {
        let mut grid = Self::open(size);
        for y in 0..size {
            for x in 0..size {
                let coord = Coord::new(x, y);
                if Self::is_wall_coord(coord) || Self::is_spawn_zone(size, coord) {
                    continue;
                }
                if rng.random_bool(grass_chance) {
                    let idx = grid.index(coord);
                    grid.cells[idx] = Cell::Grass;
                }
            }
        }
        grid
    }

    /// Wall placement rule: both coordinates even
    #[inline]
    #[must_use]
    pub const fn is_wall_coord(coord: Coord) -> bool {
        coord.x % 2 == 0 && coord.y % 2 == 0
    }

    /// Spawn corners plus their two inward neighbours, always kept clear
    #[must_use]
    pub fn is_spawn_zone(size: usize, coord: Coord) -> bool {
        PlayerId::ALL.iter().any(|id| {
            let spawn = id.spawn_point(size);
            let inward = match id {
                PlayerId::P1 => [Coord::new(spawn.x + 1, spawn.y), Coord::new(spawn.x, spawn.y + 1)],
                PlayerId::P2 => [Coord::new(spawn.x - 1, spawn.y), Coord::new(spawn.x, spawn.y - 1)],
            };
            coord == spawn || inward.contains(&coord)
        })
    }

    /// Check the cell count and the wall lattice
    pub fn validate(&self) -> Result<(), GridError> {
        let expected = self.size * self.size;
        if self.cells.len() != expected {
            return Err(GridError::CellCount {
                expected,
                found: self.cells.len(),
            });
        }
        match self
            .iter()
            .find(|(coord, cell)| (*cell == Cell::Wall) != Self::is_wall_coord(*coord))
        {
            Some((coord, _)) => Err(GridError::WallLattice(coord)),
            None => Ok(()),
        }
    }

    #[inline]
    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    #[must_use]
    pub fn in_bounds(&self, coord: Coord) -> bool {
        coord.x < self.size && coord.y < self.size
    }

    #[inline]
    fn index(&self, coord: Coord) -> usize {
        coord.y * self.size + coord.x
    }

    /// Cell at `coord`, or `None` outside the grid
    #[inline]
    #[must_use]
    pub fn get(&self, coord: Coord) -> Option<Cell> {
        self.in_bounds(coord).then(|| self.cells[self.index(coord)])
    }

    /// Write `cell` at `coord`.
    ///
    /// Returns `false` (and leaves the grid untouched) when `coord` is out of
    /// bounds, when it would overwrite a wall, or when it would place a wall
    /// off the lattice.
    pub fn set(&mut self, coord: Coord, cell: Cell) -> bool {
        if !self.in_bounds(coord) {
            trace!(%coord, "rejected out-of-bounds write");
            return false;
        }
        let idx = self.index(coord);
        let current = self.cells[idx];
        if (current == Cell::Wall) != (cell == Cell::Wall) {
            trace!(%coord, ?current, ?cell, "rejected write across wall lattice");
            return false;
        }
        self.cells[idx] = cell;
        true
    }

    /// All coordinates, row-major
    pub fn coords(&self) -> impl Iterator<Item = Coord> + '_ {
        (0..self.size * self.size).map(move |i| Coord::new(i % self.size, i / self.size))
    }

    /// Row-major iterator over (coord, cell)
    pub fn iter(&self) -> impl Iterator<Item = (Coord, Cell)> + '_ {
        self.coords().zip(self.cells.iter().copied())
    }

    /// Number of cells satisfying `pred`
    pub fn count(&self, pred: impl Fn(Cell) -> bool) -> usize {
        self.cells.iter().filter(|c| pred(**c)).count()
    }

    /// One row of cells (for text views)
    #[must_use]
    pub fn row(&self, y: usize) -> &[Cell] {
        let start = y * self.size;
        &self.cells[start..start + self.size]
    }
}
