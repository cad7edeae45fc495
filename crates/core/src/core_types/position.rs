//! Grid coordinates and cardinal directions

use serde::{Deserialize, Serialize};
use std::fmt;

/// A cell coordinate on the arena grid (x = column, y = row, origin top-left)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Coord {
    pub x: usize,
    pub y: usize,
}

impl Coord {
    #[inline]
    #[must_use]
    pub const fn new(x: usize, y: usize) -> Self {
        Coord { x, y }
    }

    /// The coordinate `distance` cells away in `direction`, or `None` if that
    /// leaves a `size`×`size` grid.
    #[must_use]
    pub fn offset(self, direction: Direction, distance: usize, size: usize) -> Option<Coord> {
        let (dx, dy) = direction.delta();
        let x = self.x.checked_add_signed(dx * distance as isize)?;
        let y = self.y.checked_add_signed(dy * distance as isize)?;
        (x < size && y < size).then_some(Coord { x, y })
    }

    /// One step in `direction`, saturating at the grid edge.
    #[must_use]
    pub fn step_clamped(self, direction: Direction, size: usize) -> Coord {
        self.offset(direction, 1, size).unwrap_or(self)
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Cardinal movement / blast direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// All four directions, in ray-casting order
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Unit step as (dx, dy); y grows downward
    #[must_use]
    pub const fn delta(self) -> (isize, isize) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    #[must_use]
    pub const fn is_horizontal(self) -> bool {
        matches!(self, Direction::Left | Direction::Right)
    }

    /// Parse a direction name (`up`, `down`, `left`, `right` or `u/d/l/r`)
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "up" | "u" | "north" => Some(Direction::Up),
            "down" | "d" | "south" => Some(Direction::Down),
            "left" | "l" | "west" => Some(Direction::Left),
            "right" | "r" | "east" => Some(Direction::Right),
            _ => None,
        }
    }
}
