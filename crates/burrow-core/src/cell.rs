//! Grid cells and cardinal movement directions.

use std::fmt;

/// A cell coordinate on a 2D grid.
///
/// `x` grows to the right and `y` grows downward, so row `y = 0` is the top
/// row when rendered. Bounds are a property of the grid, not of the cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Cell {
    /// Column.
    pub x: u32,
    /// Row.
    pub y: u32,
}

impl Cell {
    /// The top-left cell, where agents start by default.
    pub const ORIGIN: Cell = Cell { x: 0, y: 0 };

    /// Create a cell from its column and row.
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// The cell one step away in `dir`, or `None` if that would leave the
    /// non-negative quadrant. Upper bounds are checked by the grid.
    pub fn step(self, dir: Direction) -> Option<Cell> {
        let (dx, dy) = dir.offset_2d();
        Some(Cell {
            x: self.x.checked_add_signed(dx)?,
            y: self.y.checked_add_signed(dy)?,
        })
    }

    /// Direction leading from `self` to an axis-adjacent `other`, if any.
    pub fn direction_to(self, other: Cell) -> Option<Direction> {
        Direction::ALL
            .into_iter()
            .find(|&dir| self.step(dir) == Some(other))
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl From<(u32, u32)> for Cell {
    fn from((x, y): (u32, u32)) -> Self {
        Self { x, y }
    }
}

/// Cardinal direction for a single move.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// One column left (x - 1).
    Left,
    /// One row up (y - 1).
    Up,
    /// One column right (x + 1).
    Right,
    /// One row down (y + 1).
    Down,
}

impl Direction {
    /// All directions, in the order candidate moves are generated.
    pub const ALL: [Direction; 4] = [
        Direction::Left,
        Direction::Up,
        Direction::Right,
        Direction::Down,
    ];

    /// Returns the (x_offset, y_offset) for this direction.
    pub fn offset_2d(self) -> (i32, i32) {
        match self {
            Direction::Left => (-1, 0),
            Direction::Up => (0, -1),
            Direction::Right => (1, 0),
            Direction::Down => (0, 1),
        }
    }
}
