//! Bounded 2D grid with 4-connected neighbourhood.

use crate::error::SpaceError;
use burrow_core::{Cell, Direction};
use smallvec::SmallVec;

/// A bounded two-dimensional grid of `width * height` cells.
///
/// Each cell is `(x, y)` with `0 <= x < width` and `0 <= y < height`.
/// Neighbours are the four cardinal directions with absorbing edges: corner
/// cells have 2 neighbours, edge cells 3, interior cells 4.
///
/// Cells are totally ordered by their canonical rank `y * width + x`
/// (row-major). Every lock acquisition that touches more than one cell
/// follows this order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Grid {
    width: u32,
    height: u32,
}

impl Grid {
    /// Create a new grid with `width * height` cells.
    ///
    /// Returns `Err(SpaceError::EmptySpace)` if either dimension is 0, or
    /// `Err(SpaceError::CellCountOverflow)` if the cell count does not fit
    /// in `usize`.
    ///
    /// # Examples
    ///
    /// ```
    /// use burrow_core::Cell;
    /// use burrow_space::Grid;
    ///
    /// let grid = Grid::new(4, 3).unwrap();
    /// assert_eq!(grid.cell_count(), 12);
    /// assert_eq!(grid.canonical_rank(Cell::new(1, 2)), Some(9));
    ///
    /// // The origin is a corner: only right and down are legal.
    /// assert_eq!(grid.neighbours(Cell::ORIGIN).len(), 2);
    /// ```
    pub fn new(width: u32, height: u32) -> Result<Self, SpaceError> {
        if width == 0 || height == 0 {
            return Err(SpaceError::EmptySpace { width, height });
        }
        if (width as usize).checked_mul(height as usize).is_none() {
            return Err(SpaceError::CellCountOverflow { width, height });
        }
        Ok(Self { width, height })
    }

    /// Number of columns.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Number of rows.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// `(width, height)`.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Total number of cells.
    pub fn cell_count(&self) -> usize {
        (self.width as usize) * (self.height as usize)
    }

    /// Whether `cell` lies inside the grid.
    pub fn contains(&self, cell: Cell) -> bool {
        cell.x < self.width && cell.y < self.height
    }

    /// Row-major rank of `cell`, or `None` if it is out of bounds.
    pub fn canonical_rank(&self, cell: Cell) -> Option<usize> {
        if !self.contains(cell) {
            return None;
        }
        Some(cell.y as usize * self.width as usize + cell.x as usize)
    }

    /// Inverse of [`canonical_rank`](Self::canonical_rank).
    pub fn cell_at(&self, rank: usize) -> Option<Cell> {
        if rank >= self.cell_count() {
            return None;
        }
        let w = self.width as usize;
        Some(Cell::new((rank % w) as u32, (rank / w) as u32))
    }

    /// All cells in canonical (row-major) order.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (0..self.height).flat_map(move |y| (0..self.width).map(move |x| Cell::new(x, y)))
    }

    /// Legal moves out of `cell`: left, up, right, down, filtered to stay
    /// in bounds. The order is fixed so seeded choices are reproducible.
    ///
    /// An out-of-bounds `cell` has no legal moves.
    pub fn neighbours(&self, cell: Cell) -> SmallVec<[Cell; 4]> {
        if !self.contains(cell) {
            return SmallVec::new();
        }
        Direction::ALL
            .into_iter()
            .filter_map(|dir| cell.step(dir))
            .filter(|&nb| self.contains(nb))
            .collect()
    }
}
