//! One exclusive lock per grid cell, acquired in canonical order.
//!
//! The table is built once from a [`Grid`] and never resized, so lock
//! identities are stable for the lifetime of the world. The locks guard no
//! data of their own: they serialise the check-and-commit of any move that
//! enters or leaves the cell.

use std::sync::{Mutex, MutexGuard, PoisonError};

use burrow_core::Cell;

use crate::grid::Grid;

/// Fixed table of per-cell locks, indexed by canonical rank.
#[derive(Debug)]
pub struct LockTable {
    grid: Grid,
    locks: Box<[Mutex<()>]>,
}

// Compile-time assertion: LockTable must be Send + Sync.
const _: fn() = || {
    fn assert<T: Send + Sync>() {}
    assert::<LockTable>();
};

/// RAII guard holding the locks of two distinct cells.
///
/// Both locks are released when the guard is dropped, on every exit path.
#[must_use = "the cell locks are released as soon as the guard is dropped"]
#[derive(Debug)]
pub struct CellPairGuard<'a> {
    _lower: MutexGuard<'a, ()>,
    _upper: MutexGuard<'a, ()>,
}

impl LockTable {
    /// Create one lock per cell of `grid`.
    pub fn new(grid: Grid) -> Self {
        let locks = (0..grid.cell_count()).map(|_| Mutex::new(())).collect();
        Self { grid, locks }
    }

    /// Number of locks. Always equal to the grid's cell count.
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    /// Always returns `false`: grids have at least one cell.
    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }

    /// The lock guarding `cell`, or `None` if it is out of bounds. O(1).
    pub fn lock_for(&self, cell: Cell) -> Option<&Mutex<()>> {
        self.grid.canonical_rank(cell).map(|rank| &self.locks[rank])
    }

    /// Block until the locks at ranks `a` and `b` are both held.
    ///
    /// The lower rank is always acquired first. Because every multi-lock
    /// acquisition in the process follows the same order, no cycle of
    /// waiters can form.
    ///
    /// # Panics
    ///
    /// Panics if `a == b` (a move never stays in place, so equal ranks mean
    /// candidate generation is broken) or if either rank is out of range.
    pub fn lock_pair(&self, a: usize, b: usize) -> CellPairGuard<'_> {
        assert_ne!(
            a, b,
            "lock ordering violated: both cells of a move have canonical rank {a}"
        );
        let (lo, hi) = if a < b { (a, b) } else { (b, a) };
        let lower = acquire(&self.locks[lo]);
        let upper = acquire(&self.locks[hi]);
        CellPairGuard {
            _lower: lower,
            _upper: upper,
        }
    }

    /// Block until every cell lock is held, acquired in ascending rank.
    ///
    /// While the returned guards are alive no move can commit, so positions
    /// read under them form a consistent cut.
    pub fn lock_all(&self) -> Vec<MutexGuard<'_, ()>> {
        self.locks.iter().map(acquire).collect()
    }
}

/// Acquire a cell lock. A poisoned lock still excludes: it guards no data,
/// so a mover that panicked inside its critical section left nothing
/// half-written behind it.
pub(crate) fn acquire(lock: &Mutex<()>) -> MutexGuard<'_, ()> {
    lock.lock().unwrap_or_else(PoisonError::into_inner)
}
