//! Grid geometry and per-cell mutual exclusion for Burrow simulations.
//!
//! [`Grid`] owns the fixed dimensions of a world, the bounds check, the
//! 4-connected neighbourhood, and the canonical row-major ordering of cells.
//! [`LockTable`] holds exactly one lock per cell and acquires pairs of them
//! in canonical order, which is what makes concurrent movement deadlock-free.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod grid;
pub mod lock_table;

pub use error::SpaceError;
pub use grid::Grid;
pub use lock_table::{CellPairGuard, LockTable};
