//! Error types for grid construction.

use std::fmt;

/// Errors arising from grid construction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SpaceError {
    /// Attempted to construct a grid with a zero dimension.
    EmptySpace {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
    },
    /// `width * height` does not fit in `usize`.
    CellCountOverflow {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
    },
}

impl fmt::Display for SpaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptySpace { width, height } => {
                write!(f, "grid must have positive dimensions, got {width}x{height}")
            }
            Self::CellCountOverflow { width, height } => {
                write!(f, "grid {width}x{height} has more cells than fit in usize")
            }
        }
    }
}

impl std::error::Error for SpaceError {}
