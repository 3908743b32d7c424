//! Grid geometry: cell coordinates and map dimensions.

use std::fmt;

/// Address of one cell on the simulation grid.
///
/// Valid for a map of [`Dimension`] `d` iff `x < d.width && y < d.height`.
/// The external boundary validates coordinates before they enter the
/// engine; nothing inside the mutation pipeline re-checks them.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coordinates {
    /// Column, zero-based.
    pub x: u32,
    /// Row, zero-based.
    pub y: u32,
}

impl Coordinates {
    /// Build a coordinate pair.
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Width and height of the simulation grid, in cells.
///
/// The canonical cell ordering is row-major: index `y * width + x`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Dimension {
    /// Number of columns.
    pub width: u32,
    /// Number of rows.
    pub height: u32,
}

impl Dimension {
    /// Build a dimension.
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Total number of cells.
    pub const fn cell_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// True when the grid has no cells.
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// True when `coord` addresses a cell inside this grid.
    pub const fn contains(&self, coord: Coordinates) -> bool {
        coord.x < self.width && coord.y < self.height
    }

    /// Row-major cell index for `coord`.
    ///
    /// Only meaningful when `self.contains(coord)` holds; callers uphold
    /// that precondition.
    pub const fn index_of(&self, coord: Coordinates) -> usize {
        coord.y as usize * self.width as usize + coord.x as usize
    }

    /// Coordinates for a row-major cell index.
    ///
    /// Inverse of [`index_of`](Self::index_of) for in-range indices.
    pub const fn coord_of(&self, index: usize) -> Coordinates {
        Coordinates {
            x: (index % self.width as usize) as u32,
            y: (index / self.width as usize) as u32,
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
