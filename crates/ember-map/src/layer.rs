//! Row-major per-cell grids.

use ember_core::{Coordinates, Dimension};

/// One rectangular grid of per-cell values.
///
/// Backed by a flat `Vec` in canonical row-major order (`y * width + x`).
/// Accessors take already-validated coordinates: bounds checking belongs
/// to the external boundary, and an out-of-range address here is a fatal
/// contract violation, not a recoverable error.
#[derive(Clone, Debug)]
pub struct Layer<T> {
    dimension: Dimension,
    cells: Vec<T>,
}

impl<T: Default> Layer<T> {
    /// Grid with every cell default-initialized.
    pub fn new(dimension: Dimension) -> Self {
        let mut cells = Vec::new();
        cells.resize_with(dimension.cell_count(), T::default);
        Self { dimension, cells }
    }
}

impl<T> Layer<T> {
    /// Build each cell from its coordinates, in canonical order.
    pub fn from_fn(dimension: Dimension, mut f: impl FnMut(Coordinates) -> T) -> Self {
        let cells = (0..dimension.cell_count())
            .map(|index| f(dimension.coord_of(index)))
            .collect();
        Self { dimension, cells }
    }

    /// Grid size.
    pub fn dimension(&self) -> Dimension {
        self.dimension
    }

    /// Number of cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// True when the grid has no cells.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Shared access to one cell.
    ///
    /// # Panics
    ///
    /// Panics when `coord` lies outside the grid. An unchecked index
    /// would silently alias another row (`index_of` wraps), so this is
    /// asserted even in release builds.
    pub fn get(&self, coord: Coordinates) -> &T {
        assert!(
            self.dimension.contains(coord),
            "coordinates {coord} outside {} grid",
            self.dimension
        );
        &self.cells[self.dimension.index_of(coord)]
    }

    /// Exclusive access to one cell.
    ///
    /// # Panics
    ///
    /// Panics when `coord` lies outside the grid.
    pub fn get_mut(&mut self, coord: Coordinates) -> &mut T {
        assert!(
            self.dimension.contains(coord),
            "coordinates {coord} outside {} grid",
            self.dimension
        );
        &mut self.cells[self.dimension.index_of(coord)]
    }

    /// Iterate cells in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.cells.iter()
    }

    /// Iterate cells mutably in canonical order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.cells.iter_mut()
    }

    /// Iterate `(coordinates, cell)` pairs in canonical order.
    pub fn enumerate(&self) -> impl Iterator<Item = (Coordinates, &T)> {
        self.cells
            .iter()
            .enumerate()
            .map(|(index, cell)| (self.dimension.coord_of(index), cell))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
