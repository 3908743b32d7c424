//! The simulation map: layered per-cell state with snapshot stamps.

use crate::layer::Layer;
use crate::subject::{Subject, SubjectMutation, SubjectQuery};
use ember_air::AirContainer;
use ember_core::{Coordinates, Dimension};

/// The per-cell layers of the world.
///
/// Fields are public for read access (walking a whole layer is common in
/// readers and tests); mutation goes through [`SimulationMap`] so the
/// revision stamp stays honest.
#[derive(Clone, Debug)]
pub struct MapLayers {
    /// Thermal layer: one air container per cell.
    pub air: Layer<AirContainer>,
    /// Subject layer: at most one subject per cell.
    pub subjects: Layer<Option<Subject>>,
}

/// Full world state at one tick boundary.
///
/// Construction allocates a fully-populated grid: every cell an empty
/// air container, no subject. Seeding substances into cells is an
/// initialization concern of whoever builds the map.
///
/// A map published to readers is immutable from then on; two instances
/// exist transiently while the worker computes the next one. The stamps
/// identify a snapshot: `tick` is the boundary it belongs to, `revision`
/// counts the queued mutations it has absorbed over its lifetime.
#[derive(Clone, Debug)]
pub struct SimulationMap {
    layers: MapLayers,
    dimension: Dimension,
    tick: u64,
    revision: u64,
}

impl SimulationMap {
    /// Fully-populated empty map of the given size.
    pub fn new(dimension: Dimension) -> Self {
        Self {
            layers: MapLayers {
                air: Layer::new(dimension),
                subjects: Layer::new(dimension),
            },
            dimension,
            tick: 0,
            revision: 0,
        }
    }

    /// Grid size, fixed for this map's lifetime.
    pub fn dimension(&self) -> Dimension {
        self.dimension
    }

    /// Tick boundary this map belongs to.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Number of queued mutations absorbed so far.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Read access to both layers.
    pub fn layers(&self) -> &MapLayers {
        &self.layers
    }

    /// The air container at `coord`.
    ///
    /// # Panics
    ///
    /// Panics when `coord` is out of range; callers validate upstream.
    pub fn air(&self, coord: Coordinates) -> &AirContainer {
        self.layers.air.get(coord)
    }

    /// Exclusive access to the air container at `coord`, for seeding and
    /// the physics pass.
    ///
    /// # Panics
    ///
    /// Panics when `coord` is out of range.
    pub fn air_mut(&mut self, coord: Coordinates) -> &mut AirContainer {
        self.layers.air.get_mut(coord)
    }

    /// The subject at `coord`, if one is placed.
    ///
    /// # Panics
    ///
    /// Panics when `coord` is out of range.
    pub fn subject(&self, coord: Coordinates) -> Option<&Subject> {
        self.layers.subjects.get(coord).as_ref()
    }

    /// Apply one queued mutation, fully, before the next is examined.
    ///
    /// The single entry point of the mutation pipeline: the engine
    /// drains the interface queue in FIFO order and feeds each query
    /// through here. Bumps the revision stamp.
    ///
    /// # Panics
    ///
    /// Panics when the query addresses a cell outside the grid; the
    /// boundary validated coordinates at enqueue time, so that is a
    /// contract violation.
    pub fn apply(&mut self, query: SubjectQuery) {
        let cell = self.layers.subjects.get_mut(query.coordinates);
        match query.mutation {
            SubjectMutation::Place(subject) => *cell = Some(subject),
            SubjectMutation::Clear => *cell = None,
        }
        self.revision += 1;
    }

    /// Stamp the tick boundary this map now represents.
    ///
    /// The worker stamps the map it hands back; a freshly built map is
    /// stamped by whoever creates it mid-run.
    pub fn set_tick(&mut self, tick: u64) {
        self.tick = tick;
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
