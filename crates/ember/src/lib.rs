//! Ember: a tick-based thermal grid simulation with a steerable two-thread engine.
//!
//! This is the top-level facade crate that re-exports the public API from all
//! Ember sub-crates. For most users, adding `ember` as a single dependency is
//! sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use std::sync::Arc;
//! use ember::prelude::*;
//!
//! // A 4x4 grid run for exactly three ticks. Cells start as vacuum
//! // here; real worlds seed them with substances implementing the
//! // AirPlain contract from ember::air.
//! let interface = Arc::new(SimulationInterface::new());
//! let mut config = SimulationConfig::new(Dimension::new(4, 4));
//! config.initial_state.sim_type = SimulationType::Finite;
//! config.initial_state.status = SimulationStatus::Running;
//! config.initial_state.last_tick = 3;
//! config.initial_state.task_frequency = 1000.0;
//!
//! let mut sim = Simulation::run(config, Arc::clone(&interface)).unwrap();
//! while !(interface.state().status == SimulationStatus::Stopped
//!     && interface.state().current_tick == 3)
//! {
//!     std::thread::sleep(std::time::Duration::from_millis(1));
//! }
//! sim.exit();
//! assert_eq!(interface.map().unwrap().tick(), 3);
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in the prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `ember-core` | Geometry, temperature, run state and patches |
//! | [`air`] | `ember-air` | The `AirPlain` contract and per-cell mixtures |
//! | [`map`] | `ember-map` | Layered grid storage, subject queries, heat exchange |
//! | [`engine`] | `ember-engine` | The master/slave thread pair and caller interface |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types: geometry, temperature, run state (`ember-core`).
///
/// Contains [`types::Coordinates`], [`types::Dimension`],
/// [`types::Temperature`], and the [`types::SimulationState`] /
/// [`types::SimulationStatePatch`] pair the engine is steered with.
pub use ember_core as types;

/// Air substances and per-cell mixtures (`ember-air`).
///
/// The [`air::AirPlain`] trait is the extension point for user-defined
/// substances; [`air::AirContainer`] keeps a cell's mixture in thermal
/// equilibrium.
pub use ember_air as air;

/// Layered grid storage and the heat exchange pass (`ember-map`).
///
/// [`map::SimulationMap`] owns per-cell air and subject layers;
/// [`map::HeatExchange`] is the physics pass run once per tick.
pub use ember_map as map;

/// The simulation engine (`ember-engine`).
///
/// [`engine::Simulation`] owns the master/slave thread pair;
/// [`engine::SimulationInterface`] is the caller's steering and
/// observation handle.
pub use ember_engine as engine;

/// Common imports for typical Ember usage.
///
/// ```rust
/// use ember::prelude::*;
/// ```
///
/// This imports the most frequently used types: the engine handle and
/// interface, configuration, core state vocabulary, substances, and the
/// map types snapshots expose.
pub mod prelude {
    // Core vocabulary
    pub use ember_core::{
        Coordinates, Dimension, SimulationState, SimulationStatePatch, SimulationStatus,
        SimulationType, Temperature,
    };

    // Errors
    pub use ember_core::StateError;
    pub use ember_engine::{ConfigError, SubmitError};
    pub use ember_map::MapError;

    // Air
    pub use ember_air::{AirContainer, AirPlain, AirTag};

    // Map
    pub use ember_map::{HeatExchange, SimulationMap, Subject, SubjectId, SubjectQuery};

    // Engine
    pub use ember_engine::{
        CellSeeder, Simulation, SimulationConfig, SimulationInterface, TickMetrics,
    };
}
