//! Core types for the Ember thermal grid simulation.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the vocabulary shared by every other Ember crate: grid geometry,
//! the temperature unit, and the simulation run-state with its sparse
//! patch type.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod geometry;
pub mod state;
pub mod units;

pub use geometry::{Coordinates, Dimension};
pub use state::{
    SimulationState, SimulationStatePatch, SimulationStatus, SimulationType, StateError,
};
pub use units::Temperature;
