//! Layered grid storage and the per-tick heat exchange pass.
//!
//! [`SimulationMap`] owns the world's per-cell state in two layers: air
//! containers (the thermal layer) and optional subjects. External edits
//! arrive as [`SubjectQuery`] values through a FIFO queue drained by the
//! engine; [`SimulationMap::apply`] is the single entry point of that
//! mutation pipeline. [`HeatExchange`] is the physics pass the worker
//! thread runs once per tick.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod layer;
pub mod map;
pub mod subject;
pub mod thermal;

pub use error::MapError;
pub use layer::Layer;
pub use map::{MapLayers, SimulationMap};
pub use subject::{Subject, SubjectId, SubjectMutation, SubjectQuery};
pub use thermal::{neighbours4, HeatExchange};
