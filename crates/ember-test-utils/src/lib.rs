//! Test fixtures for Ember development.
//!
//! Provides [`TestGas`] — a concrete [`ember_air::AirPlain`] with a
//! linear, exactly-bookkeepable energy model — plus container and map
//! builders shared by the engine's tests, the benchmarks, and examples.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

pub use fixtures::{container_of, hot_corner_map, uniform_map, uniform_seeder, TestGas};
