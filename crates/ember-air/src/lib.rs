//! Air mixture thermal model for the Ember simulation.
//!
//! This crate defines the [`AirPlain`] trait — the capability contract
//! every air substance satisfies — and [`AirContainer`], the per-cell
//! mixture that keeps its plains in thermal equilibrium.
//!
//! Concrete substances live outside this crate. The engine only ever
//! sees `Box<dyn AirPlain>` values and relies on the contract: positive
//! weight and heat capacity, a tag for merge matching, deep cloning, and
//! an energy-delta temperature update.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod container;
pub mod plain;

pub use container::AirContainer;
pub use plain::{AirPlain, AirTag};
