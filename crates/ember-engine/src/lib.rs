//! Two-thread tick engine: master loop, physics slave, and the shared
//! interface through which callers steer a running simulation.
//!
//! # Architecture
//!
//! ```text
//! Caller Thread(s)            Master Thread              Slave Thread
//!     |                           |                          |
//!     |--submit_patch()---------->| drain patches            |
//!     |   [bounded channel]       | fold into state          |
//!     |--push_query()------------>| drain queries            |
//!     |   [locked queue]          | advance? ---------------.|
//!     |                           | handoff.submit(task) --->| exchange.apply()
//!     |                           | handoff.wait_processed()<| handoff.complete()
//!     |<--state()/map()-----------| publish snapshot         |
//!     |   [Arc swap]              | sleep(budget - elapsed)  |
//! ```
//!
//! The master owns the working map between handoffs; during a tick the
//! map travels to the slave through a mutex/condvar rendezvous, which
//! guarantees exclusive access by moving ownership rather than sharing.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
mod handoff;
pub mod interface;
mod master;
pub mod metrics;
pub mod simulation;
mod slave;

pub use config::{CellSeeder, ConfigError, SimulationConfig};
pub use interface::{SimulationInterface, SubmitError};
pub use metrics::TickMetrics;
pub use simulation::Simulation;
