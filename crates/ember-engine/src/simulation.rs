//! Public lifecycle handle: spawn the thread pair, wait, exit.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use ember_map::HeatExchange;

use crate::config::{ConfigError, SimulationConfig};
use crate::handoff::Handoff;
use crate::interface::SimulationInterface;
use crate::master::MasterLoop;
use crate::slave::SimulationSlave;

/// Owning handle of a running master/slave thread pair.
///
/// The handle requests cancellation and joins; all steering and
/// observation goes through the [`SimulationInterface`] the caller
/// passed to [`run()`](Self::run). Dropping the handle shuts the
/// engine down.
///
/// A finite run that reaches its final tick publishes `Stopped` but
/// keeps both threads alive, idle, ready to be resumed by a patch.
/// Only [`exit()`](Self::exit) (or drop) terminates them.
///
/// ```
/// use std::sync::Arc;
/// use ember_core::Dimension;
/// use ember_engine::{Simulation, SimulationConfig, SimulationInterface};
///
/// let interface = Arc::new(SimulationInterface::new());
/// let config = SimulationConfig::new(Dimension::new(3, 3));
/// let mut sim = Simulation::run(config, Arc::clone(&interface)).unwrap();
/// sim.exit();
/// assert!(interface.map().is_some());
/// ```
#[derive(Debug)]
pub struct Simulation {
    master: Option<JoinHandle<()>>,
    shutdown: Arc<AtomicBool>,
}

impl Simulation {
    /// Validate `config`, spawn the slave and master threads, and
    /// return the handle.
    ///
    /// The master publishes the initial state and a freshly created
    /// (optionally seeded) map within its first iteration; callers
    /// observing through `interface` may briefly see the pre-run
    /// defaults.
    pub fn run(
        config: SimulationConfig,
        interface: Arc<SimulationInterface>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let handoff = Arc::new(Handoff::new());
        let shutdown = Arc::new(AtomicBool::new(false));

        let slave = SimulationSlave::new(
            Arc::clone(&handoff),
            HeatExchange::new(config.dt, config.coupling),
        );
        let slave_handle = thread::Builder::new()
            .name("ember-slave".into())
            .spawn(move || slave.run())
            .map_err(|e| ConfigError::ThreadSpawnFailed {
                reason: format!("slave thread: {e}"),
            })?;

        let master = MasterLoop::new(interface, handoff, Arc::clone(&shutdown), config, slave_handle);
        // On spawn failure the closure is dropped, and dropping the
        // loop state exits and joins the slave, then closes the
        // interface.
        let master_handle = thread::Builder::new()
            .name("ember-master".into())
            .spawn(move || master.run())
            .map_err(|e| ConfigError::ThreadSpawnFailed {
                reason: format!("master thread: {e}"),
            })?;

        Ok(Self {
            master: Some(master_handle),
            shutdown,
        })
    }

    /// Block until the master thread terminates.
    ///
    /// In normal operation the master terminates only after a
    /// cancellation request, so on a handle that has not seen
    /// [`exit()`](Self::exit) this blocks until another thread drops or
    /// exits the simulation. A master that died unwinding is joined the
    /// same way; its death is visible through
    /// [`SimulationInterface::is_closed()`]. Idempotent.
    pub fn wait(&mut self) {
        if let Some(handle) = self.master.take() {
            let _ = handle.join();
        }
    }

    /// Request cooperative cancellation and block until both threads
    /// have fully unwound.
    ///
    /// Cancellation is observed at the master's next iteration
    /// boundary; an in-flight tick always completes first. The unpark
    /// cuts short any pacing sleep, so exit latency is bounded by one
    /// iteration's work, not by the tick rate. Idempotent.
    pub fn exit(&mut self) {
        self.shutdown.store(true, Ordering::Release);
        if let Some(handle) = &self.master {
            handle.thread().unpark();
        }
        self.wait();
    }
}

impl Drop for Simulation {
    fn drop(&mut self) {
        self.exit();
    }
}
