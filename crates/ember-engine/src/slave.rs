//! Physics slave: runs one heat-exchange pass per handoff.

use std::sync::Arc;

use ember_map::HeatExchange;

use crate::handoff::{Handoff, SlaveWake};

/// Loop state for the slave thread.
///
/// The slave never touches the interface: everything it needs arrives
/// inside the tick task, and the processed map goes back the same way.
pub(crate) struct SimulationSlave {
    handoff: Arc<Handoff>,
    exchange: HeatExchange,
}

impl SimulationSlave {
    pub fn new(handoff: Arc<Handoff>, exchange: HeatExchange) -> Self {
        Self { handoff, exchange }
    }

    /// Process ticks until exit is requested.
    ///
    /// A task consumed before the exit request is always completed, so
    /// the master can rely on every submitted tick coming back.
    pub fn run(self) {
        loop {
            match self.handoff.wait_ready() {
                SlaveWake::Task(mut task) => {
                    self.exchange.apply(&mut task.map);
                    task.map.set_tick(task.tick);
                    self.handoff.complete(task);
                }
                SlaveWake::Exit => break,
            }
        }
    }
}
