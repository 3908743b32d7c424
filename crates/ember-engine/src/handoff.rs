//! Master/slave tick rendezvous.
//!
//! One mutex, one condvar, two flags. The working map travels inside
//! [`TickTask`], so whichever thread holds the task has exclusive
//! access by construction; the flags only say whose turn it is.
//!
//! Protocol: master sets `run_ready` and parks in
//! [`Handoff::wait_processed`]; the slave consumes the task (clearing
//! `run_ready`), runs physics, and answers with `run_processed`. Each
//! side clears the flag it waited on, so a stale wake from an earlier
//! round cannot be mistaken for a new one.

use std::sync::{Condvar, Mutex};

use ember_map::SimulationMap;

/// The unit of work exchanged at each rendezvous: the working map plus
/// the tick number it is being advanced to.
#[derive(Debug)]
pub(crate) struct TickTask {
    /// Working map, owned by exactly one side at a time.
    pub map: SimulationMap,
    /// Tick number the physics pass produces.
    pub tick: u64,
}

/// What the slave finds when it wakes.
#[derive(Debug)]
pub(crate) enum SlaveWake {
    /// A tick to process.
    Task(TickTask),
    /// Shut down the slave loop.
    Exit,
}

#[derive(Debug, Default)]
struct HandoffState {
    run_ready: bool,
    run_processed: bool,
    run_exit: bool,
    task: Option<TickTask>,
}

/// Shared rendezvous point between the master and slave threads.
#[derive(Debug, Default)]
pub(crate) struct Handoff {
    state: Mutex<HandoffState>,
    signal: Condvar,
}

impl Handoff {
    pub fn new() -> Self {
        Self::default()
    }

    /// Master: hand the working map to the slave for one tick.
    pub fn submit(&self, task: TickTask) {
        let mut state = self.state.lock().unwrap();
        state.task = Some(task);
        state.run_ready = true;
        self.signal.notify_one();
    }

    /// Slave: block until a task arrives or exit is requested.
    ///
    /// Exit wins when both are pending, so a shutdown never stalls
    /// behind queued work.
    pub fn wait_ready(&self) -> SlaveWake {
        let mut state = self
            .signal
            .wait_while(self.state.lock().unwrap(), |s| {
                !s.run_ready && !s.run_exit
            })
            .unwrap();
        if state.run_exit {
            return SlaveWake::Exit;
        }
        state.run_ready = false;
        let task = state.task.take().expect("ready handoff carries a task");
        SlaveWake::Task(task)
    }

    /// Slave: return the processed map to the master.
    pub fn complete(&self, task: TickTask) {
        let mut state = self.state.lock().unwrap();
        state.task = Some(task);
        state.run_processed = true;
        self.signal.notify_one();
    }

    /// Master: block until the slave finishes the submitted tick.
    pub fn wait_processed(&self) -> TickTask {
        let mut state = self
            .signal
            .wait_while(self.state.lock().unwrap(), |s| !s.run_processed)
            .unwrap();
        state.run_processed = false;
        state.task.take().expect("processed handoff carries a task")
    }

    /// Master: wake the slave for shutdown.
    pub fn request_exit(&self) {
        let mut state = self.state.lock().unwrap();
        state.run_exit = true;
        self.signal.notify_all();
    }
}
