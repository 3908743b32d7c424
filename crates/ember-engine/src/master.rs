//! Master loop: drains inputs, gates tick advancement, rendezvous with
//! the slave, publishes snapshots, and paces to the configured rate.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use ember_core::{Dimension, SimulationState, SimulationStatus};
use ember_map::SimulationMap;

use crate::config::{CellSeeder, SimulationConfig};
use crate::handoff::{Handoff, TickTask};
use crate::interface::SimulationInterface;
use crate::metrics::TickMetrics;

/// State owned by the master thread.
///
/// The master holds the working map between handoffs and is the only
/// writer of the published state. The slave handle is joined on exit,
/// so the pair always dies together.
pub(crate) struct MasterLoop {
    interface: Arc<SimulationInterface>,
    handoff: Arc<Handoff>,
    shutdown: Arc<AtomicBool>,
    state: SimulationState,
    dimension: Dimension,
    seeder: Option<CellSeeder>,
    slave: Option<JoinHandle<()>>,
}

impl MasterLoop {
    pub fn new(
        interface: Arc<SimulationInterface>,
        handoff: Arc<Handoff>,
        shutdown: Arc<AtomicBool>,
        config: SimulationConfig,
        slave: JoinHandle<()>,
    ) -> Self {
        Self {
            interface,
            handoff,
            shutdown,
            state: config.initial_state,
            dimension: config.initial_dimension,
            seeder: config.seeder,
            slave: Some(slave),
        }
    }

    /// Main loop. Runs until the shutdown flag is set.
    ///
    /// Per iteration: shutdown check, resize, patch fold, query drain,
    /// advance gate with slave rendezvous, finite-run stop, publish,
    /// pace. State is published every iteration; the map only when it
    /// changed (created, queries absorbed, or ticked).
    pub fn run(mut self) {
        let mut working = create_map(self.dimension, self.seeder.as_ref());
        working.set_tick(self.state.current_tick);
        let mut map_changed = true;
        let mut iteration: u64 = 0;

        loop {
            let clock_start = Instant::now();

            if self.shutdown.load(Ordering::Acquire) {
                break;
            }

            iteration += 1;
            let mut metrics = TickMetrics {
                iteration,
                ..Default::default()
            };

            // 1. Resize replaces the working map wholesale; old cell
            //    contents are discarded. The fresh map carries the
            //    current tick, keeping the published tick monotone.
            if let Some(dimension) = self.interface.master_take_dimension() {
                self.dimension = dimension;
                working = create_map(dimension, self.seeder.as_ref());
                working.set_tick(self.state.current_tick);
                map_changed = true;
            }

            // 2. Fold queued patches into the state, later-wins.
            let (patch, patch_count) = self.interface.master_drain_patches();
            patch.apply_to(&mut self.state);
            metrics.patch_count = patch_count;

            // 3. Absorb subject queries under one lock so pushes that
            //    race the drain land in the next iteration whole. A
            //    query stranded out of range by a resize is dropped
            //    with the cells it addressed.
            let query_clock = Instant::now();
            let mut applied = 0usize;
            {
                let mut queries = self.interface.master_access_queries();
                metrics.query_count = queries.len();
                for query in queries.drain(..) {
                    if working.dimension().contains(query.coordinates) {
                        working.apply(query);
                        applied += 1;
                    }
                }
            }
            metrics.queries_us = elapsed_us(query_clock);
            if applied > 0 {
                map_changed = true;
            }

            // 4. Advance gate: hand the map to the slave for one tick.
            if self.state.may_advance() {
                self.state.current_tick += 1;
                let physics_clock = Instant::now();
                self.handoff.submit(TickTask {
                    map: working,
                    tick: self.state.current_tick,
                });
                let done = self.handoff.wait_processed();
                working = done.map;
                metrics.physics_us = elapsed_us(physics_clock);
                metrics.ticked = true;
                map_changed = true;
            }

            // 5. A finite run that has consumed its budget stops itself.
            if self.state.status == SimulationStatus::Running && self.state.at_final_tick() {
                self.state.status = SimulationStatus::Stopped;
            }

            // 6. Publish.
            self.interface.master_set_state(self.state);
            if map_changed {
                let publish_clock = Instant::now();
                self.interface.master_publish_map(Arc::new(working.clone()));
                metrics.publish_us = elapsed_us(publish_clock);
                map_changed = false;
            }

            // 7. Pace to the configured frequency. park_timeout instead
            //    of sleep: exit() unparks, so shutdown never waits out a
            //    slow tick rate.
            let budget = Duration::from_secs_f64(1.0 / self.state.task_frequency);
            let elapsed = clock_start.elapsed();
            metrics.total_us = elapsed_us(clock_start);
            if let Some(remaining) = budget.checked_sub(elapsed) {
                self.interface.master_set_metrics(metrics);
                thread::park_timeout(remaining);
            } else {
                metrics.overrun_us = (elapsed - budget).as_micros() as u64;
                self.interface.master_set_metrics(metrics);
            }
        }

        // Exit path: stop the slave first, then publish the final
        // picture so late readers see a stopped engine and its last
        // map. Drop closes the interface once `self` leaves scope.
        self.shutdown_slave();
        self.state.status = SimulationStatus::Stopped;
        self.interface.master_set_state(self.state);
        if map_changed {
            self.interface.master_publish_map(Arc::new(working.clone()));
        }
    }

    fn shutdown_slave(&mut self) {
        self.handoff.request_exit();
        if let Some(handle) = self.slave.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for MasterLoop {
    fn drop(&mut self) {
        self.shutdown_slave();
        // Runs on unwind as well, so the interface reads closed even
        // after a master panic.
        self.interface.master_close();
    }
}

/// Build a working map, filling every cell through the seeder when one
/// is configured.
fn create_map(dimension: Dimension, seeder: Option<&CellSeeder>) -> SimulationMap {
    let mut map = SimulationMap::new(dimension);
    if let Some(seed) = seeder {
        for index in 0..dimension.cell_count() {
            let coord = dimension.coord_of(index);
            *map.air_mut(coord) = seed(coord);
        }
    }
    map
}

fn elapsed_us(since: Instant) -> u64 {
    since.elapsed().as_micros() as u64
}
