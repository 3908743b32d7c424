//! Shared interface between caller threads and the master loop.
//!
//! [`SimulationInterface`] is the single rendezvous object both sides
//! hold (via `Arc`). Callers feed state patches and subject queries in;
//! the master drains them once per iteration and publishes state, map
//! snapshots, and metrics back out. No caller ever touches the working
//! map: reads go through [`Arc<SimulationMap>`] snapshots swapped in by
//! the master.

use std::collections::VecDeque;
use std::error::Error;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use ember_core::{Dimension, SimulationState, SimulationStatePatch, StateError};
use ember_map::{MapError, SimulationMap, SubjectQuery};

use crate::metrics::TickMetrics;

/// Patches buffered between master iterations. The master drains the
/// channel once per loop, so the bound only matters for callers that
/// submit faster than the configured tick rate.
const PATCH_QUEUE_CAPACITY: usize = 64;

/// Subject queries buffered between master iterations. Wider than the
/// patch bound because a steering burst touches many cells at once.
const QUERY_QUEUE_CAPACITY: usize = 1024;

// ── SubmitError ──────────────────────────────────────────────────

/// Error submitting a state patch or subject query.
// No `Eq`: `Rejected` carries a `StateError`, which holds the offending
// f64 and is therefore only `PartialEq`.
#[derive(Debug, PartialEq)]
pub enum SubmitError {
    /// The patch failed validation and was not queued.
    Rejected(StateError),
    /// The submission queue is full (back-pressure).
    QueueFull,
    /// The master loop has terminated.
    Shutdown,
}

impl fmt::Display for SubmitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rejected(e) => write!(f, "patch rejected: {e}"),
            Self::QueueFull => write!(f, "submission queue full"),
            Self::Shutdown => write!(f, "master loop has terminated"),
        }
    }
}

impl Error for SubmitError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Rejected(e) => Some(e),
            _ => None,
        }
    }
}

// ── SimulationInterface ──────────────────────────────────────────

/// Thread-safe front door of a running simulation.
///
/// Create one, wrap it in an `Arc`, and pass a clone to
/// [`Simulation::run()`](crate::Simulation::run). The same `Arc` then
/// serves as the caller's handle for steering and observation.
///
/// Patches submitted before the engine starts are buffered and drained
/// in the first master iteration.
pub struct SimulationInterface {
    patch_tx: crossbeam_channel::Sender<SimulationStatePatch>,
    patch_rx: crossbeam_channel::Receiver<SimulationStatePatch>,
    queries: Mutex<VecDeque<SubjectQuery>>,
    pending_dimension: Mutex<Option<Dimension>>,
    state: Mutex<SimulationState>,
    map: Mutex<Option<Arc<SimulationMap>>>,
    metrics: Mutex<TickMetrics>,
    closed: AtomicBool,
}

// Compile-time assertion: SimulationInterface must be Send + Sync.
const _: fn() = || {
    fn assert<T: Send + Sync>() {}
    assert::<SimulationInterface>();
};

impl SimulationInterface {
    /// Fresh interface with no published state or map.
    pub fn new() -> Self {
        let (patch_tx, patch_rx) = crossbeam_channel::bounded(PATCH_QUEUE_CAPACITY);
        Self {
            patch_tx,
            patch_rx,
            queries: Mutex::new(VecDeque::new()),
            pending_dimension: Mutex::new(None),
            state: Mutex::new(SimulationState::default()),
            map: Mutex::new(None),
            metrics: Mutex::new(TickMetrics::default()),
            closed: AtomicBool::new(false),
        }
    }

    // ── Caller side ──────────────────────────────────────────────

    /// Queue a state patch for the next master iteration.
    ///
    /// The patch is validated before it is queued, so a rejected patch
    /// leaves the channel untouched. Patches queued in the same
    /// iteration window are merged later-wins by the master.
    pub fn submit_patch(&self, patch: SimulationStatePatch) -> Result<(), SubmitError> {
        patch.validate().map_err(SubmitError::Rejected)?;
        if self.closed.load(Ordering::Acquire) {
            return Err(SubmitError::Shutdown);
        }
        self.patch_tx.try_send(patch).map_err(|e| match e {
            crossbeam_channel::TrySendError::Full(_) => SubmitError::QueueFull,
            crossbeam_channel::TrySendError::Disconnected(_) => SubmitError::Shutdown,
        })
    }

    /// Queue a subject placement or removal for the next iteration.
    ///
    /// Queries are absorbed in submission order before the physics pass
    /// of the iteration that drains them. A query whose coordinates
    /// fall outside the working grid when drained (stranded by a
    /// resize) is dropped, never applied.
    pub fn push_query(&self, query: SubjectQuery) -> Result<(), SubmitError> {
        if self.closed.load(Ordering::Acquire) {
            return Err(SubmitError::Shutdown);
        }
        let mut queries = self.queries.lock().unwrap();
        if queries.len() >= QUERY_QUEUE_CAPACITY {
            return Err(SubmitError::QueueFull);
        }
        queries.push_back(query);
        Ok(())
    }

    /// Request a grid resize.
    ///
    /// The master picks this up at its next iteration boundary and
    /// replaces the working map with a freshly seeded one of the new
    /// size. Cell contents of the old map are discarded. A second call
    /// before the master looks overwrites the first.
    pub fn set_dimension(&self, dimension: Dimension) -> Result<(), MapError> {
        if dimension.is_empty() {
            return Err(MapError::EmptyDimension { dimension });
        }
        *self.pending_dimension.lock().unwrap() = Some(dimension);
        Ok(())
    }

    /// Most recently published simulation state.
    pub fn state(&self) -> SimulationState {
        *self.state.lock().unwrap()
    }

    /// Most recently published map snapshot, if any.
    ///
    /// `None` until the master publishes for the first time. The
    /// snapshot is immutable; a later publish swaps in a new `Arc`
    /// without disturbing clones already handed out.
    pub fn map(&self) -> Option<Arc<SimulationMap>> {
        self.map.lock().unwrap().clone()
    }

    /// Grid size of the published map, if any.
    pub fn dimension(&self) -> Option<Dimension> {
        self.map.lock().unwrap().as_ref().map(|m| m.dimension())
    }

    /// Timing metrics of the most recent master iteration.
    pub fn metrics(&self) -> TickMetrics {
        *self.metrics.lock().unwrap()
    }

    /// Whether the master loop has terminated.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    // ── Master side ──────────────────────────────────────────────

    /// Drain all queued patches, merged later-wins into one, plus the
    /// number of patches folded.
    ///
    /// Returns an empty patch and zero when nothing was queued.
    pub(crate) fn master_drain_patches(&self) -> (SimulationStatePatch, usize) {
        let mut merged = SimulationStatePatch::default();
        let mut count = 0;
        while let Ok(patch) = self.patch_rx.try_recv() {
            merged = merged.merge(patch);
            count += 1;
        }
        (merged, count)
    }

    /// Lock the query queue for a whole-drain pass.
    ///
    /// Holding the guard keeps callers out until the drain finishes, so
    /// queries submitted while the master works land in the next
    /// iteration instead of splitting across two.
    pub(crate) fn master_access_queries(&self) -> MutexGuard<'_, VecDeque<SubjectQuery>> {
        self.queries.lock().unwrap()
    }

    /// Take the pending resize request, if any.
    pub(crate) fn master_take_dimension(&self) -> Option<Dimension> {
        self.pending_dimension.lock().unwrap().take()
    }

    /// Publish the authoritative state.
    pub(crate) fn master_set_state(&self, state: SimulationState) {
        *self.state.lock().unwrap() = state;
    }

    /// Publish a map snapshot.
    pub(crate) fn master_publish_map(&self, map: Arc<SimulationMap>) {
        *self.map.lock().unwrap() = Some(map);
    }

    /// Publish iteration metrics.
    pub(crate) fn master_set_metrics(&self, metrics: TickMetrics) {
        *self.metrics.lock().unwrap() = metrics;
    }

    /// Mark the master loop as terminated. Subsequent patch submissions
    /// fail with [`SubmitError::Shutdown`].
    pub(crate) fn master_close(&self) {
        self.closed.store(true, Ordering::Release);
    }
}

impl Default for SimulationInterface {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SimulationInterface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimulationInterface")
            .field("state", &self.state())
            .field("has_map", &self.map.lock().unwrap().is_some())
            .field("pending_patches", &self.patch_rx.len())
            .field("pending_queries", &self.queries.lock().unwrap().len())
            .field("closed", &self.is_closed())
            .finish()
    }
}
