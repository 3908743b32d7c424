//! Per-iteration timing metrics for the master loop.

/// Timing data for the most recent master iteration.
///
/// All durations are in microseconds. The master overwrites the shared
/// copy at the end of every iteration; callers read it through
/// [`SimulationInterface::metrics()`](crate::SimulationInterface::metrics).
#[derive(Clone, Copy, Debug, Default)]
pub struct TickMetrics {
    /// Master loop iterations completed since start.
    pub iteration: u64,
    /// Whether this iteration ran a physics pass.
    pub ticked: bool,
    /// Patches folded into the state this iteration.
    pub patch_count: usize,
    /// Subject queries drained from the queue this iteration,
    /// including any dropped as out of range after a resize.
    pub query_count: usize,
    /// Time spent draining and applying the query queue.
    pub queries_us: u64,
    /// Time the slave spent in the physics pass, measured around the
    /// handoff (submit to processed).
    pub physics_us: u64,
    /// Time spent cloning and publishing the map snapshot.
    pub publish_us: u64,
    /// Wall-clock time for the entire iteration.
    pub total_us: u64,
    /// Amount the iteration exceeded its pacing budget. Zero when the
    /// iteration finished inside the budget.
    pub overrun_us: u64,
}
