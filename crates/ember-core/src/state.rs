//! Simulation run-state: status flags, tick bookkeeping, sparse patches.
//!
//! [`SimulationState`] is owned by the master thread. External writers
//! never mutate it directly; they submit [`SimulationStatePatch`] values
//! through the interface and the master folds them in at the top of each
//! iteration, field by field, before deciding whether to advance.

use std::error::Error;
use std::fmt;

/// Default target iteration rate when no patch has set one.
pub const DEFAULT_TASK_FREQUENCY: f64 = 60.0;

/// Whether the simulation is advancing ticks.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SimulationStatus {
    /// Ticks advance whenever the tick bound allows.
    Running,
    /// The loop idles; state and snapshots remain observable.
    #[default]
    Stopped,
}

impl fmt::Display for SimulationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Running => write!(f, "running"),
            Self::Stopped => write!(f, "stopped"),
        }
    }
}

/// Whether the run has a final tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SimulationType {
    /// Stop automatically once `current_tick` reaches `last_tick`.
    Finite,
    /// Run until stopped externally.
    #[default]
    Infinite,
}

impl fmt::Display for SimulationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Finite => write!(f, "finite"),
            Self::Infinite => write!(f, "infinite"),
        }
    }
}

/// Authoritative run-state of the simulation.
///
/// Published to the interface every master iteration, advancing or not,
/// so external readers always see the latest tick count and status.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimulationState {
    /// Finite or infinite run.
    pub sim_type: SimulationType,
    /// Running or stopped.
    pub status: SimulationStatus,
    /// Ticks completed so far.
    pub current_tick: u64,
    /// Final tick for finite runs; ignored for infinite runs.
    pub last_tick: u64,
    /// Target iteration rate in ticks per second. Finite and positive;
    /// validated at the interface boundary, trusted everywhere else.
    pub task_frequency: f64,
}

impl Default for SimulationState {
    fn default() -> Self {
        Self {
            sim_type: SimulationType::Infinite,
            status: SimulationStatus::Stopped,
            current_tick: 0,
            last_tick: 0,
            task_frequency: DEFAULT_TASK_FREQUENCY,
        }
    }
}

impl SimulationState {
    /// The advance gate: true when the next iteration should tick.
    ///
    /// Running is required; finite runs additionally require
    /// `current_tick < last_tick`.
    pub fn may_advance(&self) -> bool {
        self.status == SimulationStatus::Running
            && (self.sim_type == SimulationType::Infinite || self.current_tick < self.last_tick)
    }

    /// True when a finite run has consumed its tick budget.
    ///
    /// Uses `>=` so a patch that jumps `current_tick` past `last_tick`
    /// reads as completed rather than leaving the machine running with a
    /// gate that can never open.
    pub fn at_final_tick(&self) -> bool {
        self.sim_type == SimulationType::Finite && self.current_tick >= self.last_tick
    }
}

/// Sparse overwrite of [`SimulationState`].
///
/// Every field is optional; [`apply_to`](Self::apply_to) overwrites
/// exactly the fields that are present and leaves the rest untouched.
///
/// # Examples
///
/// ```
/// use ember_core::state::{SimulationStatePatch, SimulationStatus, SimulationType};
///
/// // Arm a finite three-tick run without touching the frequency.
/// let patch = SimulationStatePatch {
///     sim_type: Some(SimulationType::Finite),
///     status: Some(SimulationStatus::Running),
///     last_tick: Some(3),
///     ..Default::default()
/// };
///
/// let mut state = ember_core::SimulationState::default();
/// patch.apply_to(&mut state);
/// assert_eq!(state.status, SimulationStatus::Running);
/// assert_eq!(state.last_tick, 3);
/// assert_eq!(state.task_frequency, ember_core::state::DEFAULT_TASK_FREQUENCY);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SimulationStatePatch {
    /// New run type, if any.
    pub sim_type: Option<SimulationType>,
    /// New status, if any.
    pub status: Option<SimulationStatus>,
    /// New tick counter, if any.
    pub current_tick: Option<u64>,
    /// New final tick, if any.
    pub last_tick: Option<u64>,
    /// New target rate, if any. Must be finite and positive.
    pub task_frequency: Option<f64>,
}

impl SimulationStatePatch {
    /// True when no field is set.
    pub fn is_empty(&self) -> bool {
        self.sim_type.is_none()
            && self.status.is_none()
            && self.current_tick.is_none()
            && self.last_tick.is_none()
            && self.task_frequency.is_none()
    }

    /// Overwrite the fields of `state` that this patch carries.
    pub fn apply_to(&self, state: &mut SimulationState) {
        if let Some(v) = self.sim_type {
            state.sim_type = v;
        }
        if let Some(v) = self.status {
            state.status = v;
        }
        if let Some(v) = self.current_tick {
            state.current_tick = v;
        }
        if let Some(v) = self.last_tick {
            state.last_tick = v;
        }
        if let Some(v) = self.task_frequency {
            state.task_frequency = v;
        }
    }

    /// Fold `later` over `self`; fields present in `later` win.
    ///
    /// Folding a drained batch left-to-right is equivalent to applying
    /// the patches one by one.
    pub fn merge(self, later: Self) -> Self {
        Self {
            sim_type: later.sim_type.or(self.sim_type),
            status: later.status.or(self.status),
            current_tick: later.current_tick.or(self.current_tick),
            last_tick: later.last_tick.or(self.last_tick),
            task_frequency: later.task_frequency.or(self.task_frequency),
        }
    }

    /// Boundary validation: reject values the engine would trust blindly.
    ///
    /// The reciprocal check catches subnormal frequencies whose pacing
    /// budget `1.0 / hz` overflows to infinity and would panic inside
    /// `Duration::from_secs_f64`.
    pub fn validate(&self) -> Result<(), StateError> {
        if let Some(value) = self.task_frequency {
            if !value.is_finite() || value <= 0.0 || !(1.0 / value).is_finite() {
                return Err(StateError::InvalidFrequency { value });
            }
        }
        Ok(())
    }
}

/// Rejection reasons for state patches at the interface boundary.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum StateError {
    /// `task_frequency` must be finite and positive.
    InvalidFrequency {
        /// The offending value.
        value: f64,
    },
}

impl fmt::Display for StateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidFrequency { value } => {
                write!(f, "task_frequency must be finite and positive, got {value}")
            }
        }
    }
}

impl Error for StateError {}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
