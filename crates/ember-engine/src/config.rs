//! Simulation configuration, validation, and error types.
//!
//! [`SimulationConfig`] is the input for
//! [`Simulation::run()`](crate::simulation::Simulation::run);
//! [`SimulationConfig::validate()`] checks every structural invariant
//! before any thread is spawned, so a running engine never observes an
//! invalid tick rate or an empty grid.

use std::error::Error;
use std::fmt;

use ember_air::AirContainer;
use ember_core::{Coordinates, Dimension, SimulationState};
use ember_map::MapError;

/// Cell seeding callback: returns the initial air mixture for a
/// coordinate when the working map is created or resized.
pub type CellSeeder = Box<dyn Fn(Coordinates) -> AirContainer + Send>;

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected during [`SimulationConfig::validate()`] or engine
/// startup.
#[derive(Debug)]
pub enum ConfigError {
    /// `task_frequency` is NaN, infinite, zero, negative, or so small
    /// that its reciprocal overflows a `Duration`.
    InvalidTickRate {
        /// The invalid value.
        value: f64,
    },
    /// Integration step is NaN, infinite, zero, or negative.
    InvalidDt {
        /// The invalid value.
        value: f64,
    },
    /// Coupling factor is NaN, infinite, or negative.
    InvalidCoupling {
        /// The invalid value.
        value: f64,
    },
    /// The initial grid has zero cells.
    EmptyDimension {
        /// The rejected dimension.
        dimension: Dimension,
    },
    /// A background thread could not be spawned.
    ThreadSpawnFailed {
        /// Description of which thread failed.
        reason: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidTickRate { value } => {
                write!(f, "task_frequency must be finite and positive, got {value}")
            }
            Self::InvalidDt { value } => {
                write!(f, "dt must be finite and positive, got {value}")
            }
            Self::InvalidCoupling { value } => {
                write!(f, "coupling must be finite and non-negative, got {value}")
            }
            Self::EmptyDimension { dimension } => {
                write!(f, "initial dimension {dimension} has zero cells")
            }
            Self::ThreadSpawnFailed { reason } => {
                write!(f, "thread spawn failed: {reason}")
            }
        }
    }
}

impl Error for ConfigError {}

impl From<MapError> for ConfigError {
    fn from(e: MapError) -> Self {
        match e {
            MapError::EmptyDimension { dimension } => Self::EmptyDimension { dimension },
        }
    }
}

// ── SimulationConfig ───────────────────────────────────────────────

/// Complete configuration for starting a simulation.
///
/// The initial state carries the run mode (finite or infinite), the
/// tick bounds, and the pacing frequency; the physics parameters feed
/// the per-tick heat exchange. `seeder` fills cells when the working
/// map is created, and again whenever a resize replaces it. Without a
/// seeder every cell starts as vacuum.
pub struct SimulationConfig {
    /// State the master publishes before its first iteration.
    pub initial_state: SimulationState,
    /// Grid size of the first working map.
    pub initial_dimension: Dimension,
    /// Integration step for the heat exchange pass.
    pub dt: f64,
    /// Coupling factor for the heat exchange pass.
    pub coupling: f64,
    /// Initial air mixture per cell. `None` leaves cells empty.
    pub seeder: Option<CellSeeder>,
}

impl SimulationConfig {
    /// Configuration with default state and physics for `dimension`.
    pub fn new(initial_dimension: Dimension) -> Self {
        Self {
            initial_state: SimulationState::default(),
            initial_dimension,
            dt: 1.0,
            coupling: 0.2,
            seeder: None,
        }
    }

    /// Validate all structural invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        // 1. task_frequency must be finite and positive, and its
        //    reciprocal must also be finite (rejects subnormals where
        //    1.0/hz = inf, which would panic in Duration::from_secs_f64).
        let hz = self.initial_state.task_frequency;
        if !hz.is_finite() || hz <= 0.0 || !(1.0 / hz).is_finite() {
            return Err(ConfigError::InvalidTickRate { value: hz });
        }
        // 2. dt must be finite and positive.
        if !self.dt.is_finite() || self.dt <= 0.0 {
            return Err(ConfigError::InvalidDt { value: self.dt });
        }
        // 3. coupling must be finite and non-negative.
        if !self.coupling.is_finite() || self.coupling < 0.0 {
            return Err(ConfigError::InvalidCoupling {
                value: self.coupling,
            });
        }
        // 4. The grid must have at least one cell.
        if self.initial_dimension.is_empty() {
            return Err(ConfigError::EmptyDimension {
                dimension: self.initial_dimension,
            });
        }
        Ok(())
    }
}

impl fmt::Debug for SimulationConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimulationConfig")
            .field("initial_state", &self.initial_state)
            .field("initial_dimension", &self.initial_dimension)
            .field("dt", &self.dt)
            .field("coupling", &self.coupling)
            .field("seeder", &self.seeder.is_some())
            .finish()
    }
}
