//! Scalar physical units.

use std::fmt;
use std::ops::{Add, AddAssign, Sub};

/// Temperature of a substance or mixture.
///
/// A plain `f64` newtype with no unit imposed: substances define their
/// own energy-to-degree relation, so a map runs equally well in Celsius
/// or Kelvin as long as its substances agree.
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd)]
pub struct Temperature(pub f64);

impl Temperature {
    /// Zero on whatever scale the substances use.
    pub const ZERO: Temperature = Temperature(0.0);
}

impl fmt::Display for Temperature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<f64> for Temperature {
    fn from(v: f64) -> Self {
        Self(v)
    }
}

impl Add<f64> for Temperature {
    type Output = Temperature;

    fn add(self, delta: f64) -> Temperature {
        Temperature(self.0 + delta)
    }
}

impl AddAssign<f64> for Temperature {
    fn add_assign(&mut self, delta: f64) {
        self.0 += delta;
    }
}

impl Sub for Temperature {
    type Output = f64;

    /// Degrees between two temperatures, signed.
    fn sub(self, other: Temperature) -> f64 {
        self.0 - other.0
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
