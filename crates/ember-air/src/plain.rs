//! The `AirPlain` capability trait and `dyn AirPlain` downcast support.

use ember_core::Temperature;
use std::any::Any;
use std::fmt;

/// Substance type identifier.
///
/// Two plains merge inside a container iff their tags are equal. The tag
/// space is open; substance catalogues allocate their own constants.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AirTag(pub u32);

impl fmt::Display for AirTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for AirTag {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// One quantity of a single air substance.
///
/// Concrete variants are external collaborators; the container and the
/// engine see them only through this contract. Weight and heat capacity
/// are positive by construction, so no operation here can fail under
/// normal inputs.
///
/// # Object Safety
///
/// Designed for use as `Box<dyn AirPlain>` inside containers. Use
/// `downcast_ref` on `dyn AirPlain` when a substance needs its concrete
/// type back, e.g. inside [`merge`](Self::merge).
///
/// # Thread Safety
///
/// `Send + Sync` is required because published map snapshots are shared
/// across threads behind `Arc`, and a shared reference to a container
/// reaches into its plains.
pub trait AirPlain: Any + fmt::Debug + Send + Sync + 'static {
    /// Mass of this plain, in substance-defined units. Positive.
    fn weight(&self) -> f64;

    /// Specific heat capacity: energy per weight-degree. Positive.
    fn heat_capacity(&self) -> f64;

    /// Heat transfer coefficient: how readily the substance exchanges
    /// heat with its surroundings. Positive.
    fn heat_transfer_coef(&self) -> f64;

    /// Current temperature.
    fn temperature(&self) -> Temperature;

    /// Set the temperature directly. Normalization uses this.
    fn set_temperature(&mut self, temperature: Temperature);

    /// Apply a signed energy delta.
    ///
    /// How far one unit of energy moves the temperature is
    /// substance-specific; the container only guarantees that the deltas
    /// it hands out sum to the total it was asked to distribute.
    fn apply_heat(&mut self, energy: f64);

    /// Merge-matching identifier.
    fn tag(&self) -> AirTag;

    /// Independent deep copy.
    fn boxed_clone(&self) -> Box<dyn AirPlain>;

    /// Fold a same-tag plain into this one.
    ///
    /// Weight is additive and the merged temperature conserves thermal
    /// energy. Implementations downcast `other` to their own type; the
    /// container only calls this with matching tags, so a failed
    /// downcast is a substance-catalogue bug.
    fn merge(&mut self, other: &dyn AirPlain);
}

impl dyn AirPlain {
    /// Attempt to downcast a trait object to a concrete substance type.
    pub fn downcast_ref<T: AirPlain>(&self) -> Option<&T> {
        (self as &dyn Any).downcast_ref::<T>()
    }
}

impl Clone for Box<dyn AirPlain> {
    fn clone(&self) -> Self {
        self.boxed_clone()
    }
}
