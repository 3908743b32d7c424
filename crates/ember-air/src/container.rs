//! Per-cell air mixture with the thermal equilibrium invariant.

use crate::plain::{AirPlain, AirTag};
use ember_core::Temperature;
use indexmap::IndexMap;

/// All air occupying one cell.
///
/// Holds at most one plain per [`AirTag`], in insertion order; adding a
/// same-tag plain merges instead of appending. Every public mutation
/// ends by re-normalizing, so whenever a container is observable, all of
/// its plains report one common mixture temperature (instantaneous
/// perfect mixing within a cell).
///
/// Mutations take `&mut self`, so the distribute-then-normalize sequence
/// inside [`update_temperature`](Self::update_temperature) is atomic with
/// respect to readers by construction.
#[derive(Clone, Debug, Default)]
pub struct AirContainer {
    plains: IndexMap<AirTag, Box<dyn AirPlain>>,
}

impl AirContainer {
    /// Empty container.
    pub fn new() -> Self {
        Self::default()
    }

    /// True when at least one plain is present.
    pub fn has_air(&self) -> bool {
        !self.plains.is_empty()
    }

    /// Number of distinct substances present.
    pub fn len(&self) -> usize {
        self.plains.len()
    }

    /// True when no plain is present.
    pub fn is_empty(&self) -> bool {
        self.plains.is_empty()
    }

    /// Iterate the plains in insertion order.
    pub fn plains(&self) -> impl Iterator<Item = &dyn AirPlain> {
        self.plains.values().map(|p| p.as_ref())
    }

    /// Combined weight of all plains.
    pub fn total_weight(&self) -> f64 {
        self.plains.values().map(|p| p.weight()).sum()
    }

    /// Total thermal energy relative to zero: `Σ wᵢ·hcᵢ·Tᵢ`.
    pub fn thermal_energy(&self) -> f64 {
        self.plains
            .values()
            .map(|p| p.weight() * p.heat_capacity() * p.temperature().0)
            .sum()
    }

    /// Weighted-average heat transfer coefficient: `Σ(wᵢ·cᵢ) / Σ(wᵢ)`,
    /// with each plain's weight as the weighting factor.
    ///
    /// # Panics
    ///
    /// Panics when the container is empty. Check
    /// [`has_air`](Self::has_air) first; aggregating nothing is a caller
    /// bug.
    pub fn heat_transfer_coef(&self) -> f64 {
        assert!(
            self.has_air(),
            "heat_transfer_coef called on an empty container"
        );
        let mut weighted = 0.0;
        let mut total = 0.0;
        for plain in self.plains.values() {
            weighted += plain.weight() * plain.heat_transfer_coef();
            total += plain.weight();
        }
        debug_assert!(total > 0.0, "plain weights must be positive");
        weighted / total
    }

    /// Mixture temperature.
    ///
    /// The equilibrium invariant guarantees all plains agree, so the
    /// first plain reports for the whole container.
    ///
    /// # Panics
    ///
    /// Panics when the container is empty.
    pub fn temperature(&self) -> Temperature {
        assert!(self.has_air(), "temperature called on an empty container");
        self.plains[0].temperature()
    }

    /// Distribute `heat_energy` across the mixture, then re-equalize.
    ///
    /// Distribution is proportional to each plain's share of the
    /// aggregate transfer capability: with `sumHeatWeight = Σ(wⱼ·cⱼ)`,
    /// plain *i* receives `(cᵢ·wᵢ) / sumHeatWeight` of the energy via
    /// its own [`apply_heat`](AirPlain::apply_heat). Normalization then
    /// sets every plain to the heat-capacity-weighted average
    /// `T* = Σ(wᵢ·hcᵢ·Tᵢ) / Σ(wᵢ·hcᵢ)`, which conserves the mixture's
    /// thermal energy.
    ///
    /// # Panics
    ///
    /// Panics when the container is empty.
    pub fn update_temperature(&mut self, heat_energy: f64) {
        assert!(
            self.has_air(),
            "update_temperature called on an empty container"
        );
        let sum_heat_weight: f64 = self
            .plains
            .values()
            .map(|p| p.weight() * p.heat_transfer_coef())
            .sum();
        debug_assert!(
            sum_heat_weight > 0.0,
            "plain weights and transfer coefficients must be positive"
        );
        for plain in self.plains.values_mut() {
            let share = plain.weight() * plain.heat_transfer_coef() / sum_heat_weight;
            plain.apply_heat(share * heat_energy);
        }
        self.normalize_temperature();
    }

    /// Insert a plain, merging when its tag is already present.
    ///
    /// Merging is additive (weight and energy combine inside the
    /// existing entry); a new tag appends. Always re-normalizes, so the
    /// equilibrium invariant holds the moment this returns.
    pub fn add(&mut self, plain: Box<dyn AirPlain>) {
        let tag = plain.tag();
        match self.plains.get_mut(&tag) {
            Some(existing) => existing.merge(plain.as_ref()),
            None => {
                self.plains.insert(tag, plain);
            }
        }
        self.normalize_temperature();
    }

    /// Bring every plain to the energy-conserving mixture temperature.
    ///
    /// Implicit in [`add`](Self::add) and
    /// [`update_temperature`](Self::update_temperature); no-op when
    /// empty.
    pub fn normalize_temperature(&mut self) {
        let heat_mass: f64 = self
            .plains
            .values()
            .map(|p| p.weight() * p.heat_capacity())
            .sum();
        if heat_mass <= 0.0 {
            return;
        }
        let equilibrium = Temperature(self.thermal_energy() / heat_mass);
        for plain in self.plains.values_mut() {
            plain.set_temperature(equilibrium);
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
