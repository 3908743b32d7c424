//! Concrete substances and grid builders for test scenarios.

use ember_air::{AirContainer, AirPlain, AirTag};
use ember_core::{Coordinates, Dimension, Temperature};
use ember_map::SimulationMap;

/// Configurable test substance with a linear energy model.
///
/// `apply_heat` moves the temperature by `energy / (weight · heat_capacity)`
/// — the ideal calorimetric relation — so energy bookkeeping in tests is
/// exact. Merging conserves thermal energy and sums weights.
#[derive(Clone, Debug, PartialEq)]
pub struct TestGas {
    pub tag: AirTag,
    pub weight: f64,
    pub heat_capacity: f64,
    pub transfer_coef: f64,
    pub temperature: Temperature,
}

impl TestGas {
    pub fn new(
        tag: u32,
        weight: f64,
        heat_capacity: f64,
        transfer_coef: f64,
        temperature: f64,
    ) -> Self {
        Self {
            tag: AirTag(tag),
            weight,
            heat_capacity,
            transfer_coef,
            temperature: Temperature(temperature),
        }
    }

    /// Gas with unit heat capacity and unit transfer coefficient, so
    /// expected temperatures reduce to weight-averaged arithmetic.
    pub fn uniform(tag: u32, weight: f64, temperature: f64) -> Self {
        Self::new(tag, weight, 1.0, 1.0, temperature)
    }
}

impl AirPlain for TestGas {
    fn weight(&self) -> f64 {
        self.weight
    }

    fn heat_capacity(&self) -> f64 {
        self.heat_capacity
    }

    fn heat_transfer_coef(&self) -> f64 {
        self.transfer_coef
    }

    fn temperature(&self) -> Temperature {
        self.temperature
    }

    fn set_temperature(&mut self, temperature: Temperature) {
        self.temperature = temperature;
    }

    fn apply_heat(&mut self, energy: f64) {
        self.temperature += energy / (self.weight * self.heat_capacity);
    }

    fn tag(&self) -> AirTag {
        self.tag
    }

    fn boxed_clone(&self) -> Box<dyn AirPlain> {
        Box::new(self.clone())
    }

    fn merge(&mut self, other: &dyn AirPlain) {
        let other = other
            .downcast_ref::<TestGas>()
            .expect("merge with a non-TestGas plain");
        let own_heat_mass = self.weight * self.heat_capacity;
        let other_heat_mass = other.weight * other.heat_capacity;
        self.temperature = Temperature(
            (own_heat_mass * self.temperature.0 + other_heat_mass * other.temperature.0)
                / (own_heat_mass + other_heat_mass),
        );
        self.weight += other.weight;
    }
}

/// Container pre-filled with the given gases, normalized as it fills.
pub fn container_of<I: IntoIterator<Item = TestGas>>(gases: I) -> AirContainer {
    let mut container = AirContainer::new();
    for gas in gases {
        container.add(Box::new(gas));
    }
    container
}

/// Map with one uniform gas (tag 0) in every cell.
pub fn uniform_map(dimension: Dimension, weight: f64, temperature: f64) -> SimulationMap {
    let mut map = SimulationMap::new(dimension);
    for index in 0..dimension.cell_count() {
        let coord = dimension.coord_of(index);
        map.air_mut(coord)
            .add(Box::new(TestGas::uniform(0, weight, temperature)));
    }
    map
}

/// Map with `hot` at (0, 0) and `cold` in every other cell, unit weight.
pub fn hot_corner_map(dimension: Dimension, hot: f64, cold: f64) -> SimulationMap {
    let mut map = SimulationMap::new(dimension);
    for index in 0..dimension.cell_count() {
        let coord = dimension.coord_of(index);
        let temperature = if index == 0 { hot } else { cold };
        map.air_mut(coord)
            .add(Box::new(TestGas::uniform(0, 1.0, temperature)));
    }
    map
}

/// Seeder closure placing the same uniform gas in every cell; suitable
/// for `SimulationConfig::seeder`.
pub fn uniform_seeder(
    weight: f64,
    temperature: f64,
) -> impl Fn(Coordinates) -> AirContainer + Send + Sync + 'static {
    move |_| container_of([TestGas::uniform(0, weight, temperature)])
}
