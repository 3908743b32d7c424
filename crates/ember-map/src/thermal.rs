//! Inter-cell heat exchange: the physics pass run once per tick.

use crate::map::SimulationMap;
use ember_core::{Coordinates, Dimension};
use smallvec::SmallVec;

/// One explicit-Euler heat redistribution pass over the air layer.
///
/// The pass reads a frozen view of every cell's mixture temperature and
/// transfer coefficient, then exchanges energy between von Neumann
/// neighbours by Fourier's law with a harmonic-mean interface
/// conductance:
///
/// ```text
/// k_if  = 2·kᵢ·kⱼ / (kᵢ + kⱼ)
/// Eᵢ   += coupling · k_if · (Tⱼ − Tᵢ) · dt    for each airy neighbour j
/// ```
///
/// All reads come from the tick-start view, so cell visit order cannot
/// bias the result, and the pairwise terms are antisymmetric, so the
/// pass conserves total thermal energy up to floating-point error.
/// Cells without air are inert: they neither give nor receive. Edge
/// cells simply have fewer neighbours.
///
/// # Stability
///
/// Explicit stepping oscillates when one tick can move more energy into
/// a cell than its heat mass can absorb smoothly. Keep
/// `4 · coupling · dt · max(k)` below the smallest
/// `weight · heat_capacity` among seeded cells.
#[derive(Clone, Copy, Debug)]
pub struct HeatExchange {
    dt: f64,
    coupling: f64,
}

impl HeatExchange {
    /// Pass with the given integration step and coupling factor.
    ///
    /// # Panics
    ///
    /// Panics unless `dt` is finite and positive and `coupling` is
    /// finite and non-negative. Engine configuration validates both
    /// before construction.
    pub fn new(dt: f64, coupling: f64) -> Self {
        assert!(dt.is_finite() && dt > 0.0, "dt must be finite and positive");
        assert!(
            coupling.is_finite() && coupling >= 0.0,
            "coupling must be finite and non-negative"
        );
        Self { dt, coupling }
    }

    /// Integration step.
    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// Coupling factor.
    pub fn coupling(&self) -> f64 {
        self.coupling
    }

    /// Run one pass over `map`.
    pub fn apply(&self, map: &mut SimulationMap) {
        let dimension = map.dimension();
        // Frozen tick-start view: (transfer coef, temperature) per airy cell.
        let profile: Vec<Option<(f64, f64)>> = map
            .layers()
            .air
            .iter()
            .map(|cell| {
                cell.has_air()
                    .then(|| (cell.heat_transfer_coef(), cell.temperature().0))
            })
            .collect();

        for (index, own) in profile.iter().enumerate() {
            let Some((own_coef, own_t)) = *own else {
                continue;
            };
            let coord = dimension.coord_of(index);
            let mut energy = 0.0;
            for neighbour in neighbours4(dimension, coord) {
                let Some((other_coef, other_t)) = profile[dimension.index_of(neighbour)] else {
                    continue;
                };
                let k_sum = own_coef + other_coef;
                if k_sum <= 0.0 {
                    continue;
                }
                let k_if = 2.0 * own_coef * other_coef / k_sum;
                energy += self.coupling * k_if * (other_t - own_t) * self.dt;
            }
            if energy != 0.0 {
                map.air_mut(coord).update_temperature(energy);
            }
        }
    }
}

impl Default for HeatExchange {
    /// `dt = 1.0`, `coupling = 0.2`: stable for unit-weight,
    /// unit-capacity mixtures on a 4-neighbour grid.
    fn default() -> Self {
        Self::new(1.0, 0.2)
    }
}

/// Von Neumann neighbours of `coord` that lie inside the grid, in
/// west/east/north/south order.
pub fn neighbours4(dimension: Dimension, coord: Coordinates) -> SmallVec<[Coordinates; 4]> {
    let mut out = SmallVec::new();
    if coord.x > 0 {
        out.push(Coordinates::new(coord.x - 1, coord.y));
    }
    if coord.x + 1 < dimension.width {
        out.push(Coordinates::new(coord.x + 1, coord.y));
    }
    if coord.y > 0 {
        out.push(Coordinates::new(coord.x, coord.y - 1));
    }
    if coord.y + 1 < dimension.height {
        out.push(Coordinates::new(coord.x, coord.y + 1));
    }
    out
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::SimulationMap;
    use ember_air::{AirPlain, AirTag};
    use ember_core::Temperature;

    // Local test substance with the linear calorimetric energy model.
    // Kept in-crate: these unit tests compile against the test build of
    // this crate, where externally built map types would not unify with
    // crate::map::SimulationMap.
    #[derive(Clone, Debug)]
    struct TestGas {
        tag: AirTag,
        weight: f64,
        heat_capacity: f64,
        transfer_coef: f64,
        temperature: Temperature,
    }

    impl TestGas {
        fn new(tag: u32, weight: f64, heat_capacity: f64, transfer_coef: f64, t: f64) -> Self {
            Self {
                tag: AirTag(tag),
                weight,
                heat_capacity,
                transfer_coef,
                temperature: Temperature(t),
            }
        }

        fn uniform(tag: u32, weight: f64, t: f64) -> Self {
            Self::new(tag, weight, 1.0, 1.0, t)
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
            let own = self.weight * self.heat_capacity;
            let incoming = other.weight * other.heat_capacity;
            self.temperature = Temperature(
                (own * self.temperature.0 + incoming * other.temperature.0) / (own + incoming),
            );
            self.weight += other.weight;
        }
    }

    /// Map with one uniform gas (tag 0) in every cell.
    fn uniform_map(dimension: Dimension, weight: f64, temperature: f64) -> SimulationMap {
        let mut map = SimulationMap::new(dimension);
        for index in 0..dimension.cell_count() {
            map.air_mut(dimension.coord_of(index))
                .add(Box::new(TestGas::uniform(0, weight, temperature)));
        }
        map
    }

    /// Map with `hot` at (0, 0) and `cold` everywhere else, unit weight.
    fn hot_corner_map(dimension: Dimension, hot: f64, cold: f64) -> SimulationMap {
        let mut map = SimulationMap::new(dimension);
        for index in 0..dimension.cell_count() {
            let t = if index == 0 { hot } else { cold };
            map.air_mut(dimension.coord_of(index))
                .add(Box::new(TestGas::uniform(0, 1.0, t)));
        }
        map
    }

    fn total_energy(map: &SimulationMap) -> f64 {
        map.layers().air.iter().map(|c| c.thermal_energy()).sum()
    }

    fn temperature_at(map: &SimulationMap, x: u32, y: u32) -> f64 {
        map.air(Coordinates::new(x, y)).temperature().0
    }

    // ── neighbour enumeration ──────────────────────────────────

    #[test]
    fn neighbour_counts_by_position() {
        let dim = Dimension::new(3, 3);
        assert_eq!(neighbours4(dim, Coordinates::new(0, 0)).len(), 2);
        assert_eq!(neighbours4(dim, Coordinates::new(1, 0)).len(), 3);
        assert_eq!(neighbours4(dim, Coordinates::new(1, 1)).len(), 4);
        assert_eq!(neighbours4(dim, Coordinates::new(2, 2)).len(), 2);
    }

    #[test]
    fn single_cell_has_no_neighbours() {
        assert!(neighbours4(Dimension::new(1, 1), Coordinates::new(0, 0)).is_empty());
    }

    // ── exchange behavior ──────────────────────────────────────

    #[test]
    fn two_cell_flow_moves_expected_energy() {
        let mut map = SimulationMap::new(Dimension::new(2, 1));
        map.air_mut(Coordinates::new(0, 0))
            .add(Box::new(TestGas::uniform(0, 1.0, 100.0)));
        map.air_mut(Coordinates::new(1, 0))
            .add(Box::new(TestGas::uniform(0, 1.0, 0.0)));

        // k_if = 1, so 0.2 · 1 · 100 · 1 = 20 energy crosses over.
        HeatExchange::new(1.0, 0.2).apply(&mut map);

        assert!((temperature_at(&map, 0, 0) - 80.0).abs() < 1e-9);
        assert!((temperature_at(&map, 1, 0) - 20.0).abs() < 1e-9);
    }

    #[test]
    fn harmonic_mean_limits_mismatched_interfaces() {
        let mut map = SimulationMap::new(Dimension::new(2, 1));
        // Left conducts readily, right barely at all.
        map.air_mut(Coordinates::new(0, 0))
            .add(Box::new(TestGas::new(0, 1.0, 1.0, 10.0, 50.0)));
        map.air_mut(Coordinates::new(1, 0))
            .add(Box::new(TestGas::new(0, 1.0, 1.0, 0.1, 0.0)));

        HeatExchange::new(1.0, 0.2).apply(&mut map);

        // k_if = 2·10·0.1/10.1 ≈ 0.198: the poor conductor dominates.
        let moved = temperature_at(&map, 1, 0);
        assert!(moved > 0.0 && moved < 3.0, "moved {moved}");
    }

    #[test]
    fn pass_conserves_total_energy() {
        let mut map = hot_corner_map(Dimension::new(4, 4), 200.0, 10.0);
        let exchange = HeatExchange::default();
        let before = total_energy(&map);
        for _ in 0..25 {
            exchange.apply(&mut map);
        }
        let after = total_energy(&map);
        assert!(
            (after - before).abs() < 1e-7 * (1.0 + before.abs()),
            "energy drifted from {before} to {after}"
        );
    }

    #[test]
    fn spread_contracts_toward_equilibrium() {
        let mut map = hot_corner_map(Dimension::new(3, 3), 90.0, 0.0);
        let exchange = HeatExchange::default();
        let spread = |m: &SimulationMap| {
            let temps: Vec<f64> = m.layers().air.iter().map(|c| c.temperature().0).collect();
            temps.iter().cloned().fold(f64::NEG_INFINITY, f64::max)
                - temps.iter().cloned().fold(f64::INFINITY, f64::min)
        };
        let mut previous = spread(&map);
        for _ in 0..10 {
            exchange.apply(&mut map);
            let current = spread(&map);
            assert!(current <= previous + 1e-9);
            previous = current;
        }
        assert!(previous < 90.0 * 0.5);
    }

    #[test]
    fn airless_cells_are_inert() {
        let mut map = SimulationMap::new(Dimension::new(3, 1));
        // Air only at the west end; the middle cell stays vacuum.
        map.air_mut(Coordinates::new(0, 0))
            .add(Box::new(TestGas::uniform(0, 1.0, 75.0)));

        HeatExchange::default().apply(&mut map);

        assert!((temperature_at(&map, 0, 0) - 75.0).abs() < 1e-12);
        assert!(!map.air(Coordinates::new(1, 0)).has_air());
        assert!(!map.air(Coordinates::new(2, 0)).has_air());
    }

    #[test]
    fn uniform_map_is_a_fixed_point() {
        let mut map = uniform_map(Dimension::new(3, 3), 1.0, 33.0);
        HeatExchange::default().apply(&mut map);
        for (_, cell) in map.layers().air.enumerate() {
            assert!((cell.temperature().0 - 33.0).abs() < 1e-12);
        }
    }

    #[test]
    fn clone_is_independent_of_the_original() {
        let mut original = uniform_map(Dimension::new(2, 2), 1.0, 10.0);
        let copied = original.clone();
        original
            .air_mut(Coordinates::new(0, 0))
            .update_temperature(40.0);
        assert!((copied.air(Coordinates::new(0, 0)).temperature().0 - 10.0).abs() < 1e-12);
    }

    // ── proptest ───────────────────────────────────────────────

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Heat exchange conserves total energy for arbitrary
            /// temperature fields.
            #[test]
            fn exchange_conserves_energy(
                temps in proptest::collection::vec(-100.0f64..300.0, 9),
                coupling in 0.01f64..0.24,
            ) {
                let dim = Dimension::new(3, 3);
                let mut map = SimulationMap::new(dim);
                for (index, t) in temps.iter().enumerate() {
                    map.air_mut(dim.coord_of(index))
                        .add(Box::new(TestGas::uniform(0, 1.0, *t)));
                }
                let before = total_energy(&map);
                let exchange = HeatExchange::new(1.0, coupling);
                for _ in 0..5 {
                    exchange.apply(&mut map);
                }
                let after = total_energy(&map);
                prop_assert!(
                    (after - before).abs() < 1e-7 * (1.0 + before.abs()),
                    "energy drifted from {} to {}", before, after
                );
            }

            /// Temperatures stay inside the initial extremes when the
            /// coupling honors the stability bound.
            #[test]
            fn stable_coupling_keeps_temperatures_bounded(
                temps in proptest::collection::vec(0.0f64..100.0, 4),
            ) {
                let dim = Dimension::new(2, 2);
                let mut map = SimulationMap::new(dim);
                for (index, t) in temps.iter().enumerate() {
                    map.air_mut(dim.coord_of(index))
                        .add(Box::new(TestGas::uniform(0, 1.0, *t)));
                }
                let lo = temps.iter().cloned().fold(f64::INFINITY, f64::min);
                let hi = temps.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
                let exchange = HeatExchange::new(1.0, 0.2);
                for _ in 0..8 {
                    exchange.apply(&mut map);
                    for (_, cell) in map.layers().air.enumerate() {
                        let t = cell.temperature().0;
                        prop_assert!(t >= lo - 1e-9 && t <= hi + 1e-9, "escaped: {}", t);
                    }
                }
            }
        }
    }
}
