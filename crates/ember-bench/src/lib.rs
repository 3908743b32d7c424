//! Benchmark profiles and utilities for the Ember thermal grid simulation.
//!
//! Provides pre-built, seed-deterministic grids for benchmarking:
//!
//! - [`reference_map`]: 100x100 grid (10K cells) of random mixtures
//! - [`stress_map`]: 316x316 grid (~100K cells) for stress testing
//! - [`random_container`] / [`random_map`]: the underlying builders
//! - [`reference_exchange`]: an exchange pass stable on those grids

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use ember_air::AirContainer;
use ember_core::Dimension;
use ember_map::{HeatExchange, SimulationMap};
use ember_test_utils::TestGas;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

/// Draw one gas with properties in the benchmark envelope:
/// weight in [0.5, 4), heat capacity in [0.5, 2), transfer coefficient
/// in [0.2, 1), temperature in [260, 340) kelvin, tag in 0..4.
fn random_gas(rng: &mut ChaCha8Rng) -> TestGas {
    TestGas::new(
        (rng.random::<f64>() * 4.0) as u32,
        0.5 + rng.random::<f64>() * 3.5,
        0.5 + rng.random::<f64>() * 1.5,
        0.2 + rng.random::<f64>() * 0.8,
        260.0 + rng.random::<f64>() * 80.0,
    )
}

/// Container holding up to `plains` random gases; same-tag draws merge,
/// so the result may hold fewer entries. Deterministic per seed.
pub fn random_container(seed: u64, plains: usize) -> AirContainer {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut container = AirContainer::new();
    for _ in 0..plains {
        container.add(Box::new(random_gas(&mut rng)));
    }
    container
}

/// Map with one to three random gases in every cell. Deterministic per
/// seed; the same seed always produces the same grid.
pub fn random_map(dimension: Dimension, seed: u64) -> SimulationMap {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut map = SimulationMap::new(dimension);
    for index in 0..dimension.cell_count() {
        let coord = dimension.coord_of(index);
        let plains = 1 + (rng.random::<f64>() * 3.0) as usize;
        let cell = map.air_mut(coord);
        for _ in 0..plains {
            cell.add(Box::new(random_gas(&mut rng)));
        }
    }
    map
}

/// Reference benchmark grid: 100x100 (10K cells) of random mixtures.
pub fn reference_map(seed: u64) -> SimulationMap {
    random_map(Dimension::new(100, 100), seed)
}

/// Stress benchmark grid: 316x316 (~100K cells), same mixtures as
/// [`reference_map`] at 10x the cell count.
pub fn stress_map(seed: u64) -> SimulationMap {
    random_map(Dimension::new(316, 316), seed)
}

/// Exchange pass sized for the random grids: dt=1.0, coupling=0.05.
///
/// Stability needs 4 · coupling · dt · max(k) below min(weight · heat
/// capacity); the envelope gives 4 · 0.05 · 1.0 · 1.0 = 0.2 < 0.25.
pub fn reference_exchange() -> HeatExchange {
    HeatExchange::new(1.0, 0.05)
}
