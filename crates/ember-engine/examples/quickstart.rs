//! Ember Quickstart — a complete, minimal simulation from scratch.
//!
//! Demonstrates:
//!   1. Defining a concrete air substance (the `AirPlain` contract)
//!   2. Seeding a grid with a warm plume in an ambient field
//!   3. Starting a finite run on the background thread pair
//!   4. Observing published state and map snapshots while it ticks
//!   5. Placing a subject through the query queue
//!   6. Graceful shutdown
//!
//! Run with:
//!   cargo run --example quickstart

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use ember_air::{AirContainer, AirPlain, AirTag};
use ember_core::{
    Coordinates, Dimension, SimulationStatePatch, SimulationStatus, SimulationType, Temperature,
};
use ember_engine::{Simulation, SimulationConfig, SimulationInterface};
use ember_map::{Subject, SubjectQuery};

// ─── Grid parameters ────────────────────────────────────────────

const COLS: u32 = 8;
const ROWS: u32 = 8;
const LAST_TICK: u64 = 60;
const TICK_RATE_HZ: f64 = 250.0;

// Plume position (center of grid) and temperatures in kelvin.
const PLUME: Coordinates = Coordinates::new(4, 4);
const PLUME_T: f64 = 390.0;
const AMBIENT_T: f64 = 290.0;

// ─── Physics parameters ─────────────────────────────────────────
//
// Stability: 4 · coupling · dt · k must stay below weight · heat
// capacity, or a cell could overshoot its neighbours in one pass.
// Here 4 · 6.0 · 1.0 · 0.026 = 0.624 < 1.0 · 1.04.

const DT: f64 = 1.0;
const COUPLING: f64 = 6.0;

// ─── Substance: dry nitrogen ────────────────────────────────────
//
// Concrete substances live outside the ember crates; every catalogue
// defines its own. Heat capacity and transfer coefficient are fixed
// per substance here, so cells vary only in weight and temperature.

const NITROGEN_TAG: AirTag = AirTag(0);
const NITROGEN_HEAT_CAPACITY: f64 = 1.04;
const NITROGEN_TRANSFER_COEF: f64 = 0.026;

#[derive(Clone, Debug)]
struct Nitrogen {
    weight: f64,
    temperature: Temperature,
}

impl Nitrogen {
    fn new(weight: f64, temperature: f64) -> Self {
        Self {
            weight,
            temperature: Temperature(temperature),
        }
    }
}

impl AirPlain for Nitrogen {
    fn weight(&self) -> f64 {
        self.weight
    }

    fn heat_capacity(&self) -> f64 {
        NITROGEN_HEAT_CAPACITY
    }

    fn heat_transfer_coef(&self) -> f64 {
        NITROGEN_TRANSFER_COEF
    }

    fn temperature(&self) -> Temperature {
        self.temperature
    }

    fn set_temperature(&mut self, temperature: Temperature) {
        self.temperature = temperature;
    }

    fn apply_heat(&mut self, energy: f64) {
        self.temperature += energy / (self.weight * NITROGEN_HEAT_CAPACITY);
    }

    fn tag(&self) -> AirTag {
        NITROGEN_TAG
    }

    fn boxed_clone(&self) -> Box<dyn AirPlain> {
        Box::new(self.clone())
    }

    fn merge(&mut self, other: &dyn AirPlain) {
        let other = other
            .downcast_ref::<Nitrogen>()
            .expect("merge with a non-nitrogen plain");
        let own = self.weight * NITROGEN_HEAT_CAPACITY;
        let incoming = other.weight * NITROGEN_HEAT_CAPACITY;
        self.temperature = Temperature(
            (own * self.temperature.0 + incoming * other.temperature.0) / (own + incoming),
        );
        self.weight += other.weight;
    }
}

// ─── Main ───────────────────────────────────────────────────────

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Ember Quickstart ===\n");

    // 1. Create the interface: the shared front door both the caller
    //    and the engine threads hold. All steering and observation
    //    goes through this one object.
    let interface = Arc::new(SimulationInterface::new());

    // 2. Configure a finite run: 8x8 grid, 60 ticks at 250 Hz, one
    //    warm plume in an ambient nitrogen field.
    let mut config = SimulationConfig::new(Dimension::new(COLS, ROWS));
    config.initial_state.sim_type = SimulationType::Finite;
    config.initial_state.status = SimulationStatus::Running;
    config.initial_state.last_tick = LAST_TICK;
    config.initial_state.task_frequency = TICK_RATE_HZ;
    config.dt = DT;
    config.coupling = COUPLING;
    config.seeder = Some(Box::new(|coord: Coordinates| {
        let temperature = if coord == PLUME { PLUME_T } else { AMBIENT_T };
        let mut cell = AirContainer::new();
        cell.add(Box::new(Nitrogen::new(1.0, temperature)));
        cell
    }));
    println!(
        "Grid: {}x{} nitrogen at {:.0} K, plume at {} at {:.0} K",
        COLS, ROWS, AMBIENT_T, PLUME, PLUME_T
    );
    println!("Run: finite, {} ticks at {} Hz\n", LAST_TICK, TICK_RATE_HZ);

    // 3. Start the engine. This spawns the master thread (steering,
    //    pacing, publishing) and the slave thread (physics).
    let mut sim = Simulation::run(config, Arc::clone(&interface))?;

    // 4. Wait for the first snapshot. The master publishes within its
    //    first iteration, but the caller starts ahead of it.
    print!("Waiting for first snapshot...");
    loop {
        if interface.map().is_some() {
            break;
        }
        thread::sleep(Duration::from_millis(2));
    }
    println!(" tick {}", interface.state().current_tick);

    // 5. Observe while the run advances. Each poll sees the latest
    //    published snapshot, usually several ticks past the previous
    //    one. The mean never moves: the exchange pass only
    //    redistributes energy.
    for i in 0..5 {
        thread::sleep(Duration::from_millis(40));

        let state = interface.state();
        let snap = interface.map().unwrap();
        let mut sum = 0.0;
        let mut max = f64::NEG_INFINITY;
        for index in 0..snap.dimension().cell_count() {
            let t = snap.air(snap.dimension().coord_of(index)).temperature().0;
            sum += t;
            max = max.max(t);
        }
        println!(
            "  observation {}: tick {:>2}, mean={:.2} K, max={:.2} K, physics={}us",
            i + 1,
            state.current_tick,
            sum / snap.dimension().cell_count() as f64,
            max,
            interface.metrics().physics_us,
        );
    }

    // 6. Wait for the run to stop itself at the final tick. STOPPED
    //    is idle, not terminated: both threads stay alive, ready to
    //    resume if a patch sets Running again.
    loop {
        let state = interface.state();
        if state.status == SimulationStatus::Stopped && state.current_tick == LAST_TICK {
            break;
        }
        thread::sleep(Duration::from_millis(2));
    }
    println!("\nRun stopped at tick {}.", interface.state().current_tick);

    // 7. Render the final temperature field, in degrees above ambient.
    let snap = interface.map().unwrap();
    println!("Final temperature field (tick {}):", snap.tick());
    for y in 0..ROWS {
        let row: Vec<String> = (0..COLS)
            .map(|x| {
                let v = snap.air(Coordinates::new(x, y)).temperature().0 - AMBIENT_T;
                if v >= 20.0 {
                    " ## ".into()
                } else if v >= 1.0 {
                    format!("{:4.0}", v)
                } else if v >= 0.1 {
                    format!(" .{} ", (v * 10.0) as u8)
                } else {
                    "  . ".into()
                }
            })
            .collect();
        println!("  {}", row.join(""));
    }

    // 8. The mutation queue stays live while stopped: place a subject
    //    and watch the revision counter advance without a tick.
    let before = snap.revision();
    interface.push_query(SubjectQuery::place(Coordinates::new(1, 1), Subject::new(7)))?;
    loop {
        let snap = interface.map().unwrap();
        if snap.revision() > before {
            println!(
                "\nSubject {:?} placed at (1, 1), revision {} -> {}, tick still {}",
                snap.subject(Coordinates::new(1, 1)).map(|s| s.id.0),
                before,
                snap.revision(),
                snap.tick(),
            );
            break;
        }
        thread::sleep(Duration::from_millis(2));
    }

    // 9. Shut down. exit() requests cancellation, cuts short any
    //    pacing sleep, and joins both threads. Drop would do the same.
    println!("\nShutting down...");
    sim.exit();
    println!("Interface closed: {}", interface.is_closed());
    let refused = interface.submit_patch(SimulationStatePatch {
        status: Some(SimulationStatus::Running),
        ..Default::default()
    });
    println!("Patch after shutdown: {:?}", refused);

    println!("\nDone.");
    Ok(())
}
