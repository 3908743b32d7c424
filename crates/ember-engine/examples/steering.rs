//! Ember live steering — driving a running engine through its interface.
//!
//! Demonstrates:
//!   1. Starting an infinite run and watching the tick counter advance
//!   2. Pausing and resuming with sparse state patches
//!   3. Retargeting the tick rate mid-run
//!   4. Placing, replacing, and clearing subjects via the query queue
//!   5. Converting an infinite run to finite mid-flight
//!   6. Resizing the grid at an iteration boundary
//!   7. Reading per-iteration metrics, then cancelling
//!
//! # Patches vs. queries
//!
//! A **patch** is a sparse edit of the run state: only the fields it
//! carries change, and patches queued in the same iteration window
//! merge later-wins per field. A **query** is an edit of one map cell,
//! applied in strict submission order. Both queues drain once per
//! master iteration, running or stopped.
//!
//! Run with:
//!   cargo run --example steering

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use ember_air::{AirContainer, AirPlain, AirTag};
use ember_core::{
    Coordinates, Dimension, SimulationStatePatch, SimulationStatus, SimulationType, Temperature,
};
use ember_engine::{Simulation, SimulationConfig, SimulationInterface};
use ember_map::{Subject, SubjectQuery};

// ─── Substance: dry nitrogen ────────────────────────────────────
//
// Same nitrogen substance as quickstart.rs.

const NITROGEN_TAG: AirTag = AirTag(0);
const NITROGEN_HEAT_CAPACITY: f64 = 1.04;
const NITROGEN_TRANSFER_COEF: f64 = 0.026;

#[derive(Clone, Debug)]
struct Nitrogen {
    weight: f64,
    temperature: Temperature,
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
    println!("=== Ember Steering Example ===\n");

    // 1. Start an infinite run: 6x4 grid of uniform nitrogen, 200 Hz,
    //    Running from the first iteration.
    let interface = Arc::new(SimulationInterface::new());
    let mut config = SimulationConfig::new(Dimension::new(6, 4));
    config.initial_state.status = SimulationStatus::Running;
    config.initial_state.task_frequency = 200.0;
    config.seeder = Some(Box::new(|_| {
        let mut cell = AirContainer::new();
        cell.add(Box::new(Nitrogen {
            weight: 1.0,
            temperature: Temperature(300.0),
        }));
        cell
    }));
    let mut sim = Simulation::run(config, Arc::clone(&interface))?;
    println!("Engine started: infinite run at 200 Hz");

    // 2. Watch the counter advance on its own.
    println!("\nWatching the background threads tick:");
    for i in 0..3 {
        thread::sleep(Duration::from_millis(60));
        let state = interface.state();
        println!(
            "  observation {}: status={}, tick={:>3}",
            i + 1,
            state.status,
            state.current_tick,
        );
    }

    // 3. Pause. The patch carries only the status field; the counter,
    //    bounds, and rate stay whatever they were.
    interface.submit_patch(SimulationStatePatch {
        status: Some(SimulationStatus::Stopped),
        ..Default::default()
    })?;
    loop {
        if interface.state().status == SimulationStatus::Stopped {
            break;
        }
        thread::sleep(Duration::from_millis(2));
    }
    let frozen = interface.state().current_tick;
    thread::sleep(Duration::from_millis(80));
    println!(
        "\nPaused at tick {}; 80 ms later the counter still reads {}.",
        frozen,
        interface.state().current_tick,
    );

    // 4. Subjects apply in drain order, running or stopped. The second
    //    placement replaces the first.
    interface.push_query(SubjectQuery::place(Coordinates::new(2, 1), Subject::new(1)))?;
    interface.push_query(SubjectQuery::place(Coordinates::new(2, 1), Subject::new(2)))?;
    interface.push_query(SubjectQuery::clear(Coordinates::new(0, 0)))?;
    thread::sleep(Duration::from_millis(40));
    let snap = interface.map().unwrap();
    println!(
        "Subject at (2, 1): id={:?}, map revision {}",
        snap.subject(Coordinates::new(2, 1)).map(|s| s.id.0),
        snap.revision(),
    );

    // 5. Resume at a higher rate. Both fields ride one patch.
    interface.submit_patch(SimulationStatePatch {
        status: Some(SimulationStatus::Running),
        task_frequency: Some(500.0),
        ..Default::default()
    })?;
    println!("\nResumed at 500 Hz.");

    // 6. Convert to finite mid-flight: the run stops itself when the
    //    counter reaches the target.
    let target = interface.state().current_tick + 40;
    interface.submit_patch(SimulationStatePatch {
        sim_type: Some(SimulationType::Finite),
        last_tick: Some(target),
        ..Default::default()
    })?;
    print!("Converted to finite with last_tick={}...", target);
    loop {
        let state = interface.state();
        if state.status == SimulationStatus::Stopped {
            println!(" stopped at tick {}.", state.current_tick);
            break;
        }
        thread::sleep(Duration::from_millis(5));
    }

    // 7. Resize. The working map is replaced at the next iteration
    //    boundary with a freshly seeded grid of the new size; the old
    //    contents are discarded.
    interface.set_dimension(Dimension::new(10, 3))?;
    interface.submit_patch(SimulationStatePatch {
        sim_type: Some(SimulationType::Infinite),
        status: Some(SimulationStatus::Running),
        ..Default::default()
    })?;
    loop {
        if interface.dimension() == Some(Dimension::new(10, 3)) {
            break;
        }
        thread::sleep(Duration::from_millis(2));
    }
    println!(
        "\nResized to {}; ticking continues, tick {}.",
        interface.dimension().unwrap(),
        interface.state().current_tick,
    );

    // 8. Metrics of the most recent master iteration.
    thread::sleep(Duration::from_millis(30));
    let m = interface.metrics();
    println!("\nTickMetrics:");
    println!("  iteration:   {}", m.iteration);
    println!("  ticked:      {}", m.ticked);
    println!("  queries_us:  {}", m.queries_us);
    println!("  physics_us:  {}", m.physics_us);
    println!("  publish_us:  {}", m.publish_us);
    println!("  total_us:    {}", m.total_us);
    println!("  overrun_us:  {}", m.overrun_us);

    // 9. Cancel. The master observes the request at its next iteration
    //    boundary, shuts the slave down, publishes a final Stopped
    //    state, and closes the interface.
    println!("\nShutting down...");
    sim.exit();
    println!(
        "closed={}, final state: status={}, tick={}",
        interface.is_closed(),
        interface.state().status,
        interface.state().current_tick,
    );

    println!("\nDone.");
    Ok(())
}
