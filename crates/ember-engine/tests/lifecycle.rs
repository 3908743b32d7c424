//! Integration tests: engine lifecycle, tick bounds, pacing, and
//! cancellation through the public API.
//!
//! Every test steers a real thread pair through the interface and
//! observes only published state, the way an external caller would.

use std::sync::Arc;
use std::time::{Duration, Instant};

use ember_core::{
    Coordinates, Dimension, SimulationStatePatch, SimulationStatus, SimulationType,
};
use ember_engine::{Simulation, SimulationConfig, SimulationInterface, SubmitError};
use ember_map::{Subject, SubjectQuery};

// ── helpers ──────────────────────────────────────────────────────────

/// Poll `cond` every few milliseconds until it holds, panicking with
/// `what` if the deadline passes first.
fn wait_for(what: &str, deadline: Duration, cond: impl Fn() -> bool) {
    let limit = Instant::now() + deadline;
    while !cond() {
        if Instant::now() > limit {
            panic!("timed out waiting for {what}");
        }
        std::thread::sleep(Duration::from_millis(2));
    }
}

fn finite_config(dimension: Dimension, last_tick: u64, hz: f64) -> SimulationConfig {
    let mut config = SimulationConfig::new(dimension);
    config.initial_state.sim_type = SimulationType::Finite;
    config.initial_state.status = SimulationStatus::Running;
    config.initial_state.last_tick = last_tick;
    config.initial_state.task_frequency = hz;
    config
}

fn running_infinite_config(dimension: Dimension, hz: f64) -> SimulationConfig {
    let mut config = SimulationConfig::new(dimension);
    config.initial_state.status = SimulationStatus::Running;
    config.initial_state.task_frequency = hz;
    config
}

// ── finite runs ──────────────────────────────────────────────────────

#[test]
fn finite_run_stops_at_its_final_tick() {
    let interface = Arc::new(SimulationInterface::new());
    let config = finite_config(Dimension::new(3, 3), 2, 1000.0);
    let mut sim = Simulation::run(config, Arc::clone(&interface)).unwrap();

    // The pre-run default state is also Stopped, so the predicate must
    // include the tick count to know the run actually happened. The map
    // tick is included too: state is published a moment before the map
    // within an iteration.
    wait_for("finite run to stop", Duration::from_secs(5), || {
        interface.state().status == SimulationStatus::Stopped
            && interface.map().is_some_and(|m| m.tick() == 2)
    });
    assert_eq!(interface.state().current_tick, 2);
    let map = interface.map().expect("map published");
    assert_eq!(map.tick(), 2, "exactly two physics passes");
    assert_eq!(map.dimension(), Dimension::new(3, 3));

    sim.exit();
    assert!(interface.is_closed());
    // Exit preserves the completed tick count.
    assert_eq!(interface.state().current_tick, 2);
}

#[test]
fn tick_count_is_exact_not_approximate() {
    let interface = Arc::new(SimulationInterface::new());
    let config = finite_config(Dimension::new(2, 2), 50, 2000.0);
    let mut sim = Simulation::run(config, Arc::clone(&interface)).unwrap();

    wait_for("50-tick run to stop", Duration::from_secs(10), || {
        let state = interface.state();
        state.status == SimulationStatus::Stopped && state.current_tick > 0
    });

    assert_eq!(interface.state().current_tick, 50);
    // The stopped engine stays put.
    std::thread::sleep(Duration::from_millis(30));
    assert_eq!(interface.state().current_tick, 50);
    assert_eq!(interface.map().unwrap().tick(), 50);

    sim.exit();
}

#[test]
fn every_advance_pairs_with_exactly_one_physics_pass() {
    let interface = Arc::new(SimulationInterface::new());
    let config = finite_config(Dimension::new(2, 2), 40, 2000.0);
    let mut sim = Simulation::run(config, Arc::clone(&interface)).unwrap();

    // Map tick never exceeds the published tick counter. Sampling the
    // map before the state keeps the comparison race-free: the counter
    // can only grow between the two reads.
    let deadline = Instant::now() + Duration::from_secs(10);
    loop {
        if let Some(map) = interface.map() {
            let state = interface.state();
            assert!(
                map.tick() <= state.current_tick,
                "map tick {} ahead of state tick {}",
                map.tick(),
                state.current_tick
            );
            if state.status == SimulationStatus::Stopped {
                break;
            }
        }
        if Instant::now() > deadline {
            panic!("timed out waiting for the run to stop");
        }
        std::thread::sleep(Duration::from_millis(1));
    }

    // At rest the pair agrees: one slave pass per advance, none lost.
    assert_eq!(interface.state().current_tick, 40);
    wait_for("final snapshot", Duration::from_secs(5), || {
        interface.map().unwrap().tick() == 40
    });

    sim.exit();
}

#[test]
fn finite_run_resumes_when_repatched() {
    let interface = Arc::new(SimulationInterface::new());
    let config = finite_config(Dimension::new(2, 2), 2, 1000.0);
    let mut sim = Simulation::run(config, Arc::clone(&interface)).unwrap();

    wait_for("first leg to stop", Duration::from_secs(5), || {
        interface.state().status == SimulationStatus::Stopped
            && interface.state().current_tick == 2
    });

    // Raise the bound and restart: the stopped pair is idle, not dead.
    interface
        .submit_patch(SimulationStatePatch {
            status: Some(SimulationStatus::Running),
            last_tick: Some(4),
            ..Default::default()
        })
        .unwrap();

    wait_for("second leg to stop", Duration::from_secs(5), || {
        interface.state().status == SimulationStatus::Stopped
            && interface.state().current_tick == 4
            && interface.map().is_some_and(|m| m.tick() == 4)
    });

    sim.exit();
}

// ── infinite runs and patches ────────────────────────────────────────

#[test]
fn infinite_run_ticks_until_stopped() {
    let interface = Arc::new(SimulationInterface::new());
    let config = running_infinite_config(Dimension::new(2, 2), 1000.0);
    let mut sim = Simulation::run(config, Arc::clone(&interface)).unwrap();

    wait_for("a few ticks", Duration::from_secs(5), || {
        interface.state().current_tick >= 3
    });

    interface
        .submit_patch(SimulationStatePatch {
            status: Some(SimulationStatus::Stopped),
            ..Default::default()
        })
        .unwrap();
    wait_for("stop patch to land", Duration::from_secs(5), || {
        interface.state().status == SimulationStatus::Stopped
    });

    // Once the published status is Stopped, the counter is frozen.
    let frozen = interface.state().current_tick;
    std::thread::sleep(Duration::from_millis(30));
    assert_eq!(interface.state().current_tick, frozen);

    sim.exit();
}

#[test]
fn patches_submitted_before_run_arm_the_first_iteration() {
    let interface = Arc::new(SimulationInterface::new());
    interface
        .submit_patch(SimulationStatePatch {
            sim_type: Some(SimulationType::Finite),
            status: Some(SimulationStatus::Running),
            last_tick: Some(3),
            task_frequency: Some(1000.0),
            ..Default::default()
        })
        .unwrap();

    let mut sim = Simulation::run(
        SimulationConfig::new(Dimension::new(2, 2)),
        Arc::clone(&interface),
    )
    .unwrap();

    wait_for("pre-armed run to finish", Duration::from_secs(5), || {
        interface.state().status == SimulationStatus::Stopped
            && interface.state().current_tick == 3
    });

    sim.exit();
}

#[test]
fn later_patch_wins_within_one_drain() {
    let interface = Arc::new(SimulationInterface::new());
    // Both land before the engine starts, so one drain folds them.
    for last_tick in [10, 2] {
        interface
            .submit_patch(SimulationStatePatch {
                sim_type: Some(SimulationType::Finite),
                status: Some(SimulationStatus::Running),
                last_tick: Some(last_tick),
                task_frequency: Some(1000.0),
                ..Default::default()
            })
            .unwrap();
    }

    let mut sim = Simulation::run(
        SimulationConfig::new(Dimension::new(2, 2)),
        Arc::clone(&interface),
    )
    .unwrap();

    // Stopped with a nonzero tick distinguishes a completed run from
    // the pre-run default, which is also Stopped at tick 0.
    wait_for("run to stop", Duration::from_secs(5), || {
        let state = interface.state();
        state.status == SimulationStatus::Stopped && state.current_tick > 0
    });
    assert_eq!(interface.state().current_tick, 2);

    sim.exit();
}

// ── subject queries ──────────────────────────────────────────────────

#[test]
fn queries_drain_in_order_even_while_stopped() {
    let interface = Arc::new(SimulationInterface::new());
    let at = Coordinates::new(1, 1);
    interface
        .push_query(SubjectQuery::place(at, Subject::new(7)))
        .unwrap();
    interface.push_query(SubjectQuery::clear(at)).unwrap();
    interface
        .push_query(SubjectQuery::place(at, Subject::new(9)))
        .unwrap();

    // Default state is Stopped: queries must still be absorbed.
    let mut sim = Simulation::run(
        SimulationConfig::new(Dimension::new(3, 3)),
        Arc::clone(&interface),
    )
    .unwrap();

    wait_for("queries to be absorbed", Duration::from_secs(5), || {
        interface.map().is_some_and(|m| m.revision() >= 3)
    });

    let map = interface.map().unwrap();
    assert_eq!(map.revision(), 3);
    assert_eq!(map.subject(at), Some(&Subject::new(9)), "last query wins");
    assert_eq!(map.tick(), 0, "no physics while stopped");

    sim.exit();
}

// ── resize ───────────────────────────────────────────────────────────

#[test]
fn resize_replaces_the_grid_at_an_iteration_boundary() {
    let interface = Arc::new(SimulationInterface::new());
    let config = running_infinite_config(Dimension::new(2, 2), 1000.0);
    let mut sim = Simulation::run(config, Arc::clone(&interface)).unwrap();

    wait_for("initial map", Duration::from_secs(5), || {
        interface.dimension() == Some(Dimension::new(2, 2))
    });

    interface.set_dimension(Dimension::new(5, 4)).unwrap();
    wait_for("resized map", Duration::from_secs(5), || {
        interface.dimension() == Some(Dimension::new(5, 4))
    });

    // Physics continues on the replacement grid.
    let after_resize = interface.map().unwrap().tick();
    wait_for("ticking to continue", Duration::from_secs(5), || {
        interface.map().unwrap().tick() > after_resize
    });

    sim.exit();
}

#[test]
fn resize_drops_queries_stranded_out_of_range() {
    let interface = Arc::new(SimulationInterface::new());
    // Both queries target the configured 5x5 grid, but the resize is
    // taken first, so (4, 4) is out of range by drain time. The master
    // must shed it and keep running.
    interface
        .push_query(SubjectQuery::place(Coordinates::new(4, 4), Subject::new(1)))
        .unwrap();
    interface
        .push_query(SubjectQuery::place(Coordinates::new(1, 1), Subject::new(2)))
        .unwrap();
    interface.set_dimension(Dimension::new(2, 2)).unwrap();

    let mut sim = Simulation::run(
        SimulationConfig::new(Dimension::new(5, 5)),
        Arc::clone(&interface),
    )
    .unwrap();

    wait_for("surviving query to land", Duration::from_secs(5), || {
        interface.map().is_some_and(|m| m.revision() >= 1)
    });

    let map = interface.map().unwrap();
    assert_eq!(map.dimension(), Dimension::new(2, 2));
    assert_eq!(map.subject(Coordinates::new(1, 1)), Some(&Subject::new(2)));
    assert_eq!(map.revision(), 1, "stranded query never applied");

    sim.exit();
    assert!(interface.is_closed(), "master survived the stale query");
}

// ── cancellation and pacing ──────────────────────────────────────────

#[test]
fn exit_mid_run_returns_promptly() {
    let interface = Arc::new(SimulationInterface::new());
    let config = running_infinite_config(Dimension::new(3, 3), 1000.0);
    let mut sim = Simulation::run(config, Arc::clone(&interface)).unwrap();

    wait_for("run to start ticking", Duration::from_secs(5), || {
        interface.state().current_tick > 0
    });

    let start = Instant::now();
    sim.exit();
    assert!(
        start.elapsed() < Duration::from_secs(2),
        "exit took {:?}",
        start.elapsed()
    );
    assert!(interface.is_closed());
    assert_eq!(interface.state().status, SimulationStatus::Stopped);
    assert_eq!(
        interface.submit_patch(SimulationStatePatch::default()),
        Err(SubmitError::Shutdown)
    );
}

#[test]
fn master_panic_still_closes_the_interface() {
    let interface = Arc::new(SimulationInterface::new());
    let mut config = SimulationConfig::new(Dimension::new(2, 2));
    // A seeder that dies takes the master thread down mid-iteration.
    config.seeder = Some(Box::new(|_| panic!("seeder failure")));
    let mut sim = Simulation::run(config, Arc::clone(&interface)).unwrap();

    // wait() must return (the thread is dead), and the death must be
    // observable from outside: the interface reads closed and every
    // submission path bounces.
    sim.wait();
    assert!(interface.is_closed());
    assert_eq!(
        interface.submit_patch(SimulationStatePatch::default()),
        Err(SubmitError::Shutdown)
    );
    assert_eq!(
        interface.push_query(SubjectQuery::clear(Coordinates::new(0, 0))),
        Err(SubmitError::Shutdown)
    );
}

#[test]
fn exit_is_not_gated_on_the_tick_budget() {
    // 0.5 Hz means a 2-second pacing sleep per iteration. Cancellation
    // unparks the master, so exit must return well under that.
    let interface = Arc::new(SimulationInterface::new());
    let config = running_infinite_config(Dimension::new(2, 2), 0.5);
    let mut sim = Simulation::run(config, Arc::clone(&interface)).unwrap();

    wait_for("first publish", Duration::from_secs(5), || {
        interface.map().is_some()
    });
    // Give the master time to enter its pacing sleep.
    std::thread::sleep(Duration::from_millis(50));

    let start = Instant::now();
    sim.exit();
    assert!(
        start.elapsed() < Duration::from_millis(500),
        "exit took {:?} against a 2s tick budget",
        start.elapsed()
    );
}

#[test]
fn metrics_track_iterations_and_ticks() {
    let interface = Arc::new(SimulationInterface::new());
    let config = finite_config(Dimension::new(2, 2), 5, 1000.0);
    let mut sim = Simulation::run(config, Arc::clone(&interface)).unwrap();

    // Wait on the metrics themselves: default metrics also read
    // ticked=false, so the iteration count is what proves the run ran.
    wait_for("idle iteration metrics", Duration::from_secs(5), || {
        let metrics = interface.metrics();
        metrics.iteration >= 5 && !metrics.ticked
    });

    let metrics = interface.metrics();
    assert!(metrics.iteration >= 5, "at least one iteration per tick");
    assert_eq!(metrics.patch_count, 0);

    sim.exit();
}
