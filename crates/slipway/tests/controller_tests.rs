//! Integration tests for the simulation controller's life cycle.
//!
//! Frames are delivered by hand with explicit timestamps, the way the
//! terminal program's frame clock delivers them.

use incline::{MAX_DELTA_TIME, STOP_POSITION, SURFACE_LENGTH, Surface};
use slipway::render::{RecordingCanvas, Viewport};
use slipway::simulation::{FrameOutcome, FrameTicket, Phase, Simulation, SimulationState};
use slipway::SimError;

// =============================================================================
// HELPERS
// =============================================================================

fn sim(surface: Surface, mass: f64, angle: f64) -> Simulation {
    Simulation::new(SimulationState::new(surface, mass, angle).unwrap())
}

fn detached() -> Viewport<RecordingCanvas> {
    Viewport::detached()
}

/// Delivers frames every `period_ms` until the loop stops or `max` frames.
fn run(sim: &mut Simulation, mut ticket: FrameTicket, start_ms: f64, period_ms: f64, max: usize) -> usize {
    let mut viewport = detached();
    let mut now = start_ms;
    for n in 1..=max {
        now += period_ms;
        match sim.frame(ticket, now, &mut viewport) {
            FrameOutcome::Continue(next) => ticket = next,
            FrameOutcome::Completed | FrameOutcome::Stale => return n,
        }
    }
    max
}

// =============================================================================
// START / PAUSE / RESET
// =============================================================================

#[test]
fn start_schedules_exactly_one_frame() {
    let mut sim = sim(Surface::Ice, 1.0, 30.0);
    assert_eq!(sim.phase(), Phase::Idle);
    assert!(sim.pending_frame().is_none());

    let ticket = sim.start(0.0).unwrap();
    assert_eq!(sim.phase(), Phase::Running);
    assert_eq!(sim.pending_frame(), Some(ticket));

    let next = match sim.frame(ticket, 16.0, &mut detached()) {
        FrameOutcome::Continue(next) => next,
        other => panic!("expected continue, got {other:?}"),
    };
    assert_ne!(next, ticket);
    assert_eq!(sim.pending_frame(), Some(next));
}

#[test]
fn start_while_running_is_busy() {
    let mut sim = sim(Surface::Ice, 1.0, 30.0);
    sim.start(0.0).unwrap();
    assert_eq!(sim.start(10.0), Err(SimError::Busy));
}

#[test]
fn pause_invalidates_the_pending_frame() {
    let mut sim = sim(Surface::Ice, 1.0, 30.0);
    let ticket = sim.start(0.0).unwrap();

    assert!(sim.pause());
    assert!(!sim.pause());
    assert_eq!(sim.frame(ticket, 16.0, &mut detached()), FrameOutcome::Stale);
    assert_eq!(sim.state().position, 0.0);
    assert_eq!(sim.phase(), Phase::Idle);
}

#[test]
fn stale_frame_after_reset_does_not_move_the_block() {
    let mut sim = sim(Surface::Ice, 1.0, 30.0);
    let ticket = sim.start(0.0).unwrap();
    let in_flight = match sim.frame(ticket, 100.0, &mut detached()) {
        FrameOutcome::Continue(next) => next,
        other => panic!("expected continue, got {other:?}"),
    };
    assert!(sim.state().position > 0.0);

    sim.reset();
    assert_eq!(sim.frame(in_flight, 200.0, &mut detached()), FrameOutcome::Stale);

    let state = sim.state();
    assert_eq!(state.position, 0.0);
    assert_eq!(state.velocity, 0.0);
    assert!(!state.is_running);
    assert!(sim.pending_frame().is_none());
}

#[test]
fn reset_keeps_forces() {
    let mut sim = sim(Surface::Ice, 1.0, 30.0);
    let before = *sim.state();
    let ticket = sim.start(0.0).unwrap();
    run(&mut sim, ticket, 0.0, 16.0, 20);

    sim.reset();
    let after = sim.state();
    assert_eq!(after.acceleration, before.acceleration);
    assert_eq!(after.friction_force, before.friction_force);
    assert_eq!(after.net_force, before.net_force);
    assert_eq!(sim.frames(), 0);
    assert_eq!(sim.elapsed_seconds(), 0.0);
}

#[test]
fn resume_after_pause_continues_from_the_same_place() {
    let mut sim = sim(Surface::Wood, 2.0, 25.0);
    let ticket = sim.start(0.0).unwrap();
    run(&mut sim, ticket, 0.0, 16.0, 10);
    sim.pause();
    let paused_at = sim.state().position;

    // A long pause must not turn into one huge step.
    let ticket = sim.start(60_000.0).unwrap();
    sim.frame(ticket, 60_016.0, &mut detached());
    let step = sim.state().position - paused_at;
    assert!(step > 0.0);
    assert!(step < 5.0, "step was {step}");
}

// =============================================================================
// PARAMETERS
// =============================================================================

#[test]
fn parameters_are_locked_while_running() {
    let mut sim = sim(Surface::Ice, 1.0, 30.0);
    sim.start(0.0).unwrap();

    assert_eq!(sim.set_mass(2.0), Err(SimError::Busy));
    assert_eq!(sim.set_angle(10.0), Err(SimError::Busy));
    assert_eq!(sim.set_surface(Surface::Rubber), Err(SimError::Busy));
    assert_eq!(sim.state().mass, 1.0);

    sim.pause();
    sim.set_mass(2.0).unwrap();
    assert!((sim.state().gravity_force - 19.6).abs() < 1e-9);
}

#[test]
fn out_of_range_parameters_are_rejected() {
    let mut sim = Simulation::default();
    assert_eq!(sim.set_mass(0.0), Err(SimError::MassOutOfRange(0.0)));
    assert_eq!(sim.set_mass(10.5), Err(SimError::MassOutOfRange(10.5)));
    assert_eq!(sim.set_angle(-1.0), Err(SimError::AngleOutOfRange(-1.0)));
    assert_eq!(sim.set_angle(45.0), Err(SimError::AngleOutOfRange(45.0)));
    assert_eq!(*sim.state(), SimulationState::default());
}

// =============================================================================
// FRAMES
// =============================================================================

#[test]
fn large_gaps_are_clamped() {
    let mut sim = sim(Surface::Ice, 1.0, 30.0);
    let ticket = sim.start(0.0).unwrap();
    sim.frame(ticket, 5_000.0, &mut detached());

    assert!((sim.elapsed_seconds() - MAX_DELTA_TIME).abs() < 1e-12);
    let expected_velocity = sim.state().acceleration * MAX_DELTA_TIME;
    assert!((sim.state().velocity - expected_velocity).abs() < 1e-12);
}

#[test]
fn run_ends_at_the_stop_position() {
    let mut sim = sim(Surface::Ice, 1.0, 30.0);
    let ticket = sim.start(0.0).unwrap();
    let frames = run(&mut sim, ticket, 0.0, 1000.0 / 60.0, 10_000);

    assert!(frames < 10_000);
    let state = sim.state();
    assert!(state.position >= STOP_POSITION);
    assert!(state.position <= SURFACE_LENGTH);
    assert!(!state.is_running);
    assert_eq!(sim.phase(), Phase::Completed);
    assert!(sim.pending_frame().is_none());
}

#[test]
fn static_block_stays_put() {
    let mut sim = sim(Surface::Rubber, 1.0, 10.0);
    assert_eq!(sim.state().acceleration, 0.0);

    let ticket = sim.start(0.0).unwrap();
    assert_eq!(run(&mut sim, ticket, 0.0, 16.0, 50), 50);
    assert_eq!(sim.state().position, 0.0);
    assert_eq!(sim.state().velocity, 0.0);
    assert!(sim.state().is_running);
}

#[test]
fn position_never_decreases_while_running() {
    let mut sim = sim(Surface::Metal, 3.0, 30.0);
    let mut ticket = sim.start(0.0).unwrap();
    let mut viewport = detached();
    let mut last = 0.0;
    let mut now = 0.0;

    loop {
        now += 7.0;
        let outcome = sim.frame(ticket, now, &mut viewport);
        assert!(sim.state().position >= last);
        last = sim.state().position;
        match outcome {
            FrameOutcome::Continue(next) => ticket = next,
            _ => break,
        }
    }
}

#[test]
fn frames_draw_into_an_attached_viewport() {
    let mut sim = sim(Surface::Ice, 1.0, 30.0);
    let mut viewport = Viewport::attached(RecordingCanvas::new(1000.0, 600.0));
    let ticket = sim.start(0.0).unwrap();

    sim.frame(ticket, 16.0, &mut viewport);
    let canvas = viewport.surface().unwrap();
    assert_eq!(canvas.texts(), vec!["1kg", "G", "N", "Ff"]);
}
