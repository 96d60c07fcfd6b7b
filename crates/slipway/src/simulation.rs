//! Simulation state and the per-frame controller.
//!
//! [`SimulationState`] holds every value the views display. It is advanced by
//! [`advance`], a pure function, and owned by [`Simulation`], which adds the
//! Idle/Running life cycle and frame scheduling.
//!
//! # Frame scheduling
//!
//! The controller never sleeps or spawns anything. Starting the loop returns
//! a [`FrameTicket`]; the host delivers that ticket back through
//! [`Simulation::frame`] once its frame clock fires. At most one ticket is
//! pending at a time, and pausing or resetting invalidates it, so a frame
//! that was already in flight is ignored instead of mutating reset state.
//!
//! ```rust
//! use slipway::render::{RecordingCanvas, Viewport};
//! use slipway::simulation::{FrameOutcome, Simulation, SimulationState};
//! use incline::Surface;
//!
//! let state = SimulationState::new(Surface::Ice, 1.0, 30.0).unwrap();
//! let mut sim = Simulation::new(state);
//! let mut viewport = Viewport::<RecordingCanvas>::detached();
//!
//! let mut ticket = sim.start(0.0).unwrap();
//! let mut now = 0.0;
//! loop {
//!     now += 16.0;
//!     match sim.frame(ticket, now, &mut viewport) {
//!         FrameOutcome::Continue(next) => ticket = next,
//!         FrameOutcome::Completed => break,
//!         FrameOutcome::Stale => unreachable!(),
//!     }
//! }
//!
//! assert!(!sim.state().is_running);
//! ```

use std::fmt;

use incline::{Forces, Kinematics, Step, Surface, integrate_step};
use serde::Serialize;
use tracing::{debug, info, trace};

use crate::error::SimError;
use crate::render::{Canvas, Viewport};

/// Smallest accepted mass, in kilograms.
pub const MASS_MIN: f64 = 0.1;
/// Largest accepted mass, in kilograms.
pub const MASS_MAX: f64 = 10.0;
/// Granularity of mass adjustments from the controls.
pub const MASS_STEP: f64 = 0.1;
/// Smallest accepted incline angle, in degrees.
pub const ANGLE_MIN: f64 = 0.0;
/// Largest accepted incline angle, in degrees.
pub const ANGLE_MAX: f64 = 30.0;
/// Granularity of angle adjustments from the controls.
pub const ANGLE_STEP: f64 = 1.0;

/// Everything the simulator knows about the block and the incline.
///
/// Force and acceleration fields are derived from `mass`, `angle_degrees` and
/// `surface` and are recomputed whenever one of those changes. `position` and
/// `velocity` only change inside a frame step or on reset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SimulationState {
    /// Selected surface material.
    pub surface: Surface,
    /// Friction coefficient of `surface`.
    pub friction_coefficient: f64,
    /// Mass of the block, in kilograms.
    pub mass: f64,
    /// Incline angle, in degrees.
    pub angle_degrees: f64,
    /// Travel along the incline, in drawing units.
    pub position: f64,
    /// Speed along the incline, in m/s.
    pub velocity: f64,
    /// Acceleration along the incline, in m/s².
    pub acceleration: f64,
    /// Weight, in newtons.
    pub gravity_force: f64,
    /// Normal force, in newtons.
    pub normal_force: f64,
    /// Friction force, in newtons.
    pub friction_force: f64,
    /// Net force along the incline, in newtons; never negative.
    pub net_force: f64,
    /// Whether the loop is advancing.
    pub is_running: bool,
}

impl Default for SimulationState {
    fn default() -> Self {
        let mut state = Self {
            surface: Surface::Wood,
            friction_coefficient: Surface::Wood.friction_coefficient(),
            mass: 1.0,
            angle_degrees: 0.0,
            position: 0.0,
            velocity: 0.0,
            acceleration: 0.0,
            gravity_force: 0.0,
            normal_force: 0.0,
            friction_force: 0.0,
            net_force: 0.0,
            is_running: false,
        };
        state.recompute_forces();
        state
    }
}

impl SimulationState {
    /// Creates a state at rest with the given parameters.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::MassOutOfRange`] or [`SimError::AngleOutOfRange`]
    /// when a parameter is outside the accepted range.
    pub fn new(surface: Surface, mass: f64, angle_degrees: f64) -> Result<Self, SimError> {
        validate_mass(mass)?;
        validate_angle(angle_degrees)?;

        let mut state = Self {
            surface,
            friction_coefficient: surface.friction_coefficient(),
            mass,
            angle_degrees,
            ..Self::default()
        };
        state.recompute_forces();
        Ok(state)
    }

    /// Returns the forces implied by the current parameters.
    pub fn forces(&self) -> Forces {
        Forces::compute(self.mass, self.angle_degrees, self.friction_coefficient)
    }

    /// Returns position and velocity.
    pub const fn kinematics(&self) -> Kinematics {
        Kinematics::new(self.position, self.velocity)
    }

    /// Returns the life-cycle phase derived from `is_running` and `position`.
    pub fn phase(&self) -> Phase {
        if self.is_running {
            Phase::Running
        } else if self.kinematics().at_end() {
            Phase::Completed
        } else {
            Phase::Idle
        }
    }

    fn recompute_forces(&mut self) {
        let forces = self.forces();
        self.gravity_force = forces.gravity;
        self.normal_force = forces.normal;
        self.friction_force = forces.friction;
        self.net_force = forces.net;
        self.acceleration = forces.acceleration;
    }
}

/// Advances `state` by `delta_seconds` and returns the next state together
/// with the integration step that produced it.
///
/// The returned state still has `is_running` as given; stopping on
/// termination is the caller's decision.
pub fn advance(state: &SimulationState, delta_seconds: f64) -> (SimulationState, Step) {
    let step = integrate_step(state.kinematics(), state.acceleration, delta_seconds);
    let next = SimulationState {
        position: step.kinematics.position,
        velocity: step.kinematics.velocity,
        ..*state
    };
    (next, step)
}

/// Life-cycle phase of the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Not running and not at the end of the incline.
    Idle,
    /// Advancing once per frame.
    Running,
    /// Stopped at the end of the incline.
    Completed,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Completed => "completed",
        })
    }
}

/// Identifies one scheduled frame.
///
/// Tickets are never reused within a [`Simulation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameTicket(u64);

impl FrameTicket {
    /// Returns the ticket's sequence number.
    pub const fn id(self) -> u64 {
        self.0
    }
}

/// What happened when a frame was delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// The ticket was not the pending one; nothing changed.
    Stale,
    /// The state advanced; schedule the returned ticket.
    Continue(FrameTicket),
    /// The block reached the end of the incline and the loop stopped.
    Completed,
}

/// Owns the simulation state and drives it one frame at a time.
#[derive(Debug, Clone)]
pub struct Simulation {
    state: SimulationState,
    pending: Option<FrameTicket>,
    next_ticket: u64,
    last_timestamp_ms: f64,
    elapsed_seconds: f64,
    frames: u64,
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new(SimulationState::default())
    }
}

impl Simulation {
    /// Creates a controller for `state`. The loop starts stopped, whatever
    /// `state.is_running` says.
    pub fn new(state: SimulationState) -> Self {
        Self {
            state: SimulationState {
                is_running: false,
                ..state
            },
            pending: None,
            next_ticket: 0,
            last_timestamp_ms: 0.0,
            elapsed_seconds: 0.0,
            frames: 0,
        }
    }

    /// Returns the current state.
    pub const fn state(&self) -> &SimulationState {
        &self.state
    }

    /// Returns the current life-cycle phase.
    pub fn phase(&self) -> Phase {
        self.state.phase()
    }

    /// Returns the ticket of the frame currently scheduled, if any.
    pub const fn pending_frame(&self) -> Option<FrameTicket> {
        self.pending
    }

    /// Simulated seconds integrated since the last reset.
    pub const fn elapsed_seconds(&self) -> f64 {
        self.elapsed_seconds
    }

    /// Frames stepped since the last reset.
    pub const fn frames(&self) -> u64 {
        self.frames
    }

    /// Starts the loop, using `now_ms` as the reference for the first frame's
    /// time delta, and returns the ticket of the first frame.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Busy`] if the loop is already running.
    pub fn start(&mut self, now_ms: f64) -> Result<FrameTicket, SimError> {
        if self.state.is_running {
            return Err(SimError::Busy);
        }

        self.state.is_running = true;
        self.last_timestamp_ms = now_ms;
        let ticket = self.issue_ticket();
        info!(
            surface = %self.state.surface,
            mass = self.state.mass,
            angle = self.state.angle_degrees,
            acceleration = self.state.acceleration,
            "simulation started"
        );
        Ok(ticket)
    }

    /// Stops the loop and cancels the pending frame. Returns whether the loop
    /// was running.
    pub fn pause(&mut self) -> bool {
        let was_running = self.state.is_running;
        self.state.is_running = false;
        self.pending = None;
        if was_running {
            info!(position = self.state.position, "simulation paused");
        }
        was_running
    }

    /// Starts the loop when stopped, pauses it when running. Returns the
    /// ticket to schedule when the loop was started.
    pub fn toggle(&mut self, now_ms: f64) -> Option<FrameTicket> {
        if self.pause() {
            None
        } else {
            self.start(now_ms).ok()
        }
    }

    /// Cancels any pending frame, stops the loop and moves the block back to
    /// the top of the incline. Forces are left untouched.
    pub fn reset(&mut self) {
        self.pending = None;
        self.state.is_running = false;
        self.state.position = 0.0;
        self.state.velocity = 0.0;
        self.elapsed_seconds = 0.0;
        self.frames = 0;
        info!("simulation reset");
    }

    /// Selects a surface and recomputes forces.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Busy`] while running.
    pub fn set_surface(&mut self, surface: Surface) -> Result<(), SimError> {
        self.ensure_idle()?;
        self.state.surface = surface;
        self.state.friction_coefficient = surface.friction_coefficient();
        self.state.recompute_forces();
        debug!(%surface, "surface changed");
        Ok(())
    }

    /// Sets the mass and recomputes forces.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Busy`] while running and
    /// [`SimError::MassOutOfRange`] outside `0.1..=10`.
    pub fn set_mass(&mut self, mass: f64) -> Result<(), SimError> {
        self.ensure_idle()?;
        validate_mass(mass)?;
        self.state.mass = mass;
        self.state.recompute_forces();
        debug!(mass, "mass changed");
        Ok(())
    }

    /// Sets the incline angle and recomputes forces.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Busy`] while running and
    /// [`SimError::AngleOutOfRange`] outside `0..=30`.
    pub fn set_angle(&mut self, angle_degrees: f64) -> Result<(), SimError> {
        self.ensure_idle()?;
        validate_angle(angle_degrees)?;
        self.state.angle_degrees = angle_degrees;
        self.state.recompute_forces();
        debug!(angle = angle_degrees, "angle changed");
        Ok(())
    }

    /// Delivers a frame at `now_ms`.
    ///
    /// If `ticket` is the pending one, the state is advanced by the time
    /// since the previous frame, drawn into `viewport`, and either the next
    /// ticket is issued or the loop stops at the end of the incline.
    pub fn frame<C: Canvas>(
        &mut self,
        ticket: FrameTicket,
        now_ms: f64,
        viewport: &mut Viewport<C>,
    ) -> FrameOutcome {
        if self.pending != Some(ticket) || !self.state.is_running {
            trace!(ticket = ticket.id(), "ignoring stale frame");
            return FrameOutcome::Stale;
        }
        self.pending = None;

        let delta_seconds = (now_ms - self.last_timestamp_ms) / 1000.0;
        self.last_timestamp_ms = now_ms;

        let (next, step) = advance(&self.state, delta_seconds);
        self.state = next;
        self.elapsed_seconds += step.delta_time;
        self.frames += 1;
        trace!(
            frame = self.frames,
            dt = step.delta_time,
            position = self.state.position,
            velocity = self.state.velocity,
            "frame"
        );

        viewport.draw(&self.state);

        if step.terminated {
            self.state.is_running = false;
            info!(
                frames = self.frames,
                elapsed = self.elapsed_seconds,
                velocity = self.state.velocity,
                "reached the end of the incline"
            );
            return FrameOutcome::Completed;
        }

        FrameOutcome::Continue(self.issue_ticket())
    }

    fn issue_ticket(&mut self) -> FrameTicket {
        let ticket = FrameTicket(self.next_ticket);
        self.next_ticket += 1;
        self.pending = Some(ticket);
        ticket
    }

    const fn ensure_idle(&self) -> Result<(), SimError> {
        if self.state.is_running {
            Err(SimError::Busy)
        } else {
            Ok(())
        }
    }
}

fn validate_mass(mass: f64) -> Result<(), SimError> {
    if (MASS_MIN..=MASS_MAX).contains(&mass) {
        Ok(())
    } else {
        Err(SimError::MassOutOfRange(mass))
    }
}

fn validate_angle(angle_degrees: f64) -> Result<(), SimError> {
    if (ANGLE_MIN..=ANGLE_MAX).contains(&angle_degrees) {
        Ok(())
    } else {
        Err(SimError::AngleOutOfRange(angle_degrees))
    }
}

/// Rounds `value` to the nearest multiple of `step`.
///
/// Keeps repeated `+0.1` adjustments from drifting (`0.30000000000000004`).
pub fn snap_to_step(value: f64, step: f64) -> f64 {
    (value / step).round() / step.recip()
}
