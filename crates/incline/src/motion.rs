//! Frame-stepped sliding motion along the incline.
//!
//! Velocity is integrated in m/s; travel is kept in drawing units, scaled by
//! [`DISTANCE_SCALE`] so that the block visibly moves along a track of
//! [`SURFACE_LENGTH`] units.

/// Length of the incline, in drawing units.
pub const SURFACE_LENGTH: f64 = 700.0;

/// Drawing units travelled per metre.
pub const DISTANCE_SCALE: f64 = 50.0;

/// Largest time step accepted by [`integrate_step`], in seconds.
///
/// Larger gaps between frames (a suspended terminal, a backgrounded window)
/// are integrated as a single 0.1 s step.
pub const MAX_DELTA_TIME: f64 = 0.1;

/// Distance from the end of the incline at which the block stops, so that it
/// comes to rest fully on the surface.
pub const STOP_MARGIN: f64 = 42.0;

/// Travel at or beyond which motion terminates.
pub const STOP_POSITION: f64 = SURFACE_LENGTH - STOP_MARGIN;

/// Returns a time delta for a given number of frames per second.
///
/// Useful for driving the model with a fixed clock, e.g. in headless runs.
///
/// # Example
///
/// ```rust
/// use incline::fps;
///
/// assert!((fps(60) - 1.0 / 60.0).abs() < f64::EPSILON);
/// ```
#[inline]
pub fn fps(n: u32) -> f64 {
    1.0 / n as f64
}

/// Position and velocity of the block along the incline.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Kinematics {
    /// Travel from the top of the incline, in drawing units, within
    /// `[0, SURFACE_LENGTH]`.
    pub position: f64,
    /// Speed along the incline, in m/s.
    pub velocity: f64,
}

impl Kinematics {
    /// Creates kinematics with the given position and velocity.
    #[inline]
    pub const fn new(position: f64, velocity: f64) -> Self {
        Self { position, velocity }
    }

    /// The block at the top of the incline, not moving.
    #[inline]
    pub const fn at_rest() -> Self {
        Self {
            position: 0.0,
            velocity: 0.0,
        }
    }

    /// Returns true when the block has reached the stopping point.
    #[inline]
    pub fn at_end(&self) -> bool {
        self.position >= STOP_POSITION
    }
}

/// Result of a single integration step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Step {
    /// Kinematics after the step; position already clamped to the incline.
    pub kinematics: Kinematics,
    /// The time step actually integrated, after clamping.
    pub delta_time: f64,
    /// Whether the block reached the stopping point during this step.
    pub terminated: bool,
}

/// Advances the block by one frame.
///
/// `delta_time` is clamped to `[0, MAX_DELTA_TIME]`. Velocity is updated
/// first and the new velocity moves the block (semi-implicit Euler). The
/// resulting position is clamped to `[0, SURFACE_LENGTH]`; termination is
/// decided on the unclamped travel.
///
/// # Example
///
/// ```rust
/// use incline::{integrate_step, Kinematics};
///
/// let step = integrate_step(Kinematics::at_rest(), 4.0, 0.05);
///
/// assert!((step.kinematics.velocity - 0.2).abs() < 1e-12);
/// assert!((step.kinematics.position - 0.5).abs() < 1e-12);
/// assert!(!step.terminated);
/// ```
pub fn integrate_step(kinematics: Kinematics, acceleration: f64, delta_time: f64) -> Step {
    let dt = delta_time.clamp(0.0, MAX_DELTA_TIME);

    let velocity = kinematics.velocity + acceleration * dt;
    let raw_position = kinematics.position + velocity * dt * DISTANCE_SCALE;
    let position = raw_position.clamp(0.0, SURFACE_LENGTH);

    Step {
        kinematics: Kinematics { position, velocity },
        delta_time: dt,
        terminated: raw_position >= STOP_POSITION,
    }
}
