//! Forces acting on a block resting on an inclined plane.
//!
//! All quantities are computed from three static parameters: mass, incline
//! angle and friction coefficient. Nothing here depends on the block's
//! current motion.

use core::f64::consts::PI;

use crate::math::{cos, sin};

/// Gravitational acceleration used throughout the model, in m/s².
pub const GRAVITY: f64 = 9.8;

/// Converts an angle in degrees to radians.
#[inline]
pub fn degrees_to_radians(degrees: f64) -> f64 {
    degrees * PI / 180.0
}

/// Forces on a block of a given mass on an incline, with the resulting
/// acceleration along the incline.
///
/// Net force is floored at zero: when friction is at least as large as the
/// driving component of gravity the block stays put. There is no separate
/// static/kinetic threshold, and friction never pushes the block back up.
///
/// # Example
///
/// ```rust
/// use incline::{Forces, Surface};
///
/// // Rubber at 10° holds a 1 kg block in place
/// let forces = Forces::compute(1.0, 10.0, Surface::Rubber.friction_coefficient());
/// assert_eq!(forces.net, 0.0);
/// assert_eq!(forces.acceleration, 0.0);
/// assert!(forces.is_static());
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Forces {
    /// Weight of the block, `m · g`, in newtons.
    pub gravity: f64,
    /// Normal (support reaction) force, `m · g · cos α`, in newtons.
    pub normal: f64,
    /// Friction force, `μ · N`, in newtons.
    pub friction: f64,
    /// Component of gravity along the incline, `m · g · sin α`, in newtons.
    pub driving: f64,
    /// Net force along the incline, `max(driving − friction, 0)`, in newtons.
    pub net: f64,
    /// Acceleration along the incline, `net / m`, in m/s².
    pub acceleration: f64,
}

impl Forces {
    /// Computes the forces for a block of `mass` kilograms on an incline of
    /// `angle_degrees` with friction coefficient `friction_coefficient`.
    ///
    /// The computation is total over positive masses; callers are expected
    /// to keep `mass > 0`.
    pub fn compute(mass: f64, angle_degrees: f64, friction_coefficient: f64) -> Self {
        let angle_rad = degrees_to_radians(angle_degrees);

        let gravity = mass * GRAVITY;
        let normal = mass * GRAVITY * cos(angle_rad);
        let friction = friction_coefficient * normal;
        let driving = mass * GRAVITY * sin(angle_rad);

        let unbalanced = driving - friction;
        let (net, acceleration) = if unbalanced > 0.0 {
            (unbalanced, unbalanced / mass)
        } else {
            (0.0, 0.0)
        };

        Self {
            gravity,
            normal,
            friction,
            driving,
            net,
            acceleration,
        }
    }

    /// Returns true when friction holds the block in place.
    #[inline]
    pub fn is_static(&self) -> bool {
        self.net == 0.0
    }
}
