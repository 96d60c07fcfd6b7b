#![forbid(unsafe_code)]
#![cfg_attr(not(feature = "std"), no_std)]
// Allow these clippy lints for physics/math code readability
#![allow(clippy::must_use_candidate)]
#![allow(clippy::suboptimal_flops)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::use_self)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::struct_field_names)]

//! # Incline
//!
//! Physics of a block sliding down a straight inclined plane.
//!
//! Incline provides:
//! - **Surface**: the closed set of surface materials and their friction coefficients
//! - **Forces**: gravity, normal, friction and net force for a mass on the incline
//! - **Motion**: a clamped, frame-stepped integration of velocity and travel
//! - **Geometry**: 2D points and vectors for projecting travel onto a drawing surface
//!
//! The model has exactly one degree of freedom: distance travelled along the
//! incline. Friction can hold the block in place but never pushes it back up.
//!
//! ## Forces Example
//!
//! ```rust
//! use incline::{Forces, Surface};
//!
//! let forces = Forces::compute(1.0, 30.0, Surface::Ice.friction_coefficient());
//!
//! assert!((forces.gravity - 9.8).abs() < 1e-9);
//! assert!((forces.acceleration - 4.48).abs() < 0.01);
//! ```
//!
//! ## Motion Example
//!
//! ```rust
//! use incline::{fps, integrate_step, Forces, Kinematics, Surface};
//!
//! let forces = Forces::compute(2.0, 25.0, Surface::Wood.friction_coefficient());
//! let mut kinematics = Kinematics::at_rest();
//!
//! // Step at 60 FPS until the block reaches the end of the incline
//! loop {
//!     let step = integrate_step(kinematics, forces.acceleration, fps(60));
//!     kinematics = step.kinematics;
//!     if step.terminated {
//!         break;
//!     }
//! }
//!
//! assert!(kinematics.position >= incline::STOP_POSITION);
//! ```

mod forces;
mod geometry;
mod math;
mod motion;
mod surface;

pub use forces::{Forces, GRAVITY, degrees_to_radians};
pub use geometry::{InclineGeometry, Point, Vector};
pub use motion::{
    DISTANCE_SCALE, Kinematics, MAX_DELTA_TIME, STOP_MARGIN, STOP_POSITION, SURFACE_LENGTH, Step,
    fps, integrate_step,
};
pub use surface::{ParseSurfaceError, Surface};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::forces::{Forces, GRAVITY};
    pub use crate::geometry::{InclineGeometry, Point, Vector};
    pub use crate::motion::{Kinematics, Step, fps, integrate_step};
    pub use crate::surface::Surface;
}
