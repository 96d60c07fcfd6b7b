#![forbid(unsafe_code)]
// Allow these clippy lints for drawing and physics code readability
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::suboptimal_flops)]
#![allow(clippy::float_cmp)]
#![allow(clippy::module_name_repetitions)]

//! # Slipway
//!
//! An inclined-plane friction simulator: a block slides down a straight
//! incline under gravity and Coulomb friction, drawn with its force vectors.
//!
//! The physics lives in the [`incline`] crate. This crate adds:
//!
//! - [`simulation`] - the state record and the Idle/Running controller with
//!   cancellable frame tickets
//! - [`render`] - the scene renderer and its SVG, terminal and recording
//!   canvases
//! - [`panels`] - values, formulas and controls panels
//! - [`app`], [`program`] - the interactive terminal front-end
//! - [`headless`] - fixed-clock runs and SVG snapshots
//! - [`cli`], [`config`], [`logging`] - the binary's ambient plumbing
//! - [`simulator`] - a virtual-clock driver for testing models

pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod headless;
pub mod keymap;
pub mod logging;
pub mod messages;
pub mod panels;
pub mod program;
pub mod render;
pub mod simulation;
pub mod simulator;

pub use error::{LoggingError, SimError};
pub use simulation::{Phase, Simulation, SimulationState};
