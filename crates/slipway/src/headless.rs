//! Running the simulation without a terminal.
//!
//! The headless runner drives [`Simulation`] with a fixed virtual clock, one
//! frame period per step, so a run is deterministic and finishes as fast as
//! the CPU allows. Snapshots reuse it to position the block before drawing
//! the scene into an [`SvgCanvas`].

use std::fmt;
use std::fmt::Write as _;

use serde::Serialize;
use tracing::{debug, info};

use crate::error::SimError;
use crate::panels::values_text;
use crate::render::{CANVAS_HEIGHT, CANVAS_WIDTH, RecordingCanvas, SvgCanvas, Viewport};
use crate::simulation::{FrameOutcome, Simulation, SimulationState};

/// How a headless run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunOutcome {
    /// The block reached the end of the incline.
    Completed,
    /// Friction holds the block; the loop was never started.
    Static,
    /// The time cap was reached while the block was still sliding.
    TimedOut,
}

impl fmt::Display for RunOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Completed => "completed",
            Self::Static => "static",
            Self::TimedOut => "timed out",
        })
    }
}

/// Result of a headless run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HeadlessReport {
    /// How the run ended.
    pub outcome: RunOutcome,
    /// Frames stepped.
    pub frames: u64,
    /// Simulated seconds integrated.
    pub elapsed_seconds: f64,
    /// State after the last frame.
    pub state: SimulationState,
}

impl HeadlessReport {
    /// The values table followed by a summary line.
    pub fn to_text(&self) -> String {
        let mut out = values_text(&self.state);
        out.push('\n');
        let _ = write!(
            out,
            "Outcome: {} after {} frames ({:.2} s)",
            self.outcome, self.frames, self.elapsed_seconds
        );
        out
    }

    /// The report as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns the serializer error, which only happens for non-finite numbers
    /// that the controller never produces.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Runs the loop at `fps` until the block stops or `max_seconds` of
/// simulated time have passed.
///
/// # Errors
///
/// Returns [`SimError::Busy`] if `state` could not be started.
pub fn run_headless(
    state: SimulationState,
    fps: u32,
    max_seconds: f64,
) -> Result<HeadlessReport, SimError> {
    let mut sim = Simulation::new(state);

    if sim.state().acceleration == 0.0 && sim.state().velocity == 0.0 {
        info!("friction holds the block; nothing to run");
        return Ok(report(&sim, RunOutcome::Static));
    }

    let max_seconds = max_seconds.max(0.0);
    let period_ms = incline::fps(fps.max(1)) * 1000.0;
    let mut viewport = Viewport::<RecordingCanvas>::detached();
    let mut now_ms = 0.0;
    let mut ticket = sim.start(now_ms)?;

    let outcome = loop {
        if sim.elapsed_seconds() >= max_seconds {
            sim.pause();
            break RunOutcome::TimedOut;
        }
        now_ms += period_ms;
        match sim.frame(ticket, now_ms, &mut viewport) {
            FrameOutcome::Continue(next) => ticket = next,
            FrameOutcome::Completed => break RunOutcome::Completed,
            FrameOutcome::Stale => unreachable!("the only ticket in flight is the pending one"),
        }
    };

    debug!(%outcome, frames = sim.frames(), "headless run finished");
    Ok(report(&sim, outcome))
}

fn report(sim: &Simulation, outcome: RunOutcome) -> HeadlessReport {
    HeadlessReport {
        outcome,
        frames: sim.frames(),
        elapsed_seconds: sim.elapsed_seconds(),
        state: *sim.state(),
    }
}

/// Draws the scene `seconds` into a run as an SVG document.
///
/// With `seconds` at zero the idle scene is drawn. Otherwise the loop runs
/// first, and if the block is still sliding when time is up the frame is
/// drawn as a running one, force vectors included.
///
/// # Errors
///
/// Propagates errors from [`run_headless`].
pub fn snapshot_svg(state: SimulationState, fps: u32, seconds: f64) -> Result<String, SimError> {
    let mut state = state;
    if seconds > 0.0 {
        let report = run_headless(state, fps, seconds)?;
        state = report.state;
        state.is_running = report.outcome == RunOutcome::TimedOut;
    }

    let mut viewport = Viewport::attached(SvgCanvas::new(CANVAS_WIDTH, CANVAS_HEIGHT));
    viewport.draw(&state);
    Ok(viewport
        .surface()
        .map(SvgCanvas::finish)
        .unwrap_or_default())
}
