//! The interactive simulator page.
//!
//! [`App`] is the [`Model`] run by [`Program`](crate::program::Program): the
//! scene fills the terminal, the panels float over it, and the last line is
//! a status bar. Every key action and frame redraws the scene into a
//! [`CellCanvas`] sized to the terminal.

use tracing::debug;
use unicode_width::UnicodeWidthChar;

use crate::config::{Config, Panels};
use crate::error::SimError;
use crate::keymap::{Action, HELP, action_for};
use crate::messages::{FrameMsg, Msg};
use crate::panels::{Panel, controls_panel, formulas_panel, values_panel};
use crate::program::{Cmd, Model};
use crate::render::{CellCanvas, CellGrid, Rgb, Viewport};
use crate::simulation::{
    ANGLE_MAX, ANGLE_MIN, ANGLE_STEP, FrameOutcome, MASS_MAX, MASS_MIN, MASS_STEP, Simulation,
    SimulationState, snap_to_step,
};

/// Text colour inside panels.
const PANEL_TEXT: Rgb = Rgb::hex(0x1f2937);
/// Panel background.
const PANEL_BACKGROUND: Rgb = Rgb::WHITE;

/// The simulator page.
#[derive(Debug, Clone)]
pub struct App {
    sim: Simulation,
    viewport: Viewport<CellCanvas>,
    panels: Panels,
    use_color: bool,
    notice: Option<String>,
    cols: u16,
}

impl Default for App {
    fn default() -> Self {
        Self::new(SimulationState::default(), Panels::default(), false)
    }
}

impl App {
    /// Creates the page for `state`. Nothing is drawn until the first resize.
    pub fn new(state: SimulationState, panels: Panels, use_color: bool) -> Self {
        Self {
            sim: Simulation::new(state),
            viewport: Viewport::detached(),
            panels,
            use_color,
            notice: None,
            cols: 0,
        }
    }

    /// Creates the page from the resolved configuration.
    ///
    /// # Errors
    ///
    /// Returns a range error when the configured mass or angle is invalid.
    pub fn from_config(config: &Config) -> Result<Self, SimError> {
        Ok(Self::new(
            config.initial_state()?,
            config.panels,
            config.use_color(),
        ))
    }

    /// The simulation controller.
    pub const fn simulation(&self) -> &Simulation {
        &self.sim
    }

    /// The current simulation state.
    pub const fn state(&self) -> &SimulationState {
        self.sim.state()
    }

    /// Panel visibility.
    pub const fn panels(&self) -> Panels {
        self.panels
    }

    /// The message shown in the status bar instead of the key help, if any.
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// The scene canvas, once the terminal size is known.
    pub const fn canvas(&self) -> Option<&CellCanvas> {
        self.viewport.surface()
    }

    fn resize(&mut self, cols: u16, rows: u16) {
        self.cols = cols;
        let scene_rows = rows.saturating_sub(1);
        if cols == 0 || scene_rows == 0 {
            self.viewport.detach();
            return;
        }
        self.viewport.attach(CellCanvas::new(cols, scene_rows));
        self.redraw();
    }

    fn redraw(&mut self) {
        self.viewport.draw(self.sim.state());
    }

    fn handle(&mut self, action: Action, at_ms: f64) -> Option<Cmd> {
        self.notice = None;

        if action.edits_parameters() {
            if let Err(err) = self.edit(action) {
                debug!(?action, %err, "parameter change rejected");
                self.notice = Some(err.to_string());
            }
            self.redraw();
            return None;
        }

        let cmd = match action {
            Action::ToggleRun => Some(match self.sim.toggle(at_ms) {
                Some(ticket) => Cmd::ScheduleFrame(ticket),
                None => Cmd::CancelFrame,
            }),
            Action::Reset => {
                self.sim.reset();
                Some(Cmd::CancelFrame)
            }
            Action::ToggleValues => {
                self.panels.values = !self.panels.values;
                None
            }
            Action::ToggleFormulas => {
                self.panels.formulas = !self.panels.formulas;
                None
            }
            Action::ToggleControls => {
                self.panels.controls = !self.panels.controls;
                None
            }
            Action::Quit => Some(Cmd::Quit),
            _ => None,
        };
        self.redraw();
        cmd
    }

    fn edit(&mut self, action: Action) -> Result<(), SimError> {
        let state = *self.sim.state();
        match action {
            Action::NextSurface => self.sim.set_surface(state.surface.next()),
            Action::PreviousSurface => self.sim.set_surface(state.surface.previous()),
            Action::IncreaseMass => self.sim.set_mass(step_mass(state.mass, MASS_STEP)),
            Action::DecreaseMass => self.sim.set_mass(step_mass(state.mass, -MASS_STEP)),
            Action::IncreaseAngle => self.sim.set_angle(step_angle(state.angle_degrees, ANGLE_STEP)),
            Action::DecreaseAngle => {
                self.sim.set_angle(step_angle(state.angle_degrees, -ANGLE_STEP))
            }
            _ => Ok(()),
        }
    }

    fn frame(&mut self, frame: FrameMsg) -> Option<Cmd> {
        match self.sim.frame(frame.ticket, frame.timestamp_ms, &mut self.viewport) {
            FrameOutcome::Continue(next) => Some(Cmd::ScheduleFrame(next)),
            FrameOutcome::Completed => {
                // The last frame was drawn while still running; drop its vectors.
                self.redraw();
                None
            }
            FrameOutcome::Stale => None,
        }
    }

    fn visible_panels(&self) -> Vec<(Panel, Placement)> {
        let state = self.sim.state();
        let mut panels = Vec::new();
        if self.panels.values {
            panels.push((values_panel(state), Placement::TopLeft));
        }
        if self.panels.formulas {
            panels.push((formulas_panel(), Placement::TopRight));
        }
        if self.panels.controls {
            panels.push((controls_panel(state), Placement::BottomLeft));
        }
        panels
    }

    fn status_line(&self) -> String {
        let phase = self.sim.phase();
        let hint = self.notice.as_deref().unwrap_or(HELP);
        let line = format!(
            " {phase} · t = {:.2} s · {}",
            self.sim.elapsed_seconds(),
            hint
        );
        truncate_to_width(&line, usize::from(self.cols))
    }
}

impl Model for App {
    fn update(&mut self, msg: Msg) -> Option<Cmd> {
        match msg {
            Msg::Resize { cols, rows } => {
                self.resize(cols, rows);
                None
            }
            Msg::Key { key, at_ms } => action_for(key).and_then(|action| self.handle(action, at_ms)),
            Msg::Frame(frame) => self.frame(frame),
            Msg::Interrupt => Some(Cmd::Quit),
        }
    }

    fn view(&self) -> String {
        let Some(canvas) = self.viewport.surface() else {
            return "Waiting for the terminal size...".to_owned();
        };

        let mut grid = canvas.to_grid();
        for (panel, placement) in self.visible_panels() {
            overlay_panel(&mut grid, &panel, placement);
        }

        let mut lines = if self.use_color {
            grid.to_ansi_lines()
        } else {
            grid.to_plain_lines()
        };
        lines.push(self.status_line());
        lines.join("\n")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Placement {
    TopLeft,
    TopRight,
    BottomLeft,
}

fn overlay_panel(grid: &mut CellGrid, panel: &Panel, placement: Placement) {
    let width = panel.width();
    let height = panel.height();
    let col = match placement {
        Placement::TopLeft | Placement::BottomLeft => 1,
        Placement::TopRight => grid.cols().saturating_sub(width + 1),
    };
    let row = match placement {
        Placement::TopLeft | Placement::TopRight => 1,
        Placement::BottomLeft => grid.rows().saturating_sub(height + 1),
    };

    let lines = panel.render();
    let last = lines.len().saturating_sub(1);
    for (i, line) in lines.iter().enumerate() {
        if i == 0 || i == last {
            grid.overlay_text(col, row + i, line, panel.accent, Some(PANEL_BACKGROUND));
        } else {
            grid.overlay_text(col, row + i, line, PANEL_TEXT, Some(PANEL_BACKGROUND));
            grid.overlay_text(col, row + i, "│", panel.accent, Some(PANEL_BACKGROUND));
            grid.overlay_text(
                col + width - 1,
                row + i,
                "│",
                panel.accent,
                Some(PANEL_BACKGROUND),
            );
        }
    }
}

fn step_mass(mass: f64, delta: f64) -> f64 {
    snap_to_step(mass + delta, MASS_STEP).clamp(MASS_MIN, MASS_MAX)
}

fn step_angle(angle: f64, delta: f64) -> f64 {
    snap_to_step(angle + delta, ANGLE_STEP).clamp(ANGLE_MIN, ANGLE_MAX)
}

fn truncate_to_width(text: &str, width: usize) -> String {
    let mut used = 0;
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > width {
            break;
        }
        used += w;
        out.push(ch);
    }
    out
}
