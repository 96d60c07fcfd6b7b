//! Key bindings of the terminal simulator.
//!
//! | Key            | Action                     | Notes                    |
//! |----------------|----------------------------|--------------------------|
//! | `Space`        | Start / pause              |                          |
//! | `r`            | Reset                      | Always available         |
//! | `s` / `S`      | Next / previous surface    | Locked while running     |
//! | `+` / `-`      | Mass ± 0.1 kg              | Locked while running     |
//! | `]` / `[`      | Angle ± 1°                 | Locked while running     |
//! | `v`            | Toggle values panel        |                          |
//! | `f`            | Toggle formulas panel      |                          |
//! | `c`            | Toggle controls panel      |                          |
//! | `q` / `Ctrl+C` | Quit                       |                          |

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// A key press, reduced to what the simulator distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// A printable character.
    Char(char),
    /// The space bar.
    Space,
    /// Escape.
    Esc,
    /// Ctrl+C.
    CtrlC,
    /// Anything else.
    Other,
}

impl Key {
    /// Converts a crossterm event. Returns `None` for key releases and repeats.
    pub fn from_crossterm(event: KeyEvent) -> Option<Self> {
        if event.kind != KeyEventKind::Press {
            return None;
        }
        let ctrl = event.modifiers.contains(KeyModifiers::CONTROL);
        Some(match event.code {
            KeyCode::Char(c) if ctrl && c.eq_ignore_ascii_case(&'c') => Self::CtrlC,
            KeyCode::Char(' ') => Self::Space,
            KeyCode::Char(c) if !ctrl => Self::Char(c),
            KeyCode::Esc => Self::Esc,
            _ => Self::Other,
        })
    }
}

/// Actions triggered by key bindings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Start the loop when stopped, pause it when running.
    ToggleRun,
    /// Put the block back at the top.
    Reset,
    /// Select the next surface.
    NextSurface,
    /// Select the previous surface.
    PreviousSurface,
    /// Increase mass by one step.
    IncreaseMass,
    /// Decrease mass by one step.
    DecreaseMass,
    /// Increase angle by one step.
    IncreaseAngle,
    /// Decrease angle by one step.
    DecreaseAngle,
    /// Show or hide the values panel.
    ToggleValues,
    /// Show or hide the formulas panel.
    ToggleFormulas,
    /// Show or hide the controls panel.
    ToggleControls,
    /// Leave the program.
    Quit,
}

impl Action {
    /// Returns true for actions that change simulation parameters.
    pub const fn edits_parameters(self) -> bool {
        matches!(
            self,
            Self::NextSurface
                | Self::PreviousSurface
                | Self::IncreaseMass
                | Self::DecreaseMass
                | Self::IncreaseAngle
                | Self::DecreaseAngle
        )
    }
}

/// Looks up the action bound to `key`.
#[must_use]
pub const fn action_for(key: Key) -> Option<Action> {
    match key {
        Key::Space => Some(Action::ToggleRun),
        Key::Char('r' | 'R') => Some(Action::Reset),
        Key::Char('s') => Some(Action::NextSurface),
        Key::Char('S') => Some(Action::PreviousSurface),
        Key::Char('+' | '=') => Some(Action::IncreaseMass),
        Key::Char('-' | '_') => Some(Action::DecreaseMass),
        Key::Char(']') => Some(Action::IncreaseAngle),
        Key::Char('[') => Some(Action::DecreaseAngle),
        Key::Char('v') => Some(Action::ToggleValues),
        Key::Char('f') => Some(Action::ToggleFormulas),
        Key::Char('c') => Some(Action::ToggleControls),
        Key::Char('q') | Key::CtrlC => Some(Action::Quit),
        _ => None,
    }
}

/// Short help shown in the status line.
pub const HELP: &str = "space start/pause · r reset · s surface · +/- mass · [/] angle · v f c panels · q quit";
