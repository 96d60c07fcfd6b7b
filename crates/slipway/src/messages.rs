//! Messages delivered to the simulator model.

use crate::keymap::Key;
use crate::simulation::FrameTicket;

/// A scheduled frame that came due.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameMsg {
    /// The ticket the frame was scheduled with.
    pub ticket: FrameTicket,
    /// Milliseconds since the program started, taken when the frame fired.
    pub timestamp_ms: f64,
}

/// Everything the model reacts to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Msg {
    /// A key press and when it happened.
    Key { key: Key, at_ms: f64 },
    /// The terminal changed size.
    Resize { cols: u16, rows: u16 },
    /// A frame came due.
    Frame(FrameMsg),
    /// Ctrl+C or a termination request.
    Interrupt,
}

impl Msg {
    /// Builds a key message.
    pub const fn key(key: Key, at_ms: f64) -> Self {
        Self::Key { key, at_ms }
    }

    /// Builds a frame message.
    pub const fn frame(ticket: FrameTicket, timestamp_ms: f64) -> Self {
        Self::Frame(FrameMsg {
            ticket,
            timestamp_ms,
        })
    }
}
