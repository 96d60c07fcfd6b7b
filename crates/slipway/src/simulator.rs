//! Program simulator for testing models without a terminal.
//!
//! [`ProgramSimulator`] plays the role of [`Program`](crate::program::Program)
//! with a virtual clock: key messages are stamped with the simulated time,
//! and a scheduled frame is only delivered when the test calls
//! [`ProgramSimulator::advance_frame`]. Cancelling a frame drops it exactly as
//! the real frame clock does.

use std::collections::VecDeque;

use crate::keymap::Key;
use crate::messages::Msg;
use crate::program::{Cmd, Model};
use crate::simulation::FrameTicket;

/// Statistics tracked during simulation.
#[derive(Debug, Clone, Default)]
pub struct SimulationStats {
    /// Number of times init() was called.
    pub init_calls: usize,
    /// Number of times update() was called.
    pub update_calls: usize,
    /// Number of times view() was called.
    pub view_calls: usize,
    /// Commands that were returned from init/update.
    pub commands_returned: usize,
    /// Frames delivered to the model.
    pub frames_delivered: usize,
    /// Scheduled frames dropped by a cancel or a reschedule.
    pub frames_cancelled: usize,
    /// Whether quit was requested.
    pub quit_requested: bool,
}

/// A simulator for testing [`Model`] implementations without a terminal.
///
/// # Example
///
/// ```rust
/// use slipway::app::App;
/// use slipway::keymap::Key;
/// use slipway::simulator::ProgramSimulator;
///
/// let mut sim = ProgramSimulator::new(App::default());
/// sim.resize(80, 24);
/// sim.press(Key::Space);
/// sim.run_until_empty();
///
/// assert!(sim.pending_frame().is_some());
/// let frames = sim.run_frames(10_000);
/// assert!(frames > 0);
/// assert!(sim.pending_frame().is_none());
/// ```
pub struct ProgramSimulator<M: Model> {
    model: M,
    input_queue: VecDeque<Msg>,
    output_views: Vec<String>,
    stats: SimulationStats,
    initialized: bool,
    now_ms: f64,
    frame_period_ms: f64,
    pending_frame: Option<FrameTicket>,
}

impl<M: Model> ProgramSimulator<M> {
    /// Create a new simulator with the given model and a 60 FPS clock.
    pub fn new(model: M) -> Self {
        Self {
            model,
            input_queue: VecDeque::new(),
            output_views: Vec::new(),
            stats: SimulationStats::default(),
            initialized: false,
            now_ms: 0.0,
            frame_period_ms: incline::fps(60) * 1000.0,
            pending_frame: None,
        }
    }

    /// Sets the time between scheduling and delivering a frame.
    #[must_use]
    pub const fn with_frame_period_ms(mut self, period_ms: f64) -> Self {
        self.frame_period_ms = period_ms;
        self
    }

    /// Initialize the model, calling init() and capturing any returned command.
    pub fn init(&mut self) -> Option<Cmd> {
        if self.initialized {
            return None;
        }
        self.initialized = true;
        self.stats.init_calls += 1;

        let cmd = self.model.init();
        if let Some(ref cmd) = cmd {
            self.stats.commands_returned += 1;
            self.apply(cmd);
        }

        self.stats.view_calls += 1;
        self.output_views.push(self.model.view());

        cmd
    }

    /// Queue a message for processing.
    pub fn send(&mut self, msg: Msg) {
        self.input_queue.push_back(msg);
    }

    /// Queue a key press at the current simulated time.
    pub fn press(&mut self, key: Key) {
        self.send(Msg::key(key, self.now_ms));
    }

    /// Queue a terminal resize.
    pub fn resize(&mut self, cols: u16, rows: u16) {
        self.send(Msg::Resize { cols, rows });
    }

    /// Process one message from the queue, calling update and view, and
    /// carry out the returned command.
    pub fn step(&mut self) -> Option<Cmd> {
        if !self.initialized {
            self.init();
        }

        let msg = self.input_queue.pop_front()?;

        self.stats.update_calls += 1;
        let cmd = self.model.update(msg);
        if let Some(ref cmd) = cmd {
            self.stats.commands_returned += 1;
            self.apply(cmd);
        }

        self.stats.view_calls += 1;
        self.output_views.push(self.model.view());

        cmd
    }

    /// Process all pending messages until the queue is empty or quit is requested.
    ///
    /// Returns the number of messages processed.
    pub fn run_until_empty(&mut self) -> usize {
        let mut processed = 0;
        while !self.input_queue.is_empty() && !self.stats.quit_requested {
            self.step();
            processed += 1;
        }
        processed
    }

    /// Moves the clock forward by one frame period and delivers the pending
    /// frame. Returns false, leaving the clock alone, if none is pending.
    pub fn advance_frame(&mut self) -> bool {
        let Some(ticket) = self.pending_frame.take() else {
            return false;
        };
        self.now_ms += self.frame_period_ms;
        self.stats.frames_delivered += 1;
        self.send(Msg::frame(ticket, self.now_ms));
        self.run_until_empty();
        true
    }

    /// Delivers frames until none is pending, quit is requested, or `max`
    /// frames were delivered. Returns the number of frames delivered.
    pub fn run_frames(&mut self, max: usize) -> usize {
        let mut delivered = 0;
        while delivered < max && !self.stats.quit_requested && self.advance_frame() {
            delivered += 1;
        }
        delivered
    }

    /// Lets time pass without delivering anything.
    pub fn advance_time(&mut self, ms: f64) {
        self.now_ms += ms;
    }

    fn apply(&mut self, cmd: &Cmd) {
        match cmd {
            Cmd::Quit => self.stats.quit_requested = true,
            Cmd::ScheduleFrame(ticket) => {
                if self.pending_frame.replace(*ticket).is_some() {
                    self.stats.frames_cancelled += 1;
                }
            }
            Cmd::CancelFrame => {
                if self.pending_frame.take().is_some() {
                    self.stats.frames_cancelled += 1;
                }
            }
            Cmd::Batch(cmds) => {
                for cmd in cmds {
                    self.apply(cmd);
                }
            }
        }
    }

    /// Get a reference to the current model state.
    pub const fn model(&self) -> &M {
        &self.model
    }

    /// Get a mutable reference to the current model state.
    pub const fn model_mut(&mut self) -> &mut M {
        &mut self.model
    }

    /// Consume the simulator and return the final model.
    pub fn into_model(self) -> M {
        self.model
    }

    /// Get the simulation statistics.
    pub const fn stats(&self) -> &SimulationStats {
        &self.stats
    }

    /// Get all captured view outputs.
    pub fn views(&self) -> &[String] {
        &self.output_views
    }

    /// Get the most recent view output.
    pub fn last_view(&self) -> Option<&str> {
        self.output_views.last().map(String::as_str)
    }

    /// The frame currently scheduled, if any.
    pub const fn pending_frame(&self) -> Option<FrameTicket> {
        self.pending_frame
    }

    /// Simulated milliseconds since the simulator was created.
    pub const fn now_ms(&self) -> f64 {
        self.now_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Ticker {
        sim: crate::simulation::Simulation,
        seen: Vec<f64>,
    }

    impl Model for Ticker {
        fn update(&mut self, msg: Msg) -> Option<Cmd> {
            match msg {
                Msg::Key { key: Key::Space, at_ms } => {
                    self.sim.toggle(at_ms).map(Cmd::ScheduleFrame)
                }
                Msg::Key { key: Key::Esc, .. } => {
                    self.sim.reset();
                    Some(Cmd::CancelFrame)
                }
                Msg::Key { key: Key::Char('q'), .. } => Some(Cmd::Quit),
                Msg::Frame(frame) => {
                    self.seen.push(frame.timestamp_ms);
                    let mut viewport =
                        crate::render::Viewport::<crate::render::RecordingCanvas>::detached();
                    match self.sim.frame(frame.ticket, frame.timestamp_ms, &mut viewport) {
                        crate::simulation::FrameOutcome::Continue(next) => {
                            Some(Cmd::ScheduleFrame(next))
                        }
                        _ => None,
                    }
                }
                _ => None,
            }
        }

        fn view(&self) -> String {
            format!("{:.1}", self.sim.state().position)
        }
    }

    fn ticker() -> Ticker {
        let state = crate::simulation::SimulationState::new(incline::Surface::Ice, 1.0, 30.0)
            .unwrap();
        Ticker {
            sim: crate::simulation::Simulation::new(state),
            seen: Vec::new(),
        }
    }

    #[test]
    fn init_records_one_view() {
        let mut sim = ProgramSimulator::new(ticker());
        sim.init();
        sim.init();
        assert_eq!(sim.stats().init_calls, 1);
        assert_eq!(sim.views().len(), 1);
    }

    #[test]
    fn frames_follow_the_virtual_clock() {
        let mut sim = ProgramSimulator::new(ticker()).with_frame_period_ms(10.0);
        sim.press(Key::Space);
        sim.run_until_empty();

        assert_eq!(sim.run_frames(3), 3);
        assert_eq!(sim.model().seen, vec![10.0, 20.0, 30.0]);
        assert!(sim.pending_frame().is_some());
    }

    #[test]
    fn cancel_drops_the_pending_frame() {
        let mut sim = ProgramSimulator::new(ticker());
        sim.press(Key::Space);
        sim.run_until_empty();
        sim.run_frames(2);

        sim.press(Key::Esc);
        sim.run_until_empty();
        assert!(sim.pending_frame().is_none());
        assert!(!sim.advance_frame());
        assert_eq!(sim.stats().frames_cancelled, 1);
        assert_eq!(sim.last_view(), Some("0.0"));
    }

    #[test]
    fn quit_stops_processing() {
        let mut sim = ProgramSimulator::new(ticker());
        sim.press(Key::Char('q'));
        sim.press(Key::Space);
        assert_eq!(sim.run_until_empty(), 1);
        assert!(sim.stats().quit_requested);
        assert!(sim.pending_frame().is_none());
    }

    #[test]
    fn runs_until_the_block_stops() {
        let mut sim = ProgramSimulator::new(ticker());
        sim.press(Key::Space);
        sim.run_until_empty();

        let frames = sim.run_frames(100_000);
        assert!(frames > 1);
        assert!(sim.pending_frame().is_none());
        assert!(!sim.model().sim.state().is_running);
        assert_eq!(sim.stats().frames_delivered, frames);
    }
}
