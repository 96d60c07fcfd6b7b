//! Terminal program lifecycle and event loop.
//!
//! [`Program`] owns a [`Model`], sets up the terminal, and runs an async
//! loop that feeds it key, resize and frame messages. Frames are requested
//! by the model through [`Cmd::ScheduleFrame`]: the loop spawns one timer
//! task per request and cancels it on [`Cmd::CancelFrame`], so at most one
//! frame is ever in flight.

use std::io::{self, Write};
use std::time::{Duration, Instant};

use crossterm::{
    cursor::{Hide, MoveTo, Show},
    event::{self, Event},
    execute, queue,
    terminal::{
        self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode,
        enable_raw_mode,
    },
};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{debug, warn};

use crate::keymap::Key;
use crate::messages::Msg;
use crate::simulation::FrameTicket;

/// Errors that can occur while running the terminal program.
#[derive(thiserror::Error, Debug)]
pub enum ProgramError {
    /// I/O error during terminal operations.
    #[error("terminal io error: {0}")]
    Io(#[from] io::Error),

    /// Failed to enable or disable raw mode.
    ///
    /// # Recovery
    ///
    /// Run the program in an interactive terminal, or use `headless`.
    #[error("failed to {action} raw mode: {source}")]
    RawModeFailure {
        /// Whether we were trying to enable or disable raw mode.
        action: &'static str,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// Failed to enter or leave the alternate screen.
    ///
    /// # Recovery
    ///
    /// Try running with `--no-alt-screen`.
    #[error("failed to {action} alternate screen: {source}")]
    AltScreenFailure {
        /// Whether we were trying to enter or leave the alternate screen.
        action: &'static str,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// Failed to write the view to the terminal.
    #[error("failed to render view: {0}")]
    Render(io::Error),
}

/// A specialized [`Result`] for program operations.
pub type Result<T> = std::result::Result<T, ProgramError>;

/// Side effects requested by the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cmd {
    /// Stop the program.
    Quit,
    /// Deliver a [`Msg::Frame`] for this ticket after one frame period.
    /// Replaces any frame already scheduled.
    ScheduleFrame(FrameTicket),
    /// Drop the scheduled frame, if any.
    CancelFrame,
    /// Run several commands in order.
    Batch(Vec<Cmd>),
}

impl Cmd {
    /// Combines commands, flattening away empty and single batches.
    pub fn batch(cmds: impl IntoIterator<Item = Option<Cmd>>) -> Option<Cmd> {
        let mut cmds: Vec<Cmd> = cmds.into_iter().flatten().collect();
        match cmds.len() {
            0 => None,
            1 => cmds.pop(),
            _ => Some(Cmd::Batch(cmds)),
        }
    }
}

/// The Elm-style model driven by [`Program`].
pub trait Model {
    /// Called once before the first render.
    fn init(&mut self) -> Option<Cmd> {
        None
    }

    /// Handles one message and returns the next command, if any.
    fn update(&mut self, msg: Msg) -> Option<Cmd>;

    /// Renders the whole screen.
    fn view(&self) -> String;
}

/// Terminal options.
#[derive(Debug, Clone)]
pub struct ProgramOptions {
    /// Use the alternate screen buffer.
    pub alt_screen: bool,
    /// Frame rate of the frame clock.
    pub fps: u32,
}

impl Default for ProgramOptions {
    fn default() -> Self {
        Self {
            alt_screen: true,
            fps: 60,
        }
    }
}

impl ProgramOptions {
    /// Time between scheduling a frame and delivering it.
    pub fn frame_period(&self) -> Duration {
        Duration::from_secs_f64(incline::fps(self.fps.clamp(1, 120)))
    }
}

/// Runs a [`Model`] in the terminal.
pub struct Program<M: Model> {
    model: M,
    options: ProgramOptions,
}

impl<M: Model> Program<M> {
    /// Creates a program with default options.
    pub fn new(model: M) -> Self {
        Self {
            model,
            options: ProgramOptions::default(),
        }
    }

    /// Replaces the options.
    #[must_use]
    pub fn with_options(mut self, options: ProgramOptions) -> Self {
        self.options = options;
        self
    }

    /// Sets up the terminal, runs the event loop until the model quits, and
    /// restores the terminal. Returns the final model.
    ///
    /// # Errors
    ///
    /// Returns [`ProgramError`] when the terminal cannot be set up or written.
    pub async fn run(self) -> Result<M> {
        let mut stdout = io::stdout();
        let options = self.options.clone();

        enable_raw_mode().map_err(|source| ProgramError::RawModeFailure {
            action: "enable",
            source,
        })?;
        if options.alt_screen
            && let Err(source) = execute!(stdout, EnterAlternateScreen)
        {
            let _ = disable_raw_mode();
            return Err(ProgramError::AltScreenFailure {
                action: "enter",
                source,
            });
        }
        let _ = execute!(stdout, Hide);

        let result = self.event_loop(&mut stdout).await;

        let _ = execute!(stdout, Show);
        if options.alt_screen {
            let _ = execute!(stdout, LeaveAlternateScreen);
        }
        let _ = disable_raw_mode();

        result
    }

    async fn event_loop<W: Write>(mut self, out: &mut W) -> Result<M> {
        let started = Instant::now();
        let now_ms = move || started.elapsed().as_secs_f64() * 1000.0;

        let (tx, mut rx) = mpsc::channel::<Msg>(256);
        let cancel_token = CancellationToken::new();
        let tracker = TaskTracker::new();
        let mut clock = FrameClock::new(self.options.frame_period());

        // Terminal events are read on a plain thread: crossterm's reader blocks.
        let (event_tx, mut event_rx) = mpsc::channel::<Event>(100);
        let event_cancel = cancel_token.clone();
        std::thread::spawn(move || {
            while !event_cancel.is_cancelled() {
                match event::poll(Duration::from_millis(100)) {
                    Ok(true) => {
                        if let Ok(evt) = event::read()
                            && event_tx.blocking_send(evt).is_err()
                        {
                            break;
                        }
                    }
                    Ok(false) => {}
                    Err(_) => break,
                }
            }
        });

        let (cols, rows) = terminal::size()?;
        let _ = tx.send(Msg::Resize { cols, rows }).await;

        let mut last_view = String::new();
        if let Some(cmd) = self.model.init()
            && apply(cmd, &mut clock, &tx, &tracker, &cancel_token)
        {
            shutdown(&cancel_token, &tracker).await;
            return Ok(self.model);
        }
        self.render(out, &mut last_view)?;

        loop {
            let msg = tokio::select! {
                Some(event) = event_rx.recv() => match event {
                    Event::Key(key_event) => match Key::from_crossterm(key_event) {
                        Some(Key::CtrlC) => Msg::Interrupt,
                        Some(key) => Msg::key(key, now_ms()),
                        None => continue,
                    },
                    Event::Resize(cols, rows) => Msg::Resize { cols, rows },
                    _ => continue,
                },
                Some(msg) = rx.recv() => match msg {
                    // The timer reports the ticket; stamp it with the shared clock.
                    Msg::Frame(frame) => Msg::frame(frame.ticket, now_ms()),
                    other => other,
                },
                else => break,
            };

            if let Some(cmd) = self.model.update(msg)
                && apply(cmd, &mut clock, &tx, &tracker, &cancel_token)
            {
                break;
            }
            if msg == Msg::Interrupt {
                break;
            }
            self.render(out, &mut last_view)?;
        }

        shutdown(&cancel_token, &tracker).await;
        Ok(self.model)
    }

    fn render<W: Write>(&self, out: &mut W, last_view: &mut String) -> Result<()> {
        let view = self.model.view();
        if view == *last_view {
            return Ok(());
        }

        queue!(out, MoveTo(0, 0)).map_err(ProgramError::Render)?;
        for (i, line) in view.split('\n').enumerate() {
            if i > 0 {
                out.write_all(b"\r\n").map_err(ProgramError::Render)?;
            }
            out.write_all(line.as_bytes()).map_err(ProgramError::Render)?;
            queue!(out, Clear(ClearType::UntilNewLine)).map_err(ProgramError::Render)?;
        }
        queue!(out, Clear(ClearType::FromCursorDown)).map_err(ProgramError::Render)?;
        out.flush().map_err(ProgramError::Render)?;

        *last_view = view;
        Ok(())
    }
}

/// Executes `cmd`. Returns true when the program should stop.
fn apply(
    cmd: Cmd,
    clock: &mut FrameClock,
    tx: &mpsc::Sender<Msg>,
    tracker: &TaskTracker,
    cancel_token: &CancellationToken,
) -> bool {
    match cmd {
        Cmd::Quit => true,
        Cmd::ScheduleFrame(ticket) => {
            clock.schedule(ticket, tx.clone(), tracker, cancel_token);
            false
        }
        Cmd::CancelFrame => {
            clock.cancel();
            false
        }
        Cmd::Batch(cmds) => cmds
            .into_iter()
            .any(|cmd| apply(cmd, clock, tx, tracker, cancel_token)),
    }
}

/// Cancels every task and waits briefly for them to finish.
async fn shutdown(cancel_token: &CancellationToken, tracker: &TaskTracker) {
    cancel_token.cancel();
    tracker.close();
    if tokio::time::timeout(Duration::from_secs(1), tracker.wait())
        .await
        .is_err()
    {
        warn!("background tasks did not stop in time");
    }
}

/// Delivers at most one frame at a time.
struct FrameClock {
    period: Duration,
    pending: Option<CancellationToken>,
}

impl FrameClock {
    const fn new(period: Duration) -> Self {
        Self {
            period,
            pending: None,
        }
    }

    fn schedule(
        &mut self,
        ticket: FrameTicket,
        tx: mpsc::Sender<Msg>,
        tracker: &TaskTracker,
        parent: &CancellationToken,
    ) {
        self.cancel();
        let token = parent.child_token();
        self.pending = Some(token.clone());
        let period = self.period;

        tracker.spawn(async move {
            tokio::select! {
                () = token.cancelled() => {
                    debug!(ticket = ticket.id(), "frame cancelled");
                }
                () = tokio::time::sleep(period) => {
                    // The loop restamps the time on receipt.
                    let _ = tx.send(Msg::frame(ticket, 0.0)).await;
                }
            }
        });
    }

    fn cancel(&mut self) {
        if let Some(token) = self.pending.take() {
            token.cancel();
        }
    }
}
