//! Command-line interface for `slipway`.
//!
//! # Examples
//!
//! ```bash
//! # Interactive simulator
//! slipway
//!
//! # Start on ice with a heavier block and a steeper incline
//! slipway --surface ice --mass 2.5 --angle 25
//!
//! # Run to completion without a terminal and print the values as JSON
//! slipway headless --format json
//!
//! # Render the scene half a second in to an SVG file
//! slipway snapshot --seconds 0.5 -o scene.svg
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use incline::Surface;

/// Slipway - a block sliding down an incline, with friction.
///
/// Pick a surface, a mass and an angle, then watch the forces and the
/// motion they produce.
#[derive(Parser, Debug, Clone)]
#[expect(
    clippy::struct_excessive_bools,
    reason = "CLI flags are naturally bools"
)]
#[command(
    name = "slipway",
    author,
    version,
    about = "Inclined-plane friction simulator for the terminal",
    long_about = "Simulates a block sliding down an inclined plane under gravity \
                  and Coulomb friction, with force vectors and live values."
)]
pub struct Cli {
    /// Path to a TOML configuration file
    ///
    /// Values given on the command line take precedence over the file
    #[arg(long, short = 'c', global = true, env = "SLIPWAY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Initial surface: ice, wood, metal, rubber or concrete
    #[arg(long, short = 's', global = true, env = "SLIPWAY_SURFACE")]
    pub surface: Option<Surface>,

    /// Initial mass in kilograms (0.1 to 10)
    #[arg(
        long,
        short = 'm',
        global = true,
        allow_negative_numbers = true,
        env = "SLIPWAY_MASS"
    )]
    pub mass: Option<f64>,

    /// Initial incline angle in degrees (0 to 30)
    #[arg(
        long,
        short = 'a',
        global = true,
        allow_negative_numbers = true,
        env = "SLIPWAY_ANGLE"
    )]
    pub angle: Option<f64>,

    /// Frames per second of the simulation loop (1 to 120)
    #[arg(long, global = true, env = "SLIPWAY_FPS")]
    pub fps: Option<u32>,

    /// Force color output off
    ///
    /// Also set by a non-empty `NO_COLOR` environment variable
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Force color output on (overrides `NO_COLOR`)
    #[arg(long, global = true, conflicts_with = "no_color")]
    pub force_color: bool,

    /// Disable alternate screen mode
    #[arg(long, env = "SLIPWAY_NO_ALT_SCREEN")]
    pub no_alt_screen: bool,

    /// Append logs to this file
    ///
    /// The interactive simulator only logs when this is set
    #[arg(long, global = true, env = "SLIPWAY_LOG_FILE")]
    pub log_file: Option<PathBuf>,

    /// Enable verbose logging (repeat for more)
    #[arg(long, short = 'v', global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Optional subcommand
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Run the simulation without a terminal and print the final values
    Headless(HeadlessArgs),

    /// Render the scene to an SVG file
    Snapshot(SnapshotArgs),

    /// Show the resolved configuration
    Diagnostics,
}

/// Arguments for the headless run.
#[derive(Parser, Debug, Clone)]
pub struct HeadlessArgs {
    /// Stop after this many simulated seconds even if the block is still sliding
    #[arg(long, default_value = "60")]
    pub max_seconds: f64,

    /// Output format
    #[arg(long, short = 'f', default_value = "text")]
    pub format: ReportFormat,
}

/// Arguments for the snapshot subcommand.
#[derive(Parser, Debug, Clone)]
pub struct SnapshotArgs {
    /// Output file path
    #[arg(long, short = 'o')]
    pub output: PathBuf,

    /// Simulated seconds to run before drawing; 0 draws the idle scene
    #[arg(long, default_value = "0")]
    pub seconds: f64,
}

/// Headless report formats.
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReportFormat {
    /// Values table and a summary line
    #[default]
    Text,
    /// The final state as JSON
    Json,
}

impl Cli {
    /// Parse command line arguments.
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Create CLI from iterator (useful for testing).
    ///
    /// # Errors
    ///
    /// Returns an error if argument parsing fails.
    pub fn try_parse_from<I, T>(iter: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(iter)
    }

    /// Returns true for subcommands that never touch the terminal.
    #[must_use]
    pub const fn is_headless(&self) -> bool {
        self.command.is_some()
    }

    /// Get log level based on verbosity.
    #[must_use]
    pub const fn log_level(&self) -> LogLevel {
        LogLevel::from_verbosity(self.verbose)
    }
}

/// Log level for the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Only show warnings and errors
    Warn,
    /// Show info messages
    Info,
    /// Show debug messages
    Debug,
    /// Show all messages including trace
    Trace,
}

impl LogLevel {
    /// Maps a `-v` count to a level.
    #[must_use]
    pub const fn from_verbosity(verbose: u8) -> Self {
        match verbose {
            0 => Self::Warn,
            1 => Self::Info,
            2 => Self::Debug,
            _ => Self::Trace,
        }
    }

    /// Directive understood by `tracing_subscriber::EnvFilter`.
    #[must_use]
    pub const fn as_directive(self) -> &'static str {
        match self {
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        }
    }
}
