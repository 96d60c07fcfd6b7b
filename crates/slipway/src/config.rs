//! Runtime configuration for `slipway`.
//!
//! [`Config`] is the single source of truth for the initial simulation
//! parameters and the terminal settings, however they were specified. An
//! optional TOML file is read first; command-line flags and their environment
//! variables override it.
//!
//! ```toml
//! surface = "metal"
//! mass = 2.5
//! angle = 20.0
//! fps = 60
//! color_mode = "auto"
//!
//! [panels]
//! values = true
//! ```

use std::fs;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use incline::Surface;
use serde::{Deserialize, Serialize};

use crate::cli::Cli;
use crate::error::SimError;
use crate::simulation::{ANGLE_MAX, ANGLE_MIN, MASS_MAX, MASS_MIN, SimulationState};

/// Slowest accepted frame rate.
pub const FPS_MIN: u32 = 1;
/// Fastest accepted frame rate.
pub const FPS_MAX: u32 = 120;
/// Frame rate used when none is configured.
pub const DEFAULT_FPS: u32 = 60;

/// Runtime configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    // ========================================================================
    // Simulation Parameters
    // ========================================================================
    /// Surface selected at startup.
    pub surface: Surface,

    /// Mass at startup, in kilograms.
    pub mass: f64,

    /// Incline angle at startup, in degrees.
    pub angle: f64,

    /// Frames per second of the simulation loop.
    pub fps: u32,

    // ========================================================================
    // Display Settings
    // ========================================================================
    /// Color output mode.
    pub color_mode: ColorMode,

    /// Whether to use alternate screen mode.
    pub alt_screen: bool,

    // ========================================================================
    // Diagnostics
    // ========================================================================
    /// Verbosity level (0 = warn, 1 = info, 2 = debug, 3+ = trace).
    pub verbosity: u8,

    /// File that logs are appended to.
    pub log_file: Option<PathBuf>,

    // ========================================================================
    // Panels
    // ========================================================================
    /// Which panels are visible at startup.
    pub panels: Panels,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            surface: Surface::Wood,
            mass: 1.0,
            angle: 0.0,
            fps: DEFAULT_FPS,
            color_mode: ColorMode::Auto,
            alt_screen: true,
            verbosity: 0,
            log_file: None,
            panels: Panels::default(),
        }
    }
}

impl Config {
    /// Create a new config with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a TOML document. Missing keys keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns the parser error for malformed TOML or mistyped values.
    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Reads a TOML configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] if the file cannot be read and
    /// [`ConfigError::Parse`] if it is not a valid configuration.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Create config from CLI arguments.
    ///
    /// Reads `--config` when given, then applies every flag that was set.
    /// The result is not validated; call [`Config::validate`].
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file cannot be loaded.
    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        let mut config = match cli.config {
            Some(ref path) => Self::load(path)?,
            None => Self::default(),
        };
        config.apply_cli(cli);
        Ok(config)
    }

    /// Overrides fields with the flags set on `cli`.
    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(surface) = cli.surface {
            self.surface = surface;
        }
        if let Some(mass) = cli.mass {
            self.mass = mass;
        }
        if let Some(angle) = cli.angle {
            self.angle = angle;
        }
        if let Some(fps) = cli.fps {
            self.fps = fps;
        }

        if cli.force_color {
            self.color_mode = ColorMode::Always;
        } else if cli.no_color {
            self.color_mode = ColorMode::Never;
        }

        if cli.no_alt_screen {
            self.alt_screen = false;
        }
        if cli.log_file.is_some() {
            self.log_file.clone_from(&cli.log_file);
        }
        self.verbosity = self.verbosity.max(cli.verbose);
    }

    /// Check if colors should be used.
    ///
    /// In auto mode colors are used when `NO_COLOR` is unset and stdout is a
    /// terminal.
    #[must_use]
    pub fn use_color(&self) -> bool {
        match self.color_mode {
            ColorMode::Always => true,
            ColorMode::Never => false,
            ColorMode::Auto => {
                if std::env::var_os("NO_COLOR").is_some_and(|v| !v.is_empty()) {
                    return false;
                }
                std::io::stdout().is_terminal()
            }
        }
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the mass, angle or frame rate is out of range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MASS_MIN..=MASS_MAX).contains(&self.mass) {
            return Err(ConfigError::InvalidMass(self.mass));
        }
        if !(ANGLE_MIN..=ANGLE_MAX).contains(&self.angle) {
            return Err(ConfigError::InvalidAngle(self.angle));
        }
        if !(FPS_MIN..=FPS_MAX).contains(&self.fps) {
            return Err(ConfigError::InvalidFps(self.fps));
        }
        Ok(())
    }

    /// Builds the initial simulation state.
    ///
    /// # Errors
    ///
    /// Returns a range error when the mass or angle is invalid.
    pub fn initial_state(&self) -> Result<SimulationState, SimError> {
        SimulationState::new(self.surface, self.mass, self.angle)
    }

    /// Export configuration as a diagnostic string.
    #[must_use]
    pub fn to_diagnostic_string(&self) -> String {
        let mut lines = Vec::new();

        lines.push(format!(
            "Surface: {} (μ = {})",
            self.surface,
            self.surface.friction_coefficient()
        ));
        lines.push(format!("Mass: {} kg", self.mass));
        lines.push(format!("Angle: {}°", self.angle));
        lines.push(format!("FPS: {}", self.fps));
        lines.push(format!("Color mode: {:?}", self.color_mode));
        lines.push(format!(
            "Alt screen: {}",
            if self.alt_screen { "on" } else { "off" }
        ));
        lines.push(format!(
            "Panels: controls={} values={} formulas={}",
            self.panels.controls, self.panels.values, self.panels.formulas
        ));
        lines.push(format!("Verbosity: {}", self.verbosity));
        if let Some(ref path) = self.log_file {
            lines.push(format!("Log file: {}", path.display()));
        }

        lines.join("\n")
    }
}

/// Visibility of the side panels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
#[expect(
    clippy::struct_excessive_bools,
    reason = "one visibility flag per panel"
)]
pub struct Panels {
    /// The controls panel.
    pub controls: bool,
    /// The values table.
    pub values: bool,
    /// The reference formulas.
    pub formulas: bool,
}

impl Default for Panels {
    fn default() -> Self {
        Self {
            controls: true,
            values: false,
            formulas: false,
        }
    }
}

/// Color output mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    /// Automatically detect based on terminal and environment.
    #[default]
    Auto,
    /// Always use colors.
    Always,
    /// Never use colors.
    Never,
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Mass outside the accepted range.
    #[error("Invalid mass: {0} kg (expected 0.1 to 10)")]
    InvalidMass(f64),

    /// Angle outside the accepted range.
    #[error("Invalid angle: {0}° (expected 0 to 30)")]
    InvalidAngle(f64),

    /// Frame rate outside the accepted range.
    #[error("Invalid frame rate: {0} (expected 1 to 120)")]
    InvalidFps(u32),

    /// The configuration file could not be read.
    #[error("Cannot read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML for [`Config`].
    #[error("Invalid config file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}
