#![forbid(unsafe_code)]

//! # Slipway
//!
//! Inclined-plane friction simulator for the terminal.
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p slipway
//! cargo run -p slipway -- headless --surface ice --angle 30
//! ```

use std::fs;

use anyhow::Context;
use tracing::info;

use slipway::app::App;
use slipway::cli::{Cli, Command, HeadlessArgs, ReportFormat, SnapshotArgs};
use slipway::config::Config;
use slipway::headless::{run_headless, snapshot_svg};
use slipway::logging::{self, LogTarget};
use slipway::program::{Program, ProgramOptions};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse_args();
    let config = Config::from_cli(&cli).context("failed to load configuration")?;
    config.validate().context("invalid configuration")?;

    let target = if cli.is_headless() {
        LogTarget::Stderr
    } else {
        LogTarget::FileOnly
    };
    logging::init(&config, target)?;

    match cli.command {
        Some(Command::Headless(ref args)) => headless(&config, args),
        Some(Command::Snapshot(ref args)) => snapshot(&config, args),
        Some(Command::Diagnostics) => {
            println!("{}", config.to_diagnostic_string());
            Ok(())
        }
        None => interactive(&config),
    }
}

fn headless(config: &Config, args: &HeadlessArgs) -> anyhow::Result<()> {
    let state = config.initial_state()?;
    let report = run_headless(state, config.fps, args.max_seconds)?;

    let output = match args.format {
        ReportFormat::Text => report.to_text(),
        ReportFormat::Json => report.to_json().context("failed to encode report")?,
    };
    println!("{output}");
    Ok(())
}

fn snapshot(config: &Config, args: &SnapshotArgs) -> anyhow::Result<()> {
    let state = config.initial_state()?;
    let svg = snapshot_svg(state, config.fps, args.seconds)?;

    fs::write(&args.output, svg)
        .with_context(|| format!("failed to write {}", args.output.display()))?;
    info!(path = %args.output.display(), "snapshot written");
    println!("Saved snapshot to {}", args.output.display());
    Ok(())
}

fn interactive(config: &Config) -> anyhow::Result<()> {
    let app = App::from_config(config)?;
    let options = ProgramOptions {
        alt_screen: config.alt_screen,
        fps: config.fps,
    };

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;
    let app = runtime.block_on(Program::new(app).with_options(options).run())?;

    info!(
        phase = %app.simulation().phase(),
        elapsed = app.simulation().elapsed_seconds(),
        "simulator closed"
    );
    Ok(())
}
