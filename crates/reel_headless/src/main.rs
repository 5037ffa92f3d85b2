//! Reel Headless - run viewport scenarios without a UI
//!
//! Exits non-zero when a scenario assertion fails.

use anyhow::{Context, Result};
use clap::Parser;
use reel_headless::{run_loaded_scenario, HeadlessRunConfig, HeadlessScenario};
use reel_viewport::ViewportConfig;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Deterministic scenario runner for the Reel viewport controller
#[derive(Parser, Debug)]
#[command(name = "reel-headless")]
#[command(about = "Run a viewport scenario on a virtual clock")]
#[command(version)]
struct Args {
    /// Scenario JSON file
    scenario: PathBuf,

    /// Viewport configuration (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Logical milliseconds per frame
    #[arg(long, default_value = "16")]
    tick_ms: u64,

    /// Also write the JSON report to this relative path
    #[arg(short, long)]
    report: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => ViewportConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => ViewportConfig::default(),
    };
    let scenario = HeadlessScenario::from_path(&args.scenario)?;

    tracing::info!(
        "running {} ({} steps)",
        scenario.name.as_deref().unwrap_or("scenario"),
        scenario.steps.len()
    );

    let runtime_cfg = HeadlessRunConfig {
        tick_ms: args.tick_ms,
        ..HeadlessRunConfig::default()
    };
    let outcome = run_loaded_scenario(&scenario, config, runtime_cfg)?;

    outcome.report().write_to_writer(&mut std::io::stdout().lock())?;
    if let Some(path) = &args.report {
        outcome.report().write_to_path(path)?;
        tracing::info!("report written to {}", path.display());
    }

    if outcome.is_failed() {
        std::process::exit(1);
    }
    Ok(())
}
