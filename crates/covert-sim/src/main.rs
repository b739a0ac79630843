//! Demonstration binary for the Covert simulation.
//!
//! Wires configuration, logging, the demo level, and the tick loop
//! together, then prints an after-action report as JSON on stdout.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `covert-config.yaml` (defaults if missing)
//! 2. Initialize structured logging (tracing)
//! 3. Build the demonstration level
//! 4. Run `world.max_ticks` ticks, forwarding notifications to the log
//! 5. Print the after-action report

mod demo;
mod report;

use std::path::Path;

use anyhow::Context as _;
use covert_core::{LoggingConfig, SimulationConfig, run_for};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::report::{AfterActionReport, ReportCallback};

const CONFIG_PATH: &str = "covert-config.yaml";

fn main() -> anyhow::Result<()> {
    let (config, from_file) = load_config()?;
    init_tracing(&config.logging);

    info!(
        world_name = %config.world.name,
        seed = config.world.seed,
        seconds_per_tick = config.world.seconds_per_tick,
        max_ticks = config.world.max_ticks,
        from_file,
        "covert-sim starting"
    );

    let max_ticks = config.world.max_ticks;
    let mut level = demo::build(config).context("failed to build the demo level")?;

    let mut callback = ReportCallback::new();
    let result = run_for(&mut level, max_ticks, &mut callback).context("simulation failed")?;

    let report = AfterActionReport::new(&level, &result, &callback);
    let json = serde_json::to_string_pretty(&report).context("failed to encode report")?;
    println!("{json}");

    info!(
        total_ticks = result.total_ticks,
        total_deaths = result.total_deaths,
        "covert-sim shutdown complete"
    );
    Ok(())
}

/// Load `covert-config.yaml` from the working directory.
///
/// Returns the configuration and whether it came from the file.
fn load_config() -> anyhow::Result<(SimulationConfig, bool)> {
    let path = Path::new(CONFIG_PATH);
    if path.exists() {
        let config = SimulationConfig::from_file(path)
            .with_context(|| format!("failed to load {CONFIG_PATH}"))?;
        Ok((config, true))
    } else {
        let mut config = SimulationConfig::default();
        config.world.apply_env_overrides();
        Ok((config, false))
    }
}

/// Install the global subscriber. `RUST_LOG` wins over the configured level.
fn init_tracing(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    if logging.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .init();
    }
}
