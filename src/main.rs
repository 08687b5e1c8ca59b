use anyhow::{Context, Result};
use clap::Parser;
use env_logger::Builder;
use log::{LevelFilter, info};

use crate::analyzer::log_loader::load_log;
use crate::analyzer::summary::write_summary;
use crate::analyzer::{LogMonitor, Timeline};
use crate::config::{Cli, RunConfig};

mod analyzer;
mod config;
mod export;
mod ui;

fn main() -> Result<()> {
    // Logging setup
    Builder::new()
        .filter_level(LevelFilter::Warn)
        .filter(Some("battery_log_plotter"), LevelFilter::Info)
        .parse_default_env()
        .init();

    let config = RunConfig::from_cli(Cli::parse())?;
    info!("Starting up: {:?} in {:?} mode", config.log_path, config.mode);

    let log = load_log(&config.log_path)?;
    let timeline = Timeline::build(&log);

    let mut stdout = std::io::stdout().lock();
    write_summary(&mut stdout, &log, &timeline)?;
    drop(stdout);

    let monitor = if config.is_monitor() {
        Some(LogMonitor::new(&config.log_path, config.plotter.poll_interval()).context("Failed to start monitoring")?)
    } else {
        None
    };

    ui::run_viewer(config, log, timeline, monitor)
}
