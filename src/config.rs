//! Command-line arguments and optional plotter settings file.

use anyhow::{Context, Result, bail};
use clap::Parser;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::analyzer::PlotMode;

#[derive(Parser, Debug)]
#[clap(name = "battery-log-plotter", version, about = "Parse and plot voltage data from a device log file")]
pub struct Cli {
    /// Path to the log file
    pub log_file: PathBuf,

    /// Output PNG file name (first rendered frame only)
    #[clap(short, long)]
    pub output: Option<PathBuf>,

    /// Custom title for the plot
    #[clap(short, long)]
    pub title: Option<String>,

    /// Monitor the log file in real-time
    #[clap(short, long)]
    pub monitor: bool,

    /// Path to an optional TOML settings file
    #[clap(short, long)]
    pub config: Option<PathBuf>,
}

/// Tunables read from the optional TOML file. Every key may be omitted.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct PlotterConfig {
    /// How often monitor mode checks the file size
    pub poll_interval_ms: u64,
    /// Width of the trailing window shown in the lower panel
    pub recent_window_minutes: f64,
    /// Padding above and below the battery series in the lower panel
    pub voltage_margin: f64,
    pub window_width: f32,
    pub window_height: f32,
}

impl Default for PlotterConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 1000,
            recent_window_minutes: 1.0,
            voltage_margin: 0.01,
            window_width: 1600.0,
            window_height: 800.0,
        }
    }
}

impl PlotterConfig {
    /// Load configuration from a TOML file.
    pub fn load(config_path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file: {:?}", config_path))?;
        Self::load_from_str(&content).with_context(|| format!("Invalid config file: {:?}", config_path))
    }

    pub fn load_from_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).context("Failed to parse config")?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.poll_interval_ms == 0 {
            bail!("poll-interval-ms must be greater than 0");
        }
        if !(self.recent_window_minutes > 0.0) {
            bail!("recent-window-minutes must be greater than 0");
        }
        if !(self.voltage_margin >= 0.0) {
            bail!("voltage-margin must not be negative");
        }
        if !(self.window_width > 0.0 && self.window_height > 0.0) {
            bail!("window-width and window-height must be greater than 0");
        }
        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

/// Everything one run needs, passed explicitly to the components that use it.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub log_path: PathBuf,
    pub output: Option<PathBuf>,
    pub title: Option<String>,
    pub mode: PlotMode,
    pub plotter: PlotterConfig,
}

impl RunConfig {
    pub fn from_cli(cli: Cli) -> Result<Self> {
        let plotter = match &cli.config {
            Some(path) => PlotterConfig::load(path)?,
            None => PlotterConfig::default(),
        };

        if cli.monitor && cli.output.is_some() {
            log::info!("Monitor mode: only the initial chart is written to the output file");
        }

        Ok(Self {
            log_path: cli.log_file,
            output: cli.output,
            title: cli.title,
            mode: if cli.monitor { PlotMode::Monitor } else { PlotMode::Static },
            plotter,
        })
    }

    pub fn is_monitor(&self) -> bool {
        self.mode == PlotMode::Monitor
    }

    /// Title of the full-history panel.
    pub fn history_title(&self) -> &str {
        self.title.as_deref().unwrap_or("All Measurements")
    }

    /// Title of the recent-window panel, naming the configured window in monitor mode.
    pub fn recent_title(&self) -> String {
        match self.mode {
            PlotMode::Monitor => {
                let window = self.plotter.recent_window_minutes;
                let unit = if window == 1.0 { "minute" } else { "minutes" };
                format!("Battery (Last {} {})", window, unit)
            }
            PlotMode::Static => "Battery (Zoomed)".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_all_flags() {
        let cli = Cli::try_parse_from(["battery-log-plotter", "device.log", "-o", "out.png", "-t", "Run 3", "-m"]).unwrap();
        assert_eq!(cli.log_file, PathBuf::from("device.log"));
        assert_eq!(cli.output, Some(PathBuf::from("out.png")));
        assert_eq!(cli.title.as_deref(), Some("Run 3"));
        assert!(cli.monitor);

        let config = RunConfig::from_cli(cli).unwrap();
        assert_eq!(config.mode, PlotMode::Monitor);
        assert_eq!(config.history_title(), "Run 3");
        assert_eq!(config.recent_title(), "Battery (Last 1 minute)");
        assert_eq!(config.plotter, PlotterConfig::default());
    }

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::try_parse_from(["battery-log-plotter", "device.log"]).unwrap();
        let config = RunConfig::from_cli(cli).unwrap();
        assert_eq!(config.mode, PlotMode::Static);
        assert!(config.output.is_none());
        assert_eq!(config.history_title(), "All Measurements");
        assert_eq!(config.recent_title(), "Battery (Zoomed)");
    }

    #[test]
    fn test_recent_title_follows_window() {
        let cli = Cli::try_parse_from(["battery-log-plotter", "device.log", "-m"]).unwrap();
        let mut config = RunConfig::from_cli(cli).unwrap();

        config.plotter.recent_window_minutes = 5.0;
        assert_eq!(config.recent_title(), "Battery (Last 5 minutes)");
        config.plotter.recent_window_minutes = 0.5;
        assert_eq!(config.recent_title(), "Battery (Last 0.5 minutes)");

        config.mode = PlotMode::Static;
        assert_eq!(config.recent_title(), "Battery (Zoomed)");
    }

    #[test]
    fn test_cli_requires_log_file() {
        assert!(Cli::try_parse_from(["battery-log-plotter"]).is_err());
    }

    #[test]
    fn test_config_loads_from_str() {
        let config = PlotterConfig::load_from_str(
            r#"
poll-interval-ms = 250
recent-window-minutes = 5.0
"#,
        )
        .unwrap();
        assert_eq!(config.poll_interval(), Duration::from_millis(250));
        assert_eq!(config.recent_window_minutes, 5.0);
        assert_eq!(config.voltage_margin, 0.01);
    }

    #[test]
    fn test_config_validation_rejects_zero_interval() {
        let err = PlotterConfig::load_from_str("poll-interval-ms = 0").unwrap_err();
        assert!(err.to_string().contains("poll-interval-ms"));
    }

    #[test]
    fn test_config_rejects_unknown_keys() {
        assert!(PlotterConfig::load_from_str("poll_interval = 10").is_err());
    }

    #[test]
    fn test_config_file_via_cli() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plotter.toml");
        std::fs::write(&path, "window-width = 800.0\nwindow-height = 600.0\n").unwrap();

        let cli = Cli::try_parse_from(["battery-log-plotter", "device.log", "--config", path.to_str().unwrap()]).unwrap();
        let config = RunConfig::from_cli(cli).unwrap();
        assert_eq!(config.plotter.window_width, 800.0);
        assert_eq!(config.plotter.poll_interval_ms, 1000);
    }
}
