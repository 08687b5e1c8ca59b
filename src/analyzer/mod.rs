//! Analyzer module for device log parsing and timeline reconstruction.
//!
//! Provides functionality for:
//! - Scraping voltage samples and charging events from a log file
//! - Stitching reboot segments into one continuous timeline
//! - Summary statistics for the terminal
//! - Watching a growing log file (monitor mode)

pub mod error;
pub mod log_loader;
pub mod log_parser;
pub mod monitor;
pub mod summary;
pub mod timeline;
pub mod types;

pub use monitor::LogMonitor;
pub use timeline::Timeline;
pub use types::{EventKind, ParsedLog, PlotMode};
