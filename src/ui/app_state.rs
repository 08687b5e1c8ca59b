//! # Application State Management
//!
//! This module implements the central `AppState` struct which owns the parsed
//! log, its normalized timeline and the per-panel follow state. It implements
//! the `eframe::App` trait to integrate with the egui application framework.
//!
//! ## Responsibilities
//!
//! - Holds the series shown by both chart panels
//! - Polls the log file in monitor mode and replaces the whole state on growth
//! - Drives PNG export (initial `-o` snapshot and the "Save PNG…" button)
//! - Persists the last export directory across sessions
//!
//! Everything runs on the UI thread: the poll happens at the start of a frame
//! and the redraw that follows reads the state it just replaced.

use chrono::{DateTime, Local};
use eframe::egui;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Instant;

use crate::analyzer::{LogMonitor, ParsedLog, Timeline};
use crate::config::RunConfig;
use crate::export::Exporter;
use crate::ui::view::FollowState;

/// Central application state.
pub struct AppState {
    /// Settings for this run.
    pub config: RunConfig,
    /// Samples and events currently on screen.
    pub log: ParsedLog,
    /// Normalized timeline of `log`.
    pub timeline: Timeline,
    /// Auto-follow or user-pinned, per panel.
    pub follow: FollowState,
    /// File watcher, present only in monitor mode.
    pub monitor: Option<LogMonitor>,
    /// Wall-clock time of the last data replacement (monitor mode).
    pub last_refresh: Option<DateTime<Local>>,
    pub exporter: Exporter,
    /// Number of frames rendered so far.
    pub frame: u64,
    /// Last directory used for the PNG save dialog.
    pub last_export_dir: Option<String>,
}

/// Settings persisted across application sessions.
#[derive(Default, Serialize, Deserialize)]
struct PersistedSettings {
    last_export_dir: Option<String>,
}

impl AppState {
    /// Create the application state for an already parsed log.
    ///
    /// If the run was started with an output file, its export is queued so
    /// the first settled frame gets written.
    pub fn new(config: RunConfig, log: ParsedLog, timeline: Timeline, monitor: Option<LogMonitor>) -> Self {
        let mut exporter = Exporter::default();
        if let Some(path) = &config.output {
            exporter.request(path.clone(), 0);
        }

        Self {
            config,
            log,
            timeline,
            follow: FollowState::default(),
            monitor,
            last_refresh: None,
            exporter,
            frame: 0,
            last_export_dir: None,
        }
    }

    /// Restore persisted settings from eframe storage.
    pub fn with_storage(mut self, storage: Option<&dyn eframe::Storage>) -> Self {
        let persisted: PersistedSettings = storage.and_then(|s| eframe::get_value(s, "app_settings")).unwrap_or_default();
        self.last_export_dir = persisted.last_export_dir;
        self
    }

    /// Replace every series with a freshly parsed log.
    ///
    /// Nothing is merged: samples, events and the timeline are rebuilt, and
    /// both panels go back to following the data.
    pub fn replace_log(&mut self, log: ParsedLog) {
        log::info!(
            "Log refreshed: {} -> {} samples, {} events",
            self.log.samples.len(),
            log.samples.len(),
            log.events.len()
        );
        self.timeline = Timeline::build(&log);
        self.log = log;
        self.follow.reset();
        self.last_refresh = Some(Local::now());
    }

    /// Run one monitor poll if it is due.
    ///
    /// Poll errors are reported and swallowed; monitoring carries on at the
    /// next interval.
    pub fn poll_monitor(&mut self, now: Instant) {
        let Some(monitor) = self.monitor.as_mut() else {
            return;
        };

        match monitor.poll_if_due(now, self.log.samples.len()) {
            Ok(Some(log)) => self.replace_log(log),
            Ok(None) => {}
            Err(e) => {
                println!("Monitoring error: {}", e);
                log::warn!("Monitoring error: {}", e);
            }
        }
    }

    /// Ask for a destination with a native save dialog and queue the export.
    pub fn open_export_dialog(&mut self) {
        let mut dialog = rfd::FileDialog::new().add_filter("PNG image", &["png"]).set_file_name("battery_log.png");
        if let Some(dir) = &self.last_export_dir {
            dialog = dialog.set_directory(dir);
        }
        let Some(file) = dialog.save_file() else {
            return;
        };

        if let Some(parent) = file.parent() {
            self.last_export_dir = Some(parent.to_string_lossy().to_string());
        }
        self.request_export(file);
    }

    pub fn request_export(&mut self, path: PathBuf) {
        self.exporter.request(path, self.frame);
    }
}

impl eframe::App for AppState {
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        let settings = PersistedSettings { last_export_dir: self.last_export_dir.clone() };
        eframe::set_value(storage, "app_settings", &settings);
    }

    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_monitor(Instant::now());

        // Keep polling without user input
        if let Some(monitor) = &self.monitor {
            ctx.request_repaint_after(monitor.interval());
        }

        // Panels layout: top (fixed), right (events), charts fill the remaining space
        super::top_panel::render(ctx, self);
        super::events_panel::render(ctx, self);
        super::chart::render(ctx, self);

        self.frame += 1;
        self.exporter.drive(ctx, self.frame);
    }
}
