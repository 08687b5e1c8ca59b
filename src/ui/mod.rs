// UI module for the battery log plotter
//
// This module organizes the UI into separate components:
// - `top_panel`: Summary metrics and export control
// - `events_panel`: Table of detected charging events
// - `chart`: Central history and recent-window charts
// - `view`: Per-panel axis follow state and automatic ranges
// - `app_state`: Application state management and main update loop

pub mod app_state;
pub mod chart;
pub mod events_panel;
pub mod top_panel;
pub mod view;

use eframe::egui;

use crate::analyzer::{LogMonitor, ParsedLog, Timeline};
use crate::config::RunConfig;

pub use app_state::AppState;

/// Open the viewer window and block until it is closed.
pub fn run_viewer(config: RunConfig, log: ParsedLog, timeline: Timeline, monitor: Option<LogMonitor>) -> anyhow::Result<()> {
    let size = [config.plotter.window_width, config.plotter.window_height];
    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size(size),
        ..Default::default()
    };

    eframe::run_native(
        "Battery Log Plotter",
        native_options,
        Box::new(move |cc| {
            // Black event markers need a light background
            cc.egui_ctx.set_visuals(egui::Visuals::light());
            Ok(Box::new(AppState::new(config, log, timeline, monitor).with_storage(cc.storage)))
        }),
    )
    .map_err(|e| anyhow::anyhow!("Viewer failed: {}", e))
}
