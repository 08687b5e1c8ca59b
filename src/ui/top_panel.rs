//! # Top Panel - Summary Metrics and Controls
//!
//! This module renders the fixed-height top panel displaying:
//! - Column 1: Data point count, elapsed device time and operating mode
//! - Column 2: Battery, corrected battery and input voltage ranges
//! - Column 3: Last refresh time (monitor mode) and the PNG export control

use eframe::egui;

use crate::analyzer::PlotMode;
use crate::analyzer::summary::{VoltageRanges, format_range};
use crate::ui::AppState;

/// Render the top panel with metrics and controls.
///
/// # Parameters
///
/// * `ctx` - egui context
/// * `state` - Mutable application state for reading metrics and queueing exports
pub fn render(ctx: &egui::Context, state: &mut AppState) {
    egui::TopBottomPanel::top("top_metrics").exact_height(90.0).show(ctx, |ui| {
        ui.columns(3, |cols| {
            cols[0].vertical(|ui| {
                ui.heading("Battery Log");
                ui.separator();
                ui.horizontal(|ui| {
                    ui.label("Data points:");
                    ui.label(egui::RichText::new(state.log.samples.len().to_string()).monospace().strong());
                });
                ui.horizontal(|ui| {
                    let total_ms = state.timeline.total_ms() as f64;
                    ui.label("Total time:");
                    ui.label(egui::RichText::new(format!("{:.2} min", total_ms / 60_000.0)).monospace().strong());
                    ui.label(format!("({:.2} s)", total_ms / 1000.0));
                });
            });

            cols[1].vertical(|ui| {
                render_ranges(ui, state);
            });

            cols[2].vertical(|ui| {
                render_controls(ui, state);
            });
        });
    });
}

fn render_ranges(ui: &mut egui::Ui, state: &AppState) {
    let Some(ranges) = VoltageRanges::from_log(&state.log) else {
        ui.label("No voltage samples");
        return;
    };

    egui::Grid::new("voltage_ranges").num_columns(2).show(ui, |ui| {
        ui.label("Battery:");
        ui.label(egui::RichText::new(format_range(ranges.battery)).monospace());
        ui.end_row();
        ui.label("Corrected:");
        ui.label(egui::RichText::new(format_range(ranges.battery_corrected)).monospace());
        ui.end_row();
        ui.label("Input:");
        ui.label(egui::RichText::new(format_range(ranges.input)).monospace());
        ui.end_row();
    });
}

fn render_controls(ui: &mut egui::Ui, state: &mut AppState) {
    ui.horizontal(|ui| {
        ui.label("Mode:");
        let mode = match state.config.mode {
            PlotMode::Static => "Static",
            PlotMode::Monitor => "Monitor",
        };
        ui.label(egui::RichText::new(mode).strong());
    });

    if state.config.mode == PlotMode::Monitor {
        ui.horizontal(|ui| {
            ui.label("Last update:");
            let text = match state.last_refresh {
                Some(dt) => dt.format("%H:%M:%S").to_string(),
                None => "--:--:--".to_string(),
            };
            ui.label(egui::RichText::new(text).monospace().strong());
        });
    }

    let save = ui.add_enabled(!state.exporter.is_pending(), egui::Button::new("Save PNG…"));
    if save.on_hover_text("Save the current chart as a PNG image").clicked() {
        state.open_export_dialog();
    }
}
