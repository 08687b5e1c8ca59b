//! # Events Panel
//!
//! Right-hand table listing every detected charging event with its position
//! on the normalized timeline. Rows use the same colors as the chart markers.

use eframe::egui;
use egui_extras::{Column, TableBuilder};

use crate::ui::AppState;
use crate::ui::chart::color_for_event;

/// Render the events side panel.
pub fn render(ctx: &egui::Context, state: &AppState) {
    egui::SidePanel::right("events_right").default_width(260.0).resizable(true).show(ctx, |ui| {
        ui.heading("Events");
        ui.separator();

        if state.timeline.events.is_empty() {
            ui.vertical_centered(|ui| {
                ui.add_space(20.0);
                ui.label("No events detected");
            });
            return;
        }

        let row_height = ui.text_style_height(&egui::TextStyle::Body) * 1.3;
        TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .vscroll(true)
            .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
            .column(Column::initial(70.0).at_least(50.0)) // Minutes
            .column(Column::initial(70.0).at_least(50.0)) // Device time
            .column(Column::remainder()) // Event
            .header(row_height, |mut header| {
                header.col(|ui| {
                    ui.strong("Minutes");
                });
                header.col(|ui| {
                    ui.strong("Device ms");
                });
                header.col(|ui| {
                    ui.strong("Event");
                });
            })
            .body(|body| {
                let events = &state.timeline.events;
                body.rows(row_height, events.len(), |mut row| {
                    let event = &events[row.index()];
                    row.col(|ui| {
                        ui.monospace(format!("{:.2}", event.minutes));
                    });
                    row.col(|ui| {
                        ui.monospace(event.raw_ms.to_string());
                    });
                    row.col(|ui| {
                        ui.label(egui::RichText::new(event.kind.label()).color(color_for_event(event.kind)));
                    });
                });
            });
    });
}
