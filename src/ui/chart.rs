//! # Voltage Chart
//!
//! Renders the central area as two stacked time-series panels:
//! - History: battery, input voltage and (when logged) corrected battery over the whole log
//! - Recent: battery readings in a trailing window
//!
//! Both panels carry a dashed vertical marker with a text label for every
//! charging event. Markers are rebuilt from the timeline every frame, so a
//! data refresh never leaves stale markers behind.
//!
//! ## Axis follow
//!
//! While a panel is in [`PanelFollow::AutoFollow`] its bounds are forced to
//! the computed ranges every frame. A drag, click, scroll or zoom over the
//! panel pins it and egui_plot keeps the user's view from then on.

use eframe::egui;
use egui::{Align2, Color32, RichText};
use egui_plot::{Legend, Line, LineStyle, Plot, PlotBounds, PlotPoint, PlotPoints, Text, VLine};

use crate::analyzer::timeline::PlacedEvent;
use crate::analyzer::{EventKind, ParsedLog, Timeline};
use crate::ui::AppState;
use crate::ui::view::{self, Panel, PanelFollow, ViewBounds};

pub const BATTERY_COLOR: Color32 = Color32::from_rgb(0, 0, 255);
pub const CORRECTED_COLOR: Color32 = Color32::from_rgb(0, 128, 0);
pub const INPUT_COLOR: Color32 = Color32::from_rgb(255, 0, 0);

/// One plotted line.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub name: &'static str,
    pub color: Color32,
    pub points: Vec<[f64; 2]>,
}

/// Map an event kind to its marker color.
///
/// - Timeout reached: Red
/// - Slow charging phase: Black
/// - Charging finished: Green
pub fn color_for_event(kind: EventKind) -> Color32 {
    match kind {
        EventKind::TimeoutReached => Color32::from_rgb(255, 0, 0),
        EventKind::SlowChargingPhase => Color32::from_rgb(0, 0, 0),
        EventKind::ChargingFinished => Color32::from_rgb(0, 128, 0),
    }
}

fn series(name: &'static str, color: Color32, minutes: &[f64], values: impl Iterator<Item = f64>) -> Series {
    Series { name, color, points: minutes.iter().zip(values).map(|(&x, y)| [x, y]).collect() }
}

/// Lines of the upper panel, in legend order.
pub fn history_series(log: &ParsedLog, timeline: &Timeline) -> Vec<Series> {
    let mut lines = vec![
        series("Battery (ADC reading)", BATTERY_COLOR, &timeline.minutes, log.samples.iter().map(|s| s.battery_v)),
        series("USB input (Vin)", INPUT_COLOR, &timeline.minutes, log.samples.iter().map(|s| s.input_v)),
    ];
    if log.has_corrected_readings() {
        lines.push(corrected_series(log, timeline));
    }
    lines
}

/// Lines of the lower panel, in legend order.
pub fn recent_series(log: &ParsedLog, timeline: &Timeline) -> Vec<Series> {
    let mut lines = vec![series("Battery (ADC reading)", BATTERY_COLOR, &timeline.minutes, log.samples.iter().map(|s| s.battery_v))];
    if log.has_corrected_readings() {
        lines.push(corrected_series(log, timeline));
    }
    lines
}

fn corrected_series(log: &ParsedLog, timeline: &Timeline) -> Series {
    series("Battery (corrected)", CORRECTED_COLOR, &timeline.minutes, log.samples.iter().map(|s| s.battery_corrected_v))
}

/// Everything needed to draw one panel.
struct PanelSpec<'a> {
    panel: Panel,
    title: &'a str,
    series: Vec<Series>,
    events: &'a [PlacedEvent],
    auto_bounds: Option<ViewBounds>,
    follow: PanelFollow,
    height: f32,
}

/// Render the central panel with both charts.
///
/// # Parameters
///
/// * `ctx` - egui context
/// * `state` - Mutable application state; panels the user touched get pinned
pub fn render(ctx: &egui::Context, state: &mut AppState) {
    egui::CentralPanel::default().show(ctx, |ui| {
        let plotter = &state.config.plotter;
        let title_height = ui.text_style_height(&egui::TextStyle::Body) + ui.spacing().item_spacing.y * 2.0;
        let height = ((ui.available_height() - 2.0 * title_height) / 2.0 - ui.spacing().item_spacing.y).max(120.0);

        let recent_title = state.config.recent_title();
        let specs = [
            PanelSpec {
                panel: Panel::History,
                title: state.config.history_title(),
                series: history_series(&state.log, &state.timeline),
                events: &state.timeline.events,
                auto_bounds: view::history_bounds(&state.log, &state.timeline),
                follow: state.follow.get(Panel::History),
                height,
            },
            PanelSpec {
                panel: Panel::Recent,
                title: &recent_title,
                series: recent_series(&state.log, &state.timeline),
                events: &state.timeline.events,
                auto_bounds: view::recent_bounds(
                    &state.log,
                    &state.timeline,
                    plotter.recent_window_minutes,
                    plotter.voltage_margin,
                ),
                follow: state.follow.get(Panel::Recent),
                height,
            },
        ];

        let mut touched = Vec::new();
        for spec in specs {
            if show_panel(ui, &spec) {
                touched.push(spec.panel);
            }
        }
        for panel in touched {
            state.follow.pin(panel);
        }
    });
}

/// Draw one panel. Returns `true` if the user interacted with it this frame.
fn show_panel(ui: &mut egui::Ui, spec: &PanelSpec<'_>) -> bool {
    ui.label(RichText::new(spec.title).strong());

    let id = match spec.panel {
        Panel::History => "history_plot",
        Panel::Recent => "recent_plot",
    };
    let plot = Plot::new(id)
        .height(spec.height)
        .legend(Legend::default())
        .x_axis_label("Time (minutes)")
        .y_axis_label("Voltage (V)")
        .show_grid(true)
        .allow_boxed_zoom(true);

    let response = plot.show(ui, |plot_ui| {
        if spec.follow == PanelFollow::AutoFollow {
            if let Some(bounds) = spec.auto_bounds {
                plot_ui.set_plot_bounds(PlotBounds::from_min_max([bounds.x.0, bounds.y.0], [bounds.x.1, bounds.y.1]));
            }
        }

        for line in &spec.series {
            plot_ui.line(Line::new(line.name, PlotPoints::from(line.points.clone())).color(line.color).width(1.5));
        }

        let visible = plot_ui.plot_bounds();
        let label_y = (visible.min()[1] + visible.max()[1]) / 2.0;
        for event in spec.events {
            let color = color_for_event(event.kind);
            // Unnamed items stay out of the legend.
            plot_ui.vline(VLine::new("", event.minutes).color(color.gamma_multiply(0.7)).style(LineStyle::dashed_loose()));
            plot_ui.text(
                Text::new("", PlotPoint::new(event.minutes, label_y), RichText::new(event.kind.label()).color(color))
                    .anchor(Align2::LEFT_CENTER),
            );
        }
    });

    user_interacted(ui, &response.response)
}

fn user_interacted(ui: &egui::Ui, response: &egui::Response) -> bool {
    if response.dragged() || response.clicked() || response.double_clicked() || response.secondary_clicked() {
        return true;
    }
    response.hovered() && ui.input(|i| i.smooth_scroll_delta != egui::Vec2::ZERO || i.zoom_delta() != 1.0)
}
