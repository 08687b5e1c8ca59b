//! Axis-follow state and automatic axis ranges for the two chart panels.
//!
//! Each panel follows the data on its own until the user pans, zooms or
//! clicks in it. From then on the panel keeps whatever view the user chose;
//! only a monitor-mode data refresh hands control back to auto-follow.

use crate::analyzer::summary::value_range;
use crate::analyzer::{ParsedLog, Timeline};

/// Smallest x span (minutes) a panel is given, one second.
const MIN_X_SPAN: f64 = 1.0 / 60.0;
/// Smallest y span (volts) a panel is given.
const MIN_Y_SPAN: f64 = 0.02;
/// Fraction of the data span added above and below in the history panel.
const HISTORY_Y_PADDING: f64 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    /// Upper panel, whole log.
    History,
    /// Lower panel, trailing window of the battery series.
    Recent,
}

impl Panel {
    fn index(self) -> usize {
        match self {
            Panel::History => 0,
            Panel::Recent => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PanelFollow {
    /// Axis ranges are recomputed from the data every frame.
    #[default]
    AutoFollow,
    /// The user interacted with the panel; its bounds are left alone.
    UserPinned,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FollowState {
    panels: [PanelFollow; 2],
}

impl FollowState {
    pub fn get(&self, panel: Panel) -> PanelFollow {
        self.panels[panel.index()]
    }

    /// Record a user interaction with `panel`.
    pub fn pin(&mut self, panel: Panel) {
        let slot = &mut self.panels[panel.index()];
        if *slot == PanelFollow::AutoFollow {
            log::debug!("{:?} panel pinned by user", panel);
        }
        *slot = PanelFollow::UserPinned;
    }

    /// New data arrived: every panel follows the data again.
    pub fn reset(&mut self) {
        self.panels = [PanelFollow::AutoFollow; 2];
    }
}

/// Plot bounds in data coordinates (minutes, volts).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewBounds {
    pub x: (f64, f64),
    pub y: (f64, f64),
}

/// Full x extent; y fitted to every series shown in the upper panel.
pub fn history_bounds(log: &ParsedLog, timeline: &Timeline) -> Option<ViewBounds> {
    let x = timeline.x_extent()?;
    let show_corrected = log.has_corrected_readings();
    let values = log.samples.iter().flat_map(|s| {
        let corrected = show_corrected.then_some(s.battery_corrected_v);
        [Some(s.battery_v), Some(s.input_v), corrected].into_iter().flatten()
    });
    let (lo, hi) = value_range(values)?;
    let pad = (hi - lo) * HISTORY_Y_PADDING;

    Some(ViewBounds { x: widen(x, MIN_X_SPAN), y: widen((lo - pad, hi + pad), MIN_Y_SPAN) })
}

/// Trailing `window` minutes; y spans battery and corrected readings plus `margin`.
pub fn recent_bounds(log: &ParsedLog, timeline: &Timeline, window: f64, margin: f64) -> Option<ViewBounds> {
    let x = timeline.recent_extent(window)?;
    let values = log.samples.iter().flat_map(|s| [s.battery_v, s.battery_corrected_v]);
    let (lo, hi) = value_range(values)?;

    Some(ViewBounds { x: widen(x, MIN_X_SPAN), y: widen((lo - margin, hi + margin), MIN_Y_SPAN) })
}

/// Grow a degenerate range symmetrically to at least `min_span`.
fn widen((lo, hi): (f64, f64), min_span: f64) -> (f64, f64) {
    if hi - lo >= min_span {
        return (lo, hi);
    }
    let center = (lo + hi) / 2.0;
    (center - min_span / 2.0, center + min_span / 2.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::log_parser::parse_lines;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_follow_state_transitions() {
        let mut follow = FollowState::default();
        for panel in [Panel::History, Panel::Recent] {
            assert_eq!(follow.get(panel), PanelFollow::AutoFollow);
        }

        follow.pin(Panel::Recent);
        assert_eq!(follow.get(Panel::Recent), PanelFollow::UserPinned);
        assert_eq!(follow.get(Panel::History), PanelFollow::AutoFollow);

        follow.pin(Panel::Recent);
        assert_eq!(follow.get(Panel::Recent), PanelFollow::UserPinned);

        follow.reset();
        assert_eq!(follow, FollowState::default());
    }

    #[test]
    fn test_recent_bounds_trailing_window() {
        let log = parse_lines([
            "I (0) VMON: BAT: 3.700V, Vin: 5.000V",
            "I (60000) VMON: BAT: 3.800V, BAT_corrected: 3.850V, Vin: 5.000V",
            "I (150000) VMON: BAT: 3.900V, Vin: 5.000V",
        ]);
        let timeline = Timeline::build(&log);

        let bounds = recent_bounds(&log, &timeline, 1.0, 0.01).unwrap();
        assert!(approx(bounds.x.0, 1.5));
        assert!(approx(bounds.x.1, 2.5));
        assert!(approx(bounds.y.0, 3.69));
        assert!(approx(bounds.y.1, 3.91));
    }

    #[test]
    fn test_recent_window_clamped_to_first_sample() {
        let log = parse_lines(["I (6000) VMON: BAT: 3.700V, Vin: 5.000V", "I (12000) VMON: BAT: 3.710V, Vin: 5.000V"]);
        let timeline = Timeline::build(&log);

        let bounds = recent_bounds(&log, &timeline, 1.0, 0.01).unwrap();
        assert!(approx(bounds.x.0, 0.1));
        assert!(approx(bounds.x.1, 0.2));
    }

    #[test]
    fn test_history_bounds_cover_input_voltage() {
        let log = parse_lines(["I (0) VMON: BAT: 3.000V, Vin: 5.000V", "I (60000) VMON: BAT: 4.000V, Vin: 5.000V"]);
        let timeline = Timeline::build(&log);

        let bounds = history_bounds(&log, &timeline).unwrap();
        assert!(approx(bounds.x.0, 0.0));
        assert!(approx(bounds.x.1, 1.0));
        assert!(approx(bounds.y.0, 2.9));
        assert!(approx(bounds.y.1, 5.1));
    }

    #[test]
    fn test_single_sample_gets_non_degenerate_bounds() {
        let log = parse_lines(["I (60000) VMON: BAT: 3.700V, Vin: 3.700V"]);
        let timeline = Timeline::build(&log);

        for bounds in [history_bounds(&log, &timeline).unwrap(), recent_bounds(&log, &timeline, 1.0, 0.0).unwrap()] {
            assert!(bounds.x.1 - bounds.x.0 >= MIN_X_SPAN - 1e-12);
            assert!(bounds.y.1 - bounds.y.0 >= MIN_Y_SPAN - 1e-12);
            assert!(approx((bounds.x.0 + bounds.x.1) / 2.0, 1.0));
        }
    }

    #[test]
    fn test_empty_log_has_no_bounds() {
        let log = ParsedLog::default();
        let timeline = Timeline::build(&log);
        assert!(history_bounds(&log, &timeline).is_none());
        assert!(recent_bounds(&log, &timeline, 1.0, 0.01).is_none());
    }
}
