//! Reboot-aware timeline reconstruction.
//!
//! The device logs milliseconds since its own boot, so a reboot makes the
//! raw clock jump back towards zero. Each sample gets a cumulative boot
//! offset that stitches the boot segments into one continuous timeline,
//! expressed in minutes.

use super::types::{EventKind, ParsedLog};

const MS_PER_MINUTE: f64 = 60_000.0;

/// Cumulative boot offset for every raw timestamp.
///
/// Whenever a timestamp is smaller than its predecessor the predecessor's
/// value is added to the running offset. `offsets[0]` is always 0 and the
/// sequence never decreases. The offset saturates at `u64::MAX`.
pub fn boot_offsets(raw: &[u64]) -> Vec<u64> {
    let mut offsets = Vec::with_capacity(raw.len());
    let mut current = 0u64;
    for (i, &ts) in raw.iter().enumerate() {
        if i > 0 && ts < raw[i - 1] {
            current = current.saturating_add(raw[i - 1]);
        }
        offsets.push(current);
    }
    offsets
}

/// `(raw + offset) / 60000` for each sample.
pub fn normalized_minutes(raw: &[u64], offsets: &[u64]) -> Vec<f64> {
    raw.iter().zip(offsets).map(|(&ts, &offset)| to_minutes(ts, offset)).collect()
}

/// Boot offset applied to an event's raw timestamp.
///
/// Takes the offset of the first sample that starts a new boot segment
/// (smaller than its predecessor) while being later than the event's raw
/// timestamp. Without such a boundary the offset is 0, which misplaces
/// events logged after the last reboot. Kept as is so the chart and summary
/// match the established tool output.
pub fn event_offset(event_ms: u64, raw: &[u64], offsets: &[u64]) -> u64 {
    (1..raw.len().min(offsets.len()))
        .find(|&i| event_ms < raw[i] && raw[i] < raw[i - 1])
        .map(|i| offsets[i])
        .unwrap_or(0)
}

/// Sum in floating point so timestamps near `u64::MAX` cannot overflow.
fn to_minutes(ts: u64, offset: u64) -> f64 {
    (ts as f64 + offset as f64) / MS_PER_MINUTE
}

/// An event positioned on the normalized timeline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacedEvent {
    pub kind: EventKind,
    pub raw_ms: u64,
    pub offset_ms: u64,
    pub minutes: f64,
}

/// Normalized view of a parsed log, rebuilt from scratch on every parse.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Timeline {
    pub offsets: Vec<u64>,
    pub minutes: Vec<f64>,
    pub events: Vec<PlacedEvent>,
    total_ms: u64,
}

impl Timeline {
    pub fn build(log: &ParsedLog) -> Self {
        let raw = log.raw_timestamps();
        let offsets = boot_offsets(&raw);
        let minutes = normalized_minutes(&raw, &offsets);

        let events = log
            .events
            .iter()
            .map(|event| {
                let offset_ms = event_offset(event.timestamp_ms, &raw, &offsets);
                PlacedEvent {
                    kind: event.kind,
                    raw_ms: event.timestamp_ms,
                    offset_ms,
                    minutes: to_minutes(event.timestamp_ms, offset_ms),
                }
            })
            .collect();

        let total_ms = match (raw.last(), offsets.last()) {
            (Some(&ts), Some(&offset)) => ts.saturating_add(offset),
            _ => 0,
        };

        Self { offsets, minutes, events, total_ms }
    }

    /// Elapsed milliseconds at the last sample (0 for an empty log), saturating.
    pub fn total_ms(&self) -> u64 {
        self.total_ms
    }

    /// `(min, max)` of the normalized sample times.
    pub fn x_extent(&self) -> Option<(f64, f64)> {
        let mut iter = self.minutes.iter().copied();
        let first = iter.next()?;
        Some(iter.fold((first, first), |(lo, hi), x| (lo.min(x), hi.max(x))))
    }

    /// Trailing window of `window` minutes ending at the latest sample,
    /// clamped so it never starts before the first sample.
    pub fn recent_extent(&self, window: f64) -> Option<(f64, f64)> {
        let (min, latest) = self.x_extent()?;
        Some(((latest - window).max(min), latest))
    }
}
