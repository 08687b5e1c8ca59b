//! Plain-text summary printed before the viewer opens.

use std::io::Write;

use super::error::AnalyzerError;
use super::timeline::Timeline;
use super::types::ParsedLog;

/// `(min, max)` of a series, `None` when empty.
pub fn value_range(values: impl IntoIterator<Item = f64>) -> Option<(f64, f64)> {
    let mut iter = values.into_iter();
    let first = iter.next()?;
    Some(iter.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v))))
}

/// Voltage ranges over all samples.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VoltageRanges {
    pub battery: (f64, f64),
    pub battery_corrected: (f64, f64),
    pub input: (f64, f64),
}

impl VoltageRanges {
    pub fn from_log(log: &ParsedLog) -> Option<Self> {
        Some(Self {
            battery: value_range(log.samples.iter().map(|s| s.battery_v))?,
            battery_corrected: value_range(log.samples.iter().map(|s| s.battery_corrected_v))?,
            input: value_range(log.samples.iter().map(|s| s.input_v))?,
        })
    }
}

/// Write the summary statistics.
///
/// The sample count is written before anything that needs samples, so an
/// empty log still reports `Number of data points: 0` before failing with
/// [`AnalyzerError::NoSamples`].
pub fn write_summary<W: Write>(out: &mut W, log: &ParsedLog, timeline: &Timeline) -> anyhow::Result<()> {
    writeln!(out, "Number of data points: {}", log.samples.len())?;

    let Some(ranges) = VoltageRanges::from_log(log) else {
        return Err(AnalyzerError::NoSamples.into());
    };

    let total_ms = timeline.total_ms() as f64;
    writeln!(out, "Total time: {:.2} minutes ({:.2} seconds)", total_ms / 60_000.0, total_ms / 1000.0)?;
    writeln!(out, "Battery voltage range: {}", format_range(ranges.battery))?;
    writeln!(out, "Corrected battery voltage range: {}", format_range(ranges.battery_corrected))?;
    writeln!(out, "Input voltage range: {}", format_range(ranges.input))?;

    if timeline.events.is_empty() {
        writeln!(out, "\nNo events detected")?;
    } else {
        writeln!(out, "\nDetected events:")?;
        for event in &timeline.events {
            writeln!(out, "  {:.2} minutes: {}", event.minutes, event.kind.label())?;
        }
    }

    Ok(())
}

pub fn format_range((lo, hi): (f64, f64)) -> String {
    format!("{:.3}V to {:.3}V", lo, hi)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::log_parser::parse_lines;

    fn render(log: &ParsedLog) -> (String, anyhow::Result<()>) {
        let timeline = Timeline::build(log);
        let mut out = Vec::new();
        let result = write_summary(&mut out, log, &timeline);
        (String::from_utf8(out).unwrap(), result)
    }

    #[test]
    fn test_summary_for_reference_log() {
        let log = parse_lines([
            "I (1000) VMON: BAT: 3.700V, Vin: 5.000V",
            "I (2000) VMON: BAT: 3.750V, BAT_corrected: 3.760V, Vin: 5.000V",
            "W (2500) CHG: Timeout reached, terminating charging",
        ]);
        assert_eq!(log.samples.len(), 2);
        assert_eq!(Timeline::build(&log).offsets, vec![0, 0]);

        let (text, result) = render(&log);
        result.unwrap();

        let expected = "Number of data points: 2\n\
                        Total time: 0.03 minutes (2.00 seconds)\n\
                        Battery voltage range: 3.700V to 3.750V\n\
                        Corrected battery voltage range: 3.700V to 3.760V\n\
                        Input voltage range: 5.000V to 5.000V\n\
                        \n\
                        Detected events:\n  \
                        0.04 minutes: Timeout reached\n";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_summary_without_events() {
        let log = parse_lines(["I (60000) VMON: BAT: 4.000V, Vin: 0.100V"]);
        let (text, result) = render(&log);
        result.unwrap();

        assert!(text.contains("Total time: 1.00 minutes (60.00 seconds)"));
        assert!(text.ends_with("\nNo events detected\n"));
    }

    #[test]
    fn test_summary_empty_log_fails_after_count() {
        let log = parse_lines(["W (10) CHG: Charging finished"]);
        let (text, result) = render(&log);

        assert_eq!(text, "Number of data points: 0\n");
        let err = result.unwrap_err();
        assert!(matches!(err.downcast_ref::<AnalyzerError>(), Some(AnalyzerError::NoSamples)));
    }

    #[test]
    fn test_value_range() {
        assert_eq!(value_range([3.0, 1.0, 2.0]), Some((1.0, 3.0)));
        assert_eq!(value_range(Vec::<f64>::new()), None);
    }
}
