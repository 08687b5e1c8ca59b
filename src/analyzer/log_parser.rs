//! Parse individual log lines and extract voltage samples and charging events.
//!
//! Supports the following log line formats:
//! - `VMON` voltage report (info level)
//! - Charging timeout (warning level)
//! - Slow charging phase entered (warning level)
//! - Charging finished (warning level)
//!
//! Anything else is ignored; this is a best-effort scrape of firmware output.

use regex::{Captures, Regex};
use std::sync::LazyLock;

use super::types::{ChargeEvent, EventKind, LogRecord, ParsedLog, Sample};

static VOLTAGE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"I \((\d+)\) VMON: BAT: (\d+\.\d+)V(?:, BAT_corrected: (\d+\.\d+)V)?, Vin: (\d+\.\d+)V")
        .expect("voltage pattern is valid")
});

/// Event patterns in match order. The first one that matches wins.
static EVENT_PATTERNS: LazyLock<[(EventKind, Regex); 3]> = LazyLock::new(|| {
    [
        (
            EventKind::TimeoutReached,
            Regex::new(r"W \((\d+)\).*Timeout reached, terminating charging").expect("timeout pattern is valid"),
        ),
        (
            EventKind::SlowChargingPhase,
            Regex::new(r"W \((\d+)\).*(?:going into|entering) slow charging phase").expect("slow charging pattern is valid"),
        ),
        (
            EventKind::ChargingFinished,
            Regex::new(r"W \((\d+)\).*Charging finished").expect("finished pattern is valid"),
        ),
    ]
});

/// Parse a log line into a voltage sample or a charging event.
///
/// # Parameters
///
/// * `line` - A single log line to parse
///
/// # Returns
///
/// `Some(record)` for recognised lines, `None` for everything else.
///
/// # Log Line Formats
///
/// ```text
/// Voltage (corrected field optional):
/// I (1000) VMON: BAT: 3.700V, Vin: 5.000V
/// I (2000) VMON: BAT: 3.750V, BAT_corrected: 3.760V, Vin: 5.000V
///
/// Events:
/// W (2500) CHARGER: Timeout reached, terminating charging
/// W (2600) CHARGER: Battery full, going into slow charging phase
/// W (2700) CHARGER: Charging finished
/// ```
pub fn parse_log_line(line: &str) -> Option<LogRecord> {
    if let Some(caps) = VOLTAGE_PATTERN.captures(line) {
        // A voltage line with an unparseable number still shadows the event patterns.
        return parse_voltage(&caps).map(LogRecord::Voltage);
    }

    for (kind, pattern) in EVENT_PATTERNS.iter() {
        if let Some(caps) = pattern.captures(line) {
            let timestamp_ms = capture_u64(&caps, 1)?;
            return Some(LogRecord::Event(ChargeEvent { timestamp_ms, kind: *kind }));
        }
    }

    None
}

/// Parse every line of a log, keeping file order.
pub fn parse_lines<I, S>(lines: I) -> ParsedLog
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut parsed = ParsedLog::default();
    for line in lines {
        if let Some(record) = parse_log_line(line.as_ref()) {
            parsed.push(record);
        }
    }
    parsed
}

fn parse_voltage(caps: &Captures<'_>) -> Option<Sample> {
    let timestamp_ms = capture_u64(caps, 1)?;
    let battery_v = capture_f64(caps, 2)?;
    let battery_corrected_v = match caps.get(3) {
        Some(m) => m.as_str().parse().ok()?,
        None => battery_v,
    };
    let input_v = capture_f64(caps, 4)?;

    Some(Sample { timestamp_ms, battery_v, battery_corrected_v, input_v })
}

fn capture_u64(caps: &Captures<'_>, index: usize) -> Option<u64> {
    caps.get(index)?.as_str().parse().ok()
}

fn capture_f64(caps: &Captures<'_>, index: usize) -> Option<f64> {
    caps.get(index)?.as_str().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_voltage_without_correction() {
        let line = "I (1000) VMON: BAT: 3.700V, Vin: 5.000V";
        let result = parse_log_line(line);

        if let Some(LogRecord::Voltage(sample)) = result {
            assert_eq!(sample.timestamp_ms, 1000);
            assert_eq!(sample.battery_v, 3.7);
            assert_eq!(sample.battery_corrected_v, sample.battery_v);
            assert_eq!(sample.input_v, 5.0);
        } else {
            panic!("Expected voltage record, got {:?}", result);
        }
    }

    #[test]
    fn test_parse_voltage_with_correction() {
        let line = "I (2000) VMON: BAT: 3.750V, BAT_corrected: 3.760V, Vin: 5.000V";
        let result = parse_log_line(line);

        if let Some(LogRecord::Voltage(sample)) = result {
            assert_eq!(sample.timestamp_ms, 2000);
            assert_eq!(sample.battery_v, 3.75);
            assert_eq!(sample.battery_corrected_v, 3.76);
        } else {
            panic!("Expected voltage record, got {:?}", result);
        }
    }

    #[test]
    fn test_parse_voltage_with_colour_codes_and_prefix() {
        // ESP-IDF colours its console output; the pattern is searched, not anchored.
        let line = "\x1b[0;32mI (123456) VMON: BAT: 4.102V, Vin: 0.120V\x1b[0m";
        let result = parse_log_line(line);

        assert_eq!(
            result,
            Some(LogRecord::Voltage(Sample { timestamp_ms: 123456, battery_v: 4.102, battery_corrected_v: 4.102, input_v: 0.12 }))
        );
    }

    #[test]
    fn test_parse_events() {
        let cases = [
            ("W (2500) CHG: Timeout reached, terminating charging now", EventKind::TimeoutReached),
            ("W (2600) CHG: Battery almost full, going into slow charging phase", EventKind::SlowChargingPhase),
            ("W (2650) CHG: entering slow charging phase", EventKind::SlowChargingPhase),
            ("W (2700) CHG: Charging finished", EventKind::ChargingFinished),
        ];

        for (line, kind) in cases {
            match parse_log_line(line) {
                Some(LogRecord::Event(event)) => assert_eq!(event.kind, kind, "line: {}", line),
                other => panic!("Expected {:?} for {:?}, got {:?}", kind, line, other),
            }
        }
    }

    #[test]
    fn test_event_requires_warning_level() {
        assert!(parse_log_line("I (2700) CHG: Charging finished").is_none());
        assert!(parse_log_line("E (2700) CHG: Timeout reached, terminating charging").is_none());
    }

    #[test]
    fn test_first_matching_event_pattern_wins() {
        let line = "W (3000) CHG: Timeout reached, terminating charging; Charging finished";
        match parse_log_line(line) {
            Some(LogRecord::Event(event)) => {
                assert_eq!(event.kind, EventKind::TimeoutReached);
                assert_eq!(event.timestamp_ms, 3000);
            }
            other => panic!("Expected timeout event, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_unparseable_line() {
        assert!(parse_log_line("This is not a valid log line").is_none());
        assert!(parse_log_line("I (12) VMON: BAT: 3V, Vin: 5.0V").is_none());
        assert!(parse_log_line("").is_none());
    }

    #[test]
    fn test_parse_lines_keeps_file_order() {
        let lines = [
            "I (1000) VMON: BAT: 3.700V, Vin: 5.000V",
            "garbage",
            "I (2000) VMON: BAT: 3.750V, BAT_corrected: 3.760V, Vin: 5.000V",
            "W (2500) CHG: Timeout reached, terminating charging",
            "I (10) VMON: BAT: 3.600V, Vin: 0.000V",
        ];
        let parsed = parse_lines(lines);

        assert_eq!(parsed.raw_timestamps(), vec![1000, 2000, 10]);
        assert_eq!(parsed.events, vec![ChargeEvent { timestamp_ms: 2500, kind: EventKind::TimeoutReached }]);
    }
}
