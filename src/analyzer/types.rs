//! Type definitions specific to the analyzer module.

/// Plotter operating mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlotMode {
    /// Parse the log once and show a fixed chart.
    Static,
    /// Re-parse the log whenever the file grows (file being appended).
    Monitor,
}

/// One `VMON` voltage reading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    /// Device-relative timestamp in milliseconds (resets on reboot).
    pub timestamp_ms: u64,
    /// Raw ADC battery reading.
    pub battery_v: f64,
    /// Corrected battery reading, equal to `battery_v` when the firmware logged none.
    pub battery_corrected_v: f64,
    /// USB input voltage.
    pub input_v: f64,
}

/// Discrete charging-state events emitted as warning lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    TimeoutReached,
    SlowChargingPhase,
    ChargingFinished,
}

impl EventKind {
    /// Human-readable label used in the summary and on chart markers.
    pub fn label(self) -> &'static str {
        match self {
            EventKind::TimeoutReached => "Timeout reached",
            EventKind::SlowChargingPhase => "Slow charging phase",
            EventKind::ChargingFinished => "Charging finished",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChargeEvent {
    pub timestamp_ms: u64,
    pub kind: EventKind,
}

/// A single recognised log line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LogRecord {
    Voltage(Sample),
    Event(ChargeEvent),
}

/// Everything scraped from one pass over a log, in file order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedLog {
    pub samples: Vec<Sample>,
    pub events: Vec<ChargeEvent>,
}

impl ParsedLog {
    /// Raw device timestamps of all samples, in file order.
    pub fn raw_timestamps(&self) -> Vec<u64> {
        self.samples.iter().map(|s| s.timestamp_ms).collect()
    }

    /// Whether any sample carries a corrected reading distinct from the raw one.
    ///
    /// The corrected series is only worth plotting in that case.
    pub fn has_corrected_readings(&self) -> bool {
        self.samples.iter().any(|s| s.battery_v != s.battery_corrected_v)
    }

    pub fn push(&mut self, record: LogRecord) {
        match record {
            LogRecord::Voltage(sample) => self.samples.push(sample),
            LogRecord::Event(event) => self.events.push(event),
        }
    }
}
