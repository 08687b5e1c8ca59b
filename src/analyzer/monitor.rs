//! Monitor mode: watch the log file for growth and re-parse it from scratch.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use super::error::AnalyzerError;
use super::log_loader::{file_size, load_log};
use super::types::ParsedLog;

/// Polls a log file on a fixed interval.
///
/// Only the byte size is compared between polls. When it changes the whole
/// file is parsed again and handed back if it holds more samples than the
/// caller currently shows.
#[derive(Debug)]
pub struct LogMonitor {
    path: PathBuf,
    interval: Duration,
    last_size: u64,
    next_poll: Instant,
}

impl LogMonitor {
    /// Start watching `path`, remembering its current size.
    pub fn new(path: &Path, interval: Duration) -> Result<Self, AnalyzerError> {
        let last_size = file_size(path)?;
        log::info!("Monitoring {:?} every {}ms (size {} bytes)", path, interval.as_millis(), last_size);
        Ok(Self { path: path.to_path_buf(), interval, last_size, next_poll: Instant::now() + interval })
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Whether the poll interval has elapsed at `now`.
    pub fn is_due(&self, now: Instant) -> bool {
        now >= self.next_poll
    }

    /// Poll if the interval has elapsed; reschedules the next poll either way.
    pub fn poll_if_due(&mut self, now: Instant, shown_samples: usize) -> Result<Option<ParsedLog>, AnalyzerError> {
        if !self.is_due(now) {
            return Ok(None);
        }
        self.next_poll = now + self.interval;
        self.poll(shown_samples)
    }

    /// Check the file once.
    ///
    /// # Returns
    ///
    /// `Some(log)` when the file changed size and now has more than
    /// `shown_samples` samples, `None` otherwise.
    pub fn poll(&mut self, shown_samples: usize) -> Result<Option<ParsedLog>, AnalyzerError> {
        let size = file_size(&self.path)?;
        if size == self.last_size {
            return Ok(None);
        }
        self.last_size = size;

        let parsed = load_log(&self.path)?;
        if parsed.samples.len() > shown_samples {
            log::debug!("Log grew to {} bytes, {} samples", size, parsed.samples.len());
            Ok(Some(parsed))
        } else {
            log::debug!("Log changed to {} bytes without new samples", size);
            Ok(None)
        }
    }
}
