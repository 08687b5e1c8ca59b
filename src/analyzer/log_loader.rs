//! File I/O for reading a device log into memory.
//!
//! The log is always read from the start: monitor mode re-parses the whole
//! file on growth instead of tailing it, so there is no incremental state.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use super::error::AnalyzerError;
use super::log_parser::parse_log_line;
use super::types::ParsedLog;

/// Buffer size for reading log files (8KB).
const BUFFER_SIZE: usize = 8 * 1024;

/// Read and parse the whole log file.
///
/// Lines are decoded lossily so that a half-written multibyte character at
/// the end of a growing file does not fail the read.
///
/// # Parameters
///
/// * `path` - Path to the log file
///
/// # Returns
///
/// `Ok(ParsedLog)` with samples and events in file order, `Err` if the file cannot be read.
pub fn load_log(path: &Path) -> Result<ParsedLog, AnalyzerError> {
    let file = File::open(path).map_err(|source| io_error(path, source))?;
    let mut reader = BufReader::with_capacity(BUFFER_SIZE, file);

    let mut parsed = ParsedLog::default();
    let mut line_buffer: Vec<u8> = Vec::with_capacity(512);
    let mut line_count = 0usize;

    loop {
        line_buffer.clear();
        let read = reader.read_until(b'\n', &mut line_buffer).map_err(|source| io_error(path, source))?;
        if read == 0 {
            break;
        }
        line_count += 1;

        let line = String::from_utf8_lossy(&line_buffer);
        if let Some(record) = parse_log_line(line.trim_end()) {
            parsed.push(record);
        }
    }

    log::debug!(
        "Parsed {:?}: {} lines, {} samples, {} events",
        path,
        line_count,
        parsed.samples.len(),
        parsed.events.len()
    );

    Ok(parsed)
}

/// Current size of the log file in bytes.
pub fn file_size(path: &Path) -> Result<u64, AnalyzerError> {
    std::fs::metadata(path).map(|m| m.len()).map_err(|source| io_error(path, source))
}

fn io_error(path: &Path, source: std::io::Error) -> AnalyzerError {
    AnalyzerError::Io { path: path.to_path_buf(), source }
}
