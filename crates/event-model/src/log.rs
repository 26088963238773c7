//! Plain-text event log format.
//!
//! One event per line: `sequence_id HH:MM:SS.mmm payload...`, fields
//! separated by whitespace. The payload may itself contain spaces
//! (`<LButtonDown(10, 20)>`), so everything after the timestamp is joined
//! back with single spaces.

use actsync_common::clock::{format_clock, parse_time_of_day};
use actsync_common::error::{ActsyncError, ActsyncResult};

use crate::event::{EventKind, LogEvent};

/// Parse one log line. Blank lines yield `Ok(None)`.
///
/// `line_no` is 1-based and only used for error reporting.
pub fn parse_log_line(line_no: usize, line: &str) -> ActsyncResult<Option<LogEvent>> {
    let mut fields = line.split_whitespace();
    let Some(seq) = fields.next() else {
        return Ok(None);
    };

    let sequence_id = seq
        .parse::<u64>()
        .map_err(|_| ActsyncError::malformed(line_no, format!("invalid sequence id {seq:?}")))?;

    let stamp = fields
        .next()
        .ok_or_else(|| ActsyncError::malformed(line_no, "missing timestamp"))?;
    let time = parse_time_of_day(stamp)
        .ok_or_else(|| ActsyncError::malformed(line_no, format!("invalid timestamp {stamp:?}")))?;

    let payload = fields.collect::<Vec<_>>().join(" ");
    let kind = EventKind::parse(&payload)
        .map_err(|e| ActsyncError::malformed(line_no, e.to_string()))?;

    Ok(Some(LogEvent::new(sequence_id, time, kind)))
}

/// Parse a whole log, skipping malformed lines with a warning.
pub fn parse_log(content: &str) -> Vec<LogEvent> {
    let mut events = Vec::new();
    for (idx, line) in content.lines().enumerate() {
        match parse_log_line(idx + 1, line) {
            Ok(Some(event)) => events.push(event),
            Ok(None) => {}
            Err(err) => tracing::warn!(error = %err, "Skipping log line"),
        }
    }
    events
}

/// Format one event as a log line (without trailing newline).
pub fn format_log_line(event: &LogEvent) -> String {
    format!(
        "{} {} {}",
        event.sequence_id,
        format_clock(event.time),
        event.kind
    )
}

/// Serialize events back to the log format.
pub fn serialize_log<'a>(events: impl IntoIterator<Item = &'a LogEvent>) -> String {
    let mut output = String::new();
    for event in events {
        output.push_str(&format_log_line(event));
        output.push('\n');
    }
    output
}
