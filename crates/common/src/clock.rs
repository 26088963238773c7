//! Millisecond clock utilities for log and video timelines.
//!
//! Event logs carry wall-clock time-of-day stamps (`HH:MM:SS.mmm`) while
//! videos count frames. Everything in between is expressed as signed
//! milliseconds so offsets may go negative without special casing.

use chrono::{NaiveTime, Timelike};

/// Milliseconds on some timeline (time-of-day, log-relative, or video).
pub type Millis = i64;

/// Milliseconds in one day, used to unwrap logs that cross midnight.
pub const DAY_MS: Millis = 24 * 60 * 60 * 1000;

/// Parse a `HH:MM:SS.fff` time-of-day into milliseconds since midnight.
///
/// Sub-millisecond digits are truncated. Returns `None` when the text is
/// not a valid time of day.
pub fn parse_time_of_day(text: &str) -> Option<Millis> {
    let time = NaiveTime::parse_from_str(text, "%H:%M:%S%.f").ok()?;
    let secs = time.num_seconds_from_midnight() as Millis;
    let millis = (time.nanosecond() / 1_000_000).min(999) as Millis;
    Some(secs * 1000 + millis)
}

/// Format milliseconds as `HH:MM:SS.mmm`. Negative input clamps to zero.
pub fn format_clock(ms: Millis) -> String {
    format_with_separator(ms, '.')
}

/// Format milliseconds as an SRT timestamp: `HH:MM:SS,mmm`.
pub fn format_srt_clock(ms: Millis) -> String {
    format_with_separator(ms, ',')
}

fn format_with_separator(ms: Millis, separator: char) -> String {
    let total_ms = ms.max(0);
    let hours = total_ms / 3_600_000;
    let minutes = (total_ms % 3_600_000) / 60_000;
    let seconds = (total_ms % 60_000) / 1000;
    let millis = total_ms % 1000;
    format!("{hours:02}:{minutes:02}:{seconds:02}{separator}{millis:03}")
}

/// Elapsed milliseconds from `base` to `time`, both time-of-day values.
///
/// A `time` earlier than `base` is taken to be on the following day.
pub fn elapsed_since(base: Millis, time: Millis) -> Millis {
    let delta = time - base;
    if delta < 0 {
        delta + DAY_MS
    } else {
        delta
    }
}

/// Midpoint between two timestamps, rounded toward `a`.
pub fn midpoint(a: Millis, b: Millis) -> Millis {
    a + (b - a) / 2
}

/// Convert a frame number to milliseconds at the given frame rate.
pub fn frame_to_ms(frame: u64, fps: f64) -> f64 {
    frame as f64 / fps * 1000.0
}
