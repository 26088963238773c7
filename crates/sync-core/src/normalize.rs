//! Log normalization: rebase timestamps onto the log's first entry.

use actsync_common::clock::{elapsed_since, Millis};
use actsync_event_model::event::LogEvent;

/// A log whose timestamps are relative to its first event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedLog {
    /// Events in file order, `time` relative to the first event.
    pub events: Vec<LogEvent>,

    /// Relative time of the first event carrying the anchor tag.
    pub anchor: Option<Millis>,
}

/// Rebase `events` onto the first event's timestamp and locate the anchor.
///
/// The anchor is the first event whose text form contains `anchor_tag`.
/// A log without an anchor still normalizes; the caller decides whether
/// that is fatal.
pub fn normalize(events: &[LogEvent], anchor_tag: &str) -> NormalizedLog {
    let Some(base) = events.first().map(|e| e.time) else {
        return NormalizedLog {
            events: Vec::new(),
            anchor: None,
        };
    };

    let mut anchor = None;
    let events = events
        .iter()
        .map(|event| {
            let relative = elapsed_since(base, event.time);
            if anchor.is_none() && event.kind.to_string().contains(anchor_tag) {
                anchor = Some(relative);
            }
            event.with_time(relative)
        })
        .collect();

    NormalizedLog { events, anchor }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actsync_event_model::log::parse_log;

    const LOG: &str = "\
0 09:59:58.000 START
1 09:59:58.400 a
2 10:00:00.250 <Ctrl>
3 10:00:01.000 <Ctrl>
4 10:00:02.125 <LClick(5, 5)>
";

    #[test]
    fn test_first_event_is_zero_and_anchor_found() {
        let log = normalize(&parse_log(LOG), "<Ctrl>");
        assert_eq!(log.events[0].time, 0);
        assert_eq!(log.events[1].time, 400);
        assert_eq!(log.events[4].time, 4125);
        assert_eq!(log.anchor, Some(2250));
    }

    #[test]
    fn test_normalizing_twice_is_idempotent() {
        let once = normalize(&parse_log(LOG), "<Ctrl>");
        let twice = normalize(&once.events, "<Ctrl>");
        assert_eq!(once, twice);
    }

    #[test]
    fn test_missing_anchor_still_normalizes() {
        let log = normalize(&parse_log(LOG), "<Alt>");
        assert_eq!(log.events.len(), 5);
        assert_eq!(log.anchor, None);
    }

    #[test]
    fn test_log_across_midnight() {
        let log = normalize(
            &parse_log("0 23:59:59.500 START\n1 00:00:00.250 <Ctrl>\n"),
            "<Ctrl>",
        );
        assert_eq!(log.anchor, Some(750));
    }

    #[test]
    fn test_empty_log() {
        let log = normalize(&[], "<Ctrl>");
        assert!(log.events.is_empty());
        assert_eq!(log.anchor, None);
    }
}
