//! Timestamp shifting onto the video timeline.
//!
//! The first line of a normalized log is the recorder's start sentinel and
//! never reaches the output. Events that would land at or before the
//! video's first frame are dropped.

use actsync_event_model::event::{LogEvent, TaggedEvent};

use crate::offset::{Offset, OffsetTable};

/// Shift a single-video log by `offset`.
pub fn shift_events(events: &[LogEvent], offset: Offset) -> Vec<LogEvent> {
    let shifted: Vec<LogEvent> = events
        .iter()
        .skip(1)
        .filter_map(|event| offset.apply(event.time).map(|time| event.with_time(time)))
        .collect();

    let dropped = events.len().saturating_sub(1) - shifted.len();
    if dropped > 0 {
        tracing::debug!(
            dropped,
            offset_ms = offset.as_ms(),
            "Dropped events before the first video frame"
        );
    }
    shifted
}

/// Shift a screen-tagged log, each event by its own screen's offset.
///
/// Events on a screen without a resolved offset are dropped: their video
/// could not be synchronized.
pub fn shift_tagged(events: &[TaggedEvent], offsets: &OffsetTable) -> Vec<TaggedEvent> {
    let mut unsynced = 0usize;
    let shifted: Vec<TaggedEvent> = events
        .iter()
        .skip(1)
        .filter_map(|tagged| {
            let offset = tagged.screen.and_then(|screen| offsets.get(screen));
            let Some(offset) = offset else {
                unsynced += 1;
                return None;
            };
            offset
                .apply(tagged.time())
                .map(|time| TaggedEvent::new(tagged.event.with_time(time), tagged.screen))
        })
        .collect();

    if unsynced > 0 {
        tracing::warn!(
            events = unsynced,
            "Dropped events on screens without a synchronized video"
        );
    }
    shifted
}

#[cfg(test)]
mod tests {
    use super::*;
    use actsync_event_model::event::EventKind;

    fn event(seq: u64, time: i64) -> LogEvent {
        LogEvent::new(seq, time, EventKind::Typed('x'))
    }

    #[test]
    fn test_first_line_always_skipped() {
        let events = vec![event(0, 5000), event(1, 6000)];
        let shifted = shift_events(&events, Offset::from_ms(-100.0));
        assert_eq!(shifted, vec![event(1, 6100)]);
    }

    #[test]
    fn test_events_at_or_before_offset_dropped() {
        let events = vec![event(0, 0), event(1, 900), event(2, 1000), event(3, 1001)];
        let shifted = shift_events(&events, Offset::from_ms(1000.0));
        assert_eq!(shifted, vec![event(3, 1)]);
    }

    #[test]
    fn test_tagged_shift_uses_screen_offset() {
        let mut offsets = OffsetTable::new();
        offsets.insert(1, Offset::from_ms(100.0));
        offsets.insert(2, Offset::from_ms(-50.0));

        let events = vec![
            TaggedEvent::new(event(0, 0), Some(1)),
            TaggedEvent::new(event(1, 500), Some(1)),
            TaggedEvent::new(event(2, 600), Some(2)),
            TaggedEvent::new(event(3, 700), Some(3)),
        ];
        let shifted = shift_tagged(&events, &offsets);
        assert_eq!(
            shifted,
            vec![
                TaggedEvent::new(event(1, 400), Some(1)),
                TaggedEvent::new(event(2, 650), Some(2)),
            ]
        );
    }
}
