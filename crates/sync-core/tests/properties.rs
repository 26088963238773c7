use actsync_event_model::event::{EventKind, LogEvent, TaggedEvent};
use actsync_sync_core::compress::{compress, CompressConfig};
use actsync_sync_core::normalize::normalize;
use actsync_sync_core::offset::Offset;
use actsync_sync_core::shift::shift_events;
use proptest::prelude::*;

const PAYLOADS: &[&str] = &[
    "a",
    "b",
    "<Backspace>",
    "<Delete>",
    "<Ctrl>",
    "<Enter>",
    "HEARTBEAT",
    "<LButtonDown(5, 5)>",
    "<LButtonUp(9, 9)>",
    "<LClick(5, 5)>",
    "<LClick(6, 5)>",
    "<LDblClick(5, 5)>",
    "<RButtonDown(1, 2)>",
    "<RClick(1, 2)>",
];

/// A log of increasing time-of-day stamps starting mid-morning.
fn arb_log(payloads: &'static [&'static str]) -> impl Strategy<Value = Vec<LogEvent>> {
    prop::collection::vec((0i64..2_000, 0usize..payloads.len()), 1..60).prop_map(move |steps| {
        let mut time = 36_000_000;
        steps
            .into_iter()
            .enumerate()
            .map(|(seq, (gap, payload))| {
                time += gap;
                LogEvent::new(
                    seq as u64,
                    time,
                    EventKind::parse(payloads[payload]).expect("fixture payload parses"),
                )
            })
            .collect()
    })
}

/// Several screens shifted by different offsets and merged back in log
/// order: times may step backwards.
fn arb_merged_screens() -> impl Strategy<Value = Vec<TaggedEvent>> {
    prop::collection::vec((0i64..10_000, 0usize..PAYLOADS.len()), 1..60).prop_map(|steps| {
        steps
            .into_iter()
            .enumerate()
            .map(|(seq, (time, payload))| {
                let kind = EventKind::parse(PAYLOADS[payload]).expect("fixture payload parses");
                LogEvent::new(seq as u64, time, kind).into()
            })
            .collect()
    })
}

proptest! {
    #[test]
    fn normalize_and_shift_preserve_order(log in arb_log(PAYLOADS), offset_ms in -5_000.0f64..5_000.0) {
        let normalized = normalize(&log, "<Ctrl>");
        prop_assert_eq!(normalized.events[0].time, 0);
        prop_assert!(normalized.events.windows(2).all(|w| w[0].time <= w[1].time));

        let shifted = shift_events(&normalized.events, Offset::from_ms(offset_ms));
        prop_assert!(shifted.windows(2).all(|w| w[0].time <= w[1].time));
        prop_assert!(shifted.iter().all(|e| e.time >= 0));
        prop_assert!(shifted.len() < normalized.events.len());
    }

    #[test]
    fn compression_is_idempotent(log in arb_log(PAYLOADS)) {
        let events: Vec<TaggedEvent> = log.into_iter().map(TaggedEvent::from).collect();
        let first: Vec<_> = compress(&events, CompressConfig::default()).collect();

        let replayed: Vec<TaggedEvent> = first
            .iter()
            .enumerate()
            .map(|(seq, action)| {
                let kind = EventKind::parse(&action.label()).expect("labels reparse");
                LogEvent::new(seq as u64, action.end, kind).into()
            })
            .collect();
        let second: Vec<_> = compress(&replayed, CompressConfig::default()).collect();

        let first_labels: Vec<String> = first.iter().map(|a| a.label()).collect();
        let second_labels: Vec<String> = second.iter().map(|a| a.label()).collect();
        prop_assert_eq!(first_labels, second_labels);
    }

    #[test]
    fn captions_never_run_backwards(log in arb_log(PAYLOADS)) {
        let events: Vec<TaggedEvent> = log.into_iter().map(TaggedEvent::from).collect();
        for action in compress(&events, CompressConfig::default()) {
            prop_assert!(action.start <= action.end);
            prop_assert!(action.start >= 0);
        }
    }

    #[test]
    fn captions_never_run_backwards_across_screens(events in arb_merged_screens()) {
        for action in compress(&events, CompressConfig::default()) {
            prop_assert!(action.start <= action.end);
            prop_assert!(action.start >= 0);
        }
    }

    #[test]
    fn offset_resolution_is_pure(anchor in 0i64..600_000, frame in 0u64..6_000, fps in 1.0f64..240.0) {
        let a = Offset::resolve(anchor, frame, fps).unwrap();
        let b = Offset::resolve(anchor, frame, fps).unwrap();
        prop_assert_eq!(a, b);
        let expected = anchor as f64 - frame as f64 / fps * 1000.0;
        prop_assert!((a.as_ms() - expected).abs() < 1e-6);
        prop_assert_eq!(a.as_ms() < 0.0, (anchor as f64) < frame as f64 / fps * 1000.0);
    }
}
