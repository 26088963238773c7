//! Action compression: fold runs of raw events into composite actions.
//!
//! The compressor walks the shifted log left to right with a single cursor
//! and only ever looks one event ahead. Per action it:
//!
//! 1. skips heartbeats,
//! 2. picks a caption start between the previous event and this one,
//! 3. merges typed characters into one `Type` action,
//! 4. merges a run of the same deletion key into one action,
//! 5. turns button-down + matching button-up into a `Drag`,
//! 6. replaces button-down + same-point click/double-click with the click,
//! 7. picks a caption end between this event and the next.
//!
//! Deletion runs and button pairs look past heartbeats, so a keep-alive
//! landing between them never leaves a pair that a second pass would merge.
//!
//! Caption bounds sit at the midpoint between neighbouring events, but
//! never closer than `pre_roll_ms` to the event they frame, so captions do
//! not overlap yet each gets a minimum lead-in. Multi-screen streams are
//! shifted per screen and may step backwards in time; an end that would
//! fall before its start is pinned to the start.

use actsync_common::clock::{midpoint, Millis};
use actsync_common::error::ActsyncError;
use actsync_event_model::action::{ActionKind, CompositeAction};
use actsync_event_model::event::{EventKind, TaggedEvent};

/// Compressor tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompressConfig {
    /// Minimum caption lead-in before an event (ms).
    pub pre_roll_ms: Millis,
}

impl Default for CompressConfig {
    fn default() -> Self {
        Self { pre_roll_ms: 150 }
    }
}

/// Lazy iterator of composite actions over a shifted event stream.
///
/// Cloning the iterator (or calling [`compress`] again) restarts the fold,
/// so each serializer can consume its own pass.
#[derive(Debug, Clone)]
pub struct ActionCompressor<'a> {
    events: &'a [TaggedEvent],
    cursor: usize,
    config: CompressConfig,
}

/// Compress `events` into composite actions.
pub fn compress(events: &[TaggedEvent], config: CompressConfig) -> ActionCompressor<'_> {
    ActionCompressor {
        events,
        cursor: 0,
        config,
    }
}

impl<'a> ActionCompressor<'a> {
    fn time(&self, i: usize) -> Millis {
        self.events[i].time()
    }

    fn kind(&self, i: usize) -> Option<&'a EventKind> {
        self.events.get(i).map(|e| e.kind())
    }

    /// First non-heartbeat event after `i`.
    fn next_active(&self, i: usize) -> Option<(usize, &'a EventKind)> {
        self.events
            .iter()
            .enumerate()
            .skip(i + 1)
            .map(|(j, e)| (j, e.kind()))
            .find(|(_, kind)| !matches!(kind, EventKind::Heartbeat))
    }

    /// Caption start for an action whose first event is `i`.
    fn start_time(&self, i: usize) -> Millis {
        let t = self.time(i);
        let floor = t - self.config.pre_roll_ms;
        let start = match i.checked_sub(1) {
            None => floor,
            Some(prev) => midpoint(self.time(prev), t).max(floor),
        };
        start.max(0)
    }

    /// Caption end for an action whose last event is `i`.
    fn end_time(&self, i: usize) -> Millis {
        match self.events.get(i + 1) {
            None => self.time(i),
            Some(next) => {
                let next_t = next.time();
                midpoint(self.time(i), next_t).max(next_t - self.config.pre_roll_ms)
            }
        }
    }
}

impl<'a> Iterator for ActionCompressor<'a> {
    type Item = CompositeAction;

    fn next(&mut self) -> Option<CompositeAction> {
        loop {
            let mut i = self.cursor;
            let current = self.kind(i)?;

            if matches!(current, EventKind::Heartbeat) {
                self.cursor = i + 1;
                continue;
            }

            let start = self.start_time(i);

            let kind = match current {
                EventKind::Typed(c) => {
                    let mut word = String::from(*c);
                    while let Some(EventKind::Typed(next)) = self.kind(i + 1) {
                        word.push(*next);
                        i += 1;
                    }
                    ActionKind::Type(word)
                }
                deletion if deletion.is_deletion() => {
                    while let Some((j, next)) = self.next_active(i) {
                        if next != deletion {
                            break;
                        }
                        i = j;
                    }
                    ActionKind::Event(deletion.clone())
                }
                EventKind::ButtonDown { button, at } => match self.next_active(i) {
                    Some((
                        j,
                        EventKind::ButtonUp {
                            button: released,
                            at: to,
                        },
                    )) if released == button => {
                        i = j;
                        ActionKind::Drag {
                            button: *button,
                            from: *at,
                            to: *to,
                        }
                    }
                    Some((j, click)) if click.click_point() == Some((*button, *at)) => {
                        i = j;
                        ActionKind::Event(click.clone())
                    }
                    Some((_, EventKind::ButtonDown { button: again, .. })) if again == button => {
                        let err = ActsyncError::malformed_event(
                            self.events[i].event.sequence_id,
                            format!("{current} pressed again before release"),
                        );
                        tracing::warn!(error = %err, "Skipping unmatched button-down");
                        self.cursor = i + 1;
                        continue;
                    }
                    _ => ActionKind::Event(current.clone()),
                },
                other => ActionKind::Event(other.clone()),
            };

            let end = self.end_time(i).max(start);
            let screen = self.events[i].screen;
            self.cursor = i + 1;

            return Some(CompositeAction {
                kind,
                start,
                end,
                screen,
            });
        }
    }
}
