//! Screen attribution for multi-monitor sessions.

use actsync_common::error::ActsyncError;
use actsync_event_model::event::{LogEvent, TaggedEvent};
use actsync_event_model::region::{ScreenId, ScreenLayout};

/// Screen assumed before any event has carried a coordinate.
pub const DEFAULT_SCREEN: ScreenId = 1;

/// Tags events with the screen whose region contains their coordinate.
///
/// Coordinateless events, and coordinates outside every region, keep the
/// most recently assigned screen.
#[derive(Debug, Clone)]
pub struct ScreenAttributor<'a> {
    layout: &'a ScreenLayout,
    current: ScreenId,
    out_of_region: usize,
}

impl<'a> ScreenAttributor<'a> {
    pub fn new(layout: &'a ScreenLayout) -> Self {
        Self {
            layout,
            current: DEFAULT_SCREEN,
            out_of_region: 0,
        }
    }

    /// Attribute one event, updating the current screen.
    pub fn attribute(&mut self, event: LogEvent) -> TaggedEvent {
        if let Some(point) = event.kind.coordinate() {
            match self.layout.locate(point) {
                Some(screen) => self.current = screen,
                None => {
                    self.out_of_region += 1;
                    let err = ActsyncError::CoordinateOutOfRegion {
                        x: point.x,
                        y: point.y,
                    };
                    tracing::warn!(
                        error = %err,
                        sequence_id = event.sequence_id,
                        screen = self.current,
                        "Keeping previous screen"
                    );
                }
            }
        }
        TaggedEvent::new(event, Some(self.current))
    }

    /// Attribute a whole log in order.
    pub fn attribute_all(mut self, events: impl IntoIterator<Item = LogEvent>) -> Vec<TaggedEvent> {
        events.into_iter().map(|e| self.attribute(e)).collect()
    }

    /// Number of coordinates that matched no region so far.
    pub fn out_of_region(&self) -> usize {
        self.out_of_region
    }

    pub fn current(&self) -> ScreenId {
        self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actsync_event_model::event::{Coordinate, EventKind, MouseButton};
    use actsync_event_model::region::Rect;

    fn layout() -> ScreenLayout {
        ScreenLayout::number(&[Rect::new(0, 0, 200, 200), Rect::new(200, 0, 400, 200)])
            .unwrap()
            .0
    }

    fn click(seq: u64, x: i32, y: i32) -> LogEvent {
        LogEvent::new(
            seq,
            seq as i64 * 100,
            EventKind::Click {
                button: MouseButton::Left,
                at: Coordinate::new(x, y),
            },
        )
    }

    fn key(seq: u64) -> LogEvent {
        LogEvent::new(seq, seq as i64 * 100, EventKind::Typed('k'))
    }

    #[test]
    fn test_containment_and_inheritance() {
        let layout = layout();
        let tagged = ScreenAttributor::new(&layout).attribute_all(vec![
            key(0),
            click(1, 250, 10),
            key(2),
            click(3, 150, 150),
            key(4),
        ]);
        let screens: Vec<_> = tagged.iter().map(|t| t.screen).collect();
        assert_eq!(
            screens,
            vec![Some(1), Some(2), Some(2), Some(1), Some(1)]
        );
    }

    #[test]
    fn test_out_of_region_keeps_previous_screen() {
        let layout = layout();
        let mut attributor = ScreenAttributor::new(&layout);
        assert_eq!(attributor.attribute(click(0, 300, 100)).screen, Some(2));
        assert_eq!(attributor.attribute(click(1, 900, 900)).screen, Some(2));
        assert_eq!(attributor.out_of_region(), 1);
        assert_eq!(attributor.current(), 2);
    }
}
