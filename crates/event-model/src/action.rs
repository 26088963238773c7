//! Composite actions: what the user did, and when it was visible.

use std::fmt;

use actsync_common::clock::Millis;

use crate::event::{Coordinate, EventKind, MouseButton};
use crate::region::ScreenId;

/// Semantic content of a composite action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionKind {
    /// A single event passed through unchanged (or the click that replaced
    /// its button-down).
    Event(EventKind),

    /// A run of typed characters.
    Type(String),

    /// Button pressed at `from` and released at `to`.
    Drag {
        button: MouseButton,
        from: Coordinate,
        to: Coordinate,
    },
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Event(kind) => write!(f, "{kind}"),
            Self::Type(word) => write!(f, "<Type '{word}'>"),
            Self::Drag { from, to, .. } => write!(f, "<Drag From {from} To {to}>"),
        }
    }
}

/// One human-readable action with its visible time span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompositeAction {
    pub kind: ActionKind,

    /// Caption start on the video timeline.
    pub start: Millis,

    /// Caption end on the video timeline.
    pub end: Millis,

    /// Screen the action happened on (multi-video sessions).
    pub screen: Option<ScreenId>,
}

impl CompositeAction {
    /// Text label used in subtitles and the sequence file.
    pub fn label(&self) -> String {
        self.kind.to_string()
    }

    /// Where the action happened: the click point or the drag origin.
    pub fn coordinate(&self) -> Option<Coordinate> {
        match &self.kind {
            ActionKind::Event(kind) => kind.coordinate(),
            ActionKind::Type(_) => None,
            ActionKind::Drag { from, .. } => Some(*from),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels() {
        let typed = CompositeAction {
            kind: ActionKind::Type("hi".to_string()),
            start: 0,
            end: 100,
            screen: None,
        };
        assert_eq!(typed.label(), "<Type 'hi'>");
        assert_eq!(typed.coordinate(), None);

        let drag = CompositeAction {
            kind: ActionKind::Drag {
                button: MouseButton::Left,
                from: Coordinate::new(10, 20),
                to: Coordinate::new(50, 60),
            },
            start: 0,
            end: 100,
            screen: Some(1),
        };
        assert_eq!(drag.label(), "<Drag From (10, 20) To (50, 60)>");
        assert_eq!(drag.coordinate(), Some(Coordinate::new(10, 20)));
    }
}
