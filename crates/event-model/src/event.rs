//! Input event types for the keyboard/mouse log.
//!
//! Each log payload is parsed once into an [`EventKind`]. Downstream stages
//! match on the variant and never look at the payload text again; the text
//! form is only reproduced through `Display` when logs are written back out.

use std::fmt;
use std::sync::OnceLock;

use actsync_common::clock::Millis;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::region::ScreenId;

/// Payload of the keep-alive event the recorder writes while idle.
pub const HEARTBEAT: &str = "HEARTBEAT";

/// Absolute pointer position in virtual-desktop pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coordinate {
    pub x: i32,
    pub y: i32,
}

impl Coordinate {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

impl MouseButton {
    fn prefix(self) -> char {
        match self {
            Self::Left => 'L',
            Self::Right => 'R',
            Self::Middle => 'M',
        }
    }

    fn from_prefix(prefix: &str) -> Option<Self> {
        match prefix {
            "L" => Some(Self::Left),
            "R" => Some(Self::Right),
            "M" => Some(Self::Middle),
            _ => None,
        }
    }
}

/// Discriminated union of logged event payloads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    /// A single typed character.
    Typed(char),

    /// A named control key such as `<Ctrl>` or `<Backspace>`.
    Key { name: String },

    /// Mouse button pressed.
    ButtonDown { button: MouseButton, at: Coordinate },

    /// Mouse button released.
    ButtonUp { button: MouseButton, at: Coordinate },

    /// Completed single click reported by the recorder.
    Click { button: MouseButton, at: Coordinate },

    /// Completed double click reported by the recorder.
    DoubleClick { button: MouseButton, at: Coordinate },

    /// Recorder keep-alive; carries no user action.
    Heartbeat,

    /// Any other tag, kept verbatim with its first embedded coordinate.
    Other { tag: String, at: Option<Coordinate> },
}

/// Reasons a payload cannot be turned into an [`EventKind`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EventParseError {
    #[error("empty event payload")]
    Empty,

    #[error("mouse event without a valid coordinate: {0}")]
    MissingCoordinate(String),

    #[error("coordinate out of range: {0}")]
    CoordinateRange(String),
}

fn button_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^<([LRM])(ButtonDown|ButtonUp|Click|DblClick)(.*)>$")
            .expect("button pattern is valid")
    })
}

fn coordinate_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\((-?\d+),\s*(-?\d+)\)").expect("coordinate pattern is valid")
    })
}

fn key_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^<([^<>()]+)>$").expect("key pattern is valid"))
}

/// Find the first `(x, y)` pair embedded in `text`.
pub fn find_coordinate(text: &str) -> Result<Option<Coordinate>, EventParseError> {
    let Some(caps) = coordinate_pattern().captures(text) else {
        return Ok(None);
    };
    let x = caps[1]
        .parse::<i32>()
        .map_err(|_| EventParseError::CoordinateRange(text.to_string()))?;
    let y = caps[2]
        .parse::<i32>()
        .map_err(|_| EventParseError::CoordinateRange(text.to_string()))?;
    Ok(Some(Coordinate::new(x, y)))
}

fn is_bare_coordinate(text: &str) -> bool {
    coordinate_pattern()
        .find(text)
        .is_some_and(|m| m.start() == 0 && m.end() == text.len())
}

impl EventKind {
    /// Parse a raw log payload.
    pub fn parse(payload: &str) -> Result<Self, EventParseError> {
        if payload.is_empty() {
            return Err(EventParseError::Empty);
        }
        if payload == HEARTBEAT {
            return Ok(Self::Heartbeat);
        }

        let mut chars = payload.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            return Ok(Self::Typed(c));
        }

        if let Some(caps) = button_pattern().captures(payload) {
            let button = MouseButton::from_prefix(&caps[1])
                .ok_or_else(|| EventParseError::MissingCoordinate(payload.to_string()))?;
            let tail = &caps[3];
            let at = find_coordinate(tail)?
                .ok_or_else(|| EventParseError::MissingCoordinate(payload.to_string()))?;
            // Anything besides the bare `(x, y)` is kept verbatim as `Other`.
            if is_bare_coordinate(tail) {
                return Ok(match &caps[2] {
                    "ButtonDown" => Self::ButtonDown { button, at },
                    "ButtonUp" => Self::ButtonUp { button, at },
                    "Click" => Self::Click { button, at },
                    _ => Self::DoubleClick { button, at },
                });
            }
        }

        if let Some(caps) = key_pattern().captures(payload) {
            return Ok(Self::Key {
                name: caps[1].to_string(),
            });
        }

        Ok(Self::Other {
            tag: payload.to_string(),
            at: find_coordinate(payload)?,
        })
    }

    /// Coordinate carried by this event, if any.
    pub fn coordinate(&self) -> Option<Coordinate> {
        match self {
            Self::ButtonDown { at, .. }
            | Self::ButtonUp { at, .. }
            | Self::Click { at, .. }
            | Self::DoubleClick { at, .. } => Some(*at),
            Self::Other { at, .. } => *at,
            Self::Typed(_) | Self::Key { .. } | Self::Heartbeat => None,
        }
    }

    /// Button and point of a completed click or double click.
    pub fn click_point(&self) -> Option<(MouseButton, Coordinate)> {
        match self {
            Self::Click { button, at } | Self::DoubleClick { button, at } => Some((*button, *at)),
            _ => None,
        }
    }

    /// Whether this is a deletion key (`<Backspace>` or `<Delete>`).
    pub fn is_deletion(&self) -> bool {
        matches!(self, Self::Key { name } if name == "Backspace" || name == "Delete")
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Typed(c) => write!(f, "{c}"),
            Self::Key { name } => write!(f, "<{name}>"),
            Self::ButtonDown { button, at } => write!(f, "<{}ButtonDown{at}>", button.prefix()),
            Self::ButtonUp { button, at } => write!(f, "<{}ButtonUp{at}>", button.prefix()),
            Self::Click { button, at } => write!(f, "<{}Click{at}>", button.prefix()),
            Self::DoubleClick { button, at } => write!(f, "<{}DblClick{at}>", button.prefix()),
            Self::Heartbeat => f.write_str(HEARTBEAT),
            Self::Other { tag, .. } => f.write_str(tag),
        }
    }
}

/// One line of an event log: `sequence_id timestamp payload`.
///
/// `time` is time-of-day for raw logs, log-relative after normalization,
/// and video time after the offset has been applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEvent {
    pub sequence_id: u64,
    pub time: Millis,
    pub kind: EventKind,
}

impl LogEvent {
    pub fn new(sequence_id: u64, time: Millis, kind: EventKind) -> Self {
        Self {
            sequence_id,
            time,
            kind,
        }
    }

    /// Same event on another timeline.
    pub fn with_time(&self, time: Millis) -> Self {
        Self {
            sequence_id: self.sequence_id,
            time,
            kind: self.kind.clone(),
        }
    }
}

/// An event attributed to a screen (multi-video sessions only).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedEvent {
    pub event: LogEvent,
    pub screen: Option<ScreenId>,
}

impl TaggedEvent {
    pub fn new(event: LogEvent, screen: Option<ScreenId>) -> Self {
        Self { event, screen }
    }

    pub fn time(&self) -> Millis {
        self.event.time
    }

    pub fn kind(&self) -> &EventKind {
        &self.event.kind
    }
}

impl From<LogEvent> for TaggedEvent {
    fn from(event: LogEvent) -> Self {
        Self {
            event,
            screen: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_typed_and_keys() {
        assert_eq!(EventKind::parse("a").unwrap(), EventKind::Typed('a'));
        assert_eq!(EventKind::parse("中").unwrap(), EventKind::Typed('中'));
        assert_eq!(
            EventKind::parse("<Backspace>").unwrap(),
            EventKind::Key {
                name: "Backspace".to_string()
            }
        );
        assert_eq!(EventKind::parse("HEARTBEAT").unwrap(), EventKind::Heartbeat);
        assert_eq!(EventKind::parse(""), Err(EventParseError::Empty));
    }

    #[test]
    fn test_parse_mouse_events() {
        assert_eq!(
            EventKind::parse("<LButtonDown(10, 20)>").unwrap(),
            EventKind::ButtonDown {
                button: MouseButton::Left,
                at: Coordinate::new(10, 20)
            }
        );
        assert_eq!(
            EventKind::parse("<RDblClick(-1920,5)>").unwrap(),
            EventKind::DoubleClick {
                button: MouseButton::Right,
                at: Coordinate::new(-1920, 5)
            }
        );
        assert!(matches!(
            EventKind::parse("<LButtonUp>"),
            Err(EventParseError::MissingCoordinate(_))
        ));
        assert!(matches!(
            EventKind::parse("<LClick(99999999999, 1)>"),
            Err(EventParseError::CoordinateRange(_))
        ));
    }

    #[test]
    fn test_parse_other_keeps_coordinate() {
        let kind = EventKind::parse("<Scroll(300, 400) down>").unwrap();
        assert_eq!(kind.coordinate(), Some(Coordinate::new(300, 400)));
        assert_eq!(kind.to_string(), "<Scroll(300, 400) down>");
    }

    #[test]
    fn test_button_payload_with_trailing_text_is_kept_verbatim() {
        let kind = EventKind::parse("<LButtonDown(1, 2) x>").unwrap();
        assert_eq!(
            kind,
            EventKind::Other {
                tag: "<LButtonDown(1, 2) x>".to_string(),
                at: Some(Coordinate::new(1, 2)),
            }
        );
        assert_eq!(kind.to_string(), "<LButtonDown(1, 2) x>");
        assert_eq!(kind.click_point(), None);

        let kind = EventKind::parse("<RClick x(3, 4)>").unwrap();
        assert!(matches!(kind, EventKind::Other { .. }));
        assert_eq!(kind.to_string(), "<RClick x(3, 4)>");
    }

    #[test]
    fn test_display_reproduces_payload() {
        for payload in [
            "x",
            "<Ctrl>",
            "<LButtonDown(10, 20)>",
            "<LButtonUp(50, 60)>",
            "<LClick(5, 5)>",
            "<RDblClick(7, 8)>",
            "HEARTBEAT",
            "<Type 'hi'>",
        ] {
            assert_eq!(EventKind::parse(payload).unwrap().to_string(), payload);
        }
    }

    #[test]
    fn test_deletion_keys() {
        assert!(EventKind::parse("<Backspace>").unwrap().is_deletion());
        assert!(EventKind::parse("<Delete>").unwrap().is_deletion());
        assert!(!EventKind::parse("<Enter>").unwrap().is_deletion());
        assert!(!EventKind::Typed('d').is_deletion());
    }
}
