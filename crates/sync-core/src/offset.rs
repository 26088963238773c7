//! Clock offset between the event log and a video.
//!
//! `offset = anchor_ms - marker_frame / fps * 1000`
//!
//! A positive offset means the log started recording before the video.
//! Multi-video sessions resolve one offset per video against the same
//! anchor; that assumes the anchor input hit every recording at the same
//! instant, which nothing here can verify.

use std::collections::BTreeMap;

use actsync_common::clock::{frame_to_ms, Millis};
use actsync_common::error::{ActsyncError, ActsyncResult};
use actsync_event_model::region::ScreenId;
use serde::Serialize;

/// Signed log-to-video offset in (fractional) milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Offset {
    ms: f64,
}

impl Offset {
    /// Resolve the offset from the anchor's log-relative time and the
    /// frame at which the calibration marker disappeared.
    pub fn resolve(anchor_ms: Millis, marker_frame: u64, fps: f64) -> ActsyncResult<Self> {
        if !fps.is_finite() || fps <= 0.0 {
            return Err(ActsyncError::video(format!("invalid frame rate {fps}")));
        }
        Ok(Self {
            ms: anchor_ms as f64 - frame_to_ms(marker_frame, fps),
        })
    }

    pub fn from_ms(ms: f64) -> Self {
        Self { ms }
    }

    pub fn as_ms(&self) -> f64 {
        self.ms
    }

    /// Move a log-relative time onto the video timeline.
    ///
    /// Returns `None` when the time does not exceed the offset, i.e. the
    /// event happened before the video's first frame. The result is
    /// truncated to whole milliseconds.
    pub fn apply(&self, time: Millis) -> Option<Millis> {
        let time = time as f64;
        (time > self.ms).then(|| (time - self.ms).floor() as Millis)
    }
}

/// Offsets of a multi-video session, keyed by screen.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OffsetTable {
    offsets: BTreeMap<ScreenId, Offset>,
}

impl OffsetTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, screen: ScreenId, offset: Offset) {
        self.offsets.insert(screen, offset);
    }

    pub fn get(&self, screen: ScreenId) -> Option<Offset> {
        self.offsets.get(&screen).copied()
    }

    pub fn screens(&self) -> impl Iterator<Item = ScreenId> + '_ {
        self.offsets.keys().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_positive_offset() {
        // Anchor at 5s in the log, marker gone at frame 60 of a 30fps video (2s).
        let offset = Offset::resolve(5000, 60, 30.0).unwrap();
        assert!((offset.as_ms() - 3000.0).abs() < 1e-9);
        assert_eq!(offset.apply(3500), Some(500));
        assert_eq!(offset.apply(3000), None);
        assert_eq!(offset.apply(10), None);
    }

    #[test]
    fn test_resolve_negative_offset() {
        let offset = Offset::resolve(1000, 90, 30.0).unwrap();
        assert!((offset.as_ms() + 2000.0).abs() < 1e-9);
        assert_eq!(offset.apply(0), Some(2000));
    }

    #[test]
    fn test_resolution_is_pure() {
        let a = Offset::resolve(12_345, 1001, 29.97).unwrap();
        let b = Offset::resolve(12_345, 1001, 29.97).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_fractional_offset_truncates() {
        let offset = Offset::resolve(2000, 1, 3.0).unwrap();
        // 2000 - 333.33.. = 1666.66..
        assert_eq!(offset.apply(5000), Some(3333));
    }

    #[test]
    fn test_invalid_fps() {
        assert!(Offset::resolve(0, 1, 0.0).is_err());
        assert!(Offset::resolve(0, 1, f64::NAN).is_err());
    }

    #[test]
    fn test_offset_table() {
        let mut table = OffsetTable::new();
        table.insert(2, Offset::from_ms(-10.0));
        table.insert(1, Offset::from_ms(25.0));
        assert_eq!(table.screens().collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(table.get(2), Some(Offset::from_ms(-10.0)));
        assert_eq!(table.get(3), None);
    }
}
