//! Screen regions for multi-monitor sessions.
//!
//! Each video of a multi-monitor session covers one rectangle of the
//! virtual desktop. The rectangle is encoded in the video filename as
//! `l<left>_t<top>_r<right>_b<bottom>` and parsed once per session.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::event::Coordinate;

/// 1-based screen number. Screen 1 is the one anchored at the desktop origin.
pub type ScreenId = u32;

/// A rectangle of the virtual desktop, half-open on the right and bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Rect {
    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Parse the `l<left>_t<top>_r<right>_b<bottom>` fragment of a filename.
    pub fn from_filename(name: &str) -> Option<Self> {
        static PATTERN: OnceLock<Regex> = OnceLock::new();
        let pattern = PATTERN.get_or_init(|| {
            Regex::new(r"l(-?\d+)_t(-?\d+)_r(-?\d+)_b(-?\d+)").expect("region pattern is valid")
        });
        let caps = pattern.captures(name)?;
        let rect = Self::new(
            caps[1].parse().ok()?,
            caps[2].parse().ok()?,
            caps[3].parse().ok()?,
            caps[4].parse().ok()?,
        );
        (rect.right > rect.left && rect.bottom > rect.top).then_some(rect)
    }

    /// `left <= x < right && top <= y < bottom`.
    pub fn contains(&self, point: Coordinate) -> bool {
        self.left <= point.x && point.x < self.right && self.top <= point.y && point.y < self.bottom
    }

    /// Whether the two rectangles share any pixel.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.left < other.right
            && other.left < self.right
            && self.top < other.bottom
            && other.top < self.bottom
    }
}

/// A screen of the session: its number and desktop rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenRegion {
    pub id: ScreenId,
    pub rect: Rect,
}

/// The set of screens of one session, built once and passed by reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenLayout {
    regions: Vec<ScreenRegion>,
}

/// Layout construction errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LayoutError {
    #[error("a screen layout needs at least one region")]
    Empty,

    #[error("screen regions {0:?} and {1:?} overlap")]
    Overlap(Rect, Rect),
}

impl ScreenLayout {
    /// Number the rectangles and validate that they are disjoint.
    ///
    /// Returns, for each input rectangle in input order, the id it was
    /// given. The rectangle containing the desktop origin becomes screen 1;
    /// the others follow in `(top, left)` order.
    pub fn number(rects: &[Rect]) -> Result<(Self, Vec<ScreenId>), LayoutError> {
        if rects.is_empty() {
            return Err(LayoutError::Empty);
        }
        for (i, a) in rects.iter().enumerate() {
            if let Some(b) = rects[i + 1..].iter().find(|b| a.overlaps(b)) {
                return Err(LayoutError::Overlap(*a, *b));
            }
        }

        let origin = Coordinate::new(0, 0);
        let mut order: Vec<usize> = (0..rects.len()).collect();
        order.sort_by_key(|&i| {
            let r = rects[i];
            (!r.contains(origin), r.top, r.left)
        });

        let mut ids = vec![0; rects.len()];
        let mut regions = Vec::with_capacity(rects.len());
        for (n, &i) in order.iter().enumerate() {
            let id = n as ScreenId + 1;
            ids[i] = id;
            regions.push(ScreenRegion { id, rect: rects[i] });
        }

        Ok((Self { regions }, ids))
    }

    /// Screen whose rectangle contains `point`.
    pub fn locate(&self, point: Coordinate) -> Option<ScreenId> {
        self.regions
            .iter()
            .find(|region| region.rect.contains(point))
            .map(|region| region.id)
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}
