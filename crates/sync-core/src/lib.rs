//! actsync Sync Core
//!
//! Aligns an input-event log with screen recordings and condenses it into
//! human-readable actions:
//! - **Normalize:** Rebase log timestamps onto the log's first entry
//! - **Offset:** Resolve the log-to-video clock offset from the anchor
//! - **Shift:** Move every event onto the video timeline
//! - **Attribute:** Tag events with the screen that contains them
//! - **Compress:** Fold event runs into composite actions
//!
//! This crate is pure computation with no I/O and no video decoding.

pub mod attribute;
pub mod compress;
pub mod normalize;
pub mod offset;
pub mod shift;

pub use attribute::ScreenAttributor;
pub use compress::{compress, ActionCompressor, CompressConfig};
pub use normalize::{normalize, NormalizedLog};
pub use offset::{Offset, OffsetTable};
pub use shift::{shift_events, shift_tagged};
