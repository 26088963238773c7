//! actsync Emitter
//!
//! Serializes composite actions for downstream consumers:
//! - **Subtitles:** SRT track with one cue per action
//! - **Sequence:** Plain `label, end` lines read by the frame extractor

pub mod sequence;
pub mod subtitles;

pub use sequence::{generate_sequence, parse_sequence, save_sequence, ActionSequence, SequenceStep};
pub use subtitles::{generate_srt, partition_by_screen, save_subtitles};
