//! actsync Pipeline
//!
//! Ties the pieces together for one session folder:
//! - **Session:** Find the event log and the recordings, decide the mode
//! - **Align:** Normalize, locate markers, shift, compress, emit
//!
//! Each folder is processed independently; a failure in one folder never
//! affects another.

pub mod align;
pub mod session;

pub use align::{align_session, normalize_log_file, AlignReport, ScreenReport};
pub use session::{discover_sessions, is_derived_log, ScreenVideo, Session, SessionMode};
