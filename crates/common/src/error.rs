//! Error types shared across actsync crates.

use std::path::PathBuf;

/// Top-level error type for actsync operations.
///
/// Every variant is terminal at its own granularity: a malformed line is
/// skipped, a failed frame is skipped, a missing anchor aborts one session.
#[derive(Debug, thiserror::Error)]
pub enum ActsyncError {
    #[error("Missing input in {folder}: {what}")]
    MissingInput { folder: PathBuf, what: String },

    #[error("Anchor event {tag} not found in {path}")]
    AnchorNotFound { path: PathBuf, tag: String },

    #[error("Marker not found in {video}: {reason}")]
    MarkerNotFound { video: PathBuf, reason: String },

    #[error("Malformed line {line}: {reason}")]
    MalformedLine { line: usize, reason: String },

    #[error("Malformed event (sequence id {sequence_id}): {reason}")]
    MalformedEvent { sequence_id: u64, reason: String },

    #[error("Frame read failure: {message}")]
    FrameRead { message: String },

    #[error("Coordinate ({x}, {y}) is outside every screen region")]
    CoordinateOutOfRegion { x: i32, y: i32 },

    #[error("Video error: {message}")]
    Video { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using ActsyncError.
pub type ActsyncResult<T> = Result<T, ActsyncError>;

impl ActsyncError {
    pub fn missing_input(folder: impl Into<PathBuf>, what: impl Into<String>) -> Self {
        Self::MissingInput {
            folder: folder.into(),
            what: what.into(),
        }
    }

    pub fn malformed(line: usize, reason: impl Into<String>) -> Self {
        Self::MalformedLine {
            line,
            reason: reason.into(),
        }
    }

    pub fn malformed_event(sequence_id: u64, reason: impl Into<String>) -> Self {
        Self::MalformedEvent {
            sequence_id,
            reason: reason.into(),
        }
    }

    pub fn frame_read(msg: impl Into<String>) -> Self {
        Self::FrameRead {
            message: msg.into(),
        }
    }

    pub fn video(msg: impl Into<String>) -> Self {
        Self::Video {
            message: msg.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Whether this error should abort only the current session folder
    /// rather than the whole batch.
    pub fn is_session_scoped(&self) -> bool {
        matches!(
            self,
            Self::MissingInput { .. } | Self::AnchorNotFound { .. } | Self::MarkerNotFound { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = ActsyncError::missing_input("/data/s1", "no log file");
        assert_eq!(err.to_string(), "Missing input in /data/s1: no log file");

        let err = ActsyncError::CoordinateOutOfRegion { x: -5, y: 12 };
        assert_eq!(
            err.to_string(),
            "Coordinate (-5, 12) is outside every screen region"
        );

        let err = ActsyncError::malformed(7, "bad timestamp");
        assert_eq!(err.to_string(), "Malformed line 7: bad timestamp");

        let err = ActsyncError::malformed_event(
            42,
            "<LButtonDown(1, 1)> pressed again before release",
        );
        assert_eq!(
            err.to_string(),
            "Malformed event (sequence id 42): <LButtonDown(1, 1)> pressed again before release"
        );
    }

    #[test]
    fn test_session_scoped_kinds() {
        assert!(ActsyncError::missing_input("a", "b").is_session_scoped());
        assert!(ActsyncError::AnchorNotFound {
            path: "log.txt".into(),
            tag: "<Ctrl>".into()
        }
        .is_session_scoped());
        assert!(!ActsyncError::malformed(3, "bad timestamp").is_session_scoped());
        assert!(!ActsyncError::malformed_event(3, "unmatched press").is_session_scoped());
        assert!(!ActsyncError::frame_read("eof").is_session_scoped());
    }
}
