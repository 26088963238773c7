//! actsync Video
//!
//! Everything the pipeline needs from a screen recording:
//! - **Probe:** Frame size and rate via `ffprobe`
//! - **Frames:** Sequential RGB frames decoded by `ffmpeg` over a pipe
//! - **Marker:** Locate the frame where the calibration patch disappears
//!
//! Decoding is delegated to the `ffmpeg`/`ffprobe` binaries on `PATH`;
//! marker detection itself works on any [`FrameSource`].

pub mod frames;
pub mod marker;
pub mod probe;

pub use frames::{FfmpegFrameReader, FrameSource};
pub use marker::{FfmpegMarkerLocator, MarkerDetector, MarkerLocator, MarkerReport, MarkerScan};
pub use probe::{probe_video, VideoInfo};

/// Whether `binary` can be found on `PATH`.
pub fn command_exists(binary: &str) -> bool {
    std::process::Command::new("sh")
        .arg("-c")
        .arg(format!("command -v {binary} >/dev/null 2>&1"))
        .status()
        .map(|status| status.success())
        .unwrap_or(false)
}
