//! Video metadata via `ffprobe`.

use std::path::Path;
use std::process::Command;

use actsync_common::error::{ActsyncError, ActsyncResult};
use serde::{Deserialize, Serialize};

/// Properties of the first video stream of a file.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VideoInfo {
    pub width: u32,
    pub height: u32,
    pub fps: f64,
    /// Frame count when the container records it.
    pub frame_count: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct ProbeOutput {
    #[serde(default)]
    streams: Vec<ProbeStream>,
}

#[derive(Debug, Deserialize)]
struct ProbeStream {
    width: Option<u32>,
    height: Option<u32>,
    r_frame_rate: Option<String>,
    avg_frame_rate: Option<String>,
    nb_frames: Option<String>,
}

/// Probe `path` with `ffprobe`.
pub fn probe_video(path: &Path) -> ActsyncResult<VideoInfo> {
    let output = Command::new("ffprobe")
        .args([
            "-v",
            "error",
            "-select_streams",
            "v:0",
            "-show_entries",
            "stream=width,height,r_frame_rate,avg_frame_rate,nb_frames",
            "-of",
            "json",
        ])
        .arg(path)
        .output()
        .map_err(|e| ActsyncError::video(format!("Failed to run ffprobe: {e}")))?;

    if !output.status.success() {
        return Err(ActsyncError::video(format!(
            "ffprobe failed on {} (status {}): {}",
            path.display(),
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }

    let info = parse_probe_output(&String::from_utf8_lossy(&output.stdout))?;
    tracing::debug!(
        path = %path.display(),
        width = info.width,
        height = info.height,
        fps = info.fps,
        "Probed video"
    );
    Ok(info)
}

/// Parse `ffprobe -of json` output for the first video stream.
pub fn parse_probe_output(json: &str) -> ActsyncResult<VideoInfo> {
    let probe: ProbeOutput = serde_json::from_str(json)?;
    let stream = probe
        .streams
        .into_iter()
        .next()
        .ok_or_else(|| ActsyncError::video("no video stream"))?;

    let (width, height) = match (stream.width, stream.height) {
        (Some(w), Some(h)) if w > 0 && h > 0 => (w, h),
        _ => return Err(ActsyncError::video("video stream has no dimensions")),
    };

    let fps = [stream.r_frame_rate, stream.avg_frame_rate]
        .iter()
        .flatten()
        .find_map(|rate| parse_rate(rate))
        .ok_or_else(|| ActsyncError::video("video stream has no usable frame rate"))?;

    Ok(VideoInfo {
        width,
        height,
        fps,
        frame_count: stream.nb_frames.and_then(|n| n.parse().ok()),
    })
}

/// Parse an ffmpeg rate such as `30000/1001` or `25`.
pub fn parse_rate(text: &str) -> Option<f64> {
    let rate = match text.split_once('/') {
        Some((num, den)) => {
            let num: f64 = num.trim().parse().ok()?;
            let den: f64 = den.trim().parse().ok()?;
            if den == 0.0 {
                return None;
            }
            num / den
        }
        None => text.trim().parse().ok()?,
    };
    (rate.is_finite() && rate > 0.0).then_some(rate)
}
