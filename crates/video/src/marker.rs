//! Calibration marker detection.
//!
//! At the start of a session the recorder shows a light-blue patch above the
//! screen center, then hides it at the moment the anchor chord is pressed.
//! The frame on which the patch was last visible ties the video clock to the
//! log clock.

use std::path::{Path, PathBuf};

use actsync_common::config::MarkerConfig;
use actsync_common::error::{ActsyncError, ActsyncResult};
use image::RgbImage;
use serde::Serialize;

use crate::frames::{FfmpegFrameReader, FrameSource};
use crate::probe::{probe_video, VideoInfo};

/// Outcome of scanning a frame source. Frame numbers are 1-based.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MarkerScan {
    /// First frame showing the marker.
    pub appearance: Option<u64>,

    /// Last frame showing the marker before it vanished.
    pub disappearance: Option<u64>,

    /// Frames consumed, including ones that failed to decode.
    pub frames_scanned: u64,

    /// Frames skipped because they could not be decoded.
    pub frame_errors: u64,
}

/// Marker location in one video file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkerReport {
    pub video: PathBuf,
    pub info: VideoInfo,
    pub scan: MarkerScan,

    /// The disappearance frame used for offset resolution.
    pub frame: u64,
}

impl MarkerReport {
    pub fn fps(&self) -> f64 {
        self.info.fps
    }
}

/// Finds the marker frame of a video.
pub trait MarkerLocator {
    fn locate(&self, video: &Path) -> ActsyncResult<MarkerReport>;
}

/// Window placement and color matching over decoded frames.
#[derive(Debug, Clone)]
pub struct MarkerDetector {
    config: MarkerConfig,
}

impl MarkerDetector {
    pub fn new(config: MarkerConfig) -> Self {
        Self { config }
    }

    /// Number of frames scanned at `fps` before giving up.
    pub fn frame_budget(&self, fps: f64) -> u64 {
        let budget = (fps * self.config.scan_secs).floor();
        if budget.is_finite() && budget > 0.0 {
            budget as u64
        } else {
            0
        }
    }

    /// Run the appear/disappear state machine over `source`.
    ///
    /// Stops at the first frame without the marker after it was seen, at end
    /// of stream, or when the budget for `fps` is spent.
    pub fn scan(&self, source: &mut dyn FrameSource, fps: f64) -> MarkerScan {
        let budget = self.frame_budget(fps);
        let mut scan = MarkerScan::default();
        let mut visible = false;

        while scan.frames_scanned < budget {
            let frame = match source.next_frame() {
                Ok(Some(frame)) => frame,
                Ok(None) => break,
                Err(err) => {
                    scan.frames_scanned += 1;
                    scan.frame_errors += 1;
                    tracing::warn!(frame = scan.frames_scanned, error = %err, "Skipping unreadable frame");
                    continue;
                }
            };
            scan.frames_scanned += 1;
            let index = scan.frames_scanned;

            let present = self.is_marker(&frame);
            if present && !visible {
                tracing::debug!(frame = index, "Marker appeared");
                scan.appearance = Some(index);
            } else if !present && visible {
                tracing::debug!(frame = index - 1, "Marker disappeared");
                scan.disappearance = Some(index - 1);
                break;
            }
            visible = present;
        }

        scan
    }

    /// Whether the sampling window of `frame` matches the reference color.
    pub fn is_marker(&self, frame: &RgbImage) -> bool {
        let Some(mean) = self.mean_color(frame) else {
            return false;
        };
        let tolerance = i16::from(self.config.tolerance);
        mean.iter()
            .zip(self.config.reference_rgb)
            .all(|(&got, want)| (i16::from(got) - i16::from(want)).abs() <= tolerance)
    }

    /// Per-channel mean of the sampling window, truncated.
    pub fn mean_color(&self, frame: &RgbImage) -> Option<[u8; 3]> {
        let (x0, y0, x1, y1) = self.window(frame.width(), frame.height());
        let count = u64::from(x1 - x0) * u64::from(y1 - y0);
        if count == 0 {
            return None;
        }

        let mut sums = [0u64; 3];
        for y in y0..y1 {
            for x in x0..x1 {
                let pixel = frame.get_pixel(x, y);
                for (sum, channel) in sums.iter_mut().zip(pixel.0) {
                    *sum += u64::from(channel);
                }
            }
        }
        Some(sums.map(|sum| (sum / count) as u8))
    }

    /// Sampling window `[x0, x1) x [y0, y1)`, clamped to the frame.
    pub fn window(&self, width: u32, height: u32) -> (u32, u32, u32, u32) {
        let size = self.config.window_size;
        let center_x = width / 2;
        let center_y = (height / 2).saturating_sub(self.config.vertical_offset_px);

        let x0 = center_x.saturating_sub(size / 2).min(width);
        let y0 = center_y.saturating_sub(size / 2).min(height);
        let x1 = x0.saturating_add(size).min(width);
        let y1 = y0.saturating_add(size).min(height);
        (x0, y0, x1, y1)
    }
}

/// Probes a file, decodes it with `ffmpeg` and runs the detector.
#[derive(Debug, Clone)]
pub struct FfmpegMarkerLocator {
    detector: MarkerDetector,
}

impl FfmpegMarkerLocator {
    pub fn new(config: MarkerConfig) -> Self {
        Self {
            detector: MarkerDetector::new(config),
        }
    }
}

impl MarkerLocator for FfmpegMarkerLocator {
    fn locate(&self, video: &Path) -> ActsyncResult<MarkerReport> {
        let info = probe_video(video)?;
        let budget = self.detector.frame_budget(info.fps);
        if budget == 0 {
            return Err(ActsyncError::video(format!(
                "no frames to scan at {} fps",
                info.fps
            )));
        }

        let mut reader = FfmpegFrameReader::open(video, &info, budget)?;
        let scan = self.detector.scan(&mut reader, info.fps);

        let frame = match (scan.appearance, scan.disappearance) {
            (_, Some(frame)) => frame,
            (None, None) => {
                return Err(ActsyncError::MarkerNotFound {
                    video: video.to_path_buf(),
                    reason: format!("never appeared in {} frames", scan.frames_scanned),
                })
            }
            (Some(appeared), None) => {
                return Err(ActsyncError::MarkerNotFound {
                    video: video.to_path_buf(),
                    reason: format!(
                        "appeared at frame {appeared} but never disappeared in {} frames",
                        scan.frames_scanned
                    ),
                })
            }
        };

        tracing::info!(
            video = %video.display(),
            frame,
            fps = info.fps,
            frames_scanned = scan.frames_scanned,
            "Marker located"
        );

        Ok(MarkerReport {
            video: video.to_path_buf(),
            info,
            scan,
            frame,
        })
    }
}
