//! Locate the calibration marker in a single video.

use std::path::PathBuf;

use actsync_common::clock::{format_clock, frame_to_ms};
use actsync_common::config::AppConfig;
use actsync_video::{FfmpegMarkerLocator, MarkerLocator};

pub fn run(video: PathBuf, config: &AppConfig) -> anyhow::Result<()> {
    println!("Scanning {} for the calibration marker", video.display());

    let locator = FfmpegMarkerLocator::new(config.marker.clone());
    let report = locator.locate(&video)?;

    println!(
        "  Video: {}x{} @ {:.3} fps",
        report.info.width,
        report.info.height,
        report.fps()
    );
    if let Some(appeared) = report.scan.appearance {
        println!("  Marker appeared at frame {appeared}");
    }
    let at_ms = frame_to_ms(report.frame, report.fps()).floor() as i64;
    println!(
        "  Marker last visible at frame {} ({})",
        report.frame,
        format_clock(at_ms)
    );
    if report.scan.frame_errors > 0 {
        println!("  Skipped {} unreadable frames", report.scan.frame_errors);
    }

    Ok(())
}
