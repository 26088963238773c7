//! End-to-end alignment of one session folder.
//!
//! Single video:
//! log → normalize → marker + offset → shift → compress → subtitles, sequence
//!
//! Multi video: screens are attributed on the normalized log, then each
//! event is shifted by the offset of its own screen's recording. Screens
//! whose marker cannot be found are skipped; their events are dropped.

use std::path::{Path, PathBuf};

use actsync_common::clock::Millis;
use actsync_common::config::AppConfig;
use actsync_common::error::{ActsyncError, ActsyncResult};
use actsync_emitter::{partition_by_screen, save_sequence, save_subtitles};
use actsync_event_model::event::{LogEvent, TaggedEvent};
use actsync_event_model::log::{parse_log, serialize_log};
use actsync_event_model::region::{ScreenId, ScreenLayout};
use actsync_sync_core::{
    compress, normalize, shift_events, shift_tagged, CompressConfig, NormalizedLog, Offset,
    OffsetTable, ScreenAttributor,
};
use actsync_video::MarkerLocator;
use serde::Serialize;

use crate::session::{ScreenVideo, Session, SessionMode, SEQUENCE_FILE};

/// Synchronization result for one recording.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScreenReport {
    /// Screen number, absent for single-video sessions.
    pub screen: Option<ScreenId>,
    pub video: PathBuf,
    pub marker_frame: u64,
    pub fps: f64,
    pub offset_ms: f64,
}

/// Summary of one aligned session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlignReport {
    pub folder: PathBuf,
    pub log: PathBuf,
    pub anchor_ms: Millis,
    pub screens: Vec<ScreenReport>,

    /// Recordings skipped because their marker was not found.
    pub skipped_videos: Vec<PathBuf>,

    pub events_read: usize,
    pub events_shifted: usize,
    pub actions: usize,

    /// Every file written, in write order.
    pub outputs: Vec<PathBuf>,
}

/// `<dir>/<stem><suffix>.txt` next to the raw log.
fn derived_path(log: &Path, suffix: &str) -> PathBuf {
    let stem = log
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("log");
    log.with_file_name(format!("{stem}{suffix}.txt"))
}

fn write_log(path: &Path, events: &[LogEvent]) -> ActsyncResult<()> {
    std::fs::write(path, serialize_log(events))?;
    tracing::debug!(path = %path.display(), events = events.len(), "Wrote event log");
    Ok(())
}

/// Parse and normalize `log`, writing `<stem>_relative.txt` beside it.
pub fn normalize_log_file(
    log: &Path,
    anchor_tag: &str,
) -> ActsyncResult<(PathBuf, NormalizedLog)> {
    let content = std::fs::read_to_string(log)?;
    let events = parse_log(&content);
    let normalized = normalize(&events, anchor_tag);

    let relative_path = derived_path(log, "_relative");
    write_log(&relative_path, &normalized.events)?;
    Ok((relative_path, normalized))
}

/// Align one session folder and write all of its outputs.
pub fn align_session(
    folder: &Path,
    config: &AppConfig,
    locator: &dyn MarkerLocator,
) -> ActsyncResult<AlignReport> {
    let session = Session::discover(folder, &config.session)?;
    tracing::info!(
        folder = %folder.display(),
        log = %session.log.display(),
        multi = session.is_multi(),
        "Aligning session"
    );

    let (relative_path, normalized) = normalize_log_file(&session.log, &config.sync.anchor_tag)?;
    if normalized.events.is_empty() {
        return Err(ActsyncError::missing_input(folder, "event log has no events"));
    }
    let anchor_ms = normalized.anchor.ok_or_else(|| ActsyncError::AnchorNotFound {
        path: session.log.clone(),
        tag: config.sync.anchor_tag.clone(),
    })?;

    let mut report = AlignReport {
        folder: folder.to_path_buf(),
        log: session.log.clone(),
        anchor_ms,
        screens: Vec::new(),
        skipped_videos: Vec::new(),
        events_read: normalized.events.len(),
        events_shifted: 0,
        actions: 0,
        outputs: vec![relative_path],
    };
    let compress_config = CompressConfig {
        pre_roll_ms: config.sync.pre_roll_ms,
    };

    match &session.mode {
        SessionMode::Single { video } => {
            align_single(&session, video, &normalized, locator, compress_config, &mut report)?
        }
        SessionMode::Multi { layout, videos } => align_multi(
            &session,
            layout,
            videos,
            &normalized,
            locator,
            compress_config,
            &mut report,
        )?,
    }

    tracing::info!(
        folder = %folder.display(),
        anchor_ms,
        events = report.events_shifted,
        actions = report.actions,
        "Session aligned"
    );
    Ok(report)
}

fn align_single(
    session: &Session,
    video: &Path,
    normalized: &NormalizedLog,
    locator: &dyn MarkerLocator,
    compress_config: CompressConfig,
    report: &mut AlignReport,
) -> ActsyncResult<()> {
    let marker = locator.locate(video)?;
    let offset = Offset::resolve(report.anchor_ms, marker.frame, marker.fps())?;
    tracing::info!(
        video = %video.display(),
        marker_frame = marker.frame,
        fps = marker.fps(),
        offset_ms = offset.as_ms(),
        "Resolved clock offset"
    );
    report.screens.push(ScreenReport {
        screen: None,
        video: video.to_path_buf(),
        marker_frame: marker.frame,
        fps: marker.fps(),
        offset_ms: offset.as_ms(),
    });

    let shifted = shift_events(&normalized.events, offset);
    let adjusted_path = derived_path(&session.log, "_adjusted");
    write_log(&adjusted_path, &shifted)?;
    report.outputs.push(adjusted_path);
    report.events_shifted = shifted.len();

    let tagged: Vec<TaggedEvent> = shifted.into_iter().map(TaggedEvent::from).collect();
    let actions = compress(&tagged, compress_config);

    let subtitles_path = session.folder.join("subtitles.srt");
    save_subtitles(actions.clone(), &subtitles_path)?;
    report.outputs.push(subtitles_path);

    let sequence_path = session.folder.join(SEQUENCE_FILE);
    report.actions = save_sequence(actions, &sequence_path)?;
    report.outputs.push(sequence_path);
    Ok(())
}

fn align_multi(
    session: &Session,
    layout: &ScreenLayout,
    videos: &[ScreenVideo],
    normalized: &NormalizedLog,
    locator: &dyn MarkerLocator,
    compress_config: CompressConfig,
    report: &mut AlignReport,
) -> ActsyncResult<()> {
    let mut offsets = OffsetTable::new();
    let mut last_missing = None;

    for video in videos {
        let marker = match locator.locate(&video.path) {
            Ok(marker) => marker,
            Err(err @ ActsyncError::MarkerNotFound { .. }) => {
                tracing::warn!(screen = video.screen, error = %err, "Skipping screen");
                report.skipped_videos.push(video.path.clone());
                last_missing = Some(err);
                continue;
            }
            Err(err) => return Err(err),
        };
        let offset = Offset::resolve(report.anchor_ms, marker.frame, marker.fps())?;
        tracing::info!(
            screen = video.screen,
            video = %video.path.display(),
            marker_frame = marker.frame,
            fps = marker.fps(),
            offset_ms = offset.as_ms(),
            "Resolved clock offset"
        );
        offsets.insert(video.screen, offset);
        report.screens.push(ScreenReport {
            screen: Some(video.screen),
            video: video.path.clone(),
            marker_frame: marker.frame,
            fps: marker.fps(),
            offset_ms: offset.as_ms(),
        });
    }

    if offsets.is_empty() {
        return Err(last_missing
            .unwrap_or_else(|| ActsyncError::missing_input(&session.folder, "no screen recordings")));
    }

    let mut attributor = ScreenAttributor::new(layout);
    let tagged: Vec<TaggedEvent> = normalized
        .events
        .iter()
        .map(|event| attributor.attribute(event.clone()))
        .collect();
    if attributor.out_of_region() > 0 {
        tracing::warn!(
            events = attributor.out_of_region(),
            "Coordinates outside every screen kept their previous screen"
        );
    }

    let shifted = shift_tagged(&tagged, &offsets);
    report.events_shifted = shifted.len();

    for screen in offsets.screens() {
        let events: Vec<LogEvent> = shifted
            .iter()
            .filter(|t| t.screen == Some(screen))
            .map(|t| t.event.clone())
            .collect();
        let path = derived_path(&session.log, &format!("_adjusted_{screen}"));
        write_log(&path, &events)?;
        report.outputs.push(path);
    }

    let actions = compress(&shifted, compress_config);
    let mut per_screen = partition_by_screen(actions.clone());
    for screen in offsets.screens() {
        let path = session.folder.join(format!("subtitles_{screen}.srt"));
        save_subtitles(per_screen.remove(&screen).unwrap_or_default(), &path)?;
        report.outputs.push(path);
    }

    let sequence_path = session.folder.join(SEQUENCE_FILE);
    report.actions = save_sequence(actions, &sequence_path)?;
    report.outputs.push(sequence_path);
    Ok(())
}
