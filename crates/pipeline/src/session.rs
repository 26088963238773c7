//! Session folder discovery.
//!
//! A session folder holds one raw event log and one or more screen
//! recordings. Files the pipeline itself writes next to them
//! (`*_relative.txt`, `*_adjusted*.txt`, `sequence.txt`) are never taken
//! for the raw log, so a folder can be re-aligned in place.

use std::path::{Path, PathBuf};

use actsync_common::config::SessionConfig;
use actsync_common::error::{ActsyncError, ActsyncResult};
use actsync_event_model::region::{Rect, ScreenId, ScreenLayout};
use serde::Serialize;

/// File name of the shared sequence track.
pub const SEQUENCE_FILE: &str = "sequence.txt";

/// A recording covering one screen of a multi-monitor session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScreenVideo {
    pub screen: ScreenId,
    pub rect: Rect,
    pub path: PathBuf,
}

/// How the recordings of a session map onto the log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionMode {
    /// One recording of the whole desktop.
    Single { video: PathBuf },

    /// One recording per screen, ordered by screen number.
    Multi {
        layout: ScreenLayout,
        videos: Vec<ScreenVideo>,
    },
}

/// Inputs of one session folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub folder: PathBuf,
    pub log: PathBuf,
    pub mode: SessionMode,
}

/// Whether `name` is a file the pipeline writes rather than a raw log.
pub fn is_derived_log(name: &str) -> bool {
    if name == SEQUENCE_FILE {
        return true;
    }
    let stem = Path::new(name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(name);
    stem.ends_with("_relative") || stem.contains("_adjusted")
}

fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| extensions.iter().any(|want| want.eq_ignore_ascii_case(ext)))
}

fn file_name(path: &Path) -> &str {
    path.file_name().and_then(|n| n.to_str()).unwrap_or_default()
}

/// Regular files of `folder` in name order.
fn sorted_files(folder: &Path) -> ActsyncResult<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(folder)? {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            files.push(entry.path());
        }
    }
    files.sort();
    Ok(files)
}

impl Session {
    /// Inspect `folder` and classify its inputs.
    pub fn discover(folder: &Path, config: &SessionConfig) -> ActsyncResult<Self> {
        if !folder.is_dir() {
            return Err(ActsyncError::missing_input(folder, "not a directory"));
        }

        let files = sorted_files(folder)?;
        let log_ext = [config.log_extension.clone()];

        let logs: Vec<&PathBuf> = files
            .iter()
            .filter(|p| has_extension(p, &log_ext) && !is_derived_log(file_name(p)))
            .collect();
        let videos: Vec<&PathBuf> = files
            .iter()
            .filter(|p| has_extension(p, &config.video_extensions))
            .collect();

        let Some(log) = logs.first() else {
            return Err(ActsyncError::missing_input(folder, "no event log"));
        };
        if logs.len() > 1 {
            tracing::warn!(
                folder = %folder.display(),
                chosen = %log.display(),
                candidates = logs.len(),
                "Several event logs found, using the first"
            );
        }
        if videos.is_empty() {
            return Err(ActsyncError::missing_input(folder, "no video file"));
        }

        let mode = Self::classify(folder, &videos)?;
        Ok(Self {
            folder: folder.to_path_buf(),
            log: (*log).clone(),
            mode,
        })
    }

    fn classify(folder: &Path, videos: &[&PathBuf]) -> ActsyncResult<SessionMode> {
        let placed: Vec<(Rect, &PathBuf)> = videos
            .iter()
            .filter_map(|path| {
                let stem = path.file_stem()?.to_str()?;
                Rect::from_filename(stem).map(|rect| (rect, *path))
            })
            .collect();

        if placed.len() < 2 {
            return Ok(SessionMode::Single {
                video: videos[0].clone(),
            });
        }

        if placed.len() < videos.len() {
            tracing::warn!(
                folder = %folder.display(),
                ignored = videos.len() - placed.len(),
                "Ignoring recordings without a screen rectangle"
            );
        }

        let rects: Vec<Rect> = placed.iter().map(|(rect, _)| *rect).collect();
        let (layout, ids) = ScreenLayout::number(&rects)
            .map_err(|e| ActsyncError::missing_input(folder, format!("invalid screen layout: {e}")))?;

        let mut screens: Vec<ScreenVideo> = placed
            .into_iter()
            .zip(ids)
            .map(|((rect, path), screen)| ScreenVideo {
                screen,
                rect,
                path: path.clone(),
            })
            .collect();
        screens.sort_by_key(|v| v.screen);

        Ok(SessionMode::Multi {
            layout,
            videos: screens,
        })
    }

    pub fn is_multi(&self) -> bool {
        matches!(self.mode, SessionMode::Multi { .. })
    }
}

/// Subfolders of `root` in name order, for batch runs.
pub fn discover_sessions(root: &Path) -> ActsyncResult<Vec<PathBuf>> {
    let mut folders = Vec::new();
    for entry in std::fs::read_dir(root)? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            folders.push(entry.path());
        }
    }
    folders.sort();
    Ok(folders)
}
