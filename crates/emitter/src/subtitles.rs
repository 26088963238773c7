//! SRT subtitle generation from composite actions.

use std::collections::BTreeMap;
use std::path::Path;

use actsync_common::clock::format_srt_clock;
use actsync_common::error::ActsyncResult;
use actsync_event_model::action::CompositeAction;
use actsync_event_model::region::ScreenId;

/// Generate SRT subtitle content, one cue per action, indices from 1.
pub fn generate_srt(actions: impl IntoIterator<Item = CompositeAction>) -> String {
    let mut output = String::new();

    for (i, action) in actions.into_iter().enumerate() {
        output.push_str(&format!("{}\n", i + 1));
        output.push_str(&format!(
            "{} --> {}\n",
            format_srt_clock(action.start),
            format_srt_clock(action.end),
        ));
        output.push_str(&action.label());
        output.push_str("\n\n");
    }

    output
}

/// Split actions by screen tag, keeping each screen's order.
///
/// Untagged actions are dropped; single-video sessions never partition.
pub fn partition_by_screen(
    actions: impl IntoIterator<Item = CompositeAction>,
) -> BTreeMap<ScreenId, Vec<CompositeAction>> {
    let mut screens: BTreeMap<ScreenId, Vec<CompositeAction>> = BTreeMap::new();
    let mut untagged = 0usize;

    for action in actions {
        match action.screen {
            Some(screen) => screens.entry(screen).or_default().push(action),
            None => untagged += 1,
        }
    }

    if untagged > 0 {
        tracing::warn!(untagged, "Dropping actions without a screen tag");
    }
    screens
}

/// Save subtitles to a file and return the number of cues.
pub fn save_subtitles(
    actions: impl IntoIterator<Item = CompositeAction>,
    path: &Path,
) -> ActsyncResult<usize> {
    let actions: Vec<CompositeAction> = actions.into_iter().collect();
    let cues = actions.len();
    std::fs::write(path, generate_srt(actions))?;
    tracing::debug!(path = %path.display(), cues, "Wrote subtitles");
    Ok(cues)
}
