//! The action sequence track.
//!
//! ```text
//! 00:00:01.850
//! <Type 'hi'>, 00:00:02.300
//! <LClick(5, 5)>, 00:00:04.000
//! ```
//!
//! The first line is the start of the first action; every further line is
//! an action label and the time its caption ends. Labels may themselves
//! contain commas, so readers split at the last one.

use std::path::Path;

use actsync_common::clock::{format_clock, parse_time_of_day, Millis};
use actsync_common::error::{ActsyncError, ActsyncResult};
use actsync_event_model::action::CompositeAction;
use actsync_event_model::event::{find_coordinate, Coordinate};

/// One `label, end` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceStep {
    pub label: String,
    pub end: Millis,
}

impl SequenceStep {
    /// Coordinate embedded in the label, for consumers that map actions
    /// back to a screen.
    pub fn coordinate(&self) -> Option<Coordinate> {
        find_coordinate(&self.label).ok().flatten()
    }
}

/// A parsed sequence track.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionSequence {
    /// Start of the first action, absent for an empty track.
    pub start: Option<Millis>,
    pub steps: Vec<SequenceStep>,
}

/// Render the sequence track for `actions`.
pub fn generate_sequence(actions: impl IntoIterator<Item = CompositeAction>) -> String {
    let mut output = String::new();

    for (i, action) in actions.into_iter().enumerate() {
        if i == 0 {
            output.push_str(&format_clock(action.start));
            output.push('\n');
        }
        output.push_str(&format!("{}, {}\n", action.label(), format_clock(action.end)));
    }

    output
}

/// Read a sequence track back. Blank lines are ignored.
pub fn parse_sequence(content: &str) -> ActsyncResult<ActionSequence> {
    let mut sequence = ActionSequence::default();

    for (idx, raw) in content.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        if sequence.start.is_none() {
            let start = parse_time_of_day(line).ok_or_else(|| {
                ActsyncError::malformed(line_no, format!("expected start time, got '{line}'"))
            })?;
            sequence.start = Some(start);
            continue;
        }

        let (label, time) = line
            .rsplit_once(',')
            .ok_or_else(|| ActsyncError::malformed(line_no, "missing ', <end time>'"))?;
        let end = parse_time_of_day(time.trim()).ok_or_else(|| {
            ActsyncError::malformed(line_no, format!("invalid end time '{}'", time.trim()))
        })?;
        sequence.steps.push(SequenceStep {
            label: label.trim().to_string(),
            end,
        });
    }

    Ok(sequence)
}

/// Write the sequence track to `path`, replacing any previous content.
pub fn save_sequence(
    actions: impl IntoIterator<Item = CompositeAction>,
    path: &Path,
) -> ActsyncResult<usize> {
    let actions: Vec<CompositeAction> = actions.into_iter().collect();
    let count = actions.len();
    std::fs::write(path, generate_sequence(actions))?;
    tracing::debug!(path = %path.display(), actions = count, "Wrote sequence track");
    Ok(count)
}
