//! Normalize a raw event log.

use std::path::PathBuf;

use actsync_common::clock::format_clock;
use actsync_common::config::AppConfig;
use actsync_pipeline::normalize_log_file;

pub fn run(log: PathBuf, config: &AppConfig) -> anyhow::Result<()> {
    let tag = &config.sync.anchor_tag;
    let (relative_path, normalized) = normalize_log_file(&log, tag)
        .map_err(|e| anyhow::anyhow!("Failed to normalize {}: {e}", log.display()))?;

    println!("Normalized {} events", normalized.events.len());
    println!("  Written to: {}", relative_path.display());
    match normalized.anchor {
        Some(anchor) => println!("  Anchor {tag} at {} ({anchor} ms)", format_clock(anchor)),
        None => println!("  Anchor {tag} not found; this log cannot be aligned."),
    }

    Ok(())
}
