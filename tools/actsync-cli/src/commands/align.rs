//! Align session folders.

use std::path::PathBuf;
use std::sync::Arc;

use actsync_common::config::AppConfig;
use actsync_common::error::ActsyncResult;
use actsync_pipeline::{align_session, discover_sessions, AlignReport};
use actsync_video::FfmpegMarkerLocator;
use tokio::sync::Semaphore;

fn align_blocking(folder: PathBuf, config: Arc<AppConfig>) -> ActsyncResult<AlignReport> {
    let locator = FfmpegMarkerLocator::new(config.marker.clone());
    align_session(&folder, &config, &locator)
}

fn print_report(report: &AlignReport) {
    println!("Aligned {}", report.folder.display());
    println!("  Anchor at {} ms", report.anchor_ms);
    for screen in &report.screens {
        let label = screen
            .screen
            .map(|n| format!("screen {n}"))
            .unwrap_or_else(|| "video".to_string());
        println!(
            "  {label}: {} (marker frame {}, {:.3} fps, offset {:.1} ms)",
            screen.video.display(),
            screen.marker_frame,
            screen.fps,
            screen.offset_ms
        );
    }
    for skipped in &report.skipped_videos {
        println!("  skipped: {} (marker not found)", skipped.display());
    }
    println!(
        "  {} events shifted, {} actions",
        report.events_shifted, report.actions
    );
    for output in &report.outputs {
        println!("  wrote {}", output.display());
    }
}

/// Align a single session folder.
pub async fn run(path: PathBuf, config: AppConfig) -> anyhow::Result<()> {
    let config = Arc::new(config);
    let folder = path.clone();
    let report = tokio::task::spawn_blocking(move || align_blocking(folder, config))
        .await?
        .map_err(|e| anyhow::anyhow!("Failed to align {}: {e}", path.display()))?;

    tracing::debug!(report = %serde_json::to_string(&report)?, "Alignment report");
    print_report(&report);
    Ok(())
}

/// Align every subfolder of `root`, `jobs` at a time.
///
/// A failing folder is reported and does not stop the others.
pub async fn run_batch(root: PathBuf, jobs: usize, config: AppConfig) -> anyhow::Result<()> {
    let folders = discover_sessions(&root)
        .map_err(|e| anyhow::anyhow!("Failed to list sessions in {}: {e}", root.display()))?;
    if folders.is_empty() {
        println!("No session folders found in {}", root.display());
        return Ok(());
    }

    let jobs = jobs.max(1);
    println!(
        "Aligning {} sessions in {} ({jobs} at a time)",
        folders.len(),
        root.display()
    );

    let config = Arc::new(config);
    let permits = Arc::new(Semaphore::new(jobs));
    let mut tasks = Vec::with_capacity(folders.len());

    for folder in folders {
        let config = Arc::clone(&config);
        let permits = Arc::clone(&permits);
        let task_folder = folder.clone();
        let handle = tokio::spawn(async move {
            let _permit = permits.acquire_owned().await?;
            let result =
                tokio::task::spawn_blocking(move || align_blocking(task_folder, config)).await?;
            anyhow::Ok(result)
        });
        tasks.push((folder, handle));
    }

    let total = tasks.len();
    let mut failed = 0usize;
    for (folder, handle) in tasks {
        match handle.await? {
            Ok(Ok(report)) => print_report(&report),
            Ok(Err(err)) => {
                failed += 1;
                tracing::error!(
                    folder = %folder.display(),
                    session_scoped = err.is_session_scoped(),
                    error = %err,
                    "Session failed"
                );
                println!("Failed {}: {err}", folder.display());
            }
            Err(err) => {
                failed += 1;
                tracing::error!(folder = %folder.display(), error = %err, "Session task failed");
                println!("Failed {}: {err}", folder.display());
            }
        }
    }

    println!();
    println!("{} of {total} sessions aligned.", total - failed);
    if failed > 0 {
        anyhow::bail!("{failed} of {total} sessions failed");
    }
    Ok(())
}
