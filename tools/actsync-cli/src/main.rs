//! actsync CLI: align keyboard/mouse event logs with screen recordings.
//!
//! Usage:
//!   actsync align <PATH>        Align one session folder
//!   actsync align --batch <DIR> Align every session folder under DIR
//!   actsync normalize <LOG>     Rebase a raw log onto its first entry
//!   actsync marker <VIDEO>      Locate the calibration marker in a video
//!   actsync check               Check for ffmpeg and ffprobe

use std::path::PathBuf;

use actsync_common::config::AppConfig;
use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "actsync",
    about = "Synchronize input-event logs with screen recordings and caption the actions",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file (defaults to $XDG_CONFIG_HOME/actsync/config.json)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Align a session folder: write shifted logs, subtitles and the sequence track
    Align {
        /// Session folder, or a folder of sessions with --batch
        path: PathBuf,

        /// Treat every subfolder of PATH as a session
        #[arg(long)]
        batch: bool,

        /// Sessions aligned concurrently in batch mode
        #[arg(short, long, default_value = "1")]
        jobs: usize,
    },

    /// Write the `_relative` log and print the anchor time
    Normalize {
        /// Raw event log
        log: PathBuf,
    },

    /// Probe a video and locate its calibration marker
    Marker {
        /// Video file
        video: PathBuf,
    },

    /// Check that the external video tools are available
    Check,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => AppConfig::load_from(path)?,
        None => AppConfig::load(),
    };
    if cli.verbose {
        config.logging.level = "debug".to_string();
    }
    actsync_common::logging::init_logging(&config.logging);
    config.validate()?;

    match cli.command {
        Commands::Align { path, batch, jobs } => {
            if batch {
                commands::align::run_batch(path, jobs, config).await
            } else {
                commands::align::run(path, config).await
            }
        }
        Commands::Normalize { log } => commands::normalize::run(log, &config),
        Commands::Marker { video } => commands::marker::run(video, &config),
        Commands::Check => commands::check::run(),
    }
}
