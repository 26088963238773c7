//! Check external tool availability.

use actsync_video::command_exists;

pub fn run() -> anyhow::Result<()> {
    println!("actsync System Check");
    println!("{}", "=".repeat(50));

    let mut all_ok = true;
    for (binary, purpose) in [
        ("ffprobe", "frame size and rate"),
        ("ffmpeg", "frame decoding for marker detection"),
    ] {
        if command_exists(binary) {
            println!("[OK] {binary}: found ({purpose})");
        } else {
            println!("[MISSING] {binary}: not on PATH ({purpose})");
            all_ok = false;
        }
    }

    println!();
    if all_ok {
        println!("All required tools are available. actsync is ready.");
    } else {
        println!("Install ffmpeg (which ships ffprobe) to align sessions.");
    }

    Ok(())
}
