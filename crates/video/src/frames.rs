//! Sequential frame reading.
//!
//! [`FfmpegFrameReader`] asks `ffmpeg` to decode the video to raw RGB24 on
//! stdout and slices the byte stream into frames of `width * height * 3`.

use std::io::{BufReader, Read};
use std::path::Path;
use std::process::{Child, ChildStdout, Command, Stdio};
use std::thread::JoinHandle;

use actsync_common::error::{ActsyncError, ActsyncResult};
use image::RgbImage;

use crate::probe::VideoInfo;

/// A source of decoded frames in presentation order.
pub trait FrameSource {
    /// The next frame, `Ok(None)` at end of stream.
    ///
    /// An `Err` means this one frame could not be decoded; the source may
    /// still have further frames.
    fn next_frame(&mut self) -> ActsyncResult<Option<RgbImage>>;
}

/// Reads frames from an `ffmpeg` child process.
pub struct FfmpegFrameReader {
    child: Child,
    stdout: BufReader<ChildStdout>,
    stderr_task: Option<JoinHandle<String>>,
    width: u32,
    height: u32,
    frames_read: u64,
    finished: bool,
}

impl FfmpegFrameReader {
    /// Start decoding at most `max_frames` frames of `path`.
    pub fn open(path: &Path, info: &VideoInfo, max_frames: u64) -> ActsyncResult<Self> {
        let mut child = Command::new("ffmpeg")
            .args(["-v", "error", "-nostdin", "-i"])
            .arg(path)
            .args(["-map", "0:v:0", "-frames:v"])
            .arg(max_frames.to_string())
            .args(["-f", "rawvideo", "-pix_fmt", "rgb24", "pipe:1"])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| ActsyncError::video(format!("Failed to start ffmpeg: {e}")))?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| ActsyncError::video("Failed to capture ffmpeg stdout"))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| ActsyncError::video("Failed to capture ffmpeg stderr"))?;

        // Drain stderr concurrently so ffmpeg never blocks on a full pipe.
        let stderr_task = std::thread::spawn(move || -> String {
            let mut reader = BufReader::new(stderr);
            let mut output = String::new();
            match reader.read_to_string(&mut output) {
                Ok(_) => output,
                Err(err) => format!("<failed to read ffmpeg stderr: {err}>"),
            }
        });

        tracing::debug!(
            pid = child.id(),
            path = %path.display(),
            max_frames,
            "ffmpeg frame reader started"
        );

        Ok(Self {
            child,
            stdout: BufReader::new(stdout),
            stderr_task: Some(stderr_task),
            width: info.width,
            height: info.height,
            frames_read: 0,
            finished: false,
        })
    }

    fn frame_len(&self) -> usize {
        self.width as usize * self.height as usize * 3
    }

    /// Stop the decoder and collect its diagnostics.
    fn finish(&mut self) -> String {
        self.finished = true;
        let _ = self.child.kill();
        let _ = self.child.wait();
        self.stderr_task
            .take()
            .and_then(|task| task.join().ok())
            .unwrap_or_default()
    }
}

impl FrameSource for FfmpegFrameReader {
    fn next_frame(&mut self) -> ActsyncResult<Option<RgbImage>> {
        if self.finished {
            return Ok(None);
        }

        let mut buf = vec![0u8; self.frame_len()];
        let mut filled = 0;
        while filled < buf.len() {
            match self.stdout.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => {}
                Err(e) => {
                    self.finish();
                    return Err(ActsyncError::frame_read(format!(
                        "pipe error after frame {}: {e}",
                        self.frames_read
                    )));
                }
            }
        }

        if filled == 0 {
            let stderr = self.finish();
            if !stderr.trim().is_empty() {
                tracing::debug!(stderr = stderr.trim(), "ffmpeg finished with diagnostics");
            }
            return Ok(None);
        }

        if filled < buf.len() {
            let stderr = self.finish();
            return Err(ActsyncError::frame_read(format!(
                "truncated frame {} ({filled} of {} bytes): {}",
                self.frames_read + 1,
                buf.len(),
                stderr.trim()
            )));
        }

        self.frames_read += 1;
        RgbImage::from_raw(self.width, self.height, buf)
            .map(Some)
            .ok_or_else(|| ActsyncError::frame_read("frame buffer size mismatch"))
    }
}

impl Drop for FfmpegFrameReader {
    fn drop(&mut self) {
        if !self.finished {
            self.finish();
        }
    }
}
