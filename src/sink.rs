//! Video-sink collaborator: consumes drawn frames, yields one video artifact.
//!
//! `FfmpegSink` pipes raw RGBA into a spawned system `ffmpeg` binary (avoids
//! native FFmpeg dev header/lib requirements). A sink must fail loudly when
//! it produced nothing: an empty artifact is strictly worse than an error.

use std::{
    path::{Path, PathBuf},
    process::{Child, ChildStdin, Command, Stdio},
};

use crate::error::{KaravidError, KaravidResult};
use crate::surface::FrameRgba;

/// Frame consumer driven by the export driver. Frames must arrive fully
/// opaque; sinks do not flatten (see [`FrameRgba`]). `finish` flushes and
/// finalizes the artifact; `discard` is the clean abort used on cancellation
/// or failure and must not leave a corrupt partial file behind.
pub trait VideoSink {
    fn write_frame(&mut self, frame: &FrameRgba) -> KaravidResult<()>;
    fn finish(&mut self) -> KaravidResult<()>;
    fn discard(&mut self) -> KaravidResult<()>;
}

#[derive(Clone, Debug)]
pub struct EncodeConfig {
    pub width: u32,
    pub height: u32,
    pub fps: u32,
    pub out_path: PathBuf,
    pub overwrite: bool,
}

impl EncodeConfig {
    pub fn validate(&self) -> KaravidResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(KaravidError::config("encode width/height must be non-zero"));
        }
        if self.fps == 0 {
            return Err(KaravidError::config("encode fps must be non-zero"));
        }
        if !self.width.is_multiple_of(2) || !self.height.is_multiple_of(2) {
            // Default settings target yuv420p output for maximum compatibility.
            return Err(KaravidError::config(
                "encode width/height must be even (required for yuv420p mp4 output)",
            ));
        }
        Ok(())
    }
}

pub fn default_mp4_config(
    out_path: impl Into<PathBuf>,
    width: u32,
    height: u32,
    fps: u32,
) -> EncodeConfig {
    EncodeConfig {
        width,
        height,
        fps,
        out_path: out_path.into(),
        overwrite: true,
    }
}

pub fn is_ffmpeg_on_path() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

fn ensure_parent_dir(path: &Path) -> KaravidResult<()> {
    if let Some(parent) = path.parent() {
        use anyhow::Context as _;
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

pub struct FfmpegSink {
    cfg: EncodeConfig,
    child: Option<Child>,
    stdin: Option<ChildStdin>,
    frames_written: u64,
}

impl FfmpegSink {
    pub fn new(cfg: EncodeConfig) -> KaravidResult<Self> {
        cfg.validate()?;
        ensure_parent_dir(&cfg.out_path)?;

        if !cfg.overwrite && cfg.out_path.exists() {
            return Err(KaravidError::config(format!(
                "output file '{}' already exists",
                cfg.out_path.display()
            )));
        }

        if !is_ffmpeg_on_path() {
            return Err(KaravidError::sink(
                "ffmpeg is required for MP4 encoding, but was not found on PATH",
            ));
        }

        let mut cmd = Command::new("ffmpeg");
        cmd.stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());

        if cfg.overwrite {
            cmd.arg("-y");
        } else {
            cmd.arg("-n");
        }

        cmd.args([
            "-loglevel",
            "error",
            "-f",
            "rawvideo",
            "-pix_fmt",
            "rgba",
            "-s",
            &format!("{}x{}", cfg.width, cfg.height),
            "-r",
            &cfg.fps.to_string(),
            "-i",
            "pipe:0",
            "-an",
            "-c:v",
            "libx264",
            "-pix_fmt",
            "yuv420p",
            "-movflags",
            "+faststart",
        ])
        .arg(&cfg.out_path);

        let mut child = cmd.spawn().map_err(|e| {
            KaravidError::sink(format!(
                "failed to spawn ffmpeg (is it installed and on PATH?): {e}"
            ))
        })?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| KaravidError::sink("failed to open ffmpeg stdin (unexpected)"))?;

        Ok(Self {
            cfg,
            child: Some(child),
            stdin: Some(stdin),
            frames_written: 0,
        })
    }

    pub fn frames_written(&self) -> u64 {
        self.frames_written
    }

    fn remove_artifact(&self) {
        let _ = std::fs::remove_file(&self.cfg.out_path);
    }
}

impl VideoSink for FfmpegSink {
    fn write_frame(&mut self, frame: &FrameRgba) -> KaravidResult<()> {
        if frame.width != self.cfg.width || frame.height != self.cfg.height {
            return Err(KaravidError::sink(format!(
                "frame size mismatch: got {}x{}, expected {}x{}",
                frame.width, frame.height, self.cfg.width, self.cfg.height
            )));
        }
        if frame.data.len() != (frame.width as usize) * (frame.height as usize) * 4 {
            return Err(KaravidError::sink(
                "frame.data size mismatch with width*height*4",
            ));
        }

        let Some(stdin) = self.stdin.as_mut() else {
            return Err(KaravidError::sink("ffmpeg sink is already finalized"));
        };

        use std::io::Write as _;
        stdin
            .write_all(&frame.data)
            .map_err(|e| KaravidError::sink(format!("failed to write frame to ffmpeg stdin: {e}")))?;
        self.frames_written += 1;
        Ok(())
    }

    fn finish(&mut self) -> KaravidResult<()> {
        drop(self.stdin.take());

        let Some(child) = self.child.take() else {
            return Err(KaravidError::sink("ffmpeg sink is already finalized"));
        };

        if self.frames_written == 0 {
            // Kill the encoder first, then report the distinct no-frames case.
            let mut child = child;
            let _ = child.kill();
            let _ = child.wait();
            self.remove_artifact();
            return Err(KaravidError::empty_result("no frames were encoded"));
        }

        let output = child
            .wait_with_output()
            .map_err(|e| KaravidError::sink(format!("failed to wait for ffmpeg to finish: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            self.remove_artifact();
            return Err(KaravidError::sink(format!(
                "ffmpeg exited with status {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        let artifact_len = std::fs::metadata(&self.cfg.out_path).map(|m| m.len()).unwrap_or(0);
        if artifact_len == 0 {
            self.remove_artifact();
            return Err(KaravidError::empty_result("encoder produced an empty file"));
        }

        Ok(())
    }

    fn discard(&mut self) -> KaravidResult<()> {
        drop(self.stdin.take());
        if let Some(mut child) = self.child.take() {
            let _ = child.kill();
            let _ = child.wait();
        }
        self.remove_artifact();
        Ok(())
    }
}

impl Drop for FfmpegSink {
    fn drop(&mut self) {
        // A sink dropped without finish() is an abort, not a success.
        if self.child.is_some() {
            let _ = self.discard();
        }
    }
}
