//! Deterministic fixed-fps export driver.
//!
//! Frame times are `t_k = k / fps`, derived from the frame index alone. Wall
//! clock may throttle how fast frames are produced (so the surface and the
//! encoder aren't overwhelmed) but never selects which frame is produced:
//! frame content is exactly what live playback would show at `t_k` no matter
//! how fast or slow production runs.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use crate::error::{KaravidError, KaravidResult};
use crate::eval::Scene;
use crate::sink::VideoSink;
use crate::surface::RenderSurface;

/// Cooperative cancellation handle; clone it to the UI side, pass the
/// original to the driver. Cancelling aborts cleanly (sink discarded), it is
/// not a timeout.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Wall-clock production throttle. Only delays; never chooses frames.
#[derive(Debug)]
pub struct FramePacer {
    interval: Duration,
    next_due: Option<Instant>,
}

impl FramePacer {
    pub fn from_fps(fps: u32) -> Self {
        Self {
            interval: Duration::from_secs_f64(1.0 / f64::from(fps.max(1))),
            next_due: None,
        }
    }

    fn wait(&mut self) {
        let now = Instant::now();
        match self.next_due {
            None => self.next_due = Some(now + self.interval),
            Some(due) => {
                if due > now {
                    std::thread::sleep(due - now);
                }
                self.next_due = Some(due.max(now) + self.interval);
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ExportProgress {
    pub frame: u64,
    pub total: u64,
    pub fraction: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportOutcome {
    Completed,
    Cancelled,
}

#[derive(Default)]
pub struct ExportDriver {
    pacer: Option<FramePacer>,
}

impl ExportDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Throttle production to roughly real time (or any other rate). Has no
    /// effect on frame content.
    pub fn with_pacer(pacer: FramePacer) -> Self {
        Self { pacer: Some(pacer) }
    }

    /// Planned frame count for a scene: `ceil(duration * fps)`.
    pub fn frame_count(scene: &Scene) -> u64 {
        (scene.duration() * f64::from(scene.settings().fps)).ceil() as u64
    }

    /// Produces every frame in order, feeding the surface's output to the
    /// sink. On any surface or sink failure the sink is discarded and the
    /// error surfaces; there is no silent partial success. On completion the
    /// sink is flushed and finalized.
    #[tracing::instrument(skip_all, fields(fps, total))]
    pub fn run(
        &mut self,
        scene: &Scene,
        surface: &mut dyn RenderSurface,
        sink: &mut dyn VideoSink,
        cancel: &CancelToken,
        mut on_progress: impl FnMut(ExportProgress),
    ) -> KaravidResult<ExportOutcome> {
        scene.settings().validate()?;
        let fps = f64::from(scene.settings().fps);
        let total = Self::frame_count(scene);
        tracing::Span::current().record("fps", fps);
        tracing::Span::current().record("total", total);

        if total == 0 {
            let _ = sink.discard();
            return Err(KaravidError::empty_result(
                "timeline would produce zero frames",
            ));
        }

        for k in 0..total {
            if cancel.is_cancelled() {
                sink.discard()?;
                tracing::debug!(frame = k, "export cancelled");
                return Ok(ExportOutcome::Cancelled);
            }
            if let Some(pacer) = &mut self.pacer {
                pacer.wait();
            }

            let t = k as f64 / fps;
            let frame = scene.frame_at(t);
            let pixels = match surface.draw(&frame) {
                Ok(p) => p,
                Err(e) => {
                    let _ = sink.discard();
                    return Err(e);
                }
            };
            if let Err(e) = sink.write_frame(&pixels) {
                let _ = sink.discard();
                return Err(e);
            }

            on_progress(ExportProgress {
                frame: k + 1,
                total,
                fraction: (k + 1) as f64 / total as f64,
            });
        }

        sink.finish()?;
        Ok(ExportOutcome::Completed)
    }
}
