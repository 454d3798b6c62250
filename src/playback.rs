//! Live playback driver: a `{Stopped, Playing}` state machine ticked by the
//! host's per-frame scheduler.
//!
//! Each tick reads the transport position, evaluates the scene, and hands the
//! drawn frame to the surface. Ticks may arrive at irregular intervals; the
//! driver never assumes the configured fps.

use crate::clock::AudioTransport;
use crate::error::KaravidResult;
use crate::eval::Scene;
use crate::surface::RenderSurface;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlaybackState {
    Stopped,
    Playing,
}

pub struct PlaybackDriver<T: AudioTransport> {
    transport: T,
    state: PlaybackState,
    current_time: f64,
}

impl<T: AudioTransport> PlaybackDriver<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            state: PlaybackState::Stopped,
            current_time: 0.0,
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Last observed playback time; preserved across pause and stop.
    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn play(&mut self, from: f64) {
        self.current_time = from;
        self.transport.play(from);
        self.state = PlaybackState::Playing;
        tracing::debug!(from, "playback started");
    }

    /// Resume from the preserved position.
    pub fn resume(&mut self) {
        self.play(self.current_time);
    }

    /// Idempotent: pausing while stopped keeps the preserved position.
    pub fn pause(&mut self) {
        if self.state == PlaybackState::Playing {
            self.transport.pause();
            self.current_time = self.transport.position();
            self.state = PlaybackState::Stopped;
            tracing::debug!(at = self.current_time, "playback paused");
        }
    }

    /// Seek stops the tick effects logically; a subsequent `play`/`resume`
    /// re-anchors from the sought position.
    pub fn seek(&mut self, time: f64) {
        self.transport.seek(time);
        self.current_time = time;
    }

    /// One scheduler tick. While playing: evaluate the scene at the transport
    /// position, draw, and auto-stop past the end of the timeline. While
    /// stopped this is a no-op, which makes stray ticks after pause harmless.
    pub fn tick(&mut self, scene: &Scene, surface: &mut dyn RenderSurface) -> KaravidResult<PlaybackState> {
        if self.state != PlaybackState::Playing {
            return Ok(self.state);
        }

        let time = self.transport.position();
        self.current_time = time;

        let frame = scene.frame_at(time);
        surface.draw(&frame)?;

        if time >= scene.duration() {
            self.transport.pause();
            self.state = PlaybackState::Stopped;
            tracing::debug!(at = time, "playback reached end of timeline");
        }
        Ok(self.state)
    }
}
