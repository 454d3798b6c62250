//! Audio transport collaborator: the playback clock.
//!
//! The playback driver delegates timekeeping to whatever transport it is
//! handed: a real audio player's clock when audio is loaded, [`LocalClock`]
//! when not. The transport is an injected dependency, never a global, so
//! tests drive playback with a fake clock.

use std::time::Instant;

pub trait AudioTransport {
    fn play(&mut self, from: f64);
    fn pause(&mut self);
    fn seek(&mut self, time: f64);
    /// Current playback position in seconds. While stopped this reports the
    /// preserved position.
    fn position(&self) -> f64;
    fn is_playing(&self) -> bool;
}

/// Silent wall-clock transport used when no audio is loaded. While playing,
/// `position = now - anchor`, where the anchor is recomputed on every
/// `play(from)` so that pause/seek/resume preserve the position exactly.
#[derive(Debug, Default)]
pub struct LocalClock {
    anchor: Option<Instant>,
    paused_at: f64,
}

impl LocalClock {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AudioTransport for LocalClock {
    fn play(&mut self, from: f64) {
        self.paused_at = from;
        self.anchor = Some(Instant::now());
    }

    fn pause(&mut self) {
        self.paused_at = self.position();
        self.anchor = None;
    }

    fn seek(&mut self, time: f64) {
        let was_playing = self.anchor.is_some();
        self.paused_at = time;
        self.anchor = was_playing.then(Instant::now);
    }

    fn position(&self) -> f64 {
        match self.anchor {
            Some(anchor) => self.paused_at + anchor.elapsed().as_secs_f64(),
            None => self.paused_at,
        }
    }

    fn is_playing(&self) -> bool {
        self.anchor.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_stopped_at_zero() {
        let clock = LocalClock::new();
        assert!(!clock.is_playing());
        assert_eq!(clock.position(), 0.0);
    }

    #[test]
    fn seek_while_stopped_preserves_position() {
        let mut clock = LocalClock::new();
        clock.seek(12.5);
        assert!(!clock.is_playing());
        assert_eq!(clock.position(), 12.5);
    }

    #[test]
    fn play_anchors_at_requested_position() {
        let mut clock = LocalClock::new();
        clock.play(3.0);
        assert!(clock.is_playing());
        assert!(clock.position() >= 3.0);
        assert!(clock.position() < 3.5);
    }

    #[test]
    fn pause_freezes_position() {
        let mut clock = LocalClock::new();
        clock.play(1.0);
        clock.pause();
        let frozen = clock.position();
        assert!(!clock.is_playing());
        assert_eq!(clock.position(), frozen);
    }

    #[test]
    fn seek_while_playing_keeps_playing() {
        let mut clock = LocalClock::new();
        clock.play(0.0);
        clock.seek(8.0);
        assert!(clock.is_playing());
        assert!(clock.position() >= 8.0);
    }
}
