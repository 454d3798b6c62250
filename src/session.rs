//! Session-level mode exclusivity: `Idle -> Preview -> Exporting -> Idle`.
//!
//! Playback and export are mutually exclusive by design. The drivers assume
//! that exclusivity as a precondition; this state machine is the single place
//! that enforces it, so no locking is needed anywhere else.

use crate::error::{KaravidError, KaravidResult};
use crate::lrc;
use crate::settings::RenderSettings;
use crate::timeline::Timeline;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionMode {
    Idle,
    Preview,
    Exporting,
}

pub struct Session {
    mode: SessionMode,
    timeline: Timeline,
    settings: RenderSettings,
}

impl Session {
    /// Fresh session showing the built-in sample timeline.
    pub fn new(settings: RenderSettings) -> KaravidResult<Self> {
        settings.validate()?;
        Ok(Self {
            mode: SessionMode::Idle,
            timeline: lrc::sample_timeline(),
            settings,
        })
    }

    pub fn mode(&self) -> SessionMode {
        self.mode
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    /// Parses a new lyrics source and replaces the timeline wholesale (never
    /// mutated in place). Only allowed while idle; a running driver keeps its
    /// own scene.
    pub fn load_lyrics(&mut self, source: &str) -> KaravidResult<&Timeline> {
        self.require_idle("load lyrics")?;
        self.timeline = lrc::parse(source);
        Ok(&self.timeline)
    }

    pub fn update_settings(&mut self, settings: RenderSettings) -> KaravidResult<()> {
        self.require_idle("change settings")?;
        settings.validate()?;
        self.settings = settings;
        Ok(())
    }

    pub fn begin_preview(&mut self) -> KaravidResult<()> {
        self.require_idle("start preview")?;
        self.mode = SessionMode::Preview;
        Ok(())
    }

    pub fn begin_export(&mut self) -> KaravidResult<()> {
        self.require_idle("start export")?;
        self.mode = SessionMode::Exporting;
        Ok(())
    }

    /// Returns to idle from any mode. Called on normal completion and on
    /// driver failure alike: the timeline and settings survive a failed
    /// operation untouched.
    pub fn finish(&mut self) {
        if self.mode != SessionMode::Idle {
            tracing::debug!(from = ?self.mode, "session back to idle");
        }
        self.mode = SessionMode::Idle;
    }

    fn require_idle(&self, action: &str) -> KaravidResult<()> {
        if self.mode != SessionMode::Idle {
            return Err(KaravidError::config(format!(
                "cannot {action} while {:?} is active",
                self.mode
            )));
        }
        Ok(())
    }
}
