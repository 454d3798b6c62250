use crate::error::{KaravidError, KaravidResult};

/// External render configuration consumed (not owned) by the synchronization
/// core. Colors are 0xRRGGBB.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    pub width: u32,
    pub height: u32,
    pub fps: u32,
    pub font_size: f64,
    pub line_height: f64,
    pub base_color: u32,
    pub highlight_color: u32,
    pub background_color: u32,
    /// Signed timing offset in milliseconds, applied uniformly before any time
    /// reaches the scroll/highlight functions. Negative shows lyrics earlier.
    pub offset_ms: f64,
    /// Tail appended after the last line for the final scroll segment and for
    /// unterminated syllables. Heuristic, not load-bearing for correctness.
    pub scroll_tail_secs: f64,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
            fps: 30,
            font_size: 48.0,
            line_height: 80.0,
            base_color: 0x888888,
            highlight_color: 0xffff00,
            background_color: 0x1a1a2e,
            offset_ms: -100.0,
            scroll_tail_secs: 2.0,
        }
    }
}

impl RenderSettings {
    pub fn validate(&self) -> KaravidResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(KaravidError::config("width/height must be non-zero"));
        }
        if self.fps == 0 {
            return Err(KaravidError::config("fps must be non-zero"));
        }
        if !(self.line_height > 0.0) || !(self.font_size > 0.0) {
            return Err(KaravidError::config("font_size/line_height must be > 0"));
        }
        if !self.offset_ms.is_finite() {
            return Err(KaravidError::config("offset_ms must be finite"));
        }
        if !(self.scroll_tail_secs >= 0.0) {
            return Err(KaravidError::config("scroll_tail_secs must be >= 0"));
        }
        Ok(())
    }

    /// Maps playback time to the time the scroll/highlight functions evaluate.
    /// A negative offset advances the lyrics: at offset -100ms, playback time
    /// 1.0 evaluates the timeline at 1.1.
    pub fn effective_time(&self, time: f64) -> f64 {
        time - self.offset_ms / 1000.0
    }
}
