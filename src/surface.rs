//! Rendering-surface collaborator contract plus a minimal built-in surface.
//!
//! Real text shaping and layout are external concerns; the core only needs a
//! surface that can measure text synchronously and turn a [`FrameState`] into
//! pixels. [`BlockSurface`] is the deliberately simple built-in: fixed glyph
//! advance, solid bars for base and sung text. It exists so the drivers, the
//! video sink, and the CLI are exercised end to end.

use crate::error::{KaravidError, KaravidResult};
use crate::eval::FrameState;
use crate::layout::TextMeasurer;
use crate::settings::RenderSettings;

/// One drawn frame: tightly packed RGBA8, row-major. Alpha must be fully
/// opaque (255): the video sink hands these bytes straight to the encoder
/// without a flatten pass, so translucent pixels would encode wrong colors.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameRgba {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl FrameRgba {
    pub fn filled(width: u32, height: u32, rgb: u32) -> Self {
        let [r, g, b] = rgb_bytes(rgb);
        let mut data = vec![0u8; (width as usize) * (height as usize) * 4];
        for px in data.chunks_exact_mut(4) {
            px[0] = r;
            px[1] = g;
            px[2] = b;
            px[3] = 255;
        }
        Self {
            width,
            height,
            data,
        }
    }
}

/// The capability the drivers hold: measure eagerly, draw per frame.
pub trait RenderSurface: TextMeasurer {
    fn draw(&mut self, frame: &FrameState) -> KaravidResult<FrameRgba>;
}

/// Approximate glyph advance as a fraction of the font size, the usual
/// monospace-ish estimate when no shaper is attached.
const ADVANCE_PER_GLYPH: f64 = 0.6;

pub struct BlockSurface {
    settings: RenderSettings,
}

impl BlockSurface {
    pub fn new(settings: RenderSettings) -> KaravidResult<Self> {
        settings.validate()?;
        Ok(Self { settings })
    }

    fn fill_rect(&self, frame: &mut FrameRgba, x0: f64, y0: f64, x1: f64, y1: f64, rgb: u32) {
        let [r, g, b] = rgb_bytes(rgb);
        let xa = (x0.floor().max(0.0) as u32).min(frame.width);
        let xb = (x1.ceil().max(0.0) as u32).min(frame.width);
        let ya = (y0.floor().max(0.0) as u32).min(frame.height);
        let yb = (y1.ceil().max(0.0) as u32).min(frame.height);
        for y in ya..yb {
            let row = (y as usize * frame.width as usize + xa as usize) * 4;
            let end = (y as usize * frame.width as usize + xb as usize) * 4;
            for px in frame.data[row..end].chunks_exact_mut(4) {
                px[0] = r;
                px[1] = g;
                px[2] = b;
                px[3] = 255;
            }
        }
    }
}

impl TextMeasurer for BlockSurface {
    fn text_width(&self, text: &str) -> f64 {
        text.chars().count() as f64 * self.settings.font_size * ADVANCE_PER_GLYPH
    }
}

impl RenderSurface for BlockSurface {
    fn draw(&mut self, state: &FrameState) -> KaravidResult<FrameRgba> {
        let s = &self.settings;
        if s.width == 0 || s.height == 0 {
            return Err(KaravidError::sink("surface has zero-sized canvas"));
        }

        let mut frame = FrameRgba::filled(s.width, s.height, s.background_color);
        let half_glyph = s.font_size / 2.0;
        let center_x = f64::from(s.width) / 2.0;

        for line in &state.lines {
            if line.width <= 0.0 {
                continue;
            }
            let top = line.y - half_glyph;
            let bottom = line.y + half_glyph;
            if bottom < 0.0 || top > f64::from(s.height) {
                continue;
            }
            let left = center_x - line.width / 2.0;

            self.fill_rect(&mut frame, left, top, left + line.width, bottom, s.base_color);
            if line.highlight.width() > 0.0 {
                self.fill_rect(
                    &mut frame,
                    left + line.highlight.start,
                    top,
                    left + line.highlight.end,
                    bottom,
                    s.highlight_color,
                );
            }
        }

        Ok(frame)
    }
}

fn rgb_bytes(rgb: u32) -> [u8; 3] {
    [(rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8]
}
