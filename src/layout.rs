use crate::timeline::Line;

/// Synchronous text-measurement capability of the rendering surface. Syllable
/// spans are computed eagerly when a line is bound, so measurement must not
/// block or defer.
pub trait TextMeasurer {
    fn text_width(&self, text: &str) -> f64;
}

/// Horizontal span of one syllable in line-local coordinates (left edge 0).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SyllableSpan {
    pub x_start: f64,
    pub x_end: f64,
}

/// A line bound to a rendering surface: the line's timing plus the measured
/// horizontal span of each syllable. Measured once per binding and cached for
/// the line's lifetime, never recomputed per frame.
#[derive(Clone, Debug)]
pub struct LineLayout {
    pub line: Line,
    pub spans: Vec<SyllableSpan>,
    pub width: f64,
}

impl LineLayout {
    pub fn measure(line: Line, measurer: &dyn TextMeasurer) -> Self {
        let mut spans = Vec::with_capacity(line.syllables.len());
        let mut x = 0.0;
        for syl in &line.syllables {
            let w = measurer.text_width(&syl.text);
            spans.push(SyllableSpan {
                x_start: x,
                x_end: x + w,
            });
            x += w;
        }
        Self {
            line,
            spans,
            width: x,
        }
    }
}
