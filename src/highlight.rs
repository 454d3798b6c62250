//! Per-syllable highlight computation with a pluggable wipe effect.

use crate::ease::Ease;
use crate::layout::LineLayout;

/// Horizontal span of a line (in line-local coordinates) that renders in the
/// "sung" color. `start` is always the line's left edge; `end` is the cutoff.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HighlightExtent {
    pub start: f64,
    pub end: f64,
}

impl HighlightExtent {
    pub fn width(&self) -> f64 {
        self.end - self.start
    }
}

/// Strategy mapping a clamped progress through the active syllable to a cutoff
/// position inside its measured span. Selecting a different effect must not
/// change the syllable-location control flow.
pub trait WipeEffect {
    fn name(&self) -> &'static str;
    fn cutoff(&self, progress: f64, x_start: f64, x_end: f64) -> f64;
}

/// Classic left-to-right wipe: cutoff moves linearly across the syllable.
#[derive(Clone, Copy, Debug, Default)]
pub struct LinearWipe;

impl WipeEffect for LinearWipe {
    fn name(&self) -> &'static str {
        "linear-wipe"
    }

    fn cutoff(&self, progress: f64, x_start: f64, x_end: f64) -> f64 {
        x_start + (x_end - x_start) * progress.clamp(0.0, 1.0)
    }
}

/// Wipe shaped by an easing curve; `EasedWipe(Ease::Linear)` matches
/// [`LinearWipe`] exactly.
#[derive(Clone, Copy, Debug)]
pub struct EasedWipe(pub Ease);

impl WipeEffect for EasedWipe {
    fn name(&self) -> &'static str {
        "eased-wipe"
    }

    fn cutoff(&self, progress: f64, x_start: f64, x_end: f64) -> f64 {
        x_start + (x_end - x_start) * self.0.apply(progress.clamp(0.0, 1.0))
    }
}

/// Pure highlight function: the extent of `layout`'s text that has been sung
/// at `time`. Linear scan in syllable order, stopping at the first syllable
/// that has not started (syllables are time-ordered and non-overlapping).
pub fn highlight_extent(layout: &LineLayout, time: f64, effect: &dyn WipeEffect) -> HighlightExtent {
    let mut cutoff = 0.0;

    for (syl, span) in layout.line.syllables.iter().zip(&layout.spans) {
        if time < syl.start {
            break;
        }
        if time >= syl.end {
            cutoff = span.x_end;
        } else {
            let progress = (time - syl.start) / (syl.end - syl.start);
            cutoff = effect.cutoff(progress, span.x_start, span.x_end);
            break;
        }
    }

    HighlightExtent {
        start: 0.0,
        end: cutoff,
    }
}
