//! Per-frame evaluation: one pure mapping from time to visual state.
//!
//! A [`Scene`] binds a timeline to a rendering surface once (scroll curve,
//! measured line layouts, effect choice); [`Scene::frame_at`] then recomputes
//! the full frame state from scratch for any time. Nothing is updated
//! incrementally, which is what makes seeking and export time-warping safe.

use crate::error::KaravidResult;
use crate::highlight::{HighlightExtent, LinearWipe, WipeEffect, highlight_extent};
use crate::layout::{LineLayout, TextMeasurer};
use crate::scroll::ScrollCurve;
use crate::settings::RenderSettings;
use crate::timeline::Timeline;

/// Everything the drivers need to evaluate frames: immutable after
/// construction, shared by live playback and export.
pub struct Scene {
    timeline: Timeline,
    settings: RenderSettings,
    curve: ScrollCurve,
    layouts: Vec<LineLayout>,
    effect: Box<dyn WipeEffect>,
}

/// Visual state of one line within a frame.
#[derive(Clone, Debug, PartialEq)]
pub struct LineFrame {
    pub index: usize,
    /// Absolute y of the line's row (scroll offset applied).
    pub y: f64,
    pub width: f64,
    pub highlight: HighlightExtent,
}

/// Complete visual state for one frame, handed to the rendering surface.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameState {
    /// The time the frame was requested at (before the configured offset).
    pub time: f64,
    pub scroll_y: f64,
    pub lines: Vec<LineFrame>,
}

impl Scene {
    pub fn new(
        timeline: Timeline,
        settings: RenderSettings,
        measurer: &dyn TextMeasurer,
        effect: Box<dyn WipeEffect>,
    ) -> KaravidResult<Self> {
        settings.validate()?;
        timeline.validate()?;

        let curve = ScrollCurve::build(&timeline, &settings);
        let layouts = timeline
            .lines
            .iter()
            .map(|line| LineLayout::measure(line.clone(), measurer))
            .collect();

        Ok(Self {
            timeline,
            settings,
            curve,
            layouts,
            effect,
        })
    }

    /// Scene with the default linear wipe.
    pub fn with_linear_wipe(
        timeline: Timeline,
        settings: RenderSettings,
        measurer: &dyn TextMeasurer,
    ) -> KaravidResult<Self> {
        Self::new(timeline, settings, measurer, Box::new(LinearWipe))
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    pub fn duration(&self) -> f64 {
        self.timeline.duration
    }

    /// Pure function of `(self, time)`: applies the configured timing offset,
    /// samples the scroll curve, and computes every line's highlight extent.
    pub fn frame_at(&self, time: f64) -> FrameState {
        let t = self.settings.effective_time(time);
        let scroll_y = self.curve.offset_at(t);

        let lines = self
            .layouts
            .iter()
            .enumerate()
            .map(|(index, layout)| LineFrame {
                index,
                y: scroll_y + index as f64 * self.settings.line_height,
                width: layout.width,
                highlight: highlight_extent(layout, t, self.effect.as_ref()),
            })
            .collect();

        FrameState {
            time,
            scroll_y,
            lines,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::test_support::CharMeasurer;
    use crate::lrc;

    fn scene_with_offset(offset_ms: f64) -> Scene {
        let timeline = lrc::parse("[00:01.00]<00:01.00>Hel<00:01.50>lo\n[00:03.00]end");
        let settings = RenderSettings {
            offset_ms,
            ..Default::default()
        };
        Scene::with_linear_wipe(timeline, settings, &CharMeasurer).unwrap()
    }

    #[test]
    fn rejects_invalid_settings_before_any_frame() {
        let settings = RenderSettings {
            fps: 0,
            ..Default::default()
        };
        let res = Scene::with_linear_wipe(lrc::sample_timeline(), settings, &CharMeasurer);
        assert!(res.is_err());
    }

    #[test]
    fn negative_offset_shifts_evaluation_later() {
        // offset -100ms: playback time 1.0 evaluates the timeline at 1.1,
        // 0.1s into the first syllable [1.0, 1.5) of width 30.
        let scene = scene_with_offset(-100.0);
        let frame = scene.frame_at(1.0);
        let expected = (1.1 - 1.0) / 0.5 * 30.0;
        assert!((frame.lines[0].highlight.end - expected).abs() < 1e-9);
    }

    #[test]
    fn zero_offset_is_identity() {
        let scene = scene_with_offset(0.0);
        let frame = scene.frame_at(1.25);
        let expected = (1.25 - 1.0) / 0.5 * 30.0;
        assert!((frame.lines[0].highlight.end - expected).abs() < 1e-9);
    }

    #[test]
    fn frame_state_is_reproducible_out_of_order() {
        let scene = scene_with_offset(-100.0);
        let late = scene.frame_at(3.0);
        let early = scene.frame_at(0.5);
        assert_eq!(scene.frame_at(3.0), late);
        assert_eq!(scene.frame_at(0.5), early);
    }

    #[test]
    fn line_positions_follow_scroll_offset() {
        let scene = scene_with_offset(0.0);
        let frame = scene.frame_at(0.0);
        let spacing = scene.settings().line_height;
        assert_eq!(frame.lines[0].y, frame.scroll_y);
        assert_eq!(frame.lines[1].y, frame.scroll_y + spacing);
    }
}
