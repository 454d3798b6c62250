//! Scroll position as an explicit piecewise-linear function of absolute time.
//!
//! Built once per timeline, then sampled statelessly. Sampling carries no
//! hidden clock and no call-order memoization, so the export driver can
//! re-enter it at arbitrary monotonic times and get the exact values live
//! playback would see.

use crate::settings::RenderSettings;
use crate::timeline::Timeline;

/// Shortest allowed segment between scroll knots, applied when adjacent lines
/// share a center time.
pub const MIN_SEGMENT_SECS: f64 = 0.1;

#[derive(Clone, Copy, Debug)]
struct Knot {
    t: f64,
    y: f64,
}

/// Piecewise-linear vertical offset curve. One segment per line: during
/// `[lines[i].center_time, lines[i+1].center_time]` the view moves at constant
/// rate to line i's target `height/2 - i * line_height`, arriving as the next
/// line takes over. The final segment runs to `last.end + scroll_tail_secs`.
/// Held flat outside the knot range.
#[derive(Clone, Debug)]
pub struct ScrollCurve {
    knots: Vec<Knot>,
    rest_y: f64,
}

impl ScrollCurve {
    pub fn build(timeline: &Timeline, settings: &RenderSettings) -> Self {
        let center_y = f64::from(settings.height) / 2.0;
        let target = |i: usize| center_y - i as f64 * settings.line_height;

        fn push(knots: &mut Vec<Knot>, t: f64, y: f64) {
            let t = match knots.last() {
                Some(prev) => t.max(prev.t + MIN_SEGMENT_SECS),
                None => t,
            };
            knots.push(Knot { t, y });
        }

        let mut knots: Vec<Knot> = Vec::with_capacity(timeline.lines.len() + 1);
        for (i, line) in timeline.lines.iter().enumerate() {
            // Segment i starts at this line's center time holding the value
            // the previous segment arrived at.
            let arrived = target(i.saturating_sub(1));
            push(&mut knots, line.center_time, arrived);
        }
        if let Some(last) = timeline.lines.last() {
            let n = timeline.lines.len();
            push(&mut knots, last.end + settings.scroll_tail_secs, target(n - 1));
        }

        Self {
            knots,
            rest_y: center_y,
        }
    }

    /// Pure, total, O(log n). Continuous at every knot; held at the first /
    /// last value outside the knot range.
    pub fn offset_at(&self, time: f64) -> f64 {
        let Some(first) = self.knots.first() else {
            return self.rest_y;
        };
        if time <= first.t {
            return first.y;
        }
        let last = self.knots[self.knots.len() - 1];
        if time >= last.t {
            return last.y;
        }

        let idx = self.knots.partition_point(|k| k.t <= time);
        let a = self.knots[idx - 1];
        let b = self.knots[idx];
        let t = (time - a.t) / (b.t - a.t);
        a.y + (b.y - a.y) * t
    }
}
