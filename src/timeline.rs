use crate::error::{KaravidError, KaravidResult};

/// Smallest highlight-addressable unit: one word (or sub-word chunk) with its
/// own absolute time span in seconds.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Syllable {
    pub text: String,
    pub start: f64,
    pub end: f64,
}

/// One displayed lyric row. `center_time` is the instant the line becomes the
/// scroll anchor; it is stored separately from `start` so scroll timing can be
/// tuned without touching highlight timing.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Line {
    pub text: String,
    pub start: f64,
    pub end: f64,
    pub center_time: f64,
    pub syllables: Vec<Syllable>,
}

/// Immutable-after-construction lyrics timeline. Built once by the parser and
/// replaced wholesale when a new source is loaded, never mutated in place.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Timeline {
    pub lines: Vec<Line>,
    pub duration: f64,
}

impl Line {
    pub fn contains(&self, time: f64) -> bool {
        self.start <= time && time < self.end
    }
}

impl Timeline {
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Checks every structural invariant the scroll and highlight functions
    /// assume. The parser produces conforming timelines by construction; this
    /// guards hand-built ones.
    pub fn validate(&self) -> KaravidResult<()> {
        if !self.duration.is_finite() || self.duration < 0.0 {
            return Err(KaravidError::validation("duration must be finite and >= 0"));
        }

        for (i, line) in self.lines.iter().enumerate() {
            if let Some(first) = line.syllables.first() {
                if line.start != first.start {
                    return Err(KaravidError::validation(format!(
                        "line {i}: start must equal first syllable start"
                    )));
                }
            }
            if let Some(last) = line.syllables.last() {
                if line.end != last.end {
                    return Err(KaravidError::validation(format!(
                        "line {i}: end must equal last syllable end"
                    )));
                }
            }
            if line.center_time < line.start {
                return Err(KaravidError::validation(format!(
                    "line {i}: center_time must be >= start"
                )));
            }

            for (j, syl) in line.syllables.iter().enumerate() {
                if !(syl.start < syl.end) {
                    return Err(KaravidError::validation(format!(
                        "line {i} syllable {j}: start must be < end"
                    )));
                }
            }
            if !line.syllables.windows(2).all(|w| w[0].end <= w[1].start) {
                return Err(KaravidError::validation(format!(
                    "line {i}: syllables must be time-ordered and non-overlapping"
                )));
            }
        }

        if !self.lines.windows(2).all(|w| w[0].start <= w[1].start) {
            return Err(KaravidError::validation(
                "lines must be ordered by non-decreasing start",
            ));
        }
        if let Some(last) = self.lines.last() {
            if self.duration < last.end {
                return Err(KaravidError::validation(
                    "duration must cover the last line's end",
                ));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn syl(text: &str, start: f64, end: f64) -> Syllable {
        Syllable {
            text: text.to_string(),
            start,
            end,
        }
    }

    fn one_line() -> Line {
        Line {
            text: "hello".to_string(),
            start: 1.0,
            end: 2.0,
            center_time: 1.0,
            syllables: vec![syl("hel", 1.0, 1.5), syl("lo", 1.5, 2.0)],
        }
    }

    #[test]
    fn empty_timeline_is_valid() {
        Timeline::default().validate().unwrap();
    }

    #[test]
    fn well_formed_timeline_passes() {
        let t = Timeline {
            lines: vec![one_line()],
            duration: 4.0,
        };
        t.validate().unwrap();
    }

    #[test]
    fn rejects_line_start_mismatch() {
        let mut line = one_line();
        line.start = 0.5;
        let t = Timeline {
            lines: vec![line],
            duration: 4.0,
        };
        assert!(t.validate().is_err());
    }

    #[test]
    fn rejects_zero_length_syllable() {
        let mut line = one_line();
        line.syllables[0].end = 1.0;
        let t = Timeline {
            lines: vec![line],
            duration: 4.0,
        };
        assert!(t.validate().is_err());
    }

    #[test]
    fn rejects_overlapping_syllables() {
        let mut line = one_line();
        line.syllables[1].start = 1.4;
        let t = Timeline {
            lines: vec![line],
            duration: 4.0,
        };
        assert!(t.validate().is_err());
    }

    #[test]
    fn rejects_short_duration() {
        let t = Timeline {
            lines: vec![one_line()],
            duration: 1.0,
        };
        assert!(t.validate().is_err());
    }

    #[test]
    fn rejects_unordered_lines() {
        let mut a = one_line();
        let b = one_line();
        a.start = 3.0;
        a.center_time = 3.0;
        a.end = 4.0;
        a.syllables = vec![syl("x", 3.0, 4.0)];
        let t = Timeline {
            lines: vec![a, b],
            duration: 5.0,
        };
        assert!(t.validate().is_err());
    }

    #[test]
    fn json_roundtrip() {
        let t = Timeline {
            lines: vec![one_line()],
            duration: 4.0,
        };
        let s = serde_json::to_string(&t).unwrap();
        let de: Timeline = serde_json::from_str(&s).unwrap();
        assert_eq!(de, t);
    }
}
