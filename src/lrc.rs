//! Extended-LRC parsing and serialization.
//!
//! The interchange format is classic LRC (`[mm:ss.xx]` line tags) extended
//! with inline per-word tags (`<mm:ss.xx>word`). Parsing is total: malformed
//! lines are skipped, never fatal.

use crate::timeline::{Line, Syllable, Timeline};

/// Floor applied when a syllable's derived end does not exceed its start.
/// Degenerate syllables are coerced to this minimum length rather than
/// rejected; the coerced end may overlap the next line (the non-overlap
/// invariant is per-line).
pub const MIN_SYLLABLE_SECS: f64 = 0.01;

#[derive(Clone, Copy, Debug)]
pub struct ParseOptions {
    /// Duration granted to a final syllable (and to the timeline past the last
    /// line) when nothing later bounds it. Heuristic, tunable.
    pub trailing_secs: f64,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self { trailing_secs: 2.0 }
    }
}

pub fn parse(source: &str) -> Timeline {
    parse_with(source, &ParseOptions::default())
}

pub fn parse_with(source: &str, opts: &ParseOptions) -> Timeline {
    let mut raws: Vec<RawLine> = Vec::new();
    let mut declared_len: Option<f64> = None;

    for raw in source.lines() {
        let trimmed = raw.trim_start();
        let Some(tagged) = trimmed.strip_prefix('[') else {
            if !trimmed.is_empty() {
                tracing::debug!(line = trimmed, "skipping line without timestamp tag");
            }
            continue;
        };
        let Some((tag, rest)) = tagged.split_once(']') else {
            tracing::debug!(line = trimmed, "skipping line with unterminated tag");
            continue;
        };

        if let Some(start) = parse_timestamp(tag) {
            raws.push(RawLine {
                start,
                rest: rest.to_string(),
            });
        } else if let Some(value) = tag.strip_prefix("length:") {
            declared_len = parse_timestamp(value).or_else(|| value.trim().parse().ok());
        } else {
            tracing::debug!(tag, "skipping non-timestamp tag");
        }
    }

    // Downstream scroll/highlight logic assumes monotonic line order, so
    // out-of-order input is normalized here rather than re-sorted later.
    raws.sort_by(|a, b| a.start.total_cmp(&b.start));

    let mut lines: Vec<Line> = Vec::with_capacity(raws.len());
    for i in 0..raws.len() {
        let next_start = raws.get(i + 1).map(|r| r.start);
        lines.push(build_line(&raws[i], next_start, opts));
    }
    lines.sort_by(|a, b| a.start.total_cmp(&b.start));

    let duration = match lines.last() {
        None => declared_len.unwrap_or(0.0).max(0.0),
        Some(last) => match declared_len {
            Some(d) => d.max(last.end),
            None => last.end + opts.trailing_secs,
        },
    };

    Timeline { lines, duration }
}

struct RawLine {
    start: f64,
    rest: String,
}

fn build_line(raw: &RawLine, next_start: Option<f64>, opts: &ParseOptions) -> Line {
    let segs = scan_syllables(&raw.rest, raw.start);

    let mut syllables = Vec::with_capacity(segs.len());
    for (j, (start, text)) in segs.iter().enumerate() {
        let end = if j + 1 < segs.len() {
            segs[j + 1].0
        } else {
            match next_start {
                Some(ns) if ns > *start => ns,
                Some(_) => start + MIN_SYLLABLE_SECS,
                None => start + opts.trailing_secs,
            }
        };
        syllables.push(Syllable {
            text: text.clone(),
            start: *start,
            end,
        });
    }

    let text: String = syllables.iter().map(|s| s.text.as_str()).collect();
    let start = syllables.first().map_or(raw.start, |s| s.start);
    let end = syllables.last().map_or(raw.start, |s| s.end);
    Line {
        text,
        start,
        end,
        center_time: start,
        syllables,
    }
}

/// Splits a line remainder into `(start, text)` segments, one per syllable.
/// Markers that do not strictly advance time merge their text into the current
/// segment, so segment starts are strictly increasing. Always returns at least
/// one segment (a bare `[mm:ss.xx]` line yields one empty-text segment).
fn scan_syllables(rest: &str, line_start: f64) -> Vec<(f64, String)> {
    let mut segs: Vec<(f64, String)> = Vec::new();
    let mut cur = (line_start, String::new());

    let mut s = rest;
    loop {
        let Some(open) = s.find('<') else {
            cur.1.push_str(s);
            break;
        };
        let (before, bracketed) = s.split_at(open);
        cur.1.push_str(before);

        let Some(close) = bracketed.find('>') else {
            cur.1.push_str(bracketed);
            break;
        };
        let inner = &bracketed[1..close];

        match parse_timestamp(inner) {
            Some(ts) => {
                if cur.1.is_empty() {
                    if segs.is_empty() || ts > cur.0 {
                        cur.0 = ts;
                    }
                } else if ts > cur.0 {
                    segs.push(std::mem::replace(&mut cur, (ts, String::new())));
                }
            }
            // Angle brackets that are not timestamps are lyric text.
            None => cur.1.push_str(&bracketed[..=close]),
        }
        s = &bracketed[close + 1..];
    }

    if !cur.1.is_empty() || segs.is_empty() {
        segs.push(cur);
    }
    segs
}

/// Parses `mm:ss`, `mm:ss.x`, `mm:ss.xx`, or `mm:ss.xxx` into seconds.
pub fn parse_timestamp(s: &str) -> Option<f64> {
    let s = s.trim();
    let (mm, rest) = s.split_once(':')?;
    if mm.is_empty() || !mm.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let (ss, frac) = match rest.split_once('.') {
        Some((a, b)) => (a, Some(b)),
        None => (rest, None),
    };
    if ss.is_empty() || ss.len() > 2 || !ss.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let minutes: f64 = mm.parse().ok()?;
    let seconds: f64 = ss.parse().ok()?;
    let fraction = match frac {
        None => 0.0,
        Some(f) => {
            if f.is_empty() || f.len() > 3 || !f.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            let v: f64 = f.parse().ok()?;
            v / 10f64.powi(f.len() as i32)
        }
    };

    Some(minutes * 60.0 + seconds + fraction)
}

/// Formats seconds as `mm:ss.xx` (centisecond precision).
pub fn format_timestamp(secs: f64) -> String {
    let total_cs = (secs.max(0.0) * 100.0).round() as u64;
    let cs = total_cs % 100;
    let total_s = total_cs / 100;
    format!("{:02}:{:02}.{:02}", total_s / 60, total_s % 60, cs)
}

/// Emits the extended-LRC form of a timeline. `parse(serialize(t))`
/// reproduces all timestamps to within the format's centisecond precision.
pub fn serialize(timeline: &Timeline) -> String {
    let mut out = String::new();
    out.push_str(&format!("[length:{}]\n", format_timestamp(timeline.duration)));
    for line in &timeline.lines {
        out.push_str(&format!("[{}]", format_timestamp(line.start)));
        for syl in &line.syllables {
            out.push_str(&format!("<{}>{}", format_timestamp(syl.start), syl.text));
        }
        out.push('\n');
    }
    out
}

const SAMPLE_LRC: &str = "\
[length:00:16.00]
[00:01.00]<00:01.00>Wel<00:01.40>come <00:01.80>to <00:02.20>ka<00:02.60>ra<00:03.00>o<00:03.40>ke
[00:04.00]<00:04.00>Sing <00:04.60>a<00:05.00>long <00:05.60>with <00:06.20>me
[00:07.00]<00:07.00>Ev<00:07.40>ery <00:07.80>word <00:08.40>lights <00:09.00>up <00:09.40>in <00:09.80>time
[00:10.60]<00:10.60>Fol<00:11.00>low <00:11.40>the <00:11.80>high<00:12.40>light
[00:13.20]<00:13.20>And <00:13.60>you <00:14.00>can't <00:14.60>go <00:15.00>wrong
";

/// Fixed built-in timeline shown before any lyrics file is loaded. Parsed
/// from an embedded source so it satisfies the same invariants as any parsed
/// timeline.
pub fn sample_timeline() -> Timeline {
    parse(SAMPLE_LRC)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 5e-3
    }

    #[test]
    fn empty_input_yields_empty_timeline() {
        let t = parse("");
        assert!(t.lines.is_empty());
        assert_eq!(t.duration, 0.0);
    }

    #[test]
    fn two_line_scenario_with_inherited_end() {
        let t = parse("[00:01.00]<00:01.00>Hel<00:01.50>lo\n[00:03.00]end");
        assert_eq!(t.lines.len(), 2);

        let first = &t.lines[0];
        assert_eq!(first.syllables.len(), 2);
        assert_eq!(first.syllables[0].text, "Hel");
        assert!(close(first.syllables[0].start, 1.0));
        assert!(close(first.syllables[0].end, 1.5));
        assert_eq!(first.syllables[1].text, "lo");
        assert!(close(first.syllables[1].start, 1.5));
        // Last syllable's end is inherited from the next line's start.
        assert!(close(first.syllables[1].end, 3.0));
        assert_eq!(first.text, "Hello");

        assert!(t.duration >= t.lines[1].end);
        t.validate().unwrap();
    }

    #[test]
    fn line_without_markers_is_one_syllable() {
        let t = parse("[00:01.00]all of it\n[00:04.00]next");
        let line = &t.lines[0];
        assert_eq!(line.syllables.len(), 1);
        assert_eq!(line.syllables[0].text, "all of it");
        assert!(close(line.syllables[0].start, 1.0));
        assert!(close(line.syllables[0].end, 4.0));
        assert!(close(line.center_time, 1.0));
    }

    #[test]
    fn final_line_gets_trailing_fallback() {
        let opts = ParseOptions { trailing_secs: 2.0 };
        let t = parse_with("[00:05.00]solo", &opts);
        assert!(close(t.lines[0].end, 7.0));
        assert!(close(t.duration, 9.0));
    }

    #[test]
    fn trailing_fallback_is_configurable() {
        let opts = ParseOptions { trailing_secs: 0.5 };
        let t = parse_with("[00:05.00]solo", &opts);
        assert!(close(t.lines[0].end, 5.5));
        assert!(close(t.duration, 6.0));
    }

    #[test]
    fn malformed_lines_are_skipped_not_fatal() {
        let t = parse("garbage\n[00:01.00]ok\n[nope]bad tag\n[00:02.00\n[00:03.00]also ok");
        assert_eq!(t.lines.len(), 2);
        assert_eq!(t.lines[0].text, "ok");
        assert_eq!(t.lines[1].text, "also ok");
    }

    #[test]
    fn out_of_order_lines_are_sorted() {
        let t = parse("[00:05.00]second\n[00:01.00]first");
        assert_eq!(t.lines[0].text, "first");
        assert_eq!(t.lines[1].text, "second");
        // Next-line lookahead follows sorted order.
        assert!(close(t.lines[0].end, 5.0));
        t.validate().unwrap();
    }

    #[test]
    fn non_advancing_marker_merges_into_previous_syllable() {
        let t = parse("[00:01.00]<00:01.00>a<00:01.00>b<00:02.00>c\n[00:03.00]end");
        let line = &t.lines[0];
        assert_eq!(line.syllables.len(), 2);
        assert_eq!(line.syllables[0].text, "ab");
        assert_eq!(line.syllables[1].text, "c");
        t.validate().unwrap();
    }

    #[test]
    fn duplicate_line_start_coerces_minimum_length() {
        let t = parse("[00:01.00]a\n[00:01.00]b\n[00:02.00]c");
        assert!(close(t.lines[0].end, 1.0 + MIN_SYLLABLE_SECS));
        t.validate().unwrap();
    }

    #[test]
    fn declared_length_extends_duration() {
        let t = parse("[length:00:30.00]\n[00:01.00]hi");
        assert!(close(t.duration, 30.0));
    }

    #[test]
    fn declared_length_never_truncates() {
        let t = parse("[length:00:01.00]\n[00:05.00]hi");
        assert!(t.duration >= t.lines[0].end);
    }

    #[test]
    fn non_timestamp_angle_text_is_lyric_text() {
        let t = parse("[00:01.00]three <3 you\n[00:03.00]end");
        assert_eq!(t.lines[0].text, "three <3 you");
    }

    #[test]
    fn timestamp_parsing_accepts_fraction_widths() {
        assert!(close(parse_timestamp("01:02.5").unwrap(), 62.5));
        assert!(close(parse_timestamp("01:02.50").unwrap(), 62.5));
        assert!(close(parse_timestamp("01:02.500").unwrap(), 62.5));
        assert!(close(parse_timestamp("01:02").unwrap(), 62.0));
        assert!(parse_timestamp("1:2:3").is_none());
        assert!(parse_timestamp("abc").is_none());
        assert!(parse_timestamp("01:abc").is_none());
    }

    #[test]
    fn format_timestamp_is_centisecond_exact() {
        assert_eq!(format_timestamp(62.5), "01:02.50");
        assert_eq!(format_timestamp(0.0), "00:00.00");
        assert_eq!(format_timestamp(3.21), "00:03.21");
        assert_eq!(format_timestamp(125.0), "02:05.00");
    }

    #[test]
    fn roundtrip_preserves_timestamps() {
        let original = parse("[00:01.00]<00:01.00>Hel<00:01.50>lo\n[00:03.00]<00:03.00>World");
        let reparsed = parse(&serialize(&original));
        assert_eq!(reparsed.lines.len(), original.lines.len());
        for (a, b) in original.lines.iter().zip(&reparsed.lines) {
            assert!(close(a.start, b.start));
            assert!(close(a.end, b.end));
            assert_eq!(a.syllables.len(), b.syllables.len());
            for (sa, sb) in a.syllables.iter().zip(&b.syllables) {
                assert_eq!(sa.text, sb.text);
                assert!(close(sa.start, sb.start));
                assert!(close(sa.end, sb.end));
            }
        }
        assert!(close(original.duration, reparsed.duration));
    }

    #[test]
    fn sample_timeline_satisfies_invariants() {
        let t = sample_timeline();
        assert!(!t.is_empty());
        assert!(t.lines.iter().all(|l| !l.syllables.is_empty()));
        t.validate().unwrap();
    }
}
