// Chunk: docs/chunks/text_engine - Editable-text engine for a multi-line text widget

//! Pattern search over the text.
//!
//! The gap is squeezed out so the whole text is one slice, and the pattern runs
//! over it as a byte regex in multi-line mode. Backward search has no native
//! support in the regex engine, so it scans windows of growing width behind the
//! start position for the last match that begins inside them.

use std::ops::Range;

use regex::bytes::{Captures, Regex, RegexBuilder};
use tracing::trace;

use crate::error::Result;
use crate::text_engine::TextEngine;

/// Bytes scanned by the first backward window; each miss doubles it.
const BACKWARD_WINDOW: usize = 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchDirection {
    /// First match starting at or after the start position.
    #[default]
    Forward,
    /// Last match starting at or before the start position.
    Backward,
    /// Only a match starting exactly at the start position.
    Anchored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SearchFlags {
    /// Treat the pattern as a regular expression rather than literal text.
    pub regex: bool,
    pub ignore_case: bool,
    /// Continue from the other end of the text when nothing is found.
    pub wrap: bool,
    pub direction: SearchDirection,
}

/// A successful match: the range of the whole match and of every capture
/// group. Groups that did not take part in the match are `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextMatch {
    pub groups: Vec<Option<Range<usize>>>,
}

impl TextMatch {
    fn from_captures(caps: &Captures<'_>) -> Self {
        Self {
            groups: caps.iter().map(|m| m.map(|m| m.range())).collect(),
        }
    }

    pub fn range(&self) -> Range<usize> {
        self.groups.first().cloned().flatten().unwrap_or(0..0)
    }

    pub fn start(&self) -> usize {
        self.range().start
    }

    pub fn end(&self) -> usize {
        self.range().end
    }

    /// Range of capture group `i`, if it took part in the match.
    pub fn group(&self, i: usize) -> Option<Range<usize>> {
        self.groups.get(i).cloned().flatten()
    }
}

/// Builds the matcher for `pattern` under `flags`.
fn compile(pattern: &str, flags: &SearchFlags) -> Result<Regex> {
    let source = if flags.regex {
        pattern.to_string()
    } else {
        regex::escape(pattern)
    };
    let re = RegexBuilder::new(&source)
        .case_insensitive(flags.ignore_case)
        .multi_line(true)
        .build()?;
    Ok(re)
}

/// Last match whose start lies in `[lo, hi]`.
fn last_match_in<'h>(re: &Regex, hay: &'h [u8], lo: usize, hi: usize) -> Option<Captures<'h>> {
    let mut best = None;
    let mut at = lo;
    while at <= hi && at <= hay.len() {
        let Some(caps) = re.captures_at(hay, at) else {
            break;
        };
        let start = caps.get(0).map_or(usize::MAX, |m| m.start());
        if start > hi {
            break;
        }
        at = start + 1;
        best = Some(caps);
    }
    best
}

/// Last match starting in `[floor, hi]`, scanning backward in growing windows.
fn search_backward<'h>(re: &Regex, hay: &'h [u8], floor: usize, hi: usize) -> Option<Captures<'h>> {
    let mut hi = hi;
    let mut width = BACKWARD_WINDOW;
    loop {
        let lo = hi.saturating_sub(width).max(floor);
        if let Some(caps) = last_match_in(re, hay, lo, hi) {
            return Some(caps);
        }
        if lo <= floor {
            return None;
        }
        hi = lo - 1;
        width = width.saturating_mul(2);
    }
}

impl TextEngine {
    /// Searches for `pattern` relative to `start`.
    ///
    /// Forward finds the first match starting in `[start, len]`; with `wrap` it
    /// then tries matches starting before `start`. Backward finds the last match
    /// starting in `[0, start]`; with `wrap` it then tries `(start, len]`.
    /// Anchored only accepts a match starting at `start`.
    pub fn find_text(&mut self, pattern: &str, start: usize, flags: SearchFlags) -> Result<Option<TextMatch>> {
        let re = compile(pattern, &flags)?;
        let hay = self.buffer.contiguous();
        let len = hay.len();
        let start = start.min(len);

        let caps = match flags.direction {
            SearchDirection::Forward => re.captures_at(hay, start).or_else(|| {
                if !flags.wrap || start == 0 {
                    return None;
                }
                re.captures_at(hay, 0)
                    .filter(|c| c.get(0).is_some_and(|m| m.start() < start))
            }),
            SearchDirection::Backward => search_backward(&re, hay, 0, start).or_else(|| {
                if !flags.wrap || start >= len {
                    return None;
                }
                search_backward(&re, hay, start + 1, len)
            }),
            SearchDirection::Anchored => re
                .captures_at(hay, start)
                .filter(|c| c.get(0).is_some_and(|m| m.start() == start)),
        };
        let found = caps.as_ref().map(TextMatch::from_captures);
        trace!(pattern, start, ?flags.direction, found = ?found.as_ref().map(|m| m.range()), "find_text");
        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::error::EngineError;
    use crate::metrics::Monospace;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    fn engine(text: &str) -> TextEngine {
        TextEngine::with_text(EngineConfig::default(), Box::new(Monospace::default()), text)
    }

    fn flags(direction: SearchDirection, wrap: bool) -> SearchFlags {
        SearchFlags {
            regex: false,
            ignore_case: false,
            wrap,
            direction,
        }
    }

    fn found(e: &mut TextEngine, pattern: &str, start: usize, flags: SearchFlags) -> Option<Range<usize>> {
        e.find_text(pattern, start, flags).unwrap().map(|m| m.range())
    }

    // ==================== Directions ====================

    #[test_case(0, Some(0..3) ; "from start")]
    #[test_case(1, Some(8..11) ; "skips earlier")]
    #[test_case(8, Some(8..11) ; "at start position")]
    #[test_case(9, None ; "nothing after")]
    fn test_forward(start: usize, expected: Option<Range<usize>>) {
        let mut e = engine("abc xyz abc");
        assert_eq!(found(&mut e, "abc", start, flags(SearchDirection::Forward, false)), expected);
    }

    #[test]
    fn test_forward_wraps_to_earlier_match() {
        let mut e = engine("abc xyz abc");
        assert_eq!(found(&mut e, "abc", 9, flags(SearchDirection::Forward, true)), Some(0..3));
        assert_eq!(found(&mut e, "xyz", 5, flags(SearchDirection::Forward, true)), Some(4..7));
    }

    #[test_case(11, Some(8..11) ; "from end")]
    #[test_case(8, Some(8..11) ; "match starting at start")]
    #[test_case(7, Some(0..3) ; "earlier match")]
    #[test_case(0, Some(0..3) ; "at zero")]
    fn test_backward(start: usize, expected: Option<Range<usize>>) {
        let mut e = engine("abc xyz abc");
        assert_eq!(found(&mut e, "abc", start, flags(SearchDirection::Backward, false)), expected);
    }

    #[test]
    fn test_backward_wraps_to_later_match() {
        let mut e = engine("xyz abc");
        assert_eq!(found(&mut e, "abc", 2, flags(SearchDirection::Backward, false)), None);
        assert_eq!(found(&mut e, "abc", 2, flags(SearchDirection::Backward, true)), Some(4..7));
    }

    #[test]
    fn test_backward_finds_overlapping_last_start() {
        let mut e = engine("aaaa");
        assert_eq!(found(&mut e, "aa", 4, flags(SearchDirection::Backward, false)), Some(2..4));
        assert_eq!(found(&mut e, "aa", 1, flags(SearchDirection::Backward, false)), Some(1..3));
    }

    #[test]
    fn test_backward_scans_past_first_window() {
        let text = format!("needle{}", "x".repeat(5000));
        let mut e = engine(&text);
        let len = e.len();
        assert_eq!(found(&mut e, "needle", len, flags(SearchDirection::Backward, false)), Some(0..6));
    }

    #[test]
    fn test_anchored() {
        let mut e = engine("abc xyz");
        assert_eq!(found(&mut e, "xyz", 4, flags(SearchDirection::Anchored, false)), Some(4..7));
        assert_eq!(found(&mut e, "xyz", 3, flags(SearchDirection::Anchored, false)), None);
    }

    // ==================== Flags ====================

    #[test]
    fn test_literal_mode_escapes_metacharacters() {
        let mut e = engine("a.c abc");
        assert_eq!(found(&mut e, "a.c", 1, flags(SearchDirection::Forward, false)), None);
        let mut regex = flags(SearchDirection::Forward, false);
        regex.regex = true;
        assert_eq!(found(&mut e, "a.c", 1, regex), Some(4..7));
    }

    #[test]
    fn test_ignore_case() {
        let mut e = engine("Hello");
        let mut f = flags(SearchDirection::Forward, false);
        assert_eq!(found(&mut e, "hello", 0, f), None);
        f.ignore_case = true;
        assert_eq!(found(&mut e, "hello", 0, f), Some(0..5));
    }

    #[test]
    fn test_multi_line_anchors_and_groups() {
        let mut e = engine("one\nkey=value\n");
        let f = SearchFlags {
            regex: true,
            ..SearchFlags::default()
        };
        let m = e.find_text(r"^(\w+)=(\w+)$", 0, f).unwrap().unwrap();
        assert_eq!(m.range(), 4..13);
        assert_eq!(m.group(1), Some(4..7));
        assert_eq!(m.group(2), Some(8..13));
        assert_eq!(m.group(3), None);
    }

    #[test]
    fn test_bad_pattern_is_an_error() {
        let mut e = engine("abc");
        let f = SearchFlags {
            regex: true,
            ..SearchFlags::default()
        };
        assert!(matches!(e.find_text("(", 0, f), Err(EngineError::Pattern(_))));
    }

    #[test]
    fn test_search_across_gap() {
        let mut e = engine("hello world");
        e.insert_text(5, b",").unwrap();
        assert_eq!(found(&mut e, "o, w", 0, flags(SearchDirection::Forward, false)), Some(4..8));
    }
}
