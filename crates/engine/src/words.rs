// Chunk: docs/chunks/text_engine - Editable-text engine for a multi-line text widget

//! Word boundaries and bracket matching on top of [`TextLayout`].

use crate::wrap::TextLayout;

/// Opening brackets, paired by index with [`RIGHT_BRACKETS`].
pub(crate) const LEFT_BRACKETS: [char; 4] = ['{', '[', '(', '<'];
pub(crate) const RIGHT_BRACKETS: [char; 4] = ['}', ']', ')', '>'];

/// Horizontal whitespace.
fn is_blank(ch: char) -> bool {
    ch.is_whitespace() && !matches!(ch, '\n' | '\r' | '\u{0B}' | '\u{0C}' | '\u{85}' | '\u{2028}' | '\u{2029}')
}

impl TextLayout<'_> {
    pub fn is_delimiter(&self, ch: char) -> bool {
        self.delimiters.contains(ch)
    }

    /// Start of the word before `pos`: skips one run of delimiters or word
    /// characters, or a run of blanks when `pos` follows a blank.
    pub fn left_word(&self, pos: usize) -> usize {
        let text = self.text;
        let mut pos = pos.min(self.len());
        if pos > 0 {
            pos = text.dec(pos);
            let ch = text.char_at(pos);
            if self.is_delimiter(ch) {
                while pos > 0 {
                    let ch = text.char_at(text.dec(pos));
                    if ch.is_whitespace() || !self.is_delimiter(ch) {
                        return pos;
                    }
                    pos = text.dec(pos);
                }
            } else if !ch.is_whitespace() {
                while pos > 0 {
                    let ch = text.char_at(text.dec(pos));
                    if ch.is_whitespace() || self.is_delimiter(ch) {
                        return pos;
                    }
                    pos = text.dec(pos);
                }
            }
            while pos > 0 {
                let ch = text.char_at(text.dec(pos));
                if !is_blank(ch) {
                    return pos;
                }
                pos = text.dec(pos);
            }
        }
        pos
    }

    /// End of the run at `pos`: skips one run of delimiters or word characters,
    /// or the blanks after `pos` when it sits on whitespace.
    pub fn right_word(&self, pos: usize) -> usize {
        let text = self.text;
        let len = self.len();
        let mut pos = pos.min(len);
        if pos < len {
            let ch = text.char_at(pos);
            pos = text.inc(pos);
            if self.is_delimiter(ch) {
                while pos < len {
                    let ch = text.char_at(pos);
                    if ch.is_whitespace() || !self.is_delimiter(ch) {
                        return pos;
                    }
                    pos = text.inc(pos);
                }
            } else if !ch.is_whitespace() {
                while pos < len {
                    let ch = text.char_at(pos);
                    if ch.is_whitespace() || self.is_delimiter(ch) {
                        return pos;
                    }
                    pos = text.inc(pos);
                }
            }
            while pos < len {
                let ch = text.char_at(pos);
                if !is_blank(ch) {
                    return pos;
                }
                pos = text.inc(pos);
            }
        }
        pos
    }

    /// Start of the run (word, delimiters or blanks) containing `pos`.
    pub fn word_start(&self, pos: usize) -> usize {
        let text = self.text;
        let len = self.len();
        let mut pos = pos.min(len);
        if pos > 0 {
            let ch = if pos < len { text.char_at(pos) } else { ' ' };
            if ch == '\n' {
                return pos;
            }
            if is_blank(ch) {
                while pos > 0 {
                    if !is_blank(text.char_at(text.dec(pos))) {
                        return pos;
                    }
                    pos = text.dec(pos);
                }
            } else if self.is_delimiter(ch) {
                while pos > 0 {
                    if !self.is_delimiter(text.char_at(text.dec(pos))) {
                        return pos;
                    }
                    pos = text.dec(pos);
                }
            } else {
                while pos > 0 {
                    let ch = text.char_at(text.dec(pos));
                    if self.is_delimiter(ch) || ch.is_whitespace() {
                        return pos;
                    }
                    pos = text.dec(pos);
                }
            }
        }
        pos
    }

    /// End of the run containing `pos`. A newline is a run of its own.
    pub fn word_end(&self, pos: usize) -> usize {
        let text = self.text;
        let len = self.len();
        let mut pos = pos.min(len);
        if pos < len {
            let ch = text.char_at(pos);
            if ch == '\n' {
                return pos + 1;
            }
            if is_blank(ch) {
                while pos < len {
                    if !is_blank(text.char_at(pos)) {
                        return pos;
                    }
                    pos = text.inc(pos);
                }
            } else if self.is_delimiter(ch) {
                while pos < len {
                    if !self.is_delimiter(text.char_at(pos)) {
                        return pos;
                    }
                    pos = text.inc(pos);
                }
            } else {
                while pos < len {
                    let ch = text.char_at(pos);
                    if self.is_delimiter(ch) || ch.is_whitespace() {
                        return pos;
                    }
                    pos = text.inc(pos);
                }
            }
        }
        pos
    }

    // ==================== Brackets ====================

    /// Scans forward from `pos` up to `end` for the `r` that closes `level` open `l`s.
    pub fn match_forward(&self, pos: usize, end: usize, l: char, r: char, level: usize) -> Option<usize> {
        let end = end.min(self.len());
        let mut level = level as isize;
        let mut pos = pos;
        while pos < end {
            let ch = self.text.char_at(pos);
            if ch == r {
                level -= 1;
                if level <= 0 {
                    return Some(pos);
                }
            } else if ch == l {
                level += 1;
            }
            pos = self.text.inc(pos);
        }
        None
    }

    /// Scans backward from `pos` down to `beg` for the `l` that opens `level` unclosed `r`s.
    pub fn match_backward(&self, pos: usize, beg: usize, l: char, r: char, level: usize) -> Option<usize> {
        let mut level = level as isize;
        let mut pos = pos.min(self.len());
        while beg <= pos {
            let ch = self.text.char_at(pos);
            if ch == l {
                level -= 1;
                if level <= 0 {
                    return Some(pos);
                }
            } else if ch == r {
                level += 1;
            }
            if pos == 0 {
                break;
            }
            pos = self.text.dec(pos);
        }
        None
    }

    /// Finds the bracket matching `ch`, which sits at `pos`, within `[beg, end)`.
    ///
    /// Handles `{}`, `[]` and `()`; any other character has no match.
    pub fn find_matching(&self, pos: usize, beg: usize, end: usize, ch: char, level: usize) -> Option<usize> {
        match ch {
            '{' => self.match_forward(pos + 1, end, '{', '}', level),
            '[' => self.match_forward(pos + 1, end, '[', ']', level),
            '(' => self.match_forward(pos + 1, end, '(', ')', level),
            '}' => pos.checked_sub(1).and_then(|p| self.match_backward(p, beg, '{', '}', level)),
            ']' => pos.checked_sub(1).and_then(|p| self.match_backward(p, beg, '[', ']', level)),
            ')' => pos.checked_sub(1).and_then(|p| self.match_backward(p, beg, '(', ')', level)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::DEFAULT_DELIMITERS;
    use crate::metrics::Monospace;
    use crate::wrap::{TextLayout, WrapParams};
    use lite_text_buffer::GapBuffer;
    use pretty_assertions::assert_eq;

    const METRICS: Monospace = Monospace { cell: 1, height: 1 };
    const PARAMS: WrapParams = WrapParams {
        word_wrap: false,
        wrap_width: 80,
        tab_width: 8,
        tab_columns: 8,
    };

    fn with_layout(text: &str, f: impl FnOnce(TextLayout<'_>)) {
        let buf = GapBuffer::from_bytes(text.as_bytes());
        f(TextLayout::new(&buf, &METRICS, PARAMS, DEFAULT_DELIMITERS));
    }

    // ==================== Words ====================

    #[test]
    fn test_left_and_right_word() {
        with_layout("foo.bar  baz", |l| {
            assert_eq!(l.right_word(0), 3);
            assert_eq!(l.right_word(3), 4);
            assert_eq!(l.right_word(4), 7);
            assert_eq!(l.right_word(7), 9);
            assert_eq!(l.left_word(12), 9);
            assert_eq!(l.left_word(9), 7);
            assert_eq!(l.left_word(7), 4);
            assert_eq!(l.left_word(4), 3);
            assert_eq!(l.left_word(3), 0);
        });
    }

    #[test]
    fn test_word_start_and_end() {
        with_layout("foo.bar  baz\nx", |l| {
            assert_eq!(l.word_start(5), 4);
            assert_eq!(l.word_end(5), 7);
            assert_eq!(l.word_start(8), 7);
            assert_eq!(l.word_end(8), 9);
            assert_eq!(l.word_end(12), 13);
            assert_eq!(l.word_start(12), 12);
        });
    }

    #[test]
    fn test_word_start_at_end_treats_end_as_blank() {
        with_layout("ab  ", |l| {
            assert_eq!(l.word_start(4), 2);
        });
    }

    // ==================== Brackets ====================

    #[test]
    fn test_find_matching_nested() {
        with_layout("f(a(b)c)", |l| {
            let len = l.len();
            assert_eq!(l.find_matching(1, 0, len, '(', 1), Some(7));
            assert_eq!(l.find_matching(7, 0, len, ')', 1), Some(1));
            assert_eq!(l.find_matching(3, 0, len, '(', 1), Some(5));
            assert_eq!(l.find_matching(0, 0, len, 'f', 1), None);
        });
    }

    #[test]
    fn test_find_matching_unbalanced() {
        with_layout("{[}", |l| {
            assert_eq!(l.find_matching(1, 0, 3, '[', 1), None);
            assert_eq!(l.find_matching(0, 0, 0, '}', 1), None);
        });
    }

    #[test]
    fn test_match_backward_stops_at_beg() {
        with_layout("(ab)", |l| {
            assert_eq!(l.match_backward(2, 1, '(', ')', 1), None);
            assert_eq!(l.match_backward(2, 0, '(', ')', 1), Some(0));
        });
    }
}
