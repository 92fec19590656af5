// Chunk: docs/chunks/text_engine - Editable-text engine for a multi-line text widget
//!
//! Line, row and column arithmetic over a gap buffer.
//!
//! A *line* ends at a newline. A *row* is what one screen row shows: in word-wrap
//! mode a line breaks into rows greedily, at the last space that still fits, or
//! mid-word when a single word is wider than the wrap width. Without word wrap
//! rows and lines coincide.
//!
//! [`TextLayout`] is a borrowed, read-only view. It holds no cache; every query
//! rescans from the nearest line start, so callers keep scans short by starting
//! from known row starts.

use lite_text_buffer::GapBuffer;

use crate::metrics::{char_display_width, column_advance, CharWidth};

/// Wrap settings resolved against the current metrics and viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WrapParams {
    pub word_wrap: bool,
    /// Row width in capability units.
    pub wrap_width: usize,
    /// Width of a full tab in capability units.
    pub tab_width: usize,
    pub tab_columns: usize,
}

/// Rows and size covered by a span of text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Extent {
    pub rows: usize,
    pub width: usize,
    pub height: usize,
}

/// Read-only wrap-aware view of a buffer.
#[derive(Debug, Clone, Copy)]
pub struct TextLayout<'a> {
    pub(crate) text: &'a GapBuffer,
    pub(crate) metrics: &'a dyn CharWidth,
    pub(crate) params: WrapParams,
    pub(crate) delimiters: &'a str,
}

impl<'a> TextLayout<'a> {
    pub fn new(
        text: &'a GapBuffer,
        metrics: &'a dyn CharWidth,
        params: WrapParams,
        delimiters: &'a str,
    ) -> Self {
        Self {
            text,
            metrics,
            params,
            delimiters,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.text.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    #[inline]
    pub fn params(&self) -> WrapParams {
        self.params
    }

    /// Display width of `ch` starting `indent` units into its row.
    #[inline]
    pub fn char_width(&self, ch: char, indent: usize) -> usize {
        char_display_width(self.metrics, ch, indent, self.params.tab_width)
    }

    /// Display width of the text between a row start and `pos`.
    pub fn x_offset(&self, start: usize, pos: usize) -> usize {
        let mut x = 0;
        let mut p = start;
        while p < pos {
            let ch = self.text.char_at(p);
            if ch == '\n' {
                break;
            }
            x += self.char_width(ch, x);
            p = self.text.inc(p);
        }
        x
    }

    // ==================== Wrapping ====================

    /// Returns the start of the row following the row that begins at `start`.
    ///
    /// Breaks right after a newline. When the next character would overflow the
    /// wrap width, breaks after the last space seen on this row, or before the
    /// overflowing character, or after it when it is alone on the row.
    pub fn wrap(&self, start: usize) -> usize {
        let len = self.len();
        let mut lw = 0;
        let mut p = start;
        let mut s = start;
        while p < len {
            let ch = self.text.char_at(p);
            if ch == '\n' {
                return p + 1;
            }
            let cw = self.char_width(ch, lw);
            if lw + cw > self.params.wrap_width {
                if s > start {
                    return s;
                }
                if p > start {
                    return p;
                }
                return self.text.inc(p);
            }
            lw += cw;
            p = self.text.inc(p);
            if ch.is_whitespace() {
                s = p;
            }
        }
        len
    }

    // ==================== Lines ====================

    pub fn line_start(&self, pos: usize) -> usize {
        let mut pos = pos.min(self.len());
        while pos > 0 && self.text.byte_at(pos - 1) != b'\n' {
            pos -= 1;
        }
        pos
    }

    /// Position of the newline ending the line at `pos`, or `len`.
    pub fn line_end(&self, pos: usize) -> usize {
        let len = self.len();
        let mut pos = pos.min(len);
        while pos < len && self.text.byte_at(pos) != b'\n' {
            pos += 1;
        }
        pos
    }

    /// Start of the `n`-th line after the one at `pos`.
    pub fn next_line(&self, pos: usize, n: usize) -> usize {
        let len = self.len();
        let mut pos = pos.min(len);
        let mut n = n;
        if n > 0 {
            while pos < len {
                let byte = self.text.byte_at(pos);
                pos += 1;
                if byte == b'\n' {
                    n -= 1;
                    if n == 0 {
                        break;
                    }
                }
            }
        }
        pos
    }

    /// Start of the `n`-th line before the one at `pos`.
    pub fn prev_line(&self, pos: usize, n: usize) -> usize {
        let mut pos = pos.min(self.len());
        let mut n = n;
        if n > 0 {
            while pos > 0 {
                if self.text.byte_at(pos - 1) == b'\n' {
                    if n == 0 {
                        break;
                    }
                    n -= 1;
                }
                pos -= 1;
            }
        }
        pos
    }

    // ==================== Rows ====================

    pub fn row_start(&self, pos: usize) -> usize {
        let len = self.len();
        let pos = pos.min(len);
        let mut start = self.line_start(pos);
        if self.params.word_wrap {
            while start < pos {
                let t = self.wrap(start);
                if t > pos || t >= len {
                    break;
                }
                start = t;
            }
        }
        start
    }

    /// End of the row containing `pos`, before any trailing break space.
    pub fn row_end(&self, pos: usize) -> usize {
        let len = self.len();
        let pos = pos.min(len);
        if !self.params.word_wrap {
            return self.line_end(pos);
        }
        let mut end = self.line_start(pos);
        while end <= pos && end < len {
            end = self.wrap(end);
        }
        if pos < end {
            let t = self.text.dec(end);
            if self.text.char_at(t).is_whitespace() {
                end = t;
            }
        }
        end
    }

    /// Start of the `n`-th row after the row containing `pos`.
    pub fn next_row(&self, pos: usize, n: usize) -> usize {
        if !self.params.word_wrap {
            return self.next_line(pos, n);
        }
        let len = self.len();
        let mut pos = pos.min(len);
        if n > 0 {
            let target = pos;
            pos = self.row_start(target);
            let mut n = n;
            while pos < len {
                pos = self.wrap(pos);
                n -= 1;
                if n == 0 {
                    break;
                }
            }
        }
        pos
    }

    /// Start of the `n`-th row before the row containing `pos`.
    pub fn prev_row(&self, pos: usize, n: usize) -> usize {
        if !self.params.word_wrap {
            return self.prev_line(pos, n);
        }
        let len = self.len();
        let mut pos = pos.min(len);
        if n == 0 {
            return pos;
        }
        let mut nr = n as isize;
        while pos > 0 {
            let p = pos;
            pos = self.line_start(pos);
            // Rows of this line that start before p
            let mut q = pos;
            while q < p {
                let t = self.wrap(q);
                if t > p || t >= len {
                    break;
                }
                nr -= 1;
                q = t;
            }
            while nr < 0 {
                pos = self.wrap(pos);
                nr += 1;
            }
            if nr == 0 || pos == 0 {
                break;
            }
            pos -= 1;
            nr -= 1;
        }
        pos
    }

    // ==================== Counting ====================

    /// Number of rows between `start` and `end`.
    ///
    /// `end` may be `len + 1` to count a trailing empty row.
    pub fn count_rows(&self, start: usize, end: usize) -> usize {
        if self.params.word_wrap {
            return self.measure_text(start, end).rows;
        }
        let end = end.min(self.len() + 1);
        let mut rows = 0;
        let mut p = start;
        let mut q = start;
        while p < end {
            let byte = self.text.byte_at(p);
            p += 1;
            if byte == b'\n' {
                rows += 1;
                q = p;
            }
        }
        if q < p {
            rows += 1;
        }
        rows
    }

    /// Number of lines between `start` and `end`.
    pub fn count_lines(&self, start: usize, end: usize) -> usize {
        let end = end.min(self.len() + 1);
        let mut lines = 0;
        let mut p = start;
        let mut q = start;
        while p < end {
            let byte = self.text.byte_at(p);
            p += 1;
            if byte == b'\n' {
                lines += 1;
                q = p;
            }
        }
        if q < p {
            lines += 1;
        }
        lines
    }

    /// Widest line between `start` and `end`, in columns.
    pub fn count_columns(&self, start: usize, end: usize) -> usize {
        let end = end.min(self.len());
        let mut widest = 0;
        let mut col = 0;
        let mut p = start;
        while p < end {
            let byte = self.text.byte_at(p);
            if byte == b'\n' {
                widest = widest.max(col);
                col = 0;
                p += 1;
                continue;
            }
            col += column_advance(byte, col, self.params.tab_columns);
            p = self.text.inc(p);
        }
        widest.max(col)
    }

    /// Rows, width and height of the text between `start` and `end`.
    ///
    /// `end` may be `len + 1`; the position past the end counts as a zero-width
    /// character so a trailing empty row is included. In word-wrap mode `start`
    /// must be a row start, rows are counted by stepping wrap points, and the
    /// width is the wrap width. Otherwise the width is the widest line.
    pub fn measure_text(&self, start: usize, end: usize) -> Extent {
        let len = self.len();
        let end = end.min(len + 1);
        let mut rows = 0;
        let mut width = 0;
        if self.params.word_wrap {
            let mut p = start;
            while p < end {
                if p >= len {
                    // Empty row after a trailing newline
                    if p == len && self.line_start(len) == len {
                        rows += 1;
                    }
                    break;
                }
                rows += 1;
                p = self.wrap(p);
            }
            width = self.params.wrap_width;
        } else {
            let mut p = start;
            let mut q = start;
            let mut w = 0;
            while p < end {
                if p >= len {
                    p += 1;
                    continue;
                }
                let ch = self.text.char_at(p);
                if ch == '\n' {
                    rows += 1;
                    width = width.max(w);
                    w = 0;
                    p += 1;
                    q = p;
                    continue;
                }
                w += self.char_width(ch, w);
                p = self.text.inc(p);
            }
            width = width.max(w);
            if q < p {
                rows += 1;
            }
        }
        Extent {
            rows,
            width,
            height: rows * self.metrics.line_height(),
        }
    }

    // ==================== Columns ====================

    /// Column of `pos` counted from `start`, stopping at end of line.
    pub fn column_from_pos(&self, start: usize, pos: usize) -> usize {
        let pos = pos.min(self.len());
        let mut col = 0;
        let mut p = start;
        while p < pos {
            let byte = self.text.byte_at(p);
            if byte == b'\n' {
                break;
            }
            col += column_advance(byte, col, self.params.tab_columns);
            p = self.text.inc(p);
        }
        col
    }

    /// Position of the character covering column `col` on the line from `start`.
    ///
    /// Past end of line this is the line end.
    pub fn pos_from_column(&self, start: usize, col: usize) -> usize {
        let len = self.len();
        let mut column = 0;
        let mut p = start.min(len);
        while p < len {
            let byte = self.text.byte_at(p);
            if byte == b'\n' {
                break;
            }
            column += column_advance(byte, column, self.params.tab_columns);
            if col < column {
                break;
            }
            p = self.text.inc(p);
        }
        p
    }

    // ==================== Change brackets ====================

    /// Earliest position whose row layout an edit at `pos` can affect.
    ///
    /// An edit can pull text back onto the previous row of the same paragraph,
    /// so in word-wrap mode this is the start of the row before the one at `pos`.
    /// A row break decided by the character at a row start belongs to the row
    /// two back, so an edit exactly at a row start reaches one row further.
    pub fn change_beg(&self, pos: usize) -> usize {
        let mut p1 = self.line_start(pos);
        if self.params.word_wrap {
            let mut p0 = p1;
            let mut p2 = p1;
            while p2 < pos {
                let t = self.wrap(p2);
                if t > pos {
                    break;
                }
                p0 = p1;
                p1 = p2;
                p2 = t;
            }
            if p2 == pos {
                return p0;
            }
        }
        p1
    }

    /// Position after the newline following `pos`, or `len + 1`.
    pub fn change_end(&self, pos: usize) -> usize {
        let len = self.len();
        let mut pos = pos;
        while pos < len {
            if self.text.byte_at(pos) == b'\n' {
                return pos + 1;
            }
            pos += 1;
        }
        len + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::Monospace;
    use pretty_assertions::assert_eq;

    const METRICS: Monospace = Monospace { cell: 1, height: 1 };

    fn layout(buffer: &GapBuffer, word_wrap: bool, wrap_width: usize) -> TextLayout<'_> {
        TextLayout::new(
            buffer,
            &METRICS,
            WrapParams {
                word_wrap,
                wrap_width,
                tab_width: 8,
                tab_columns: 8,
            },
            crate::config::DEFAULT_DELIMITERS,
        )
    }

    // ==================== Wrap ====================

    #[test]
    fn test_wrap_breaks_after_last_space() {
        let buf = GapBuffer::from_bytes(b"the quick fox");
        let l = layout(&buf, true, 10);
        assert_eq!(l.wrap(0), 10);
        assert_eq!(l.wrap(10), 13);
    }

    #[test]
    fn test_wrap_breaks_long_word_mid_word() {
        let buf = GapBuffer::from_bytes(b"abcdefghij");
        let l = layout(&buf, true, 4);
        assert_eq!(l.wrap(0), 4);
        assert_eq!(l.wrap(4), 8);
        assert_eq!(l.wrap(8), 10);
    }

    #[test]
    fn test_wrap_never_leaves_empty_row() {
        let buf = GapBuffer::from_bytes("中中".as_bytes());
        let l = layout(&buf, true, 1);
        assert_eq!(l.wrap(0), 3);
    }

    #[test]
    fn test_wrap_stops_after_newline() {
        let buf = GapBuffer::from_bytes(b"ab\ncd");
        let l = layout(&buf, true, 10);
        assert_eq!(l.wrap(0), 3);
    }

    // ==================== Lines ====================

    #[test]
    fn test_line_navigation() {
        let buf = GapBuffer::from_bytes(b"AB\nCDE\n");
        let l = layout(&buf, false, 80);
        assert_eq!(l.line_start(4), 3);
        assert_eq!(l.line_end(4), 6);
        assert_eq!(l.next_line(0, 1), 3);
        assert_eq!(l.next_line(0, 2), 7);
        assert_eq!(l.prev_line(7, 1), 3);
        assert_eq!(l.prev_line(5, 1), 0);
        assert_eq!(l.prev_line(5, 0), 5);
    }

    // ==================== Rows ====================

    #[test]
    fn test_rows_in_wrap_mode() {
        let buf = GapBuffer::from_bytes(b"aaaa bbbb cccc\nxy");
        let l = layout(&buf, true, 5);
        assert_eq!(l.row_start(7), 5);
        assert_eq!(l.row_end(7), 9);
        assert_eq!(l.next_row(0, 1), 5);
        assert_eq!(l.next_row(0, 3), 15);
        assert_eq!(l.prev_row(16, 1), 10);
        assert_eq!(l.prev_row(16, 3), 0);
        assert_eq!(l.prev_row(7, 1), 0);
    }

    #[test]
    fn test_rows_without_wrap_are_lines() {
        let buf = GapBuffer::from_bytes(b"aaaa bbbb cccc\nxy");
        let l = layout(&buf, false, 5);
        assert_eq!(l.row_start(7), 0);
        assert_eq!(l.row_end(7), 14);
        assert_eq!(l.next_row(0, 1), 15);
        assert_eq!(l.prev_row(16, 1), 0);
    }

    // ==================== Counting ====================

    #[test]
    fn test_count_rows_includes_trailing_row() {
        let buf = GapBuffer::from_bytes(b"ab\ncd\n");
        let l = layout(&buf, false, 80);
        assert_eq!(l.count_rows(0, 6), 2);
        assert_eq!(l.count_rows(0, 7), 3);
        assert_eq!(l.count_lines(0, 7), 3);
    }

    #[test]
    fn test_count_rows_additive_at_row_boundaries() {
        let buf = GapBuffer::from_bytes(b"aaaa bbbb cccc\nxy z\n\nlast word here");
        let l = layout(&buf, true, 5);
        let len = buf.len();
        let total = l.count_rows(0, len);
        let mut sum = 0;
        let mut p = 0;
        while p < len {
            let next = l.wrap(p);
            sum += l.count_rows(p, next);
            p = next;
        }
        assert_eq!(sum, total);
    }

    #[test]
    fn test_count_rows_additive_with_tabs_under_narrow_wrap() {
        let buf = GapBuffer::from_bytes(b" x\tyz");
        let l = TextLayout::new(
            &buf,
            &METRICS,
            WrapParams {
                word_wrap: true,
                wrap_width: 2,
                tab_width: 4,
                tab_columns: 4,
            },
            crate::config::DEFAULT_DELIMITERS,
        );
        let mut starts = vec![0];
        let mut p = 0;
        while p < buf.len() {
            p = l.wrap(p);
            if p < buf.len() {
                starts.push(p);
            }
        }
        assert_eq!(starts, vec![0, 1, 2, 3]);

        let end = buf.len() + 1;
        let total = l.count_rows(0, end);
        assert_eq!(total, 4);
        for &mid in &starts {
            assert_eq!(l.count_rows(0, mid) + l.count_rows(mid, end), total, "split at {mid}");
            assert_eq!(l.count_rows(0, mid), starts.iter().filter(|&&s| s < mid).count());
        }
    }

    #[test]
    fn test_measure_text_counts_trailing_row_only_after_newline() {
        let buf = GapBuffer::from_bytes(b"ab cd\n");
        let l = layout(&buf, true, 3);
        assert_eq!(l.measure_text(0, buf.len() + 1).rows, 3);
        assert_eq!(l.measure_text(0, buf.len()).rows, 2);

        let buf = GapBuffer::from_bytes(b"ab cd");
        let l = layout(&buf, true, 3);
        assert_eq!(l.measure_text(0, buf.len() + 1).rows, 2);
        assert_eq!(l.measure_text(3, buf.len() + 1).rows, 1);
    }

    #[test]
    fn test_measure_text_width() {
        let buf = GapBuffer::from_bytes(b"ab\n\tx\nabcd");
        let l = layout(&buf, false, 80);
        let extent = l.measure_text(0, buf.len() + 1);
        assert_eq!(extent.rows, 3);
        assert_eq!(extent.width, 9);
        assert_eq!(extent.height, 3);
    }

    #[test]
    fn test_count_columns_uses_running_column_for_tabs() {
        let buf = GapBuffer::from_bytes(b"ab\tc\nx");
        let l = layout(&buf, false, 80);
        assert_eq!(l.count_columns(0, buf.len()), 9);
    }

    // ==================== Columns ====================

    #[test]
    fn test_column_round_trip_with_tab() {
        let buf = GapBuffer::from_bytes(b"a\tbc\nx");
        let l = layout(&buf, false, 80);
        assert_eq!(l.column_from_pos(0, 2), 8);
        assert_eq!(l.pos_from_column(0, 8), 2);
        assert_eq!(l.pos_from_column(0, 4), 1);
        assert_eq!(l.pos_from_column(0, 50), 4);
        assert_eq!(l.column_from_pos(0, 6), 10);
    }

    #[test]
    fn test_change_brackets() {
        let buf = GapBuffer::from_bytes(b"aaaa bbbb cccc\nxy");
        let l = layout(&buf, true, 5);
        assert_eq!(l.change_beg(12), 5);
        assert_eq!(l.change_beg(2), 0);
        // At a row start the break two rows back may depend on the edit
        assert_eq!(l.change_beg(10), 0);
        assert_eq!(l.change_beg(5), 0);
        assert_eq!(l.change_end(12), 15);
        assert_eq!(l.change_end(16), 18);
    }
}
