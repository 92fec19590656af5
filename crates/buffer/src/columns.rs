// Chunk: docs/chunks/column_blocks - Tab expansion and rectangular column edits

//! Per-line column rectangle transforms.
//!
//! Every function here expects detabbed input, so one code point is one column.
//! Each walks the source line by line, copying, skipping or padding columns,
//! and produces a new byte vector. The engine wraps these with detab/entab.

use crate::tabs::trailing_len;

/// Forward reader over a byte slice that moves in whole code points.
struct ColumnReader<'a> {
    text: &'a [u8],
    pos: usize,
}

impl<'a> ColumnReader<'a> {
    fn new(text: &'a [u8]) -> Self {
        Self { text, pos: 0 }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.text.len()
    }

    /// True if the reader sits on a newline.
    fn at_newline(&self) -> bool {
        self.text.get(self.pos) == Some(&b'\n')
    }

    /// True if the current line still has characters before its newline.
    fn has_line_text(&self) -> bool {
        !self.at_end() && !self.at_newline()
    }

    fn rewind(&mut self) {
        self.pos = 0;
    }

    fn char_end(&self) -> usize {
        (self.pos + 1 + trailing_len(self.text[self.pos])).min(self.text.len())
    }

    /// Copies up to `ncols` columns of the current line into `out`.
    ///
    /// Stops at newline or end of input. Returns the number of columns copied.
    fn copy_cols(&mut self, out: &mut Vec<u8>, ncols: usize) -> usize {
        let mut col = 0;
        while col < ncols && self.has_line_text() {
            let end = self.char_end();
            out.extend_from_slice(&self.text[self.pos..end]);
            self.pos = end;
            col += 1;
        }
        col
    }

    /// Skips up to `ncols` columns of the current line.
    fn skip_cols(&mut self, ncols: usize) -> usize {
        let mut col = 0;
        while col < ncols && self.has_line_text() {
            self.pos = self.char_end();
            col += 1;
        }
        col
    }

    /// Consumes a newline if the reader sits on one.
    fn take_newline(&mut self) -> bool {
        if self.at_newline() {
            self.pos += 1;
            true
        } else {
            false
        }
    }
}

/// Appends `ncols` spaces. Returns the number of columns padded.
fn pad_cols(out: &mut Vec<u8>, ncols: usize) -> usize {
    out.resize(out.len() + ncols, b' ');
    ncols
}

/// Removes columns `[startcol, endcol)` from every line.
pub fn remove_columns(src: &[u8], startcol: usize, endcol: usize) -> Vec<u8> {
    let mut out = Vec::with_capacity(src.len());
    let mut src = ColumnReader::new(src);
    while !src.at_end() {
        src.copy_cols(&mut out, startcol);
        src.skip_cols(endcol.saturating_sub(startcol));
        src.copy_cols(&mut out, usize::MAX);
        if src.take_newline() {
            out.push(b'\n');
        }
    }
    out
}

/// Extracts columns `[startcol, endcol)` from every line.
///
/// A line shorter than `startcol` contributes only its newline, so the output
/// always has one line per source line.
pub fn extract_columns(src: &[u8], startcol: usize, endcol: usize) -> Vec<u8> {
    let mut out = Vec::with_capacity(src.len());
    let mut src = ColumnReader::new(src);
    while !src.at_end() {
        src.skip_cols(startcol);
        src.copy_cols(&mut out, endcol.saturating_sub(startcol));
        src.skip_cols(usize::MAX);
        if src.take_newline() {
            out.push(b'\n');
        }
    }
    out
}

/// Replaces columns `[startcol, endcol)` of every line with successive lines of `ins`.
///
/// Each inserted line occupies `inscols` columns; shorter ones are padded when
/// source text follows. When `ins` has more lines than `src`, the extra lines are
/// padded out to `startcol`. A newline is emitted once per row even when both
/// inputs end the row with one.
pub fn replace_columns(
    src: &[u8],
    ins: &[u8],
    startcol: usize,
    endcol: usize,
    inscols: usize,
    capacity: usize,
) -> Vec<u8> {
    let mut out = Vec::with_capacity(capacity);
    let mut src = ColumnReader::new(src);
    let mut ins = ColumnReader::new(ins);
    while !src.at_end() || !ins.at_end() {
        let mut sc = src.copy_cols(&mut out, startcol);
        src.skip_cols(endcol.saturating_sub(startcol));
        if ins.has_line_text() {
            sc += pad_cols(&mut out, startcol.saturating_sub(sc));
            sc += ins.copy_cols(&mut out, inscols);
        }
        if src.has_line_text() {
            pad_cols(&mut out, (startcol + inscols).saturating_sub(sc));
            src.copy_cols(&mut out, usize::MAX);
        }
        let ins_nl = ins.take_newline();
        let src_nl = src.take_newline();
        if ins_nl || src_nl {
            out.push(b'\n');
        }
    }
    out
}

/// Overwrites every line of `src` from `startcol` onward with successive lines of `ovr`.
///
/// Source characters covered by the overstrike are dropped; the remainder of the
/// line is kept. Lines of `ovr` past the last source line are discarded.
pub fn overstrike_columns(src: &[u8], ovr: &[u8], startcol: usize, capacity: usize) -> Vec<u8> {
    let mut out = Vec::with_capacity(capacity);
    let mut src = ColumnReader::new(src);
    let mut ovr = ColumnReader::new(ovr);
    while !src.at_end() {
        let sc = src.copy_cols(&mut out, startcol);
        let mut ec = sc;
        if ovr.has_line_text() {
            ec += pad_cols(&mut out, startcol.saturating_sub(ec));
            ec += ovr.copy_cols(&mut out, usize::MAX);
        }
        if src.has_line_text() {
            src.skip_cols(ec - sc);
            src.copy_cols(&mut out, usize::MAX);
        }
        let src_nl = src.take_newline();
        let ovr_nl = ovr.take_newline();
        if src_nl || ovr_nl {
            out.push(b'\n');
        }
    }
    out
}

/// Inserts the first line of `ins` at `startcol` on every line of `src`.
///
/// Text following the insertion point is shifted right to `startcol + inscols`.
/// Lines shorter than `startcol` are padded before the insertion.
pub fn insert_columns(
    src: &[u8],
    ins: &[u8],
    startcol: usize,
    inscols: usize,
    capacity: usize,
) -> Vec<u8> {
    let mut out = Vec::with_capacity(capacity);
    let mut src = ColumnReader::new(src);
    let mut ins = ColumnReader::new(ins);
    while !src.at_end() {
        let mut sc = src.copy_cols(&mut out, startcol);
        ins.rewind();
        if ins.has_line_text() {
            sc += pad_cols(&mut out, startcol.saturating_sub(sc));
            sc += ins.copy_cols(&mut out, inscols);
        }
        if src.has_line_text() {
            pad_cols(&mut out, (startcol + inscols).saturating_sub(sc));
            src.copy_cols(&mut out, usize::MAX);
        }
        if src.take_newline() {
            out.push(b'\n');
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn s(bytes: Vec<u8>) -> String {
        String::from_utf8(bytes).unwrap()
    }

    // ==================== Reader ====================

    #[test]
    fn test_reader_copy_stops_at_newline() {
        let mut r = ColumnReader::new(b"abc\ndef");
        let mut out = Vec::new();
        assert_eq!(r.copy_cols(&mut out, 10), 3);
        assert_eq!(out, b"abc");
        assert!(r.take_newline());
        assert_eq!(r.skip_cols(2), 2);
        assert_eq!(r.copy_cols(&mut out, 10), 1);
        assert!(r.at_end());
    }

    #[test]
    fn test_reader_counts_code_points() {
        let mut r = ColumnReader::new("é€x".as_bytes());
        let mut out = Vec::new();
        assert_eq!(r.copy_cols(&mut out, 2), 2);
        assert_eq!(s(out), "é€");
    }

    // ==================== Extract ====================

    #[test]
    fn test_extract_columns_rectangle() {
        let src = b"abcdef\nghijkl\nmnopqr";
        assert_eq!(s(extract_columns(src, 2, 4)), "cd\nij\nop");
    }

    #[test]
    fn test_extract_columns_short_lines_give_bare_newline() {
        let src = b"abcdef\nx\nmnopqr\n";
        assert_eq!(s(extract_columns(src, 2, 4)), "cd\n\nop\n");
    }

    #[test]
    fn test_extract_columns_partial_overlap() {
        assert_eq!(s(extract_columns(b"abc\nabcdef", 2, 4)), "c\ncd");
    }

    // ==================== Remove ====================

    #[test]
    fn test_remove_columns_rectangle() {
        let src = b"abcdef\nghijkl\nxy\n";
        assert_eq!(s(remove_columns(src, 2, 4)), "abef\nghkl\nxy\n");
    }

    #[test]
    fn test_remove_columns_empty_span_is_identity() {
        let src = b"abc\ndef";
        assert_eq!(s(remove_columns(src, 1, 1)), "abc\ndef");
    }

    // ==================== Replace ====================

    #[test]
    fn test_replace_columns_same_height() {
        let src = b"abcdef\nghijkl";
        let ins = b"XY\nZ";
        assert_eq!(s(replace_columns(src, ins, 2, 4, 2, 64)), "abXYef\nghZ kl");
    }

    #[test]
    fn test_replace_columns_extra_inserted_lines_are_padded() {
        let src = b"abcd";
        let ins = b"X\nY\nZ";
        assert_eq!(s(replace_columns(src, ins, 2, 3, 1, 64)), "abXd\n  Y\n  Z");
    }

    #[test]
    fn test_replace_columns_fewer_inserted_lines() {
        let src = b"abcd\nefgh\n";
        let ins = b"XX";
        assert_eq!(s(replace_columns(src, ins, 1, 2, 2, 64)), "aXXcd\ne  gh\n");
    }

    #[test]
    fn test_replace_columns_writes_single_newline_per_row() {
        let src = b"ab\ncd\n";
        let ins = b"X\nY\n";
        assert_eq!(s(replace_columns(src, ins, 1, 1, 1, 64)), "aXb\ncYd\n");
    }

    #[test]
    fn test_replace_columns_short_source_line_padded_to_startcol() {
        let src = b"a\nabcdef";
        let ins = b"X\nY";
        assert_eq!(s(replace_columns(src, ins, 3, 4, 1, 64)), "a  X\nabcYef");
    }

    // ==================== Overstrike ====================

    #[test]
    fn test_overstrike_columns_covers_source() {
        let src = b"abcdef\nghijkl";
        let ovr = b"XY\nZ";
        assert_eq!(s(overstrike_columns(src, ovr, 1, 64)), "aXYdef\ngZijkl");
    }

    #[test]
    fn test_overstrike_columns_pads_short_lines() {
        let src = b"a\nbcdef";
        let ovr = b"X\nY";
        assert_eq!(s(overstrike_columns(src, ovr, 3, 64)), "a  X\nbcdYf");
    }

    #[test]
    fn test_overstrike_columns_drops_extra_overstrike_lines() {
        let src = b"abc";
        let ovr = b"X\nY";
        assert_eq!(s(overstrike_columns(src, ovr, 0, 64)), "Xbc\n");
    }

    // ==================== Insert ====================

    #[test]
    fn test_insert_columns_same_text_each_line() {
        let src = b"abc\ndef\nghi";
        assert_eq!(s(insert_columns(src, b"--", 1, 2, 64)), "a--bc\nd--ef\ng--hi");
    }

    #[test]
    fn test_insert_columns_pads_short_lines() {
        let src = b"abcd\na\n";
        assert_eq!(s(insert_columns(src, b"X", 3, 1, 64)), "abcXd\na  X\n");
    }

    #[test]
    fn test_insert_columns_uses_first_line_only() {
        let src = b"ab\ncd";
        assert_eq!(s(insert_columns(src, b"X\nY", 1, 1, 64)), "aXb\ncXd");
    }
}
