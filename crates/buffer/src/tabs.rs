// Chunk: docs/chunks/column_blocks - Tab expansion and rectangular column edits

//! Tab expansion, compression and re-indentation.
//!
//! All helpers treat every code point as one column except tabs, which advance to the
//! next multiple of `tab_columns`, and newlines, which reset the column to zero.

/// Counts occurrences of `byte` in `text`.
pub fn count_bytes(text: &[u8], byte: u8) -> usize {
    text.iter().filter(|&&b| b == byte).count()
}

/// Returns the widest line of `text` in columns.
///
/// # Arguments
/// * `text` - UTF-8 bytes, possibly spanning several lines
/// * `tab_columns` - Tab stop spacing
pub fn max_columns(text: &[u8], tab_columns: usize) -> usize {
    let tab_columns = tab_columns.max(1);
    let mut result = 0;
    let mut cols = 0;
    let mut s = 0;
    while s < text.len() {
        let c = text[s];
        s += 1;
        if c == b'\n' {
            result = result.max(cols);
            cols = 0;
            continue;
        }
        if c == b'\t' {
            cols += tab_columns - cols % tab_columns;
            continue;
        }
        cols += 1;
        s += trailing_len(c);
    }
    result.max(cols)
}

/// Number of continuation bytes following a lead byte.
#[inline]
pub(crate) fn trailing_len(lead: u8) -> usize {
    match lead {
        0x00..=0xBF => 0,
        0xC0..=0xDF => 1,
        0xE0..=0xEF => 2,
        _ => 3,
    }
}

/// Copies one code point starting at `text[s]` into `out`, returning the new `s`.
#[inline]
fn copy_char(out: &mut Vec<u8>, text: &[u8], s: usize) -> usize {
    let end = (s + 1 + trailing_len(text[s])).min(text.len());
    out.extend_from_slice(&text[s..end]);
    end
}

/// Expands tabs to the equivalent run of spaces.
pub fn detab(text: &[u8], tab_columns: usize) -> Vec<u8> {
    let tab_columns = tab_columns.max(1);
    let mut out = Vec::with_capacity(text.len() + count_bytes(text, b'\t') * tab_columns);
    let mut col = 0;
    let mut s = 0;
    while s < text.len() {
        let c = text[s];
        match c {
            b'\t' => {
                loop {
                    out.push(b' ');
                    col += 1;
                    if col % tab_columns == 0 {
                        break;
                    }
                }
                s += 1;
            }
            b'\n' => {
                out.push(c);
                col = 0;
                s += 1;
            }
            _ => {
                col += 1;
                s = copy_char(&mut out, text, s);
            }
        }
    }
    out
}

/// Compresses runs of spaces into tabs.
///
/// A run of three or more spaces that reaches a tab stop is replaced by a tab up to
/// that stop. An existing tab swallows the spaces immediately before it. Column
/// positions of every non-blank character are preserved.
pub fn entab(text: &[u8], tab_columns: usize) -> Vec<u8> {
    let tab_columns = tab_columns.max(1);
    let mut out: Vec<u8> = Vec::with_capacity(text.len());
    // `is` is the column where the pending run of blanks starts, `ie` where it ends
    let mut is = 0;
    let mut ie = 0;
    let mut s = 0;
    while s < text.len() {
        let c = text[s];
        match c {
            b' ' => {
                out.push(c);
                s += 1;
                ie += 1;
                if ie - is < 3 {
                    continue;
                }
                let ts = is + tab_columns - is % tab_columns;
                if ie < ts {
                    continue;
                }
                let run = ie - is;
                out.truncate(out.len() - run);
                out.push(b'\t');
                is = ts;
                out.resize(out.len() + (ie - is), b' ');
            }
            b'\t' => {
                s += 1;
                let run = ie - is;
                out.truncate(out.len() - run);
                out.push(b'\t');
                ie += tab_columns - ie % tab_columns;
                is += tab_columns - is % tab_columns;
                if is != ie {
                    out.push(b'\t');
                    is += tab_columns - is % tab_columns;
                }
            }
            b'\n' => {
                out.push(c);
                s += 1;
                is = 0;
                ie = 0;
            }
            _ => {
                ie += 1;
                is = ie;
                s = copy_char(&mut out, text, s);
            }
        }
    }
    out
}

/// Re-tabifies text, optionally shifting every line by `shift` columns.
///
/// The input is assumed to start at column `indent` and the output at column
/// `outdent`; this affects where tab stops fall. Leading and embedded whitespace is
/// re-emitted as spaces, or as tabs plus spaces when `tabs` is set and the gap is
/// more than two columns. Shifting left never moves text past column zero. With
/// `shift == 0`, `indent == 0` and `outdent == 0` this harmonises whitespace with the
/// current tab setting.
pub fn tabbify(
    text: &[u8],
    tab_columns: usize,
    indent: usize,
    outdent: usize,
    shift: isize,
    tabs: bool,
) -> Vec<u8> {
    let tab_columns = tab_columns.max(1) as isize;
    let indent = indent as isize;
    let outdent = outdent as isize;
    let mut out = Vec::with_capacity(text.len() + text.len() / 2);
    let mut oec = outdent + shift;
    let mut osc = outdent;
    let mut isc = indent;
    let mut iec = indent;
    let mut s = 0;
    while s < text.len() {
        let c = text[s];
        if c == b' ' {
            iec += 1;
            s += 1;
            continue;
        }
        if c == b'\t' {
            iec += tab_columns - iec % tab_columns;
            s += 1;
            continue;
        }
        oec += iec - isc;
        if osc < oec {
            if tabs && 2 < oec - osc {
                let ntabs = oec / tab_columns - osc / tab_columns;
                if ntabs > 0 {
                    out.resize(out.len() + ntabs as usize, b'\t');
                    osc = (oec / tab_columns) * tab_columns;
                }
            }
            while osc < oec {
                out.push(b' ');
                osc += 1;
            }
        }
        if c == b'\n' {
            out.push(b'\n');
            s += 1;
            isc = indent;
            iec = indent;
            osc = outdent;
            oec = outdent + shift;
            continue;
        }
        iec += 1;
        isc = iec;
        oec += 1;
        osc = oec;
        s = copy_char(&mut out, text, s);
    }
    out
}
