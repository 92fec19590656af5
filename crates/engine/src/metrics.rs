// Chunk: docs/chunks/text_engine - Editable-text engine for a multi-line text widget

//! Character width capability and column arithmetic.
//!
//! Display widths come from a host-supplied [`CharWidth`]; the engine never
//! measures glyphs itself. Logical columns are independent of the capability:
//! a tab advances to the next tab stop and everything else is one column.

use std::fmt;

use unicode_width::UnicodeWidthChar;

/// Width lookup supplied by the host.
///
/// Units are arbitrary (pixels, cells) but must be consistent with the
/// [`Viewport`](crate::Viewport) and [`Margins`](crate::Margins) handed to the engine.
pub trait CharWidth: fmt::Debug {
    /// Display width of a printable code point.
    fn char_width(&self, ch: char) -> usize;

    /// Height of one row.
    fn line_height(&self) -> usize;

    /// True if every printable code point has the same width.
    fn is_monospace(&self) -> bool {
        true
    }

    /// Typical character width; used to snap the wrap width.
    fn average_width(&self) -> usize {
        self.char_width('x')
    }
}

/// Fixed-cell metrics: a code point occupies its `unicode-width` cell count times `cell`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Monospace {
    pub cell: usize,
    pub height: usize,
}

impl Monospace {
    pub fn new(cell: usize, height: usize) -> Self {
        Self { cell, height }
    }
}

impl Default for Monospace {
    /// One unit per cell and per row, so widths read as terminal columns.
    fn default() -> Self {
        Self { cell: 1, height: 1 }
    }
}

impl CharWidth for Monospace {
    fn char_width(&self, ch: char) -> usize {
        ch.width().unwrap_or(0) * self.cell
    }

    fn line_height(&self) -> usize {
        self.height
    }

    fn is_monospace(&self) -> bool {
        true
    }

    fn average_width(&self) -> usize {
        self.cell
    }
}

/// Display width of `ch` when it starts `indent` units into the row.
///
/// Tabs stretch to the next multiple of `tab_width`. Control characters render as
/// a caret followed by the matching letter (`^A`).
pub fn char_display_width(metrics: &dyn CharWidth, ch: char, indent: usize, tab_width: usize) -> usize {
    if ch >= ' ' {
        metrics.char_width(ch)
    } else if ch == '\t' {
        let tab_width = tab_width.max(1);
        tab_width - indent % tab_width
    } else {
        let caret = char::from_u32(ch as u32 | 0x40).unwrap_or('?');
        metrics.char_width('^') + metrics.char_width(caret)
    }
}

/// Columns advanced by the character whose lead byte is `byte`, starting at `col`.
#[inline]
pub fn column_advance(byte: u8, col: usize, tab_columns: usize) -> usize {
    if byte == b'\t' {
        let tab_columns = tab_columns.max(1);
        tab_columns - col % tab_columns
    } else {
        1
    }
}
