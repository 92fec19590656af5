// Chunk: docs/chunks/text_engine - Editable-text engine for a multi-line text widget

//! Cursor and selection value types, and selection repair across edits.

use crate::config::SelectionPolicy;

/// A caret position with its derived row and column.
///
/// `col` is counted from the start of the row. `vcol` is the column the caret
/// wants to be in; it survives moves through short lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cursor {
    pub pos: usize,
    pub row: usize,
    pub col: usize,
    pub vcol: usize,
}

/// Column span of a block selection, `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSpan {
    pub start: usize,
    pub end: usize,
}

/// A selected or highlighted range of text.
///
/// With `columns` set the selection is a rectangle: only the given columns of
/// the lines between `start` and `end` are selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub start: usize,
    pub end: usize,
    pub columns: Option<ColumnSpan>,
}

impl Selection {
    pub fn range(start: usize, end: usize) -> Self {
        Self {
            start,
            end,
            columns: None,
        }
    }

    pub fn block(start: usize, end: usize, columns: ColumnSpan) -> Self {
        Self {
            start,
            end,
            columns: Some(columns),
        }
    }

    #[inline]
    pub fn is_block(&self) -> bool {
        self.columns.is_some()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// True if `pos` lies in the selection. For a block, `col` must also lie in
    /// the column span (inclusive of its right edge); no column means any column.
    pub fn contains(&self, pos: usize, col: Option<usize>) -> bool {
        if pos < self.start || self.end < pos {
            return false;
        }
        match (self.columns, col) {
            (Some(span), Some(col)) => span.start <= col && col <= span.end,
            _ => true,
        }
    }
}

/// What a selection extension snaps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectMode {
    #[default]
    Chars,
    Words,
    Rows,
    Lines,
}

/// Repairs `sel` after `del` bytes at `pos` were replaced by `ins` bytes.
///
/// An edit entirely before the selection shifts it; one after it leaves it alone.
/// Overlaps are settled by `policy`. Block columns are carried unchanged.
pub fn adjust_for_edit(
    sel: &mut Option<Selection>,
    pos: usize,
    del: usize,
    ins: usize,
    policy: SelectionPolicy,
) {
    let Some(s) = sel.as_mut() else {
        return;
    };
    let shift = |p: usize| p + ins - del;
    let edit_end = pos + del;

    if edit_end <= s.start {
        s.start = shift(s.start);
        s.end = shift(s.end);
        return;
    }
    match policy {
        SelectionPolicy::EndOfInsert => {
            if pos <= s.start {
                if edit_end <= s.end {
                    s.end = shift(s.end);
                    s.start = pos;
                } else {
                    s.start = pos;
                    s.end = pos + ins;
                }
            } else if pos < s.end {
                if edit_end <= s.end {
                    s.end = shift(s.end);
                } else {
                    s.end = pos + ins;
                }
            }
        }
        SelectionPolicy::Snipped => {
            if pos <= s.start {
                if edit_end < s.end {
                    s.end = shift(s.end);
                    s.start = pos + ins;
                } else {
                    *sel = None;
                }
            } else if pos < s.end {
                if edit_end <= s.end {
                    s.end = shift(s.end);
                } else {
                    s.end = pos;
                }
            }
        }
    }
}
