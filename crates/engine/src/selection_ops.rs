// Chunk: docs/chunks/text_engine - Editable-text engine for a multi-line text widget

//! Selection and highlight operations.

use lite_text_buffer::tabs::max_columns;

use crate::error::Result;
use crate::notify::TextEvent;
use crate::selection::{ColumnSpan, SelectMode, Selection};
use crate::text_engine::TextEngine;

impl TextEngine {
    pub fn selection(&self) -> Option<Selection> {
        self.selection
    }

    pub fn highlight(&self) -> Option<Selection> {
        self.highlight
    }

    // ==================== Range selection ====================

    /// Selects `len` bytes at `pos`. An empty range drops the selection.
    ///
    /// Returns true if the selection changed.
    pub fn set_selection(&mut self, pos: usize, len: usize) -> bool {
        let start = self.buffer.valid_pos(pos);
        let end = self.buffer.valid_pos(pos.saturating_add(len));
        let new = (start < end).then(|| Selection::range(start, end));
        if new == self.selection {
            return false;
        }
        match new {
            Some(sel) => {
                self.selection = Some(sel);
                self.emit(TextEvent::Selected(sel));
            }
            None => {
                self.kill_selection();
            }
        }
        true
    }

    /// Selects from the anchor to `pos`, snapped outward to `mode` boundaries.
    pub fn extend_selection(&mut self, pos: usize, mode: SelectMode) -> bool {
        let view = self.view();
        let anchor = self.anchor.pos;
        let (lo, hi) = (pos.min(anchor), pos.max(anchor));
        let (start, end) = match mode {
            SelectMode::Chars => (lo, hi),
            SelectMode::Words => (view.word_start(lo), view.word_end(hi)),
            SelectMode::Rows => (view.row_start(lo), view.next_row(hi, 1)),
            SelectMode::Lines => (view.line_start(lo), view.next_line(hi, 1)),
        };
        self.set_selection(start, end - start)
    }

    // ==================== Block selection ====================

    /// Selects columns `[left_col, right_col)` of rows `top_row..=bottom_row`.
    pub fn set_block_selection(
        &mut self,
        top_row: usize,
        left_col: usize,
        bottom_row: usize,
        right_col: usize,
    ) -> bool {
        let view = self.view();
        let start = view.line_start(self.rows.pos_from_row(&view, top_row));
        let end = view.line_end(self.rows.pos_from_row(&view, bottom_row));
        if start > end || left_col > right_col {
            return self.kill_selection();
        }
        let new = Selection::block(
            start,
            end,
            ColumnSpan {
                start: left_col,
                end: right_col,
            },
        );
        if self.selection == Some(new) {
            return false;
        }
        self.selection = Some(new);
        self.emit(TextEvent::Selected(new));
        true
    }

    /// Selects the block spanned by the anchor and `row`/`col`.
    pub fn extend_block_selection(&mut self, row: usize, col: usize) -> bool {
        let (arow, acol) = (self.anchor.row, self.anchor.vcol);
        self.set_block_selection(row.min(arow), col.min(acol), row.max(arow), col.max(acol))
    }

    // ==================== Queries ====================

    /// True if `pos` is selected. For a block selection `col` must also be in
    /// the column span; `None` ignores columns.
    pub fn is_pos_selected(&self, pos: usize, col: Option<usize>) -> bool {
        self.selection.is_some_and(|sel| sel.contains(pos, col))
    }

    /// The selected text. A block selection yields one line per selected line.
    pub fn selected_text(&self) -> Result<Vec<u8>> {
        match self.selection {
            Some(sel) => match sel.columns {
                Some(cols) => self.extract_text_block(sel.start, sel.end, cols.start, cols.end),
                None => self.extract_text(sel.start, sel.len()),
            },
            None => Ok(Vec::new()),
        }
    }

    // ==================== Edits ====================

    /// Deletes the selected text and puts the cursor where it was.
    pub fn delete_selection(&mut self) -> Result<bool> {
        let Some(sel) = self.selection else {
            return Ok(false);
        };
        match sel.columns {
            Some(cols) => {
                let len = self.remove_text_block(sel.start, sel.end, cols.start, cols.end)?;
                let start = self.line_start(sel.start + len);
                let pos = self.pos_from_column(start, cols.start);
                self.move_cursor(pos);
            }
            None => {
                self.remove_text(sel.start, sel.len())?;
                self.move_cursor(self.cursor.pos);
            }
        }
        Ok(true)
    }

    /// Replaces the selected text with `text`.
    ///
    /// For a block selection each line of `text` replaces the selected columns of
    /// the matching line.
    pub fn replace_selection(&mut self, text: &[u8]) -> Result<bool> {
        let Some(sel) = self.selection else {
            return Ok(false);
        };
        let pos = match sel.columns {
            Some(cols) => {
                let ncols = max_columns(text, self.config.tab_columns);
                let len = self.replace_text_block(sel.start, sel.end, cols.start, cols.end, text)?;
                let start = self.line_start(sel.start + len);
                self.pos_from_column(start, cols.start + ncols)
            }
            None => {
                let len = self.replace_text(sel.start, sel.len(), text)?;
                sel.start + len
            }
        };
        self.move_cursor(pos);
        Ok(true)
    }

    /// Drops the selection. Returns true if there was one.
    pub fn kill_selection(&mut self) -> bool {
        match self.selection.take() {
            Some(old) => {
                self.emit(TextEvent::Deselected(old));
                true
            }
            None => false,
        }
    }

    pub fn select_all(&mut self) -> bool {
        self.set_anchor_pos(0);
        self.set_selection(0, self.len())
    }

    // ==================== Highlight ====================

    /// Highlights `len` bytes at `pos`. An empty range drops the highlight.
    pub fn set_highlight(&mut self, pos: usize, len: usize) -> bool {
        let start = self.buffer.valid_pos(pos);
        let end = self.buffer.valid_pos(pos.saturating_add(len));
        let new = (start < end).then(|| Selection::range(start, end));
        if new == self.highlight {
            return false;
        }
        self.highlight = new;
        true
    }

    pub fn kill_highlight(&mut self) -> bool {
        self.highlight.take().is_some()
    }
}

#[cfg(test)]
mod tests {
    use crate::config::{EngineConfig, SelectionPolicy};
    use crate::metrics::Monospace;
    use crate::notify::TextEvent;
    use crate::selection::{ColumnSpan, SelectMode, Selection};
    use crate::text_engine::TextEngine;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn engine(text: &str) -> TextEngine {
        TextEngine::with_text(EngineConfig::default(), Box::new(Monospace::default()), text)
    }

    fn range(e: &TextEngine) -> Option<(usize, usize)> {
        e.selection().map(|s| (s.start, s.end))
    }

    // ==================== Range ====================

    #[test]
    fn test_set_selection_emits_and_reports_change() {
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        let mut e = engine("hello world");
        e.add_listener(move |ev: &TextEvent| sink.borrow_mut().push(ev.clone()));
        assert!(e.set_selection(0, 5));
        assert!(!e.set_selection(0, 5));
        assert!(e.set_selection(3, 0));
        assert_eq!(
            *events.borrow(),
            vec![
                TextEvent::Selected(Selection::range(0, 5)),
                TextEvent::Deselected(Selection::range(0, 5)),
            ]
        );
    }

    #[test]
    fn test_set_selection_clamps_to_len() {
        let mut e = engine("abc");
        e.set_selection(1, 100);
        assert_eq!(range(&e), Some((1, 3)));
    }

    #[test]
    fn test_extend_selection_modes() {
        let mut e = engine("one two three\nfour five");
        e.set_anchor_pos(5);
        e.extend_selection(9, SelectMode::Chars);
        assert_eq!(range(&e), Some((5, 9)));
        e.extend_selection(9, SelectMode::Words);
        assert_eq!(range(&e), Some((4, 13)));
        e.extend_selection(16, SelectMode::Lines);
        assert_eq!(range(&e), Some((0, 23)));
    }

    #[test]
    fn test_delete_selection_collapses_cursor() {
        let mut e = engine("hello cruel world");
        e.set_cursor_pos(9);
        e.set_selection(6, 6);
        assert!(e.delete_selection().unwrap());
        assert_eq!(e.text(), "hello world");
        assert_eq!(e.cursor().pos, 6);
        assert_eq!(e.selection(), None);
    }

    #[test]
    fn test_replace_selection_moves_cursor_after_text() {
        let mut e = engine("hello cruel world");
        e.set_selection(6, 5);
        assert!(e.replace_selection(b"kind").unwrap());
        assert_eq!(e.text(), "hello kind world");
        assert_eq!(e.cursor().pos, 10);
    }

    #[test]
    fn test_edit_containing_selection_follows_policy() {
        let mut e = engine("0123456789");
        e.set_selection(3, 3);
        e.replace_text(2, 6, b"ab").unwrap();
        assert_eq!(range(&e), Some((2, 4)));

        e.set_selection_policy(SelectionPolicy::Snipped);
        e.set_selection(2, 2);
        e.replace_text(1, 4, b"x").unwrap();
        assert_eq!(e.selection(), None);
    }

    // ==================== Block ====================

    #[test]
    fn test_block_selection_spans_whole_lines() {
        let mut e = engine("abcdef\nab\nabcdef");
        assert!(e.set_block_selection(0, 2, 2, 4));
        let sel = e.selection().unwrap();
        assert_eq!((sel.start, sel.end), (0, 16));
        assert_eq!(sel.columns, Some(ColumnSpan { start: 2, end: 4 }));
        assert_eq!(e.selected_text().unwrap(), b"cd\n\ncd");
        assert!(e.is_pos_selected(3, Some(3)));
        assert!(!e.is_pos_selected(3, Some(5)));
    }

    #[test]
    fn test_inverted_block_kills_selection() {
        let mut e = engine("abc\ndef");
        e.set_selection(0, 2);
        assert!(e.set_block_selection(0, 3, 1, 1));
        assert_eq!(e.selection(), None);
    }

    #[test]
    fn test_extend_block_from_anchor() {
        let mut e = engine("abcdef\nabcdef\nabcdef");
        e.set_anchor_row_column(2, 4);
        e.extend_block_selection(0, 1);
        let sel = e.selection().unwrap();
        assert_eq!((sel.start, sel.end), (0, 20));
        assert_eq!(sel.columns, Some(ColumnSpan { start: 1, end: 4 }));
    }

    #[test]
    fn test_delete_block_selection() {
        let mut e = engine("abcdef\nabcdef");
        e.set_block_selection(0, 1, 1, 3);
        assert!(e.delete_selection().unwrap());
        assert_eq!(e.text(), "adef\nadef");
        assert_eq!(e.cursor().pos, 6);
    }

    #[test]
    fn test_replace_block_selection() {
        let mut e = engine("abcdef\nabcdef");
        e.set_block_selection(0, 1, 1, 3);
        assert!(e.replace_selection(b"X\nY").unwrap());
        assert_eq!(e.text(), "aXdef\naYdef");
        assert_eq!(e.cursor().pos, 8);
    }

    // ==================== Highlight ====================

    #[test]
    fn test_highlight_follows_edits() {
        let mut e = engine("abc(def)");
        e.set_highlight(3, 1);
        e.insert_text(0, b"xx").unwrap();
        assert_eq!(e.highlight(), Some(Selection::range(5, 6)));
        assert!(e.kill_highlight());
        assert!(!e.kill_highlight());
    }
}
