// Chunk: docs/chunks/text_engine - Editable-text engine for a multi-line text widget

//! Cursor, anchor and scrolling.
//!
//! The cursor is where typing happens; the anchor is the other end of a
//! selection being extended. Both carry their row and column, which are
//! recomputed whenever the position is set and repaired by every edit.

use crate::notify::TextEvent;
use crate::selection::{Cursor, SelectMode};
use crate::text_engine::TextEngine;

impl TextEngine {
    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn anchor(&self) -> Cursor {
        self.anchor
    }

    /// Preferred column for vertical movement, if one is remembered.
    pub fn preferred_column(&self) -> Option<usize> {
        self.pref_col
    }

    // ==================== Cursor ====================

    /// Puts the cursor at `pos`, snapped to a code point start.
    pub fn set_cursor_pos(&mut self, pos: usize) {
        let pos = self.buffer.valid_pos(pos);
        if self.cursor.pos != pos {
            self.cursor = self.locate(pos);
            self.pref_col = None;
            self.emit(TextEvent::Changed { cursor: pos });
        }
    }

    /// Puts the cursor on `row` at column `col`, or at the row end if shorter.
    ///
    /// The virtual column stays `col` even when the row is shorter.
    pub fn set_cursor_row_column(&mut self, row: usize, col: usize) {
        let row = row.min(self.rows.nrows.saturating_sub(1));
        if row != self.cursor.row || col != self.cursor.vcol {
            let start = self.pos_from_row(row);
            let pos = self.pos_from_column(start, col);
            self.set_cursor_pos(pos);
            self.cursor.vcol = col;
        }
    }

    /// Moves to `row`, keeping the preferred column across the move.
    pub fn set_cursor_row(&mut self, row: usize) {
        let col = self.pref_col.unwrap_or(self.cursor.vcol);
        self.set_cursor_row_column(row, col);
        self.pref_col = Some(col);
    }

    pub fn set_cursor_column(&mut self, col: usize) {
        self.set_cursor_row_column(self.cursor.row, col);
    }

    // ==================== Anchor ====================

    pub fn set_anchor_pos(&mut self, pos: usize) {
        self.anchor = self.locate(pos);
    }

    pub fn set_anchor_row_column(&mut self, row: usize, col: usize) {
        let row = row.min(self.rows.nrows.saturating_sub(1));
        let start = self.pos_from_row(row);
        let pos = self.pos_from_column(start, col);
        self.set_anchor_pos(pos);
        self.anchor.vcol = col;
    }

    // ==================== Moves ====================

    /// Moves cursor and anchor to `pos`, dropping the selection.
    pub fn move_cursor(&mut self, pos: usize) {
        self.set_cursor_pos(pos);
        self.set_anchor_pos(self.cursor.pos);
        self.make_position_visible(self.cursor.pos);
        self.kill_selection();
        self.flash_matching();
    }

    pub fn move_cursor_row_column(&mut self, row: usize, col: usize) {
        self.set_cursor_row_column(row, col);
        self.set_anchor_row_column(row, col);
        self.make_position_visible(self.cursor.pos);
        self.kill_selection();
        self.flash_matching();
    }

    /// Moves the cursor to `pos` and selects from the anchor to it.
    pub fn move_cursor_and_select(&mut self, pos: usize, mode: SelectMode) {
        self.kill_highlight();
        self.set_cursor_pos(pos);
        self.make_position_visible(self.cursor.pos);
        self.extend_selection(self.cursor.pos, mode);
    }

    /// Moves the cursor to `row`/`col` and selects a block from the anchor to it.
    pub fn move_cursor_row_column_and_select(&mut self, row: usize, col: usize) {
        self.kill_highlight();
        self.set_cursor_row_column(row, col);
        self.make_position_visible(self.cursor.pos);
        self.extend_block_selection(row, col);
    }

    /// Highlights the bracket matching the one just before the cursor.
    pub fn flash_matching(&mut self) {
        self.kill_highlight();
        if self.config.options.show_match && self.cursor.pos > 0 {
            let pos = self.cursor.pos - 1;
            let ch = self.buffer.byte_at(pos) as char;
            if let Some(matched) = self.find_matching(pos, 0, self.len(), ch, 1) {
                self.set_highlight(matched, 1);
            }
        }
    }

    // ==================== Scrolling ====================

    /// Rows that fit entirely inside the viewport.
    pub fn full_rows(&self) -> usize {
        let m = self.config.margins;
        let line_height = self.metrics.line_height().max(1);
        (self.viewport.height.saturating_sub(m.top + m.bottom) / line_height).max(1)
    }

    /// Scrolls the least amount that brings the row holding `pos` into view.
    pub fn make_position_visible(&mut self, pos: usize) {
        let row = self.row_from_pos(pos);
        let top = self.rows.top_row;
        let full = self.full_rows();
        if row < top {
            self.scroll_to_row(row);
        } else if row >= top + full {
            self.scroll_to_row(row + 1 - full);
        }
    }

    /// Makes row number `row` the first visible row.
    pub fn scroll_to_row(&mut self, row: usize) {
        self.with_rows(|rows, view| rows.scroll_to_row(view, row));
    }

    /// Makes the row holding `pos` the first visible row.
    pub fn set_top_line(&mut self, pos: usize) {
        self.with_rows(|rows, view| rows.scroll_to_pos(view, pos));
    }

    /// Scrolls so the row holding `pos` is the last fully visible row.
    pub fn set_bottom_line(&mut self, pos: usize) {
        let row = self.row_from_pos(pos);
        let full = self.full_rows();
        self.scroll_to_row((row + 1).saturating_sub(full));
    }

    /// Scrolls so the row holding `pos` sits in the middle of the viewport.
    pub fn set_center_line(&mut self, pos: usize) {
        let row = self.row_from_pos(pos);
        let full = self.full_rows();
        self.scroll_to_row(row.saturating_sub(full / 2));
    }

    /// Scrolls by `delta` rows without moving the cursor.
    pub fn scroll_rows(&mut self, delta: isize) {
        let top = self.rows.top_row as isize + delta;
        self.scroll_to_row(top.max(0) as usize);
    }

    /// First position of the first visible row.
    pub fn top_line(&self) -> usize {
        self.rows.visrows()[0]
    }

    /// First position of the last fully visible row.
    pub fn bottom_line(&self) -> usize {
        let full = self.full_rows().min(self.rows.nvisrows());
        self.rows.visrows()[full - 1]
    }

    /// True if `pos` lies on a fully visible row.
    pub fn is_pos_visible(&self, pos: usize) -> bool {
        let row = self.row_from_pos(pos);
        let top = self.rows.top_row;
        top <= row && row < top + self.full_rows()
    }
}
