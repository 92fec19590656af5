// Chunk: docs/chunks/text_engine - Editable-text engine for a multi-line text widget

//! Editing, navigation and selection commands.
//!
//! These are the operations a key binding maps to. Editing commands fail with
//! [`EngineError::ReadOnly`] on read-only text and return `Ok(false)` when there
//! is nothing to do. Navigation and selection commands work on read-only text.

use lite_text_buffer::tabs::max_columns;
use tracing::debug;

use crate::error::{EngineError, Result};
use crate::notify::TextEvent;
use crate::selection::{ColumnSpan, SelectMode, Selection};
use crate::text_engine::TextEngine;
use crate::words::{LEFT_BRACKETS, RIGHT_BRACKETS};

/// Re-indent amount for [`TextEngine::shift_lines`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShiftAmount {
    Left,
    Right,
    TabLeft,
    TabRight,
    /// Rewrites leading whitespace for the tab setting without shifting.
    Clean,
}

impl ShiftAmount {
    fn columns(self, tab_columns: usize) -> isize {
        match self {
            ShiftAmount::Left => -1,
            ShiftAmount::Right => 1,
            ShiftAmount::TabLeft => -(tab_columns as isize),
            ShiftAmount::TabRight => tab_columns as isize,
            ShiftAmount::Clean => 0,
        }
    }
}

/// Bracket kind for the enclosing-block commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bracket {
    Brace,
    Square,
    Paren,
    Angle,
}

impl Bracket {
    fn pair(self) -> (char, char) {
        let i = self as usize;
        (LEFT_BRACKETS[i], RIGHT_BRACKETS[i])
    }
}

/// Cursor movement for [`TextEngine::cursor_motion`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    Top,
    Bottom,
    Home,
    End,
    Left,
    Right,
    Up,
    Down,
    PageUp,
    PageDown,
    WordLeft,
    WordRight,
}

impl TextEngine {
    fn ensure_editable(&self) -> Result<()> {
        if self.config.options.read_only {
            debug!("editing command rejected on read-only text");
            return Err(EngineError::ReadOnly);
        }
        Ok(())
    }

    /// Deletes the selection if the cursor is inside it.
    fn delete_pending_selection(&mut self) -> Result<bool> {
        let c = self.cursor;
        if self.is_pos_selected(c.pos, Some(c.vcol)) {
            return self.delete_selection();
        }
        Ok(false)
    }

    /// Line range covered by the selection, or the cursor line.
    fn selected_lines(&self) -> (usize, usize) {
        match self.selection {
            Some(sel) => (self.line_start(sel.start), self.line_end(sel.end.saturating_sub(1).max(sel.start))),
            None => (self.line_start(self.cursor.pos), self.line_end(self.cursor.pos)),
        }
    }

    // ==================== Typing ====================

    /// Types `text` at the cursor.
    ///
    /// A selection under the cursor is replaced; a block selection gets `text`
    /// inserted on every line and collapses to the column after it. In
    /// overstrike mode the text replaces the characters under it.
    pub fn insert_string(&mut self, text: &[u8]) -> Result<bool> {
        self.ensure_editable()?;
        let c = self.cursor;
        if let Some(sel) = self.selection.filter(|s| s.contains(c.pos, Some(c.vcol))) {
            match sel.columns {
                Some(cols) => {
                    let col = cols.start + max_columns(text, self.config.tab_columns);
                    let ins = self.insert_text_block(sel.start, sel.end, cols.start, text)?;
                    let block = Selection::block(sel.start, sel.start + ins, ColumnSpan { start: col, end: col });
                    self.selection = Some(block);
                    self.emit(TextEvent::Selected(block));
                    let start = self.line_start(sel.start + ins);
                    let pos = self.pos_from_column(start, col);
                    self.set_cursor_pos(pos);
                    self.make_position_visible(pos);
                }
                None => {
                    let ins = self.replace_text(sel.start, sel.len(), text)?;
                    self.move_cursor(sel.start + ins);
                }
            }
            return Ok(true);
        }
        let end = if self.config.options.overstrike {
            self.overstruck(c.pos, c.pos, text)
        } else {
            c.pos
        };
        let ins = self.replace_text(c.pos, end - c.pos, text)?;
        self.move_cursor(c.pos + ins);
        Ok(true)
    }

    /// Types a newline, copying the current line's leading blanks when
    /// `auto_indent` is on.
    pub fn insert_newline(&mut self) -> Result<bool> {
        self.ensure_editable()?;
        let mut text = vec![b'\n'];
        if self.config.options.auto_indent {
            let pos = match self.selection {
                Some(sel) if sel.contains(self.cursor.pos, None) => sel.start,
                _ => self.cursor.pos,
            };
            let start = self.line_start(pos);
            let line = self.buffer.extract(start, pos - start);
            text.extend(line.iter().take_while(|b| matches!(b, b' ' | b'\t' | 0x0B)));
        }
        self.insert_string(&text)
    }

    /// Types a tab, or spaces up to the next tab stop when `no_tabs` is on.
    pub fn insert_tab(&mut self) -> Result<bool> {
        self.ensure_editable()?;
        if !self.config.options.no_tabs {
            return self.insert_string(b"\t");
        }
        let pos = match self.selection {
            Some(sel) if sel.contains(self.cursor.pos, None) => sel.start,
            _ => self.cursor.pos,
        };
        let tab_columns = self.config.tab_columns;
        let indent = self.column_from_pos(self.line_start(pos), pos);
        let spaces = vec![b' '; tab_columns - indent % tab_columns];
        self.insert_string(&spaces)
    }

    // ==================== Deletion ====================

    /// Removes `[pos, cursor)` and puts the cursor at `pos`.
    fn delete_back_to(&mut self, pos: usize) -> Result<bool> {
        let cur = self.cursor.pos;
        if pos >= cur {
            return Ok(false);
        }
        self.remove_text(pos, cur - pos)?;
        self.move_cursor(pos);
        Ok(true)
    }

    /// Removes `[cursor, pos)` and keeps the cursor in place.
    fn delete_forward_to(&mut self, pos: usize) -> Result<bool> {
        let cur = self.cursor.pos;
        if pos <= cur {
            return Ok(false);
        }
        self.remove_text(cur, pos - cur)?;
        self.move_cursor(cur);
        Ok(true)
    }

    pub fn backspace_char(&mut self) -> Result<bool> {
        self.ensure_editable()?;
        if self.delete_pending_selection()? {
            return Ok(true);
        }
        let pos = self.dec(self.cursor.pos);
        self.delete_back_to(pos)
    }

    pub fn backspace_word(&mut self) -> Result<bool> {
        self.ensure_editable()?;
        if self.delete_pending_selection()? {
            return Ok(true);
        }
        let pos = self.left_word(self.cursor.pos);
        self.delete_back_to(pos)
    }

    /// Deletes back to the beginning of the line.
    pub fn backspace_bol(&mut self) -> Result<bool> {
        self.ensure_editable()?;
        if self.delete_pending_selection()? {
            return Ok(true);
        }
        let pos = self.line_start(self.cursor.pos);
        self.delete_back_to(pos)
    }

    pub fn delete_char(&mut self) -> Result<bool> {
        self.ensure_editable()?;
        if self.delete_pending_selection()? {
            return Ok(true);
        }
        let pos = self.inc(self.cursor.pos);
        self.delete_forward_to(pos)
    }

    pub fn delete_word(&mut self) -> Result<bool> {
        self.ensure_editable()?;
        if self.delete_pending_selection()? {
            return Ok(true);
        }
        let pos = self.right_word(self.cursor.pos);
        self.delete_forward_to(pos)
    }

    /// Deletes to the end of the line, leaving the newline.
    pub fn delete_eol(&mut self) -> Result<bool> {
        self.ensure_editable()?;
        if self.delete_pending_selection()? {
            return Ok(true);
        }
        let pos = self.line_end(self.cursor.pos);
        self.delete_forward_to(pos)
    }

    /// Deletes the cursor line including its newline.
    pub fn delete_line(&mut self) -> Result<bool> {
        self.ensure_editable()?;
        let beg = self.line_start(self.cursor.pos);
        let end = self.next_line(self.cursor.pos, 1);
        if beg >= end {
            return Ok(false);
        }
        self.remove_text(beg, end - beg)?;
        self.move_cursor(beg);
        Ok(true)
    }

    pub fn delete_all(&mut self) -> Result<bool> {
        self.ensure_editable()?;
        if self.is_empty() {
            return Ok(false);
        }
        self.clear_text()?;
        self.move_cursor(0);
        Ok(true)
    }

    // ==================== Line edits ====================

    /// Re-indents the selected lines, or the cursor line.
    ///
    /// The shifted lines end up selected and the cursor keeps its row, with its
    /// column moved by the shift.
    pub fn shift_lines(&mut self, amount: ShiftAmount) -> Result<bool> {
        self.ensure_editable()?;
        let (row, col) = (self.cursor.row, self.cursor.col);
        let shift = amount.columns(self.config.tab_columns);
        let (start, end) = match self.selection {
            Some(sel) => (
                self.line_start(sel.start),
                self.next_line(sel.end.saturating_sub(1).max(sel.start), 1),
            ),
            None => {
                let end = self.line_end(self.cursor.pos);
                (self.line_start(self.cursor.pos), if end < self.len() { end + 1 } else { end })
            }
        };
        let len = self.shift_text(start, end, shift)?;
        self.set_selection(start, len);
        let col = (col as isize + shift).max(0) as usize;
        self.set_anchor_row_column(row, col);
        self.set_cursor_row_column(row, col);
        Ok(true)
    }

    /// Upper- or lowercases the selection, or the character at the cursor.
    pub fn change_case(&mut self, upper: bool) -> Result<bool> {
        self.ensure_editable()?;
        let (row, col) = (self.cursor.row, self.cursor.col);
        let (start, end) = match self.selection {
            Some(sel) => (sel.start, sel.end),
            None => (self.cursor.pos, self.inc(self.cursor.pos)),
        };
        if start >= end {
            return Ok(false);
        }
        let len = self.case_shift(start, end, upper)?;
        self.set_selection(start, len);
        self.set_anchor_row_column(row, col);
        self.set_cursor_row_column(row, col);
        Ok(true)
    }

    /// Duplicates the selected lines, or the cursor line, and selects the copy
    /// below.
    pub fn copy_line(&mut self) -> Result<bool> {
        self.ensure_editable()?;
        let (start, end) = self.selected_lines();
        let mut text = self.extract_text(start, end - start)?;
        text.push(b'\n');
        self.insert_text(start, &text)?;
        self.set_selection(start + text.len(), text.len());
        self.set_anchor_pos(self.cursor.pos);
        self.make_position_visible(self.cursor.pos);
        Ok(true)
    }

    /// Swaps the selected lines, or the cursor line, with the line above.
    pub fn move_line_up(&mut self) -> Result<bool> {
        self.ensure_editable()?;
        let (cur_beg, cur_end) = self.selected_lines();
        if cur_beg == 0 {
            return Ok(false);
        }
        let prev_beg = self.prev_line(cur_beg, 1);
        let pos = prev_beg + self.cursor.pos.clamp(cur_beg, cur_end) - cur_beg;

        let mut text = self.buffer.extract(cur_beg, cur_end - cur_beg);
        text.push(b'\n');
        text.extend(self.buffer.extract(prev_beg, cur_beg - prev_beg - 1));
        self.replace_text(prev_beg, cur_end - prev_beg, &text)?;

        self.set_selection(prev_beg, cur_end - cur_beg + 1);
        self.set_anchor_pos(prev_beg);
        self.set_cursor_pos(pos);
        self.make_position_visible(self.cursor.pos);
        Ok(true)
    }

    /// Swaps the selected lines, or the cursor line, with the line below.
    pub fn move_line_down(&mut self) -> Result<bool> {
        self.ensure_editable()?;
        let (cur_beg, cur_end) = match self.selection {
            Some(sel) => (
                self.line_start(sel.start),
                self.next_line(sel.end.saturating_sub(1).max(sel.start), 1),
            ),
            None => (self.line_start(self.cursor.pos), self.next_line(self.cursor.pos, 1)),
        };
        if cur_end >= self.len() {
            return Ok(false);
        }
        let next_end = self.line_end(cur_end);
        let moved = cur_beg + next_end - cur_end + 1;
        let pos = moved + self.cursor.pos.clamp(cur_beg, cur_end - 1) - cur_beg;

        let mut text = self.buffer.extract(cur_end, next_end - cur_end);
        text.push(b'\n');
        text.extend(self.buffer.extract(cur_beg, cur_end - cur_beg - 1));
        self.replace_text(cur_beg, next_end - cur_beg, &text)?;

        self.set_selection(moved, cur_end - cur_beg);
        self.set_anchor_pos(moved);
        self.set_cursor_pos(pos);
        self.make_position_visible(self.cursor.pos);
        Ok(true)
    }

    /// Joins the cursor line with the next by removing its newline.
    pub fn join_lines(&mut self) -> Result<bool> {
        self.ensure_editable()?;
        let pos = self.line_end(self.cursor.pos);
        if pos >= self.len() {
            return Ok(false);
        }
        self.remove_text(pos, 1)?;
        Ok(true)
    }

    // ==================== Brackets ====================

    /// Moves past the bracket matching the one before the cursor.
    pub fn goto_matching(&mut self) -> bool {
        let Some(pos) = self.matching_before_cursor() else {
            return false;
        };
        self.move_cursor(pos + 1);
        true
    }

    /// Selects from the bracket before the cursor through its match.
    pub fn select_matching(&mut self) -> bool {
        let Some(pos) = self.matching_before_cursor() else {
            return false;
        };
        let cur = self.cursor.pos;
        if cur <= pos {
            self.set_selection(cur - 1, pos - cur + 2);
            self.set_anchor_pos(cur - 1);
        } else {
            self.set_selection(pos, cur - pos);
            self.set_anchor_pos(cur);
        }
        self.set_cursor_pos(pos + 1);
        self.make_position_visible(self.cursor.pos);
        self.flash_matching();
        true
    }

    fn matching_before_cursor(&self) -> Option<usize> {
        let at = self.cursor.pos.checked_sub(1)?;
        let ch = self.buffer.byte_at(at) as char;
        self.find_matching(at, 0, self.len(), ch, 1)
    }

    /// Moves just inside the opening bracket of the enclosing block.
    pub fn block_begin(&mut self, bracket: Bracket) -> bool {
        let (l, r) = bracket.pair();
        let cur = self.cursor.pos;
        if cur < 2 {
            return false;
        }
        let mut beg = cur - 1;
        if self.buffer.byte_at(beg) as char == l {
            beg -= 1;
        }
        match self.view().match_backward(beg, 0, l, r, 1) {
            Some(pos) => {
                self.move_cursor(pos + 1);
                true
            }
            None => false,
        }
    }

    /// Moves onto the closing bracket of the enclosing block.
    pub fn block_end(&mut self, bracket: Bracket) -> bool {
        let (l, r) = bracket.pair();
        let mut start = self.cursor.pos;
        if start >= self.len() {
            return false;
        }
        if self.buffer.byte_at(start) as char == r {
            start += 1;
        }
        match self.view().match_forward(start, self.len(), l, r, 1) {
            Some(pos) => {
                self.move_cursor(pos);
                true
            }
            None => false,
        }
    }

    /// Selects the enclosing block, brackets included. Repeating widens the
    /// selection to the next enclosing block.
    pub fn select_block(&mut self, bracket: Bracket) -> bool {
        let (l, r) = bracket.pair();
        let cur = self.cursor.pos;
        let len = self.len();
        let mut level = 1;
        loop {
            let (beg, end) = {
                let view = self.view();
                let beg = cur.checked_sub(1).and_then(|p| view.match_backward(p, 0, l, r, level));
                (beg, view.match_forward(cur, len, l, r, level))
            };
            match (beg, end) {
                (Some(beg), Some(end)) if beg < end => {
                    if self.is_pos_selected(beg, None) && self.is_pos_selected(end + 1, None) {
                        level += 1;
                        continue;
                    }
                    self.set_anchor_pos(beg);
                    self.extend_selection(end + 1, SelectMode::Chars);
                    return true;
                }
                _ => return false,
            }
        }
    }

    // ==================== Navigation ====================

    /// Moves the cursor. With `extend` the selection grows from the anchor to
    /// the new position; otherwise it is dropped.
    pub fn cursor_motion(&mut self, motion: Motion, extend: bool) {
        let cur = self.cursor.pos;
        let len = self.len();
        let col = self.pref_col.unwrap_or(self.cursor.col);
        let page = self.full_rows();
        let top = self.rows.top_pos();

        let mut vertical = false;
        let mut scroll = None;
        let target = {
            let view = self.view();
            match motion {
                Motion::Top => 0,
                Motion::Bottom => len,
                Motion::Home => view.line_start(cur),
                Motion::End => view.line_end(cur),
                Motion::Left => self.buffer.dec(cur),
                Motion::Right => self.buffer.inc(cur),
                Motion::WordLeft => view.left_word(cur),
                Motion::WordRight => view.right_word(cur),
                Motion::Up => {
                    vertical = true;
                    view.pos_from_column(view.prev_row(cur, 1), col)
                }
                Motion::Down => {
                    vertical = true;
                    view.pos_from_column(view.next_row(cur, 1), col)
                }
                Motion::PageUp => {
                    vertical = true;
                    scroll = Some(view.prev_row(top, page));
                    view.pos_from_column(view.prev_row(cur, page), col)
                }
                Motion::PageDown => {
                    vertical = true;
                    scroll = Some(view.next_row(top, page));
                    view.pos_from_column(view.next_row(cur, page), col)
                }
            }
        };

        if let Some(pos) = scroll {
            self.set_top_line(pos);
        }
        if extend {
            self.move_cursor_and_select(target, SelectMode::Chars);
        } else {
            self.move_cursor(target);
        }
        if vertical {
            self.pref_col = Some(col);
        }
    }

    // ==================== Selection commands ====================

    pub fn select_word(&mut self) -> bool {
        let cur = self.cursor.pos;
        self.set_anchor_pos(cur);
        self.extend_selection(cur, SelectMode::Words)
    }

    pub fn select_line(&mut self) -> bool {
        let cur = self.cursor.pos;
        self.set_anchor_pos(cur);
        self.extend_selection(cur, SelectMode::Lines)
    }

    pub fn deselect_all(&mut self) -> bool {
        self.kill_selection()
    }
}
