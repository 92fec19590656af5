// Chunk: docs/chunks/text_engine - Editable-text engine for a multi-line text widget

//! The editable-text engine.
//!
//! [`TextEngine`] owns the gap buffer and everything derived from it: the row
//! cache, the cursor and anchor, the selection and highlight. Every edit funnels
//! through one primitive, `replace`, which measures the affected rows before and
//! after the byte edit and repairs the derived state incrementally.
//!
//! This file holds the core state, layout and the text mutation API. Cursor,
//! selection, block, command and search operations live in sibling modules as
//! further `impl TextEngine` blocks.

use lite_text_buffer::GapBuffer;
use tracing::{debug, trace, warn};

use crate::config::{EngineConfig, Margins, SelectionPolicy, TextOptions, Viewport, MAX_TAB_COLUMNS};
use crate::error::{EngineError, Result};
use crate::metrics::{CharWidth, Monospace};
use crate::notify::{Listeners, TextChange, TextEvent, TextListener};
use crate::row_cache::RowCache;
use crate::selection::{adjust_for_edit, Cursor, Selection};
use crate::wrap::{Extent, TextLayout, WrapParams};

/// Editable text with wrap-aware layout, selections and change notification.
#[derive(Debug)]
pub struct TextEngine {
    pub(crate) buffer: GapBuffer,
    pub(crate) metrics: Box<dyn CharWidth>,
    pub(crate) config: EngineConfig,
    pub(crate) viewport: Viewport,
    /// Wrap settings resolved by the last layout.
    pub(crate) params: WrapParams,
    pub(crate) bar_width: usize,
    pub(crate) rows: RowCache,
    pub(crate) cursor: Cursor,
    pub(crate) anchor: Cursor,
    /// Column kept while moving up and down through short lines.
    pub(crate) pref_col: Option<usize>,
    pub(crate) selection: Option<Selection>,
    pub(crate) highlight: Option<Selection>,
    pub(crate) modified: bool,
    /// Row totals must be recounted at the next layout.
    pub(crate) needs_recompute: bool,
    pub(crate) listeners: Listeners,
    #[cfg(debug_assertions)]
    debug_mutation_count: u64,
}

impl Default for TextEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default(), Box::new(Monospace::default()))
    }
}

impl TextEngine {
    /// Creates an empty engine and lays it out for the default viewport.
    pub fn new(config: EngineConfig, metrics: Box<dyn CharWidth>) -> Self {
        let config = config.normalized();
        let mut engine = Self {
            buffer: GapBuffer::new(),
            metrics,
            params: WrapParams {
                word_wrap: config.options.word_wrap,
                wrap_width: 0,
                tab_width: 1,
                tab_columns: config.tab_columns,
            },
            config,
            viewport: Viewport::default(),
            bar_width: 0,
            rows: RowCache::new(),
            cursor: Cursor::default(),
            anchor: Cursor::default(),
            pref_col: None,
            selection: None,
            highlight: None,
            modified: false,
            needs_recompute: true,
            listeners: Listeners::default(),
            #[cfg(debug_assertions)]
            debug_mutation_count: 0,
        };
        engine.layout();
        engine
    }

    /// Creates an engine holding `text`.
    pub fn with_text(config: EngineConfig, metrics: Box<dyn CharWidth>, text: &str) -> Self {
        let mut engine = Self::new(config, metrics);
        engine.set_text(text.as_bytes());
        engine
    }

    /// Read-only wrap-aware view of the current text.
    #[inline]
    pub fn view(&self) -> TextLayout<'_> {
        TextLayout::new(&self.buffer, self.metrics.as_ref(), self.params, &self.config.delimiters)
    }

    /// Runs `f` on the row cache with a view of the text.
    pub(crate) fn with_rows<R>(&mut self, f: impl FnOnce(&mut RowCache, &TextLayout<'_>) -> R) -> R {
        let mut rows = std::mem::take(&mut self.rows);
        let out = f(&mut rows, &self.view());
        self.rows = rows;
        out
    }

    pub fn add_listener(&mut self, listener: impl TextListener + 'static) {
        self.listeners.add(Box::new(listener));
    }

    pub(crate) fn emit(&mut self, event: TextEvent) {
        self.listeners.emit(&event);
    }

    // ==================== Layout ====================

    /// Resolves wrap settings against the metrics and viewport and refills the
    /// row cache, recounting row totals when anything they depend on changed.
    pub fn layout(&mut self) {
        let metrics = self.metrics.as_ref();
        let margins = self.config.margins;
        let line_height = metrics.line_height().max(1);
        let cell = metrics.average_width().max(1);

        let bar_width = self.config.bar_columns * metrics.char_width('8');
        let wrap_width = if self.config.options.fixed_wrap {
            self.config.wrap_columns * metrics.char_width('x')
        } else {
            let width = self
                .viewport
                .width
                .saturating_sub(bar_width + margins.left + margins.right);
            if metrics.is_monospace() {
                cell * (width / cell)
            } else {
                width
            }
        };
        let params = WrapParams {
            word_wrap: self.config.options.word_wrap,
            wrap_width,
            tab_width: (self.config.tab_columns * metrics.char_width(' ')).max(1),
            tab_columns: self.config.tab_columns,
        };
        if params != self.params {
            self.needs_recompute = true;
        }
        self.params = params;
        self.bar_width = bar_width;

        let text_height = self.viewport.height.saturating_sub(margins.top + margins.bottom);
        let nvis = ((text_height + 2 * line_height - 1) / line_height).max(1);

        if self.needs_recompute {
            self.with_rows(|rows, view| rows.recompute(view));
            self.needs_recompute = false;
        }
        self.with_rows(|rows, view| rows.resize(view, nvis));

        self.cursor = self.locate(self.cursor.pos);
        self.anchor = self.locate(self.anchor.pos);

        debug!(
            nrows = self.rows.nrows,
            nvis,
            wrap_width,
            top_row = self.rows.top_row,
            "layout"
        );
    }

    /// Cursor value for `pos`, with row and column recomputed.
    pub(crate) fn locate(&self, pos: usize) -> Cursor {
        let view = self.view();
        let pos = self.buffer.valid_pos(pos);
        let start = view.row_start(pos);
        let col = view.column_from_pos(start, pos);
        Cursor {
            pos,
            row: self.rows.row_from_pos(&view, start),
            col,
            vcol: col,
        }
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        if self.viewport != viewport {
            self.viewport = viewport;
            self.layout();
        }
    }

    pub fn set_metrics(&mut self, metrics: Box<dyn CharWidth>) {
        self.metrics = metrics;
        self.needs_recompute = true;
        self.layout();
    }

    pub fn set_wrap_columns(&mut self, columns: usize) {
        self.config.wrap_columns = columns.max(1);
        self.layout();
    }

    pub fn set_tab_columns(&mut self, columns: usize) {
        self.config.tab_columns = columns.clamp(1, MAX_TAB_COLUMNS);
        self.needs_recompute = true;
        self.layout();
    }

    pub fn set_bar_columns(&mut self, columns: usize) {
        self.config.bar_columns = columns;
        self.layout();
    }

    pub fn set_margins(&mut self, margins: Margins) {
        self.config.margins = margins;
        self.layout();
    }

    pub fn set_options(&mut self, options: TextOptions) {
        self.config.options = options;
        self.layout();
    }

    pub fn set_selection_policy(&mut self, policy: SelectionPolicy) {
        self.config.selection_policy = policy;
    }

    pub fn set_delimiters(&mut self, delimiters: &str) {
        self.config.delimiters = delimiters.to_string();
    }

    /// Turns the parallel style buffer on or off.
    pub fn set_styled(&mut self, styled: bool) {
        self.buffer.set_styled(styled);
    }

    // ==================== Accessors ====================

    #[inline]
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn options(&self) -> TextOptions {
        self.config.options
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn buffer(&self) -> &GapBuffer {
        &self.buffer
    }

    pub fn is_styled(&self) -> bool {
        self.buffer.is_styled()
    }

    /// Whole text, lossily decoded.
    pub fn text(&self) -> String {
        self.buffer.to_string()
    }

    pub fn text_bytes(&self) -> Vec<u8> {
        self.buffer.to_vec()
    }

    /// Total rows, counting a trailing empty row.
    pub fn row_count(&self) -> usize {
        self.rows.nrows
    }

    pub fn line_count(&self) -> usize {
        self.view().count_lines(0, self.len() + 1)
    }

    /// Rows held by the visible-row cache.
    pub fn visible_rows(&self) -> usize {
        self.rows.nvisrows()
    }

    /// Start positions of the visible rows, plus the end of the last one.
    pub fn visible_row_starts(&self) -> &[usize] {
        self.rows.visrows()
    }

    pub fn top_row(&self) -> usize {
        self.rows.top_row
    }

    pub fn row_cache(&self) -> &RowCache {
        &self.rows
    }

    /// Width of the whole text plus margins and bar.
    pub fn content_width(&self) -> usize {
        let m = self.config.margins;
        m.left + m.right + self.bar_width + self.rows.text_width
    }

    pub fn content_height(&self) -> usize {
        let m = self.config.margins;
        m.top + m.bottom + self.rows.text_height
    }

    pub fn wrap_width(&self) -> usize {
        self.params.wrap_width
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn set_modified(&mut self, modified: bool) {
        self.modified = modified;
    }

    // ==================== Queries ====================

    pub fn row_from_pos(&self, pos: usize) -> usize {
        let view = self.view();
        self.rows.row_from_pos(&view, pos.min(self.len()))
    }

    pub fn pos_from_row(&self, row: usize) -> usize {
        self.rows.pos_from_row(&self.view(), row)
    }

    pub fn column_from_pos(&self, start: usize, pos: usize) -> usize {
        self.view().column_from_pos(start, pos)
    }

    pub fn pos_from_column(&self, start: usize, col: usize) -> usize {
        self.view().pos_from_column(start, col)
    }

    pub fn row_start(&self, pos: usize) -> usize {
        self.view().row_start(pos)
    }

    pub fn row_end(&self, pos: usize) -> usize {
        self.view().row_end(pos)
    }

    pub fn next_row(&self, pos: usize, n: usize) -> usize {
        self.view().next_row(pos, n)
    }

    pub fn prev_row(&self, pos: usize, n: usize) -> usize {
        self.view().prev_row(pos, n)
    }

    pub fn line_start(&self, pos: usize) -> usize {
        self.view().line_start(pos)
    }

    pub fn line_end(&self, pos: usize) -> usize {
        self.view().line_end(pos)
    }

    pub fn next_line(&self, pos: usize, n: usize) -> usize {
        self.view().next_line(pos, n)
    }

    pub fn prev_line(&self, pos: usize, n: usize) -> usize {
        self.view().prev_line(pos, n)
    }

    pub fn left_word(&self, pos: usize) -> usize {
        self.view().left_word(pos)
    }

    pub fn right_word(&self, pos: usize) -> usize {
        self.view().right_word(pos)
    }

    pub fn word_start(&self, pos: usize) -> usize {
        self.view().word_start(pos)
    }

    pub fn word_end(&self, pos: usize) -> usize {
        self.view().word_end(pos)
    }

    pub fn count_rows(&self, start: usize, end: usize) -> usize {
        self.view().count_rows(start, end)
    }

    pub fn measure_text(&self, start: usize, end: usize) -> Extent {
        self.view().measure_text(start, end)
    }

    pub fn find_matching(&self, pos: usize, beg: usize, end: usize, ch: char, level: usize) -> Option<usize> {
        self.view().find_matching(pos, beg, end, ch, level)
    }

    pub fn valid_pos(&self, pos: usize) -> usize {
        self.buffer.valid_pos(pos)
    }

    pub fn inc(&self, pos: usize) -> usize {
        self.buffer.inc(pos)
    }

    pub fn dec(&self, pos: usize) -> usize {
        self.buffer.dec(pos)
    }

    pub fn byte_at(&self, pos: usize) -> u8 {
        self.buffer.byte_at(pos)
    }

    pub fn char_at(&self, pos: usize) -> char {
        self.buffer.char_at(pos)
    }

    // ==================== Validation ====================

    /// Checks that `[pos, pos + n)` lies inside the text.
    pub(crate) fn check_range(&self, op: &'static str, pos: usize, n: usize) -> Result<()> {
        let len = self.len();
        if pos > len || n > len - pos {
            warn!(op, pos, n, len, "rejected out-of-range text operation");
            return Err(EngineError::OutOfRange {
                op,
                pos,
                length: n,
                len,
            });
        }
        Ok(())
    }

    // ==================== Mutation primitive ====================

    /// Replaces `m` bytes at `pos` with `ins` and repairs all derived state.
    ///
    /// The caller has validated the range.
    pub(crate) fn replace(&mut self, pos: usize, m: usize, ins: &[u8], style: u8) {
        let n = ins.len();
        let delta = n as isize - m as isize;

        let (wbeg, wend, before) = {
            let view = self.view();
            let wbeg = view.change_beg(pos);
            let wend = view.change_end(pos + m);
            (wbeg, wend, view.measure_text(wbeg, wend))
        };
        trace!(pos, m, n, wbeg, wend, rows = before.rows, "replace");

        self.buffer.replace(pos, m, ins, style);

        let wend_after = (wend as isize + delta) as usize;
        let after = self.view().measure_text(wbeg, wend_after);
        let ncdel = wend - wbeg;
        let ncins = wend_after - wbeg;

        self.rows.nrows = self.rows.nrows + after.rows - before.rows;
        self.with_rows(|rows, view| {
            rows.apply_mutation(view, wbeg, ncins, ncdel, after.rows, before.rows)
        });
        self.rows.text_height = (self.rows.text_height + after.height).saturating_sub(before.height);
        self.rows.text_width = self.rows.text_width.max(after.width);

        let policy = self.config.selection_policy;
        adjust_for_edit(&mut self.selection, pos, m, n, policy);
        adjust_for_edit(&mut self.highlight, pos, m, n, policy);

        let row_delta = after.rows as isize - before.rows as isize;
        let edit = EditSpan {
            wbeg,
            wend,
            pos,
            m,
            n,
            row_delta,
        };
        self.anchor = self.repair_cursor(self.anchor, &edit);
        self.cursor = self.repair_cursor(self.cursor, &edit);

        self.pref_col = None;
        self.modified = true;
        self.assert_layout_consistent();
    }

    /// Moves a cursor to where its text went after an edit.
    fn repair_cursor(&self, mut c: Cursor, edit: &EditSpan) -> Cursor {
        let delta = edit.n as isize - edit.m as isize;
        if edit.wend <= c.pos {
            c.pos = (c.pos as isize + delta) as usize;
            c.row = (c.row as isize + edit.row_delta).max(0) as usize;
        } else if edit.wbeg <= c.pos {
            if edit.pos + edit.m <= c.pos {
                c.pos = (c.pos as isize + delta) as usize;
            } else if edit.pos <= c.pos {
                c.pos = edit.pos + edit.n;
            }
            c = self.locate(c.pos);
        }
        c
    }

    #[cfg(debug_assertions)]
    fn assert_layout_consistent(&mut self) {
        self.debug_mutation_count += 1;
        if self.debug_mutation_count % 64 != 0 {
            return;
        }
        let len = self.len();
        if let Err(msg) = self.rows.check(len) {
            panic!(
                "row cache drift detected after {} mutations: {msg}",
                self.debug_mutation_count
            );
        }
        assert!(
            self.cursor.pos <= len && self.anchor.pos <= len,
            "cursor {:?} or anchor {:?} past length {len}",
            self.cursor,
            self.anchor,
        );
    }

    #[cfg(not(debug_assertions))]
    fn assert_layout_consistent(&mut self) {}

    // ==================== Text mutation API ====================

    /// Replaces the whole text; resets cursor, selection and scroll position.
    pub fn set_text(&mut self, text: &[u8]) -> usize {
        self.set_styled_text(text, 0)
    }

    pub fn set_styled_text(&mut self, text: &[u8], style: u8) -> usize {
        let deleted = self.buffer.to_vec();
        self.buffer.set_content(text, Some(style));
        self.rows.reset();
        self.cursor = Cursor::default();
        self.anchor = Cursor::default();
        self.pref_col = None;
        self.selection = None;
        self.highlight = None;
        self.modified = false;
        self.needs_recompute = true;
        self.layout();
        self.emit(TextEvent::Inserted(TextChange {
            pos: 0,
            deleted,
            inserted: text.to_vec(),
        }));
        self.emit(TextEvent::Changed { cursor: 0 });
        text.len()
    }

    pub fn replace_text(&mut self, pos: usize, m: usize, text: &[u8]) -> Result<usize> {
        self.replace_styled_text(pos, m, text, 0)
    }

    pub fn replace_styled_text(&mut self, pos: usize, m: usize, text: &[u8], style: u8) -> Result<usize> {
        self.check_range("replace_text", pos, m)?;
        let deleted = self.buffer.extract(pos, m);
        self.replace(pos, m, text, style);
        self.emit(TextEvent::Replaced(TextChange {
            pos,
            deleted,
            inserted: text.to_vec(),
        }));
        self.emit(TextEvent::Changed { cursor: self.cursor.pos });
        Ok(text.len())
    }

    pub fn insert_text(&mut self, pos: usize, text: &[u8]) -> Result<usize> {
        self.insert_styled_text(pos, text, 0)
    }

    pub fn insert_styled_text(&mut self, pos: usize, text: &[u8], style: u8) -> Result<usize> {
        self.check_range("insert_text", pos, 0)?;
        self.replace(pos, 0, text, style);
        self.emit(TextEvent::Inserted(TextChange {
            pos,
            deleted: Vec::new(),
            inserted: text.to_vec(),
        }));
        self.emit(TextEvent::Changed { cursor: self.cursor.pos });
        Ok(text.len())
    }

    pub fn append_text(&mut self, text: &[u8]) -> Result<usize> {
        self.append_styled_text(text, 0)
    }

    pub fn append_styled_text(&mut self, text: &[u8], style: u8) -> Result<usize> {
        let pos = self.len();
        self.insert_styled_text(pos, text, style)
    }

    /// Removes `n` bytes at `pos`. Returns 0, the number of bytes inserted.
    pub fn remove_text(&mut self, pos: usize, n: usize) -> Result<usize> {
        self.check_range("remove_text", pos, n)?;
        let deleted = self.buffer.extract(pos, n);
        self.replace(pos, n, &[], 0);
        self.emit(TextEvent::Deleted(TextChange {
            pos,
            deleted,
            inserted: Vec::new(),
        }));
        self.emit(TextEvent::Changed { cursor: self.cursor.pos });
        Ok(0)
    }

    pub fn clear_text(&mut self) -> Result<usize> {
        self.remove_text(0, self.len())
    }

    /// Sets the style of `n` bytes at `pos`. No-op on unstyled text.
    pub fn change_style(&mut self, pos: usize, n: usize, style: u8) -> Result<usize> {
        self.check_range("change_style", pos, n)?;
        self.buffer.fill_styles(pos, n, style);
        Ok(n)
    }

    /// Copies `styles` over the style bytes starting at `pos`.
    pub fn change_styles(&mut self, pos: usize, styles: &[u8]) -> Result<usize> {
        self.check_range("change_styles", pos, styles.len())?;
        self.buffer.copy_styles(pos, styles);
        Ok(styles.len())
    }

    pub fn extract_text(&self, pos: usize, n: usize) -> Result<Vec<u8>> {
        self.check_range("extract_text", pos, n)?;
        Ok(self.buffer.extract(pos, n))
    }

    /// Style bytes of `[pos, pos + n)`, or `None` on unstyled text.
    pub fn extract_style(&self, pos: usize, n: usize) -> Result<Option<Vec<u8>>> {
        self.check_range("extract_style", pos, n)?;
        Ok(self.buffer.extract_styles(pos, n))
    }
}

/// Extent of one edit, for cursor repair.
struct EditSpan {
    wbeg: usize,
    wend: usize,
    pos: usize,
    m: usize,
    n: usize,
    row_delta: isize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn engine(text: &str) -> TextEngine {
        TextEngine::with_text(EngineConfig::default(), Box::new(Monospace::default()), text)
    }

    fn wrapped(text: &str, width: usize) -> TextEngine {
        let mut config = EngineConfig::default();
        config.options.word_wrap = true;
        let mut engine = TextEngine::with_text(config, Box::new(Monospace::default()), text);
        engine.set_viewport(Viewport::new(width, 4));
        engine
    }

    /// Row totals and window recomputed from scratch.
    fn rebuilt(engine: &TextEngine) -> RowCache {
        engine.rows.rebuilt(&engine.view())
    }

    // ==================== Layout ====================

    #[test]
    fn test_layout_sizes_window_from_viewport() {
        let mut e = engine("a\nb\nc");
        e.set_viewport(Viewport::new(40, 10));
        assert_eq!(e.visible_rows(), 11);
        assert_eq!(e.row_count(), 3);
        assert_eq!(e.wrap_width(), 40);
    }

    #[test]
    fn test_fixed_wrap_uses_wrap_columns() {
        let mut config = EngineConfig::default();
        config.options.word_wrap = true;
        config.options.fixed_wrap = true;
        config.wrap_columns = 10;
        let e = TextEngine::with_text(config, Box::new(Monospace::default()), "the quick fox");
        assert_eq!(e.wrap_width(), 10);
        assert_eq!(e.row_count(), 2);
        assert_eq!(e.pos_from_row(1), 10);
    }

    #[test]
    fn test_narrowing_viewport_rewraps() {
        let mut e = wrapped("aaaa bbbb cccc", 20);
        assert_eq!(e.row_count(), 1);
        e.set_viewport(Viewport::new(5, 4));
        assert_eq!(e.row_count(), 3);
        assert_eq!(&e.visible_row_starts()[..4], &[0, 5, 10, 14]);
    }

    // ==================== Replace ====================

    #[test]
    fn test_insert_updates_rows_and_content() {
        let mut e = engine("AB");
        assert_eq!(e.insert_text(1, b"X\nY").unwrap(), 3);
        assert_eq!(e.text(), "AX\nYB");
        assert_eq!(e.row_count(), 2);
        assert_eq!(e.rows.visrows(), rebuilt(&e).visrows());
        assert!(e.is_modified());
    }

    #[test]
    fn test_replace_extracts_inserted_text() {
        let mut e = engine("hello world");
        e.replace_text(6, 5, "wörld!".as_bytes()).unwrap();
        assert_eq!(e.len(), 11 - 5 + 7);
        assert_eq!(e.extract_text(6, 7).unwrap(), "wörld!".as_bytes());
    }

    #[test]
    fn test_out_of_range_is_rejected_untouched() {
        let mut e = engine("abc");
        let err = e.remove_text(2, 5).unwrap_err();
        assert!(matches!(err, EngineError::OutOfRange { op: "remove_text", .. }));
        assert_eq!(e.text(), "abc");
        assert!(e.insert_text(4, b"x").is_err());
        assert!(e.extract_text(1, 3).is_err());
        assert!(!e.is_modified());
    }

    #[test]
    fn test_wrapped_edit_rewraps_previous_row() {
        let mut e = wrapped("aaaa bbbb cccc", 5);
        assert_eq!(e.row_count(), 3);
        // Shrinking the second word lets nothing move up, but deleting it does
        e.remove_text(5, 5).unwrap();
        assert_eq!(e.text(), "aaaa cccc");
        assert_eq!(e.row_count(), 2);
        assert_eq!(e.rows.visrows(), rebuilt(&e).visrows());
        assert_eq!(e.rows.nrows, rebuilt(&e).nrows);
    }

    #[test]
    fn test_cursor_after_edit_shifts() {
        let mut e = engine("ab\ncd\nef");
        e.set_cursor_pos(7);
        e.insert_text(0, b"xx\n").unwrap();
        assert_eq!(e.cursor().pos, 10);
        assert_eq!(e.cursor().row, 3);
        assert_eq!(e.cursor().col, 1);
    }

    #[test]
    fn test_cursor_inside_deleted_span_collapses() {
        let mut e = engine("abcdef");
        e.set_cursor_pos(3);
        e.remove_text(1, 4).unwrap();
        assert_eq!(e.cursor().pos, 1);
        assert_eq!(e.cursor().col, 1);
    }

    // ==================== Notifications ====================

    #[test]
    fn test_events_carry_displaced_bytes() {
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        let mut e = engine("abc");
        e.add_listener(move |event: &TextEvent| sink.borrow_mut().push(event.clone()));
        e.replace_text(1, 1, b"XY").unwrap();
        e.remove_text(0, 1).unwrap();
        let events = events.borrow();
        assert_eq!(
            events[0],
            TextEvent::Replaced(TextChange {
                pos: 1,
                deleted: b"b".to_vec(),
                inserted: b"XY".to_vec(),
            })
        );
        assert!(matches!(events[1], TextEvent::Changed { .. }));
        assert_eq!(
            events[2],
            TextEvent::Deleted(TextChange {
                pos: 0,
                deleted: b"a".to_vec(),
                inserted: Vec::new(),
            })
        );
    }

    #[test]
    fn test_set_text_resets_state() {
        let mut e = engine("abc\ndef");
        e.set_cursor_pos(5);
        e.set_selection(1, 3);
        e.set_text(b"xyz");
        assert_eq!(e.cursor(), Cursor::default());
        assert_eq!(e.selection(), None);
        assert_eq!(e.row_count(), 1);
        assert!(!e.is_modified());
    }

    // ==================== Styles ====================

    #[test]
    fn test_styles_follow_edits() {
        let mut e = engine("");
        e.set_styled(true);
        e.set_styled_text(b"abcd", 1);
        e.insert_styled_text(2, b"XY", 5).unwrap();
        e.change_style(0, 1, 9).unwrap();
        assert_eq!(e.extract_style(0, 6).unwrap(), Some(vec![9, 1, 5, 5, 1, 1]));
        assert!(e.change_styles(5, &[1, 2]).is_err());
    }
}
