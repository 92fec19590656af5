// Chunk: docs/chunks/column_blocks - Tab expansion and rectangular column edits

//! Rectangular column edits, re-indentation and case changes.
//!
//! A block operation extracts the lines `[start, end)`, expands their tabs,
//! rewrites the requested columns of every line and compresses runs of spaces
//! back into tabs unless `no_tabs` is set. The result replaces the lines in a
//! single edit.

use lite_text_buffer::columns::{
    extract_columns, insert_columns, overstrike_columns, remove_columns, replace_columns,
};
use lite_text_buffer::tabs::{count_bytes, detab, entab, max_columns, tabbify};
use lite_text_buffer::utf8_len;

use crate::error::Result;
use crate::metrics::column_advance;
use crate::text_engine::TextEngine;

/// Sizes of a detabbed block source, for output capacity estimates.
struct BlockSource {
    text: Vec<u8>,
    rows: usize,
    tabs: usize,
}

impl TextEngine {
    /// Lines `[start, end)` with tabs expanded.
    fn block_source(&self, start: usize, end: usize) -> BlockSource {
        let raw = self.buffer.extract(start, end - start);
        BlockSource {
            rows: count_bytes(&raw, b'\n') + 1,
            tabs: count_bytes(&raw, b'\t'),
            text: detab(&raw, self.config.tab_columns),
        }
    }

    /// Compresses spaces back into tabs unless tabs are disabled.
    fn retab(&self, text: Vec<u8>) -> Vec<u8> {
        if self.config.options.no_tabs {
            text
        } else {
            entab(&text, self.config.tab_columns)
        }
    }

    /// Worst-case size of a block rewrite that inserts `ins`.
    fn block_capacity(&self, org: &BlockSource, ins: &[u8], startcol: usize) -> usize {
        let tab_columns = self.config.tab_columns;
        let ins_rows = count_bytes(ins, b'\n') + 1;
        let ins_tabs = count_bytes(ins, b'\t');
        let ins_cols = max_columns(ins, tab_columns);
        org.text.len()
            + ins.len()
            + (org.tabs + ins_tabs) * tab_columns
            + (startcol + ins_cols + 1) * org.rows.max(ins_rows)
    }

    // ==================== Block edits ====================

    /// Columns `[startcol, endcol)` of the lines in `[start, end)`.
    ///
    /// A line shorter than `startcol` yields just its newline.
    pub fn extract_text_block(&self, start: usize, end: usize, startcol: usize, endcol: usize) -> Result<Vec<u8>> {
        if start >= end || startcol > endcol {
            return Ok(Vec::new());
        }
        self.check_range("extract_text_block", start, end - start)?;
        let org = self.block_source(start, end);
        Ok(self.retab(extract_columns(&org.text, startcol, endcol)))
    }

    /// Removes columns `[startcol, endcol)` from the lines in `[start, end)`.
    ///
    /// Returns the length of the rewritten lines.
    pub fn remove_text_block(&mut self, start: usize, end: usize, startcol: usize, endcol: usize) -> Result<usize> {
        if start > end || startcol > endcol {
            return Ok(0);
        }
        self.check_range("remove_text_block", start, end - start)?;
        let org = self.block_source(start, end);
        let rep = self.retab(remove_columns(&org.text, startcol, endcol));
        self.replace_styled_text(start, end - start, &rep, 0)
    }

    /// Replaces columns `[startcol, endcol)` of each line with successive lines
    /// of `text`. Extra lines of `text` become new lines padded to `startcol`.
    pub fn replace_text_block(
        &mut self,
        start: usize,
        end: usize,
        startcol: usize,
        endcol: usize,
        text: &[u8],
    ) -> Result<usize> {
        self.replace_styled_text_block(start, end, startcol, endcol, text, 0)
    }

    pub fn replace_styled_text_block(
        &mut self,
        start: usize,
        end: usize,
        startcol: usize,
        endcol: usize,
        text: &[u8],
        style: u8,
    ) -> Result<usize> {
        if start > end || startcol > endcol {
            return Ok(0);
        }
        self.check_range("replace_text_block", start, end - start)?;
        let tab_columns = self.config.tab_columns;
        let org = self.block_source(start, end);
        let capacity = self.block_capacity(&org, text, startcol);
        let ins = detab(text, tab_columns);
        let ins_cols = max_columns(text, tab_columns);
        let rep = replace_columns(&org.text, &ins, startcol, endcol, ins_cols, capacity);
        let rep = self.retab(rep);
        self.replace_styled_text(start, end - start, &rep, style)
    }

    /// Overwrites each line from `startcol` with successive lines of `text`.
    pub fn overstrike_text_block(
        &mut self,
        start: usize,
        end: usize,
        startcol: usize,
        endcol: usize,
        text: &[u8],
    ) -> Result<usize> {
        self.overstrike_styled_text_block(start, end, startcol, endcol, text, 0)
    }

    pub fn overstrike_styled_text_block(
        &mut self,
        start: usize,
        end: usize,
        startcol: usize,
        endcol: usize,
        text: &[u8],
        style: u8,
    ) -> Result<usize> {
        if start > end || startcol > endcol {
            return Ok(0);
        }
        self.check_range("overstrike_text_block", start, end - start)?;
        let org = self.block_source(start, end);
        let capacity = self.block_capacity(&org, text, startcol);
        let ovr = detab(text, self.config.tab_columns);
        let rep = self.retab(overstrike_columns(&org.text, &ovr, startcol, capacity));
        self.replace_styled_text(start, end - start, &rep, style)
    }

    /// Inserts the first line of `text` at column `startcol` of every line in
    /// `[start, end)`.
    pub fn insert_text_block(&mut self, start: usize, end: usize, startcol: usize, text: &[u8]) -> Result<usize> {
        if start > end {
            return Ok(0);
        }
        self.check_range("insert_text_block", start, end - start)?;
        let tab_columns = self.config.tab_columns;
        let org = self.block_source(start, end);
        let capacity = self.block_capacity(&org, text, startcol);
        let ins = detab(text, tab_columns);
        let ins_cols = max_columns(text, tab_columns);
        let rep = self.retab(insert_columns(&org.text, &ins, startcol, ins_cols, capacity));
        self.replace_text(start, end - start, &rep)
    }

    // ==================== Line transforms ====================

    /// Re-indents the lines in `[start, end)` by `shift` columns.
    ///
    /// Text never moves left of column zero. A zero shift just normalizes the
    /// leading whitespace to the tab setting.
    pub fn shift_text(&mut self, start: usize, end: usize, shift: isize) -> Result<usize> {
        if start >= end {
            return Ok(0);
        }
        self.check_range("shift_text", start, end - start)?;
        let org = self.buffer.extract(start, end - start);
        let rep = tabbify(&org, self.config.tab_columns, 0, 0, shift, !self.config.options.no_tabs);
        self.replace_text(start, end - start, &rep)
    }

    /// Upper- or lowercases `[start, end)`. Returns the length of the new text.
    pub fn case_shift(&mut self, start: usize, end: usize, upper: bool) -> Result<usize> {
        if start >= end {
            return Ok(0);
        }
        self.check_range("case_shift", start, end - start)?;
        let org = self.buffer.extract(start, end - start);
        let rep = match std::str::from_utf8(&org) {
            Ok(s) if upper => s.to_uppercase().into_bytes(),
            Ok(s) => s.to_lowercase().into_bytes(),
            Err(_) if upper => org.to_ascii_uppercase(),
            Err(_) => org.to_ascii_lowercase(),
        };
        self.replace_text(start, end - start, &rep)?;
        Ok(rep.len())
    }

    /// End of the text an overstrike of `text` at `start` replaces.
    ///
    /// Covers the characters whose columns the new text occupies, stopping at end
    /// of line. Text containing a newline replaces only `[start, end)`.
    pub fn overstruck(&self, start: usize, end: usize, text: &[u8]) -> usize {
        if text.contains(&b'\n') {
            return end;
        }
        let tab_columns = self.config.tab_columns;
        let view = self.view();
        let start_col = view.column_from_pos(view.line_start(start), start);

        let mut new_col = start_col;
        let mut i = 0;
        while i < text.len() {
            new_col += column_advance(text[i], new_col, tab_columns);
            i += utf8_len(text[i]);
        }

        let len = self.len();
        let mut old_col = start_col;
        let mut p = start;
        while p < len {
            let byte = self.buffer.byte_at(p);
            if byte == b'\n' {
                break;
            }
            old_col += column_advance(byte, old_col, tab_columns);
            if old_col >= new_col {
                if old_col == new_col {
                    p = self.buffer.inc(p);
                }
                break;
            }
            p = self.buffer.inc(p);
        }
        p
    }
}
