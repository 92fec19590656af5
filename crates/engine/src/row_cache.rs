// Chunk: docs/chunks/text_engine - Editable-text engine for a multi-line text widget
//!
//! Visible-row cache with incremental repair.
//!
//! The cache remembers where each visible row starts, plus the row totals for the
//! whole text. After an edit only the rows the edit touched are re-wrapped; every
//! other entry is shifted by the byte and row deltas. Queries outside the window
//! fall back to counting from the nearest cache edge.
//!
//! ```text
//! visrows[0]        top_pos, first visible row (row number top_row)
//! visrows[i]        start of visible row i
//! visrows[nvis]     just past the last visible row
//! entries past the end of text are clamped to len
//! ```

use tracing::trace;

use crate::config::INITIAL_VISIBLE_ROWS;
use crate::wrap::TextLayout;

/// Row starts of the visible window plus whole-text row totals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowCache {
    visrows: Vec<usize>,
    /// Row number of `visrows[0]`.
    pub(crate) top_row: usize,
    /// Position of the first visible row.
    pub(crate) top_pos: usize,
    /// Position the window tries to keep on top across a full recompute.
    pub(crate) keep_pos: usize,
    /// Total rows, counting a trailing empty row.
    pub(crate) nrows: usize,
    pub(crate) text_width: usize,
    pub(crate) text_height: usize,
}

impl Default for RowCache {
    fn default() -> Self {
        Self::new()
    }
}

impl RowCache {
    pub fn new() -> Self {
        Self {
            visrows: vec![0; INITIAL_VISIBLE_ROWS + 1],
            top_row: 0,
            top_pos: 0,
            keep_pos: 0,
            nrows: 1,
            text_width: 0,
            text_height: 0,
        }
    }

    /// Number of cached visible rows.
    #[inline]
    pub fn nvisrows(&self) -> usize {
        self.visrows.len() - 1
    }

    #[inline]
    pub fn visrows(&self) -> &[usize] {
        &self.visrows
    }

    #[inline]
    pub fn top_row(&self) -> usize {
        self.top_row
    }

    #[inline]
    pub fn top_pos(&self) -> usize {
        self.top_pos
    }

    #[inline]
    pub fn nrows(&self) -> usize {
        self.nrows
    }

    /// Scrolls back to the top of the text.
    pub fn reset(&mut self) {
        self.top_row = 0;
        self.top_pos = 0;
        self.keep_pos = 0;
    }

    /// Sets the position a full recompute keeps on top.
    pub fn keep(&mut self, pos: usize) {
        self.keep_pos = pos;
    }

    /// Re-wraps `visrows[start..=end]` from the entry before `start`.
    pub fn calc_vis_rows(&mut self, layout: &TextLayout<'_>, start: usize, end: usize) {
        let nvis = self.nvisrows();
        let len = layout.len();
        let mut start = start.min(nvis);
        let end = end.min(nvis);
        if start > end {
            return;
        }
        if start == 0 {
            self.visrows[0] = self.top_pos;
            start = 1;
        }
        let mut pos = self.visrows[start - 1];
        while start <= end && pos < len {
            pos = if layout.params().word_wrap {
                layout.wrap(pos)
            } else {
                layout.next_line(pos, 1)
            };
            self.visrows[start] = pos;
            start += 1;
        }
        while start <= end {
            self.visrows[start] = len;
            start += 1;
        }
    }

    /// Recounts every row total from scratch, keeping `keep_pos` on top.
    pub fn recompute(&mut self, layout: &TextLayout<'_>) {
        let len = layout.len();
        self.keep_pos = self.keep_pos.min(len);
        self.top_pos = layout.row_start(self.keep_pos);
        let above = layout.measure_text(0, self.top_pos);
        let below = layout.measure_text(self.top_pos, len + 1);
        self.top_row = above.rows;
        self.nrows = above.rows + below.rows;
        self.text_width = above.width.max(below.width);
        self.text_height = above.height + below.height;
    }

    /// Resizes the window to `nvis` rows and refills it.
    pub fn resize(&mut self, layout: &TextLayout<'_>, nvis: usize) {
        let nvis = nvis.max(1);
        self.visrows.resize(nvis + 1, 0);
        self.calc_vis_rows(layout, 0, nvis);
    }

    // ==================== Queries ====================

    /// Row number of the row containing `pos`.
    pub fn row_from_pos(&self, layout: &TextLayout<'_>, pos: usize) -> usize {
        let nvis = self.nvisrows();
        let v = &self.visrows;
        if pos >= layout.len() {
            return self.nrows.saturating_sub(1);
        }
        if pos < v[0] {
            if pos == 0 {
                return 0;
            }
            return self
                .top_row
                .saturating_sub(layout.count_rows(layout.row_start(pos), v[0]));
        }
        if v[nvis - 1] <= pos && v[nvis - 1] < v[nvis] {
            return self.top_row + nvis - 1 + layout.count_rows(v[nvis - 1], layout.row_start(pos));
        }
        let mut row = 0;
        while row + 1 < nvis && v[row + 1] <= pos && v[row] < v[row + 1] {
            row += 1;
        }
        self.top_row + row
    }

    /// Start position of row number `row`.
    pub fn pos_from_row(&self, layout: &TextLayout<'_>, row: usize) -> usize {
        let nvis = self.nvisrows();
        if row < self.top_row {
            return layout.prev_row(self.visrows[0], self.top_row - row);
        }
        if row >= self.top_row + nvis {
            if row >= self.nrows {
                return layout.len();
            }
            return layout.next_row(self.visrows[nvis - 1], row - self.top_row - nvis + 1);
        }
        self.visrows[row - self.top_row]
    }

    // ==================== Incremental repair ====================

    /// Index of the cached row holding `pos`, searched in the window alone.
    ///
    /// Runs of entries clamped to the same position resolve to the first of the
    /// run. Does not read the text, so it stays valid while the window still
    /// describes the text before an edit.
    fn window_row(&self, pos: usize) -> usize {
        let v = &self.visrows;
        let mut i = 0;
        while i < self.nvisrows() && v[i + 1] <= pos && v[i] < v[i + 1] {
            i += 1;
        }
        i
    }

    /// Repairs the window after the text between `pos` and `pos + ncdel` was
    /// re-laid out as `ncins` bytes.
    ///
    /// `nrdel` and `nrins` are the row counts of that span before and after the
    /// edit; `nrows` must already hold the new total.
    pub fn apply_mutation(
        &mut self,
        layout: &TextLayout<'_>,
        pos: usize,
        ncins: usize,
        ncdel: usize,
        nrins: usize,
        nrdel: usize,
    ) {
        let nvis = self.nvisrows();
        let len = layout.len();
        let ncdelta = ncins as isize - ncdel as isize;
        let nrdelta = nrins as isize - nrdel as isize;
        let shift = |p: usize| ((p as isize + ncdelta).max(0) as usize).min(len);

        trace!(
            pos, ncins, ncdel, nrins, nrdel,
            top_row = self.top_row, top_pos = self.top_pos,
            "row cache mutation"
        );

        if self.visrows[0] <= pos {
            // Edit starts inside the window, or below it
            if pos <= self.visrows[nvis] {
                let line = self.window_row(pos);
                if nrdelta > 0 {
                    let d = nrdelta as usize;
                    let mut i = nvis;
                    while i >= line + nrins {
                        self.visrows[i] = shift(self.visrows[i - d]);
                        if i == 0 {
                            break;
                        }
                        i -= 1;
                    }
                    self.calc_vis_rows(layout, line, line + nrins);
                } else if nrdelta < 0 {
                    let d = (-nrdelta) as usize;
                    for i in (line + nrdel)..=nvis {
                        self.visrows[i - d] = shift(self.visrows[i]);
                    }
                    self.calc_vis_rows(layout, line, line + nrins);
                    self.calc_vis_rows(layout, nvis.saturating_sub(d), nvis);
                } else {
                    for i in (line + nrdel)..=nvis {
                        self.visrows[i] = shift(self.visrows[i]);
                    }
                    self.calc_vis_rows(layout, line, line + nrins);
                }
            }
        } else if pos + ncdel < self.visrows[nvis] {
            // Edit starts above the window and ends before its bottom
            if self.visrows[0] < pos + ncdel {
                let line = self.window_row(pos + ncdel);
                if (line as isize) <= self.top_row as isize + nrdelta {
                    self.top_row = (self.top_row as isize + nrdelta) as usize;
                    self.top_pos = layout.prev_row(shift(self.visrows[line]), line);
                    self.keep_pos = self.top_pos;
                    for i in line..=nvis {
                        self.visrows[i] = shift(self.visrows[i]);
                    }
                    self.calc_vis_rows(layout, 0, line);
                } else {
                    self.top_row = 0;
                    self.top_pos = 0;
                    self.keep_pos = 0;
                    self.calc_vis_rows(layout, 0, nvis);
                }
            } else {
                self.top_row = (self.top_row as isize + nrdelta).max(0) as usize;
                self.top_pos = shift(self.top_pos);
                self.keep_pos = self.top_pos;
                for i in 0..=nvis {
                    self.visrows[i] = shift(self.visrows[i]);
                }
            }
        } else {
            // Edit covers the whole window
            let max_top = self.nrows.saturating_sub(nvis);
            self.top_row = self.top_row.min(max_top);
            self.top_pos = layout.next_row(0, self.top_row);
            self.keep_pos = self.top_pos;
            self.calc_vis_rows(layout, 0, nvis);
        }

        trace!(top_row = self.top_row, top_pos = self.top_pos, "row cache repaired");
    }

    // ==================== Scrolling ====================

    /// Scrolls so that row number `row` is the first visible row.
    ///
    /// Rows still on screen are shifted rather than re-wrapped.
    pub fn scroll_to_row(&mut self, layout: &TextLayout<'_>, row: usize) {
        let nvis = self.nvisrows();
        let old_top = self.top_row;
        if row < old_top {
            if row == 0 {
                self.top_pos = 0;
                self.top_row = 0;
            } else {
                self.top_pos = layout.prev_row(self.top_pos, old_top - row);
                self.top_row = row;
            }
            let delta = old_top - self.top_row;
            if delta < nvis {
                for i in (delta..=nvis).rev() {
                    self.visrows[i] = self.visrows[i - delta];
                }
                self.calc_vis_rows(layout, 0, delta);
            } else {
                self.calc_vis_rows(layout, 0, nvis);
            }
        } else if row > old_top {
            let last = self.nrows.saturating_sub(1);
            if row >= last {
                self.top_pos = layout.row_start(layout.len());
                self.top_row = last;
            } else {
                self.top_pos = layout.next_row(self.top_pos, row - old_top);
                self.top_row = row;
            }
            let delta = self.top_row - old_top;
            if delta < nvis {
                for i in 0..=(nvis - delta) {
                    self.visrows[i] = self.visrows[i + delta];
                }
                self.calc_vis_rows(layout, nvis - delta, nvis);
            } else {
                self.calc_vis_rows(layout, 0, nvis);
            }
        }
        self.keep_pos = self.top_pos;
    }

    /// Scrolls so that the row containing `pos` is the first visible row.
    pub fn scroll_to_pos(&mut self, layout: &TextLayout<'_>, pos: usize) {
        let row = self.row_from_pos(layout, layout.row_start(pos));
        self.scroll_to_row(layout, row);
    }

    // ==================== Invariants ====================

    /// Checks entries are monotone, bounded by `len`, and start at `top_pos`.
    pub fn check(&self, len: usize) -> Result<(), String> {
        if self.visrows[0] != self.top_pos {
            return Err(format!(
                "visrows[0] = {} but top_pos = {}",
                self.visrows[0], self.top_pos
            ));
        }
        for (i, pair) in self.visrows.windows(2).enumerate() {
            if pair[0] > pair[1] {
                return Err(format!("visrows not monotone at {i}: {:?}", self.visrows));
            }
        }
        if let Some(&last) = self.visrows.last() {
            if last > len {
                return Err(format!("visrows end {last} past length {len}"));
            }
        }
        if self.top_row >= self.nrows.max(1) {
            return Err(format!("top_row {} >= nrows {}", self.top_row, self.nrows));
        }
        Ok(())
    }

    /// Rebuilds the window and totals from scratch with the same top position.
    pub fn rebuilt(&self, layout: &TextLayout<'_>) -> RowCache {
        let mut fresh = RowCache {
            visrows: vec![0; self.visrows.len()],
            keep_pos: self.top_pos,
            ..RowCache::new()
        };
        fresh.recompute(layout);
        fresh.calc_vis_rows(layout, 0, fresh.nvisrows());
        fresh
    }
}
