// Chunk: docs/chunks/byte_gap_buffer - UTF-8 byte gap buffer with parallel style bytes

//! Gap buffer implementation over UTF-8 bytes.
//!
//! The buffer stores text bytes with a movable "gap" - an unused region that is
//! relocated to the next edit point. Edits at the gap are cheap; moving the gap is
//! O(distance) and amortizes well because edits tend to be local.
//!
//! An optional style buffer shares the exact gap geometry of the text buffer and
//! holds one style byte per text byte (0 is the default style).
//!
//! Positions handed to this type are *logical* offsets in `[0, len]`. They are
//! translated through the gap on every access; physical indices never escape.

use std::fmt;

use tracing::trace;

/// Minimum number of bytes added to the gap whenever it has to grow.
pub const MIN_GAP: usize = 80;

/// A byte gap buffer with an optional parallel style buffer.
#[derive(Debug, Clone)]
pub struct GapBuffer {
    /// Storage: [pre-gap content | gap | post-gap content].
    data: Vec<u8>,
    /// Style bytes, same geometry as `data`. Present only in styled mode.
    styles: Option<Vec<u8>>,
    /// Index where the gap starts (first unused byte).
    gap_start: usize,
    /// Index where the gap ends (first used byte after the gap).
    gap_end: usize,
}

impl GapBuffer {
    /// Creates a new empty buffer with a gap of [`MIN_GAP`] bytes.
    pub fn new() -> Self {
        Self {
            data: vec![0; MIN_GAP],
            styles: None,
            gap_start: 0,
            gap_end: MIN_GAP,
        }
    }

    /// Creates a buffer holding `bytes`, with the gap at the end.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mut buffer = Self::new();
        buffer.set_content(bytes, None);
        buffer
    }

    /// Replaces the whole content.
    ///
    /// When the buffer is styled, every byte gets `style` (or 0 when `None`).
    /// The gap is placed at the end with [`MIN_GAP`] bytes of room.
    pub fn set_content(&mut self, bytes: &[u8], style: Option<u8>) {
        let n = bytes.len();
        let capacity = n + MIN_GAP;
        self.data.clear();
        self.data.reserve(capacity);
        self.data.extend_from_slice(bytes);
        self.data.resize(capacity, 0);
        if let Some(styles) = self.styles.as_mut() {
            styles.clear();
            styles.resize(n, style.unwrap_or(0));
            styles.resize(capacity, 0);
        }
        self.gap_start = n;
        self.gap_end = capacity;
    }

    // ==================== Geometry ====================

    /// Returns the logical length (excluding the gap).
    pub fn len(&self) -> usize {
        self.data.len() - self.gap_len()
    }

    /// Returns true if the buffer holds no text.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the physical size of the storage, gap included.
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Returns the logical position of the gap.
    pub fn gap_start(&self) -> usize {
        self.gap_start
    }

    /// Returns the current gap size.
    pub fn gap_len(&self) -> usize {
        self.gap_end - self.gap_start
    }

    /// Returns true if the parallel style buffer is present.
    pub fn is_styled(&self) -> bool {
        self.styles.is_some()
    }

    /// Translates a logical position to a physical index.
    #[inline]
    fn physical(&self, pos: usize) -> usize {
        if pos < self.gap_start {
            pos
        } else {
            pos + self.gap_len()
        }
    }

    // ==================== Gap Management ====================

    /// Moves the gap to the logical position `pos`.
    ///
    /// Only the bytes between the old and the new gap position are copied.
    pub fn move_gap(&mut self, pos: usize) {
        let pos = pos.min(self.len());
        let gap_len = self.gap_len();

        if pos < self.gap_start {
            // Move gap left: [pos..gap_start] slides to the end of the gap
            let shift = self.gap_start - pos;
            self.data.copy_within(pos..self.gap_start, self.gap_end - shift);
            if let Some(styles) = self.styles.as_mut() {
                styles.copy_within(pos..self.gap_start, self.gap_end - shift);
            }
        } else if pos > self.gap_start {
            // Move gap right: [gap_end..gap_end + shift] slides to gap_start
            let shift = pos - self.gap_start;
            self.data
                .copy_within(self.gap_end..self.gap_end + shift, self.gap_start);
            if let Some(styles) = self.styles.as_mut() {
                styles.copy_within(self.gap_end..self.gap_end + shift, self.gap_start);
            }
        } else {
            return;
        }
        self.gap_start = pos;
        self.gap_end = pos + gap_len;
    }

    /// Ensures the gap can absorb `extra` more bytes.
    ///
    /// When it cannot, storage grows to `len + extra + MIN_GAP` and the post-gap
    /// content is shifted to the end. The gap position is preserved. Growth that
    /// cannot be satisfied aborts the process; a half-relocated gap cannot be
    /// recovered from.
    pub fn grow_gap(&mut self, extra: usize) {
        if extra < self.gap_len() {
            return;
        }
        let len = self.len();
        let size = extra + MIN_GAP;
        let old_end = self.gap_end;
        let old_capacity = self.data.len();
        let new_capacity = len + size;

        trace!(len, gap = self.gap_len(), new_capacity, "grow_gap");

        self.data.resize(new_capacity, 0);
        self.data
            .copy_within(old_end..old_capacity, self.gap_start + size);
        if let Some(styles) = self.styles.as_mut() {
            styles.resize(new_capacity, 0);
            styles.copy_within(old_end..old_capacity, self.gap_start + size);
        }
        self.gap_end = self.gap_start + size;
    }

    /// Collapses the gap to the tail so `[0, len)` is contiguous.
    pub fn squeeze(&mut self) {
        let len = self.len();
        self.move_gap(len);
    }

    /// Squeezes the gap and returns the whole content as one slice.
    pub fn contiguous(&mut self) -> &[u8] {
        self.squeeze();
        &self.data[..self.gap_start]
    }

    /// Returns the content as the two slices on either side of the gap.
    pub fn as_slices(&self) -> (&[u8], &[u8]) {
        (&self.data[..self.gap_start], &self.data[self.gap_end..])
    }

    // ==================== Editing ====================

    /// Replaces `del` bytes at `pos` with `ins`, filling inserted style bytes with `style`.
    ///
    /// The caller guarantees `pos + del <= len`; this is the raw edit used by the
    /// layout-aware engine, which validates its arguments first.
    pub fn replace(&mut self, pos: usize, del: usize, ins: &[u8], style: u8) {
        debug_assert!(pos + del <= self.len());
        let n = ins.len();
        if n > del {
            self.grow_gap(n - del);
        }
        self.move_gap(pos);
        // The deleted bytes sit right after the gap, so they may be overwritten.
        self.data[pos..pos + n].copy_from_slice(ins);
        if let Some(styles) = self.styles.as_mut() {
            styles[pos..pos + n].fill(style);
        }
        self.gap_start += n;
        self.gap_end += del;
    }

    /// Inserts `ins` at `pos` with the default style.
    pub fn insert(&mut self, pos: usize, ins: &[u8]) {
        self.replace(pos, 0, ins, 0);
    }

    /// Removes `n` bytes at `pos`.
    pub fn remove(&mut self, pos: usize, n: usize) {
        self.replace(pos, n, &[], 0);
    }

    // ==================== Access ====================

    /// Returns the byte at logical position `pos`.
    ///
    /// Positions at or past the end read as 0, which is never a newline or a
    /// continuation byte.
    #[inline]
    pub fn byte_at(&self, pos: usize) -> u8 {
        if pos >= self.len() {
            return 0;
        }
        self.data[self.physical(pos)]
    }

    /// Returns the style byte at `pos`, or `None` when unstyled or out of range.
    pub fn style_at(&self, pos: usize) -> Option<u8> {
        if pos >= self.len() {
            return None;
        }
        let physical = self.physical(pos);
        self.styles.as_ref().map(|styles| styles[physical])
    }

    /// Copies `n` bytes starting at `pos` out of the buffer.
    ///
    /// The range must lie inside `[0, len]`.
    pub fn extract(&self, pos: usize, n: usize) -> Vec<u8> {
        debug_assert!(pos + n <= self.len());
        Self::extract_from(&self.data, self.gap_start, self.gap_end, pos, n)
    }

    /// Copies `n` style bytes starting at `pos`, or `None` when unstyled.
    pub fn extract_styles(&self, pos: usize, n: usize) -> Option<Vec<u8>> {
        debug_assert!(pos + n <= self.len());
        self.styles
            .as_ref()
            .map(|styles| Self::extract_from(styles, self.gap_start, self.gap_end, pos, n))
    }

    fn extract_from(store: &[u8], gap_start: usize, gap_end: usize, pos: usize, n: usize) -> Vec<u8> {
        let gap_len = gap_end - gap_start;
        if pos + n <= gap_start {
            store[pos..pos + n].to_vec()
        } else if gap_start <= pos {
            store[pos + gap_len..pos + gap_len + n].to_vec()
        } else {
            let mut out = Vec::with_capacity(n);
            out.extend_from_slice(&store[pos..gap_start]);
            out.extend_from_slice(&store[gap_end..gap_end + pos + n - gap_start]);
            out
        }
    }

    /// Returns the whole content as a byte vector.
    pub fn to_vec(&self) -> Vec<u8> {
        let (before, after) = self.as_slices();
        let mut out = Vec::with_capacity(self.len());
        out.extend_from_slice(before);
        out.extend_from_slice(after);
        out
    }

    // ==================== Styles ====================

    /// Turns styled mode on or off.
    ///
    /// Enabling allocates a zeroed style buffer; disabling frees it.
    pub fn set_styled(&mut self, styled: bool) {
        match (styled, self.styles.is_some()) {
            (true, false) => self.styles = Some(vec![0; self.data.len()]),
            (false, true) => self.styles = None,
            _ => {}
        }
    }

    /// Sets the style of `n` bytes at `pos` to `style`. No-op when unstyled.
    pub fn fill_styles(&mut self, pos: usize, n: usize, style: u8) {
        debug_assert!(pos + n <= self.len());
        let (gap_start, gap_end) = (self.gap_start, self.gap_end);
        if let Some(styles) = self.styles.as_mut() {
            if pos + n <= gap_start {
                styles[pos..pos + n].fill(style);
            } else if gap_start <= pos {
                let at = pos - gap_start + gap_end;
                styles[at..at + n].fill(style);
            } else {
                styles[pos..gap_start].fill(style);
                styles[gap_end..gap_end + pos + n - gap_start].fill(style);
            }
        }
    }

    /// Copies `style` into the style bytes starting at `pos`. No-op when unstyled.
    pub fn copy_styles(&mut self, pos: usize, style: &[u8]) {
        let n = style.len();
        debug_assert!(pos + n <= self.len());
        let (gap_start, gap_end) = (self.gap_start, self.gap_end);
        if let Some(styles) = self.styles.as_mut() {
            if pos + n <= gap_start {
                styles[pos..pos + n].copy_from_slice(style);
            } else if gap_start <= pos {
                let at = pos - gap_start + gap_end;
                styles[at..at + n].copy_from_slice(style);
            } else {
                let split = gap_start - pos;
                styles[pos..gap_start].copy_from_slice(&style[..split]);
                styles[gap_end..gap_end + n - split].copy_from_slice(&style[split..]);
            }
        }
    }
}

impl Default for GapBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for GapBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (before, after) = self.as_slices();
        write!(
            f,
            "{}{}",
            String::from_utf8_lossy(before),
            String::from_utf8_lossy(after)
        )
    }
}
