// Chunk: docs/chunks/byte_gap_buffer - UTF-8 byte gap buffer with parallel style bytes

//! Code point navigation over a [`GapBuffer`].
//!
//! All movement is expressed in logical positions and is guaranteed never to land
//! inside a multi-byte UTF-8 sequence. Decoding is lenient: malformed input is not
//! an error, it just decodes to whatever its bit pattern implies.

use crate::gap_buffer::GapBuffer;

/// Returns true if `byte` starts a code point (is not a continuation byte).
#[inline]
pub fn is_char_start(byte: u8) -> bool {
    (byte & 0xC0) != 0x80
}

/// Returns the encoded length implied by a lead byte.
///
/// Continuation bytes and ASCII report 1.
#[inline]
pub fn utf8_len(lead: u8) -> usize {
    match lead {
        0x00..=0xBF => 1,
        0xC0..=0xDF => 2,
        0xE0..=0xEF => 3,
        _ => 4,
    }
}

/// Decodes the code point whose lead byte is `bytes[0]`.
///
/// Missing trailing bytes read as bare continuation bytes. Bit patterns that do not
/// form a Unicode scalar value decode to U+FFFD.
pub fn decode(bytes: &[u8]) -> char {
    let at = |i: usize| bytes.get(i).copied().unwrap_or(0x80) as u32;
    let mut w = at(0);
    if 0xC0 <= w {
        w = (w << 6) ^ at(1) ^ 0x3080;
        if 0x800 <= w {
            w = (w << 6) ^ at(2) ^ 0x20080;
            if 0x10000 <= w {
                w = (w << 6) ^ at(3) ^ 0x400080;
            }
        }
    }
    char::from_u32(w).unwrap_or(char::REPLACEMENT_CHARACTER)
}

impl GapBuffer {
    /// Decodes the code point starting at `pos`.
    ///
    /// Returns `'\0'` at or past the end of the buffer.
    pub fn char_at(&self, pos: usize) -> char {
        let lead = self.byte_at(pos);
        if lead < 0x80 {
            return lead as char;
        }
        let n = utf8_len(lead);
        let mut bytes = [0x80u8; 4];
        for (i, slot) in bytes.iter_mut().enumerate().take(n) {
            if pos + i < self.len() {
                *slot = self.byte_at(pos + i);
            }
        }
        decode(&bytes[..n])
    }

    /// Returns the byte length of the code point starting at `pos`.
    pub fn char_len_at(&self, pos: usize) -> usize {
        utf8_len(self.byte_at(pos))
    }

    /// Moves forward one code point, stepping over at most three continuation bytes.
    ///
    /// Clamped to `len`.
    pub fn inc(&self, pos: usize) -> usize {
        let len = self.len();
        if pos >= len {
            return len;
        }
        let mut p = pos + 1;
        for _ in 0..3 {
            if p >= len || is_char_start(self.byte_at(p)) {
                break;
            }
            p += 1;
        }
        p
    }

    /// Moves back one code point, stepping over at most three continuation bytes.
    ///
    /// Clamped to 0.
    pub fn dec(&self, pos: usize) -> usize {
        if pos == 0 {
            return 0;
        }
        let mut p = pos.min(self.len()) - 1;
        for _ in 0..3 {
            if p == 0 || is_char_start(self.byte_at(p)) {
                break;
            }
            p -= 1;
        }
        p
    }

    /// Snaps an arbitrary position back to the nearest code point start.
    ///
    /// The result is clamped to `[0, len]` and never moves back more than three bytes.
    pub fn valid_pos(&self, pos: usize) -> usize {
        let len = self.len();
        if pos == 0 {
            return 0;
        }
        if pos >= len {
            return len;
        }
        let mut p = pos;
        for _ in 0..3 {
            if p == 0 || is_char_start(self.byte_at(p)) {
                break;
            }
            p -= 1;
        }
        p
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn buf(text: &str) -> GapBuffer {
        GapBuffer::from_bytes(text.as_bytes())
    }

    // ==================== Decoding ====================

    #[test]
    fn test_decode_all_lengths() {
        let b = buf("aé€😀");
        assert_eq!(b.char_at(0), 'a');
        assert_eq!(b.char_at(1), 'é');
        assert_eq!(b.char_at(3), '€');
        assert_eq!(b.char_at(6), '😀');
        assert_eq!(b.char_len_at(0), 1);
        assert_eq!(b.char_len_at(1), 2);
        assert_eq!(b.char_len_at(3), 3);
        assert_eq!(b.char_len_at(6), 4);
    }

    #[test]
    fn test_decode_across_gap() {
        let mut b = buf("x€y");
        b.move_gap(1);
        assert_eq!(b.char_at(1), '€');
        b.move_gap(4);
        assert_eq!(b.char_at(1), '€');
    }

    #[test]
    fn test_decode_past_end_is_nul() {
        let b = buf("ab");
        assert_eq!(b.char_at(2), '\0');
    }

    #[test]
    fn test_decode_is_lenient_on_truncated_sequence() {
        // Lead byte of a 3-byte sequence with nothing after it
        let b = GapBuffer::from_bytes(&[b'a', 0xE2]);
        let ch = b.char_at(1);
        assert_ne!(ch, 'a');
        assert_eq!(b.inc(1), 2);
    }

    #[test]
    fn test_decode_lone_continuation_byte() {
        let b = GapBuffer::from_bytes(&[0x80, b'z']);
        assert_eq!(b.char_len_at(0), 1);
        assert_eq!(b.char_at(1), 'z');
    }

    // ==================== Increment / Decrement ====================

    #[test]
    fn test_inc_steps_whole_code_points() {
        let b = buf("aé€😀z");
        assert_eq!(b.inc(0), 1);
        assert_eq!(b.inc(1), 3);
        assert_eq!(b.inc(3), 6);
        assert_eq!(b.inc(6), 10);
        assert_eq!(b.inc(10), 11);
        assert_eq!(b.inc(11), 11);
    }

    #[test]
    fn test_dec_steps_whole_code_points() {
        let b = buf("aé€😀z");
        assert_eq!(b.dec(11), 10);
        assert_eq!(b.dec(10), 6);
        assert_eq!(b.dec(6), 3);
        assert_eq!(b.dec(3), 1);
        assert_eq!(b.dec(1), 0);
        assert_eq!(b.dec(0), 0);
    }

    #[test]
    fn test_inc_dec_are_inverses_on_boundaries() {
        let mut b = buf("héllo → wörld 😀!\n\tend");
        for gap in [0, 5, b.len()] {
            b.move_gap(gap);
            let len = b.len();
            let mut p = 0;
            while p < len {
                let next = b.inc(p);
                assert_eq!(b.dec(next), p, "dec(inc({p}))");
                assert_eq!(b.inc(b.dec(next)), next, "inc(dec({next}))");
                p = next;
            }
        }
    }

    #[test]
    fn test_valid_pos_snaps_back() {
        let b = buf("a€b");
        assert_eq!(b.valid_pos(0), 0);
        assert_eq!(b.valid_pos(1), 1);
        assert_eq!(b.valid_pos(2), 1);
        assert_eq!(b.valid_pos(3), 1);
        assert_eq!(b.valid_pos(4), 4);
        assert_eq!(b.valid_pos(99), 5);
    }

    #[test]
    fn test_valid_pos_bounded_correction() {
        // Five continuation bytes in a row: never walks back more than three
        let b = GapBuffer::from_bytes(&[b'a', 0x80, 0x80, 0x80, 0x80, 0x80, b'b']);
        assert_eq!(b.valid_pos(5), 2);
    }
}
