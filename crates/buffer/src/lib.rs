// Chunk: docs/chunks/byte_gap_buffer - UTF-8 byte gap buffer with parallel style bytes
// Chunk: docs/chunks/column_blocks - Tab expansion and rectangular column edits

//! lite-text-buffer: storage and byte-level transforms for the lite-text engine.
//!
//! This crate knows nothing about rows, wrapping or selections. It provides:
//!
//! - [`GapBuffer`], a byte gap buffer with an optional parallel style buffer
//! - code point navigation on top of it (`char_at`, `inc`, `dec`, `valid_pos`)
//! - [`tabs`], tab expansion/compression and re-indentation
//! - [`columns`], rectangular column edits over detabbed text
//!
//! # Example
//!
//! ```
//! use lite_text_buffer::GapBuffer;
//!
//! let mut buffer = GapBuffer::from_bytes(b"AB");
//! buffer.insert(1, b"X");
//! assert_eq!(buffer.to_string(), "AXB");
//! assert_eq!(buffer.gap_start(), 2);
//!
//! let text = GapBuffer::from_bytes("a€b".as_bytes());
//! assert_eq!(text.inc(1), 4);
//! assert_eq!(text.char_at(1), '€');
//! ```

pub mod columns;
mod gap_buffer;
pub mod tabs;
mod utf8;

pub use gap_buffer::{GapBuffer, MIN_GAP};
pub use utf8::{decode, is_char_start, utf8_len};
