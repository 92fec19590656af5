// Chunk: docs/chunks/byte_gap_buffer - UTF-8 byte gap buffer with parallel style bytes

//! Performance sanity checks for the gap buffer.
//!
//! These are not formal benchmarks; they guard against obvious regressions such
//! as moving the whole buffer on every edit.

use lite_text_buffer::GapBuffer;
use std::time::{Duration, Instant};

#[test]
fn append_100k_bytes_under_100ms() {
    let mut buffer = GapBuffer::new();
    let start = Instant::now();

    for _ in 0..100_000 {
        let len = buffer.len();
        buffer.insert(len, b"x");
    }

    let elapsed = start.elapsed();
    assert!(
        elapsed < Duration::from_millis(100),
        "Appending 100K bytes took {:?}, expected < 100ms",
        elapsed
    );
    assert_eq!(buffer.len(), 100_000);
}

#[test]
fn local_edits_in_large_buffer_under_500ms() {
    let text = "lorem ipsum dolor sit amet\n".repeat(40_000);
    let mut buffer = GapBuffer::from_bytes(text.as_bytes());
    let start = Instant::now();

    // Typing in the middle: the gap moves once, then stays put
    let mut pos = buffer.len() / 2;
    for _ in 0..50_000 {
        buffer.insert(pos, b"y");
        pos += 1;
    }

    let elapsed = start.elapsed();
    assert!(
        elapsed < Duration::from_millis(500),
        "50K local inserts took {:?}, expected < 500ms",
        elapsed
    );
    assert_eq!(buffer.len(), text.len() + 50_000);
}

#[test]
fn byte_access_across_gap_under_100ms() {
    let text = "x".repeat(500_000);
    let mut buffer = GapBuffer::from_bytes(text.as_bytes());
    buffer.move_gap(250_000);
    let start = Instant::now();

    let mut sum = 0usize;
    for pos in 0..buffer.len() {
        sum += buffer.byte_at(pos) as usize;
    }

    let elapsed = start.elapsed();
    assert!(
        elapsed < Duration::from_millis(100),
        "Reading 500K bytes took {:?}, expected < 100ms",
        elapsed
    );
    assert_eq!(sum, 500_000 * b'x' as usize);
}
