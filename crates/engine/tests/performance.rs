// Chunk: docs/chunks/text_engine - Editable-text engine for a multi-line text widget

//! Performance sanity checks for the engine.
//!
//! These are not formal benchmarks. They guard against regressions that turn
//! the incremental row repair into a full re-layout on every keystroke.

use lite_text_engine::{EngineConfig, Monospace, SearchDirection, SearchFlags, TextEngine, Viewport};
use std::time::{Duration, Instant};

fn document(lines: usize) -> String {
    (0..lines)
        .map(|i| format!("line {i} with a few words that wrap in narrow views\n"))
        .collect()
}

fn wrapped(text: &str) -> TextEngine {
    let mut config = EngineConfig::default();
    config.options.word_wrap = true;
    let mut e = TextEngine::with_text(config, Box::new(Monospace::default()), text);
    e.set_viewport(Viewport::new(30, 40));
    e
}

#[test]
fn typing_10k_chars_mid_document_under_1s() {
    let mut e = wrapped(&document(20_000));
    let middle = e.pos_from_row(e.row_count() / 2);
    e.move_cursor(middle);
    let rows_before = e.row_count();

    let start = Instant::now();
    for i in 0..10_000 {
        let text: &[u8] = match i % 60 {
            59 => b"\n",
            n if n % 7 == 6 => b" ",
            _ => b"x",
        };
        e.insert_string(text).unwrap();
    }
    let elapsed = start.elapsed();

    assert!(
        elapsed < Duration::from_secs(1),
        "Typing 10K characters took {:?}, expected < 1s",
        elapsed
    );
    assert!(e.row_count() > rows_before);
    assert_eq!(e.cursor().pos, middle + 10_000);
}

#[test]
fn deleting_lines_under_500ms() {
    let mut e = wrapped(&document(20_000));
    e.move_cursor(e.pos_from_row(100));

    let start = Instant::now();
    for _ in 0..2_000 {
        e.delete_line().unwrap();
    }
    let elapsed = start.elapsed();

    assert!(
        elapsed < Duration::from_millis(500),
        "Deleting 2K lines took {:?}, expected < 500ms",
        elapsed
    );
    assert_eq!(e.line_count(), 18_001);
}

#[test]
fn scrolling_through_document_under_500ms() {
    let mut e = wrapped(&document(10_000));
    let rows = e.row_count();

    let start = Instant::now();
    for row in (0..rows).step_by(37) {
        e.scroll_to_row(row);
    }
    for row in (0..rows).step_by(41).rev() {
        e.scroll_to_row(row);
    }
    let elapsed = start.elapsed();

    assert!(
        elapsed < Duration::from_millis(500),
        "Scrolling took {:?}, expected < 500ms",
        elapsed
    );
    assert_eq!(e.top_row(), 0);
}

#[test]
fn searching_large_text_under_1s() {
    let mut e = wrapped(&document(20_000));
    let len = e.len();

    let start = Instant::now();
    let found = e.find_text("line 19999", 0, SearchFlags::default()).unwrap();
    let back = e
        .find_text(
            "line 0 ",
            len,
            SearchFlags {
                direction: SearchDirection::Backward,
                ..SearchFlags::default()
            },
        )
        .unwrap();
    let elapsed = start.elapsed();

    assert!(
        elapsed < Duration::from_secs(1),
        "Searching took {:?}, expected < 1s",
        elapsed
    );
    assert!(found.is_some());
    assert_eq!(back.map(|m| m.start()), Some(0));
}
