// Chunk: docs/chunks/text_engine - Editable-text engine for a multi-line text widget
// Chunk: docs/chunks/snapshot_persistence - Engine snapshots

//! lite-text-engine: the editable-text engine behind a multi-line text widget.
//!
//! The engine keeps text in a [`GapBuffer`](lite_text_buffer::GapBuffer) and
//! maintains everything a widget needs to draw and edit it:
//!
//! - a wrap-aware layout ([`TextLayout`]) measured through a host-supplied
//!   [`CharWidth`] capability
//! - a cache of visible row starts ([`RowCache`]) repaired incrementally after
//!   every edit instead of re-wrapping the whole text
//! - cursor, anchor, range and block selections, and a highlight range
//! - editing commands (typing, deletion, indentation, line moves, brackets)
//! - pattern search, snapshots and change notifications
//!
//! # Example
//!
//! ```
//! use lite_text_engine::{EngineConfig, Monospace, TextEngine, Viewport};
//!
//! let mut config = EngineConfig::default();
//! config.options.word_wrap = true;
//! let mut engine = TextEngine::with_text(config, Box::new(Monospace::default()), "the quick fox");
//! engine.set_viewport(Viewport::new(10, 4));
//! assert_eq!(engine.row_count(), 2);
//! assert_eq!(engine.pos_from_row(1), 10);
//!
//! engine.insert_text(4, b"very ").unwrap();
//! assert_eq!(engine.text(), "the very quick fox");
//! assert_eq!(engine.row_count(), 2);
//! ```
//!
//! # Positions
//!
//! Every position is a byte offset into the text. Queries clamp positions into
//! `[0, len]`; mutations and extractions reject out-of-range positions with
//! [`EngineError::OutOfRange`] and leave the text untouched.

mod block_ops;
mod commands;
mod config;
mod cursor;
mod error;
mod metrics;
mod notify;
mod persist;
mod row_cache;
mod search;
mod selection;
mod selection_ops;
mod text_engine;
mod words;
mod wrap;

pub use commands::{Bracket, Motion, ShiftAmount};
pub use config::{
    EngineConfig, Margins, SelectionPolicy, TextOptions, Viewport, DEFAULT_DELIMITERS,
    INITIAL_VISIBLE_ROWS, MAX_TAB_COLUMNS,
};
pub use error::{EngineError, Result};
pub use metrics::{char_display_width, column_advance, CharWidth, Monospace};
pub use notify::{TextChange, TextEvent, TextListener};
pub use persist::{Snapshot, SCHEMA_VERSION};
pub use row_cache::RowCache;
pub use search::{SearchDirection, SearchFlags, TextMatch};
pub use selection::{ColumnSpan, Cursor, SelectMode, Selection};
pub use text_engine::TextEngine;
pub use wrap::{Extent, TextLayout, WrapParams};
