// Chunk: docs/chunks/text_engine - Editable-text engine for a multi-line text widget

//! Engine configuration.
//!
//! Everything a host widget would normally keep as scalar properties lives here.
//! The config is handed to [`TextEngine::new`](crate::TextEngine::new) and changed
//! afterwards through the engine's setters, each of which re-runs layout.

use serde::{Deserialize, Serialize};

/// Largest supported tab width in columns.
pub const MAX_TAB_COLUMNS: usize = 32;

/// Row-cache size used before the first layout.
pub const INITIAL_VISIBLE_ROWS: usize = 20;

/// Characters that end a word in addition to whitespace.
pub const DEFAULT_DELIMITERS: &str = "~.,/\\`'!@#$%^&*()-=+{}|[]\":;<>?";

/// Boolean behaviour switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TextOptions {
    /// Break rows at the wrap width instead of only at newlines.
    pub word_wrap: bool,
    /// Wrap at `wrap_columns` instead of at the viewport width.
    pub fixed_wrap: bool,
    /// Insert spaces instead of tabs and keep block edits free of tabs.
    pub no_tabs: bool,
    /// Reject editing commands.
    pub read_only: bool,
    /// Typing replaces the characters under the cursor.
    pub overstrike: bool,
    /// A new line copies the leading blanks of the current one.
    pub auto_indent: bool,
    /// Highlight the bracket matching the one before the cursor.
    pub show_match: bool,
}

/// How a selection is repaired when an edit overlaps one of its ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SelectionPolicy {
    /// Bounds inside the replaced region expand over the inserted text.
    #[default]
    EndOfInsert,
    /// Bounds inside the replaced region are cut back to what survives.
    Snipped,
}

/// Space reserved around the text, in capability units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Margins {
    pub left: usize,
    pub right: usize,
    pub top: usize,
    pub bottom: usize,
}

/// Size of the visible area, in capability units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: usize,
    pub height: usize,
}

impl Viewport {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 80,
            height: INITIAL_VISIBLE_ROWS,
        }
    }
}

/// Scalar settings of a [`TextEngine`](crate::TextEngine).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub margins: Margins,
    /// Wrap width in columns when `fixed_wrap` is set.
    pub wrap_columns: usize,
    /// Tab stop spacing in columns, `1..=MAX_TAB_COLUMNS`.
    pub tab_columns: usize,
    /// Width of a line-number bar in columns; subtracted from the wrap width.
    pub bar_columns: usize,
    pub options: TextOptions,
    pub selection_policy: SelectionPolicy,
    pub delimiters: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            margins: Margins::default(),
            wrap_columns: 80,
            tab_columns: 8,
            bar_columns: 0,
            options: TextOptions::default(),
            selection_policy: SelectionPolicy::default(),
            delimiters: DEFAULT_DELIMITERS.to_string(),
        }
    }
}

impl EngineConfig {
    /// Clamps out-of-range scalars into their supported ranges.
    pub fn normalized(mut self) -> Self {
        self.wrap_columns = self.wrap_columns.max(1);
        self.tab_columns = self.tab_columns.clamp(1, MAX_TAB_COLUMNS);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.wrap_columns, 80);
        assert_eq!(config.tab_columns, 8);
        assert_eq!(config.selection_policy, SelectionPolicy::EndOfInsert);
        assert!(config.delimiters.contains('{'));
        assert!(!config.options.word_wrap);
    }

    #[test]
    fn test_normalized_clamps() {
        let config = EngineConfig {
            wrap_columns: 0,
            tab_columns: 100,
            ..EngineConfig::default()
        }
        .normalized();
        assert_eq!(config.wrap_columns, 1);
        assert_eq!(config.tab_columns, MAX_TAB_COLUMNS);
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let config: EngineConfig =
            serde_json::from_str(r#"{ "tab_columns": 4, "options": { "word_wrap": true } }"#)
                .unwrap();
        assert_eq!(config.tab_columns, 4);
        assert_eq!(config.wrap_columns, 80);
        assert!(config.options.word_wrap);
        assert!(!config.options.no_tabs);
        assert_eq!(config.delimiters, DEFAULT_DELIMITERS);
    }
}
