// Chunk: docs/chunks/text_engine - Editable-text engine for a multi-line text widget

//! Error type shared by every fallible engine operation.

use thiserror::Error;

/// Errors returned by [`TextEngine`](crate::TextEngine) operations.
///
/// Every variant is raised before any state is touched; an `Err` means nothing
/// was applied.
#[derive(Error, Debug)]
pub enum EngineError {
    /// A position or range falls outside `[0, len]`.
    #[error("{op}: range {pos}+{length} out of bounds for length {len}")]
    OutOfRange {
        op: &'static str,
        pos: usize,
        length: usize,
        len: usize,
    },

    /// An editing command was issued while the engine is read-only.
    #[error("text is read-only")]
    ReadOnly,

    /// The search pattern failed to compile.
    #[error("bad search pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("snapshot serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A snapshot was written by an incompatible version.
    #[error("snapshot schema version {found}, expected {expected}")]
    SchemaMismatch { found: u32, expected: u32 },

    /// A snapshot failed structural validation.
    #[error("invalid snapshot: {0}")]
    InvalidSnapshot(String),
}

/// Result alias for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_range_message() {
        let err = EngineError::OutOfRange {
            op: "remove_text",
            pos: 4,
            length: 3,
            len: 5,
        };
        assert_eq!(
            err.to_string(),
            "remove_text: range 4+3 out of bounds for length 5"
        );
    }

    #[test]
    fn test_pattern_error_converts() {
        let err: EngineError = regex::Regex::new("(").unwrap_err().into();
        assert!(matches!(err, EngineError::Pattern(_)));
    }
}
