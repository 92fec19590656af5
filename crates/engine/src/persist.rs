// Chunk: docs/chunks/snapshot_persistence - Engine snapshots
//!
//! Saving and restoring engine state.
//!
//! A [`Snapshot`] captures the text (gap removed), the optional style bytes,
//! the configuration and the visible-row window. Restoring rebuilds the row
//! totals from scratch and keeps the first visible row where it was.
//!
//! ## Schema Version
//!
//! Every snapshot carries a schema version. A snapshot written under another
//! version is rejected rather than guessed at.

use std::fs;
use std::io::{Read, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::{EngineConfig, Viewport};
use crate::error::{EngineError, Result};
use crate::metrics::CharWidth;
use crate::text_engine::TextEngine;

/// Current schema version.
///
/// Increment this when making breaking changes to the snapshot format.
pub const SCHEMA_VERSION: u32 = 1;

// =============================================================================
// Serializable Data Types
// =============================================================================

/// Serialized engine state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub schema_version: u32,
    /// Byte length of `content`.
    pub length: usize,
    /// The text with the gap squeezed out.
    pub content: Vec<u8>,
    /// One style byte per content byte, for styled text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub styles: Option<Vec<u8>>,
    /// Size of the visible-row window.
    pub visible_rows: usize,
    /// Start of every visible row plus the end of the last one.
    pub visrows: Vec<usize>,
    pub viewport: Viewport,
    pub config: EngineConfig,
}

impl Snapshot {
    /// Checks the snapshot is internally consistent.
    pub fn validate(&self) -> Result<()> {
        if self.schema_version != SCHEMA_VERSION {
            return Err(EngineError::SchemaMismatch {
                found: self.schema_version,
                expected: SCHEMA_VERSION,
            });
        }
        if self.length != self.content.len() {
            return Err(EngineError::InvalidSnapshot(format!(
                "length {} but content holds {} bytes",
                self.length,
                self.content.len()
            )));
        }
        if let Some(styles) = &self.styles {
            if styles.len() != self.length {
                return Err(EngineError::InvalidSnapshot(format!(
                    "{} style bytes for {} content bytes",
                    styles.len(),
                    self.length
                )));
            }
        }
        if self.visrows.len() != self.visible_rows + 1 {
            return Err(EngineError::InvalidSnapshot(format!(
                "{} visible row entries for {} visible rows",
                self.visrows.len(),
                self.visible_rows
            )));
        }
        if self.visrows.windows(2).any(|w| w[0] > w[1]) {
            return Err(EngineError::InvalidSnapshot("visible rows not in order".into()));
        }
        if self.visrows.iter().any(|&p| p > self.length) {
            return Err(EngineError::InvalidSnapshot(format!(
                "visible row past length {}",
                self.length
            )));
        }
        Ok(())
    }
}

// =============================================================================
// Snapshot / Restore
// =============================================================================

impl TextEngine {
    /// Captures the current state.
    pub fn snapshot(&self) -> Snapshot {
        let length = self.len();
        Snapshot {
            schema_version: SCHEMA_VERSION,
            length,
            content: self.buffer.to_vec(),
            styles: self.buffer.extract_styles(0, length),
            visible_rows: self.rows.nvisrows(),
            visrows: self.rows.visrows().to_vec(),
            viewport: self.viewport,
            config: self.config.clone(),
        }
    }

    /// Rebuilds an engine from `snapshot`, measuring with `metrics`.
    ///
    /// The first visible row is kept on top. Cursor and anchor start at 0 and
    /// the text is unmodified.
    pub fn restore(snapshot: Snapshot, metrics: Box<dyn CharWidth>) -> Result<TextEngine> {
        if let Err(err) = snapshot.validate() {
            warn!(%err, "rejected snapshot");
            return Err(err);
        }
        let Snapshot {
            content,
            styles,
            visrows,
            viewport,
            config,
            ..
        } = snapshot;

        let mut engine = TextEngine::new(config, metrics);
        engine.viewport = viewport;
        if let Some(styles) = &styles {
            engine.buffer.set_styled(true);
            engine.buffer.set_content(&content, None);
            engine.buffer.copy_styles(0, styles);
        } else {
            engine.buffer.set_content(&content, None);
        }
        engine.rows.reset();
        engine.rows.keep(visrows[0]);
        engine.needs_recompute = true;
        engine.layout();

        debug!(
            length = engine.len(),
            top_row = engine.rows.top_row,
            nrows = engine.rows.nrows,
            styled = styles.is_some(),
            "restored snapshot"
        );
        Ok(engine)
    }

    // =========================================================================
    // Save / Load
    // =========================================================================

    pub fn save_to_writer<W: Write>(&self, writer: W) -> Result<()> {
        serde_json::to_writer(writer, &self.snapshot())?;
        Ok(())
    }

    pub fn load_from_reader<R: Read>(reader: R, metrics: Box<dyn CharWidth>) -> Result<TextEngine> {
        let snapshot: Snapshot = serde_json::from_reader(reader)?;
        TextEngine::restore(snapshot, metrics)
    }

    /// Writes a snapshot to `path`.
    ///
    /// Uses atomic write (write to temp file, then rename).
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_vec_pretty(&self.snapshot())?;
        let mut temp_path = path.as_os_str().to_owned();
        temp_path.push(".tmp");
        fs::write(&temp_path, json)?;
        fs::rename(&temp_path, path)?;
        debug!(path = %path.display(), "saved snapshot");
        Ok(())
    }

    pub fn load_from_path(path: &Path, metrics: Box<dyn CharWidth>) -> Result<TextEngine> {
        let file = fs::File::open(path)?;
        TextEngine::load_from_reader(std::io::BufReader::new(file), metrics)
    }
}
