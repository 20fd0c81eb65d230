//! Document persistence
//!
//! Documents are stored as JSON with fixed field names (`background`,
//! `emojis`, `nextId`). Unknown fields are ignored on read. The same payload
//! backs autosave and the open/save file format.

use std::path::Path;

use thiserror::Error;

use crate::model::Document;

/// Content-type tag of the document file format
pub const CONTENT_TYPE: &str = "application/vnd.emojiart+json";

/// File extension of the document file format
pub const FILE_EXTENSION: &str = "emojiart";

#[derive(Debug, Error)]
pub enum PersistError {
    /// Bytes do not parse, or required fields are missing/mistyped
    #[error("corrupt document payload: {0}")]
    CorruptPayload(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Encode a document
pub fn serialize(document: &Document) -> Vec<u8> {
    // Document holds only strings, integers and vectors, so encoding can't fail
    serde_json::to_vec_pretty(document).unwrap_or_default()
}

/// Decode a document, failing with `CorruptPayload` on malformed input
pub fn deserialize(bytes: &[u8]) -> Result<Document, PersistError> {
    serde_json::from_slice(bytes).map_err(|e| PersistError::CorruptPayload(e.to_string()))
}

/// Read a document file (open flow)
pub fn read_document(path: &Path) -> Result<Document, PersistError> {
    let bytes = std::fs::read(path)?;
    deserialize(&bytes)
}

/// Write a document file (save flow)
pub fn write_document(path: &Path, document: &Document) -> Result<(), PersistError> {
    write_payload(path, &serialize(document))?;
    Ok(())
}

/// Write already-serialized bytes, creating parent directories as needed
pub fn write_payload(path: &Path, payload: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(path, payload)
}

/// Load the autosaved document for session start
///
/// Missing or corrupt files yield an empty document; nothing is surfaced.
pub fn load_autosave(path: &Path) -> Document {
    if !path.exists() {
        tracing::debug!("No autosave at {}, starting empty", path.display());
        return Document::new();
    }

    match read_document(path) {
        Ok(document) => {
            tracing::info!(
                "Restored autosave from {} ({} emojis)",
                path.display(),
                document.len()
            );
            document
        }
        Err(e) => {
            tracing::warn!("Ignoring unreadable autosave at {}: {}", path.display(), e);
            Document::new()
        }
    }
}
