//! Error types for the Voltlab circuit engine.
//!
//! This module provides a unified error type [`VoltlabError`] for the few
//! operations that can actually fail: reading and decoding circuit snapshot
//! files. Editor mutations never error: malformed requests (self-connection,
//! duplicate wire, unknown id) are quiet no-ops reported through `bool`/
//! `Option` returns, because they arise from normal out-of-order UI events.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using [`VoltlabError`].
pub type Result<T> = std::result::Result<T, VoltlabError>;

/// Unified error type for all Voltlab operations.
#[derive(Error, Debug)]
pub enum VoltlabError {
    /// Error reading a circuit snapshot file
    #[error("Failed to read circuit file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Snapshot JSON could not be decoded
    #[error("Failed to parse circuit snapshot: {source}")]
    SnapshotParse {
        #[source]
        source: serde_json::Error,
    },

    /// Snapshot could not be encoded back to JSON
    #[error("Failed to encode circuit snapshot: {source}")]
    SnapshotEncode {
        #[source]
        source: serde_json::Error,
    },
}

impl VoltlabError {
    /// Create a file-read error.
    pub fn file_read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileRead {
            path: path.into(),
            source,
        }
    }
}

impl From<serde_json::Error> for VoltlabError {
    fn from(source: serde_json::Error) -> Self {
        Self::SnapshotParse { source }
    }
}
