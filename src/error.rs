//! Error types for GDStore
//!
//! Provides a unified error type for all operations.

use std::num::ParseIntError;
use std::path::{Path, PathBuf};
use std::string::FromUtf8Error;

use thiserror::Error;

/// Result type alias using StoreError
pub type Result<T> = std::result::Result<T, StoreError>;

/// Unified error type for GDStore operations
#[derive(Debug, Error)]
pub enum StoreError {
    // -------------------------------------------------------------------------
    // Codec Errors (absorbed during replay)
    // -------------------------------------------------------------------------
    #[error("bad line: expected 3 comma-separated fields, found {fields}")]
    BadLine { fields: usize },

    #[error("failed to decode element: {0}")]
    CannotDecodeElement(#[from] base64::DecodeError),

    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to close {}: {source}", .path.display())]
    Close {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // -------------------------------------------------------------------------
    // Consolidation Errors
    // -------------------------------------------------------------------------
    #[error(
        "unable to rename {} to {} during consolidation: {source}",
        .path.display(),
        .backup.display()
    )]
    Backup {
        path: PathBuf,
        backup: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unable to create new empty file at {} during consolidation: {source}", .path.display())]
    CreateLog {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // -------------------------------------------------------------------------
    // Typed Accessor Errors
    // -------------------------------------------------------------------------
    #[error("value is not valid UTF-8: {0}")]
    NotUtf8(#[from] FromUtf8Error),

    #[error("value is not an integer: {0}")]
    NotAnInteger(#[from] ParseIntError),
}

impl StoreError {
    /// Build a mapper that tags an `io::Error` with the file it happened on
    pub(crate) fn io(path: &Path) -> impl FnOnce(std::io::Error) -> Self + '_ {
        move |source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}
