//! Compaction
//!
//! Rewrites the log down to one put per live key.
//!
//! ## Steps
//! 1. Close the write handle (the file is about to be renamed)
//! 2. Rename `{path}` to `{path}.bak`, replacing any previous backup
//! 3. Create a fresh empty `{path}`
//! 4. Append one put entry per key in the index
//! 5. Close the write handle again so the new log is on disk
//!
//! If step 4 fails the new log is left partially written; the backup
//! still holds the full previous history.

use std::ffi::OsString;
use std::fs::{self, File};
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::{Result, StoreError};
use crate::index::Index;
use crate::wal::LogWriter;

/// Path of the backup that consolidation leaves behind
pub fn backup_path(path: &Path) -> PathBuf {
    let mut backup = OsString::from(path.as_os_str());
    backup.push(".bak");
    PathBuf::from(backup)
}

/// Consolidate the log behind `writer` to match `index`.
///
/// The caller must hold the store lock. No-op when persistence is off.
pub fn consolidate(index: &Index, writer: &mut LogWriter, persistent: bool) -> Result<()> {
    if !persistent {
        return Ok(());
    }

    writer.close()?;

    let path = writer.path().to_path_buf();
    let backup = backup_path(&path);

    fs::rename(&path, &backup).map_err(|source| StoreError::Backup {
        path: path.clone(),
        backup: backup.clone(),
        source,
    })?;

    let file = File::create(&path).map_err(|source| StoreError::CreateLog {
        path: path.clone(),
        source,
    })?;
    drop(file);

    // Close even when the append fails so the prefix that did get written
    // is not left sitting in a buffer.
    let appended = writer.append(&index.to_entries());
    let closed = writer.close();
    appended?;
    closed?;

    info!(
        path = %path.display(),
        backup = %backup.display(),
        keys = index.len(),
        "consolidated log"
    );

    Ok(())
}
