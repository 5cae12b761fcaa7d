//! Log Writer
//!
//! Appends encoded entries to the log file.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::Config;
use crate::error::{Result, StoreError};

use super::Entry;

/// The open file, with or without a write buffer in front of it
enum Handle {
    Direct(File),
    Buffered(BufWriter<File>),
}

impl Handle {
    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Handle::Direct(file) => file,
            Handle::Buffered(writer) => writer,
        }
    }
}

/// Appends entries to the log file
///
/// The file is opened lazily in create-or-append mode on the first
/// append and the handle is reused until [`LogWriter::close`]. Closing
/// always clears the handle, so the next append reopens the file.
pub struct LogWriter {
    path: PathBuf,
    buffered: bool,
    persistent: bool,
    handle: Option<Handle>,
}

impl LogWriter {
    /// Create a writer for the log at `config.path`. Opens nothing yet.
    pub fn new(config: &Config) -> Self {
        Self {
            path: config.path.clone(),
            buffered: config.buffered,
            persistent: config.persistent,
            handle: None,
        }
    }

    /// Append entries as one line each, in order.
    ///
    /// Not transactional: entries are written one by one and the first
    /// failure aborts the rest of the batch, leaving the earlier lines in
    /// place. No-op when persistence is off.
    pub fn append(&mut self, entries: &[Entry]) -> Result<()> {
        if !self.persistent {
            return Ok(());
        }

        if self.handle.is_none() {
            self.handle = Some(Self::open(&self.path, self.buffered)?);
        }

        if let Some(handle) = self.handle.as_mut() {
            let writer = handle.writer();
            for entry in entries {
                writer
                    .write_all(entry.encode().as_bytes())
                    .map_err(StoreError::io(&self.path))?;
            }
        }

        Ok(())
    }

    /// Push buffered bytes to the file.
    /// No-op when unbuffered or closed.
    pub fn flush(&mut self) -> Result<()> {
        if let Some(Handle::Buffered(writer)) = self.handle.as_mut() {
            writer.flush().map_err(StoreError::io(&self.path))?;
        }
        Ok(())
    }

    /// Flush, sync and release the file handle.
    ///
    /// The handle is dropped even when flushing or syncing fails; the
    /// failure is returned as [`StoreError::Close`].
    pub fn close(&mut self) -> Result<()> {
        let Some(handle) = self.handle.take() else {
            return Ok(());
        };

        let close_err = |source: std::io::Error| StoreError::Close {
            path: self.path.clone(),
            source,
        };

        let file = match handle {
            Handle::Direct(file) => file,
            Handle::Buffered(writer) => writer
                .into_inner()
                .map_err(|e| close_err(e.into_error()))?,
        };
        file.sync_all().map_err(close_err)?;

        debug!(path = %self.path.display(), "closed log");
        Ok(())
    }

    /// Whether a file handle is currently cached
    pub fn is_open(&self) -> bool {
        self.handle.is_some()
    }

    /// Path of the log file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn open(path: &Path, buffered: bool) -> Result<Handle> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(StoreError::io(path))?;

        debug!(path = %path.display(), buffered, "opened log for append");

        Ok(if buffered {
            Handle::Buffered(BufWriter::new(file))
        } else {
            Handle::Direct(file)
        })
    }
}
