//! Store Module
//!
//! The public facade: an in-memory map kept in step with the log.
//!
//! ## Responsibilities
//! - Replay the log and consolidate it on open
//! - Serialize every mutation together with its log append
//! - Serve reads from the in-memory index
//! - Flush/close the write handle, reopening it lazily afterwards

use std::path::{Path, PathBuf};

use bytes::Bytes;
use parking_lot::RwLock;
use tracing::{debug, error};

use crate::compaction;
use crate::config::Config;
use crate::error::Result;
use crate::index::Index;
use crate::wal::{Entry, LogRecovery, LogWriter, ReplayStats};

/// State shared by all callers, guarded by one lock
struct State {
    index: Index,
    writer: LogWriter,
}

/// An embedded persistent key-value map
///
/// ## Concurrency Model
///
/// The index and the write handle sit behind a single `RwLock`:
/// - **Mutations** (put/put_all/delete/flush/close/consolidate) take the
///   write lock for their whole duration, file write included. Writers
///   block each other and log lines never interleave.
/// - **Reads** (get/count/keys/values) take the read lock, so they never
///   observe the map mid-update.
///
/// The store runs no background threads; all I/O happens on the caller's
/// thread and blocks it.
pub struct Store {
    config: Config,
    state: RwLock<State>,
    replay_stats: ReplayStats,
}

impl Store {
    /// Open or create a store with the given config
    ///
    /// On startup:
    /// 1. Replay the log into the index (creating an empty log if missing)
    /// 2. Consolidate the log, backing the old one up to `{path}.bak`.
    ///    Skipped for a freshly created log so an existing backup survives.
    /// 3. Ready to serve requests
    pub fn open(config: Config) -> Result<Self> {
        let (index, replay_stats) = LogRecovery::replay(&config)?;

        let mut writer = LogWriter::new(&config);
        if !replay_stats.log_created {
            compaction::consolidate(&index, &mut writer, config.persistent)?;
        }

        debug!(
            path = %config.path.display(),
            buffered = config.buffered,
            persistent = config.persistent,
            keys = index.len(),
            "store opened"
        );

        Ok(Self {
            config,
            state: RwLock::new(State { index, writer }),
            replay_stats,
        })
    }

    /// Open with a path (convenience method)
    ///
    /// Uses default config with the specified log file
    pub fn open_path(path: impl Into<PathBuf>) -> Result<Self> {
        Self::open(Config::builder().path(path).build())
    }

    /// A store that never touches the disk
    pub fn in_memory() -> Self {
        let config = Config::builder().persistent(false).build();
        let writer = LogWriter::new(&config);
        Self {
            config,
            state: RwLock::new(State {
                index: Index::new(),
                writer,
            }),
            replay_stats: ReplayStats::default(),
        }
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Get a value by key
    ///
    /// `None` means the key does not exist; a key stored with an empty
    /// value returns `Some` of an empty buffer.
    pub fn get(&self, key: impl AsRef<[u8]>) -> Option<Bytes> {
        self.state.read().index.get(key.as_ref()).cloned()
    }

    /// Get a value as a UTF-8 string
    pub fn get_string(&self, key: impl AsRef<[u8]>) -> Result<Option<String>> {
        match self.get(key) {
            Some(value) => Ok(Some(String::from_utf8(value.to_vec())?)),
            None => Ok(None),
        }
    }

    /// Get a value as a decimal integer
    pub fn get_int(&self, key: impl AsRef<[u8]>) -> Result<Option<i64>> {
        match self.get_string(key)? {
            Some(value) => Ok(Some(value.parse()?)),
            None => Ok(None),
        }
    }

    /// Number of keys
    pub fn count(&self) -> usize {
        self.state.read().index.len()
    }

    /// Snapshot of all keys, in no particular order
    pub fn keys(&self) -> Vec<Bytes> {
        self.state.read().index.keys()
    }

    /// Snapshot of all values, in no particular order
    pub fn values(&self) -> Vec<Bytes> {
        self.state.read().index.values()
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Create or overwrite a key
    pub fn put(&self, key: impl Into<Bytes>, value: impl Into<Bytes>) -> Result<()> {
        let entry = Entry::put(key, value);

        let mut state = self.state.write();
        state.index.insert(entry.key.clone(), entry.value.clone());
        state.writer.append(std::slice::from_ref(&entry))
    }

    /// Create or overwrite many keys
    ///
    /// The whole batch lands in the index first, then is logged one line
    /// per pair. A write error stops the batch part way: the log keeps the
    /// lines already written while the index holds all of them, until the
    /// next open replays the log.
    pub fn put_all<K, V>(&self, pairs: impl IntoIterator<Item = (K, V)>) -> Result<()>
    where
        K: Into<Bytes>,
        V: Into<Bytes>,
    {
        let entries = Entry::puts(pairs);

        let mut state = self.state.write();
        for entry in &entries {
            state.index.insert(entry.key.clone(), entry.value.clone());
        }
        state.writer.append(&entries)
    }

    /// Remove a key
    ///
    /// The delete is logged even when the key does not exist.
    pub fn delete(&self, key: impl Into<Bytes>) -> Result<()> {
        let entry = Entry::delete(key);

        let mut state = self.state.write();
        state.index.remove(&entry.key);
        state.writer.append(std::slice::from_ref(&entry))
    }

    /// Rewrite the log to one put per live key, backing up the old log
    /// to `{path}.bak`. Runs on open unless the log was just created; call
    /// it again to reclaim space.
    pub fn consolidate(&self) -> Result<()> {
        let mut state = self.state.write();
        let State { index, writer } = &mut *state;
        compaction::consolidate(index, writer, self.config.persistent)
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Push buffered entries to the file
    pub fn flush(&self) -> Result<()> {
        self.state.write().writer.flush()
    }

    /// Flush and release the file handle
    ///
    /// The store stays usable: the next mutation reopens the log. The
    /// handle is released even if this returns an error.
    pub fn close(&self) -> Result<()> {
        self.state.write().writer.close()
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Whether the log file handle is currently open
    pub fn is_open(&self) -> bool {
        self.state.read().writer.is_open()
    }

    /// Get the log file path
    pub fn path(&self) -> &Path {
        &self.config.path
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// What the replay on open ran into
    pub fn replay_stats(&self) -> ReplayStats {
        self.replay_stats
    }
}

impl Drop for Store {
    fn drop(&mut self) {
        if let Err(e) = self.state.get_mut().writer.close() {
            error!(path = %self.config.path.display(), error = %e, "failed to close log on drop");
        }
    }
}
