//! Log Recovery
//!
//! Rebuilds the in-memory index by replaying the log at startup.

use std::fs::File;
use std::io::ErrorKind;

use tracing::{info, warn};

use crate::config::Config;
use crate::error::{Result, StoreError};
use crate::index::Index;

use super::{Action, LogReader};

/// What a replay ran into
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReplayStats {
    /// Entries applied to the index (puts and deletes)
    pub entries_applied: u64,

    /// Lines that failed to decode and were skipped
    pub lines_skipped: u64,

    /// Decoded entries whose action token was not recognized
    pub unknown_actions: u64,

    /// No log existed, so an empty one was created
    pub log_created: bool,
}

/// Replays the log into an index
pub struct LogRecovery;

impl LogRecovery {
    /// Rebuild the index from the log at `config.path`.
    ///
    /// This will:
    /// 1. Return an empty index when persistence is off
    /// 2. Create an empty log if none exists
    /// 3. Otherwise apply every decodable line in file order
    ///
    /// Corrupt lines are skipped, never surfaced as errors. Entries with
    /// an unknown action are ignored the same way. I/O failures while
    /// opening or reading are returned.
    pub fn replay(config: &Config) -> Result<(Index, ReplayStats)> {
        let mut index = Index::new();
        let mut stats = ReplayStats::default();

        if !config.persistent {
            return Ok((index, stats));
        }

        let path = config.path.as_path();
        let reader = match LogReader::open(path) {
            Ok(reader) => reader,
            Err(StoreError::Io { source, .. }) if source.kind() == ErrorKind::NotFound => {
                File::create(path).map_err(StoreError::io(path))?;
                info!(path = %path.display(), "created empty log");
                stats.log_created = true;
                return Ok((index, stats));
            }
            Err(e) => return Err(e),
        };

        for line in reader {
            let line = line?;
            let entry = match line.entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(line = line.number, error = %e, "skipping corrupt log line");
                    stats.lines_skipped += 1;
                    continue;
                }
            };

            if let Action::Other(token) = &entry.action {
                warn!(line = line.number, token = %token, "ignoring unknown log action");
                stats.unknown_actions += 1;
                continue;
            }

            index.apply(entry);
            stats.entries_applied += 1;
        }

        info!(
            path = %path.display(),
            keys = index.len(),
            applied = stats.entries_applied,
            skipped = stats.lines_skipped,
            unknown = stats.unknown_actions,
            "replayed log"
        );

        Ok((index, stats))
    }
}
