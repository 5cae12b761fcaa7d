//! Configuration for GDStore
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;

/// Main configuration for a GDStore instance
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Storage Configuration
    // -------------------------------------------------------------------------
    /// Path of the append-only log file.
    /// Consolidation leaves the previous log next to it as `{path}.bak`.
    pub path: PathBuf,

    // -------------------------------------------------------------------------
    // Writer Configuration
    // -------------------------------------------------------------------------
    /// Write through an in-memory buffer instead of straight to the file.
    ///
    /// Much faster, but entries are only guaranteed on disk after
    /// `Store::flush` or `Store::close`. A crash before that loses them.
    pub buffered: bool,

    /// Persist to `path` at all. With `false` the store is an
    /// in-memory map and every log operation is a no-op (useful for tests).
    pub persistent: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            path: PathBuf::from("gdstore.data"),
            buffered: false,
            persistent: true,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the log file path
    pub fn path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.path = path.into();
        self
    }

    /// Enable or disable the write buffer
    pub fn buffered(mut self, buffered: bool) -> Self {
        self.config.buffered = buffered;
        self
    }

    /// Enable or disable persistence
    pub fn persistent(mut self, persistent: bool) -> Self {
        self.config.persistent = persistent;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
