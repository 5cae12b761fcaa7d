//! In-memory index
//!
//! The full key → value map the store serves reads from. It is a cache
//! of the log: applying every log entry in file order rebuilds it.
//!
//! Iteration order is whatever the hash map yields, so `keys`, `values`
//! and the entries written by consolidation come out unordered.

use std::collections::HashMap;

use bytes::Bytes;

use crate::wal::{Action, Entry};

/// Key → value map with last-writer-wins semantics
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Index {
    map: HashMap<Bytes, Bytes>,
}

impl Index {
    /// Create an empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a key
    pub fn get(&self, key: &[u8]) -> Option<&Bytes> {
        self.map.get(key)
    }

    /// Set a key, returning the previous value
    pub fn insert(&mut self, key: Bytes, value: Bytes) -> Option<Bytes> {
        self.map.insert(key, value)
    }

    /// Remove a key if present, returning its value
    pub fn remove(&mut self, key: &[u8]) -> Option<Bytes> {
        self.map.remove(key)
    }

    /// Apply one log entry.
    ///
    /// Returns `false` for an unrecognized action, which leaves the map as is.
    pub fn apply(&mut self, entry: Entry) -> bool {
        match entry.action {
            Action::Put => {
                self.map.insert(entry.key, entry.value);
                true
            }
            Action::Delete => {
                self.map.remove(&entry.key);
                true
            }
            Action::Other(_) => false,
        }
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Snapshot of all keys
    pub fn keys(&self) -> Vec<Bytes> {
        self.map.keys().cloned().collect()
    }

    /// Snapshot of all values
    pub fn values(&self) -> Vec<Bytes> {
        self.map.values().cloned().collect()
    }

    /// One put entry per live key: the minimal log for the current state
    pub fn to_entries(&self) -> Vec<Entry> {
        Entry::puts(self.map.iter().map(|(k, v)| (k.clone(), v.clone())))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Bytes, &Bytes)> {
        self.map.iter()
    }
}
