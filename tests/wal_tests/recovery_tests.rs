//! Tests for log replay
//!
//! These tests verify:
//! - Persistence off and missing files start empty
//! - Puts and deletes apply in file order, last writer wins
//! - Corrupt lines and unknown actions are skipped and counted
//! - Replay matches a model map for arbitrary operation sequences
//! - Order does not matter when every key appears once

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use gdstore::wal::{Entry, LogRecovery, LogWriter, ReplayStats};
use gdstore::Config;
use proptest::prelude::*;
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_temp_log() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let log_path = temp_dir.path().join("test.data");
    (temp_dir, log_path)
}

fn config_for(path: &PathBuf) -> Config {
    Config::builder().path(path).build()
}

fn write_entries(path: &PathBuf, entries: &[Entry]) {
    let mut writer = LogWriter::new(&config_for(path));
    writer.append(entries).unwrap();
    writer.close().unwrap();
}

// =============================================================================
// Startup Cases
// =============================================================================

#[test]
fn test_replay_persistence_off() {
    let (_temp, log_path) = setup_temp_log();
    let config = Config::builder().path(&log_path).persistent(false).build();

    let (index, stats) = LogRecovery::replay(&config).unwrap();

    assert!(index.is_empty());
    assert_eq!(stats, ReplayStats::default());
    assert!(!log_path.exists());
}

#[test]
fn test_replay_missing_file_creates_it() {
    let (_temp, log_path) = setup_temp_log();

    let (index, stats) = LogRecovery::replay(&config_for(&log_path)).unwrap();

    assert!(index.is_empty());
    assert!(stats.log_created);
    assert_eq!(stats.entries_applied, 0);
    assert!(log_path.exists());
    assert_eq!(fs::read_to_string(&log_path).unwrap(), "");
}

#[test]
fn test_replay_missing_directory_fails() {
    let (_temp, log_path) = setup_temp_log();
    let bad_path = log_path.join("nested").join("test.data");

    assert!(LogRecovery::replay(&config_for(&bad_path)).is_err());
}

// =============================================================================
// Apply Semantics
// =============================================================================

#[test]
fn test_replay_last_writer_wins() {
    let (_temp, log_path) = setup_temp_log();
    write_entries(
        &log_path,
        &[
            Entry::put("a", "1"),
            Entry::put("b", "2"),
            Entry::put("a", "3"),
            Entry::delete("b"),
            Entry::delete("never-existed"),
            Entry::put("c", ""),
        ],
    );

    let (index, stats) = LogRecovery::replay(&config_for(&log_path)).unwrap();

    assert_eq!(index.len(), 2);
    assert_eq!(index.get(b"a").unwrap(), &b"3"[..]);
    assert!(index.get(b"b").is_none());
    assert!(index.get(b"c").unwrap().is_empty());
    assert_eq!(stats.entries_applied, 6);
    assert_eq!(stats.lines_skipped, 0);
}

#[test]
fn test_replay_delete_then_put() {
    let (_temp, log_path) = setup_temp_log();
    write_entries(
        &log_path,
        &[Entry::put("k", "1"), Entry::delete("k"), Entry::put("k", "2")],
    );

    let (index, _) = LogRecovery::replay(&config_for(&log_path)).unwrap();

    assert_eq!(index.get(b"k").unwrap(), &b"2"[..]);
}

#[test]
fn test_replay_twice_is_deterministic() {
    let (_temp, log_path) = setup_temp_log();
    write_entries(
        &log_path,
        &[Entry::put("a", "1"), Entry::put("b", "2"), Entry::delete("a")],
    );

    let (first, _) = LogRecovery::replay(&config_for(&log_path)).unwrap();
    let (second, _) = LogRecovery::replay(&config_for(&log_path)).unwrap();

    assert_eq!(first, second);
}

// =============================================================================
// Corruption Tolerance
// =============================================================================

#[test]
fn test_replay_skips_corrupt_lines() {
    let (_temp, log_path) = setup_temp_log();
    fs::write(
        &log_path,
        "SET,YQ==,MQ==\n\
         garbage\n\
         SET,@@@,MQ==\n\
         \n\
         SET,Yg==,Mg==\n\
         SET,Yw==",
    )
    .unwrap();

    let (index, stats) = LogRecovery::replay(&config_for(&log_path)).unwrap();

    assert_eq!(index.len(), 2);
    assert_eq!(index.get(b"a").unwrap(), &b"1"[..]);
    assert_eq!(index.get(b"b").unwrap(), &b"2"[..]);
    assert_eq!(
        stats,
        ReplayStats {
            entries_applied: 2,
            lines_skipped: 4,
            unknown_actions: 0,
            log_created: false,
        }
    );
}

#[test]
fn test_replay_ignores_unknown_actions() {
    let (_temp, log_path) = setup_temp_log();
    fs::write(&log_path, "SET,YQ==,MQ==\nPUT,Yg==,Mg==\nREMOVE,YQ==,\n").unwrap();

    let (index, stats) = LogRecovery::replay(&config_for(&log_path)).unwrap();

    assert_eq!(index.len(), 1);
    assert_eq!(index.get(b"a").unwrap(), &b"1"[..]);
    assert_eq!(stats.entries_applied, 1);
    assert_eq!(stats.unknown_actions, 2);
    assert_eq!(stats.lines_skipped, 0);
}

#[test]
fn test_replay_crlf_lines() {
    let (_temp, log_path) = setup_temp_log();
    fs::write(&log_path, "SET,YQ==,MQ==\r\nSET,Yg==,Mg==\r\n").unwrap();

    let (index, stats) = LogRecovery::replay(&config_for(&log_path)).unwrap();

    assert_eq!(index.len(), 2);
    assert_eq!(stats.lines_skipped, 0);
}

// =============================================================================
// Property Tests
// =============================================================================

#[derive(Debug, Clone)]
enum Op {
    Put(u8, Vec<u8>),
    Delete(u8),
}

fn arb_op() -> impl Strategy<Value = Op> {
    // A small key space so keys repeat and overwrite each other
    prop_oneof![
        3 => (0u8..8, proptest::collection::vec(any::<u8>(), 0..16))
            .prop_map(|(k, v)| Op::Put(k, v)),
        1 => (0u8..8).prop_map(Op::Delete),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_replay_matches_model(ops in proptest::collection::vec(arb_op(), 0..64)) {
        let (_temp, log_path) = setup_temp_log();

        let mut model: HashMap<Vec<u8>, Vec<u8>> = HashMap::new();
        let mut entries = Vec::new();
        for op in ops {
            match op {
                Op::Put(k, v) => {
                    model.insert(vec![k], v.clone());
                    entries.push(Entry::put(vec![k], v));
                }
                Op::Delete(k) => {
                    model.remove(&vec![k]);
                    entries.push(Entry::delete(vec![k]));
                }
            }
        }
        write_entries(&log_path, &entries);

        let (index, stats) = LogRecovery::replay(&config_for(&log_path)).unwrap();

        prop_assert_eq!(stats.entries_applied, entries.len() as u64);
        prop_assert_eq!(index.len(), model.len());
        for (key, value) in &model {
            prop_assert_eq!(index.get(key).map(|v| v.to_vec()), Some(value.clone()));
        }
    }
}

fn arb_distinct_entries() -> impl Strategy<Value = Vec<Entry>> {
    // A `None` value becomes a delete of a key that appears nowhere else
    proptest::collection::hash_map(
        proptest::collection::vec(any::<u8>(), 0..8),
        proptest::option::of(proptest::collection::vec(any::<u8>(), 0..16)),
        0..32,
    )
    .prop_map(|records| {
        records
            .into_iter()
            .map(|(key, value)| match value {
                Some(value) => Entry::put(key, value),
                None => Entry::delete(key),
            })
            .collect()
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_replay_ignores_order_of_distinct_keys(
        (entries, shuffled) in arb_distinct_entries()
            .prop_flat_map(|entries| (Just(entries.clone()), Just(entries).prop_shuffle()))
    ) {
        let (_temp, log_path) = setup_temp_log();
        let shuffled_path = log_path.with_extension("shuffled");
        write_entries(&log_path, &entries);
        write_entries(&shuffled_path, &shuffled);

        let (index, stats) = LogRecovery::replay(&config_for(&log_path)).unwrap();
        let (shuffled_index, shuffled_stats) =
            LogRecovery::replay(&config_for(&shuffled_path)).unwrap();

        prop_assert_eq!(stats, shuffled_stats);
        prop_assert_eq!(index, shuffled_index);
    }
}
