//! Append-only Log Module
//!
//! Persists every mutation as one text line and replays them at startup.
//!
//! ## Responsibilities
//! - Encode/decode a single entry to/from one line
//! - Append entries, directly or through a write buffer
//! - Replay the log into the in-memory index, skipping corrupt lines
//!
//! ## File Format
//! ```text
//! SET,a2V5MQ==,dmFsdWUx\n     put  key1 -> value1
//! SET,a2V5Mg==,dmFsdWUy\n     put  key2 -> value2
//! DEL,a2V5MQ==,\n             delete key1
//! ```

mod entry;
mod writer;
mod reader;
mod recovery;

pub use entry::{Action, Entry};
pub use writer::LogWriter;
pub use reader::{LogLine, LogReader};
pub use recovery::{LogRecovery, ReplayStats};
