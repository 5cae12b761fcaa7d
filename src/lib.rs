//! # GDStore
//!
//! An embedded persistent key-value map:
//! - Full in-memory index for reads
//! - Append-only text log for durability
//! - Replay on open, skipping corrupt lines
//! - Consolidation to bound log growth, keeping a `.bak` of the old log
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                         Store                                │
//! │          (RwLock over index + write handle)                  │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┼─────────────────┐
//!          │            │                 │
//!          ▼            ▼                 ▼
//!   ┌─────────────┐ ┌─────────────┐ ┌─────────────┐
//!   │    Index    │ │  LogWriter  │ │ Compaction  │
//!   │  (HashMap)  │ │  (Append)   │ │ (.bak+redo) │
//!   └─────────────┘ └──────┬──────┘ └─────────────┘
//!                          │
//!                          ▼
//!                  ┌───────────────┐
//!                  │   Log file    │◄── LogRecovery (replay on open)
//!                  │ SET,k,v / DEL │
//!                  └───────────────┘
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use gdstore::Store;
//!
//! let store = Store::open_path("gdstore.data")?;
//! store.put("greeting", "hello")?;
//! assert_eq!(store.get("greeting").as_deref(), Some(&b"hello"[..]));
//! store.close()?;
//! # Ok::<(), gdstore::StoreError>(())
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod wal;
pub mod index;
pub mod compaction;
pub mod store;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{Result, StoreError};
pub use config::Config;
pub use store::Store;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of GDStore
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
