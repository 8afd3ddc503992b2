//! Persistence backends for Reelforge.
//!
//! Two implementations of [`reelforge_core::StudioStore`]:
//! - [`SqliteStore`] — single-file SQLite via sqlx, WAL mode, migrations run
//!   at open. The production backend.
//! - [`InMemoryStore`] — a `RwLock`-guarded map store for tests and
//!   ephemeral sessions.

pub mod in_memory;

#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use in_memory::InMemoryStore;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteStore;
