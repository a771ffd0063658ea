//! Document store adapters: in-memory (demo/tests) and SQLite.

pub mod demo_seed;
pub mod memory_store;
pub mod sqlite_store;

pub use memory_store::MemoryStore;
pub use sqlite_store::SqliteStore;
