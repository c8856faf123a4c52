//! Ledger storage implementations.
//!
//! Available backends:
//! - `JsonLedgerStore` - pretty-printed JSON file, atomically replaced
//! - `MemoryLedgerStore` - in-memory storage for tests

pub mod atomic;
pub mod json_file;
pub mod memory;

pub use json_file::JsonLedgerStore;
pub use memory::MemoryLedgerStore;
