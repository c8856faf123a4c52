//! County Detention Roster Sync
//!
//! Collects the current inmate listings from several county detention
//! websites, works out who is new relative to a durable ledger, and
//! publishes a consistent snapshot plus a newly-seen delta.
//!
//! # Guarantees
//!
//! - A run that collects nothing never writes anything: the previous
//!   snapshot, ledger, and timestamp survive intact.
//! - One failing source never stops the others.
//! - Each output file is replaced atomically, so an interrupted run leaves
//!   the last committed ledger readable.
//!
//! # Usage
//!
//! ```rust,ignore
//! use roster_sync::{RosterSync, SyncConfig, SyncOutcome};
//!
//! let config = SyncConfig::from_env()?.with_output_dir("public/data");
//! let sync = RosterSync::from_config(&config)?;
//!
//! match sync.run().await? {
//!     SyncOutcome::Committed(report) => println!("{} new", report.new_records),
//!     SyncOutcome::Aborted { .. } => eprintln!("no data collected"),
//!     SyncOutcome::Previewed(_) => {}
//! }
//! ```
//!
//! # Modules
//!
//! - [`identity`] - Name normalization and identity keys
//! - [`traits`] - Adapter, fetcher, and ledger store seams
//! - [`adapters`] - County source adapters
//! - [`fetchers`] - Page retrieval (HTTP)
//! - [`stores`] - Ledger persistence (JSON file, memory)
//! - [`pipeline`] - Collect, reconcile, publish
//! - [`testing`] - Mock implementations for testing

pub mod adapters;
pub mod config;
pub mod error;
pub mod fetchers;
pub mod identity;
pub mod pipeline;
pub mod stores;
pub mod testing;
pub mod traits;
pub mod types;

// Re-export core types at crate root
pub use config::{DetailFailure, LedgerPolicy, OutputPaths, SyncConfig};
pub use error::{ConfigError, LedgerError, PublishError, SourceError, SyncError};
pub use identity::{identity_key, normalize};
pub use traits::{
    adapter::{FetchOutcome, SourceAdapter, SourceStatus},
    fetcher::PageFetcher,
    store::LedgerStore,
};
pub use types::{
    ledger::Ledger,
    metadata::RunMetadata,
    record::{AnnotatedRecord, IdentityKey, InmateRecord, SourceId, NO_IMAGE},
};

pub use adapters::{default_adapters, CrawfordAdapter, SebastianAdapter};
pub use fetchers::HttpFetcher;
pub use pipeline::{
    reconcile, Collection, Collector, Publisher, Reconciliation, RosterSync, SourceReport,
    SyncOutcome, SyncReport,
};
pub use stores::{JsonLedgerStore, MemoryLedgerStore};

// Re-export testing utilities
pub use testing::{MockAdapter, MockFetcher};
