//! The sync pipeline.
//!
//! ```text
//! adapters ──► Collector ──► reconcile(batch, ledger) ──► Publisher
//!                                   ▲                        │
//!                                   └──── LedgerStore ◄──────┘
//! ```

pub mod collect;
pub mod publish;
pub mod reconcile;
pub mod sync;

pub use collect::{Collection, Collector, SourceReport};
pub use publish::Publisher;
pub use reconcile::{reconcile, Reconciliation};
pub use sync::{RosterSync, SyncOutcome, SyncReport, EXIT_ABORTED, EXIT_COMMITTED};
