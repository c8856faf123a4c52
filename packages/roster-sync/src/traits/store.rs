//! Ledger storage trait.

use crate::error::LedgerResult;
use crate::types::ledger::Ledger;

/// Durable home of the ledger.
///
/// `load` never fails a run: a missing or unreadable ledger is "no history".
/// `save` replaces the persisted ledger wholesale and must be atomic, so an
/// interrupted save leaves the previous ledger intact.
pub trait LedgerStore: Send + Sync {
    fn load(&self) -> Ledger;

    fn save(&self, ledger: &Ledger) -> LedgerResult<()>;

    /// Get the store name (for logging/debugging).
    fn name(&self) -> &str {
        "unknown"
    }
}
