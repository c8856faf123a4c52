//! In-memory ledger store for testing and dry runs.

use std::sync::RwLock;

use crate::error::{LedgerError, LedgerResult};
use crate::traits::store::LedgerStore;
use crate::types::ledger::Ledger;

/// Ledger held in memory. Data is lost when the store is dropped.
#[derive(Default)]
pub struct MemoryLedgerStore {
    ledger: RwLock<Ledger>,
    saves: RwLock<usize>,
    fail_saves: bool,
}

impl MemoryLedgerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing ledger.
    pub fn with_ledger(ledger: Ledger) -> Self {
        Self {
            ledger: RwLock::new(ledger),
            ..Self::default()
        }
    }

    /// Make every `save` fail, to exercise publish failures.
    pub fn failing() -> Self {
        Self {
            fail_saves: true,
            ..Self::default()
        }
    }

    /// Current contents.
    pub fn snapshot(&self) -> Ledger {
        self.ledger.read().unwrap().clone()
    }

    /// Number of successful saves.
    pub fn save_count(&self) -> usize {
        *self.saves.read().unwrap()
    }
}

impl LedgerStore for MemoryLedgerStore {
    fn load(&self) -> Ledger {
        self.snapshot()
    }

    fn save(&self, ledger: &Ledger) -> LedgerResult<()> {
        if self.fail_saves {
            return Err(LedgerError::Io {
                path: "memory".into(),
                source: std::io::Error::new(std::io::ErrorKind::Other, "save disabled"),
            });
        }
        *self.ledger.write().unwrap() = ledger.clone();
        *self.saves.write().unwrap() += 1;
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::record::{InmateRecord, SourceId};

    #[test]
    fn test_save_then_load() {
        let store = MemoryLedgerStore::new();
        let ledger: Ledger = vec![InmateRecord::without_image("A", SourceId::new("crawford"))]
            .into_iter()
            .collect();

        store.save(&ledger).unwrap();
        assert_eq!(store.load(), ledger);
        assert_eq!(store.save_count(), 1);
    }

    #[test]
    fn test_failing_store() {
        let store = MemoryLedgerStore::failing();
        assert!(store.save(&Ledger::new()).is_err());
        assert_eq!(store.save_count(), 0);
    }
}
