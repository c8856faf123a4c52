//! JSON file ledger, the production backend.

use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::atomic::{to_pretty_json, write_atomic};
use crate::error::{LedgerError, LedgerResult};
use crate::traits::store::LedgerStore;
use crate::types::ledger::Ledger;

/// Ledger persisted as one pretty-printed JSON object keyed by identity key.
pub struct JsonLedgerStore {
    path: PathBuf,
}

impl JsonLedgerStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Strict load: `Ok(None)` when missing, `Err` when unreadable.
    pub fn try_load(&self) -> LedgerResult<Option<Ledger>> {
        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(LedgerError::Io {
                    path: self.path.clone(),
                    source: e,
                })
            }
        };
        let ledger = serde_json::from_slice(&bytes)?;
        Ok(Some(ledger))
    }
}

impl LedgerStore for JsonLedgerStore {
    fn load(&self) -> Ledger {
        match self.try_load() {
            Ok(Some(ledger)) => {
                info!(path = %self.path.display(), records = ledger.len(), "Loaded ledger");
                ledger
            }
            Ok(None) => {
                info!(path = %self.path.display(), "No ledger yet, starting with empty history");
                Ledger::new()
            }
            Err(e) => {
                warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Ledger unreadable, treating as empty history"
                );
                Ledger::new()
            }
        }
    }

    fn save(&self, ledger: &Ledger) -> LedgerResult<()> {
        let bytes = to_pretty_json(ledger)?;
        write_atomic(&self.path, &bytes).map_err(|e| LedgerError::Io {
            path: self.path.clone(),
            source: e,
        })?;
        debug!(path = %self.path.display(), records = ledger.len(), "Ledger saved");
        Ok(())
    }

    fn name(&self) -> &str {
        "json_file"
    }
}
