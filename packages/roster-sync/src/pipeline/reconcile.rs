//! Reconciliation of a collected batch against the ledger.
//!
//! Decides whether the run commits. An empty batch never commits: when every
//! source failed, the previous snapshot and ledger must survive untouched.

use std::collections::HashSet;
use tracing::{debug, info};

use crate::config::LedgerPolicy;
use crate::types::ledger::Ledger;
use crate::types::record::{AnnotatedRecord, IdentityKey, InmateRecord};

/// Result of reconciling one batch.
#[derive(Debug, Clone)]
pub struct Reconciliation {
    /// The batch in collection order, each record tagged new or known
    pub annotated: Vec<AnnotatedRecord>,
    /// Superset of the input ledger
    pub ledger: Ledger,
    /// False only for an empty batch
    pub commit: bool,
}

impl Reconciliation {
    /// Records first seen this run, one per identity, in batch order.
    pub fn newly_added(&self) -> Vec<InmateRecord> {
        let mut seen = HashSet::new();
        self.annotated
            .iter()
            .filter(|a| a.is_new && seen.insert(a.key().clone()))
            .map(|a| a.record.clone())
            .collect()
    }

    pub fn new_count(&self) -> usize {
        self.newly_added().len()
    }
}

/// Tag each record and grow the ledger.
///
/// `is_new` is true iff the key was absent from `ledger` before this call,
/// so repeated keys within one batch are all tagged new. Under
/// `InsertOnly` the first occurrence wins; under `RefreshOnSight` the last
/// occurrence's payload is stored for keys that were already known.
pub fn reconcile(batch: Vec<InmateRecord>, mut ledger: Ledger, policy: LedgerPolicy) -> Reconciliation {
    if batch.is_empty() {
        return Reconciliation {
            annotated: Vec::new(),
            ledger,
            commit: false,
        };
    }

    let mut inserted: HashSet<IdentityKey> = HashSet::new();
    let mut annotated = Vec::with_capacity(batch.len());

    for record in batch {
        let key = record.identity_key.clone();
        let is_new = if inserted.contains(&key) {
            true
        } else if ledger.contains(key.as_str()) {
            if policy == LedgerPolicy::RefreshOnSight {
                ledger.upsert(record.clone());
            }
            false
        } else {
            info!(
                inmate = %record.display_name,
                source = %record.source_id,
                "New inmate found"
            );
            ledger.insert_if_absent(record.clone());
            inserted.insert(key);
            true
        };
        annotated.push(AnnotatedRecord::new(record, is_new));
    }

    debug!(
        batch = annotated.len(),
        inserted = inserted.len(),
        ledger = ledger.len(),
        "Reconciled batch"
    );

    Reconciliation {
        annotated,
        ledger,
        commit: true,
    }
}
