//! The in-memory ledger of every identity ever observed.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::record::{IdentityKey, InmateRecord};

/// Mapping from identity key to the stored record.
///
/// Keeps insertion order so the persisted file reads oldest-first.
/// Equality compares as a map, ignoring order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ledger {
    entries: IndexMap<IdentityKey, InmateRecord>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&InmateRecord> {
        self.entries.get(key)
    }

    /// Insert a record unless its key is already present.
    ///
    /// Returns true when the record was inserted.
    pub fn insert_if_absent(&mut self, record: InmateRecord) -> bool {
        if self.entries.contains_key(&record.identity_key) {
            return false;
        }
        self.entries.insert(record.identity_key.clone(), record);
        true
    }

    /// Insert or replace the payload for a key, keeping its position.
    pub fn upsert(&mut self, record: InmateRecord) {
        self.entries.insert(record.identity_key.clone(), record);
    }

    pub fn keys(&self) -> impl Iterator<Item = &IdentityKey> {
        self.entries.keys()
    }

    pub fn records(&self) -> impl Iterator<Item = &InmateRecord> {
        self.entries.values()
    }

    /// True when every key of `other` is also present here.
    pub fn is_superset_of(&self, other: &Ledger) -> bool {
        other.keys().all(|k| self.contains(k.as_str()))
    }
}

impl FromIterator<InmateRecord> for Ledger {
    fn from_iter<T: IntoIterator<Item = InmateRecord>>(iter: T) -> Self {
        let mut ledger = Ledger::new();
        for record in iter {
            ledger.upsert(record);
        }
        ledger
    }
}
