//! Identity normalization.
//!
//! Turns a display name plus source label into the ledger's primary key.
//! Spellings that normalize identically collapse to one key on purpose:
//! `"John Smith, Jr."` and `"JOHN SMITH JR"` are the same person at the same
//! facility. Two blank names from one source also collide; that is accepted.

use crate::types::record::{IdentityKey, SourceId};

/// Canonical fragment for a display name.
///
/// Uppercases, drops commas, turns each space into `_`, then keeps only
/// `[A-Z0-9_]`. Total: garbage in yields an empty fragment, never an error.
pub fn normalize(display_name: &str) -> String {
    display_name
        .to_uppercase()
        .chars()
        .filter(|c| *c != ',')
        .map(|c| if c == ' ' { '_' } else { c })
        .filter(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || *c == '_')
        .collect()
}

/// Ledger key for a name observed at a source: `FRAGMENT_source`.
pub fn identity_key(display_name: &str, source: &SourceId) -> IdentityKey {
    IdentityKey::from(format!("{}_{}", normalize(display_name), source))
}
