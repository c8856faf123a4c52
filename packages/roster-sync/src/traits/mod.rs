//! Core trait abstractions for the sync engine.
//!
//! These traits are the seams where sources, page retrieval, and ledger
//! persistence plug in.

pub mod adapter;
pub mod fetcher;
pub mod store;
