//! Data types shared by every stage of a sync run.

pub mod ledger;
pub mod metadata;
pub mod record;
