//! Source adapter trait for pluggable roster sources.
//!
//! Every county site is wrapped in an adapter that produces zero or more
//! records plus a status. Site-specific markup rules, pagination, and
//! detail-page traversal stay inside the adapter; the collector only sees
//! this contract.
//!
//! # Usage
//!
//! ```rust,ignore
//! use roster_sync::traits::adapter::{SourceAdapter, SourceStatus};
//!
//! let outcome = adapter.fetch().await;
//! if outcome.status == SourceStatus::Ok {
//!     println!("{} listed {} inmates", adapter.source_id(), outcome.records.len());
//! }
//! ```

use async_trait::async_trait;
use serde::Serialize;

use crate::error::{SourceError, SourceResult};
use crate::types::record::{InmateRecord, SourceId};

/// How a source fared during one fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceStatus {
    /// Listing extracted. Zero records is a legitimate answer.
    Ok,
    /// The site answered but expected markup was missing.
    Degraded,
    /// The site could not be reached within its time box.
    Unavailable,
}

impl SourceStatus {
    pub fn is_failure(&self) -> bool {
        !matches!(self, SourceStatus::Ok)
    }
}

/// Records plus status from one adapter invocation.
#[derive(Debug, Clone)]
pub struct FetchOutcome {
    pub records: Vec<InmateRecord>,
    pub status: SourceStatus,
    /// Human-readable cause for non-`Ok` statuses
    pub reason: Option<String>,
}

impl FetchOutcome {
    pub fn ok(records: Vec<InmateRecord>) -> Self {
        Self {
            records,
            status: SourceStatus::Ok,
            reason: None,
        }
    }

    /// Layout changed; `salvaged` is whatever could still be extracted.
    pub fn degraded(reason: impl Into<String>, salvaged: Vec<InmateRecord>) -> Self {
        Self {
            records: salvaged,
            status: SourceStatus::Degraded,
            reason: Some(reason.into()),
        }
    }

    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            records: Vec::new(),
            status: SourceStatus::Unavailable,
            reason: Some(reason.into()),
        }
    }

    /// Map a scrape result onto the three-way status.
    ///
    /// Structural errors become `Degraded`; everything else is `Unavailable`.
    pub fn from_result(result: SourceResult<Vec<InmateRecord>>) -> Self {
        match result {
            Ok(records) => Self::ok(records),
            Err(e) => Self::from_error(&e),
        }
    }

    pub fn from_error(error: &SourceError) -> Self {
        if error.is_structural() {
            Self::degraded(error.to_string(), Vec::new())
        } else {
            Self::unavailable(error.to_string())
        }
    }
}

/// A roster source.
///
/// Implementations must time-box every network call they make and must
/// not fail the whole source because one record's detail lookup failed.
#[async_trait]
pub trait SourceAdapter: Send + Sync {
    /// Stable label stamped on every record this adapter produces.
    fn source_id(&self) -> &SourceId;

    /// Pull the current listing.
    async fn fetch(&self) -> FetchOutcome;
}
