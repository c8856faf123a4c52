//! Collection across every registered adapter.
//!
//! Failures are contained per source: a degraded or unreachable source
//! contributes nothing and the remaining adapters still run. Output order is
//! source-major in registration order, whether or not adapters run
//! concurrently.

use futures::future::join_all;
use serde::Serialize;
use std::time::Duration;
use tracing::{info, warn};

use crate::traits::adapter::{FetchOutcome, SourceAdapter, SourceStatus};
use crate::types::record::{InmateRecord, SourceId};

/// How one source fared during collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceReport {
    pub source: SourceId,
    pub status: SourceStatus,
    pub record_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Aggregated records plus a per-source report.
#[derive(Debug, Clone, Default)]
pub struct Collection {
    pub records: Vec<InmateRecord>,
    pub sources: Vec<SourceReport>,
}

impl Collection {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn failed_sources(&self) -> impl Iterator<Item = &SourceReport> {
        self.sources.iter().filter(|s| s.status.is_failure())
    }
}

pub struct Collector {
    adapters: Vec<Box<dyn SourceAdapter>>,
    deadline: Duration,
    concurrent: bool,
}

impl Collector {
    /// Create a collector; `deadline` bounds each adapter's whole fetch.
    pub fn new(adapters: Vec<Box<dyn SourceAdapter>>, deadline: Duration) -> Self {
        Self {
            adapters,
            deadline,
            concurrent: false,
        }
    }

    /// Run adapters concurrently instead of one after another.
    pub fn with_concurrency(mut self, concurrent: bool) -> Self {
        self.concurrent = concurrent;
        self
    }

    pub fn adapter_count(&self) -> usize {
        self.adapters.len()
    }

    /// Invoke every adapter and concatenate their records, source-major.
    pub async fn collect_all(&self) -> Collection {
        info!(
            adapters = self.adapters.len(),
            concurrent = self.concurrent,
            "Collecting rosters"
        );

        let outcomes: Vec<FetchOutcome> = if self.concurrent {
            join_all(self.adapters.iter().map(|a| self.run_adapter(a.as_ref()))).await
        } else {
            let mut outcomes = Vec::with_capacity(self.adapters.len());
            for adapter in &self.adapters {
                outcomes.push(self.run_adapter(adapter.as_ref()).await);
            }
            outcomes
        };

        let mut collection = Collection::default();
        for (adapter, outcome) in self.adapters.iter().zip(outcomes) {
            collection.sources.push(SourceReport {
                source: adapter.source_id().clone(),
                status: outcome.status,
                record_count: outcome.records.len(),
                reason: outcome.reason,
            });
            collection.records.extend(outcome.records);
        }

        info!(
            total = collection.records.len(),
            failed_sources = collection.failed_sources().count(),
            "Collection finished"
        );
        collection
    }

    async fn run_adapter(&self, adapter: &dyn SourceAdapter) -> FetchOutcome {
        let source = adapter.source_id();
        let outcome = match tokio::time::timeout(self.deadline, adapter.fetch()).await {
            Ok(outcome) => outcome,
            Err(_) => FetchOutcome::unavailable(format!(
                "adapter exceeded its {}s deadline",
                self.deadline.as_secs_f32()
            )),
        };

        match outcome.status {
            SourceStatus::Ok => {
                info!(source = %source, count = outcome.records.len(), "Source collected");
            }
            SourceStatus::Degraded => {
                warn!(
                    source = %source,
                    reason = outcome.reason.as_deref().unwrap_or("unknown"),
                    salvaged = outcome.records.len(),
                    maintenance = true,
                    "Source layout changed, adapter needs maintenance"
                );
            }
            SourceStatus::Unavailable => {
                warn!(
                    source = %source,
                    reason = outcome.reason.as_deref().unwrap_or("unknown"),
                    "Source unavailable"
                );
            }
        }

        outcome
    }
}
