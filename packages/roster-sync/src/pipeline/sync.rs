//! One end-to-end sync run: load, collect, reconcile, publish.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info};

use super::collect::{Collector, SourceReport};
use super::publish::Publisher;
use super::reconcile::reconcile;
use crate::adapters::default_adapters;
use crate::config::{LedgerPolicy, SyncConfig};
use crate::error::Result;
use crate::fetchers::HttpFetcher;
use crate::stores::JsonLedgerStore;
use crate::traits::fetcher::PageFetcher;
use crate::traits::store::LedgerStore;

/// Exit status for a committed (or previewed) run.
pub const EXIT_COMMITTED: u8 = 0;
/// Exit status for a run aborted because nothing was collected.
pub const EXIT_ABORTED: u8 = 2;

/// Summary of a run that reached reconciliation with data.
#[derive(Debug, Clone, Serialize)]
pub struct SyncReport {
    pub total_records: usize,
    pub new_records: usize,
    pub ledger_size: usize,
    pub sources: Vec<SourceReport>,
    /// Set only when the run was published
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated_at: Option<String>,
}

/// What a run did.
#[derive(Debug, Clone)]
pub enum SyncOutcome {
    /// Snapshot, ledger, and metadata were republished.
    Committed(SyncReport),
    /// Reconciled but deliberately not written (dry run).
    Previewed(SyncReport),
    /// Nothing was collected; prior state was left untouched.
    Aborted { sources: Vec<SourceReport> },
}

impl SyncOutcome {
    pub fn is_committed(&self) -> bool {
        matches!(self, SyncOutcome::Committed(_))
    }

    pub fn exit_code(&self) -> u8 {
        match self {
            SyncOutcome::Committed(_) | SyncOutcome::Previewed(_) => EXIT_COMMITTED,
            SyncOutcome::Aborted { .. } => EXIT_ABORTED,
        }
    }

    pub fn sources(&self) -> &[SourceReport] {
        match self {
            SyncOutcome::Committed(report) | SyncOutcome::Previewed(report) => &report.sources,
            SyncOutcome::Aborted { sources } => sources,
        }
    }
}

/// The sync engine wired to its collaborators.
pub struct RosterSync<S: LedgerStore> {
    collector: Collector,
    store: S,
    publisher: Publisher,
    policy: LedgerPolicy,
    dry_run: bool,
}

impl RosterSync<JsonLedgerStore> {
    /// Production wiring: HTTP fetcher, registered adapters, JSON ledger.
    pub fn from_config(config: &SyncConfig) -> Result<Self> {
        let fetcher: Arc<dyn PageFetcher> =
            Arc::new(HttpFetcher::new(&config.user_agent, config.request_timeout)?);
        let adapters = default_adapters(config, fetcher)?;
        let collector =
            Collector::new(adapters, config.adapter_deadline).with_concurrency(config.concurrent);

        Ok(Self::new(
            collector,
            JsonLedgerStore::new(&config.outputs.ledger),
            Publisher::new(config.outputs.clone()),
            config.ledger_policy,
        ))
    }
}

impl<S: LedgerStore> RosterSync<S> {
    pub fn new(collector: Collector, store: S, publisher: Publisher, policy: LedgerPolicy) -> Self {
        Self {
            collector,
            store,
            publisher,
            policy,
            dry_run: false,
        }
    }

    /// Reconcile without writing anything.
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub async fn run(&self) -> Result<SyncOutcome> {
        self.run_at(Utc::now()).await
    }

    /// Run with an explicit commit timestamp.
    pub async fn run_at(&self, now: DateTime<Utc>) -> Result<SyncOutcome> {
        info!(store = self.store.name(), dry_run = self.dry_run, "Starting roster sync");

        let ledger = self.store.load();
        let collection = self.collector.collect_all().await;

        let reconciliation = reconcile(collection.records, ledger, self.policy);
        if !reconciliation.commit {
            error!(
                sources = collection.sources.len(),
                failed = collection.sources.iter().filter(|s| s.status.is_failure()).count(),
                "Aborted: no data collected, prior state preserved"
            );
            return Ok(SyncOutcome::Aborted {
                sources: collection.sources,
            });
        }

        let mut report = SyncReport {
            total_records: reconciliation.annotated.len(),
            new_records: reconciliation.new_count(),
            ledger_size: reconciliation.ledger.len(),
            sources: collection.sources,
            last_updated_at: None,
        };

        if self.dry_run {
            info!(
                total = report.total_records,
                new = report.new_records,
                "Dry run, nothing written"
            );
            return Ok(SyncOutcome::Previewed(report));
        }

        let metadata = self.publisher.publish(&reconciliation, &self.store, now)?;
        report.last_updated_at = Some(metadata.last_updated_at);

        info!(
            total = report.total_records,
            new = report.new_records,
            ledger = report.ledger_size,
            "Sync committed"
        );
        Ok(SyncOutcome::Committed(report))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputPaths;
    use crate::stores::MemoryLedgerStore;
    use crate::testing::{record, MockAdapter};
    use crate::types::ledger::Ledger;
    use std::time::Duration;

    fn engine(
        adapters: Vec<Box<dyn crate::traits::adapter::SourceAdapter>>,
        store: MemoryLedgerStore,
        dir: &std::path::Path,
    ) -> RosterSync<MemoryLedgerStore> {
        RosterSync::new(
            Collector::new(adapters, Duration::from_secs(5)),
            store,
            Publisher::new(OutputPaths::in_dir(dir)),
            LedgerPolicy::InsertOnly,
        )
    }

    #[tokio::test]
    async fn test_abort_leaves_store_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let ledger: Ledger = vec![record("John Smith", "crawford")].into_iter().collect();
        let sync = engine(
            vec![
                Box::new(MockAdapter::unavailable("crawford")),
                Box::new(MockAdapter::ok("sebastian", vec![])),
            ],
            MemoryLedgerStore::with_ledger(ledger.clone()),
            dir.path(),
        );

        let outcome = sync.run().await.unwrap();
        assert!(matches!(outcome, SyncOutcome::Aborted { .. }));
        assert_eq!(outcome.exit_code(), EXIT_ABORTED);
        assert_eq!(sync.store().save_count(), 0);
        assert_eq!(sync.store().snapshot(), ledger);
        assert!(!dir.path().join("snapshot.json").exists());
    }

    #[tokio::test]
    async fn test_dry_run_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let sync = engine(
            vec![Box::new(MockAdapter::ok("crawford", vec![record("A", "crawford")]))],
            MemoryLedgerStore::new(),
            dir.path(),
        )
        .with_dry_run(true);

        let outcome = sync.run().await.unwrap();
        match outcome {
            SyncOutcome::Previewed(report) => {
                assert_eq!(report.new_records, 1);
                assert!(report.last_updated_at.is_none());
            }
            other => panic!("expected preview, got {:?}", other),
        }
        assert_eq!(sync.store().save_count(), 0);
        assert!(!dir.path().join("snapshot.json").exists());
    }

    #[tokio::test]
    async fn test_publish_failure_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let sync = engine(
            vec![Box::new(MockAdapter::ok("crawford", vec![record("A", "crawford")]))],
            MemoryLedgerStore::failing(),
            dir.path(),
        );

        assert!(sync.run().await.is_err());
        assert!(!dir.path().join("last_updated.json").exists());
    }
}
