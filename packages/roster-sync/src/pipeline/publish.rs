//! Commit-phase writes.
//!
//! Order: snapshot, newly-added delta, ledger, run metadata. Each file is
//! replaced atomically. The set of files is not transactional; if a later
//! write fails the earlier ones stay, and the run reports failure.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::Path;
use tracing::info;

use super::reconcile::Reconciliation;
use crate::config::OutputPaths;
use crate::error::{Artifact, PublishError};
use crate::stores::atomic::{to_pretty_json, write_atomic};
use crate::traits::store::LedgerStore;
use crate::types::metadata::RunMetadata;

pub struct Publisher {
    outputs: OutputPaths,
}

impl Publisher {
    pub fn new(outputs: OutputPaths) -> Self {
        Self { outputs }
    }

    pub fn outputs(&self) -> &OutputPaths {
        &self.outputs
    }

    /// Persist an approved reconciliation.
    ///
    /// Callers must not invoke this when `commit` is false.
    pub fn publish(
        &self,
        reconciliation: &Reconciliation,
        store: &dyn LedgerStore,
        now: DateTime<Utc>,
    ) -> Result<RunMetadata, PublishError> {
        debug_assert!(reconciliation.commit, "publish called on an aborted run");

        write_json(&self.outputs.snapshot, Artifact::Snapshot, &reconciliation.annotated)?;

        if let Some(path) = &self.outputs.newly_added {
            write_json(path, Artifact::NewlyAdded, &reconciliation.newly_added())?;
        }

        store.save(&reconciliation.ledger)?;

        let metadata = RunMetadata::at(now);
        write_json(&self.outputs.metadata, Artifact::Metadata, &metadata)?;

        info!(
            snapshot = %self.outputs.snapshot.display(),
            records = reconciliation.annotated.len(),
            ledger = reconciliation.ledger.len(),
            last_updated_at = %metadata.last_updated_at,
            "Published roster"
        );
        Ok(metadata)
    }
}

fn write_json<T: Serialize + ?Sized>(
    path: &Path,
    artifact: Artifact,
    value: &T,
) -> Result<(), PublishError> {
    let bytes =
        to_pretty_json(value).map_err(|source| PublishError::Encode { artifact, source })?;
    write_atomic(path, &bytes).map_err(|source| PublishError::Io {
        artifact,
        path: path.to_path_buf(),
        source,
    })
}
