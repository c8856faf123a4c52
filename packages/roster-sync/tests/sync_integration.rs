//! End-to-end sync runs against a real output directory.
//!
//! These tests verify the commit/abort contract:
//! 1. A run with data republishes snapshot, delta, ledger, and metadata
//! 2. A run without data leaves every file byte-identical
//! 3. A corrupt ledger is treated as empty history

use std::path::Path;
use std::time::Duration;

use chrono::{TimeZone, Utc};
use roster_sync::{
    testing::record, Collector, JsonLedgerStore, Ledger, LedgerPolicy, LedgerStore, MockAdapter,
    OutputPaths, Publisher, RosterSync, SourceAdapter, SourceStatus, SyncOutcome,
};

fn engine(dir: &Path, adapters: Vec<Box<dyn SourceAdapter>>) -> RosterSync<JsonLedgerStore> {
    let outputs = OutputPaths::in_dir(dir);
    RosterSync::new(
        Collector::new(adapters, Duration::from_secs(5)),
        JsonLedgerStore::new(&outputs.ledger),
        Publisher::new(outputs),
        LedgerPolicy::InsertOnly,
    )
}

fn read_json(path: &Path) -> serde_json::Value {
    serde_json::from_slice(&std::fs::read(path).unwrap()).unwrap()
}

#[tokio::test]
async fn test_known_and_new_inmates_are_published() {
    let dir = tempfile::tempdir().unwrap();
    let outputs = OutputPaths::in_dir(dir.path());

    let prior: Ledger = vec![record("John Smith", "crawford")].into_iter().collect();
    JsonLedgerStore::new(&outputs.ledger).save(&prior).unwrap();
    std::fs::write(
        &outputs.metadata,
        r#"{"lastUpdatedAt": "2026-10-17 06:00:00 UTC"}"#,
    )
    .unwrap();

    let sync = engine(
        dir.path(),
        vec![
            Box::new(MockAdapter::ok(
                "crawford",
                vec![record("John Smith", "crawford"), record("Jane Doe", "sebastian")],
            )),
            Box::new(MockAdapter::ok("sebastian", vec![])),
        ],
    );

    let now = Utc.with_ymd_and_hms(2026, 10, 18, 6, 0, 0).unwrap();
    let outcome = sync.run_at(now).await.unwrap();
    assert!(outcome.is_committed());
    assert_eq!(outcome.exit_code(), 0);

    let snapshot = read_json(&outputs.snapshot);
    let snapshot = snapshot.as_array().unwrap();
    assert_eq!(snapshot.len(), 2);
    assert_eq!(snapshot[0]["inmateId"], "JOHN_SMITH_crawford");
    assert_eq!(snapshot[0]["isNew"], false);
    assert_eq!(snapshot[1]["inmateId"], "JANE_DOE_sebastian");
    assert_eq!(snapshot[1]["isNew"], true);

    let ledger = JsonLedgerStore::new(&outputs.ledger).load();
    assert_eq!(ledger.len(), 2);
    assert!(ledger.contains("JOHN_SMITH_crawford"));
    assert!(ledger.contains("JANE_DOE_sebastian"));

    let delta = read_json(outputs.newly_added.as_ref().unwrap());
    assert_eq!(delta.as_array().unwrap().len(), 1);
    assert_eq!(delta[0]["name"], "Jane Doe");

    assert_eq!(
        read_json(&outputs.metadata)["lastUpdatedAt"],
        "2026-10-18 06:00:00 UTC"
    );
}

#[tokio::test]
async fn test_all_sources_failing_preserves_prior_state() {
    let dir = tempfile::tempdir().unwrap();
    let outputs = OutputPaths::in_dir(dir.path());

    let prior: Ledger = vec![record("John Smith", "crawford")].into_iter().collect();
    JsonLedgerStore::new(&outputs.ledger).save(&prior).unwrap();
    std::fs::write(&outputs.snapshot, "[]\n").unwrap();
    std::fs::write(
        &outputs.metadata,
        r#"{"lastUpdatedAt": "2026-10-17 06:00:00 UTC"}"#,
    )
    .unwrap();

    let before: Vec<Vec<u8>> = [&outputs.ledger, &outputs.snapshot, &outputs.metadata]
        .iter()
        .map(|p| std::fs::read(p).unwrap())
        .collect();

    let sync = engine(
        dir.path(),
        vec![
            Box::new(MockAdapter::unavailable("crawford")),
            Box::new(MockAdapter::unavailable("sebastian")),
        ],
    );

    let outcome = sync.run().await.unwrap();
    match &outcome {
        SyncOutcome::Aborted { sources } => {
            assert_eq!(sources.len(), 2);
            assert!(sources.iter().all(|s| s.status == SourceStatus::Unavailable));
        }
        other => panic!("expected abort, got {:?}", other),
    }
    assert_eq!(outcome.exit_code(), 2);

    let after: Vec<Vec<u8>> = [&outputs.ledger, &outputs.snapshot, &outputs.metadata]
        .iter()
        .map(|p| std::fs::read(p).unwrap())
        .collect();
    assert_eq!(before, after);
    assert!(!outputs.newly_added.as_ref().unwrap().exists());
}

#[tokio::test]
async fn test_empty_sources_on_first_run_write_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let sync = engine(
        dir.path(),
        vec![
            Box::new(MockAdapter::ok("crawford", vec![])),
            Box::new(MockAdapter::degraded("sebastian")),
        ],
    );

    let outcome = sync.run().await.unwrap();
    assert!(matches!(outcome, SyncOutcome::Aborted { .. }));
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_corrupt_ledger_is_treated_as_empty_history() {
    let dir = tempfile::tempdir().unwrap();
    let outputs = OutputPaths::in_dir(dir.path());
    std::fs::write(&outputs.ledger, "not json at all").unwrap();

    let sync = engine(
        dir.path(),
        vec![Box::new(MockAdapter::ok(
            "crawford",
            vec![record("John Smith", "crawford")],
        ))],
    );

    match sync.run().await.unwrap() {
        SyncOutcome::Committed(report) => {
            assert_eq!(report.new_records, 1);
            assert_eq!(report.ledger_size, 1);
        }
        other => panic!("expected commit, got {:?}", other),
    }
    assert_eq!(JsonLedgerStore::new(&outputs.ledger).load().len(), 1);
}

#[tokio::test]
async fn test_second_run_sees_nobody_new() {
    let dir = tempfile::tempdir().unwrap();
    let adapters = || -> Vec<Box<dyn SourceAdapter>> {
        vec![
            Box::new(MockAdapter::ok("crawford", vec![record("A", "crawford")])),
            Box::new(MockAdapter::ok("sebastian", vec![record("B", "sebastian")])),
        ]
    };

    let first = engine(dir.path(), adapters()).run().await.unwrap();
    let second = engine(dir.path(), adapters()).run().await.unwrap();

    match (first, second) {
        (SyncOutcome::Committed(a), SyncOutcome::Committed(b)) => {
            assert_eq!(a.new_records, 2);
            assert_eq!(b.new_records, 0);
            assert_eq!(b.ledger_size, 2);
        }
        other => panic!("expected two commits, got {:?}", other),
    }

    let delta = read_json(&dir.path().join("newly_added.json"));
    assert!(delta.as_array().unwrap().is_empty());
}
