//! Testing utilities including mock implementations.
//!
//! Useful for exercising the sync pipeline without touching real county
//! sites.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use crate::error::{SourceError, SourceResult};
use crate::traits::adapter::{FetchOutcome, SourceAdapter};
use crate::traits::fetcher::PageFetcher;
use crate::types::record::{InmateRecord, SourceId};

/// Record fixture without an image.
pub fn record(name: &str, source: &str) -> InmateRecord {
    InmateRecord::without_image(name, SourceId::new(source))
}

/// Adapter returning a canned outcome.
///
/// # Example
///
/// ```rust
/// use roster_sync::testing::{record, MockAdapter};
///
/// let adapter = MockAdapter::ok("crawford", vec![record("John Smith", "crawford")]);
/// assert_eq!(adapter.call_count(), 0);
/// ```
#[derive(Clone)]
pub struct MockAdapter {
    id: SourceId,
    outcome: FetchOutcome,
    delay: Option<Duration>,
    calls: Arc<RwLock<usize>>,
}

impl MockAdapter {
    pub fn new(id: &str, outcome: FetchOutcome) -> Self {
        Self {
            id: SourceId::new(id),
            outcome,
            delay: None,
            calls: Arc::new(RwLock::new(0)),
        }
    }

    pub fn ok(id: &str, records: Vec<InmateRecord>) -> Self {
        Self::new(id, FetchOutcome::ok(records))
    }

    pub fn degraded(id: &str) -> Self {
        Self::new(id, FetchOutcome::degraded("expected markup missing", Vec::new()))
    }

    pub fn unavailable(id: &str) -> Self {
        Self::new(id, FetchOutcome::unavailable("connection refused"))
    }

    /// Sleep before answering, to exercise deadlines and concurrency.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of times fetch was called.
    pub fn call_count(&self) -> usize {
        *self.calls.read().unwrap()
    }
}

#[async_trait]
impl SourceAdapter for MockAdapter {
    fn source_id(&self) -> &SourceId {
        &self.id
    }

    async fn fetch(&self) -> FetchOutcome {
        *self.calls.write().unwrap() += 1;
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.outcome.clone()
    }
}

/// Canned failure for a URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockFailure {
    Timeout,
    Status(u16),
}

/// Page fetcher serving canned HTML by URL.
///
/// Unknown URLs answer with HTTP 404.
#[derive(Default, Clone)]
pub struct MockFetcher {
    pages: Arc<RwLock<HashMap<String, String>>>,
    failures: Arc<RwLock<HashMap<String, MockFailure>>>,
    calls: Arc<RwLock<Vec<String>>>,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `html` for `url` (builder pattern).
    pub fn with_page(self, url: &str, html: &str) -> Self {
        self.pages
            .write()
            .unwrap()
            .insert(url.to_string(), html.to_string());
        self
    }

    /// Fail requests for `url` (builder pattern).
    pub fn with_failure(self, url: &str, failure: MockFailure) -> Self {
        self.failures
            .write()
            .unwrap()
            .insert(url.to_string(), failure);
        self
    }

    /// URLs requested so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.read().unwrap().clone()
    }
}

#[async_trait]
impl PageFetcher for MockFetcher {
    async fn fetch_page(&self, url: &str) -> SourceResult<String> {
        self.calls.write().unwrap().push(url.to_string());

        let failure = self.failures.read().unwrap().get(url).copied();
        match failure {
            Some(MockFailure::Timeout) => {
                return Err(SourceError::Timeout {
                    url: url.to_string(),
                })
            }
            Some(MockFailure::Status(status)) => {
                return Err(SourceError::Status {
                    url: url.to_string(),
                    status,
                })
            }
            None => {}
        }

        self.pages
            .read()
            .unwrap()
            .get(url)
            .cloned()
            .ok_or_else(|| SourceError::Status {
                url: url.to_string(),
                status: 404,
            })
    }

    fn name(&self) -> &str {
        "mock"
    }
}
