//! Page fetching seam used by adapters.
//!
//! Direct HTTP retrieval and browser-rendered retrieval both reduce to
//! "give me the final markup for this URL". Adapters depend on this trait
//! only, so a rendering backend can replace `HttpFetcher` without touching
//! any extraction rules.

use async_trait::async_trait;

use crate::error::SourceResult;

#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch the final HTML for a URL, within the fetcher's time box.
    async fn fetch_page(&self, url: &str) -> SourceResult<String>;

    /// Get the fetcher name (for logging/debugging).
    fn name(&self) -> &str {
        "unknown"
    }
}
