//! Source adapters for the county rosters.
//!
//! # Available Adapters
//!
//! - `CrawfordAdapter` - listing page plus one detail page per inmate
//! - `SebastianAdapter` - single listing table
//! - `MockAdapter` (in [`crate::testing`]) - canned outcomes for tests
//!
//! Adapters are registered in a fixed order by [`default_adapters`]; that
//! order is the source-major order of every published snapshot.

mod crawford;
mod sebastian;

use std::sync::Arc;

use scraper::{ElementRef, Selector};
use url::Url;

use crate::config::SyncConfig;
use crate::error::{SourceError, SourceResult};
use crate::traits::fetcher::PageFetcher;

pub use crawford::CrawfordAdapter;
pub use sebastian::SebastianAdapter;

// Re-export from traits for convenience
pub use crate::traits::adapter::{FetchOutcome, SourceAdapter, SourceStatus};

/// Build the registered adapters, in registration order, that the config
/// enables. All adapters share one fetcher.
pub fn default_adapters(
    config: &SyncConfig,
    fetcher: Arc<dyn PageFetcher>,
) -> SourceResult<Vec<Box<dyn SourceAdapter>>> {
    let registered: Vec<Box<dyn SourceAdapter>> = vec![
        Box::new(CrawfordAdapter::new(
            &config.endpoints.crawford,
            fetcher.clone(),
            config.detail_failure,
        )?),
        Box::new(SebastianAdapter::new(&config.endpoints.sebastian, fetcher)?),
    ];

    Ok(registered
        .into_iter()
        .filter(|adapter| config.is_enabled(adapter.source_id()))
        .collect())
}

pub(crate) fn selector(css: &str) -> SourceResult<Selector> {
    Selector::parse(css).map_err(|e| SourceError::Selector {
        css: css.to_string(),
        reason: format!("{:?}", e),
    })
}

pub(crate) fn parse_base(url: &str) -> SourceResult<Url> {
    Url::parse(url).map_err(|e| SourceError::InvalidUrl {
        url: url.to_string(),
        reason: e.to_string(),
    })
}

/// Resolve a possibly relative link against a base URL.
pub(crate) fn resolve(base: &Url, href: &str) -> SourceResult<String> {
    base.join(href.trim())
        .map(|u| u.to_string())
        .map_err(|e| SourceError::InvalidUrl {
            url: href.to_string(),
            reason: e.to_string(),
        })
}

/// Visible text of an element with whitespace runs collapsed.
pub(crate) fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockFetcher;
    use scraper::Html;

    #[test]
    fn test_registration_order_and_filter() {
        let fetcher: Arc<dyn PageFetcher> = Arc::new(MockFetcher::new());

        let all = default_adapters(&SyncConfig::default(), fetcher.clone()).unwrap();
        let ids: Vec<_> = all.iter().map(|a| a.source_id().to_string()).collect();
        assert_eq!(ids, vec!["crawford", "sebastian"]);

        let config = SyncConfig::default().with_sources(["sebastian"]);
        let filtered = default_adapters(&config, fetcher).unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].source_id().as_str(), "sebastian");
    }

    #[test]
    fn test_element_text_collapses_whitespace() {
        let html = Html::parse_fragment("<h2>\n  <a href=\"/x\">SMITH,   JOHN</a>\n</h2>");
        let h2 = selector("h2").unwrap();
        let el = html.select(&h2).next().unwrap();
        assert_eq!(element_text(el), "SMITH, JOHN");
    }

    #[test]
    fn test_resolve_relative_and_absolute() {
        let base = parse_base("https://inmates.example.org/").unwrap();
        assert_eq!(
            resolve(&base, "/inmate/42").unwrap(),
            "https://inmates.example.org/inmate/42"
        );
        assert_eq!(
            resolve(&base, "https://cdn.example.org/p.jpg").unwrap(),
            "https://cdn.example.org/p.jpg"
        );
    }
}
