//! Crawford County Sheriff roster.
//!
//! The listing page has one `div.inmate-single` block per inmate with the
//! name in an `h2` that links to a detail page. The photo only appears on
//! the detail page, so every inmate costs one extra request.

use async_trait::async_trait;
use scraper::Html;
use std::sync::Arc;
use tracing::{debug, info, warn};
use url::Url;

use super::{element_text, parse_base, resolve, selector};
use crate::config::{CrawfordEndpoint, DetailFailure, CRAWFORD};
use crate::error::{SourceError, SourceResult};
use crate::traits::adapter::{FetchOutcome, SourceAdapter};
use crate::traits::fetcher::PageFetcher;
use crate::types::record::{InmateRecord, SourceId, NO_IMAGE};

const BLOCK: &str = "div.inmate-single";
const NAME: &str = "h2";
const DETAIL_LINK: &str = "a[href]";
const PHOTO: &str = "div.inmate-photo img[src]";

/// One listing block before its detail page is visited.
#[derive(Debug, Clone, PartialEq)]
struct ListingEntry {
    name: String,
    detail_url: Option<String>,
}

pub struct CrawfordAdapter {
    id: SourceId,
    listing_url: String,
    site_base: Url,
    fetcher: Arc<dyn PageFetcher>,
    detail_failure: DetailFailure,
}

impl CrawfordAdapter {
    pub fn new(
        endpoint: &CrawfordEndpoint,
        fetcher: Arc<dyn PageFetcher>,
        detail_failure: DetailFailure,
    ) -> SourceResult<Self> {
        Ok(Self {
            id: SourceId::new(CRAWFORD),
            listing_url: endpoint.listing_url.clone(),
            site_base: parse_base(&endpoint.site_base)?,
            fetcher,
            detail_failure,
        })
    }

    /// Extract names and detail links from the listing page.
    ///
    /// A page without a single inmate block is treated as a layout change,
    /// never as an empty jail.
    fn parse_listing(&self, html: &str) -> SourceResult<Vec<ListingEntry>> {
        let document = Html::parse_document(html);
        let block_selector = selector(BLOCK)?;
        let name_selector = selector(NAME)?;
        let link_selector = selector(DETAIL_LINK)?;

        let mut blocks = document.select(&block_selector).peekable();
        if blocks.peek().is_none() {
            return Err(SourceError::StructureChanged {
                marker: BLOCK.to_string(),
            });
        }

        let mut entries = Vec::new();
        for block in blocks {
            let Some(name_tag) = block.select(&name_selector).next() else {
                debug!(source = %self.id, "Inmate block without a name heading, skipping");
                continue;
            };

            let detail_url = name_tag
                .select(&link_selector)
                .next()
                .and_then(|a| a.value().attr("href"))
                .and_then(|href| match resolve(&self.site_base, href) {
                    Ok(url) => Some(url),
                    Err(e) => {
                        warn!(source = %self.id, href = %href, error = %e, "Unusable detail link");
                        None
                    }
                });

            entries.push(ListingEntry {
                name: element_text(name_tag),
                detail_url,
            });
        }

        Ok(entries)
    }

    /// Photo URL from a detail page, or the no-image sentinel.
    fn parse_photo(&self, html: &str) -> SourceResult<String> {
        let document = Html::parse_document(html);
        let photo_selector = selector(PHOTO)?;

        let src = document
            .select(&photo_selector)
            .next()
            .and_then(|img| img.value().attr("src"));

        match src {
            Some(src) => resolve(&self.site_base, src),
            None => Ok(NO_IMAGE.to_string()),
        }
    }

    async fn lookup_image(&self, entry: &ListingEntry) -> SourceResult<String> {
        let url = entry
            .detail_url
            .as_deref()
            .ok_or_else(|| SourceError::StructureChanged {
                marker: format!("{} {}", NAME, DETAIL_LINK),
            })?;
        let html = self.fetcher.fetch_page(url).await?;
        self.parse_photo(&html)
    }

    async fn scrape(&self) -> SourceResult<Vec<InmateRecord>> {
        info!(source = %self.id, url = %self.listing_url, "Scraping roster");
        let html = self.fetcher.fetch_page(&self.listing_url).await?;
        let entries = self.parse_listing(&html)?;

        let mut records = Vec::with_capacity(entries.len());
        for entry in entries {
            match self.lookup_image(&entry).await {
                Ok(image_url) => {
                    records.push(InmateRecord::new(entry.name, self.id.clone(), image_url));
                }
                Err(e) => {
                    warn!(
                        source = %self.id,
                        inmate = %entry.name,
                        error = %e,
                        "Could not fetch details"
                    );
                    if self.detail_failure == DetailFailure::Placeholder {
                        records.push(InmateRecord::without_image(entry.name, self.id.clone()));
                    }
                }
            }
        }

        info!(source = %self.id, count = records.len(), "Found inmates");
        Ok(records)
    }
}

#[async_trait]
impl SourceAdapter for CrawfordAdapter {
    fn source_id(&self) -> &SourceId {
        &self.id
    }

    async fn fetch(&self) -> FetchOutcome {
        FetchOutcome::from_result(self.scrape().await)
    }
}
