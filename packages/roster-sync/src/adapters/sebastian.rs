//! Sebastian County Adult Detention Center roster.
//!
//! Everything lives in one `table.inmate-table`; each body row carries the
//! name in `td.col-md-4` and an optional thumbnail.

use async_trait::async_trait;
use scraper::Html;
use std::sync::Arc;
use tracing::{info, warn};
use url::Url;

use super::{element_text, parse_base, resolve, selector};
use crate::config::{SebastianEndpoint, SEBASTIAN};
use crate::error::{SourceError, SourceResult};
use crate::traits::adapter::{FetchOutcome, SourceAdapter};
use crate::traits::fetcher::PageFetcher;
use crate::types::record::{InmateRecord, SourceId, NO_IMAGE};

const TABLE: &str = "table.inmate-table";
const ROW: &str = "table.inmate-table > tbody > tr";
const NAME_CELL: &str = "td.col-md-4";
const IMAGE: &str = "img[src]";

pub struct SebastianAdapter {
    id: SourceId,
    listing_url: String,
    image_base: Url,
    fetcher: Arc<dyn PageFetcher>,
}

impl SebastianAdapter {
    pub fn new(endpoint: &SebastianEndpoint, fetcher: Arc<dyn PageFetcher>) -> SourceResult<Self> {
        Ok(Self {
            id: SourceId::new(SEBASTIAN),
            listing_url: endpoint.listing_url.clone(),
            image_base: parse_base(&endpoint.image_base)?,
            fetcher,
        })
    }

    /// Extract records from the listing table.
    ///
    /// A missing table is a layout change; a present but empty table is a
    /// legitimate empty roster.
    fn parse_listing(&self, html: &str) -> SourceResult<Vec<InmateRecord>> {
        let document = Html::parse_document(html);
        let table_selector = selector(TABLE)?;
        let row_selector = selector(ROW)?;
        let name_selector = selector(NAME_CELL)?;
        let image_selector = selector(IMAGE)?;

        if document.select(&table_selector).next().is_none() {
            return Err(SourceError::StructureChanged {
                marker: TABLE.to_string(),
            });
        }

        let mut records = Vec::new();
        for row in document.select(&row_selector) {
            let Some(name_cell) = row.select(&name_selector).next() else {
                continue;
            };

            let image_url = row
                .select(&image_selector)
                .next()
                .and_then(|img| img.value().attr("src"))
                .and_then(|src| match resolve(&self.image_base, src) {
                    Ok(url) => Some(url),
                    Err(e) => {
                        warn!(source = %self.id, src = %src, error = %e, "Unusable image source");
                        None
                    }
                })
                .unwrap_or_else(|| NO_IMAGE.to_string());

            records.push(InmateRecord::new(
                element_text(name_cell),
                self.id.clone(),
                image_url,
            ));
        }

        Ok(records)
    }

    async fn scrape(&self) -> SourceResult<Vec<InmateRecord>> {
        info!(source = %self.id, url = %self.listing_url, "Scraping roster");
        let html = self.fetcher.fetch_page(&self.listing_url).await?;
        let records = self.parse_listing(&html)?;
        info!(source = %self.id, count = records.len(), "Found inmates");
        Ok(records)
    }
}

#[async_trait]
impl SourceAdapter for SebastianAdapter {
    fn source_id(&self) -> &SourceId {
        &self.id
    }

    async fn fetch(&self) -> FetchOutcome {
        FetchOutcome::from_result(self.scrape().await)
    }
}
