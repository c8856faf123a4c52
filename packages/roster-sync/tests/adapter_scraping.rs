//! County adapters driven by canned pages.

use std::sync::Arc;

use roster_sync::config::{CrawfordEndpoint, SebastianEndpoint};
use roster_sync::testing::{MockFailure, MockFetcher};
use roster_sync::{
    CrawfordAdapter, DetailFailure, SebastianAdapter, SourceAdapter, SourceStatus, NO_IMAGE,
};

const CRAWFORD: &str = "https://crawford.test/";
const SEBASTIAN: &str = "https://sebastian.test/Inquiry/AR0660000";

const CRAWFORD_LISTING: &str = r#"
<html><body>
  <div class="inmate-single"><h2><a href="/inmate/1">SMITH, JOHN</a></h2></div>
  <div class="inmate-single"><h2><a href="/inmate/2">DOE, JANE</a></h2></div>
  <div class="inmate-single"><h2><a href="/inmate/3">ROE, RICHARD</a></h2></div>
</body></html>
"#;

fn crawford(fetcher: MockFetcher, policy: DetailFailure) -> CrawfordAdapter {
    CrawfordAdapter::new(
        &CrawfordEndpoint {
            listing_url: CRAWFORD.to_string(),
            site_base: CRAWFORD.to_string(),
        },
        Arc::new(fetcher),
        policy,
    )
    .unwrap()
}

fn sebastian(fetcher: MockFetcher) -> SebastianAdapter {
    SebastianAdapter::new(
        &SebastianEndpoint {
            listing_url: SEBASTIAN.to_string(),
            image_base: "https://sebastian.test/Inquiry/".to_string(),
        },
        Arc::new(fetcher),
    )
    .unwrap()
}

fn crawford_pages() -> MockFetcher {
    MockFetcher::new()
        .with_page(CRAWFORD, CRAWFORD_LISTING)
        .with_page(
            "https://crawford.test/inmate/1",
            r#"<div class="inmate-photo"><img src="/photos/1.jpg"></div>"#,
        )
        .with_page(
            "https://crawford.test/inmate/3",
            r#"<div class="inmate-photo"></div>"#,
        )
        .with_failure("https://crawford.test/inmate/2", MockFailure::Timeout)
}

#[tokio::test]
async fn test_crawford_skips_failed_detail_pages() {
    let fetcher = crawford_pages();
    let adapter = crawford(fetcher.clone(), DetailFailure::Skip);

    let outcome = adapter.fetch().await;
    assert_eq!(outcome.status, SourceStatus::Ok);

    let names: Vec<_> = outcome
        .records
        .iter()
        .map(|r| r.display_name.as_str())
        .collect();
    assert_eq!(names, vec!["SMITH, JOHN", "ROE, RICHARD"]);
    assert_eq!(
        outcome.records[0].image_url,
        "https://crawford.test/photos/1.jpg"
    );
    assert_eq!(outcome.records[1].image_url, NO_IMAGE);
    assert_eq!(outcome.records[0].identity_key.as_str(), "SMITH_JOHN_crawford");

    // Listing plus one detail request per inmate.
    assert_eq!(fetcher.calls().len(), 4);
}

#[tokio::test]
async fn test_crawford_placeholder_keeps_failed_detail_pages() {
    let adapter = crawford(crawford_pages(), DetailFailure::Placeholder);

    let outcome = adapter.fetch().await;
    assert_eq!(outcome.records.len(), 3);
    assert_eq!(outcome.records[1].display_name, "DOE, JANE");
    assert!(!outcome.records[1].has_image());
}

#[tokio::test]
async fn test_crawford_unreachable_listing() {
    let fetcher = MockFetcher::new().with_failure(CRAWFORD, MockFailure::Status(503));
    let outcome = crawford(fetcher, DetailFailure::Skip).fetch().await;

    assert_eq!(outcome.status, SourceStatus::Unavailable);
    assert!(outcome.records.is_empty());
    assert!(outcome.reason.unwrap().contains("503"));
}

#[tokio::test]
async fn test_crawford_layout_change_is_degraded() {
    let fetcher = MockFetcher::new().with_page(CRAWFORD, "<html><body>Redesigned!</body></html>");
    let outcome = crawford(fetcher, DetailFailure::Skip).fetch().await;

    assert_eq!(outcome.status, SourceStatus::Degraded);
    assert!(outcome.records.is_empty());
}

#[tokio::test]
async fn test_sebastian_listing() {
    let fetcher = MockFetcher::new().with_page(
        SEBASTIAN,
        r#"
        <table class="inmate-table">
          <tbody>
            <tr><td><img src="Photo/77"></td><td class="col-md-4">DOE, JANE</td></tr>
            <tr><td class="col-md-4">SMITH, JOHN</td></tr>
          </tbody>
        </table>
        "#,
    );
    let outcome = sebastian(fetcher).fetch().await;

    assert_eq!(outcome.status, SourceStatus::Ok);
    assert_eq!(outcome.records.len(), 2);
    assert_eq!(
        outcome.records[0].image_url,
        "https://sebastian.test/Inquiry/Photo/77"
    );
    assert_eq!(outcome.records[1].identity_key.as_str(), "SMITH_JOHN_sebastian");
}

#[tokio::test]
async fn test_sebastian_timeout_is_unavailable() {
    let fetcher = MockFetcher::new().with_failure(SEBASTIAN, MockFailure::Timeout);
    let outcome = sebastian(fetcher).fetch().await;

    assert_eq!(outcome.status, SourceStatus::Unavailable);
    assert!(outcome.reason.unwrap().contains("timeout"));
}

#[tokio::test]
async fn test_sebastian_missing_table_is_degraded() {
    let fetcher = MockFetcher::new().with_page(SEBASTIAN, "<p>Inquiry offline</p>");
    let outcome = sebastian(fetcher).fetch().await;
    assert_eq!(outcome.status, SourceStatus::Degraded);
}
