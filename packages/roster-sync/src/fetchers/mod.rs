//! Page fetcher implementations.
//!
//! - `HttpFetcher` - direct HTTP retrieval
//! - `MockFetcher` (in [`crate::testing`]) - canned pages for tests

mod http;

pub use http::HttpFetcher;

// Re-export from traits for convenience
pub use crate::traits::fetcher::PageFetcher;
