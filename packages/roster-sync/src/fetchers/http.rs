//! HTTP-based page fetcher.
//!
//! Plain `reqwest` retrieval with an identifying user agent and a per-request
//! timeout. No JavaScript rendering; sites that need a browser plug a
//! different `PageFetcher` into their adapter.

use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::{SourceError, SourceResult};
use crate::traits::fetcher::PageFetcher;

pub struct HttpFetcher {
    client: reqwest::Client,
    user_agent: String,
}

impl HttpFetcher {
    /// Create a fetcher with a user agent and per-request timeout.
    pub fn new(user_agent: impl Into<String>, timeout: Duration) -> SourceResult<Self> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::ACCEPT,
            reqwest::header::HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            ),
        );
        headers.insert(
            reqwest::header::ACCEPT_LANGUAGE,
            reqwest::header::HeaderValue::from_static("en-US,en;q=0.5"),
        );

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .default_headers(headers)
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()
            .map_err(|e| SourceError::Client(Box::new(e)))?;

        Ok(Self {
            client,
            user_agent: user_agent.into(),
        })
    }

    /// Set a custom HTTP client.
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    fn classify(url: &str, error: reqwest::Error) -> SourceError {
        if error.is_timeout() {
            SourceError::Timeout {
                url: url.to_string(),
            }
        } else {
            SourceError::Http {
                url: url.to_string(),
                source: Box::new(error),
            }
        }
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch_page(&self, url: &str) -> SourceResult<String> {
        debug!(url = %url, "HTTP fetch starting");
        let response = self
            .client
            .get(url)
            .header(reqwest::header::USER_AGENT, &self.user_agent)
            .send()
            .await
            .map_err(|e| {
                warn!(url = %url, error = %e, "HTTP request failed");
                Self::classify(url, e)
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let html = response.text().await.map_err(|e| Self::classify(url, e))?;
        debug!(url = %url, bytes = html.len(), "HTTP fetch completed");
        Ok(html)
    }

    fn name(&self) -> &str {
        "http"
    }
}
