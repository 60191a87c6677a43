//! HTTP fetcher shared by every pipeline stage
//!
//! One client, built once per run, fetches both pages and image payloads.
//! Every request carries the same fixed timeout; a failure of any kind is a
//! routine outcome the caller maps to "no data" and moves past. The only
//! fetch whose failure escalates is the start URL, and that policy lives in
//! the crawler, not here.

use crate::config::{CrawlerConfig, UserAgentConfig};
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// A failed fetch. Callers treat both variants as "no data".
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP status {0}")]
    Status(u16),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

/// Builds the HTTP client used for all page and image requests
///
/// The client carries a descriptive user agent string
/// (`ScannerName/Version (+ContactURL; ContactEmail)`) and the fixed
/// per-request timeout from the crawl configuration.
pub fn build_http_client(
    crawler: &CrawlerConfig,
    user_agent: &UserAgentConfig,
) -> Result<Client, reqwest::Error> {
    let agent = format!(
        "{}/{} (+{}; {})",
        user_agent.scanner_name,
        user_agent.scanner_version,
        user_agent.contact_url,
        user_agent.contact_email
    );

    Client::builder()
        .user_agent(agent)
        .timeout(Duration::from_secs(crawler.request_timeout_seconds))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a page body as text
///
/// Non-2xx responses and network failures (including timeouts) both come
/// back as `FetchError`; the caller decides whether that degrades locally
/// or aborts the run.
pub async fn fetch_page(client: &Client, url: &Url) -> Result<String, FetchError> {
    let response = client.get(url.clone()).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status(status.as_u16()));
    }
    Ok(response.text().await?)
}

/// Fetches a resource as raw bytes (used for image payloads)
pub async fn fetch_bytes(client: &Client, url: &Url) -> Result<Vec<u8>, FetchError> {
    let response = client.get(url.clone()).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status(status.as_u16()));
    }
    Ok(response.bytes().await?.to_vec())
}
