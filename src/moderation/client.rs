//! HTTP moderation client and the throttle-retry wrapper
//!
//! The HTTP client is a thin boundary: it submits the canonical image bytes
//! and decodes the label envelope. Auth, regions, and the model behind the
//! endpoint are entirely the backend's concern. The retry wrapper is the
//! single place the throttle policy lives; per-image workers call it rather
//! than re-implementing backoff inline.

use crate::config::ModerationConfig;
use crate::moderation::{ModerationClassifier, ModerationError, ModerationLabel};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;
use url::Url;

/// Moderation client that POSTs image bytes to an HTTP endpoint
///
/// The endpoint receives the payload as `application/octet-stream` and
/// answers with `{"labels": [{"name", "confidence", "parent_name"}]}`.
/// HTTP 429 maps to `Throttled`, every other failure to `Unavailable`.
pub struct HttpModerationClient {
    endpoint: Url,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct ClassifyResponse {
    labels: Vec<ModerationLabel>,
}

impl HttpModerationClient {
    pub fn new(config: &ModerationConfig) -> Result<Self, crate::ModsweepError> {
        let endpoint = Url::parse(&config.endpoint_url)?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self { endpoint, client })
    }
}

#[async_trait]
impl ModerationClassifier for HttpModerationClient {
    async fn classify(&self, bytes: &[u8]) -> Result<Vec<ModerationLabel>, ModerationError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .header(CONTENT_TYPE, "application/octet-stream")
            .body(bytes.to_vec())
            .send()
            .await
            .map_err(|e| ModerationError::Unavailable(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(ModerationError::Throttled);
        }
        if !status.is_success() {
            return Err(ModerationError::Unavailable(format!(
                "HTTP {}",
                status.as_u16()
            )));
        }

        let parsed: ClassifyResponse = response
            .json()
            .await
            .map_err(|e| ModerationError::Unavailable(e.to_string()))?;
        Ok(parsed.labels)
    }
}

/// Classifies an image with the bounded throttle-retry policy
///
/// On `Throttled`, waits the configured backoff and retries, up to
/// `retry-limit` additional attempts. Exhausting the retry budget on
/// throttling degrades to an empty label list (logged at warning level)
/// rather than failing the image. Any other error propagates: the caller
/// drops that image and the batch continues.
pub async fn classify_with_retry(
    classifier: &dyn ModerationClassifier,
    bytes: &[u8],
    config: &ModerationConfig,
) -> Result<Vec<ModerationLabel>, ModerationError> {
    let mut attempts_left = config.retry_limit;
    loop {
        match classifier.classify(bytes).await {
            Ok(labels) => return Ok(labels),
            Err(ModerationError::Throttled) if attempts_left > 0 => {
                attempts_left -= 1;
                tracing::debug!(
                    "Moderation backend throttled, retrying in {}s",
                    config.retry_backoff_seconds
                );
                tokio::time::sleep(Duration::from_secs(config.retry_backoff_seconds)).await;
            }
            Err(ModerationError::Throttled) => {
                tracing::warn!("Moderation retries exhausted while throttled, treating as no labels");
                return Ok(Vec::new());
            }
            Err(e) => return Err(e),
        }
    }
}
