//! Moderation classifier boundary
//!
//! The pipeline only knows the `ModerationClassifier` trait: bytes in,
//! ordered labels out, with throttling distinguished from every other
//! backend failure so the retry policy can treat them differently. The
//! bundled HTTP implementation keeps the backend itself a black box.

mod client;
mod labels;

pub use client::{classify_with_retry, HttpModerationClient};
pub use labels::ModerationLabel;

use async_trait::async_trait;
use thiserror::Error;

/// Failures surfaced by a moderation backend
#[derive(Debug, Error)]
pub enum ModerationError {
    /// The backing service signaled rate limiting; eligible for one bounded retry
    #[error("Moderation backend throttled the request")]
    Throttled,

    /// Any other backend failure; aborts the individual image, never the batch
    #[error("Moderation backend unavailable: {0}")]
    Unavailable(String),
}

/// Boundary to the external moderation service
#[async_trait]
pub trait ModerationClassifier: Send + Sync {
    /// Classifies a canonical image payload
    ///
    /// Returns the moderation labels in the order the backend reported
    /// them; an empty list means the image is clean.
    async fn classify(&self, bytes: &[u8]) -> Result<Vec<ModerationLabel>, ModerationError>;
}
