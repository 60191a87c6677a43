//! Modsweep: a website image moderation scanner
//!
//! This crate crawls a website breadth-first, harvests the images embedded in
//! its pages, deduplicates them by content fingerprint, and submits each
//! unique image to a moderation classifier while exposing live progress to a
//! concurrent reader.

pub mod config;
pub mod crawler;
pub mod imaging;
pub mod moderation;
pub mod pipeline;

use thiserror::Error;

/// Main error type for Modsweep operations
#[derive(Debug, Error)]
pub enum ModsweepError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Start URL {url} is unreachable: {reason}")]
    StartUnreachable { url: String, reason: String },

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Moderation error: {0}")]
    Moderation(#[from] moderation::ModerationError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for Modsweep operations
pub type Result<T> = std::result::Result<T, ModsweepError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use moderation::{ModerationClassifier, ModerationError, ModerationLabel};
pub use pipeline::{AnalysisReport, ImageRecord, ProgressSnapshot, WebImageAnalyzer};
