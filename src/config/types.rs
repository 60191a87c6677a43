use serde::Deserialize;

/// Main configuration structure for Modsweep
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawler: CrawlerConfig,
    pub image: ImageConfig,
    pub moderation: ModerationConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
}

/// Crawl behavior configuration
///
/// The defaults reproduce the scanner's stock bounds: ten workers, fifty
/// pages fetched per BFS level, twenty links followed per page, and a hard
/// cap of one thousand discovered URLs per site.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Capacity of the bounded worker pool shared by all stages
    #[serde(rename = "max-workers")]
    pub max_workers: u32,

    /// Maximum number of pages fetched per BFS level
    #[serde(rename = "level-fanout")]
    pub level_fanout: usize,

    /// Maximum number of same-origin links followed from a single page
    #[serde(rename = "links-per-page")]
    pub links_per_page: usize,

    /// Hard cap on the total number of URLs discovered per site
    #[serde(rename = "max-site-urls")]
    pub max_site_urls: usize,

    /// Per-request timeout in seconds (pages and images alike)
    #[serde(rename = "request-timeout-seconds")]
    pub request_timeout_seconds: u64,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_workers: 10,
            level_fanout: 50,
            links_per_page: 20,
            max_site_urls: 1000,
            request_timeout_seconds: 5,
        }
    }
}

/// Image validation and normalization configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ImageConfig {
    /// Payloads smaller than this are rejected as non-images
    #[serde(rename = "min-bytes")]
    pub min_bytes: usize,

    /// Images whose smaller side is at or below this are rejected as icons
    #[serde(rename = "min-dimension")]
    pub min_dimension: u32,

    /// JPEG/PNG payloads up to this size pass through unmodified
    #[serde(rename = "max-passthrough-bytes")]
    pub max_passthrough_bytes: usize,

    /// Longer side is downscaled to at most this many pixels on re-encode
    #[serde(rename = "max-edge")]
    pub max_edge: u32,

    /// JPEG quality used when re-encoding
    #[serde(rename = "jpeg-quality")]
    pub jpeg_quality: u8,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            min_bytes: 1000,
            min_dimension: 50,
            max_passthrough_bytes: 5 * 1024 * 1024,
            max_edge: 4096,
            jpeg_quality: 85,
        }
    }
}

/// Moderation backend configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ModerationConfig {
    /// Endpoint the HTTP moderation client submits image bytes to
    #[serde(rename = "endpoint-url")]
    pub endpoint_url: String,

    /// Seconds to wait before retrying a throttled classification
    #[serde(rename = "retry-backoff-seconds")]
    pub retry_backoff_seconds: u64,

    /// Number of additional attempts after a throttled classification
    #[serde(rename = "retry-limit")]
    pub retry_limit: u32,
}

impl Default for ModerationConfig {
    fn default() -> Self {
        Self {
            endpoint_url: "https://moderation.invalid/classify".to_string(),
            retry_backoff_seconds: 2,
            retry_limit: 1,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Name of the scanner
    #[serde(rename = "scanner-name")]
    pub scanner_name: String,

    /// Version of the scanner
    #[serde(rename = "scanner-version")]
    pub scanner_version: String,

    /// URL with information about the scanner
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for scanner-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            scanner_name: "Modsweep".to_string(),
            scanner_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: "https://example.com/about".to_string(),
            contact_email: "ops@example.com".to_string(),
        }
    }
}
