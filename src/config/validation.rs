use crate::config::types::{
    Config, CrawlerConfig, ImageConfig, ModerationConfig, UserAgentConfig,
};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_image_config(&config.image)?;
    validate_moderation_config(&config.moderation)?;
    validate_user_agent_config(&config.user_agent)?;
    Ok(())
}

/// Validates crawl behavior configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.max_workers < 1 || config.max_workers > 100 {
        return Err(ConfigError::Validation(format!(
            "max_workers must be between 1 and 100, got {}",
            config.max_workers
        )));
    }

    if config.level_fanout < 1 {
        return Err(ConfigError::Validation(format!(
            "level_fanout must be >= 1, got {}",
            config.level_fanout
        )));
    }

    if config.links_per_page < 1 {
        return Err(ConfigError::Validation(format!(
            "links_per_page must be >= 1, got {}",
            config.links_per_page
        )));
    }

    if config.max_site_urls < 1 {
        return Err(ConfigError::Validation(format!(
            "max_site_urls must be >= 1, got {}",
            config.max_site_urls
        )));
    }

    if config.request_timeout_seconds < 1 {
        return Err(ConfigError::Validation(format!(
            "request_timeout_seconds must be >= 1, got {}",
            config.request_timeout_seconds
        )));
    }

    Ok(())
}

/// Validates image bounds configuration
fn validate_image_config(config: &ImageConfig) -> Result<(), ConfigError> {
    if config.jpeg_quality < 1 || config.jpeg_quality > 100 {
        return Err(ConfigError::Validation(format!(
            "jpeg_quality must be between 1 and 100, got {}",
            config.jpeg_quality
        )));
    }

    if config.max_edge < config.min_dimension {
        return Err(ConfigError::Validation(format!(
            "max_edge ({}) must be >= min_dimension ({})",
            config.max_edge, config.min_dimension
        )));
    }

    if config.max_passthrough_bytes < config.min_bytes {
        return Err(ConfigError::Validation(format!(
            "max_passthrough_bytes ({}) must be >= min_bytes ({})",
            config.max_passthrough_bytes, config.min_bytes
        )));
    }

    Ok(())
}

/// Validates moderation backend configuration
fn validate_moderation_config(config: &ModerationConfig) -> Result<(), ConfigError> {
    if config.endpoint_url.is_empty() {
        return Err(ConfigError::Validation(
            "endpoint_url cannot be empty".to_string(),
        ));
    }

    Url::parse(&config.endpoint_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid endpoint_url: {}", e)))?;

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    // Validate scanner name: non-empty, alphanumeric + hyphens only
    if config.scanner_name.is_empty() {
        return Err(ConfigError::Validation(
            "scanner_name cannot be empty".to_string(),
        ));
    }

    if !config
        .scanner_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "scanner_name must contain only alphanumeric characters and hyphens, got '{}'",
            config.scanner_name
        )));
    }

    // Validate contact URL
    Url::parse(&config.contact_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact_url: {}", e)))?;

    // Validate contact email (basic validation)
    validate_email(&config.contact_email)?;

    Ok(())
}

/// Basic email validation
fn validate_email(email: &str) -> Result<(), ConfigError> {
    if email.is_empty() {
        return Err(ConfigError::Validation(
            "contact_email cannot be empty".to_string(),
        ));
    }

    // Basic email format check: must contain @ and have text on both sides
    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    }

    let local = parts[0];
    let domain = parts[1];

    if local.is_empty() || domain.is_empty() {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    }

    // Domain part should contain at least one dot
    if !domain.contains('.') {
        return Err(ConfigError::Validation(format!(
            "Invalid email domain: '{}'",
            email
        )));
    }

    Ok(())
}
