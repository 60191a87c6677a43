//! Configuration module for Modsweep
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use modsweep::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("config.toml")).unwrap();
//! println!("Crawl cap: {} URLs", config.crawler.max_site_urls);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, ImageConfig, ModerationConfig, UserAgentConfig};

// Re-export parser functions
pub use parser::load_config;
