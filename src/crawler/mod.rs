//! Crawler module for page fetching and URL discovery
//!
//! This module contains the network-facing half of the pipeline:
//! - HTTP fetching for pages and image payloads
//! - Breadth-first same-origin link discovery
//! - Image URL extraction from page markup

mod fetcher;
mod images;
mod links;

pub use fetcher::{build_http_client, fetch_bytes, fetch_page, FetchError};
pub use images::extract_image_urls;
pub use links::{discover_all_pages, same_origin};
