//! Image URL discovery
//!
//! Fetches a page and resolves every `<img src>` attribute against the page
//! URL. Unlike link discovery, image sources are not origin-filtered: a page
//! may legitimately embed images from a CDN on another host. Any fetch or
//! parse problem yields an empty list; a page without images is routine.

use crate::crawler::fetcher;
use reqwest::Client;
use scraper::{Html, Selector};
use url::Url;

/// Extracts the image URLs embedded in a page
///
/// Returns the resolved absolute URL of every image element's source
/// attribute, in document order. Errors (timeout, non-2xx status, parse
/// failure) yield an empty list and are logged at debug only.
pub async fn extract_image_urls(client: &Client, page_url: &Url) -> Vec<Url> {
    match fetcher::fetch_page(client, page_url).await {
        Ok(body) => extract_image_sources(&body, page_url),
        Err(e) => {
            tracing::debug!("No images from {}: {}", page_url, e);
            Vec::new()
        }
    }
}

/// Resolves `img[src]` attributes in a page body to absolute URLs
fn extract_image_sources(html: &str, page_url: &Url) -> Vec<Url> {
    let document = Html::parse_document(html);
    let mut images = Vec::new();

    if let Ok(selector) = Selector::parse("img[src]") {
        for element in document.select(&selector) {
            if let Some(src) = element.value().attr("src") {
                let src = src.trim();
                // Inline data URIs are not fetchable resources
                if src.is_empty() || src.starts_with("data:") {
                    continue;
                }
                if let Ok(resolved) = page_url.join(src) {
                    if resolved.scheme() == "http" || resolved.scheme() == "https" {
                        images.push(resolved);
                    }
                }
            }
        }
    }

    images
}
