//! Breadth-first link discovery
//!
//! Walks a site level by level from the start URL, following only
//! same-origin links. Three bounds keep the walk finite: at most
//! `level-fanout` pages are fetched per level, at most `links-per-page`
//! links are followed from any single page, and discovery stops once
//! `max-site-urls` URLs have been seen. A page that fails to fetch or parse
//! contributes an empty link list; only an unreachable start URL aborts the
//! crawl.

use crate::config::CrawlerConfig;
use crate::crawler::fetcher;
use crate::pipeline::TaskPool;
use crate::ModsweepError;
use reqwest::Client;
use scraper::{Html, Selector};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use url::Url;

/// Discovers the set of same-origin pages reachable from `start_url`
///
/// Performs a level-synchronous breadth-first traversal: each level's pages
/// are fetched concurrently on the shared bounded pool, and a level-N+1 page
/// is never fetched before the whole level-N batch has completed. The
/// returned set includes the start URL and every URL that entered the
/// frontier, whether or not it was expanded.
///
/// # Errors
///
/// `ModsweepError::StartUnreachable` when the start URL itself cannot be
/// fetched. Every other page failure degrades to an empty link list.
pub async fn discover_all_pages(
    client: &Client,
    start_url: &Url,
    config: &CrawlerConfig,
    pool: &TaskPool,
) -> Result<HashSet<Url>, ModsweepError> {
    // The start page is fetched inline so its failure can abort the run.
    let body = fetcher::fetch_page(client, start_url).await.map_err(|e| {
        ModsweepError::StartUnreachable {
            url: start_url.to_string(),
            reason: e.to_string(),
        }
    })?;

    // Pages already fetched for link extraction. Kept separate from the
    // discovered set: a URL can be discovered without ever being expanded.
    let visited: Arc<Mutex<HashSet<String>>> = Arc::new(Mutex::new(HashSet::new()));
    visited.lock().unwrap().insert(start_url.to_string());

    // Every URL that ever entered the frontier, the start URL included.
    let mut discovered: HashSet<Url> = HashSet::new();
    discovered.insert(start_url.clone());

    let mut current_level = Vec::new();
    for link in extract_same_origin_links(&body, start_url, config.links_per_page) {
        if discovered.len() >= config.max_site_urls {
            break;
        }
        if discovered.insert(link.clone()) {
            current_level.push(link);
        }
    }

    let mut level = 1u32;
    while !current_level.is_empty() {
        // Only the first `level-fanout` pages of a level are expanded; the
        // overflow stays in the discovered set unexpanded.
        current_level.truncate(config.level_fanout);
        tracing::debug!(
            "Crawling level {}: {} pages, {} discovered so far",
            level,
            current_level.len(),
            discovered.len()
        );

        let task_client = client.clone();
        let task_visited = Arc::clone(&visited);
        let links_per_page = config.links_per_page;
        let batches = pool
            .run_batch(current_level, move |url: Url| {
                let client = task_client.clone();
                let visited = Arc::clone(&task_visited);
                async move { expand_page(&client, &url, links_per_page, &visited).await }
            })
            .await;

        let mut next_level = Vec::new();
        'merge: for links in batches {
            for link in links {
                if discovered.len() >= config.max_site_urls {
                    break 'merge;
                }
                if discovered.insert(link.clone()) {
                    next_level.push(link);
                }
            }
        }
        current_level = next_level;
        level += 1;
    }

    Ok(discovered)
}

/// Fetches one page and returns its same-origin links
///
/// First writer wins on the visited set: a URL that raced into the level
/// from multiple parents is expanded exactly once, the other workers see it
/// as already visited and return nothing.
async fn expand_page(
    client: &Client,
    url: &Url,
    links_per_page: usize,
    visited: &Mutex<HashSet<String>>,
) -> Vec<Url> {
    {
        let mut seen = visited.lock().unwrap();
        if !seen.insert(url.to_string()) {
            return Vec::new();
        }
    }

    match fetcher::fetch_page(client, url).await {
        Ok(body) => extract_same_origin_links(&body, url, links_per_page),
        Err(e) => {
            tracing::debug!("Skipping page {}: {}", url, e);
            Vec::new()
        }
    }
}

/// Extracts up to `cap` same-origin links from a page body
fn extract_same_origin_links(html: &str, page_url: &Url, cap: usize) -> Vec<Url> {
    let document = Html::parse_document(html);
    let mut links = Vec::new();

    if let Ok(selector) = Selector::parse("a[href]") {
        for element in document.select(&selector) {
            if links.len() >= cap {
                break;
            }
            if let Some(href) = element.value().attr("href") {
                if let Some(link) = resolve_link(href, page_url) {
                    if same_origin(&link, page_url) {
                        links.push(link);
                    }
                }
            }
        }
    }

    links
}

/// Resolves a link href against the page URL and validates it
///
/// Returns None for hrefs that cannot become crawlable URLs:
/// javascript:/mailto:/tel: schemes, data: URIs, fragment-only anchors,
/// and anything that is not HTTP(S) after resolution.
fn resolve_link(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() {
        return None;
    }

    if href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("data:")
    {
        return None;
    }

    // Same-page anchors
    if href.starts_with('#') {
        return None;
    }

    match base_url.join(href) {
        Ok(absolute) if absolute.scheme() == "http" || absolute.scheme() == "https" => {
            Some(absolute)
        }
        _ => None,
    }
}

/// True when two URLs share scheme, host, and port
pub fn same_origin(a: &Url, b: &Url) -> bool {
    a.scheme() == b.scheme()
        && a.host_str() == b.host_str()
        && a.port_or_known_default() == b.port_or_known_default()
}
