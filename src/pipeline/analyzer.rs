//! The analysis pipeline orchestrator
//!
//! `WebImageAnalyzer` runs the three stages (page discovery, image URL
//! discovery, image analysis) in sequence on one shared bounded pool.
//! It owns every piece of shared state for a run: the analyzed-hash set
//! that implements content dedup, and the progress tracker a presentation
//! layer may poll while the run is in flight.

use crate::config::Config;
use crate::crawler;
use crate::imaging;
use crate::moderation::{classify_with_retry, ModerationClassifier};
use crate::pipeline::pool::TaskPool;
use crate::pipeline::progress::{ImageRecord, ProgressSnapshot, ProgressTracker};
use crate::ModsweepError;
use reqwest::Client;
use serde::Serialize;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use url::Url;

/// Everything a finished run produced
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    /// One record per unique image content, in completion order
    pub results: Vec<ImageRecord>,

    /// The subset of results carrying at least one moderation label
    pub flagged: Vec<ImageRecord>,
}

/// Disposition of a single image URL
///
/// `Skipped` covers the expected drops (unreachable payload, rejected
/// content, duplicate content); `Failed` is a classifier hard failure.
/// Either way the URL counts as processed.
enum ImageOutcome {
    Analyzed(ImageRecord),
    Skipped,
    Failed,
}

/// Orchestrates a full crawl-discover-dedup-analyze run
pub struct WebImageAnalyzer {
    config: Arc<Config>,
    client: Client,
    classifier: Arc<dyn ModerationClassifier>,
    pool: TaskPool,
    progress: Arc<ProgressTracker>,
}

impl WebImageAnalyzer {
    /// Creates an analyzer from a validated configuration and a classifier
    pub fn new(
        config: Config,
        classifier: Arc<dyn ModerationClassifier>,
    ) -> Result<Self, ModsweepError> {
        let client = crawler::build_http_client(&config.crawler, &config.user_agent)?;
        let pool = TaskPool::new(config.crawler.max_workers as usize);
        Ok(Self {
            config: Arc::new(config),
            client,
            classifier,
            pool,
            progress: Arc::new(ProgressTracker::new()),
        })
    }

    /// Shared handle for polling progress while `analyze_website` runs
    pub fn progress_tracker(&self) -> Arc<ProgressTracker> {
        Arc::clone(&self.progress)
    }

    /// Snapshot of the current run's progress
    pub fn progress(&self) -> ProgressSnapshot {
        self.progress.snapshot()
    }

    /// Analyzes every unique image reachable from `start_url`
    ///
    /// Returns once the whole pipeline has finished. The only fatal
    /// condition is an unreachable start URL; everything else degrades to
    /// skipped pages or skipped images and the caller receives a
    /// best-effort report.
    pub async fn analyze_website(&self, start_url: &str) -> Result<AnalysisReport, ModsweepError> {
        let start = Url::parse(start_url)?;
        tracing::info!("Starting analysis of {}", start);

        // Stage 1: same-origin page discovery
        let pages =
            crawler::discover_all_pages(&self.client, &start, &self.config.crawler, &self.pool)
                .await?;
        tracing::info!("Found {} URLs to process", pages.len());

        // Stage 2: image URL discovery, deduplicated by exact URL string
        // before the (more expensive) content-hash dedup
        let page_client = self.client.clone();
        let image_lists = self
            .pool
            .run_batch(pages.into_iter().collect(), move |page: Url| {
                let client = page_client.clone();
                async move { crawler::extract_image_urls(&client, &page).await }
            })
            .await;

        let mut seen_urls: HashSet<String> = HashSet::new();
        let mut unique_images: Vec<Url> = Vec::new();
        for images in image_lists {
            for image in images {
                if seen_urls.insert(image.to_string()) {
                    unique_images.push(image);
                }
            }
        }
        tracing::info!("Found {} unique image URLs", unique_images.len());

        // Stage 3: download, normalize, dedup by content, classify
        self.progress.set_total(unique_images.len());
        let analyzed_hashes: Arc<Mutex<HashSet<String>>> = Arc::new(Mutex::new(HashSet::new()));

        let task_client = self.client.clone();
        let task_config = Arc::clone(&self.config);
        let task_classifier = Arc::clone(&self.classifier);
        let task_progress = Arc::clone(&self.progress);
        let task_hashes = Arc::clone(&analyzed_hashes);
        let outcomes = self
            .pool
            .run_batch(unique_images, move |image: Url| {
                let client = task_client.clone();
                let config = Arc::clone(&task_config);
                let classifier = Arc::clone(&task_classifier);
                let progress = Arc::clone(&task_progress);
                let hashes = Arc::clone(&task_hashes);
                async move {
                    let outcome =
                        analyze_image(&client, &image, &config, classifier.as_ref(), &hashes)
                            .await;
                    if let ImageOutcome::Analyzed(record) = &outcome {
                        if record.is_flagged() {
                            progress.record_flagged(record.clone());
                        }
                    }
                    progress.record_processed();
                    outcome
                }
            })
            .await;

        let mut results = Vec::new();
        let mut skipped = 0usize;
        let mut failed = 0usize;
        for outcome in outcomes {
            match outcome {
                ImageOutcome::Analyzed(record) => results.push(record),
                ImageOutcome::Skipped => skipped += 1,
                ImageOutcome::Failed => failed += 1,
            }
        }
        let flagged: Vec<ImageRecord> =
            results.iter().filter(|r| r.is_flagged()).cloned().collect();

        tracing::info!(
            "Analyzed {} new images ({} skipped, {} failed), {} flagged",
            results.len(),
            skipped,
            failed,
            flagged.len()
        );
        Ok(AnalysisReport { results, flagged })
    }
}

/// Runs one image URL through download, normalize, dedup, and classify
async fn analyze_image(
    client: &Client,
    image_url: &Url,
    config: &Config,
    classifier: &dyn ModerationClassifier,
    analyzed_hashes: &Mutex<HashSet<String>>,
) -> ImageOutcome {
    let bytes = match crawler::fetch_bytes(client, image_url).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::debug!("Could not download {}: {}", image_url, e);
            return ImageOutcome::Skipped;
        }
    };

    let canonical = match imaging::normalize(&bytes, &config.image) {
        Ok(canonical) => canonical,
        Err(rejection) => {
            tracing::warn!("Rejected image at {}: {}", image_url, rejection);
            return ImageOutcome::Skipped;
        }
    };

    let hash = imaging::content_hash(&canonical);
    {
        let mut seen = analyzed_hashes.lock().unwrap();
        if !seen.insert(hash.clone()) {
            tracing::debug!("Duplicate content at {}, already analyzed", image_url);
            return ImageOutcome::Skipped;
        }
    }
    // From here on the hash stays marked seen even if classification
    // fails: identical bytes are never re-submitted within a run.

    let labels = match classify_with_retry(classifier, &canonical, &config.moderation).await {
        Ok(labels) => labels,
        Err(e) => {
            tracing::warn!("Classification failed for {}: {}", image_url, e);
            return ImageOutcome::Failed;
        }
    };

    ImageOutcome::Analyzed(ImageRecord {
        url: image_url.to_string(),
        content_hash: hash,
        labels,
        byte_size: canonical.len(),
    })
}
