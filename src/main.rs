//! Modsweep main entry point
//!
//! This is the command-line interface for the Modsweep website image
//! moderation scanner.

use anyhow::Context;
use clap::Parser;
use modsweep::config::load_config;
use modsweep::moderation::HttpModerationClient;
use modsweep::pipeline::WebImageAnalyzer;
use modsweep::ImageRecord;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Modsweep: website image moderation scanner
///
/// Modsweep crawls a website breadth-first, downloads the images embedded
/// in its pages, deduplicates them by content, and submits each unique
/// image to a moderation backend, reporting everything that was flagged.
#[derive(Parser, Debug)]
#[command(name = "modsweep")]
#[command(version)]
#[command(about = "Scan a website's images for moderation findings", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// URL to start crawling from
    #[arg(value_name = "START_URL")]
    start_url: String,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Skip writing the flagged-images report file
    #[arg(long)]
    no_report: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let config = load_config(&cli.config).context("failed to load configuration")?;

    let classifier = Arc::new(HttpModerationClient::new(&config.moderation)?);
    let analyzer = WebImageAnalyzer::new(config, classifier)?;

    // Surface progress periodically while the run is in flight
    let tracker = analyzer.progress_tracker();
    let reporter = tokio::spawn(async move {
        loop {
            tokio::time::sleep(Duration::from_secs(2)).await;
            let snapshot = tracker.snapshot();
            if snapshot.total > 0 {
                tracing::info!(
                    "Progress: {}/{} images, {} flagged",
                    snapshot.processed,
                    snapshot.total,
                    snapshot.flagged.len()
                );
            }
        }
    });

    let result = analyzer.analyze_website(&cli.start_url).await;
    reporter.abort();
    let report = result?;

    if !cli.no_report && !report.flagged.is_empty() {
        let path = write_flagged_report(&report.flagged)?;
        println!("Flagged report written to: {}", path);
    }

    println!("Total images analyzed: {}", report.results.len());
    println!("Flagged images: {}", report.flagged.len());

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("modsweep=info,warn"),
            1 => EnvFilter::new("modsweep=debug,info"),
            2 => EnvFilter::new("modsweep=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Writes the flagged records to a timestamped report file
///
/// One block per record: the source URL, the label names, and the canonical
/// payload size, separated by rule lines.
fn write_flagged_report(flagged: &[ImageRecord]) -> anyhow::Result<String> {
    let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    let filename = format!("flagged_images_{}.txt", timestamp);

    let mut contents = String::new();
    for record in flagged {
        let names: Vec<&str> = record.labels.iter().map(|l| l.name.as_str()).collect();
        contents.push_str(&format!("URL: {}\n", record.url));
        contents.push_str(&format!("Labels: {:?}\n", names));
        contents.push_str(&format!("Size: {} bytes\n", record.byte_size));
        contents.push_str(&format!("{}\n", "-".repeat(50)));
    }

    std::fs::write(&filename, contents).context("failed to write flagged report")?;
    Ok(filename)
}
