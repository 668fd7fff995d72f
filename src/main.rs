//! # Article Harvester
//!
//! Fetches a news listing page, discovers the article links on it and saves
//! the body text of every linked article to its own file.
//!
//! ## Usage
//!
//! ```sh
//! article_harvester -o ./pages -c 10
//! ```
//!
//! ## Architecture
//!
//! 1. **Collecting**: fetch the listing page and select article anchors
//!    (`div.article h3 a` by default), giving each a `<uuid>-<slug>` key
//! 2. **Extracting**: a bounded pool fetches each article page, selects the
//!    content container (`div[id=drr-container]` by default) and writes its
//!    text to `<output_folder>/<key>.txt`
//! 3. **Reporting**: a run summary is logged and optionally written as JSON
//!
//! Failures are contained to the article (or listing fetch) that produced
//! them; the process exits zero once every task has finished.

use clap::Parser;
use std::error::Error;
use tracing::{debug, error, info, instrument, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;
mod collector;
mod config;
mod error;
mod extractor;
mod fetcher;
mod models;
mod outputs;
mod pipeline;
mod pool;
mod utils;

use cli::Cli;
use config::ScrapeConfig;
use outputs::json;
use utils::ensure_writable_dir;

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("article_harvester starting up");

    // Parse CLI and resolve configuration
    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");
    let config = match ScrapeConfig::from_cli(&args) {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Invalid configuration");
            return Err(e.into());
        }
    };
    info!(
        listing = %config.listing_url(),
        output_folder = %config.output_folder.display(),
        concurrency = config.concurrency,
        resolution = ?config.link_resolution,
        "Configuration loaded"
    );

    // Early check: the output folder must exist and be writable before any fetch
    if let Err(e) = ensure_writable_dir(&config.output_folder).await {
        error!(
            path = %config.output_folder.display(),
            error = %e,
            "Output folder is not writable (fix perms or choose a different path)"
        );
        return Err(e);
    }

    let summary = pipeline::run(&config).await?;

    if summary.failed > 0 {
        warn!(
            failed = summary.failed,
            keys = ?summary.failures.iter().map(|f| f.key.as_str()).collect::<Vec<_>>(),
            "Some articles could not be saved"
        );
    }

    if let Some(path) = &config.summary_json {
        if let Err(e) = json::write_summary(&summary, path).await {
            error!(path = %path.display(), error = %e, "Failed to write run summary");
        }
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        total = summary.total,
        written = summary.written,
        empty = summary.empty,
        failed = summary.failed,
        bytes = summary.bytes_written,
        "Execution complete"
    );

    Ok(())
}
