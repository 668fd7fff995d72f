//! One full run: collect links from the listing page, then extract every
//! article through the bounded pool.

use crate::collector::collect_links;
use crate::config::ScrapeConfig;
use crate::extractor::ArticleExtractor;
use crate::fetcher::PageFetcher;
use crate::models::RunSummary;
use crate::pool::run_all;
use std::error::Error;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Run the scrape described by `config`.
///
/// The output folder must exist before this is called. Per-article failures
/// are reported in the returned summary; only building the HTTP client can
/// fail the run as a whole.
#[instrument(level = "info", skip_all, fields(listing = %config.listing_url()))]
pub async fn run(config: &ScrapeConfig) -> Result<RunSummary, Box<dyn Error>> {
    let fetcher = PageFetcher::new(config.timeout())?;

    let mapping = collect_links(
        &fetcher,
        &config.base_url,
        &config.listing_path,
        &config.link_selector,
        config.link_resolution,
    )
    .await;
    if mapping.is_empty() {
        info!("No article links found; nothing to extract");
    }
    debug!(links = ?mapping.iter().collect::<Vec<_>>(), "Links to extract");

    let extractor = Arc::new(ArticleExtractor::new(
        fetcher,
        &config.output_folder,
        &config.content_selector,
    ));
    let summary = run_all(mapping, config.concurrency, |link| {
        let extractor = Arc::clone(&extractor);
        async move { extractor.extract_article(&link).await }
    })
    .await;

    Ok(summary.with_listing_url(config.listing_url()))
}
