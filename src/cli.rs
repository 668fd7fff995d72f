//! Command-line interface definitions for Article Harvester.
//!
//! Every option is optional: unset options fall back to the YAML config file
//! (if one is given) and then to the built-in defaults in [`crate::config`].

use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments for the Article Harvester application.
///
/// # Examples
///
/// ```sh
/// # Scrape the default listing into ./pages with 10 workers
/// article_harvester
///
/// # Different site, more workers, proper URL resolution
/// article_harvester --base-url https://example.com/ --listing-path news/ -c 16 --resolve-links
///
/// # Settings from a file, summary written next to the articles
/// article_harvester --config harvest.yaml --summary-json pages/summary.json
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Optional path to a YAML config file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Root URL of the site
    #[arg(short, long, env = "HARVEST_BASE_URL")]
    pub base_url: Option<String>,

    /// Listing sub-page appended to the base URL
    #[arg(short, long, env = "HARVEST_LISTING_PATH")]
    pub listing_path: Option<String>,

    /// Folder the article text files are written to
    #[arg(short, long, env = "HARVEST_OUTPUT_FOLDER")]
    pub output_folder: Option<PathBuf>,

    /// Number of articles fetched concurrently
    #[arg(short, long, env = "HARVEST_CONCURRENCY")]
    pub concurrency: Option<usize>,

    /// CSS selector for article links on the listing page
    #[arg(long)]
    pub link_selector: Option<String>,

    /// CSS selector for the content container on an article page
    #[arg(long)]
    pub content_selector: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Resolve hrefs as relative URLs instead of appending them to the base URL
    #[arg(long)]
    pub resolve_links: bool,

    /// Write a JSON run summary to this path
    #[arg(long)]
    pub summary_json: Option<PathBuf>,
}
