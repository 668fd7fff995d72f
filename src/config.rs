//! Run configuration.
//!
//! Values come from three layers, later ones winning: built-in defaults, an
//! optional YAML file (`--config`), then command-line flags / environment
//! variables. The defaults reproduce the site the scraper was first written
//! for.
//!
//! ```yaml
//! base_url: "https://www.infoworld.com/"
//! listing_path: "category/java/"
//! output_folder: "pages"
//! concurrency: 10
//! link_selector: "div.article h3 a"
//! content_selector: "div[id=drr-container]"
//! timeout_secs: 30
//! link_resolution: concat   # or `join`
//! ```

use crate::cli::Cli;
use crate::collector::LinkResolution;
use crate::error::ConfigError;
use crate::fetcher::parse_selector;
use crate::pool::DEFAULT_CONCURRENCY;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, instrument};
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://www.infoworld.com/";
pub const DEFAULT_LISTING_PATH: &str = "category/java/";
pub const DEFAULT_OUTPUT_FOLDER: &str = "pages";
pub const DEFAULT_LINK_SELECTOR: &str = "div.article h3 a";
pub const DEFAULT_CONTENT_SELECTOR: &str = "div[id=drr-container]";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScrapeConfig {
    /// Root of the site; prefixed to the listing path and to every href.
    pub base_url: String,
    /// Sub-page holding the article list.
    pub listing_path: String,
    /// Folder receiving `<key>.txt` files.
    pub output_folder: PathBuf,
    /// Number of articles fetched at once.
    pub concurrency: usize,
    pub link_selector: String,
    pub content_selector: String,
    pub timeout_secs: u64,
    pub link_resolution: LinkResolution,
    /// Optional path for a JSON run summary.
    pub summary_json: Option<PathBuf>,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            listing_path: DEFAULT_LISTING_PATH.to_string(),
            output_folder: PathBuf::from(DEFAULT_OUTPUT_FOLDER),
            concurrency: DEFAULT_CONCURRENCY,
            link_selector: DEFAULT_LINK_SELECTOR.to_string(),
            content_selector: DEFAULT_CONTENT_SELECTOR.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            link_resolution: LinkResolution::Concat,
            summary_json: None,
        }
    }
}

impl ScrapeConfig {
    /// Parse a YAML config file. Missing keys keep their defaults.
    pub fn from_yaml_file(path: &Path) -> Result<Self, ConfigError> {
        let display = path.display().to_string();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: display.clone(),
            source,
        })?;
        serde_yaml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: display,
            source,
        })
    }

    /// Build the effective configuration for a CLI invocation.
    #[instrument(level = "debug", skip_all)]
    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        let mut config = match &cli.config {
            Some(path) => Self::from_yaml_file(path)?,
            None => Self::default(),
        };
        config.apply_cli(cli);
        config.validate()?;
        debug!(?config, "Resolved configuration");
        Ok(config)
    }

    fn apply_cli(&mut self, cli: &Cli) {
        if let Some(v) = &cli.base_url {
            self.base_url = v.clone();
        }
        if let Some(v) = &cli.listing_path {
            self.listing_path = v.clone();
        }
        if let Some(v) = &cli.output_folder {
            self.output_folder = v.clone();
        }
        if let Some(v) = cli.concurrency {
            self.concurrency = v;
        }
        if let Some(v) = &cli.link_selector {
            self.link_selector = v.clone();
        }
        if let Some(v) = &cli.content_selector {
            self.content_selector = v.clone();
        }
        if let Some(v) = cli.timeout_secs {
            self.timeout_secs = v;
        }
        if cli.resolve_links {
            self.link_resolution = LinkResolution::Join;
        }
        if let Some(v) = &cli.summary_json {
            self.summary_json = Some(v.clone());
        }
    }

    /// Reject configurations that cannot produce a sensible run.
    pub fn validate(&self) -> Result<(), ConfigError> {
        Url::parse(&self.base_url).map_err(|source| ConfigError::BaseUrl {
            url: self.base_url.clone(),
            source,
        })?;
        if self.concurrency == 0 {
            return Err(ConfigError::ZeroConcurrency);
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        parse_selector(&self.link_selector)?;
        parse_selector(&self.content_selector)?;
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn listing_url(&self) -> String {
        crate::collector::listing_url(&self.base_url, &self.listing_path)
    }
}
