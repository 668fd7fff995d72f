//! Data models for discovered links, per-article outcomes and the run summary.
//!
//! - [`ArticleLink`]: one discovered article, keyed by a unique generated name
//! - [`LinkMapping`]: every link discovered on the listing page for this run
//! - [`ArticleOutcome`]: what happened to one article
//! - [`RunSummary`]: aggregate counts for the whole run, serializable to JSON

use crate::utils::slugify;
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::path::PathBuf;
use std::time::Duration;
use uuid::Uuid;

/// A discovered article: output key plus absolute URL.
///
/// The key is `<uuid v4>-<slug of title>` and doubles as the output file stem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleLink {
    pub key: String,
    pub url: String,
}

impl ArticleLink {
    /// Build a link with a freshly generated key for `title`.
    pub fn new(title: &str, url: impl Into<String>) -> Self {
        Self {
            key: generate_key(title),
            url: url.into(),
        }
    }

    /// Output file name for this article (`<key>.txt`).
    pub fn file_name(&self) -> String {
        format!("{}.txt", self.key)
    }
}

/// Generate a unique output key for a title.
///
/// The random UUID prefix keeps keys unique even when two titles slugify to
/// the same string.
pub fn generate_key(title: &str) -> String {
    format!("{}-{}", Uuid::new_v4(), slugify(title))
}

/// Mapping from generated key to article URL, built once per run.
#[derive(Debug, Default, Clone)]
pub struct LinkMapping {
    links: HashMap<String, String>,
}

impl LinkMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a link. Returns `false` (and keeps the existing entry) if the
    /// key is already present.
    pub fn insert(&mut self, link: ArticleLink) -> bool {
        match self.links.entry(link.key) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(link.url);
                true
            }
        }
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.links.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl IntoIterator for LinkMapping {
    type Item = ArticleLink;
    type IntoIter = std::vec::IntoIter<ArticleLink>;

    fn into_iter(self) -> Self::IntoIter {
        self.links
            .into_iter()
            .map(|(key, url)| ArticleLink { key, url })
            .collect::<Vec<_>>()
            .into_iter()
    }
}

impl FromIterator<ArticleLink> for LinkMapping {
    fn from_iter<I: IntoIterator<Item = ArticleLink>>(iter: I) -> Self {
        let mut mapping = LinkMapping::new();
        for link in iter {
            mapping.insert(link);
        }
        mapping
    }
}

/// What happened to one article.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArticleOutcome {
    /// Text was written to `path`.
    Written {
        key: String,
        path: PathBuf,
        bytes: usize,
    },
    /// The content selector matched nothing; an empty file was written.
    Empty { key: String, path: PathBuf },
    /// Nothing was written.
    Failed {
        key: String,
        url: String,
        stage: String,
        reason: String,
    },
}

impl ArticleOutcome {
    pub fn key(&self) -> &str {
        match self {
            ArticleOutcome::Written { key, .. }
            | ArticleOutcome::Empty { key, .. }
            | ArticleOutcome::Failed { key, .. } => key,
        }
    }
}

/// One failed article as reported in the summary.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct FailedArticle {
    pub key: String,
    pub url: String,
    pub stage: String,
    pub reason: String,
}

/// Aggregate result of a run.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RunSummary {
    /// Date the run finished, `YYYY-MM-DD`.
    pub local_date: String,
    /// Local time the run finished.
    pub local_time: String,
    /// Listing page the links were collected from.
    pub listing_url: String,
    pub total: usize,
    pub written: usize,
    pub empty: usize,
    pub failed: usize,
    /// Bytes of article text written across all files.
    pub bytes_written: usize,
    pub elapsed_ms: u128,
    /// Every file created, including empty ones.
    pub files: Vec<PathBuf>,
    pub failures: Vec<FailedArticle>,
}

impl RunSummary {
    /// Fold per-article outcomes into a summary.
    pub fn from_outcomes(outcomes: &[ArticleOutcome], elapsed: Duration) -> Self {
        let now = Local::now();
        let mut summary = RunSummary {
            local_date: now.date_naive().to_string(),
            local_time: now.time().format("%H:%M:%S").to_string(),
            total: outcomes.len(),
            elapsed_ms: elapsed.as_millis(),
            ..Default::default()
        };
        for outcome in outcomes {
            match outcome {
                ArticleOutcome::Written { path, bytes, .. } => {
                    summary.written += 1;
                    summary.bytes_written += bytes;
                    summary.files.push(path.clone());
                }
                ArticleOutcome::Empty { path, .. } => {
                    summary.empty += 1;
                    summary.files.push(path.clone());
                }
                ArticleOutcome::Failed {
                    key,
                    url,
                    stage,
                    reason,
                } => {
                    summary.failed += 1;
                    summary.failures.push(FailedArticle {
                        key: key.clone(),
                        url: url.clone(),
                        stage: stage.clone(),
                        reason: reason.clone(),
                    });
                }
            }
        }
        summary
    }

    pub fn with_listing_url(mut self, listing_url: impl Into<String>) -> Self {
        self.listing_url = listing_url.into();
        self
    }
}
