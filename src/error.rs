//! Error types for fetching, extraction and configuration.
//!
//! Every error here is contained to the operation that produced it: a
//! [`FetchError`] on the listing page turns into an empty link mapping, an
//! [`ExtractError`] on one article turns into a failed outcome for that
//! article only. [`ConfigError`] is the only kind that stops the program, and
//! only before any work has started.

use std::path::PathBuf;
use thiserror::Error;

/// Failure while fetching a page or evaluating a selector against it.
#[derive(Error, Debug)]
pub enum FetchError {
    /// Transport failure: DNS, connect, timeout, or reading the body.
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    /// The server answered with a non-success status.
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },
    /// The CSS query could not be parsed.
    #[error("invalid selector `{query}`: {reason}")]
    Selector { query: String, reason: String },
}

impl FetchError {
    /// Short label used in logs and the run summary.
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::Request { .. } => "request",
            FetchError::Status { .. } => "status",
            FetchError::Selector { .. } => "selector",
        }
    }
}

/// Failure while turning one article link into a text file.
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    /// Writing the article text to disk failed.
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ExtractError {
    pub fn stage(&self) -> &'static str {
        match self {
            ExtractError::Fetch(_) => "fetch",
            ExtractError::Write { .. } => "write",
        }
    }
}

/// Invalid configuration detected at startup.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("could not parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("invalid base url `{url}`: {source}")]
    BaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("concurrency must be at least 1")]
    ZeroConcurrency,
    #[error("timeout must be greater than zero seconds")]
    ZeroTimeout,
    #[error(transparent)]
    Selector(#[from] FetchError),
}
