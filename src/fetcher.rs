//! Page fetching and CSS selection.
//!
//! [`PageFetcher`] wraps a shared `reqwest::Client` and turns "GET this page,
//! run this selector" into a list of owned [`SelectedNode`]s. Nodes are copied
//! out of the parsed `scraper::Html` before returning, so the tree never lives
//! across an await point and callers can move results between tasks freely.

use crate::error::FetchError;
use crate::utils::truncate_for_log;
use itertools::Itertools;
use scraper::{ElementRef, Html, Node, Selector};
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// An element matched by a selector, detached from its document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectedNode {
    /// Visible text with whitespace runs collapsed and trimmed.
    pub text: String,
    attributes: HashMap<String, String>,
}

impl SelectedNode {
    fn from_element(element: ElementRef<'_>) -> Self {
        let attributes = element
            .value()
            .attrs()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect();
        let mut raw = String::new();
        push_visible_text(element, &mut raw);
        Self {
            text: collapse_whitespace(&raw),
            attributes,
        }
    }

    /// Look up an attribute by name, e.g. `href`.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }
}

/// Elements whose boundaries separate words.
const BLOCK_ELEMENTS: &[&str] = &[
    "address", "article", "aside", "blockquote", "br", "dd", "div", "dl", "dt",
    "figcaption", "figure", "footer", "h1", "h2", "h3", "h4", "h5", "h6", "header",
    "hr", "li", "main", "nav", "ol", "p", "pre", "section", "table", "td", "th",
    "tr", "ul",
];

/// Text never rendered to the reader.
const HIDDEN_ELEMENTS: &[&str] = &["script", "style", "template"];

/// Append the visible text under `element` to `out`.
///
/// Inline elements are transparent (`H<sub>2</sub>O` reads `H2O`); block
/// elements and `<br>` are padded with a space so adjacent blocks don't merge.
fn push_visible_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(el) => {
                let name = el.name();
                if HIDDEN_ELEMENTS.contains(&name) {
                    continue;
                }
                let Some(child_element) = ElementRef::wrap(child) else {
                    continue;
                };
                let block = BLOCK_ELEMENTS.contains(&name);
                if block {
                    out.push(' ');
                }
                push_visible_text(child_element, out);
                if block {
                    out.push(' ');
                }
            }
            _ => {}
        }
    }
}

/// Collapse every whitespace run to one space and trim the ends.
fn collapse_whitespace(raw: &str) -> String {
    raw.split_whitespace().join(" ")
}

/// Concatenated text of all nodes, separated by single spaces.
pub fn joined_text(nodes: &[SelectedNode]) -> String {
    nodes
        .iter()
        .map(|n| n.text.as_str())
        .filter(|t| !t.is_empty())
        .join(" ")
}

/// Parse a CSS selector, mapping the error into a [`FetchError`].
pub fn parse_selector(query: &str) -> Result<Selector, FetchError> {
    Selector::parse(query).map_err(|e| FetchError::Selector {
        query: query.to_string(),
        reason: e.to_string(),
    })
}

/// Evaluate `query` against an HTML document string.
pub fn select_nodes(html: &str, query: &str) -> Result<Vec<SelectedNode>, FetchError> {
    let selector = parse_selector(query)?;
    let document = Html::parse_document(html);
    Ok(document
        .select(&selector)
        .map(SelectedNode::from_element)
        .collect())
}

/// HTTP GET plus selection over a shared client.
#[derive(Debug, Clone)]
pub struct PageFetcher {
    client: reqwest::Client,
}

impl PageFetcher {
    /// Build a fetcher whose requests give up after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }

    /// GET `url` and return the response body. Non-2xx statuses are errors.
    #[instrument(level = "debug", skip(self))]
    pub async fn fetch_html(&self, url: &str) -> Result<String, FetchError> {
        let request_error = |source: reqwest::Error| FetchError::Request {
            url: url.to_string(),
            source,
        };
        let response = self.client.get(url).send().await.map_err(request_error)?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        let body = response.text().await.map_err(request_error)?;
        debug!(bytes = body.len(), preview = %truncate_for_log(&body, 120), "Fetched page");
        Ok(body)
    }

    /// Fetch `url` and return every node matching `query`.
    #[instrument(level = "info", skip(self))]
    pub async fn fetch_and_select(
        &self,
        url: &str,
        query: &str,
    ) -> Result<Vec<SelectedNode>, FetchError> {
        // Fail before touching the network if the query is malformed
        parse_selector(query)?;
        let body = self.fetch_html(url).await?;
        let nodes = select_nodes(&body, query)?;
        debug!(matched = nodes.len(), "Selected nodes");
        Ok(nodes)
    }

    /// Like [`fetch_and_select`](Self::fetch_and_select), but logs any failure
    /// and yields an empty list instead.
    pub async fn select_or_empty(&self, url: &str, query: &str) -> Vec<SelectedNode> {
        match self.fetch_and_select(url, query).await {
            Ok(nodes) => nodes,
            Err(e) => {
                warn!(%url, query, kind = e.kind(), error = %e, "Fetch failed; continuing with no results");
                Vec::new()
            }
        }
    }
}
