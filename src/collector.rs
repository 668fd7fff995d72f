//! Link discovery on the listing page.
//!
//! The listing page is fetched once; every node matching the link selector
//! contributes one [`ArticleLink`] whose key is derived from the node text and
//! whose URL is derived from its `href`.

use crate::fetcher::PageFetcher;
use crate::models::{ArticleLink, LinkMapping};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};
use url::Url;

/// How an `href` is turned into an article URL.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkResolution {
    /// `base_url + href`, verbatim. Produces `https://site//path` when the
    /// base ends in `/` and the href starts with one, and a broken URL when
    /// the href is already absolute.
    #[default]
    Concat,
    /// Standard relative-reference resolution against the base URL.
    Join,
}

impl LinkResolution {
    /// Resolve `href` against `base_url`. `None` only in `Join` mode when the
    /// base or the href cannot be parsed.
    pub fn resolve(self, base_url: &str, href: &str) -> Option<String> {
        match self {
            LinkResolution::Concat => Some(format!("{base_url}{href}")),
            LinkResolution::Join => Url::parse(base_url)
                .and_then(|base| base.join(href))
                .map(|u| u.to_string())
                .ok(),
        }
    }
}

/// Listing page URL: base and listing path concatenated.
pub fn listing_url(base_url: &str, listing_path: &str) -> String {
    format!("{base_url}{listing_path}")
}

/// Fetch the listing page and build the key → URL mapping.
///
/// A failed listing fetch is logged by the fetcher and yields an empty
/// mapping. Matched nodes without an `href` are skipped.
#[instrument(level = "info", skip(fetcher))]
pub async fn collect_links(
    fetcher: &PageFetcher,
    base_url: &str,
    listing_path: &str,
    link_selector: &str,
    resolution: LinkResolution,
) -> LinkMapping {
    let listing = listing_url(base_url, listing_path);
    let nodes = fetcher.select_or_empty(&listing, link_selector).await;

    let mut mapping = LinkMapping::new();
    for node in &nodes {
        let Some(href) = node.attr("href") else {
            warn!(title = %node.text, "Matched link has no href; skipping");
            continue;
        };
        let Some(url) = resolution.resolve(base_url, href) else {
            warn!(%href, "Could not resolve article link; skipping");
            continue;
        };
        let link = ArticleLink::new(&node.text, url);
        debug!(key = %link.key, url = %link.url, "Discovered article");
        mapping.insert(link);
    }

    info!(
        count = mapping.len(),
        matched = nodes.len(),
        source = %listing,
        "Indexed article links"
    );
    mapping
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn fetcher() -> PageFetcher {
        PageFetcher::new(Duration::from_secs(5)).unwrap()
    }

    fn listing_html(entries: &[(&str, &str)]) -> String {
        let items: String = entries
            .iter()
            .map(|(title, href)| {
                format!(r#"<div class="article"><h3><a href="{href}">{title}</a></h3></div>"#)
            })
            .collect();
        format!("<html><body>{items}<h3><a href=\"/nav\">Nav</a></h3></body></html>")
    }

    #[test]
    fn test_concat_keeps_double_slash() {
        let url = LinkResolution::Concat.resolve("https://example.com/", "/article/123");
        assert_eq!(url.as_deref(), Some("https://example.com//article/123"));
    }

    #[test]
    fn test_concat_breaks_absolute_href() {
        let url = LinkResolution::Concat.resolve("https://example.com/", "https://other.org/x");
        assert_eq!(url.as_deref(), Some("https://example.com/https://other.org/x"));
    }

    #[test]
    fn test_join_resolves_properly() {
        let join = LinkResolution::Join;
        assert_eq!(
            join.resolve("https://example.com/", "/article/123").as_deref(),
            Some("https://example.com/article/123")
        );
        assert_eq!(
            join.resolve("https://example.com/", "https://other.org/x").as_deref(),
            Some("https://other.org/x")
        );
        assert_eq!(join.resolve("not a url", "/a"), None);
    }

    #[test]
    fn test_listing_url() {
        assert_eq!(
            listing_url("https://www.infoworld.com/", "category/java/"),
            "https://www.infoworld.com/category/java/"
        );
    }

    #[tokio::test]
    async fn test_collect_links_one_entry_per_pair() {
        let server = MockServer::start().await;
        let entries = [
            ("Hello World", "/a1"),
            ("Go Fast", "/a2"),
            ("Hello World", "/a3"),
        ];
        Mock::given(method("GET"))
            .and(path("/category/java/"))
            .respond_with(ResponseTemplate::new(200).set_body_string(listing_html(&entries)))
            .mount(&server)
            .await;

        let base = server.uri();
        let mapping = collect_links(
            &fetcher(),
            &base,
            "/category/java/",
            "div.article h3 a",
            LinkResolution::Concat,
        )
        .await;

        assert_eq!(mapping.len(), 3);
        let mut urls: Vec<&str> = mapping.iter().map(|(_, url)| url).collect();
        urls.sort();
        assert_eq!(
            urls,
            vec![
                format!("{base}/a1"),
                format!("{base}/a2"),
                format!("{base}/a3"),
            ]
        );
        for (key, url) in mapping.iter() {
            if url.ends_with("/a2") {
                assert!(key.ends_with("-go-fast"));
            } else {
                assert!(key.ends_with("-hello-world"));
            }
        }
    }

    #[tokio::test]
    async fn test_collect_links_skips_missing_href() {
        let server = MockServer::start().await;
        let html = r#"<div class="article"><h3><a>No link</a></h3></div>
            <div class="article"><h3><a href="/ok">Ok</a></h3></div>"#;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(html))
            .mount(&server)
            .await;

        let mapping = collect_links(
            &fetcher(),
            &server.uri(),
            "/",
            "div.article h3 a",
            LinkResolution::Concat,
        )
        .await;
        assert_eq!(mapping.len(), 1);
    }

    #[tokio::test]
    async fn test_collect_links_empty_on_listing_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let mapping = collect_links(
            &fetcher(),
            &server.uri(),
            "/category/java/",
            "div.article h3 a",
            LinkResolution::Concat,
        )
        .await;
        assert!(mapping.is_empty());
    }
}
