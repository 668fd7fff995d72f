//! Article extraction: fetch one article page, pull the content container's
//! text and write it to `<output_folder>/<key>.txt`.

use crate::error::ExtractError;
use crate::fetcher::{PageFetcher, joined_text};
use crate::models::{ArticleLink, ArticleOutcome};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{error, info, instrument, warn};

/// Extracts article bodies into flat text files.
///
/// The output folder must already exist; the extractor never creates
/// directories.
#[derive(Debug, Clone)]
pub struct ArticleExtractor {
    fetcher: PageFetcher,
    output_folder: PathBuf,
    content_selector: String,
}

impl ArticleExtractor {
    pub fn new(
        fetcher: PageFetcher,
        output_folder: impl Into<PathBuf>,
        content_selector: impl Into<String>,
    ) -> Self {
        Self {
            fetcher,
            output_folder: output_folder.into(),
            content_selector: content_selector.into(),
        }
    }

    /// Where the text for `link` ends up.
    pub fn output_path(&self, link: &ArticleLink) -> PathBuf {
        self.output_folder.join(link.file_name())
    }

    /// Extract one article, logging and reporting any failure as an outcome.
    #[instrument(level = "info", skip_all, fields(key = %link.key, url = %link.url))]
    pub async fn extract_article(&self, link: &ArticleLink) -> ArticleOutcome {
        match self.try_extract(link).await {
            Ok(outcome) => outcome,
            Err(e) => {
                error!(stage = e.stage(), error = %e, "Article extraction failed");
                ArticleOutcome::Failed {
                    key: link.key.clone(),
                    url: link.url.clone(),
                    stage: e.stage().to_string(),
                    reason: e.to_string(),
                }
            }
        }
    }

    async fn try_extract(&self, link: &ArticleLink) -> Result<ArticleOutcome, ExtractError> {
        let nodes = self
            .fetcher
            .fetch_and_select(&link.url, &self.content_selector)
            .await?;
        if nodes.is_empty() {
            warn!(
                selector = %self.content_selector,
                "Content container not found; writing empty file"
            );
        }
        let text = joined_text(&nodes);

        let path = self.output_path(link);
        write_text(&path, &text).await?;

        if nodes.is_empty() {
            return Ok(ArticleOutcome::Empty {
                key: link.key.clone(),
                path,
            });
        }
        info!(bytes = text.len(), path = %path.display(), "Wrote article");
        Ok(ArticleOutcome::Written {
            key: link.key.clone(),
            bytes: text.len(),
            path,
        })
    }
}

/// Write `text` as UTF-8, creating or truncating the file.
async fn write_text(path: &Path, text: &str) -> Result<(), ExtractError> {
    fs::write(path, text)
        .await
        .map_err(|source| ExtractError::Write {
            path: path.to_path_buf(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const SELECTOR: &str = "div[id=drr-container]";

    fn extractor(folder: &Path) -> ArticleExtractor {
        let fetcher = PageFetcher::new(Duration::from_secs(5)).unwrap();
        ArticleExtractor::new(fetcher, folder, SELECTOR)
    }

    async fn serve(server: &MockServer, route: &str, body: &str) {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_extract_article_writes_container_text() {
        let server = MockServer::start().await;
        serve(
            &server,
            "/a1",
            r#"<html><body><nav>Menu</nav><div id="drr-container"><p>Line one.</p>
               <p>Line two.</p></div></body></html>"#,
        )
        .await;
        let tmp = tempfile::tempdir().unwrap();
        let link = ArticleLink::new("Hello World", format!("{}/a1", server.uri()));

        let outcome = extractor(tmp.path()).extract_article(&link).await;

        let file = tmp.path().join(link.file_name());
        assert_eq!(
            outcome,
            ArticleOutcome::Written {
                key: link.key.clone(),
                path: file.clone(),
                bytes: "Line one. Line two.".len(),
            }
        );
        assert_eq!(std::fs::read_to_string(file).unwrap(), "Line one. Line two.");
    }

    #[tokio::test]
    async fn test_extract_article_overwrites_existing_file() {
        let server = MockServer::start().await;
        serve(&server, "/a1", r#"<div id="drr-container">fresh</div>"#).await;
        let tmp = tempfile::tempdir().unwrap();
        let link = ArticleLink::new("Again", format!("{}/a1", server.uri()));
        let file = tmp.path().join(link.file_name());
        std::fs::write(&file, "stale content that is longer").unwrap();

        extractor(tmp.path()).extract_article(&link).await;

        assert_eq!(std::fs::read_to_string(file).unwrap(), "fresh");
    }

    #[tokio::test]
    async fn test_extract_article_missing_container_writes_empty_file() {
        let server = MockServer::start().await;
        serve(&server, "/a1", "<html><body><p>No container</p></body></html>").await;
        let tmp = tempfile::tempdir().unwrap();
        let link = ArticleLink::new("Empty", format!("{}/a1", server.uri()));

        let outcome = extractor(tmp.path()).extract_article(&link).await;

        assert!(matches!(outcome, ArticleOutcome::Empty { .. }));
        let file = tmp.path().join(link.file_name());
        assert_eq!(std::fs::read_to_string(file).unwrap(), "");
    }

    #[tokio::test]
    async fn test_extract_article_fetch_failure_writes_nothing() {
        let tmp = tempfile::tempdir().unwrap();
        let link = ArticleLink::new("Gone", "http://127.0.0.1:1/gone");

        let outcome = extractor(tmp.path()).extract_article(&link).await;

        match outcome {
            ArticleOutcome::Failed { stage, .. } => assert_eq!(stage, "fetch"),
            other => panic!("expected failure, got {other:?}"),
        }
        assert!(!tmp.path().join(link.file_name()).exists());
    }

    #[tokio::test]
    async fn test_extract_article_missing_folder_is_write_error() {
        let server = MockServer::start().await;
        serve(&server, "/a1", r#"<div id="drr-container">BODY</div>"#).await;
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("does-not-exist");
        let link = ArticleLink::new("Nowhere", format!("{}/a1", server.uri()));

        let outcome = extractor(&missing).extract_article(&link).await;

        match outcome {
            ArticleOutcome::Failed { stage, .. } => assert_eq!(stage, "write"),
            other => panic!("expected write failure, got {other:?}"),
        }
        assert!(!missing.exists());
    }
}
