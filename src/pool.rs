//! Bounded worker pool over the discovered links.
//!
//! Every link becomes one tokio task. At most `concurrency` of them are in
//! flight at any moment; the rest wait in the stream until a slot frees.
//! `run_all` only returns once every submitted task has finished.

use crate::models::{ArticleLink, ArticleOutcome, LinkMapping, RunSummary};
use futures::stream::{self, StreamExt};
use std::future::Future;
use std::time::Instant;
use tracing::{debug, error, info, instrument};

/// Worker count used when nothing else is configured.
pub const DEFAULT_CONCURRENCY: usize = 10;

/// Run `task` once per link with at most `concurrency` tasks in flight.
///
/// A task that panics is recorded as a failed outcome for its link; it does
/// not affect the other tasks.
#[instrument(level = "info", skip_all, fields(links = mapping.len(), concurrency = concurrency))]
pub async fn run_all<F, Fut>(mapping: LinkMapping, concurrency: usize, task: F) -> RunSummary
where
    F: Fn(ArticleLink) -> Fut,
    Fut: Future<Output = ArticleOutcome> + Send + 'static,
{
    let start = Instant::now();
    let total = mapping.len();
    info!(total, "Starting article extraction");

    let outcomes: Vec<ArticleOutcome> = stream::iter(mapping)
        .map(|link| {
            let key = link.key.clone();
            let url = link.url.clone();
            // Spawned lazily: buffer_unordered pulls the next link only when a slot is free
            let handle = tokio::spawn(task(link));
            async move {
                match handle.await {
                    Ok(outcome) => {
                        debug!(key = outcome.key(), "Extraction task finished");
                        outcome
                    }
                    Err(e) => {
                        error!(%key, %url, error = %e, "Extraction task aborted");
                        ArticleOutcome::Failed {
                            key,
                            url,
                            stage: "task".to_string(),
                            reason: e.to_string(),
                        }
                    }
                }
            }
        })
        .buffer_unordered(concurrency.max(1))
        .collect()
        .await;

    let summary = RunSummary::from_outcomes(&outcomes, start.elapsed());
    info!(
        total = summary.total,
        written = summary.written,
        empty = summary.empty,
        failed = summary.failed,
        "Completed article extraction"
    );
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn mapping_of(n: usize) -> LinkMapping {
        (0..n)
            .map(|i| ArticleLink::new(&format!("Article {i}"), format!("https://example.com/{i}")))
            .collect()
    }

    fn written(link: &ArticleLink) -> ArticleOutcome {
        ArticleOutcome::Written {
            key: link.key.clone(),
            path: PathBuf::from(link.file_name()),
            bytes: 0,
        }
    }

    #[tokio::test]
    async fn test_run_all_completes_every_link_within_bound() {
        let in_flight = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));
        let calls = Arc::new(AtomicUsize::new(0));

        let summary = run_all(mapping_of(25), 10, |link| {
            let in_flight = Arc::clone(&in_flight);
            let peak = Arc::clone(&peak);
            let calls = Arc::clone(&calls);
            async move {
                let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(20)).await;
                in_flight.fetch_sub(1, Ordering::SeqCst);
                calls.fetch_add(1, Ordering::SeqCst);
                written(&link)
            }
        })
        .await;

        assert_eq!(summary.total, 25);
        assert_eq!(summary.written, 25);
        assert_eq!(calls.load(Ordering::SeqCst), 25);
        assert!(peak.load(Ordering::SeqCst) <= 10);
        assert_eq!(in_flight.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_run_all_isolates_panicking_task() {
        let mapping = mapping_of(5);
        let doomed = mapping.iter().next().map(|(k, _)| k.to_string()).unwrap();

        let doomed_key = doomed.clone();
        let summary = run_all(mapping, 2, move |link| {
            let doomed_key = doomed_key.clone();
            async move {
                if link.key == doomed_key {
                    panic!("boom");
                }
                written(&link)
            }
        })
        .await;

        assert_eq!(summary.total, 5);
        assert_eq!(summary.written, 4);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.failures[0].key, doomed);
        assert_eq!(summary.failures[0].stage, "task");
    }

    #[tokio::test]
    async fn test_run_all_empty_mapping() {
        let summary = run_all(LinkMapping::new(), DEFAULT_CONCURRENCY, |link| async move {
            written(&link)
        })
        .await;
        assert_eq!(summary.total, 0);
        assert!(summary.failures.is_empty());
    }
}
