//! JSON output of the run summary.
//!
//! The summary is written as a single pretty-printed object:
//! ```text
//! {
//!   "local_date": "2026-10-17",
//!   "local_time": "08:15:02",
//!   "listing_url": "https://www.infoworld.com/category/java/",
//!   "total": 20, "written": 18, "empty": 1, "failed": 1,
//!   "elapsed_ms": 4120,
//!   "failures": [{ "key": "…", "url": "…", "stage": "fetch", "reason": "…" }]
//! }
//! ```

use crate::models::RunSummary;
use std::error::Error;
use std::path::Path;
use tokio::fs;
use tracing::{error, info, instrument};

/// Write a [`RunSummary`] to `path`, creating parent directories if needed.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn write_summary(summary: &RunSummary, path: &Path) -> Result<(), Box<dyn Error>> {
    let json = serde_json::to_string_pretty(summary)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if let Err(e) = fs::create_dir_all(parent).await {
            error!(parent = %parent.display(), error = %e, "Failed to create summary dir");
            return Err(e.into());
        }
    }

    fs::write(path, json).await?;
    info!("Wrote run summary");
    Ok(())
}
