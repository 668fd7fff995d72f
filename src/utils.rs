//! Utility functions for slugification, log truncation and output directory checks.

use deunicode::deunicode;
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fs as stdfs;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};

static NON_ALNUM_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-z0-9]+").expect("static slug pattern"));

/// Convert a title to a filesystem-safe slug.
///
/// Diacritics are transliterated to ASCII (`"Café"` becomes `"cafe"`), the
/// result is lower-cased, every run of characters outside `[a-z0-9]` becomes a
/// single hyphen, and leading/trailing hyphens are trimmed.
///
/// The output only contains `[a-z0-9-]` with no doubled or edge hyphens, so
/// applying it twice gives the same result as applying it once.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(slugify("Hello World"), "hello-world");
/// assert_eq!(slugify("  Java 21: What's new?  "), "java-21-what-s-new");
/// ```
pub fn slugify(title: &str) -> String {
    let ascii = deunicode(title).to_lowercase();
    NON_ALNUM_RUN
        .replace_all(&ascii, "-")
        .trim_matches('-')
        .to_string()
}

/// Truncate a string for logging purposes.
///
/// Long strings are cut to `max` bytes (moved back to a char boundary) with an
/// ellipsis and the number of dropped bytes appended.
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}…(+{} bytes)", &s[..end], s.len() - end)
}

/// Ensure a directory exists and is writable.
///
/// Creates the directory (and parents) if needed, then creates and removes a
/// probe file. Called once by the entry point before any article is fetched.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn ensure_writable_dir(path: &Path) -> Result<(), Box<dyn Error>> {
    fs::create_dir_all(path).await?;
    // Sync probe: simpler error surface than the async file API
    let probe_path = path.join("..__probe_write__");
    stdfs::File::create(&probe_path)?;
    let _ = stdfs::remove_file(&probe_path);
    info!("Output directory is writable");
    Ok(())
}
