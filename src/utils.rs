//! Utility functions for text normalization, URL resolution, and file system
//! checks.

use chrono::Local;
use std::error::Error;
use std::fs as stdfs;
use tokio::fs;
use tracing::{info, instrument};
use url::Url;

/// Collapse every run of whitespace (including newlines) into a single space
/// and trim the ends.
///
/// Empty input yields an empty string; already-normalized input is returned
/// unchanged, so the function is idempotent.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(clean_text("  a\n\n b\tc "), "a b c");
/// ```
pub fn clean_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Resolve a possibly relative `candidate` URL against a site's `base_url`.
///
/// Rules, in order:
/// 1. An already-absolute URL (scheme present) is returned unchanged.
/// 2. A protocol-relative URL (`//host/path`) gets an `https:` prefix.
/// 3. Anything else is joined against the base with the standard RFC 3986
///    algorithm, so both root-relative (`/path`) and path-relative
///    (`section/page`) candidates resolve correctly even when the base has
///    no trailing slash.
///
/// Returns `None` when the base URL is unparseable or the join fails;
/// callers treat that as "skip this link".
pub fn resolve_url(candidate: &str, base_url: &str) -> Option<String> {
    if candidate.starts_with("http://") || candidate.starts_with("https://") {
        return Some(candidate.to_string());
    }
    if let Some(rest) = candidate.strip_prefix("//") {
        return Some(format!("https://{rest}"));
    }
    let base = Url::parse(base_url).ok()?;
    base.join(candidate).ok().map(|u| u.to_string())
}

/// Truncate a string to at most `max` characters, appending `"..."` when
/// anything was cut. Used for the summary artifact.
pub fn truncate_chars(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max).collect();
        format!("{truncated}...")
    }
}

/// Timestamp embedded in every output filename for this run,
/// e.g. `20250506_143000`.
pub fn run_timestamp() -> String {
    Local::now().format("%Y%m%d_%H%M%S").to_string()
}

/// Local timestamp recorded on each scraped article.
pub fn scrape_timestamp() -> String {
    Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Ensure a directory exists and is writable.
///
/// Creates the directory if missing, then performs a write test by creating
/// and immediately deleting a probe file.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or the probe write
/// fails (permission denied, read-only filesystem, etc.).
#[instrument(level = "info", skip_all, fields(path = %path))]
pub async fn ensure_writable_dir(path: &str) -> Result<(), Box<dyn Error>> {
    if let Err(e) = fs::create_dir_all(path).await {
        return Err(Box::new(e));
    }
    // Try a small sync write using std fs (simpler error surface)
    let probe_path = format!("{}/..__probe_write__", path.trim_end_matches('/'));
    match stdfs::File::create(&probe_path) {
        Ok(_) => {
            let _ = stdfs::remove_file(&probe_path);
            info!("Output directory is writable");
            Ok(())
        }
        Err(e) => Err(Box::new(e)),
    }
}
