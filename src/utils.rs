//! Utility functions for text cleanup, date display, and file system checks.
//!
//! This module provides helper functions used throughout the application:
//! - Stripping markup and truncation markers from article text
//! - Human-readable publication dates
//! - String truncation for logging
//! - File system validation for output directories

use chrono::{DateTime, Local};
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fs as stdfs;
use tokio::fs;
use tracing::{info, instrument};

// A tag runs from `<` to the first `>`. The count marker must end the text.
static CONTENT_NOISE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<[^>]*>|\[[^\[\]]*chars\]$").expect("valid content regex"));

/// Remove HTML-like tags and the trailing `[+N chars]` marker NewsAPI
/// appends to truncated content.
///
/// # Returns
///
/// The cleaned text, or an empty string when `content` is `None`.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(format_content(Some("<b>hi</b> there [+120 chars]")), "hi there ");
/// assert_eq!(format_content(None), "");
/// ```
pub fn format_content(content: Option<&str>) -> String {
    match content {
        Some(c) if !c.is_empty() => CONTENT_NOISE.replace_all(c, "").into_owned(),
        _ => String::new(),
    }
}

/// Render an RFC 3339 timestamp as a local calendar date, e.g. `Sun Oct 18 2026`.
///
/// Unparseable or missing timestamps render as `Invalid Date`.
pub fn display_date(published_at: Option<&str>) -> String {
    published_at
        .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
        .map(|dt| dt.with_timezone(&Local).format("%a %b %d %Y").to_string())
        .unwrap_or_else(|| "Invalid Date".to_string())
}

/// Truncate a string for logging purposes.
///
/// Long strings are cut at the last character boundary at or before `max`
/// bytes, with an ellipsis and byte count indicator appended.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate_for_log("short", 100), "short");
/// assert_eq!(truncate_for_log(&"a".repeat(500), 10), "aaaaaaaaaa…(+490 bytes)");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut cut = max;
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}…(+{} bytes)", &s[..cut], s.len() - cut)
}

/// Ensure a directory exists and is writable.
///
/// This function creates the directory if it doesn't exist, then performs
/// a write test by creating and immediately deleting a probe file.
///
/// # Errors
///
/// Returns an error if:
/// - The directory cannot be created
/// - The directory is not writable (permission denied, read-only filesystem, etc.)
#[instrument(level = "info", skip_all, fields(path = %path))]
pub async fn ensure_writable_dir(path: &str) -> Result<(), Box<dyn Error>> {
    fs::create_dir_all(path).await?;
    let probe_path = format!("{}/..__probe_write__", path.trim_end_matches('/'));
    stdfs::File::create(&probe_path)?;
    let _ = stdfs::remove_file(&probe_path);
    info!("Output directory is writable");
    Ok(())
}
