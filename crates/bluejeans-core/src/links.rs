//! BlueJeans join links.
//!
//! A personal meeting is joined through `https://bluejeans.com/<numeric id>`.
//! This module builds those links and reads the numeric id back out of them.
//!
//! # Example
//!
//! ```
//! use bluejeans_core::links::{meeting_id_from_link, meeting_link};
//!
//! let link = meeting_link("https://bluejeans.com/", "1234567");
//! assert_eq!(link, "https://bluejeans.com/1234567");
//! assert_eq!(meeting_id_from_link(&link).as_deref(), Some("1234567"));
//! ```

use std::sync::LazyLock;

use regex::Regex;
use url::Url;

/// Public join host used when no override is configured.
pub const DEFAULT_JOIN_URL: &str = "https://bluejeans.com";

/// Matches a BlueJeans host, including subdomains such as `www.`.
static BLUEJEANS_HOST_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([^.]+\.)*bluejeans\.com$").expect("Invalid BlueJeans host regex")
});

/// Builds the join link for a numeric meeting id.
///
/// Trailing slashes on `join_base` are ignored, an empty base falls back to
/// [`DEFAULT_JOIN_URL`].
pub fn meeting_link(join_base: &str, numeric_id: &str) -> String {
    let base = join_base.trim().trim_end_matches('/');
    let base = if base.is_empty() {
        DEFAULT_JOIN_URL
    } else {
        base
    };
    format!("{}/{}", base, numeric_id)
}

/// Extracts the numeric meeting id from a BlueJeans join link.
///
/// Returns `None` for non-BlueJeans hosts and for paths whose first segment
/// is not purely numeric. Query strings and fragments are ignored.
pub fn meeting_id_from_link(link: &str) -> Option<String> {
    let parsed = Url::parse(link.trim()).ok()?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return None;
    }
    let host = parsed.host_str()?;
    if !BLUEJEANS_HOST_REGEX.is_match(host) {
        return None;
    }

    let first = parsed.path().split('/').find(|s| !s.is_empty())?;
    if first.chars().all(|c| c.is_ascii_digit()) {
        Some(first.to_string())
    } else {
        None
    }
}
