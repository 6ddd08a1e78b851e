//! Outbound promotion links

use url::Url;

/// Non-navigating stand-in for a missing link
pub const PLACEHOLDER_URL: &str = "#";

/// Normalize a possibly scheme-less source URL
///
/// Missing or blank input becomes the [`PLACEHOLDER_URL`](PLACEHOLDER_URL).
///
/// ```rust
/// assert_eq!(normalize_url(Some("example.com")), "https://example.com");
/// assert_eq!(normalize_url(Some("https://x.com")), "https://x.com");
/// assert_eq!(normalize_url(Some("")), "#");
/// ```
pub fn normalize_url(url: Option<&str>) -> String {
    let Some(url) = url.map(str::trim).filter(|url| !url.is_empty()) else {
        return PLACEHOLDER_URL.to_string();
    };

    if has_scheme(url, "http://") || has_scheme(url, "https://") {
        url.to_string()
    } else {
        format!("https://{url}")
    }
}

/// Case-insensitive scheme prefix check
fn has_scheme(url: &str, scheme: &str) -> bool {
    url.get(..scheme.len())
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case(scheme))
}

/// Can the normalized URL be navigated to?
pub fn is_navigable(url: &str) -> bool {
    url != PLACEHOLDER_URL
}

/// Parse a normalized URL for use as a redirect target
///
/// `None` for the placeholder or anything that does not parse
pub fn redirect_target(url: &str) -> Option<Url> {
    if !is_navigable(url) {
        return None;
    }

    Url::parse(url).ok()
}
