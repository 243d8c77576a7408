//! Image URL recognition
//!
//! Two policies are supported. The strict policy accepts only text starting
//! with `http://` or `https://`. The lenient policy also accepts scheme-less
//! `host.tld/path` text and bare CDN-style hosts, which [`normalize_url`]
//! turns into `https://` URLs.

use crate::types::UrlPolicy;
use regex::Regex;
use std::sync::OnceLock;

const DEFAULT_SCHEME: &str = "https://";

fn host_path_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)^(https?://)?([a-z0-9.\-]+\.[a-z]{2,})(/.*)$")
            .expect("host/path pattern is valid")
    })
}

fn cdn_host_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)^(cdn\.|media\.|images\.|static\.)").expect("cdn pattern is valid")
    })
}

fn has_http_scheme(s: &str) -> bool {
    let lower = s.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Strict check: trimmed text starts with `http://` or `https://`
pub fn is_plausible_url(s: &str) -> bool {
    let s = s.trim();
    !s.is_empty() && has_http_scheme(s)
}

/// Lenient check: anything [`normalize_url`] can turn into a URL
pub fn is_url_like(s: &str) -> bool {
    let s = s.trim();
    if s.is_empty() {
        return false;
    }
    has_http_scheme(s) || host_path_pattern().is_match(s) || cdn_host_pattern().is_match(s)
}

/// Clean up URL-like text, adding `https://` when no scheme is present.
/// Returns `None` when the text does not look like a URL.
pub fn normalize_url(s: &str) -> Option<String> {
    let s = s.trim().trim_matches('"').trim_matches('\'');
    if s.is_empty() {
        return None;
    }
    if has_http_scheme(s) {
        return Some(s.to_string());
    }
    if let Some(caps) = host_path_pattern().captures(s) {
        let scheme = caps.get(1).map_or(DEFAULT_SCHEME, |m| m.as_str());
        return Some(format!("{}{}{}", scheme, &caps[2], &caps[3]));
    }
    if cdn_host_pattern().is_match(s) {
        return Some(format!("{DEFAULT_SCHEME}{s}"));
    }
    None
}

/// The URL to embed for `text` under `policy`, or `None` to leave the cell alone
pub fn qualifying_url(text: &str, policy: UrlPolicy) -> Option<String> {
    match policy {
        UrlPolicy::Strict => is_plausible_url(text).then(|| text.trim().to_string()),
        UrlPolicy::Lenient => {
            if is_url_like(text) {
                normalize_url(text)
            } else {
                None
            }
        }
    }
}
