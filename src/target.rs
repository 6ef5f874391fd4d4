// File: target.rs
// SPDX-License-Identifier: MIT OR Apache-2.0

use once_cell::sync::Lazy;
use regex::Regex;

use crate::verdict::TargetKind;

static URL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(https?://[^\s]+|www\.[^\s]+)").unwrap());

/// One scan target identity: the (kind, identifier) pair used as cache key
/// and service lookup key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ScanTarget {
    pub kind: TargetKind,
    pub identifier: String,
}

impl ScanTarget {
    /// URL identity is the literal caller string apart from scheme
    /// defaulting. Trailing slashes and query order are NOT deduplicated;
    /// two spellings of the same page are two cache entries.
    pub fn url(raw: &str) -> Self {
        ScanTarget {
            kind: TargetKind::Url,
            identifier: normalize_scheme(raw),
        }
    }

    /// File identity is the content hash, case-folded to lowercase hex.
    /// The hash is not re-validated here; a malformed hash simply misses
    /// the cache and comes back from the service as an error verdict.
    pub fn file_hash(raw: &str) -> Self {
        ScanTarget {
            kind: TargetKind::File,
            identifier: raw.to_ascii_lowercase(),
        }
    }
}

/// Default bare hosts to http://, matching what the service expects for URL
/// submissions.
pub fn normalize_scheme(url: &str) -> String {
    if url.starts_with("http") {
        url.to_string()
    } else {
        format!("http://{}", url)
    }
}

/// Pull every URL-looking token out of free-form message text. Callers on
/// the message-send path enrich each one before delivery.
pub fn extract_urls(text: &str) -> Vec<String> {
    URL_PATTERN
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_scheme_defaulting() {
        assert_eq!(ScanTarget::url("example.com").identifier, "http://example.com");
        assert_eq!(
            ScanTarget::url("https://example.com").identifier,
            "https://example.com"
        );
        assert_eq!(
            ScanTarget::url("http://example.com/a?b=1").identifier,
            "http://example.com/a?b=1"
        );
    }

    #[test]
    fn test_url_identity_is_literal() {
        let with_slash = ScanTarget::url("https://example.com/");
        let without_slash = ScanTarget::url("https://example.com");
        assert_ne!(with_slash.identifier, without_slash.identifier);
    }

    #[test]
    fn test_hash_case_folding() {
        let target = ScanTarget::file_hash("AbCdEf0123456789");
        assert_eq!(target.kind, TargetKind::File);
        assert_eq!(target.identifier, "abcdef0123456789");
    }

    #[test]
    fn test_extract_urls_from_message() {
        let text = "check https://example.com/page and also www.other.org/x thanks";
        let urls = extract_urls(text);
        assert_eq!(urls, vec!["https://example.com/page", "www.other.org/x"]);
    }

    #[test]
    fn test_extract_urls_none() {
        assert!(extract_urls("no links in here").is_empty());
        assert!(extract_urls("").is_empty());
    }
}
