// File: config_tests.rs
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::*;

#[test]
fn test_defaults() {
    let config = ScannerConfig::new();

    assert!(config.api_key().is_none());
    assert_eq!(config.api_base(), "https://www.virustotal.com/api/v3");
    assert_eq!(config.report_base(), "https://www.virustotal.com/gui");
    assert_eq!(config.timeout(), 30);
    assert_eq!(config.url_settle(), Duration::from_secs(8));
    assert_eq!(config.upload_settle(), Duration::from_secs(15));
    assert_eq!(config.rate_limit().get(), 4);
    assert_eq!(config.cache_ttl(), chrono::Duration::hours(24));
}

#[test]
fn test_empty_api_key_counts_as_disabled() {
    let mut config = ScannerConfig::new();
    config.set_api_key(Some(String::new()));
    assert!(config.api_key().is_none());

    config.set_api_key(Some("key123".to_string()));
    assert_eq!(config.api_key(), Some("key123"));
}

#[test]
fn test_api_base_trailing_slash_trimmed() {
    let mut config = ScannerConfig::new();
    config.set_api_base("http://127.0.0.1:9999/api/v3/".to_string());
    assert_eq!(config.api_base(), "http://127.0.0.1:9999/api/v3");
}

#[test]
fn test_settle_overrides() {
    let mut config = ScannerConfig::new();
    config.set_url_settle(Duration::from_millis(5));
    config.set_upload_settle(Duration::from_millis(5));

    assert_eq!(config.url_settle(), Duration::from_millis(5));
    assert_eq!(config.upload_settle(), Duration::from_millis(5));
}
