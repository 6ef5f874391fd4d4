// File: config.rs
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::num::NonZeroU32;
use std::time::Duration;

const DEFAULT_API_BASE: &str = "https://www.virustotal.com/api/v3";
const DEFAULT_REPORT_BASE: &str = "https://www.virustotal.com/gui";

/// Injected configuration for the reputation client and verdict cache.
/// Constructed once per process and handed to the components by value;
/// there is no global state to reach for.
#[derive(Debug, Clone)]
pub struct ScannerConfig {
    api_key: Option<String>,
    api_base: String,
    report_base: String,
    timeout: u64,
    url_settle: Duration,
    upload_settle: Duration,
    rate_limit: NonZeroU32,
    cache_ttl: chrono::Duration,
}

impl ScannerConfig {
    pub fn new() -> Self {
        Self {
            api_key: None,
            api_base: DEFAULT_API_BASE.to_string(),
            report_base: DEFAULT_REPORT_BASE.to_string(),
            timeout: 30,
            // URL analyses of unseen targets usually settle in a few
            // seconds; novel-file analyses take longer.
            url_settle: Duration::from_secs(8),
            upload_settle: Duration::from_secs(15),
            // Free-tier request budget.
            rate_limit: NonZeroU32::new(4).unwrap(),
            cache_ttl: chrono::Duration::hours(24),
        }
    }

    /// Like `new()`, but picks the credential up from `VT_API_KEY`.
    pub fn from_env() -> Self {
        let mut config = Self::new();
        config.api_key = std::env::var("VT_API_KEY").ok().filter(|k| !k.is_empty());
        config
    }

    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    pub fn set_api_key(&mut self, api_key: Option<String>) {
        self.api_key = api_key.filter(|k| !k.is_empty());
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    pub fn set_api_base(&mut self, api_base: String) {
        self.api_base = api_base.trim_end_matches('/').to_string();
    }

    pub fn report_base(&self) -> &str {
        &self.report_base
    }

    pub fn set_report_base(&mut self, report_base: String) {
        self.report_base = report_base.trim_end_matches('/').to_string();
    }

    pub fn timeout(&self) -> u64 {
        self.timeout
    }

    pub fn set_timeout(&mut self, timeout: u64) {
        self.timeout = timeout;
    }

    pub fn url_settle(&self) -> Duration {
        self.url_settle
    }

    pub fn set_url_settle(&mut self, url_settle: Duration) {
        self.url_settle = url_settle;
    }

    pub fn upload_settle(&self) -> Duration {
        self.upload_settle
    }

    pub fn set_upload_settle(&mut self, upload_settle: Duration) {
        self.upload_settle = upload_settle;
    }

    pub fn rate_limit(&self) -> NonZeroU32 {
        self.rate_limit
    }

    pub fn set_rate_limit(&mut self, rate_limit: NonZeroU32) {
        self.rate_limit = rate_limit;
    }

    pub fn cache_ttl(&self) -> chrono::Duration {
        self.cache_ttl
    }

    pub fn set_cache_ttl(&mut self, cache_ttl: chrono::Duration) {
        self.cache_ttl = cache_ttl;
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
