// File: client.rs
// SPDX-License-Identifier: MIT OR Apache-2.0

use anyhow::{Context, Result};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use governor::{clock::DefaultClock, state::InMemoryState, state::NotKeyed, Quota, RateLimiter};
use log::{debug, warn};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use crate::config::ScannerConfig;
use crate::target::normalize_scheme;
use crate::vendors::extract_vendor_results;
use crate::verdict::{Source, VendorFinding, Verdict};

const API_KEY_HEADER: &str = "x-apikey";

// Matches the service's upload ceiling for standard submissions.
const MAX_UPLOAD_BYTES: u64 = 25 * 1024 * 1024;

#[derive(Debug, Deserialize)]
struct SubmitResponse {
    data: SubmitData,
}

#[derive(Debug, Deserialize)]
struct SubmitData {
    id: String,
}

#[derive(Debug, Deserialize)]
struct AnalysisResponse {
    data: AnalysisData,
}

#[derive(Debug, Deserialize)]
struct AnalysisData {
    attributes: AnalysisAttributes,
}

#[derive(Debug, Deserialize)]
struct AnalysisAttributes {
    #[serde(default)]
    stats: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
struct ReportResponse {
    data: ReportData,
}

#[derive(Debug, Deserialize)]
struct ReportData {
    attributes: ReportAttributes,
}

#[derive(Debug, Deserialize)]
struct ReportAttributes {
    #[serde(default)]
    last_analysis_stats: Map<String, Value>,
    #[serde(default)]
    last_analysis_results: Map<String, Value>,
}

fn fold_stats(stats: &Map<String, Value>) -> (u64, u64, u64) {
    let count = |key: &str| stats.get(key).and_then(Value::as_u64).unwrap_or(0);
    let malicious = count("malicious");
    let suspicious = count("suspicious");
    let total = stats.values().filter_map(Value::as_u64).sum();
    (malicious, suspicious, total)
}

/// Stateless adapter to the external reputation service. All three scan
/// operations are infallible from the caller's view: transport and parse
/// failures degrade to fail-open verdicts, and a missing credential
/// short-circuits to `disabled` without touching the network.
#[derive(Debug, Clone)]
pub struct ReputationClient {
    client: reqwest::Client,
    config: ScannerConfig,
    rate_limiter: Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>,
}

impl ReputationClient {
    pub fn new(config: ScannerConfig) -> Self {
        let client = reqwest::Client::builder()
            .build()
            .expect("Failed to build reqwest client");
        let rate_limiter = Arc::new(RateLimiter::direct(Quota::per_minute(config.rate_limit())));
        Self {
            client,
            config,
            rate_limiter,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.config.api_key().is_some()
    }

    fn api_key(&self) -> &str {
        self.config.api_key().unwrap_or("")
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.config.timeout())
    }

    /// Submit a URL for analysis, wait out the settling delay, then read the
    /// analysis stats. Best-effort: if the analysis is still pending after
    /// the delay, the stats read at that point stand.
    pub async fn scan_url(&self, url: &str) -> Verdict {
        if !self.is_enabled() {
            return Verdict::disabled();
        }

        match self.submit_and_poll_url(url).await {
            Ok(verdict) => verdict,
            Err(e) => {
                warn!("URL scan failed for {}: {:#}", url, e);
                Verdict::fail_open(Source::Error)
            }
        }
    }

    async fn submit_and_poll_url(&self, url: &str) -> Result<Verdict> {
        let normalized = normalize_scheme(url);

        self.rate_limiter.until_ready().await;
        let submit: SubmitResponse = self
            .client
            .post(format!("{}/urls", self.config.api_base()))
            .header(API_KEY_HEADER, self.api_key())
            .form(&[("url", normalized.as_str())])
            .timeout(self.request_timeout())
            .send()
            .await
            .context("URL submission failed")?
            .error_for_status()
            .context("URL submission rejected")?
            .json()
            .await
            .context("Malformed submission response")?;

        let analysis_id = submit.data.id;
        debug!("URL {} submitted as analysis {}", normalized, analysis_id);

        tokio::time::sleep(self.config.url_settle()).await;

        let stats = self.poll_analysis(&analysis_id).await?;
        let (malicious, suspicious, total) = fold_stats(&stats);

        Ok(Verdict::from_stats(
            malicious,
            suspicious,
            total,
            Some(format!("{}/url/{}", self.config.report_base(), analysis_id)),
            Source::Url,
        ))
    }

    /// Privacy-preferring file lookup by content hash; file bytes never
    /// leave the host. "Not found" is a distinct outcome (`unknown`), not a
    /// failure.
    pub async fn scan_file_hash(&self, hash: &str) -> Verdict {
        if !self.is_enabled() {
            return Verdict::disabled();
        }

        let hash = hash.to_ascii_lowercase();
        match self.lookup_file(&hash).await {
            Ok(Some(verdict)) => verdict,
            Ok(None) => {
                debug!("no prior service record for hash {}", hash);
                Verdict::unknown_hash()
            }
            Err(e) => {
                warn!("hash lookup failed for {}: {:#}", hash, e);
                Verdict::fail_open(Source::HashError)
            }
        }
    }

    async fn lookup_file(&self, hash: &str) -> Result<Option<Verdict>> {
        self.rate_limiter.until_ready().await;
        let response = self
            .client
            .get(format!("{}/files/{}", self.config.api_base(), hash))
            .header(API_KEY_HEADER, self.api_key())
            .timeout(self.request_timeout())
            .send()
            .await
            .context("Hash lookup failed")?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let report: ReportResponse = response
            .error_for_status()
            .context("Hash lookup rejected")?
            .json()
            .await
            .context("Malformed file report")?;

        let (malicious, suspicious, total) = fold_stats(&report.data.attributes.last_analysis_stats);

        Ok(Some(Verdict::from_stats(
            malicious,
            suspicious,
            total,
            Some(format!("{}/file/{}", self.config.report_base(), hash)),
            Source::Hash,
        )))
    }

    /// Consent-gated fallback for hashes the service has never seen: upload
    /// the full file bytes and poll the resulting analysis. Callers gate
    /// this behind an explicit per-request opt-in.
    pub async fn scan_file_by_upload(&self, path: &Path) -> Verdict {
        if !self.is_enabled() {
            return Verdict::disabled();
        }

        match self.upload_and_poll(path).await {
            Ok(verdict) => verdict,
            Err(e) => {
                warn!("upload scan failed for {}: {:#}", path.display(), e);
                Verdict::fail_open(Source::UploadError)
            }
        }
    }

    async fn upload_and_poll(&self, path: &Path) -> Result<Verdict> {
        let metadata = tokio::fs::metadata(path)
            .await
            .context("Failed to stat upload candidate")?;
        anyhow::ensure!(
            metadata.len() <= MAX_UPLOAD_BYTES,
            "file exceeds {} byte upload limit",
            MAX_UPLOAD_BYTES
        );

        let bytes = tokio::fs::read(path)
            .await
            .context("Failed to read upload candidate")?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "attachment".to_string());
        let form = reqwest::multipart::Form::new()
            .part("file", reqwest::multipart::Part::bytes(bytes).file_name(file_name));

        self.rate_limiter.until_ready().await;
        let submit: SubmitResponse = self
            .client
            .post(format!("{}/files", self.config.api_base()))
            .header(API_KEY_HEADER, self.api_key())
            .multipart(form)
            .timeout(self.request_timeout())
            .send()
            .await
            .context("File upload failed")?
            .error_for_status()
            .context("File upload rejected")?
            .json()
            .await
            .context("Malformed upload response")?;

        let analysis_id = submit.data.id;
        debug!("{} uploaded as analysis {}", path.display(), analysis_id);

        tokio::time::sleep(self.config.upload_settle()).await;

        let stats = self.poll_analysis(&analysis_id).await?;
        let (malicious, suspicious, total) = fold_stats(&stats);

        Ok(Verdict::from_stats(
            malicious,
            suspicious,
            total,
            Some(format!("{}/file/{}", self.config.report_base(), analysis_id)),
            Source::Upload,
        ))
    }

    async fn poll_analysis(&self, analysis_id: &str) -> Result<Map<String, Value>> {
        self.rate_limiter.until_ready().await;
        let report: AnalysisResponse = self
            .client
            .get(format!("{}/analyses/{}", self.config.api_base(), analysis_id))
            .header(API_KEY_HEADER, self.api_key())
            .timeout(self.request_timeout())
            .send()
            .await
            .context("Analysis poll failed")?
            .error_for_status()
            .context("Analysis poll rejected")?
            .json()
            .await
            .context("Malformed analysis report")?;

        Ok(report.data.attributes.stats)
    }

    /// Per-vendor detail for a URL identity. The service addresses URLs by
    /// unpadded URL-safe base64 of the submitted string.
    pub async fn fetch_url_analysis(&self, url: &str) -> Result<Vec<VendorFinding>> {
        let encoded = URL_SAFE_NO_PAD.encode(url);
        self.fetch_analysis_results(format!("{}/urls/{}", self.config.api_base(), encoded))
            .await
    }

    /// Per-vendor detail for a file identity, addressed by content hash.
    pub async fn fetch_file_analysis(&self, hash: &str) -> Result<Vec<VendorFinding>> {
        let hash = hash.to_ascii_lowercase();
        self.fetch_analysis_results(format!("{}/files/{}", self.config.api_base(), hash))
            .await
    }

    async fn fetch_analysis_results(&self, endpoint: String) -> Result<Vec<VendorFinding>> {
        self.rate_limiter.until_ready().await;
        let report: ReportResponse = self
            .client
            .get(&endpoint)
            .header(API_KEY_HEADER, self.api_key())
            .timeout(self.request_timeout())
            .send()
            .await
            .context("Vendor detail fetch failed")?
            .error_for_status()
            .context("Vendor detail fetch rejected")?
            .json()
            .await
            .context("Malformed vendor detail report")?;

        Ok(extract_vendor_results(&report.data.attributes.last_analysis_results))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn as_map(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_fold_stats_sums_all_buckets() {
        let stats = as_map(json!({
            "malicious": 2,
            "suspicious": 1,
            "harmless": 60,
            "undetected": 10,
            "timeout": 0
        }));

        let (malicious, suspicious, total) = fold_stats(&stats);
        assert_eq!(malicious, 2);
        assert_eq!(suspicious, 1);
        assert_eq!(total, 73);
    }

    #[test]
    fn test_fold_stats_missing_buckets_default_to_zero() {
        let stats = as_map(json!({ "harmless": 70 }));

        let (malicious, suspicious, total) = fold_stats(&stats);
        assert_eq!(malicious, 0);
        assert_eq!(suspicious, 0);
        assert_eq!(total, 70);
    }

    #[test]
    fn test_fold_stats_ignores_non_numeric_values() {
        let stats = as_map(json!({ "malicious": 1, "note": "n/a" }));

        let (malicious, _, total) = fold_stats(&stats);
        assert_eq!(malicious, 1);
        assert_eq!(total, 1);
    }
}
