// File: common/mod.rs
// SPDX-License-Identifier: MIT OR Apache-2.0

#![allow(dead_code)]

use msgscan::config::ScannerConfig;
use serde_json::{json, Value};
use std::num::NonZeroU32;
use std::time::Duration;
use wiremock::{MockServer, ResponseTemplate};

pub async fn setup_mock_service() -> MockServer {
    MockServer::start().await
}

/// Config pointed at the mock service, with the settling delays and the rate
/// limiter budget shrunk so tests run in milliseconds.
pub fn test_config(mock_uri: &str) -> ScannerConfig {
    let mut config = ScannerConfig::new();
    config.set_api_key(Some("test-key".to_string()));
    config.set_api_base(mock_uri.to_string());
    config.set_report_base(mock_uri.to_string());
    config.set_timeout(5);
    config.set_url_settle(Duration::from_millis(10));
    config.set_upload_settle(Duration::from_millis(10));
    config.set_rate_limit(NonZeroU32::new(6000).unwrap());
    config
}

pub fn disabled_config(mock_uri: &str) -> ScannerConfig {
    let mut config = test_config(mock_uri);
    config.set_api_key(None);
    config
}

pub fn json_response(value: &Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(value)
}

pub fn submit_body(analysis_id: &str) -> Value {
    json!({ "data": { "type": "analysis", "id": analysis_id } })
}

pub fn analysis_body(malicious: u64, suspicious: u64, harmless: u64, undetected: u64) -> Value {
    json!({
        "data": {
            "attributes": {
                "stats": {
                    "malicious": malicious,
                    "suspicious": suspicious,
                    "harmless": harmless,
                    "undetected": undetected
                }
            }
        }
    })
}

pub fn report_body(
    malicious: u64,
    suspicious: u64,
    harmless: u64,
    undetected: u64,
    results: Value,
) -> Value {
    json!({
        "data": {
            "attributes": {
                "last_analysis_stats": {
                    "malicious": malicious,
                    "suspicious": suspicious,
                    "harmless": harmless,
                    "undetected": undetected
                },
                "last_analysis_results": results
            }
        }
    })
}

pub fn sample_vendor_results() -> Value {
    json!({
        "VendorA": { "category": "malicious", "result": "trojan" },
        "VendorB": {}
    })
}
