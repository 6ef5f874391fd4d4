// File: verdict.rs
// SPDX-License-Identifier: MIT OR Apache-2.0

use serde::{Deserialize, Serialize};

/// Cache namespace and wire tag for a scan target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetKind {
    Url,
    File,
}

impl std::fmt::Display for TargetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TargetKind::Url => write!(f, "url"),
            TargetKind::File => write!(f, "file"),
        }
    }
}

/// Provenance of a verdict: which service path produced it, or which path
/// failed. The `*-error` variants mark fail-open results from the file paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Source {
    Disabled,
    Url,
    Hash,
    Upload,
    Error,
    HashError,
    UploadError,
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tag = match self {
            Source::Disabled => "disabled",
            Source::Url => "url",
            Source::Hash => "hash",
            Source::Upload => "upload",
            Source::Error => "error",
            Source::HashError => "hash-error",
            Source::UploadError => "upload-error",
        };
        write!(f, "{}", tag)
    }
}

/// One engine's opinion from the service's per-vendor analysis map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VendorFinding {
    pub vendor: String,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
}

/// Normalized scan outcome for one target identity.
///
/// The JSON field names (`isSafe`, `scan_url`, kebab-case sources) are the
/// wire shape chat clients already consume, so they are pinned here rather
/// than left to rename_all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    #[serde(rename = "isSafe")]
    pub is_safe: bool,
    pub positives: u64,
    pub malicious: u64,
    pub suspicious: u64,
    pub total: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scan_url: Option<String>,
    pub source: Source,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendors: Option<Vec<VendorFinding>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unknown: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cached: Option<bool>,
}

impl Verdict {
    /// Build a verdict from service stats. `positives` and `is_safe` are
    /// derived, never supplied, so the count invariants hold by construction.
    pub fn from_stats(
        malicious: u64,
        suspicious: u64,
        total: u64,
        scan_url: Option<String>,
        source: Source,
    ) -> Self {
        let positives = malicious + suspicious;
        Verdict {
            is_safe: positives == 0,
            positives,
            malicious,
            suspicious,
            total: total.max(positives),
            scan_url,
            source,
            vendors: None,
            unknown: None,
            error: None,
            cached: None,
        }
    }

    /// Neutral verdict when no service credential is configured.
    pub fn disabled() -> Self {
        Verdict::from_stats(0, 0, 0, None, Source::Disabled)
    }

    /// Fail-open verdict for a transport or parse failure on the given path.
    /// An unreachable service must never block message delivery.
    pub fn fail_open(source: Source) -> Self {
        let mut verdict = Verdict::from_stats(0, 0, 0, None, source);
        verdict.error = Some(true);
        verdict
    }

    /// The service has no prior record for this hash. Distinct from a failed
    /// lookup: the call completed, there was just nothing to report.
    pub fn unknown_hash() -> Self {
        let mut verdict = Verdict::from_stats(0, 0, 0, None, Source::Hash);
        verdict.unknown = Some(true);
        verdict
    }

    pub fn with_vendors(mut self, vendors: Vec<VendorFinding>) -> Self {
        self.vendors = Some(vendors);
        self
    }

    pub fn is_error(&self) -> bool {
        self.error.unwrap_or(false)
    }

    pub fn is_unknown(&self) -> bool {
        self.unknown.unwrap_or(false)
    }
}

#[cfg(test)]
#[path = "verdict_tests.rs"]
mod tests;
