// File: enrich.rs
// SPDX-License-Identifier: MIT OR Apache-2.0

use anyhow::Result;
use log::{debug, info, warn};
use std::path::Path;
use std::sync::Arc;

use crate::cache::VerdictCache;
use crate::client::ReputationClient;
use crate::target::ScanTarget;
use crate::verdict::{Source, Verdict};

/// Policy layer over the cache and the reputation client: consult the cache,
/// fall back through the lookup decision tree, merge vendor detail, write
/// back. Service failures come back as verdict fields; only cache-store
/// faults surface as `Err`.
///
/// No per-key coordination: two concurrent enrichments of the same
/// identifier may both miss and both write; last write wins, which is fine
/// for idempotent verdict snapshots.
pub struct ScanEnricher {
    cache: Arc<VerdictCache>,
    client: ReputationClient,
}

impl ScanEnricher {
    pub fn new(cache: Arc<VerdictCache>, client: ReputationClient) -> Self {
        Self { cache, client }
    }

    pub async fn enrich_url_scan(&self, url: &str) -> Result<Verdict> {
        let target = ScanTarget::url(url);

        if let Some(mut hit) = self.cache.get(target.kind, &target.identifier)? {
            debug!("verdict cache hit for url {}", target.identifier);
            hit.cached = Some(true);
            return Ok(hit);
        }

        let base = self.client.scan_url(&target.identifier).await;
        if base.source == Source::Disabled || base.is_error() {
            return Ok(base);
        }

        match self.client.fetch_url_analysis(&target.identifier).await {
            Ok(vendors) => {
                let enriched = base.with_vendors(vendors);
                self.cache.put(target.kind, &target.identifier, &enriched)?;
                let mut verdict = enriched;
                verdict.cached = Some(false);
                Ok(verdict)
            }
            Err(e) => {
                // Enrichment is best-effort; base detection still stands.
                warn!("vendor enrichment failed for url {}: {:#}", target.identifier, e);
                Ok(base)
            }
        }
    }

    pub async fn enrich_file_scan(
        &self,
        hash: &str,
        file_path: Option<&Path>,
        allow_upload: bool,
    ) -> Result<Verdict> {
        let target = ScanTarget::file_hash(hash);
        let hash = target.identifier.as_str();

        if let Some(mut hit) = self.cache.get(target.kind, hash)? {
            debug!("verdict cache hit for file {}", hash);
            hit.cached = Some(true);
            return Ok(hit);
        }

        let mut base = self.client.scan_file_hash(hash).await;

        if base.is_unknown() {
            match file_path {
                Some(path) if allow_upload => {
                    info!("hash {} unknown to the service, escalating to upload", hash);
                    base = self.client.scan_file_by_upload(path).await;
                }
                _ => {
                    // Never upload without the explicit per-call opt-in, and
                    // there is no service record to fetch vendor detail from.
                    debug!("hash {} unknown, no upload consent", hash);
                    return Ok(base);
                }
            }
        }

        if base.source == Source::Disabled || base.is_error() {
            return Ok(base);
        }

        match self.client.fetch_file_analysis(hash).await {
            Ok(vendors) => {
                let enriched = base.with_vendors(vendors);
                self.cache.put(target.kind, hash, &enriched)?;
                let mut verdict = enriched;
                verdict.cached = Some(false);
                Ok(verdict)
            }
            Err(e) => {
                warn!("vendor enrichment failed for file {}: {:#}", hash, e);
                Ok(base)
            }
        }
    }
}
