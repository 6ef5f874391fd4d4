// File: cache.rs
// SPDX-License-Identifier: MIT OR Apache-2.0

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use dirs::data_local_dir;
use log::debug;
use serde::{Deserialize, Serialize};
use sled::{Config, Db};
use std::collections::HashMap;
use std::path::PathBuf;

use crate::verdict::{TargetKind, Verdict};

/// Persisted cache row: one verdict snapshot per (kind, identifier).
/// Overwritten on every re-enrichment, never versioned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    pub identifier: String,
    pub result: Verdict,
    pub last_scanned_at: DateTime<Utc>,
}

/// Durable verdict store with time-based expiry. Single source of truth for
/// "do we already know the answer". Expired rows read as misses but stay on
/// disk until the next put overwrites them.
pub struct VerdictCache {
    db: Db,
    url_tree: sled::Tree,
    file_tree: sled::Tree,
    ttl: Duration,
}

impl VerdictCache {
    pub fn new(data_dir: Option<PathBuf>, ttl: Duration) -> Result<Self> {
        let db_path = match data_dir {
            Some(dir) => dir.join("msgscan_verdicts"),
            None => data_local_dir()
                .or_else(|| Some(PathBuf::from(".")))
                .unwrap()
                .join("msgscan")
                .join("verdicts"),
        };

        std::fs::create_dir_all(&db_path).context("Failed to create cache directory")?;

        let db = Config::default()
            .path(&db_path)
            .compression_factor(9)
            .open()
            .context("Failed to open verdict cache")?;

        let url_tree = db
            .open_tree(b"url_verdicts")
            .context("Failed to open URL verdict tree")?;
        let file_tree = db
            .open_tree(b"file_verdicts")
            .context("Failed to open file verdict tree")?;

        Ok(Self {
            db,
            url_tree,
            file_tree,
            ttl,
        })
    }

    fn tree(&self, kind: TargetKind) -> &sled::Tree {
        match kind {
            TargetKind::Url => &self.url_tree,
            TargetKind::File => &self.file_tree,
        }
    }

    /// Fresh verdict for the identity, or `None` on miss OR expiry. Storage
    /// faults propagate; they are infrastructure failures the caller must
    /// see, unlike service failures.
    pub fn get(&self, kind: TargetKind, identifier: &str) -> Result<Option<Verdict>> {
        match self.entry(kind, identifier)? {
            Some(entry) if Utc::now() - entry.last_scanned_at < self.ttl => {
                Ok(Some(entry.result))
            }
            Some(_) => {
                debug!("cache entry for {} {} expired", kind, identifier);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    /// Raw row including its timestamp, expiry ignored. For inspection.
    pub fn entry(&self, kind: TargetKind, identifier: &str) -> Result<Option<CacheEntry>> {
        let raw = self
            .tree(kind)
            .get(identifier.as_bytes())
            .context("Failed to read verdict cache")?;

        match raw {
            Some(value) => Ok(Some(
                bincode::deserialize(&value).context("Failed to decode cache entry")?,
            )),
            None => Ok(None),
        }
    }

    /// Upsert the verdict for an identity and refresh its scan timestamp.
    /// The transient `cached` flag is stripped before persisting.
    pub fn put(&self, kind: TargetKind, identifier: &str, verdict: &Verdict) -> Result<()> {
        let mut snapshot = verdict.clone();
        snapshot.cached = None;

        let entry = CacheEntry {
            identifier: identifier.to_string(),
            result: snapshot,
            last_scanned_at: Utc::now(),
        };
        let value = bincode::serialize(&entry).context("Failed to encode cache entry")?;

        self.tree(kind)
            .insert(identifier.as_bytes(), value)
            .context("Failed to store verdict")?;
        self.db.flush().context("Failed to flush verdict cache")?;

        debug!("cached {} verdict for {}", kind, identifier);
        Ok(())
    }

    /// Delete every entry, or every entry of one kind. Returns the number
    /// of rows removed.
    pub fn purge(&self, kind: Option<TargetKind>) -> Result<u64> {
        let targets: Vec<&sled::Tree> = match kind {
            Some(k) => vec![self.tree(k)],
            None => vec![&self.url_tree, &self.file_tree],
        };

        let mut removed = 0u64;
        for tree in targets {
            removed += tree.len() as u64;
            tree.clear().context("Failed to clear verdict tree")?;
        }

        self.db.flush().context("Failed to flush after purge")?;
        Ok(removed)
    }

    pub fn stats(&self) -> Result<HashMap<String, u64>> {
        let mut stats = HashMap::new();

        stats.insert("url_entries".to_string(), self.url_tree.len() as u64);
        stats.insert("file_entries".to_string(), self.file_tree.len() as u64);

        let size_on_disk = self.db.size_on_disk().context("Failed to get cache size")?;
        stats.insert("size_bytes".to_string(), size_on_disk);

        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::verdict::Source;
    use tempfile::TempDir;

    fn create_test_cache(ttl: Duration) -> (VerdictCache, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let cache = VerdictCache::new(Some(temp_dir.path().to_path_buf()), ttl).unwrap();
        (cache, temp_dir)
    }

    fn sample_verdict() -> Verdict {
        Verdict::from_stats(1, 2, 70, Some("https://example.com/report".to_string()), Source::Url)
    }

    #[test]
    fn test_put_then_get_within_ttl() {
        let (cache, _temp_dir) = create_test_cache(Duration::hours(24));
        let verdict = sample_verdict();

        cache.put(TargetKind::Url, "http://example.com", &verdict).unwrap();

        let hit = cache.get(TargetKind::Url, "http://example.com").unwrap().unwrap();
        assert_eq!(hit, verdict);
        assert!(hit.cached.is_none());
    }

    #[test]
    fn test_expired_entry_reads_as_miss_but_row_survives() {
        let (cache, _temp_dir) = create_test_cache(Duration::zero());
        let verdict = sample_verdict();

        cache.put(TargetKind::File, "abc123", &verdict).unwrap();

        assert!(cache.get(TargetKind::File, "abc123").unwrap().is_none());
        let row = cache.entry(TargetKind::File, "abc123").unwrap();
        assert!(row.is_some());
        assert_eq!(row.unwrap().result, verdict);
    }

    #[test]
    fn test_cached_flag_stripped_on_put() {
        let (cache, _temp_dir) = create_test_cache(Duration::hours(24));
        let mut verdict = sample_verdict();
        verdict.cached = Some(false);

        cache.put(TargetKind::Url, "http://example.com", &verdict).unwrap();

        let entry = cache.entry(TargetKind::Url, "http://example.com").unwrap().unwrap();
        assert!(entry.result.cached.is_none());
    }

    #[test]
    fn test_kinds_are_separate_namespaces() {
        let (cache, _temp_dir) = create_test_cache(Duration::hours(24));
        let verdict = sample_verdict();

        cache.put(TargetKind::Url, "shared-id", &verdict).unwrap();

        assert!(cache.get(TargetKind::Url, "shared-id").unwrap().is_some());
        assert!(cache.get(TargetKind::File, "shared-id").unwrap().is_none());
    }

    #[test]
    fn test_put_is_an_overwrite() {
        let (cache, _temp_dir) = create_test_cache(Duration::hours(24));

        cache.put(TargetKind::Url, "http://example.com", &sample_verdict()).unwrap();
        let clean = Verdict::from_stats(0, 0, 70, None, Source::Url);
        cache.put(TargetKind::Url, "http://example.com", &clean).unwrap();

        let hit = cache.get(TargetKind::Url, "http://example.com").unwrap().unwrap();
        assert_eq!(hit, clean);
        let stats = cache.stats().unwrap();
        assert_eq!(stats.get("url_entries").unwrap(), &1);
    }

    #[test]
    fn test_purge_one_kind() {
        let (cache, _temp_dir) = create_test_cache(Duration::hours(24));
        cache.put(TargetKind::Url, "http://a.com", &sample_verdict()).unwrap();
        cache.put(TargetKind::Url, "http://b.com", &sample_verdict()).unwrap();
        cache.put(TargetKind::File, "hash1", &sample_verdict()).unwrap();

        let removed = cache.purge(Some(TargetKind::Url)).unwrap();

        assert_eq!(removed, 2);
        assert!(cache.get(TargetKind::Url, "http://a.com").unwrap().is_none());
        assert!(cache.get(TargetKind::File, "hash1").unwrap().is_some());
    }

    #[test]
    fn test_purge_all() {
        let (cache, _temp_dir) = create_test_cache(Duration::hours(24));
        cache.put(TargetKind::Url, "http://a.com", &sample_verdict()).unwrap();
        cache.put(TargetKind::File, "hash1", &sample_verdict()).unwrap();

        let removed = cache.purge(None).unwrap();

        assert_eq!(removed, 2);
        let stats = cache.stats().unwrap();
        assert_eq!(stats.get("url_entries").unwrap(), &0);
        assert_eq!(stats.get("file_entries").unwrap(), &0);
    }

    #[test]
    fn test_stats_reports_size() {
        let (cache, _temp_dir) = create_test_cache(Duration::hours(24));
        cache.put(TargetKind::Url, "http://a.com", &sample_verdict()).unwrap();

        let stats = cache.stats().unwrap();
        assert_eq!(stats.get("url_entries").unwrap(), &1);
        assert!(stats.contains_key("size_bytes"));
    }
}
