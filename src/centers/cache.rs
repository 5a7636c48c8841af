//! File-based listing cache at `~/.comitia/centers.json`.
//!
//! TTL: 24 hours. Keys are filter keys (see [`CenterFilter::cache_key`]).
//! Expired listings stay around for a week as an offline fallback, and at
//! most [`MAX_LISTINGS`] are kept; older ones are dropped on write.
//! Also remembers the last origin used, for offline lookups.
//! A missing or unreadable file is treated as an empty cache.

use super::types::{CenterFilter, CenterRecord};
use crate::geo::GeoPoint;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub const CACHE_FILE: &str = "centers.json";
const CACHE_TTL_MS: i64 = 24 * 3600 * 1000;
const RETENTION_MS: i64 = 7 * CACHE_TTL_MS;
pub const MAX_LISTINGS: usize = 64;

#[derive(Serialize, Deserialize, Clone)]
struct ListingEntry {
    records: Vec<CenterRecord>,
    timestamp: i64,
}

#[derive(Serialize, Deserialize, Clone)]
struct OriginEntry {
    point: GeoPoint,
    timestamp: i64,
}

#[derive(Serialize, Deserialize, Default)]
struct CacheFile {
    #[serde(default)]
    listings: HashMap<String, ListingEntry>,
    #[serde(default)]
    last_origin: Option<OriginEntry>,
}

/// Result of a cache lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup {
    Fresh(Vec<CenterRecord>),
    Stale(Vec<CenterRecord>),
}

/// The listing cache.
pub struct CenterCache {
    path: PathBuf,
    file: CacheFile,
}

impl CenterCache {
    /// Load the cache stored in `dir`.
    pub fn load(dir: &Path) -> Self {
        Self::load_from(dir.join(CACHE_FILE))
    }

    /// Load from an explicit file path.
    pub fn load_from(path: PathBuf) -> Self {
        let file = Self::read_file(&path).unwrap_or_default();
        debug!(path = %path.display(), listings = file.listings.len(), "loaded center cache");
        Self { path, file }
    }

    fn read_file(path: &Path) -> Option<CacheFile> {
        let data = fs::read_to_string(path).ok()?;
        match serde_json::from_str(&data) {
            Ok(f) => Some(f),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "ignoring corrupt center cache");
                None
            }
        }
    }

    /// Look up a listing, reporting whether it has expired.
    pub fn get(&self, filter: &CenterFilter) -> Option<Lookup> {
        let entry = self.file.listings.get(&filter.cache_key())?;
        let now = chrono::Utc::now().timestamp_millis();
        if now - entry.timestamp > CACHE_TTL_MS {
            Some(Lookup::Stale(entry.records.clone()))
        } else {
            Some(Lookup::Fresh(entry.records.clone()))
        }
    }

    /// Store a listing and persist to disk.
    pub fn put(&mut self, filter: &CenterFilter, records: &[CenterRecord]) {
        self.put_at(filter, records, chrono::Utc::now().timestamp_millis());
    }

    fn put_at(&mut self, filter: &CenterFilter, records: &[CenterRecord], timestamp: i64) {
        self.file.listings.insert(
            filter.cache_key(),
            ListingEntry { records: records.to_vec(), timestamp },
        );
        self.prune(chrono::Utc::now().timestamp_millis());
        self.persist();
    }

    /// Drop listings past the retention window, then the oldest beyond `MAX_LISTINGS`.
    fn prune(&mut self, now: i64) {
        let before = self.file.listings.len();
        self.file.listings.retain(|_, e| now - e.timestamp <= RETENTION_MS);

        if self.file.listings.len() > MAX_LISTINGS {
            let mut by_age: Vec<(String, i64)> = self
                .file
                .listings
                .iter()
                .map(|(k, e)| (k.clone(), e.timestamp))
                .collect();
            by_age.sort_by_key(|(_, ts)| *ts);
            let excess = by_age.len() - MAX_LISTINGS;
            for (key, _) in by_age.into_iter().take(excess) {
                self.file.listings.remove(&key);
            }
        }

        let dropped = before - self.file.listings.len();
        if dropped > 0 {
            debug!(dropped, kept = self.file.listings.len(), "pruned center cache");
        }
    }

    /// Last origin recorded within the TTL.
    pub fn last_origin(&self) -> Option<GeoPoint> {
        let entry = self.file.last_origin.as_ref()?;
        let now = chrono::Utc::now().timestamp_millis();
        (now - entry.timestamp <= CACHE_TTL_MS && entry.point.is_valid()).then_some(entry.point)
    }

    pub fn set_last_origin(&mut self, point: GeoPoint) {
        self.file.last_origin = Some(OriginEntry {
            point,
            timestamp: chrono::Utc::now().timestamp_millis(),
        });
        self.persist();
    }

    fn persist(&self) {
        if let Some(parent) = self.path.parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                warn!(dir = %parent.display(), error = %e, "cannot create cache directory");
                return;
            }
        }
        match serde_json::to_string_pretty(&self.file) {
            Ok(json) => {
                if let Err(e) = fs::write(&self.path, json) {
                    warn!(path = %self.path.display(), error = %e, "cannot write center cache");
                }
            }
            Err(e) => warn!(error = %e, "cannot serialize center cache"),
        }
    }

    /// Number of cached listings.
    pub fn len(&self) -> usize {
        self.file.listings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.file.listings.is_empty()
    }
}
