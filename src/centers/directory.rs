//! Center directory — orchestrates the listing fallback chain.
//!
//! Online:  API → cache (fresh) → cache (stale) → error
//! Offline: cache (fresh) → cache (stale) → CacheMiss
//!
//! The cache lock is held only for cache reads and writes, never across a
//! backend request.

use super::cache::{CenterCache, Lookup};
use super::client::CenterClient;
use super::types::{CenterError, CenterFilter, CenterListing, CenterRecord, CenterSource, VotingCenter};
use crate::geo::GeoPoint;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, warn};

pub struct CenterDirectory {
    client: CenterClient,
    cache: Mutex<CenterCache>,
    offline: bool,
}

impl CenterDirectory {
    pub fn new(client: CenterClient, cache: CenterCache) -> Self {
        Self { client, cache: Mutex::new(cache), offline: false }
    }

    /// Set offline mode — skip network calls.
    pub fn set_offline(&mut self, offline: bool) {
        self.offline = offline;
    }

    pub fn client(&self) -> &CenterClient {
        &self.client
    }

    // Poisoning is ignored: the cache file is always rewritten whole.
    fn cache(&self) -> MutexGuard<'_, CenterCache> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Number of cached listings.
    pub fn cached_listings(&self) -> usize {
        self.cache().len()
    }

    /// Last origin recorded within the cache TTL.
    pub fn last_origin(&self) -> Option<GeoPoint> {
        self.cache().last_origin()
    }

    pub fn remember_origin(&self, point: GeoPoint) {
        self.cache().set_last_origin(point);
    }

    /// List voting centers for `filter` through the fallback chain.
    pub fn list(&self, filter: &CenterFilter) -> Result<CenterListing, CenterError> {
        let mut network_error = None;

        if !self.offline {
            match self.client.list_centers(filter) {
                Ok(records) => {
                    info!(count = records.len(), key = %filter.cache_key(), "fetched voting centers");
                    self.cache().put(filter, &records);
                    return Ok(listing(&records, CenterSource::Api));
                }
                Err(e) => {
                    warn!(error = %e, "voting center listing failed, trying cache");
                    network_error = Some(e);
                }
            }
        }

        let cached = self.cache().get(filter);
        match cached {
            Some(Lookup::Fresh(records)) => Ok(listing(&records, CenterSource::Cache)),
            Some(Lookup::Stale(records)) => {
                warn!(key = %filter.cache_key(), "serving expired voting center cache");
                Ok(listing(&records, CenterSource::StaleCache))
            }
            None => Err(network_error.unwrap_or(CenterError::CacheMiss)),
        }
    }
}

fn listing(records: &[CenterRecord], source: CenterSource) -> CenterListing {
    let centers: Vec<VotingCenter> = records.iter().map(CenterRecord::to_voting_center).collect();
    let unlocated = centers.iter().filter(|c| c.location.is_none()).count();
    if unlocated > 0 {
        debug!(unlocated, total = centers.len(), "centers without usable coordinates");
    }
    CenterListing { centers, source }
}
