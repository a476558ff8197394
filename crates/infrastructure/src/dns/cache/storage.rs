use super::{CacheMetrics, CachedRecord};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use dnslookup_domain::{QueryKey, ResourceRecord};
use rustc_hash::FxBuildHasher;
use std::sync::atomic::Ordering as AtomicOrdering;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::time::Instant;
use tracing::debug;

/// TTL-bounded record store keyed by (name, type).
///
/// Expired records are filtered out on read and only physically removed by
/// [`ResourceCache::purge_expired`]. Each key's record set is guarded by its
/// DashMap shard, so an insert and a lookup on the same key never interleave.
pub struct ResourceCache {
    entries: DashMap<QueryKey, Vec<CachedRecord>, FxBuildHasher>,
    /// Keys in first-insertion order, for `for_each`.
    order: Mutex<Vec<QueryKey>>,
    metrics: Arc<CacheMetrics>,
}

impl ResourceCache {
    pub fn new() -> Self {
        Self {
            entries: DashMap::with_hasher(FxBuildHasher),
            order: Mutex::new(Vec::new()),
            metrics: Arc::new(CacheMetrics::default()),
        }
    }

    /// Live records for `key`, in insertion order. Empty when the key was
    /// never inserted or all of its records have expired.
    pub fn lookup(&self, key: &QueryKey) -> Vec<ResourceRecord> {
        let records = self.live_records(key, Instant::now());

        let counter = if records.is_empty() {
            &self.metrics.misses
        } else {
            &self.metrics.hits
        };
        counter.fetch_add(1, AtomicOrdering::Relaxed);

        records
    }

    /// Stores `record` under (name, type) with expiry `now + ttl`.
    ///
    /// A record whose value is already present for the key replaces the
    /// older copy, refreshing its TTL and expiry.
    pub fn insert(&self, record: ResourceRecord) {
        let key = QueryKey::new(record.name.clone(), record.record_type);
        let cached = CachedRecord::new(record, Instant::now());

        // Lock order is `order` then shard, as in `purge_expired`, so a new
        // key is listed exactly once.
        let mut order = self.order.lock().unwrap_or_else(PoisonError::into_inner);
        match self.entries.entry(key) {
            Entry::Occupied(mut entry) => {
                let records = entry.get_mut();
                match records
                    .iter_mut()
                    .find(|existing| existing.record.value == cached.record.value)
                {
                    Some(existing) => *existing = cached,
                    None => records.push(cached),
                }
            }
            Entry::Vacant(entry) => {
                order.push(entry.key().clone());
                entry.insert(vec![cached]);
            }
        }
        drop(order);

        self.metrics.insertions.fetch_add(1, AtomicOrdering::Relaxed);
    }

    /// Visits every key that still has live records, in the order the keys
    /// were first inserted.
    pub fn for_each<F>(&self, mut visitor: F)
    where
        F: FnMut(&QueryKey, &[ResourceRecord]),
    {
        let keys = self
            .order
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        let now = Instant::now();

        for key in &keys {
            let records = self.live_records(key, now);
            if !records.is_empty() {
                visitor(key, &records);
            }
        }
    }

    /// Physically drops expired records and keys left without records.
    /// Returns the number of records removed.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut removed = 0;

        let mut order = self.order.lock().unwrap_or_else(PoisonError::into_inner);

        self.entries.retain(|_, records| {
            let before = records.len();
            records.retain(|cached| !cached.is_expired(now));
            removed += before - records.len();
            !records.is_empty()
        });
        order.retain(|key| self.entries.contains_key(key));

        if removed > 0 {
            self.metrics
                .expirations
                .fetch_add(removed as u64, AtomicOrdering::Relaxed);
            debug!(removed, remaining_keys = order.len(), "Purged expired records");
        }

        removed
    }

    /// Number of keys held, including keys whose records have all expired
    /// but have not been purged yet.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn metrics(&self) -> Arc<CacheMetrics> {
        Arc::clone(&self.metrics)
    }

    fn live_records(&self, key: &QueryKey, now: Instant) -> Vec<ResourceRecord> {
        self.entries
            .get(key)
            .map(|records| {
                records
                    .iter()
                    .filter(|cached| !cached.is_expired(now))
                    .map(|cached| cached.record.clone())
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl Default for ResourceCache {
    fn default() -> Self {
        Self::new()
    }
}
