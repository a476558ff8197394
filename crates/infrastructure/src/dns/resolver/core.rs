use crate::dns::cache::ResourceCache;
use crate::dns::codec::validate_name;
use crate::dns::transport::DnsTransport;
use dnslookup_domain::{
    normalize_name, DomainError, QueryKey, RecordType, ResolverConfig, ResourceRecord,
};
use futures::future::{BoxFuture, FutureExt};
use std::net::IpAddr;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Iterative resolver: walks the delegation tree itself, starting from the
/// closest name server found in the cache.
///
/// Every decoded record is cached, including referral and glue records, so
/// later lookups start closer to the answer. One top-level resolution runs
/// its sub-queries strictly in sequence.
pub struct IterativeResolver {
    pub(super) transport: Arc<dyn DnsTransport>,
    pub(super) cache: Arc<ResourceCache>,
    pub(super) config: ResolverConfig,
    /// Serialises send/receive pairs on the shared transport.
    pub(super) exchange_lock: tokio::sync::Mutex<()>,
}

impl IterativeResolver {
    pub fn new(
        transport: Arc<dyn DnsTransport>,
        cache: Arc<ResourceCache>,
        config: ResolverConfig,
    ) -> Self {
        info!(
            root_server = %config.root_server,
            port = config.port,
            timeout_ms = config.query_timeout,
            retransmissions = config.retransmissions,
            "Iterative resolver created"
        );

        Self {
            transport,
            cache,
            config,
            exchange_lock: tokio::sync::Mutex::new(()),
        }
    }

    pub fn root_server(&self) -> IpAddr {
        self.config.root_server
    }

    pub fn set_root_server(&mut self, root_server: IpAddr) {
        info!(root_server = %root_server, "Root server changed");
        self.config.root_server = root_server;
    }

    pub fn is_verbose(&self) -> bool {
        self.config.verbose
    }

    pub fn set_verbose(&mut self, verbose: bool) {
        self.config.verbose = verbose;
    }

    pub fn cache(&self) -> &Arc<ResourceCache> {
        &self.cache
    }

    /// Resolves `name`/`record_type`. Any failure, including "no such
    /// records", yields an empty set; see [`Self::lookup`] for the cause.
    pub async fn resolve(&self, name: &str, record_type: RecordType) -> Vec<ResourceRecord> {
        match self.lookup(name, record_type).await {
            Ok(records) => records,
            Err(e @ DomainError::IndirectionLimitExceeded { .. }) => {
                warn!(name, record_type = %record_type, error = %e, "Resolution abandoned");
                Vec::new()
            }
            Err(e) => {
                debug!(name, record_type = %record_type, error = %e, "Resolution failed");
                Vec::new()
            }
        }
    }

    /// Same algorithm as [`Self::resolve`], with the reason for an empty
    /// outcome surfaced as an error.
    pub async fn lookup(
        &self,
        name: &str,
        record_type: RecordType,
    ) -> Result<Vec<ResourceRecord>, DomainError> {
        validate_name(name)?;
        let key = QueryKey::new(normalize_name(name), record_type);
        self.resolve_at_level(key, 0, &[]).await
    }

    /// Enumerates the cache for diagnostics.
    pub fn dump<F>(&self, visitor: F)
    where
        F: FnMut(&QueryKey, &[ResourceRecord]),
    {
        let metrics = self.cache.metrics();
        debug!(
            keys = self.cache.len(),
            hits = metrics.hits.load(Ordering::Relaxed),
            misses = metrics.misses.load(Ordering::Relaxed),
            hit_rate = metrics.hit_rate(),
            "Dumping cache"
        );
        self.cache.for_each(visitor);
    }

    /// One step of the CNAME chase. `level` counts the aliases followed so
    /// far; `in_flight` holds the queries further up the call chain that are
    /// waiting on this one.
    pub(super) fn resolve_at_level<'a>(
        &'a self,
        key: QueryKey,
        level: usize,
        in_flight: &'a [QueryKey],
    ) -> BoxFuture<'a, Result<Vec<ResourceRecord>, DomainError>> {
        async move {
            if level > self.config.max_indirection {
                return Err(DomainError::IndirectionLimitExceeded {
                    limit: self.config.max_indirection,
                });
            }

            if let Some(found) = self.answer_from_cache(&key, level, in_flight).await {
                return found;
            }

            let network = self.query_delegation(&key, true, 0, in_flight).await;
            if let Err(ref e) = network {
                debug!(query = %key, error = %e, "Network round ended without an answer");
            }

            if let Some(found) = self.answer_from_cache(&key, level, in_flight).await {
                return found;
            }

            network?;
            Err(DomainError::NotFound {
                name: key.name.to_string(),
            })
        }
        .boxed()
    }

    /// Cached answer for `key`, or the result of chasing a cached CNAME.
    /// `None` when the cache holds neither.
    async fn answer_from_cache(
        &self,
        key: &QueryKey,
        level: usize,
        in_flight: &[QueryKey],
    ) -> Option<Result<Vec<ResourceRecord>, DomainError>> {
        let records = self.cache.lookup(key);
        if !records.is_empty() {
            return Some(Ok(records));
        }

        if key.record_type == RecordType::CNAME {
            return None;
        }

        let alias = self.cache.lookup(&key.with_type(RecordType::CNAME));
        let target = alias.iter().find_map(|record| record.value.as_name())?;

        debug!(alias = %key.name, target, level, "Following CNAME");
        let next = QueryKey::new(target, key.record_type);
        Some(self.resolve_at_level(next, level + 1, in_flight).await)
    }
}
