use super::core::IterativeResolver;
use dnslookup_domain::{parent_zone, QueryKey, RecordType};
use std::net::IpAddr;
use std::sync::Arc;
use tracing::debug;

impl IterativeResolver {
    /// Addresses of the closest cached name servers for `key`.
    ///
    /// Walks from the full name towards the root looking for cached NS
    /// records. Addresses come from cached A records first; otherwise each
    /// name server host is resolved on its own. A `robust` walk falls back
    /// to the root server at the top and keeps climbing past zones whose
    /// servers cannot be resolved. A non-robust walk gives up in both
    /// cases and returns nothing.
    pub(super) async fn name_server_addresses(
        &self,
        key: &QueryKey,
        robust: bool,
        in_flight: &[QueryKey],
    ) -> Vec<IpAddr> {
        let mut zone: Arc<str> = key.name.clone();

        loop {
            let hosts: Vec<Arc<str>> = self
                .cache
                .lookup(&QueryKey::new(zone.clone(), RecordType::NS))
                .iter()
                .filter_map(|record| record.value.as_name())
                .map(Arc::from)
                .collect();

            if !hosts.is_empty() {
                let addresses = self.cached_addresses(&hosts);
                if !addresses.is_empty() {
                    return addresses;
                }

                let addresses = self.resolve_hosts(key, &hosts, in_flight).await;
                if !addresses.is_empty() {
                    return addresses;
                }

                if !robust {
                    debug!(zone = %zone, "No name server address for delegated zone");
                    return Vec::new();
                }
            }

            let Some(parent) = parent_zone(&zone).map(Arc::<str>::from) else {
                if robust {
                    debug!(query = %key, root = %self.config.root_server, "Falling back to root server");
                    return vec![self.config.root_server];
                }
                return Vec::new();
            };
            zone = parent;
        }
    }

    fn cached_addresses(&self, hosts: &[Arc<str>]) -> Vec<IpAddr> {
        hosts
            .iter()
            .flat_map(|host| self.cache.lookup(&QueryKey::new(host.clone(), RecordType::A)))
            .filter_map(|record| record.value.as_address())
            .collect()
    }

    /// Resolves name server hosts that have no cached address. A host whose
    /// lookup is already in flight further up the chain is skipped, since
    /// it is waiting on this very walk.
    async fn resolve_hosts(
        &self,
        key: &QueryKey,
        hosts: &[Arc<str>],
        in_flight: &[QueryKey],
    ) -> Vec<IpAddr> {
        let mut chain = in_flight.to_vec();
        chain.push(key.clone());

        let mut addresses = Vec::new();
        for host in hosts {
            let host_key = QueryKey::new(host.clone(), RecordType::A);
            if chain.contains(&host_key) {
                debug!(host = %host, "Name server lookup already in flight, skipping");
                continue;
            }

            match self.resolve_at_level(host_key, 0, &chain).await {
                Ok(records) => {
                    addresses.extend(records.iter().filter_map(|r| r.value.as_address()));
                }
                Err(e) => {
                    debug!(host = %host, error = %e, "Could not resolve name server address");
                }
            }
        }
        addresses
    }
}
