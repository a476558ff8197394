use super::core::IterativeResolver;
use super::trace;
use crate::dns::codec::{build_query, decode_message, response_id, Header};
use dnslookup_domain::{DomainError, ProtocolError, QueryKey};
use futures::future::{BoxFuture, FutureExt};
use std::net::{IpAddr, SocketAddr};
use tokio::time::Instant;
use tracing::debug;

/// What a usable response from one server means for the current level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum ServerOutcome {
    /// Authoritative answer; its records are cached.
    Answered,
    /// Non-authoritative response naming closer name servers.
    Referral,
}

impl IterativeResolver {
    /// Queries the name servers for `key` one after another until one of
    /// them answers or refers. A referral restarts the walk from the newly
    /// cached delegation, one hop deeper.
    pub(super) fn query_delegation<'a>(
        &'a self,
        key: &'a QueryKey,
        robust: bool,
        depth: usize,
        in_flight: &'a [QueryKey],
    ) -> BoxFuture<'a, Result<(), DomainError>> {
        async move {
            if depth > self.config.max_referral_depth {
                return Err(DomainError::ReferralLimitExceeded {
                    limit: self.config.max_referral_depth,
                });
            }

            let servers = self.name_server_addresses(key, robust, in_flight).await;
            debug!(query = %key, depth, candidates = servers.len(), "Name servers selected");

            for server in servers {
                match self.query_server(key, server).await {
                    Ok(ServerOutcome::Answered) => return Ok(()),
                    Ok(ServerOutcome::Referral) => {
                        return self.query_delegation(key, false, depth + 1, in_flight).await;
                    }
                    Err(e) if e.stops_candidate_walk() => return Err(e),
                    Err(e) => {
                        debug!(
                            query = %key,
                            server = %server,
                            error = %e,
                            "Name server failed, trying next candidate"
                        );
                    }
                }
            }

            Err(DomainError::Exhausted {
                name: key.name.to_string(),
            })
        }
        .boxed()
    }

    /// One contact with one server: send, await the matching reply, check
    /// the header, then cache every decodable record.
    pub(super) async fn query_server(
        &self,
        key: &QueryKey,
        server: IpAddr,
    ) -> Result<ServerOutcome, DomainError> {
        let (id, query) = build_query(&key.name, key.record_type)?;
        let server = SocketAddr::new(server, self.config.port);

        let response = self.exchange(key, server, id, &query).await?;

        let header = Header::decode(&response)?;
        header.validate_response()?;
        if header.authoritative && header.ancount == 0 {
            return Err(ProtocolError::AuthoritativeEmpty.into());
        }

        trace::response_received(self.config.verbose, id, header.authoritative);

        let message = decode_message(&response, key)?;
        trace::message_records(self.config.verbose, &message);
        if message.skipped > 0 {
            debug!(server = %server, skipped = message.skipped, "Some records were not decodable");
        }
        for record in message.into_records() {
            self.cache.insert(record);
        }

        if header.authoritative {
            Ok(ServerOutcome::Answered)
        } else if header.nscount == 0 {
            Err(ProtocolError::MissingReferral.into())
        } else {
            Ok(ServerOutcome::Referral)
        }
    }

    /// Sends `query` and waits for the reply carrying `id`, retransmitting
    /// after each timeout up to the configured count.
    async fn exchange(
        &self,
        key: &QueryKey,
        server: SocketAddr,
        id: u16,
        query: &[u8],
    ) -> Result<Vec<u8>, DomainError> {
        let _exclusive = self.exchange_lock.lock().await;

        for attempt in 0..=self.config.retransmissions {
            trace::query_sent(self.config.verbose, id, key, server);
            self.transport.send(query, server).await?;

            match self.await_reply(id).await {
                Ok(response) => return Ok(response),
                Err(e) if e.is_timeout() => {
                    debug!(server = %server, id, attempt, "No reply before timeout");
                }
                Err(e) => return Err(e),
            }
        }

        Err(DomainError::TransportTimeout {
            server: server.to_string(),
        })
    }

    /// Reads datagrams until one carries `id`. Stale replies to earlier
    /// sends are dropped; all reads share one timeout window.
    async fn await_reply(&self, id: u16) -> Result<Vec<u8>, DomainError> {
        let deadline = Instant::now() + self.config.timeout();

        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            let response = self.transport.receive(remaining).await?;

            match response_id(&response) {
                Some(received) if received == id => return Ok(response),
                received => {
                    let mismatch = ProtocolError::TransactionIdMismatch {
                        expected: id,
                        received: received.unwrap_or_default(),
                    };
                    debug!(error = %mismatch, "Discarding stale reply");
                }
            }
        }
    }
}
