pub mod udp;

use async_trait::async_trait;
use dnslookup_domain::DomainError;
use std::net::SocketAddr;
use std::time::Duration;

pub use udp::UdpTransport;

/// Datagram exchange used by the resolver.
///
/// `send` and `receive` are separate so the resolver can keep reading after
/// a stale reply and retransmit on the same socket.
#[async_trait]
pub trait DnsTransport: Send + Sync {
    async fn send(&self, message_bytes: &[u8], server: SocketAddr) -> Result<(), DomainError>;

    /// Waits up to `timeout` for the next datagram. Expiry is reported as
    /// [`DomainError::TransportTimeout`].
    async fn receive(&self, timeout: Duration) -> Result<Vec<u8>, DomainError>;
}
