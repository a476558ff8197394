//! UDP transport (RFC 1035 §4.2.1).
//!
//! One socket serves every exchange. Replies are capped at 1024 bytes; the
//! resolver never advertises EDNS(0) so servers stay within 512.

use super::DnsTransport;
use async_trait::async_trait;
use dnslookup_domain::DomainError;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use std::sync::Mutex;
use std::time::Duration;
use tokio::net::UdpSocket;
use tracing::{debug, warn};

const MAX_UDP_RESPONSE_SIZE: usize = 1024;

pub struct UdpTransport {
    socket: UdpSocket,
    /// Destination of the last send; used to flag replies from elsewhere.
    last_server: Mutex<Option<SocketAddr>>,
}

impl UdpTransport {
    /// Binds an ephemeral port on the wildcard address of the same family
    /// as `server`.
    pub async fn bind_for(server: IpAddr) -> Result<Self, DomainError> {
        let bind_addr = match server {
            IpAddr::V4(_) => SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 0),
            IpAddr::V6(_) => SocketAddr::new(IpAddr::V6(Ipv6Addr::UNSPECIFIED), 0),
        };
        Self::bind(bind_addr).await
    }

    pub async fn bind(bind_addr: SocketAddr) -> Result<Self, DomainError> {
        let socket = UdpSocket::bind(bind_addr).await.map_err(|e| {
            DomainError::IoError(format!("Failed to bind UDP socket on {}: {}", bind_addr, e))
        })?;

        debug!(local = ?socket.local_addr().ok(), "UDP transport bound");

        Ok(Self {
            socket,
            last_server: Mutex::new(None),
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, DomainError> {
        self.socket
            .local_addr()
            .map_err(|e| DomainError::IoError(e.to_string()))
    }

    fn last_server(&self) -> Option<SocketAddr> {
        self.last_server.lock().ok().and_then(|guard| *guard)
    }
}

#[async_trait]
impl DnsTransport for UdpTransport {
    async fn send(&self, message_bytes: &[u8], server: SocketAddr) -> Result<(), DomainError> {
        if let Ok(mut last) = self.last_server.lock() {
            *last = Some(server);
        }

        let bytes_sent = self
            .socket
            .send_to(message_bytes, server)
            .await
            .map_err(|e| {
                DomainError::IoError(format!("Failed to send UDP query to {}: {}", server, e))
            })?;

        debug!(server = %server, bytes_sent, "UDP query sent");
        Ok(())
    }

    async fn receive(&self, timeout: Duration) -> Result<Vec<u8>, DomainError> {
        let mut recv_buf = vec![0u8; MAX_UDP_RESPONSE_SIZE];
        let server = self.last_server();

        let (bytes_received, from_addr) =
            tokio::time::timeout(timeout, self.socket.recv_from(&mut recv_buf))
                .await
                .map_err(|_| DomainError::TransportTimeout {
                    server: server.map_or_else(|| "unknown".to_string(), |s| s.to_string()),
                })?
                .map_err(|e| {
                    DomainError::IoError(format!("Failed to receive UDP response: {}", e))
                })?;

        if let Some(expected) = server {
            if from_addr.ip() != expected.ip() {
                warn!(
                    expected = %expected,
                    received_from = %from_addr,
                    "UDP response from unexpected source"
                );
            }
        }

        recv_buf.truncate(bytes_received);

        debug!(
            from = %from_addr,
            bytes_received,
            "UDP response received"
        );

        Ok(recv_buf)
    }
}
