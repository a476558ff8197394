use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr};
use std::time::Duration;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ResolverConfig {
    /// Server contacted when no closer name server is cached.
    #[serde(default = "default_root_server")]
    pub root_server: IpAddr,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Receive timeout in milliseconds.
    #[serde(default = "default_query_timeout")]
    pub query_timeout: u64,

    /// Extra sends to the same server after a receive timeout.
    #[serde(default = "default_retransmissions")]
    pub retransmissions: u8,

    #[serde(default = "default_max_indirection")]
    pub max_indirection: usize,

    #[serde(default = "default_max_referral_depth")]
    pub max_referral_depth: usize,

    #[serde(default)]
    pub verbose: bool,
}

impl ResolverConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.query_timeout)
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            root_server: default_root_server(),
            port: default_port(),
            query_timeout: default_query_timeout(),
            retransmissions: default_retransmissions(),
            max_indirection: default_max_indirection(),
            max_referral_depth: default_max_referral_depth(),
            verbose: false,
        }
    }
}

fn default_root_server() -> IpAddr {
    // a.root-servers.net
    IpAddr::V4(Ipv4Addr::new(198, 41, 0, 4))
}

fn default_port() -> u16 {
    53
}

fn default_query_timeout() -> u64 {
    5000
}

fn default_retransmissions() -> u8 {
    1
}

fn default_max_indirection() -> usize {
    10
}

fn default_max_referral_depth() -> usize {
    16
}
