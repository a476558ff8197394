pub mod cache;
pub mod codec;
pub mod resolver;
pub mod transport;

pub use cache::{CacheMetrics, ResourceCache};
pub use codec::{decode_message, encode_query, DecodedMessage, Header, Section};
pub use resolver::IterativeResolver;
pub use transport::{DnsTransport, UdpTransport};
