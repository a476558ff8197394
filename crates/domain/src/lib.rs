//! dnslookup domain layer
pub mod config;
pub mod dns_query;
pub mod dns_record;
pub mod errors;

pub use config::{CliOverrides, Config, ConfigError, LoggingConfig, ResolverConfig};
pub use dns_query::{normalize_name, parent_zone, QueryKey};
pub use dns_record::{RecordType, RecordValue, ResourceRecord};
pub use errors::{DecodeError, DomainError, ProtocolError};
