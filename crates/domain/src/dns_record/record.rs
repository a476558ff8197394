use super::RecordType;
use std::fmt;
use std::net::IpAddr;
use std::sync::Arc;

/// Decoded RDATA. Address and name payloads stay typed because the resolver
/// follows them; everything else is kept as a descriptive string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RecordValue {
    Address(IpAddr),

    Name(Arc<str>),

    Text(String),

    /// RDATA of a type the codec does not interpret.
    Opaque { rdlength: u16 },
}

impl RecordValue {
    pub fn as_address(&self) -> Option<IpAddr> {
        match self {
            RecordValue::Address(addr) => Some(*addr),
            _ => None,
        }
    }

    pub fn as_name(&self) -> Option<&str> {
        match self {
            RecordValue::Name(name) => Some(name),
            _ => None,
        }
    }
}

impl fmt::Display for RecordValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordValue::Address(addr) => write!(f, "{}", addr),
            RecordValue::Name(name) => write!(f, "{}", name),
            RecordValue::Text(text) => write!(f, "{}", text),
            RecordValue::Opaque { rdlength } => write!(f, "<unparsed rdata, {} bytes>", rdlength),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceRecord {
    pub name: Arc<str>,

    pub record_type: RecordType,

    /// Always positive; see `ZERO_TTL_PLACEHOLDER_SECS` in the codec.
    pub ttl: u32,

    pub value: RecordValue,
}

impl ResourceRecord {
    pub fn new(
        name: impl Into<Arc<str>>,
        record_type: RecordType,
        ttl: u32,
        value: RecordValue,
    ) -> Self {
        Self {
            name: name.into(),
            record_type,
            ttl,
            value,
        }
    }

    pub fn address(name: impl Into<Arc<str>>, ttl: u32, addr: IpAddr) -> Self {
        let record_type = if addr.is_ipv4() {
            RecordType::A
        } else {
            RecordType::AAAA
        };
        Self::new(name, record_type, ttl, RecordValue::Address(addr))
    }

    pub fn name_server(zone: impl Into<Arc<str>>, ttl: u32, host: &str) -> Self {
        Self::new(zone, RecordType::NS, ttl, RecordValue::Name(host.into()))
    }

    pub fn canonical_name(alias: impl Into<Arc<str>>, ttl: u32, target: &str) -> Self {
        Self::new(alias, RecordType::CNAME, ttl, RecordValue::Name(target.into()))
    }
}

impl fmt::Display for ResourceRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<30} {:<10} {:<4} {}",
            self.name, self.ttl, self.record_type, self.value
        )
    }
}
