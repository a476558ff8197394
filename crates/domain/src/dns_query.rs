use super::RecordType;
use std::fmt;
use std::sync::Arc;

/// A (name, type) pair. Identifies cache entries as well as queries that are
/// in flight. Names compare exactly, case included.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    pub name: Arc<str>,
    pub record_type: RecordType,
}

impl QueryKey {
    pub fn new(name: impl Into<Arc<str>>, record_type: RecordType) -> Self {
        Self {
            name: name.into(),
            record_type,
        }
    }

    /// Same name, different type. Used for the CNAME and NS side lookups.
    pub fn with_type(&self, record_type: RecordType) -> Self {
        Self {
            name: self.name.clone(),
            record_type,
        }
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.record_type)
    }
}

/// Drops a single trailing dot so `example.com.` and `example.com` share a
/// key. The root is the empty name.
pub fn normalize_name(name: &str) -> &str {
    name.strip_suffix('.').unwrap_or(name)
}

/// The enclosing zone of `name`, or `None` once the root has been reached.
pub fn parent_zone(name: &str) -> Option<&str> {
    if name.is_empty() {
        return None;
    }
    match name.split_once('.') {
        Some((_, parent)) => Some(parent),
        None => Some(""),
    }
}
