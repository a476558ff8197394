use dnslookup_domain::ResourceRecord;
use std::time::Duration;
use tokio::time::Instant;

#[derive(Debug, Clone)]
pub struct CachedRecord {
    pub record: ResourceRecord,
    pub expires_at: Instant,
}

impl CachedRecord {
    pub fn new(record: ResourceRecord, now: Instant) -> Self {
        let expires_at = now + Duration::from_secs(record.ttl as u64);
        Self { record, expires_at }
    }

    #[inline]
    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}
