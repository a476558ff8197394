mod metrics;
mod record;
mod storage;

pub use metrics::CacheMetrics;
pub use record::CachedRecord;
pub use storage::ResourceCache;
