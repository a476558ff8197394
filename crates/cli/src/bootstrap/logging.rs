use dnslookup_domain::Config;
use dnslookup_infrastructure::dns::resolver::TRACE_TARGET;
use tracing_subscriber::EnvFilter;

/// Installs the fmt subscriber.
///
/// RUST_LOG overrides the configured levels, e.g. to see every contact:
///   RUST_LOG=debug,dnslookup::trace=info
pub fn init_logging(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.logging.directives(TRACE_TARGET)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .try_init()
        .ok();
}
