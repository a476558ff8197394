use clap::Parser;
use dnslookup_domain::CliOverrides;
use dnslookup_infrastructure::dns::{IterativeResolver, ResourceCache, UdpTransport};
use std::net::IpAddr;
use std::sync::Arc;
use tracing::info;

mod bootstrap;
mod output;
mod repl;

#[derive(Parser)]
#[command(name = "dnslookup")]
#[command(version)]
#[command(about = "Interactive iterative DNS resolver")]
struct Cli {
    /// IP address of the root DNS server to start the search at
    root_server: IpAddr,

    /// Configuration file path
    #[arg(short = 'c', long, value_name = "FILE")]
    config: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Start with verbose tracing switched on
    #[arg(long)]
    trace: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let cli_overrides = CliOverrides {
        root_server: Some(cli.root_server),
        log_level: cli.log_level.clone(),
        trace: cli.trace,
    };

    let config = bootstrap::load_config(cli.config.as_deref(), cli_overrides)?;

    bootstrap::init_logging(&config);

    info!("Starting dnslookup v{}", env!("CARGO_PKG_VERSION"));

    let transport = UdpTransport::bind_for(config.resolver.root_server).await?;
    let cache = Arc::new(ResourceCache::new());
    let mut resolver = IterativeResolver::new(Arc::new(transport), cache, config.resolver);

    println!("Root DNS server is: {}", resolver.root_server());

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    repl::run(&mut resolver, stdin, &mut std::io::stdout()).await?;

    Ok(())
}
