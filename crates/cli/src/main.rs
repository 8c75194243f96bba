use clap::Parser;
use dns_relay_domain::CliOverrides;
use std::net::{IpAddr, SocketAddr};
use tracing::{error, info, warn};

mod bootstrap;
mod di;
mod server;

use server::RestartPolicy;

#[derive(Parser)]
#[command(name = "dns-relay")]
#[command(version)]
#[command(about = "Caching DNS relay with local override rules")]
struct Cli {
    /// Configuration file path
    #[arg(short = 'c', long, value_name = "FILE")]
    config: Option<String>,

    /// DNS server port
    #[arg(short = 'd', long)]
    dns_port: Option<u16>,

    /// IPv4 bind address
    #[arg(short = 'b', long)]
    bind: Option<String>,

    /// Upstream resolver (IPv4)
    #[arg(short = 'u', long)]
    upstream: Option<String>,

    /// Upstream resolver used by the IPv6 listener
    #[arg(long)]
    upstream_v6: Option<String>,

    /// Upstream resolver port
    #[arg(long)]
    upstream_port: Option<u16>,

    /// Upstream reply timeout in milliseconds (0 waits forever)
    #[arg(long, value_name = "MS")]
    timeout: Option<u64>,

    /// Rule file path
    #[arg(short = 'r', long, value_name = "FILE")]
    rules: Option<String>,

    /// Maximum number of cached domains
    #[arg(long)]
    cache_size: Option<usize>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let cli_overrides = CliOverrides {
        dns_port: cli.dns_port,
        bind_address: cli.bind,
        upstream_ipv4: cli.upstream,
        upstream_ipv6: cli.upstream_v6,
        upstream_port: cli.upstream_port,
        upstream_timeout_ms: cli.timeout,
        cache_max_entries: cli.cache_size,
        rules_path: cli.rules,
        log_level: cli.log_level,
    };

    let config = bootstrap::load_config(cli.config.as_deref(), cli_overrides)?;

    bootstrap::init_logging(&config)?;

    info!("Starting DNS relay v{}", env!("CARGO_PKG_VERSION"));

    let rules = bootstrap::load_rules(&config)?;
    let services = di::DnsServices::new(&config, rules)?;
    let restart = RestartPolicy::from_config(&config.server);

    let v4_ip: IpAddr = config.server.bind_address.parse()?;
    let v4_addr = SocketAddr::new(v4_ip, config.server.dns_port);
    let v4_listener = tokio::spawn(server::start_dns_server(
        v4_addr,
        services.v4_engine.clone(),
        restart,
    ));

    if config.server.ipv6_enabled {
        let v6_ip: IpAddr = config.server.bind_address_v6.parse()?;
        let v6_addr = SocketAddr::new(v6_ip, config.server.dns_port);
        let v6_engine = services.v6_engine.clone();

        tokio::spawn(async move {
            if let Err(e) = server::start_dns_server(v6_addr, v6_engine, restart).await {
                warn!(error = %e, "IPv6 listener stopped, continuing on IPv4 only");
            }
        });
    }

    let outcome: anyhow::Result<()> = tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received");
            Ok(())
        }
        result = v4_listener => {
            match result {
                Ok(Ok(())) => Ok(()),
                Ok(Err(e)) => {
                    error!(error = %e, "IPv4 listener failed");
                    Err(e)
                }
                Err(e) => Err(e.into()),
            }
        }
    };

    let metrics = services.cache.metrics();
    info!(
        entries = metrics.entries,
        hits = metrics.hits,
        misses = metrics.misses,
        evictions = metrics.evictions,
        expirations = metrics.expirations,
        hit_rate = metrics.hit_rate,
        "Cache statistics"
    );

    info!("Server shutdown complete");
    outcome
}
