use dns_relay_application::use_cases::ResolveDnsRequestUseCase;
use dns_relay_domain::{Config, RuleTable};
use dns_relay_infrastructure::dns::{DnsResponseCache, UdpForwarder};
use std::sync::Arc;
use tracing::info;

/// Shared state behind both listeners. The cache and rules are common; each
/// address family gets its own forwarder.
pub struct DnsServices {
    pub cache: Arc<DnsResponseCache>,
    pub v4_engine: Arc<ResolveDnsRequestUseCase>,
    pub v6_engine: Arc<ResolveDnsRequestUseCase>,
}

impl DnsServices {
    pub fn new(config: &Config, rules: RuleTable) -> anyhow::Result<Self> {
        let rules = Arc::new(rules);
        let cache = Arc::new(DnsResponseCache::new(config.cache.max_entries));
        let timeout = config.upstream.timeout();

        let v4_upstream = config.upstream.v4_addr()?;
        let v6_upstream = config.upstream.v6_addr()?.unwrap_or(v4_upstream);

        info!(
            upstream_v4 = %v4_upstream,
            upstream_v6 = %v6_upstream,
            timeout_ms = config.upstream.timeout_ms,
            cache_capacity = cache.capacity(),
            rules = rules.len(),
            "DNS services initialized"
        );

        let engine = |upstream| {
            Arc::new(ResolveDnsRequestUseCase::new(
                rules.clone(),
                cache.clone(),
                Arc::new(UdpForwarder::new(upstream, timeout)),
            ))
        };
        let v4_engine = engine(v4_upstream);
        let v6_engine = engine(v6_upstream);

        Ok(Self {
            cache,
            v4_engine,
            v6_engine,
        })
    }
}
