use async_trait::async_trait;
use dns_relay_domain::DomainError;

#[async_trait]
pub trait UpstreamForwarder: Send + Sync {
    /// Relays `request` as-is and returns the first datagram the upstream
    /// sends back.
    async fn forward(&self, request: &[u8]) -> Result<Vec<u8>, DomainError>;

    /// Human-readable upstream address for log lines.
    fn upstream(&self) -> String;
}
