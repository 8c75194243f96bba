//! One-shot UDP relay to the upstream resolver.
//!
//! Every request gets a fresh ephemeral socket of the upstream's address
//! family. The first datagram that arrives on it is taken as the reply.

use async_trait::async_trait;
use dns_relay_application::ports::UpstreamForwarder;
use dns_relay_domain::DomainError;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use std::time::Duration;
use tokio::net::UdpSocket;
use tracing::{debug, warn};

/// Largest reply accepted from the upstream.
const MAX_UDP_RESPONSE_SIZE: usize = 4096;

pub struct UdpForwarder {
    upstream: SocketAddr,
    timeout: Option<Duration>,
}

impl UdpForwarder {
    /// `timeout` of `None` waits for the reply indefinitely.
    pub fn new(upstream: SocketAddr, timeout: Option<Duration>) -> Self {
        Self { upstream, timeout }
    }

    pub fn upstream_addr(&self) -> SocketAddr {
        self.upstream
    }

    fn transport_error(&self, reason: impl Into<String>) -> DomainError {
        DomainError::TransportError {
            server: self.upstream.to_string(),
            reason: reason.into(),
        }
    }

    async fn exchange(&self, request: &[u8]) -> Result<Vec<u8>, DomainError> {
        let bind_addr: SocketAddr = if self.upstream.is_ipv4() {
            SocketAddr::from((Ipv4Addr::UNSPECIFIED, 0))
        } else {
            SocketAddr::from((Ipv6Addr::UNSPECIFIED, 0))
        };

        let socket = UdpSocket::bind(bind_addr)
            .await
            .map_err(|e| self.transport_error(format!("failed to bind UDP socket: {}", e)))?;

        let bytes_sent = socket
            .send_to(request, self.upstream)
            .await
            .map_err(|e| self.transport_error(format!("failed to send query: {}", e)))?;

        debug!(server = %self.upstream, bytes_sent, "UDP query sent");

        let mut recv_buf = vec![0u8; MAX_UDP_RESPONSE_SIZE];
        let (bytes_received, from_addr) = socket
            .recv_from(&mut recv_buf)
            .await
            .map_err(|e| self.transport_error(format!("failed to receive reply: {}", e)))?;

        if from_addr.ip() != self.upstream.ip() {
            warn!(
                expected = %self.upstream,
                received_from = %from_addr,
                "UDP response from unexpected source"
            );
        }

        recv_buf.truncate(bytes_received);
        debug!(server = %self.upstream, bytes_received, "UDP response received");

        Ok(recv_buf)
    }
}

#[async_trait]
impl UpstreamForwarder for UdpForwarder {
    async fn forward(&self, request: &[u8]) -> Result<Vec<u8>, DomainError> {
        if request.is_empty() {
            return Err(DomainError::InvalidInput(
                "refusing to forward an empty request".to_string(),
            ));
        }

        match self.timeout {
            Some(limit) => tokio::time::timeout(limit, self.exchange(request))
                .await
                .map_err(|_| DomainError::NoUpstreamResponse {
                    server: self.upstream.to_string(),
                })?,
            None => self.exchange(request).await,
        }
    }

    fn upstream(&self) -> String {
        self.upstream.to_string()
    }
}
