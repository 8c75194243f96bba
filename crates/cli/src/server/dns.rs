use dns_relay_application::use_cases::ResolveDnsRequestUseCase;
use dns_relay_domain::config::ServerConfig;
use socket2::{Domain, Protocol, Socket, Type};
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::UdpSocket;
use tracing::{debug, error, info, warn};

/// Largest inbound datagram accepted from a client.
const MAX_DATAGRAM_SIZE: usize = 4096;

/// How a listener that lost its socket is brought back.
#[derive(Debug, Clone, Copy)]
pub struct RestartPolicy {
    pub limit: u32,
    pub backoff: Duration,
}

impl RestartPolicy {
    pub fn from_config(config: &ServerConfig) -> Self {
        Self {
            limit: config.restart_limit,
            backoff: Duration::from_millis(config.restart_backoff_ms),
        }
    }
}

/// Serves `bind_addr` until the socket fails more often than `restart`
/// allows. Every datagram is resolved on its own task.
pub async fn start_dns_server(
    bind_addr: SocketAddr,
    engine: Arc<ResolveDnsRequestUseCase>,
    restart: RestartPolicy,
) -> anyhow::Result<()> {
    let mut failures = 0u32;

    loop {
        let outcome = match create_udp_socket(bind_addr) {
            Ok(socket) => {
                info!(bind_address = %bind_addr, "DNS listener ready");
                run_udp_listener(Arc::new(socket), engine.clone()).await
            }
            Err(e) => Err(e),
        };

        let e = match outcome {
            Ok(()) => return Ok(()),
            Err(e) => e,
        };

        failures += 1;
        if failures > restart.limit {
            error!(bind_address = %bind_addr, error = %e, failures, "DNS listener giving up");
            return Err(e.into());
        }

        warn!(
            bind_address = %bind_addr,
            error = %e,
            attempt = failures,
            limit = restart.limit,
            "DNS listener failed, restarting"
        );
        tokio::time::sleep(restart.backoff).await;
    }
}

async fn run_udp_listener(
    socket: Arc<UdpSocket>,
    engine: Arc<ResolveDnsRequestUseCase>,
) -> io::Result<()> {
    let mut recv_buf = vec![0u8; MAX_DATAGRAM_SIZE];

    loop {
        let (len, client) = match socket.recv_from(&mut recv_buf).await {
            Ok(received) => received,
            Err(e) if is_transient(&e) => {
                debug!(error = %e, "Transient UDP receive error");
                continue;
            }
            Err(e) => return Err(e),
        };

        let datagram = recv_buf[..len].to_vec();
        let socket = socket.clone();
        let engine = engine.clone();

        tokio::spawn(async move {
            match engine.execute(&datagram).await {
                Ok(reply) => {
                    if let Err(e) = socket.send_to(&reply.bytes, client).await {
                        warn!(client = %client, error = %e, "Failed to send DNS reply");
                    } else {
                        debug!(
                            client = %client,
                            source = reply.source.as_str(),
                            bytes = reply.bytes.len(),
                            "DNS reply sent"
                        );
                    }
                }
                Err(e) => {
                    warn!(client = %client, error = %e, "Dropping DNS request");
                }
            }
        });
    }
}

fn is_transient(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::Interrupted
            | io::ErrorKind::WouldBlock
            | io::ErrorKind::ConnectionReset
            | io::ErrorKind::ConnectionRefused
    )
}

fn create_udp_socket(socket_addr: SocketAddr) -> io::Result<UdpSocket> {
    let socket = Socket::new(
        Domain::for_address(socket_addr),
        Type::DGRAM,
        Some(Protocol::UDP),
    )?;
    if socket_addr.is_ipv6() {
        socket.set_only_v6(true)?;
    }
    socket.set_reuse_address(true)?;
    socket.bind(&socket_addr.into())?;
    socket.set_nonblocking(true)?;
    let std_socket: std::net::UdpSocket = socket.into();
    UdpSocket::from_std(std_socket)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dns_relay_domain::RuleTable;
    use dns_relay_infrastructure::dns::{DnsResponseCache, UdpForwarder};

    fn blocking_engine() -> Arc<ResolveDnsRequestUseCase> {
        let rules = RuleTable::from_entries([("blocked.example", "0.0.0.0")]).unwrap();
        Arc::new(ResolveDnsRequestUseCase::new(
            Arc::new(rules),
            Arc::new(DnsResponseCache::new(16)),
            Arc::new(UdpForwarder::new(
                "127.0.0.1:9".parse().unwrap(),
                Some(Duration::from_millis(50)),
            )),
        ))
    }

    fn query(id: u16, name: &str) -> Vec<u8> {
        let mut out = id.to_be_bytes().to_vec();
        out.extend_from_slice(&[0x01, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00]);
        for label in name.split('.') {
            out.push(label.len() as u8);
            out.extend_from_slice(label.as_bytes());
        }
        out.extend_from_slice(&[0x00, 0x00, 0x01, 0x00, 0x01]);
        out
    }

    #[test]
    fn test_restart_policy_from_config() {
        let policy = RestartPolicy::from_config(&ServerConfig::default());
        assert_eq!(policy.limit, 5);
        assert_eq!(policy.backoff, Duration::from_millis(1000));
    }

    #[tokio::test]
    async fn test_listener_answers_blocked_query() {
        let socket = Arc::new(create_udp_socket("127.0.0.1:0".parse().unwrap()).unwrap());
        let addr = socket.local_addr().unwrap();
        tokio::spawn(run_udp_listener(socket, blocking_engine()));

        let client = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        client.send_to(&query(0x5151, "blocked.example"), addr).await.unwrap();

        let mut buf = [0u8; 512];
        let (len, _) = tokio::time::timeout(Duration::from_secs(2), client.recv_from(&mut buf))
            .await
            .unwrap()
            .unwrap();

        assert!(len > 12);
        assert_eq!(&buf[0..2], &[0x51, 0x51]);
        assert_eq!(buf[2] & 0x80, 0x80);
        assert_eq!(buf[3] & 0x0F, 3);
    }

    #[tokio::test]
    async fn test_listener_ignores_garbage() {
        let socket = Arc::new(create_udp_socket("127.0.0.1:0".parse().unwrap()).unwrap());
        let addr = socket.local_addr().unwrap();
        tokio::spawn(run_udp_listener(socket, blocking_engine()));

        let client = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        client.send_to(&[0x01, 0x02, 0x03], addr).await.unwrap();

        let mut buf = [0u8; 512];
        let waited =
            tokio::time::timeout(Duration::from_millis(200), client.recv_from(&mut buf)).await;
        assert!(waited.is_err());
    }
}
