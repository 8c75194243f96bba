use serde::{Deserialize, Serialize};
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use super::errors::ConfigError;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UpstreamConfig {
    #[serde(default = "default_ipv4")]
    pub ipv4: String,

    #[serde(default)]
    pub ipv6: Option<String>,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Upstream reply timeout in milliseconds. `0` waits forever.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            ipv4: default_ipv4(),
            ipv6: None,
            port: default_port(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl UpstreamConfig {
    pub fn v4_addr(&self) -> Result<SocketAddr, ConfigError> {
        let ip: IpAddr = self.ipv4.parse().map_err(|_| {
            ConfigError::Validation(format!("Invalid upstream IPv4 address: {}", self.ipv4))
        })?;
        Ok(SocketAddr::new(ip, self.port))
    }

    pub fn v6_addr(&self) -> Result<Option<SocketAddr>, ConfigError> {
        match &self.ipv6 {
            None => Ok(None),
            Some(raw) => {
                let ip: IpAddr = raw.parse().map_err(|_| {
                    ConfigError::Validation(format!("Invalid upstream IPv6 address: {}", raw))
                })?;
                Ok(Some(SocketAddr::new(ip, self.port)))
            }
        }
    }

    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_ms > 0).then(|| Duration::from_millis(self.timeout_ms))
    }
}

fn default_ipv4() -> String {
    "8.8.8.8".to_string()
}

fn default_port() -> u16 {
    53
}

fn default_timeout_ms() -> u64 {
    5000
}
