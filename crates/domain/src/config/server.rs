use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_dns_port")]
    pub dns_port: u16,

    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    #[serde(default = "default_bind_address_v6")]
    pub bind_address_v6: String,

    #[serde(default = "default_true")]
    pub ipv6_enabled: bool,

    /// How many times a failed listening socket is re-bound before giving up.
    #[serde(default = "default_restart_limit")]
    pub restart_limit: u32,

    #[serde(default = "default_restart_backoff_ms")]
    pub restart_backoff_ms: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            dns_port: default_dns_port(),
            bind_address: default_bind_address(),
            bind_address_v6: default_bind_address_v6(),
            ipv6_enabled: true,
            restart_limit: default_restart_limit(),
            restart_backoff_ms: default_restart_backoff_ms(),
        }
    }
}

fn default_dns_port() -> u16 {
    53
}

fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

fn default_bind_address_v6() -> String {
    "::".to_string()
}

fn default_true() -> bool {
    true
}

fn default_restart_limit() -> u32 {
    5
}

fn default_restart_backoff_ms() -> u64 {
    1000
}
