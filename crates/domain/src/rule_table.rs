use crate::errors::DomainError;
use crate::message::ReplyCode;
use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr};

/// Override value that turns a rule into a block (NXDOMAIN).
pub const BLOCK_SENTINEL: IpAddr = IpAddr::V4(Ipv4Addr::UNSPECIFIED);

/// What a matching rule asks the relay to answer with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleAction {
    Override(IpAddr),
    Block,
}

impl RuleAction {
    fn from_ip(ip: IpAddr) -> Self {
        if ip == BLOCK_SENTINEL {
            RuleAction::Block
        } else {
            RuleAction::Override(ip)
        }
    }

    pub fn reply_code(&self) -> ReplyCode {
        match self {
            RuleAction::Override(_) => ReplyCode::NoError,
            RuleAction::Block => ReplyCode::NxDomain,
        }
    }

    /// Resource data for the synthetic answer. A block carries none.
    pub fn resource_data(&self) -> Vec<u8> {
        match self {
            RuleAction::Override(IpAddr::V4(v4)) => v4.octets().to_vec(),
            RuleAction::Override(IpAddr::V6(v6)) => v6.octets().to_vec(),
            RuleAction::Block => Vec::new(),
        }
    }
}

/// Exact-match domain overrides, fixed for the lifetime of the process.
#[derive(Debug, Clone, Default)]
pub struct RuleTable {
    rules: HashMap<String, IpAddr>,
}

impl RuleTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries<I, K, V>(entries: I) -> Result<Self, DomainError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: AsRef<str>,
    {
        let mut rules = HashMap::new();
        for (domain, ip) in entries {
            let domain = domain.into();
            let ip: IpAddr = ip.as_ref().trim().parse().map_err(|_| {
                DomainError::InvalidIpAddress(format!("{} (rule for {})", ip.as_ref(), domain))
            })?;
            rules.insert(domain, ip);
        }
        Ok(Self { rules })
    }

    /// Parses a JSON object of `"domain": "ip"` pairs.
    pub fn from_json_str(json: &str) -> Result<Self, DomainError> {
        let entries: HashMap<String, String> = serde_json::from_str(json)
            .map_err(|e| DomainError::InvalidRuleTable(e.to_string()))?;
        Self::from_entries(entries)
    }

    pub fn lookup(&self, domain: &str) -> Option<RuleAction> {
        self.rules.get(domain).copied().map(RuleAction::from_ip)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn domains(&self) -> impl Iterator<Item = &str> {
        self.rules.keys().map(String::as_str)
    }
}
