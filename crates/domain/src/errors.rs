use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Malformed DNS message: {0}")]
    MalformedMessage(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid IP address: {0}")]
    InvalidIpAddress(String),

    #[error("Invalid rule table: {0}")]
    InvalidRuleTable(String),

    #[error("Transport error talking to {server}: {reason}")]
    TransportError { server: String, reason: String },

    /// The upstream resolver did not answer within the configured timeout.
    #[error("No response from upstream {server}")]
    NoUpstreamResponse { server: String },
}

impl DomainError {
    pub(crate) fn truncated(what: &str, offset: usize, needed: usize, len: usize) -> Self {
        DomainError::MalformedMessage(format!(
            "{} at offset {} needs {} byte(s), buffer has {}",
            what, offset, needed, len
        ))
    }
}
