use dns_relay_domain::{Message, ResourceRecord};

/// Answer set replayed from the cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedAnswer {
    /// Record type of the cached answer set.
    pub record_type: u16,
    /// Smallest TTL across `answers`.
    pub ttl: u32,
    /// Wall-clock second the entry was stored at.
    pub saved_at: u64,
    pub answers: Vec<ResourceRecord>,
}

/// Port for the TTL-aware response cache.
pub trait ResponseCache: Send + Sync {
    /// Fresh entry for `domain`, promoted to most-recently-used. Expired
    /// entries are dropped and reported as a miss.
    fn lookup(&self, domain: &str) -> Option<CachedAnswer>;

    /// Stores the answers of a decoded upstream response when it qualifies.
    /// Returns whether an entry was written.
    fn record(&self, response: &Message) -> bool;
}
