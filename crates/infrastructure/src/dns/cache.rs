pub mod clock;
pub mod lru;
pub mod metrics;

pub use clock::{Clock, ManualClock, SystemClock};
pub use lru::LruMap;
pub use metrics::{CacheMetrics, CacheMetricsSnapshot};

use dns_relay_application::ports::{CachedAnswer, ResponseCache};
use dns_relay_domain::{Message, RecordType, ResourceRecord};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, trace};

/// Answer cache keyed by domain name.
///
/// Recency decides what goes when the cache is full; TTL decides whether an
/// entry may still be served. Expired entries are only noticed on lookup.
pub struct DnsResponseCache {
    entries: Mutex<LruMap<Arc<str>, CachedAnswer>>,
    clock: Arc<dyn Clock>,
    metrics: CacheMetrics,
}

impl DnsResponseCache {
    pub fn new(capacity: usize) -> Self {
        Self::with_clock(capacity, Arc::new(SystemClock))
    }

    pub fn with_clock(capacity: usize, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Mutex::new(LruMap::new(capacity)),
            clock,
            metrics: CacheMetrics::default(),
        }
    }

    fn entries(&self) -> MutexGuard<'_, LruMap<Arc<str>, CachedAnswer>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn get(&self, key: &str) -> Option<CachedAnswer> {
        let now = self.clock.now_secs();
        let mut entries = self.entries();

        let Some(entry) = entries.peek(key) else {
            CacheMetrics::bump(&self.metrics.misses);
            return None;
        };

        let age = now.saturating_sub(entry.saved_at);
        if u64::from(entry.ttl) < age {
            debug!(domain = key, ttl = entry.ttl, age, "Cache entry expired");
            entries.remove(key);
            CacheMetrics::bump(&self.metrics.expirations);
            CacheMetrics::bump(&self.metrics.misses);
            return None;
        }

        CacheMetrics::bump(&self.metrics.hits);
        entries.get(key).cloned()
    }

    pub fn put(&self, key: Arc<str>, value: CachedAnswer) {
        let evicted = self.entries().put(key, value);
        CacheMetrics::bump(&self.metrics.insertions);

        if let Some((evicted_key, _)) = evicted {
            CacheMetrics::bump(&self.metrics.evictions);
            debug!(domain = %evicted_key, "Cache entry evicted");
        }
    }

    /// Caches the answers of an upstream response when it has at least one
    /// answer and its first question asks for an address record.
    pub fn record(&self, response: &Message) -> bool {
        let Some(question) = response.first_question() else {
            return false;
        };
        let Some(first) = response.answers.first() else {
            return false;
        };
        if !RecordType::is_address(question.qtype) {
            return false;
        }

        let ttl = response
            .answers
            .iter()
            .map(|answer| answer.ttl)
            .min()
            .unwrap_or(first.ttl);

        // Decoded answer names are raw wire bytes; replay them under the
        // question's name instead.
        let answers: Vec<ResourceRecord> = response
            .answers
            .iter()
            .map(|answer| answer.renamed(Arc::clone(&question.name)))
            .collect();

        for answer in &answers {
            trace!(
                domain = %question.name,
                rtype = answer.rtype,
                ttl = answer.ttl,
                data = %answer.data_hex(),
                "Caching answer"
            );
        }

        let entry = CachedAnswer {
            record_type: first.rtype,
            ttl,
            saved_at: self.clock.now_secs(),
            answers,
        };

        self.put(Arc::clone(&question.name), entry);
        info!(domain = %question.name, ttl, "Cache added");
        true
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.entries().capacity()
    }

    pub fn metrics(&self) -> CacheMetricsSnapshot {
        self.metrics.snapshot(self.len())
    }
}

impl ResponseCache for DnsResponseCache {
    fn lookup(&self, domain: &str) -> Option<CachedAnswer> {
        self.get(domain)
    }

    fn record(&self, response: &Message) -> bool {
        DnsResponseCache::record(self, response)
    }
}
