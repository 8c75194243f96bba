use async_trait::async_trait;
use dns_relay_application::ports::{CachedAnswer, ResponseCache, UpstreamForwarder};
use dns_relay_domain::{DomainError, Message};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Clone, Default)]
pub struct MockResponseCache {
    entries: Arc<Mutex<HashMap<String, CachedAnswer>>>,
    recorded: Arc<Mutex<Vec<Message>>>,
}

impl MockResponseCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_entry(&self, domain: &str, entry: CachedAnswer) {
        self.entries
            .lock()
            .unwrap()
            .insert(domain.to_string(), entry);
    }

    pub fn recorded(&self) -> Vec<Message> {
        self.recorded.lock().unwrap().clone()
    }
}

impl ResponseCache for MockResponseCache {
    fn lookup(&self, domain: &str) -> Option<CachedAnswer> {
        self.entries.lock().unwrap().get(domain).cloned()
    }

    fn record(&self, response: &Message) -> bool {
        self.recorded.lock().unwrap().push(response.clone());
        true
    }
}

pub struct MockForwarder {
    response: Mutex<Result<Vec<u8>, DomainError>>,
    calls: AtomicUsize,
    last_request: Mutex<Option<Vec<u8>>>,
}

impl MockForwarder {
    pub fn replying(bytes: Vec<u8>) -> Self {
        Self {
            response: Mutex::new(Ok(bytes)),
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        }
    }

    pub fn failing(error: DomainError) -> Self {
        Self {
            response: Mutex::new(Err(error)),
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<Vec<u8>> {
        self.last_request.lock().unwrap().clone()
    }
}

#[async_trait]
impl UpstreamForwarder for MockForwarder {
    async fn forward(&self, request: &[u8]) -> Result<Vec<u8>, DomainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().unwrap() = Some(request.to_vec());
        self.response.lock().unwrap().clone()
    }

    fn upstream(&self) -> String {
        "mock-upstream:53".to_string()
    }
}
