use crate::ports::{ResponseCache, UpstreamForwarder};
use dns_relay_domain::{
    decode_message, encode_response, DomainError, Message, Question, RecordName, RecordType,
    ReplyCode, ResourceRecord, RuleAction, RuleTable,
};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// TTL stamped on answers synthesised from local rules.
pub const RULE_TTL: u32 = 300;

/// Which stage of the pipeline produced the reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplySource {
    Rule,
    Blocked,
    Cache,
    Upstream,
}

impl ReplySource {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReplySource::Rule => "RULE",
            ReplySource::Blocked => "BLOCKED",
            ReplySource::Cache => "CACHE",
            ReplySource::Upstream => "UPSTREAM",
        }
    }
}

#[derive(Debug, Clone)]
pub struct DnsReply {
    pub bytes: Vec<u8>,
    pub source: ReplySource,
}

/// Turns one inbound datagram into at most one outbound datagram.
///
/// Local rules win over the cache and the cache wins over the upstream.
/// Any error means the client gets no reply.
pub struct ResolveDnsRequestUseCase {
    rules: Arc<RuleTable>,
    cache: Arc<dyn ResponseCache>,
    forwarder: Arc<dyn UpstreamForwarder>,
}

impl ResolveDnsRequestUseCase {
    pub fn new(
        rules: Arc<RuleTable>,
        cache: Arc<dyn ResponseCache>,
        forwarder: Arc<dyn UpstreamForwarder>,
    ) -> Self {
        Self {
            rules,
            cache,
            forwarder,
        }
    }

    pub async fn execute(&self, request: &[u8]) -> Result<DnsReply, DomainError> {
        let start = Instant::now();
        let message = decode_message(request)?;

        let reply = match message.first_question() {
            Some(question) => {
                if let Some(reply) = self.answer_from_rules(&message, question)? {
                    reply
                } else if let Some(reply) = self.answer_from_cache(&message, question)? {
                    reply
                } else {
                    self.forward(request).await?
                }
            }
            None => {
                debug!(id = message.header.id, "Request carries no question, forwarding");
                self.forward(request).await?
            }
        };

        debug!(
            id = message.header.id,
            source = reply.source.as_str(),
            elapsed_us = start.elapsed().as_micros() as u64,
            "Request resolved"
        );
        Ok(reply)
    }

    fn answer_from_rules(
        &self,
        message: &Message,
        question: &Question,
    ) -> Result<Option<DnsReply>, DomainError> {
        if !RecordType::is_address(question.qtype) {
            return Ok(None);
        }
        let Some(action) = self.rules.lookup(&question.name) else {
            return Ok(None);
        };

        let answer = ResourceRecord::new(
            RecordName::Domain(Arc::clone(&question.name)),
            question.qtype,
            question.qclass,
            RULE_TTL,
            action.resource_data(),
        );
        let bytes = encode_response(message, action.reply_code(), std::slice::from_ref(&answer))?;

        let source = match action {
            RuleAction::Block => ReplySource::Blocked,
            RuleAction::Override(_) => ReplySource::Rule,
        };
        info!(
            domain = %question.name,
            qtype = question.qtype,
            reply_code = action.reply_code().as_str(),
            "Local rule matched"
        );

        Ok(Some(DnsReply { bytes, source }))
    }

    fn answer_from_cache(
        &self,
        message: &Message,
        question: &Question,
    ) -> Result<Option<DnsReply>, DomainError> {
        let Some(cached) = self.cache.lookup(&question.name) else {
            return Ok(None);
        };
        if cached.record_type != question.qtype {
            debug!(
                domain = %question.name,
                cached_type = cached.record_type,
                qtype = question.qtype,
                "Cached entry has a different record type"
            );
            return Ok(None);
        }

        let bytes = encode_response(message, ReplyCode::NoError, &cached.answers)?;
        info!(
            domain = %question.name,
            answers = cached.answers.len(),
            "Cache hit"
        );

        Ok(Some(DnsReply {
            bytes,
            source: ReplySource::Cache,
        }))
    }

    async fn forward(&self, request: &[u8]) -> Result<DnsReply, DomainError> {
        let response = self.forwarder.forward(request).await?;

        match decode_message(&response) {
            Ok(decoded) => {
                if self.cache.record(&decoded) {
                    debug!(upstream = %self.forwarder.upstream(), "Upstream answer cached");
                }
            }
            Err(e) => {
                warn!(
                    error = %e,
                    upstream = %self.forwarder.upstream(),
                    "Upstream reply could not be decoded, relaying without caching"
                );
            }
        }

        Ok(DnsReply {
            bytes: response,
            source: ReplySource::Upstream,
        })
    }
}
