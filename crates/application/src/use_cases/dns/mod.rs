mod resolve_request;

pub use resolve_request::{DnsReply, ReplySource, ResolveDnsRequestUseCase, RULE_TTL};
