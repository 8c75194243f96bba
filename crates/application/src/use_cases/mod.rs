pub mod dns;

pub use dns::{DnsReply, ReplySource, ResolveDnsRequestUseCase};
