mod response_cache;
mod upstream_forwarder;

pub use response_cache::{CachedAnswer, ResponseCache};
pub use upstream_forwarder::UpstreamForwarder;
