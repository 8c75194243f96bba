pub mod cache;
pub mod transport;

pub use cache::{CacheMetricsSnapshot, DnsResponseCache};
pub use transport::UdpForwarder;
