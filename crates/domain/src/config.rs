pub mod cache;
pub mod errors;
pub mod logging;
pub mod root;
pub mod rules;
pub mod server;
pub mod upstream;

pub use cache::CacheConfig;
pub use errors::ConfigError;
pub use logging::LoggingConfig;
pub use root::{CliOverrides, Config};
pub use rules::RulesConfig;
pub use server::ServerConfig;
pub use upstream::UpstreamConfig;
