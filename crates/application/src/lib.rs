//! DNS relay application layer: ports and the request resolution use case.
pub mod ports;
pub mod use_cases;
