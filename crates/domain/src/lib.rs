//! DNS relay domain layer: message model, wire codec, override rules and
//! configuration.
pub mod config;
pub mod errors;
pub mod message;
pub mod record_type;
pub mod rule_table;
pub mod wire;

pub use config::{CliOverrides, Config};
pub use errors::DomainError;
pub use message::{Header, Message, Question, RecordName, ReplyCode, ResourceRecord};
pub use record_type::RecordType;
pub use rule_table::{RuleAction, RuleTable, BLOCK_SENTINEL};
pub use wire::{decode_message, encode_response};
