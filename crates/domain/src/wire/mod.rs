//! DNS wire format (RFC 1035 §4) for the subset of messages the relay handles.
//!
//! Decoding reads the header, the question section and, for responses, the
//! answer section. Authority and additional sections are never parsed; their
//! counts are only echoed back when encoding.

mod decode;
mod encode;
mod name;
mod reader;

pub use decode::decode_message;
pub use encode::encode_response;
