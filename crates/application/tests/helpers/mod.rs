#![allow(dead_code)]

mod mock_ports;
mod wire;

pub use mock_ports::{MockForwarder, MockResponseCache};
pub use wire::{answer_rdata, header_u16, query_bytes, upstream_reply};
