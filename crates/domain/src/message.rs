//! Structured DNS message model shared by the codec, the cache and the
//! resolution use case.

use std::fmt;
use std::sync::Arc;

pub const HEADER_LEN: usize = 12;

const QR_BIT: u16 = 0x8000;
const OPCODE_SHIFT: u16 = 11;
const OPCODE_MASK: u16 = 0x0F;
const RCODE_MASK: u16 = 0x000F;

/// DNS response status carried in the low four bits of the flags word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReplyCode {
    NoError,
    NxDomain,
    Other(u8),
}

impl ReplyCode {
    pub fn to_u8(self) -> u8 {
        match self {
            ReplyCode::NoError => 0,
            ReplyCode::NxDomain => 3,
            ReplyCode::Other(code) => code & 0x0F,
        }
    }

    pub fn from_u8(code: u8) -> Self {
        match code & 0x0F {
            0 => ReplyCode::NoError,
            3 => ReplyCode::NxDomain,
            other => ReplyCode::Other(other),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ReplyCode::NoError => "NOERROR",
            ReplyCode::NxDomain => "NXDOMAIN",
            ReplyCode::Other(_) => "OTHER",
        }
    }
}

/// The fixed 12-byte header, counts kept exactly as read off the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Header {
    pub id: u16,
    pub flags: u16,
    pub question_count: u16,
    pub answer_count: u16,
    pub authority_count: u16,
    pub additional_count: u16,
}

impl Header {
    pub fn is_response(&self) -> bool {
        self.flags & QR_BIT != 0
    }

    pub fn opcode(&self) -> u8 {
        ((self.flags >> OPCODE_SHIFT) & OPCODE_MASK) as u8
    }

    pub fn reply_code(&self) -> ReplyCode {
        ReplyCode::from_u8((self.flags & RCODE_MASK) as u8)
    }

    /// Flags for a reply: QR forced on, low nibble replaced by `code`.
    pub fn response_flags(&self, code: ReplyCode) -> u16 {
        ((self.flags | QR_BIT) & !RCODE_MASK) | u16::from(code.to_u8())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub name: Arc<str>,
    pub qtype: u16,
    pub qclass: u16,
}

impl Question {
    pub fn new(name: impl Into<Arc<str>>, qtype: u16, qclass: u16) -> Self {
        Self {
            name: name.into(),
            qtype,
            qclass,
        }
    }
}

/// Owner name of a resource record.
///
/// Decoded answers keep the two name bytes as they appeared on the wire
/// (usually a compression pointer such as `0xC00C`); names are never
/// dereferenced. Records built locally carry a real domain name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordName {
    Domain(Arc<str>),
    Raw(u16),
}

impl fmt::Display for RecordName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordName::Domain(name) => f.write_str(name),
            RecordName::Raw(raw) => write!(f, "{:04x}", raw),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRecord {
    pub name: RecordName,
    pub rtype: u16,
    pub rclass: u16,
    pub ttl: u32,
    pub data: Vec<u8>,
}

impl ResourceRecord {
    pub fn new(name: RecordName, rtype: u16, rclass: u16, ttl: u32, data: Vec<u8>) -> Self {
        Self {
            name,
            rtype,
            rclass,
            ttl,
            data,
        }
    }

    /// Same record re-owned by `name`.
    pub fn renamed(&self, name: Arc<str>) -> Self {
        Self {
            name: RecordName::Domain(name),
            ..self.clone()
        }
    }

    pub fn data_len(&self) -> usize {
        self.data.len()
    }

    /// Resource data as lowercase hex, the form used in log lines.
    pub fn data_hex(&self) -> String {
        self.data.iter().map(|b| format!("{:02x}", b)).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Message {
    pub header: Header,
    pub questions: Vec<Question>,
    pub answers: Vec<ResourceRecord>,
}

impl Message {
    pub fn is_response(&self) -> bool {
        self.header.is_response()
    }

    pub fn first_question(&self) -> Option<&Question> {
        self.questions.first()
    }
}
