use super::name::parse_labels;
use crate::errors::DomainError;
use crate::message::{Message, RecordName, ReplyCode, ResourceRecord};
use bytes::BufMut;
use std::collections::HashMap;

const POINTER_FLAG: u16 = 0xC000;
const MAX_POINTER_OFFSET: usize = 0x3FFF;

/// Builds a reply to `original`.
///
/// The header echoes the id, forces QR, stores `code` in the low nibble and
/// copies the authority/additional counts untouched. Questions are re-encoded
/// from `original`, followed by `answers`.
pub fn encode_response(
    original: &Message,
    code: ReplyCode,
    answers: &[ResourceRecord],
) -> Result<Vec<u8>, DomainError> {
    let question_count = section_count("question", original.questions.len())?;
    let answer_count = section_count("answer", answers.len())?;

    let mut buf: Vec<u8> = Vec::with_capacity(512);
    buf.put_u16(original.header.id);
    buf.put_u16(original.header.response_flags(code));
    buf.put_u16(question_count);
    buf.put_u16(answer_count);
    buf.put_u16(original.header.authority_count);
    buf.put_u16(original.header.additional_count);

    let mut compressor = NameCompressor::default();

    for question in &original.questions {
        compressor.write_name(&mut buf, &question.name)?;
        buf.put_u16(question.qtype);
        buf.put_u16(question.qclass);
    }

    for answer in answers {
        match &answer.name {
            RecordName::Domain(name) => compressor.write_name(&mut buf, name)?,
            RecordName::Raw(raw) => buf.put_u16(*raw),
        }
        let rdlength = u16::try_from(answer.data.len()).map_err(|_| {
            DomainError::InvalidInput(format!(
                "resource data of {} bytes does not fit a record",
                answer.data.len()
            ))
        })?;
        buf.put_u16(answer.rtype);
        buf.put_u16(answer.rclass);
        buf.put_u32(answer.ttl);
        buf.put_u16(rdlength);
        buf.put_slice(&answer.data);
    }

    Ok(buf)
}

fn section_count(section: &str, len: usize) -> Result<u16, DomainError> {
    u16::try_from(len)
        .map_err(|_| DomainError::InvalidInput(format!("too many {} entries: {}", section, len)))
}

/// Suffix table for name compression, local to one message. Suffixes are
/// keyed by their uncompressed wire form.
#[derive(Default)]
struct NameCompressor {
    offsets: HashMap<Vec<u8>, u16>,
}

impl NameCompressor {
    fn write_name(&mut self, buf: &mut Vec<u8>, name: &str) -> Result<(), DomainError> {
        let labels = parse_labels(name)?;

        for i in 0..labels.len() {
            let suffix = wire_suffix(&labels[i..]);
            if let Some(&offset) = self.offsets.get(&suffix) {
                buf.put_u16(POINTER_FLAG | offset);
                return Ok(());
            }

            if buf.len() <= MAX_POINTER_OFFSET {
                self.offsets.insert(suffix, buf.len() as u16);
            }
            let label = &labels[i];
            buf.put_u8(label.len() as u8);
            buf.put_slice(label);
        }
        buf.put_u8(0);
        Ok(())
    }
}

fn wire_suffix(labels: &[Vec<u8>]) -> Vec<u8> {
    let mut out = Vec::new();
    for label in labels {
        out.push(label.len() as u8);
        out.extend_from_slice(label);
    }
    out
}
