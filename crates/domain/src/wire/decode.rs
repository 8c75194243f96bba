use super::name::{push_label, MAX_LABEL_LEN};
use super::reader::WireReader;
use crate::errors::DomainError;
use crate::message::{Header, Message, Question, RecordName, ResourceRecord, HEADER_LEN};

const LABEL_TYPE_MASK: u8 = 0xC0;

/// Decodes a raw datagram.
///
/// Answer records are only read when the QR bit is set. Their owner name is
/// taken as the two raw bytes found at the start of the record, so an answer
/// that spells its name out in full desynchronises the rest of the section.
pub fn decode_message(buf: &[u8]) -> Result<Message, DomainError> {
    if buf.len() < HEADER_LEN {
        return Err(DomainError::MalformedMessage(format!(
            "message is {} bytes, header needs {}",
            buf.len(),
            HEADER_LEN
        )));
    }

    let mut reader = WireReader::new(buf);
    let header = Header {
        id: reader.read_u16("transaction id")?,
        flags: reader.read_u16("flags")?,
        question_count: reader.read_u16("question count")?,
        answer_count: reader.read_u16("answer count")?,
        authority_count: reader.read_u16("authority count")?,
        additional_count: reader.read_u16("additional count")?,
    };

    let mut questions = Vec::with_capacity(usize::from(header.question_count).min(8));
    for _ in 0..header.question_count {
        questions.push(read_question(&mut reader)?);
    }

    let mut answers = Vec::new();
    if header.is_response() {
        answers.reserve(usize::from(header.answer_count).min(32));
        for _ in 0..header.answer_count {
            answers.push(read_answer(&mut reader)?);
        }
    }

    Ok(Message {
        header,
        questions,
        answers,
    })
}

fn read_question(reader: &mut WireReader<'_>) -> Result<Question, DomainError> {
    let name = read_name(reader)?;
    let qtype = reader.read_u16("question type")?;
    let qclass = reader.read_u16("question class")?;
    Ok(Question::new(name, qtype, qclass))
}

/// Reads an uncompressed name into its escaped text form.
fn read_name(reader: &mut WireReader<'_>) -> Result<String, DomainError> {
    let mut name = String::new();
    loop {
        let len = reader.read_u8("label length")?;
        if len == 0 {
            break;
        }
        if len & LABEL_TYPE_MASK != 0 || usize::from(len) > MAX_LABEL_LEN {
            return Err(DomainError::MalformedMessage(format!(
                "unsupported label type 0x{:02x} at offset {}",
                len,
                reader.position() - 1
            )));
        }
        let label = reader.read_bytes("label", usize::from(len))?;
        if !name.is_empty() {
            name.push('.');
        }
        push_label(&mut name, label);
    }
    Ok(name)
}

fn read_answer(reader: &mut WireReader<'_>) -> Result<ResourceRecord, DomainError> {
    let name = RecordName::Raw(reader.read_u16("answer name")?);
    let rtype = reader.read_u16("answer type")?;
    let rclass = reader.read_u16("answer class")?;
    let ttl = reader.read_u32("answer ttl")?;
    let rdlength = reader.read_u16("resource data length")?;
    let data = reader
        .read_bytes("resource data", usize::from(rdlength))?
        .to_vec();

    Ok(ResourceRecord::new(name, rtype, rclass, ttl, data))
}
