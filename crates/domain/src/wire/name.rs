//! Text form of wire names.
//!
//! Label bytes outside printable ASCII, plus `.` and `\`, are written as
//! `\DDD` decimal escapes (RFC 1035 §5.1), so any label survives a
//! decode/encode cycle byte for byte.

use crate::errors::DomainError;

pub(crate) const MAX_LABEL_LEN: usize = 63;

/// Appends `label` to `name` in escaped text form.
pub(crate) fn push_label(name: &mut String, label: &[u8]) {
    for &byte in label {
        match byte {
            b'.' | b'\\' => push_escape(name, byte),
            0x21..=0x7E => name.push(char::from(byte)),
            _ => push_escape(name, byte),
        }
    }
}

fn push_escape(name: &mut String, byte: u8) {
    name.push('\\');
    name.push(char::from(b'0' + byte / 100));
    name.push(char::from(b'0' + (byte / 10) % 10));
    name.push(char::from(b'0' + byte % 10));
}

/// Splits an escaped name into raw labels. The empty string is the root
/// and has no labels.
pub(crate) fn parse_labels(name: &str) -> Result<Vec<Vec<u8>>, DomainError> {
    let mut labels = Vec::new();
    if name.is_empty() {
        return Ok(labels);
    }

    let bytes = name.as_bytes();
    let mut label = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'.' => {
                labels.push(finish_label(std::mem::take(&mut label), name)?);
                i += 1;
            }
            b'\\' => {
                let (byte, consumed) = read_escape(&bytes[i + 1..], name)?;
                label.push(byte);
                i += 1 + consumed;
            }
            byte => {
                label.push(byte);
                i += 1;
            }
        }
    }
    labels.push(finish_label(label, name)?);

    Ok(labels)
}

fn finish_label(label: Vec<u8>, name: &str) -> Result<Vec<u8>, DomainError> {
    if label.is_empty() || label.len() > MAX_LABEL_LEN {
        return Err(DomainError::InvalidInput(format!(
            "cannot encode a {}-byte label in {:?}",
            label.len(),
            name
        )));
    }
    Ok(label)
}

/// Decodes the escape after a backslash: `\DDD` or `\X` for a literal `X`.
fn read_escape(rest: &[u8], name: &str) -> Result<(u8, usize), DomainError> {
    let invalid = || DomainError::InvalidInput(format!("invalid escape in {:?}", name));

    match rest {
        [a, b, c, ..] if a.is_ascii_digit() && b.is_ascii_digit() && c.is_ascii_digit() => {
            let value =
                u16::from(a - b'0') * 100 + u16::from(b - b'0') * 10 + u16::from(c - b'0');
            let byte = u8::try_from(value).map_err(|_| invalid())?;
            Ok((byte, 3))
        }
        [first, ..] if !first.is_ascii_digit() => Ok((*first, 1)),
        _ => Err(invalid()),
    }
}
