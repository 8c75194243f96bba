#![allow(dead_code)]

/// Hand-assembled wire messages, independent of the encoder under test.
pub struct WireBuilder {
    id: u16,
    flags: u16,
    authority_count: u16,
    additional_count: u16,
    questions: Vec<(Vec<u8>, u16, u16)>,
    answers: Vec<(u16, u16, u16, u32, Vec<u8>)>,
}

impl WireBuilder {
    pub fn query(id: u16) -> Self {
        Self {
            id,
            flags: 0x0100,
            authority_count: 0,
            additional_count: 0,
            questions: Vec::new(),
            answers: Vec::new(),
        }
    }

    pub fn response(id: u16) -> Self {
        Self {
            flags: 0x8180,
            ..Self::query(id)
        }
    }

    pub fn flags(mut self, flags: u16) -> Self {
        self.flags = flags;
        self
    }

    pub fn question(mut self, name: &str, qtype: u16) -> Self {
        self.questions.push((encode_plain_name(name), qtype, 1));
        self
    }

    /// Question whose labels are arbitrary bytes.
    pub fn question_labels(mut self, labels: &[&[u8]], qtype: u16) -> Self {
        let mut wire = Vec::new();
        for label in labels {
            wire.push(label.len() as u8);
            wire.extend_from_slice(label);
        }
        wire.push(0);
        self.questions.push((wire, qtype, 1));
        self
    }

    /// Answer whose owner name is a pointer back to the first question.
    pub fn answer(mut self, rtype: u16, ttl: u32, data: &[u8]) -> Self {
        self.answers.push((0xC00C, rtype, 1, ttl, data.to_vec()));
        self
    }

    pub fn authority_count(mut self, count: u16) -> Self {
        self.authority_count = count;
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&self.id.to_be_bytes());
        out.extend_from_slice(&self.flags.to_be_bytes());
        out.extend_from_slice(&(self.questions.len() as u16).to_be_bytes());
        out.extend_from_slice(&(self.answers.len() as u16).to_be_bytes());
        out.extend_from_slice(&self.authority_count.to_be_bytes());
        out.extend_from_slice(&self.additional_count.to_be_bytes());

        for (name, qtype, qclass) in &self.questions {
            out.extend_from_slice(name);
            out.extend_from_slice(&qtype.to_be_bytes());
            out.extend_from_slice(&qclass.to_be_bytes());
        }

        for (name, rtype, rclass, ttl, data) in &self.answers {
            out.extend_from_slice(&name.to_be_bytes());
            out.extend_from_slice(&rtype.to_be_bytes());
            out.extend_from_slice(&rclass.to_be_bytes());
            out.extend_from_slice(&ttl.to_be_bytes());
            out.extend_from_slice(&(data.len() as u16).to_be_bytes());
            out.extend_from_slice(data);
        }

        out
    }
}

pub fn encode_plain_name(name: &str) -> Vec<u8> {
    let mut out = Vec::new();
    for label in name.split('.').filter(|l| !l.is_empty()) {
        out.push(label.len() as u8);
        out.extend_from_slice(label.as_bytes());
    }
    out.push(0);
    out
}

pub fn count_occurrences(haystack: &[u8], needle: &[u8]) -> usize {
    haystack
        .windows(needle.len())
        .filter(|window| *window == needle)
        .count()
}
