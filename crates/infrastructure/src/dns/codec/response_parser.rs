use super::header::{Header, CLASS_IN, HEADER_LEN};
use super::name::decode_name;
use super::record::decode_resource_record;
use super::wire::read_u16;
use dnslookup_domain::{DecodeError, QueryKey, RecordType, ResourceRecord};
use std::fmt;
use tracing::debug;

/// Smallest possible resource record: root owner name plus the fixed fields.
const MIN_RECORD_LEN: usize = 11;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Answer,
    Authority,
    Additional,
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Section::Answer => "Answers",
            Section::Authority => "Nameservers",
            Section::Additional => "Additional Information",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedRecord {
    pub section: Section,
    pub record: ResourceRecord,
}

#[derive(Debug, Clone)]
pub struct DecodedMessage {
    pub header: Header,

    pub question: QueryKey,

    /// Records in wire order, tagged with their section.
    pub records: Vec<DecodedRecord>,

    /// Records dropped because their RDATA could not be decoded.
    pub skipped: usize,
}

impl DecodedMessage {
    pub fn section(&self, section: Section) -> impl Iterator<Item = &ResourceRecord> {
        self.records
            .iter()
            .filter(move |r| r.section == section)
            .map(|r| &r.record)
    }

    pub fn into_records(self) -> impl Iterator<Item = ResourceRecord> {
        self.records.into_iter().map(|r| r.record)
    }
}

/// Reads just the transaction id, without validating the rest.
pub fn response_id(bytes: &[u8]) -> Option<u16> {
    read_u16(bytes, 0).ok()
}

pub fn decode_question(bytes: &[u8], offset: usize) -> Result<(QueryKey, usize), DecodeError> {
    let (name, pos) = decode_name(bytes, offset)?;
    let type_code = read_u16(bytes, pos)?;
    let class = read_u16(bytes, pos + 2)?;
    if class != CLASS_IN {
        return Err(DecodeError::UnexpectedClass {
            offset: pos + 2,
            class,
        });
    }
    Ok((
        QueryKey::new(name, RecordType::from_u16(type_code)),
        pos + 4,
    ))
}

/// Decodes a full response to `expected`.
///
/// The header and question must decode and the question must match; any
/// failure there rejects the message. A record whose RDATA is malformed is
/// skipped when its length is known, otherwise the whole message fails.
pub fn decode_message(bytes: &[u8], expected: &QueryKey) -> Result<DecodedMessage, DecodeError> {
    let header = Header::decode(bytes)?;
    let (question, mut pos) = decode_question(bytes, HEADER_LEN)?;

    if !question_matches(&question, expected) {
        return Err(DecodeError::QuestionMismatch {
            expected: expected.to_string(),
            received: question.to_string(),
        });
    }

    let answer_end = header.ancount as usize;
    let authority_end = answer_end + header.nscount as usize;
    let mut records =
        Vec::with_capacity(record_capacity(&header, bytes.len().saturating_sub(pos)));
    let mut skipped = 0;

    for index in 0..header.record_count() {
        let section = if index < answer_end {
            Section::Answer
        } else if index < authority_end {
            Section::Authority
        } else {
            Section::Additional
        };

        match decode_resource_record(bytes, pos) {
            Ok((record, next)) => {
                records.push(DecodedRecord { section, record });
                pos = next;
            }
            Err(err) => match err.resume_at {
                Some(next) => {
                    debug!(
                        offset = pos,
                        error = %err.error,
                        section = %section,
                        "Skipping undecodable resource record"
                    );
                    skipped += 1;
                    pos = next;
                }
                None => return Err(err.into()),
            },
        }
    }

    Ok(DecodedMessage {
        header,
        question,
        records,
        skipped,
    })
}

/// Preallocation bounded by how many records the remaining bytes could
/// hold, since the header counts come from the peer.
fn record_capacity(header: &Header, remaining: usize) -> usize {
    header.record_count().min(remaining / MIN_RECORD_LEN)
}

/// Servers may echo the question with different letter case.
fn question_matches(received: &QueryKey, expected: &QueryKey) -> bool {
    received.record_type == expected.record_type
        && received.name.eq_ignore_ascii_case(&expected.name)
}
