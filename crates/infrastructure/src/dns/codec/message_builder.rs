//! Query construction.
//!
//! Queries are iterative (RD clear) and carry exactly one question in class
//! IN. Names are written as plain length-prefixed labels.

use super::header::{Header, CLASS_IN, HEADER_LEN};
use dnslookup_domain::{normalize_name, DomainError, RecordType};

/// Largest message a query may occupy (RFC 1035 §2.3.4).
pub const MAX_MESSAGE_LEN: usize = 512;

const MAX_LABEL_LEN: usize = 63;

/// Rejects names that cannot be written as a question: empty labels,
/// labels over 63 bytes, or a question that would not fit in one message.
pub fn validate_name(name: &str) -> Result<(), DomainError> {
    let name = normalize_name(name);
    if name.is_empty() {
        return Ok(());
    }

    let mut wire_len = 1;
    for label in name.split('.') {
        if label.is_empty() {
            return Err(DomainError::InvalidDomainName(format!(
                "Empty label in '{}'",
                name
            )));
        }
        if label.len() > MAX_LABEL_LEN {
            return Err(DomainError::InvalidDomainName(format!(
                "Label '{}' exceeds {} bytes",
                label, MAX_LABEL_LEN
            )));
        }
        wire_len += label.len() + 1;
    }

    if HEADER_LEN + wire_len + 4 > MAX_MESSAGE_LEN {
        return Err(DomainError::InvalidDomainName(format!(
            "Name '{}' does not fit in a {}-byte query",
            name, MAX_MESSAGE_LEN
        )));
    }

    Ok(())
}

/// Encodes a query for `name`/`record_type` with the given transaction id.
pub fn encode_query(name: &str, record_type: RecordType, id: u16) -> Result<Vec<u8>, DomainError> {
    validate_name(name)?;
    let name = normalize_name(name);

    let mut buf = Vec::with_capacity(HEADER_LEN + name.len() + 6);
    buf.extend_from_slice(&Header::query(id).encode());

    if !name.is_empty() {
        for label in name.split('.') {
            buf.push(label.len() as u8);
            buf.extend_from_slice(label.as_bytes());
        }
    }
    buf.push(0);

    buf.extend_from_slice(&record_type.to_u16().to_be_bytes());
    buf.extend_from_slice(&CLASS_IN.to_be_bytes());

    Ok(buf)
}

/// Encodes a query under a fresh random transaction id.
///
/// Returns the id alongside the bytes so the caller can match the reply.
pub fn build_query(name: &str, record_type: RecordType) -> Result<(u16, Vec<u8>), DomainError> {
    let id = fastrand::u16(..);
    let bytes = encode_query(name, record_type, id)?;
    Ok((id, bytes))
}
