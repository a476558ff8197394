use thiserror::Error;

use crate::RecordType;

/// Malformed bytes at any layer of the wire codec.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("Message truncated at offset {offset}: {needed} more byte(s) needed")]
    Truncated { offset: usize, needed: usize },

    #[error("Compression pointer at offset {offset} loops to offset {target}")]
    PointerLoop { offset: usize, target: usize },

    #[error("Reserved label bits {bits:#04x} at offset {offset}")]
    ReservedLabelBits { offset: usize, bits: u8 },

    #[error("Domain name starting at offset {offset} exceeds 255 bytes")]
    NameTooLong { offset: usize },

    #[error("Unsupported class {class} at offset {offset}")]
    UnexpectedClass { offset: usize, class: u16 },

    #[error("Question mismatch: expected {expected}, received {received}")]
    QuestionMismatch { expected: String, received: String },

    #[error("Invalid {record_type} rdata: {reason}")]
    InvalidRdata {
        record_type: RecordType,
        reason: String,
    },
}

/// A response that decoded fine but cannot be used as-is.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("Server returned RCODE {0}")]
    ResponseCode(u8),

    #[error("Response truncated (TC=1)")]
    Truncated,

    #[error("Authoritative answer with no records")]
    AuthoritativeEmpty,

    #[error("Transaction ID mismatch: expected {expected}, received {received}")]
    TransactionIdMismatch { expected: u16, received: u16 },

    #[error("Message is not a response (QR=0)")]
    NotAResponse,

    #[error("Unexpected opcode {0}")]
    UnexpectedOpcode(u8),

    #[error("Expected exactly one question, got {0}")]
    QuestionCount(u16),

    #[error("Non-authoritative response without referral")]
    MissingReferral,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid domain name: {0}")]
    InvalidDomainName(String),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    #[error("Transport timeout waiting for {server}")]
    TransportTimeout { server: String },

    #[error("I/O error: {0}")]
    IoError(String),

    #[error("Maximum number of indirection levels ({limit}) reached")]
    IndirectionLimitExceeded { limit: usize },

    #[error("Maximum referral depth ({limit}) reached")]
    ReferralLimitExceeded { limit: usize },

    #[error("All name servers failed for {name}")]
    Exhausted { name: String },

    #[error("No records found for {name}")]
    NotFound { name: String },
}

impl DomainError {
    /// Outcomes after which trying the next candidate server for the same
    /// delegation level is pointless.
    pub fn stops_candidate_walk(&self) -> bool {
        matches!(
            self,
            DomainError::Protocol(ProtocolError::AuthoritativeEmpty)
                | DomainError::Exhausted { .. }
                | DomainError::IndirectionLimitExceeded { .. }
                | DomainError::ReferralLimitExceeded { .. }
        )
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, DomainError::TransportTimeout { .. })
    }
}
