use super::wire::read_slice;
use dnslookup_domain::{DecodeError, ProtocolError};

pub const HEADER_LEN: usize = 12;

pub const CLASS_IN: u16 = 1;

pub const OPCODE_QUERY: u8 = 0;

const QR_BIT: u8 = 0x80;
const AA_BIT: u8 = 0x04;
const TC_BIT: u8 = 0x02;
const RD_BIT: u8 = 0x01;
const RA_BIT: u8 = 0x80;

/// Fixed 12-byte message header (RFC 1035 §4.1.1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Header {
    pub id: u16,
    pub is_response: bool,
    pub opcode: u8,
    pub authoritative: bool,
    pub truncated: bool,
    pub recursion_desired: bool,
    pub recursion_available: bool,
    pub rcode: u8,
    pub qdcount: u16,
    pub ancount: u16,
    pub nscount: u16,
    pub arcount: u16,
}

impl Header {
    /// Header of an iterative query: every flag clear, one question.
    pub fn query(id: u16) -> Self {
        Self {
            id,
            qdcount: 1,
            ..Self::default()
        }
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, DecodeError> {
        let raw = read_slice(bytes, 0, HEADER_LEN)?;
        let count = |at: usize| u16::from_be_bytes([raw[at], raw[at + 1]]);

        Ok(Self {
            id: count(0),
            is_response: raw[2] & QR_BIT != 0,
            opcode: (raw[2] >> 3) & 0x0F,
            authoritative: raw[2] & AA_BIT != 0,
            truncated: raw[2] & TC_BIT != 0,
            recursion_desired: raw[2] & RD_BIT != 0,
            recursion_available: raw[3] & RA_BIT != 0,
            rcode: raw[3] & 0x0F,
            qdcount: count(4),
            ancount: count(6),
            nscount: count(8),
            arcount: count(10),
        })
    }

    pub fn encode(&self) -> [u8; HEADER_LEN] {
        let mut flags_hi = (self.opcode & 0x0F) << 3;
        if self.is_response {
            flags_hi |= QR_BIT;
        }
        if self.authoritative {
            flags_hi |= AA_BIT;
        }
        if self.truncated {
            flags_hi |= TC_BIT;
        }
        if self.recursion_desired {
            flags_hi |= RD_BIT;
        }
        let mut flags_lo = self.rcode & 0x0F;
        if self.recursion_available {
            flags_lo |= RA_BIT;
        }

        let mut buf = [0u8; HEADER_LEN];
        buf[0..2].copy_from_slice(&self.id.to_be_bytes());
        buf[2] = flags_hi;
        buf[3] = flags_lo;
        buf[4..6].copy_from_slice(&self.qdcount.to_be_bytes());
        buf[6..8].copy_from_slice(&self.ancount.to_be_bytes());
        buf[8..10].copy_from_slice(&self.nscount.to_be_bytes());
        buf[10..12].copy_from_slice(&self.arcount.to_be_bytes());
        buf
    }

    pub fn record_count(&self) -> usize {
        self.ancount as usize + self.nscount as usize + self.arcount as usize
    }

    /// Checks that make a response unusable regardless of its content.
    /// The authoritative-empty case is left to the caller because it ends
    /// the candidate walk instead of moving on to the next server.
    pub fn validate_response(&self) -> Result<(), ProtocolError> {
        if !self.is_response {
            return Err(ProtocolError::NotAResponse);
        }
        if self.opcode != OPCODE_QUERY {
            return Err(ProtocolError::UnexpectedOpcode(self.opcode));
        }
        if self.qdcount != 1 {
            return Err(ProtocolError::QuestionCount(self.qdcount));
        }
        if self.rcode != 0 {
            return Err(ProtocolError::ResponseCode(self.rcode));
        }
        if self.truncated {
            return Err(ProtocolError::Truncated);
        }
        Ok(())
    }
}
