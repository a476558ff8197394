//! RFC 1035 wire codec.
//!
//! Queries are encoded without name compression. Responses are decoded with
//! value-returning steps: every decoder takes an offset and hands back the
//! decoded value together with the offset just past it.

mod header;
mod message_builder;
mod name;
mod record;
mod response_parser;
mod wire;

pub use header::{Header, CLASS_IN, HEADER_LEN, OPCODE_QUERY};
pub use message_builder::{build_query, encode_query, validate_name, MAX_MESSAGE_LEN};
pub use name::decode_name;
pub use record::{decode_resource_record, RecordDecodeError, ZERO_TTL_PLACEHOLDER_SECS};
pub use response_parser::{
    decode_message, decode_question, response_id, DecodedMessage, DecodedRecord, Section,
};
