use super::header::CLASS_IN;
use super::name::decode_name;
use super::wire::{read_slice, read_u16, read_u32};
use dnslookup_domain::{DecodeError, RecordType, RecordValue, ResourceRecord};
use std::fmt::Write;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

/// TTL given to records that arrive with a TTL of zero, so that they stay
/// cacheable for the lifetime of the lookup that fetched them.
pub const ZERO_TTL_PLACEHOLDER_SECS: u32 = 100;

const TYPE_A: u16 = 1;
const TYPE_NS: u16 = 2;
const TYPE_CNAME: u16 = 5;
const TYPE_SOA: u16 = 6;
const TYPE_MB: u16 = 7;
const TYPE_MG: u16 = 8;
const TYPE_MR: u16 = 9;
const TYPE_WKS: u16 = 11;
const TYPE_PTR: u16 = 12;
const TYPE_HINFO: u16 = 13;
const TYPE_MINFO: u16 = 14;
const TYPE_MX: u16 = 15;
const TYPE_TXT: u16 = 16;
const TYPE_AAAA: u16 = 28;

/// Failure to decode one resource record.
///
/// `resume_at` is the offset of the next record when RDLENGTH was read and
/// lies inside the message, so the caller can skip just this record.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{error}")]
pub struct RecordDecodeError {
    pub error: DecodeError,
    pub resume_at: Option<usize>,
}

impl RecordDecodeError {
    fn fatal(error: DecodeError) -> Self {
        Self {
            error,
            resume_at: None,
        }
    }
}

impl From<RecordDecodeError> for DecodeError {
    fn from(err: RecordDecodeError) -> Self {
        err.error
    }
}

/// Decodes the resource record at `offset`, returning it with the offset of
/// the record that follows.
pub fn decode_resource_record(
    bytes: &[u8],
    offset: usize,
) -> Result<(ResourceRecord, usize), RecordDecodeError> {
    let (name, pos) = decode_name(bytes, offset).map_err(RecordDecodeError::fatal)?;

    let type_code = read_u16(bytes, pos).map_err(RecordDecodeError::fatal)?;
    let class = read_u16(bytes, pos + 2).map_err(RecordDecodeError::fatal)?;
    let ttl = read_u32(bytes, pos + 4).map_err(RecordDecodeError::fatal)?;
    let rdlength = read_u16(bytes, pos + 8).map_err(RecordDecodeError::fatal)?;

    let rdata_start = pos + 10;
    let rdata_end = rdata_start + rdlength as usize;
    let skip = |error| RecordDecodeError {
        error,
        resume_at: (rdata_end <= bytes.len()).then_some(rdata_end),
    };

    if class != CLASS_IN {
        return Err(skip(DecodeError::UnexpectedClass {
            offset: pos + 2,
            class,
        }));
    }
    if rdata_end > bytes.len() {
        return Err(RecordDecodeError::fatal(DecodeError::Truncated {
            offset: rdata_start,
            needed: rdata_end - bytes.len(),
        }));
    }

    let record_type = RecordType::from_u16(type_code);
    let value = decode_rdata(bytes, rdata_start, rdata_end, type_code).map_err(skip)?;
    let ttl = if ttl == 0 {
        ZERO_TTL_PLACEHOLDER_SECS
    } else {
        ttl
    };

    Ok((ResourceRecord::new(name, record_type, ttl, value), rdata_end))
}

fn decode_rdata(
    bytes: &[u8],
    start: usize,
    end: usize,
    type_code: u16,
) -> Result<RecordValue, DecodeError> {
    let rdata = &bytes[start..end];
    let record_type = RecordType::from_u16(type_code);
    let invalid = |reason: String| DecodeError::InvalidRdata {
        record_type,
        reason,
    };
    // Names inside RDATA may be compressed against the whole message but
    // must not run past the record boundary.
    let name_at = |offset: usize| -> Result<(String, usize), DecodeError> {
        let (name, next) = decode_name(bytes, offset)?;
        if next > end {
            return Err(invalid(format!("name runs {} byte(s) past rdata", next - end)));
        }
        Ok((name, next))
    };

    let value = match type_code {
        TYPE_A => {
            let octets: [u8; 4] = rdata
                .try_into()
                .map_err(|_| invalid(format!("expected 4 bytes, got {}", rdata.len())))?;
            RecordValue::Address(IpAddr::V4(Ipv4Addr::from(octets)))
        }
        TYPE_AAAA => {
            let octets: [u8; 16] = rdata
                .try_into()
                .map_err(|_| invalid(format!("expected 16 bytes, got {}", rdata.len())))?;
            RecordValue::Address(IpAddr::V6(Ipv6Addr::from(octets)))
        }
        TYPE_NS | TYPE_CNAME | TYPE_PTR | TYPE_MB | TYPE_MG | TYPE_MR => {
            let (name, _) = name_at(start)?;
            RecordValue::Name(name.into())
        }
        TYPE_MX => {
            let preference = read_u16(rdata, 0)?;
            let (exchange, _) = name_at(start + 2)?;
            RecordValue::Text(format!("{} {}", preference, exchange))
        }
        TYPE_SOA => {
            let (mname, next) = name_at(start)?;
            let (rname, next) = name_at(next)?;
            let fields = next - start;
            let mut text = format!("{} {}", mname, rname);
            for i in 0..5 {
                let value = read_u32(rdata, fields + i * 4)?;
                let _ = write!(text, " {}", value);
            }
            RecordValue::Text(text)
        }
        TYPE_HINFO => {
            let (cpu, next) = character_string(rdata, 0)?;
            let (os, _) = character_string(rdata, next)?;
            RecordValue::Text(format!("\"{}\" \"{}\"", cpu, os))
        }
        TYPE_MINFO => {
            let (rmailbx, next) = name_at(start)?;
            let (emailbx, _) = name_at(next)?;
            RecordValue::Text(format!("{} {}", rmailbx, emailbx))
        }
        TYPE_WKS => {
            if rdata.len() < 5 {
                return Err(invalid(format!("expected at least 5 bytes, got {}", rdata.len())));
            }
            let address = Ipv4Addr::new(rdata[0], rdata[1], rdata[2], rdata[3]);
            let mut text = format!("{} {} ", address, rdata[4]);
            for byte in &rdata[5..] {
                let _ = write!(text, "{:02x}", byte);
            }
            RecordValue::Text(text.trim_end().to_string())
        }
        TYPE_TXT => {
            let mut strings = Vec::new();
            let mut pos = 0;
            while pos < rdata.len() {
                let (text, next) = character_string(rdata, pos)?;
                strings.push(format!("\"{}\"", text));
                pos = next;
            }
            RecordValue::Text(strings.join(" "))
        }
        _ => RecordValue::Opaque {
            rdlength: rdata.len() as u16,
        },
    };

    Ok(value)
}

fn character_string(rdata: &[u8], offset: usize) -> Result<(String, usize), DecodeError> {
    let len = read_slice(rdata, offset, 1)?[0] as usize;
    let raw = read_slice(rdata, offset + 1, len)?;
    Ok((String::from_utf8_lossy(raw).into_owned(), offset + 1 + len))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Owner name `a.` followed by the fixed fields and `rdata`.
    fn record(type_code: u16, class: u16, ttl: u32, rdata: &[u8]) -> Vec<u8> {
        let mut bytes = vec![1, b'a', 0];
        bytes.extend_from_slice(&type_code.to_be_bytes());
        bytes.extend_from_slice(&class.to_be_bytes());
        bytes.extend_from_slice(&ttl.to_be_bytes());
        bytes.extend_from_slice(&(rdata.len() as u16).to_be_bytes());
        bytes.extend_from_slice(rdata);
        bytes
    }

    #[test]
    fn test_a_record() {
        let bytes = record(TYPE_A, CLASS_IN, 3600, &[192, 0, 2, 1]);
        let (rr, next) = decode_resource_record(&bytes, 0).unwrap();

        assert_eq!(&*rr.name, "a");
        assert_eq!(rr.record_type, RecordType::A);
        assert_eq!(rr.ttl, 3600);
        assert_eq!(rr.value, RecordValue::Address("192.0.2.1".parse().unwrap()));
        assert_eq!(next, bytes.len());
    }

    #[test]
    fn test_aaaa_record() {
        let mut addr = [0u8; 16];
        addr[0] = 0x20;
        addr[1] = 0x01;
        addr[2] = 0x0d;
        addr[3] = 0xb8;
        addr[15] = 1;
        let bytes = record(TYPE_AAAA, CLASS_IN, 60, &addr);
        let (rr, _) = decode_resource_record(&bytes, 0).unwrap();
        assert_eq!(rr.value.as_address(), Some("2001:db8::1".parse().unwrap()));
    }

    #[test]
    fn test_zero_ttl_gets_placeholder() {
        let bytes = record(TYPE_A, CLASS_IN, 0, &[192, 0, 2, 1]);
        let (rr, _) = decode_resource_record(&bytes, 0).unwrap();
        assert_eq!(rr.ttl, ZERO_TTL_PLACEHOLDER_SECS);
    }

    #[test]
    fn test_compressed_cname_target() {
        // "a." at 0 is the owner; the target points back to it.
        let bytes = record(TYPE_CNAME, CLASS_IN, 60, &[1, b'b', 0xC0, 0x00]);
        let (rr, _) = decode_resource_record(&bytes, 0).unwrap();
        assert_eq!(rr.record_type, RecordType::CNAME);
        assert_eq!(rr.value.as_name(), Some("b.a"));
    }

    #[test]
    fn test_mx_record() {
        let bytes = record(TYPE_MX, CLASS_IN, 60, &[0x00, 0x0A, 2, b'm', b'x', 0xC0, 0x00]);
        let (rr, _) = decode_resource_record(&bytes, 0).unwrap();
        assert_eq!(rr.record_type, RecordType::MX);
        assert_eq!(rr.value, RecordValue::Text("10 mx.a".to_string()));
    }

    #[test]
    fn test_soa_record() {
        let mut rdata = vec![2, b'n', b's', 0xC0, 0x00, 4, b'h', b'o', b's', b't', 0xC0, 0x00];
        for value in [2024010101u32, 7200, 3600, 1209600, 300] {
            rdata.extend_from_slice(&value.to_be_bytes());
        }
        let bytes = record(TYPE_SOA, CLASS_IN, 60, &rdata);
        let (rr, next) = decode_resource_record(&bytes, 0).unwrap();
        assert_eq!(
            rr.value,
            RecordValue::Text("ns.a host.a 2024010101 7200 3600 1209600 300".to_string())
        );
        assert_eq!(next, bytes.len());
    }

    #[test]
    fn test_hinfo_and_txt_records() {
        let bytes = record(TYPE_HINFO, CLASS_IN, 60, &[3, b'x', b'8', b'6', 5, b'L', b'i', b'n', b'u', b'x']);
        let (rr, _) = decode_resource_record(&bytes, 0).unwrap();
        assert_eq!(rr.value, RecordValue::Text("\"x86\" \"Linux\"".to_string()));
        assert_eq!(rr.record_type, RecordType::Other(TYPE_HINFO));

        let bytes = record(TYPE_TXT, CLASS_IN, 60, &[2, b'h', b'i', 0, 3, b'f', b'o', b'o']);
        let (rr, _) = decode_resource_record(&bytes, 0).unwrap();
        assert_eq!(rr.value, RecordValue::Text("\"hi\" \"\" \"foo\"".to_string()));
    }

    #[test]
    fn test_txt_string_overrunning_rdata_is_skippable() {
        let bytes = record(TYPE_TXT, CLASS_IN, 60, &[5, b'a', b'b']);
        let err = decode_resource_record(&bytes, 0).unwrap_err();
        assert!(matches!(err.error, DecodeError::Truncated { .. }));
        assert_eq!(err.resume_at, Some(bytes.len()));
    }

    #[test]
    fn test_minfo_and_wks_records() {
        let bytes = record(TYPE_MINFO, CLASS_IN, 60, &[1, b'r', 0xC0, 0x00, 1, b'e', 0xC0, 0x00]);
        let (rr, _) = decode_resource_record(&bytes, 0).unwrap();
        assert_eq!(rr.value, RecordValue::Text("r.a e.a".to_string()));

        let bytes = record(TYPE_WKS, CLASS_IN, 60, &[192, 0, 2, 1, 6, 0x00, 0x01]);
        let (rr, _) = decode_resource_record(&bytes, 0).unwrap();
        assert_eq!(rr.value, RecordValue::Text("192.0.2.1 6 0001".to_string()));

        let bytes = record(TYPE_WKS, CLASS_IN, 60, &[192, 0, 2]);
        let err = decode_resource_record(&bytes, 0).unwrap_err();
        assert!(matches!(err.error, DecodeError::InvalidRdata { .. }));
    }

    #[test]
    fn test_unknown_type_is_opaque() {
        let bytes = record(99, CLASS_IN, 60, &[1, 2, 3]);
        let (rr, next) = decode_resource_record(&bytes, 0).unwrap();
        assert_eq!(rr.record_type, RecordType::Other(99));
        assert_eq!(rr.value, RecordValue::Opaque { rdlength: 3 });
        assert_eq!(next, bytes.len());
    }

    #[test]
    fn test_wrong_address_length_resumes_after_record() {
        let bytes = record(TYPE_A, CLASS_IN, 60, &[1, 2, 3]);
        let err = decode_resource_record(&bytes, 0).unwrap_err();
        assert!(matches!(err.error, DecodeError::InvalidRdata { .. }));
        assert_eq!(err.resume_at, Some(bytes.len()));
    }

    #[test]
    fn test_non_in_class_resumes_after_record() {
        let bytes = record(TYPE_A, 3, 60, &[192, 0, 2, 1]);
        let err = decode_resource_record(&bytes, 0).unwrap_err();
        assert_eq!(
            err.error,
            DecodeError::UnexpectedClass {
                offset: 5,
                class: 3
            }
        );
        assert_eq!(err.resume_at, Some(bytes.len()));
    }

    #[test]
    fn test_rdata_past_end_is_fatal() {
        let mut bytes = record(TYPE_A, CLASS_IN, 60, &[192, 0, 2, 1]);
        bytes.truncate(bytes.len() - 2);
        let err = decode_resource_record(&bytes, 0).unwrap_err();
        assert_eq!(err.resume_at, None);
    }

    #[test]
    fn test_bad_owner_name_is_fatal() {
        let bytes = [0xC0, 0x00, 0, 1, 0, 1, 0, 0, 0, 1, 0, 0];
        let err = decode_resource_record(&bytes, 0).unwrap_err();
        assert!(matches!(err.error, DecodeError::PointerLoop { .. }));
        assert_eq!(err.resume_at, None);
    }
}
