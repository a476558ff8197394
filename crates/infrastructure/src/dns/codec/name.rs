use super::wire::{read_slice, read_u8};
use dnslookup_domain::DecodeError;
use rustc_hash::FxHashSet;

const MAX_NAME_LEN: usize = 255;

const LABEL_KIND_MASK: u8 = 0xC0;
const POINTER: u8 = 0xC0;
const POINTER_OFFSET_MASK: u8 = 0x3F;

/// Decodes a possibly compressed domain name starting at `start`.
///
/// Returns the dotted name (the root is `""`) and the offset just past the
/// name as it appears at `start`: after the terminating zero byte, or after
/// the first compression pointer. Every pointer must jump strictly backwards
/// and never to an offset already visited.
pub fn decode_name(bytes: &[u8], start: usize) -> Result<(String, usize), DecodeError> {
    let mut labels: Vec<String> = Vec::new();
    let mut visited = FxHashSet::default();
    let mut next_offset = None;
    let mut wire_len = 1;
    let mut pos = start;

    loop {
        let len_byte = read_u8(bytes, pos)?;

        match len_byte & LABEL_KIND_MASK {
            0 if len_byte == 0 => {
                next_offset.get_or_insert(pos + 1);
                break;
            }
            0 => {
                let len = len_byte as usize;
                wire_len += len + 1;
                if wire_len > MAX_NAME_LEN {
                    return Err(DecodeError::NameTooLong { offset: start });
                }
                let label = read_slice(bytes, pos + 1, len)?;
                labels.push(String::from_utf8_lossy(label).into_owned());
                pos += 1 + len;
            }
            POINTER => {
                let low = read_u8(bytes, pos + 1)?;
                let target = (((len_byte & POINTER_OFFSET_MASK) as usize) << 8) | low as usize;
                if target >= pos || !visited.insert(target) {
                    return Err(DecodeError::PointerLoop {
                        offset: pos,
                        target,
                    });
                }
                next_offset.get_or_insert(pos + 2);
                pos = target;
            }
            bits => {
                return Err(DecodeError::ReservedLabelBits { offset: pos, bits });
            }
        }
    }

    Ok((labels.join("."), next_offset.unwrap_or(pos + 1)))
}
