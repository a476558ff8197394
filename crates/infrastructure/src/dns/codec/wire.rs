use dnslookup_domain::DecodeError;

pub(crate) fn read_slice(bytes: &[u8], offset: usize, len: usize) -> Result<&[u8], DecodeError> {
    let end = offset.saturating_add(len);
    bytes.get(offset..end).ok_or_else(|| DecodeError::Truncated {
        offset,
        needed: end.saturating_sub(bytes.len()),
    })
}

pub(crate) fn read_u8(bytes: &[u8], offset: usize) -> Result<u8, DecodeError> {
    Ok(read_slice(bytes, offset, 1)?[0])
}

pub(crate) fn read_u16(bytes: &[u8], offset: usize) -> Result<u16, DecodeError> {
    let raw = read_slice(bytes, offset, 2)?;
    Ok(u16::from_be_bytes([raw[0], raw[1]]))
}

pub(crate) fn read_u32(bytes: &[u8], offset: usize) -> Result<u32, DecodeError> {
    let raw = read_slice(bytes, offset, 4)?;
    Ok(u32::from_be_bytes([raw[0], raw[1], raw[2], raw[3]]))
}
