//! Fixed-offset primitive field reads

use crate::{Result, StatPartyError};

/// Bounds-checked slice of `width` bytes starting at `offset`
fn bytes_at(buf: &[u8], offset: usize, width: usize) -> Result<&[u8]> {
    let end = offset.checked_add(width).unwrap_or(usize::MAX);
    if end > buf.len() {
        return Err(StatPartyError::Truncated {
            needed: end,
            actual: buf.len(),
        });
    }

    Ok(&buf[offset..end])
}

/// Read an unsigned 8-bit value at `offset`
///
/// # Errors
///
/// Returns `Truncated` if the offset is past the end of the buffer
pub fn read_u8(buf: &[u8], offset: usize) -> Result<u8> {
    Ok(bytes_at(buf, offset, 1)?[0])
}

/// Read a little-endian unsigned 16-bit value at `offset`
///
/// # Errors
///
/// Returns `Truncated` if the field extends past the end of the buffer
pub fn read_u16(buf: &[u8], offset: usize) -> Result<u16> {
    let bytes = bytes_at(buf, offset, 2)?;
    Ok(u16::from_le_bytes([bytes[0], bytes[1]]))
}

/// Read a little-endian unsigned 32-bit value at `offset`
///
/// # Errors
///
/// Returns `Truncated` if the field extends past the end of the buffer
pub fn read_u32(buf: &[u8], offset: usize) -> Result<u32> {
    let bytes = bytes_at(buf, offset, 4)?;
    Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}

/// Read a little-endian 32-bit float at `offset`
///
/// # Errors
///
/// Returns `Truncated` if the field extends past the end of the buffer
pub fn read_f32(buf: &[u8], offset: usize) -> Result<f32> {
    let bytes = bytes_at(buf, offset, 4)?;
    Ok(f32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}

/// Bounds-checked variable-width byte range, used for the name fields
///
/// # Errors
///
/// Returns `Truncated` if the range extends past the end of the buffer
pub fn read_bytes(buf: &[u8], offset: usize, len: usize) -> Result<&[u8]> {
    bytes_at(buf, offset, len)
}
