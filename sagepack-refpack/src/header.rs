//! RefPack stream header.
//!
//! Two big-endian magic bytes, then the big-endian uncompressed length:
//!
//! - `0x10FB`: length fits 3 bytes (up to 16 MiB - 1)
//! - `0x90FB`: 4-byte length
//! - `0x11FB` / `0x91FB`: as above, but an equally sized compressed-size
//!   field precedes the length; readers skip it, writers never emit it.

use sagepack_core::error::{Result, SagePackError};
use std::io::{Read, Write};

/// Base magic for streams with a 3-byte length.
pub const MAGIC: u16 = 0x10FB;

/// Set in the magic when length fields are 4 bytes wide.
const LARGE_FLAG: u16 = 0x8000;

/// Set in the magic when a skippable compressed-size field is present.
const COMPRESSED_SIZE_FLAG: u16 = 0x0100;

/// Largest length a 3-byte field can carry.
pub const MAX_SMALL_LEN: usize = 0x00FF_FFFF;

pub(crate) fn read_u8<R: Read>(r: &mut R) -> Result<u8> {
    let mut b = [0u8; 1];
    r.read_exact(&mut b)?;
    Ok(b[0])
}

fn read_be<R: Read>(r: &mut R, nbytes: usize) -> Result<usize> {
    let mut value = 0usize;
    for _ in 0..nbytes {
        value = (value << 8) | read_u8(r)? as usize;
    }
    Ok(value)
}

/// Write the magic and uncompressed length for a stream of `len` bytes.
pub(crate) fn write_header<W: Write>(w: &mut W, len: usize) -> Result<()> {
    if len > MAX_SMALL_LEN {
        let len = u32::try_from(len)
            .map_err(|_| SagePackError::invalid_header("input exceeds 4-byte length field"))?;
        w.write_all(&(MAGIC | LARGE_FLAG).to_be_bytes())?;
        w.write_all(&len.to_be_bytes())?;
    } else {
        w.write_all(&MAGIC.to_be_bytes())?;
        w.write_all(&(len as u32).to_be_bytes()[1..])?;
    }
    Ok(())
}

/// Read the magic, skip the compressed-size field when present, and return
/// the declared uncompressed length.
pub(crate) fn read_header<R: Read>(r: &mut R) -> Result<usize> {
    let magic = ((read_u8(r)? as u16) << 8) | read_u8(r)? as u16;
    if magic & !(LARGE_FLAG | COMPRESSED_SIZE_FLAG) != MAGIC {
        return Err(SagePackError::invalid_header(format!(
            "bad refpack magic {magic:#06x}"
        )));
    }

    let field_bytes = if magic & LARGE_FLAG != 0 { 4 } else { 3 };
    if magic & COMPRESSED_SIZE_FLAG != 0 {
        read_be(r, field_bytes)?;
    }
    read_be(r, field_bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_small_header_roundtrip() {
        let mut buf = Vec::new();
        write_header(&mut buf, 3).unwrap();
        assert_eq!(buf, [0x10, 0xFB, 0x00, 0x00, 0x03]);
        assert_eq!(read_header(&mut Cursor::new(&buf)).unwrap(), 3);
    }

    #[test]
    fn test_large_header_roundtrip() {
        let len = 0x0123_4567usize;
        let mut buf = Vec::new();
        write_header(&mut buf, len).unwrap();
        assert_eq!(buf[..2], [0x90, 0xFB]);
        assert_eq!(read_header(&mut Cursor::new(&buf)).unwrap(), len);
    }

    #[test]
    fn test_compressed_size_field_is_skipped() {
        let buf = [0x11, 0xFB, 0xAA, 0xBB, 0xCC, 0x00, 0x00, 0x07];
        assert_eq!(read_header(&mut Cursor::new(&buf)).unwrap(), 7);

        let buf = [0x91, 0xFB, 0xAA, 0xBB, 0xCC, 0xDD, 0x00, 0x01, 0x00, 0x00];
        assert_eq!(read_header(&mut Cursor::new(&buf)).unwrap(), 0x10000);
    }

    #[test]
    fn test_bad_magic_rejected() {
        let buf = [0x12, 0xFB, 0, 0, 0];
        let err = read_header(&mut Cursor::new(&buf)).unwrap_err();
        assert!(matches!(err, SagePackError::InvalidHeader { .. }));
    }
}
