//! # SagePack Container
//!
//! The tagged frame wrapping every compressed asset stream:
//!
//! ```text
//! offset 0: 4 bytes ASCII tag
//! offset 4: 4 bytes little-endian uncompressed length
//! offset 8: codec-specific payload
//! ```
//!
//! The tag selects the codec: `"EAR\0"` RefPack, `"NOX\0"` LightZhl,
//! `"ZL1\0"` through `"ZL9\0"` zlib at that level, plus two legacy tags
//! (`"EAB\0"` binary-tree, `"EAH\0"` Huffman-with-runlength) that are
//! recognized but whose codecs are not carried here. A stream that starts
//! with no known tag is taken to be uncompressed and passed through
//! unchanged.
//!
//! ## Example
//!
//! ```rust
//! use sagepack_container::{CodecTag, compress, decompress};
//!
//! let framed = compress(b"hello world", CodecTag::RefPack).unwrap();
//! assert_eq!(&framed[..4], b"EAR\0");
//! assert_eq!(decompress(&framed).unwrap(), b"hello world");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

use flate2::Compression;
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use sagepack_core::error::{Result, SagePackError};
use std::io::{Cursor, Read, Write};

/// Size of the frame header: tag plus little-endian length.
pub const HEADER_LEN: usize = 8;

/// Codec selected by a frame tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodecTag {
    /// Byte-aligned LZ77 (`"EAR\0"`).
    RefPack,
    /// LZ77 with adaptive Huffman coding (`"NOX\0"`).
    LightZhl,
    /// Binary-tree coder (`"EAB\0"`); recognized, not carried here.
    BinaryTree,
    /// Huffman-with-runlength coder (`"EAH\0"`); recognized, not carried here.
    HuffmanRle,
    /// Stock DEFLATE in a zlib wrapper (`"ZL1\0"`..`"ZL9\0"`), level 1-9.
    Zlib(u8),
}

impl CodecTag {
    /// Match four tag bytes against the known tags.
    pub fn from_magic(magic: &[u8; 4]) -> Option<Self> {
        match magic {
            b"EAR\0" => return Some(Self::RefPack),
            b"NOX\0" => return Some(Self::LightZhl),
            b"EAB\0" => return Some(Self::BinaryTree),
            b"EAH\0" => return Some(Self::HuffmanRle),
            _ => {}
        }
        if magic[0] == b'Z' && magic[1] == b'L' && magic[3] == 0 {
            let level = magic[2].wrapping_sub(b'0');
            if (1..=9).contains(&level) {
                return Some(Self::Zlib(level));
            }
        }
        None
    }

    /// The four tag bytes for this codec.
    pub fn magic(&self) -> [u8; 4] {
        match self {
            Self::RefPack => *b"EAR\0",
            Self::LightZhl => *b"NOX\0",
            Self::BinaryTree => *b"EAB\0",
            Self::HuffmanRle => *b"EAH\0",
            Self::Zlib(level) => [b'Z', b'L', b'0' + level, 0],
        }
    }

    /// Human-readable codec name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::RefPack => "refpack",
            Self::LightZhl => "lightzhl",
            Self::BinaryTree => "binary-tree",
            Self::HuffmanRle => "huffman-rle",
            Self::Zlib(_) => "zlib",
        }
    }
}

impl std::fmt::Display for CodecTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Parse a frame header, returning the tag and declared length.
fn parse_header(frame: &[u8]) -> Option<(CodecTag, usize)> {
    if frame.len() < HEADER_LEN {
        return None;
    }
    let magic: [u8; 4] = frame[..4].try_into().ok()?;
    let tag = CodecTag::from_magic(&magic)?;
    let len = u32::from_le_bytes(frame[4..8].try_into().ok()?) as usize;
    Some((tag, len))
}

/// The uncompressed length a frame declares, if it carries a known tag.
pub fn declared_len(frame: &[u8]) -> Option<usize> {
    parse_header(frame).map(|(_, len)| len)
}

/// Wrap `data` in a frame compressed with the given codec.
pub fn compress(data: &[u8], tag: CodecTag) -> Result<Vec<u8>> {
    let len = u32::try_from(data.len())
        .map_err(|_| SagePackError::invalid_header("input exceeds the 32-bit length field"))?;

    let mut frame = Vec::with_capacity(HEADER_LEN + data.len() / 2);
    frame.extend_from_slice(&tag.magic());
    frame.extend_from_slice(&len.to_le_bytes());

    match tag {
        CodecTag::RefPack => {
            sagepack_refpack::encode(data, &mut frame)?;
        }
        CodecTag::LightZhl => {
            let mut payload = vec![0u8; sagepack_lightzhl::max_compressed_size(data.len())];
            let n = sagepack_lightzhl::compress(data, &mut payload)?;
            frame.extend_from_slice(&payload[..n]);
        }
        CodecTag::Zlib(level) => {
            let mut encoder =
                ZlibEncoder::new(&mut frame, Compression::new(u32::from(level)));
            encoder.write_all(data)?;
            encoder.finish()?;
        }
        CodecTag::BinaryTree | CodecTag::HuffmanRle => {
            return Err(SagePackError::unsupported_method(tag.name()));
        }
    }
    Ok(frame)
}

/// Unwrap a frame. Input with no recognized tag is returned unchanged.
pub fn decompress(frame: &[u8]) -> Result<Vec<u8>> {
    match parse_header(frame) {
        Some((tag, declared)) => decode_payload(frame, tag, declared),
        None => Ok(frame.to_vec()),
    }
}

/// Unwrap a frame, rejecting input that does not carry a known tag.
pub fn decompress_strict(frame: &[u8]) -> Result<Vec<u8>> {
    let Some((tag, declared)) = parse_header(frame) else {
        let mut tag = [0u8; 4];
        let head = frame.len().min(4);
        tag[..head].copy_from_slice(&frame[..head]);
        return Err(SagePackError::header_mismatch(tag));
    };
    decode_payload(frame, tag, declared)
}

fn decode_payload(frame: &[u8], tag: CodecTag, declared: usize) -> Result<Vec<u8>> {
    let payload = &frame[HEADER_LEN..];

    let out = match tag {
        CodecTag::RefPack => sagepack_refpack::decode_to_vec(&mut Cursor::new(payload))?,
        CodecTag::LightZhl => sagepack_lightzhl::decompress_to_vec(payload, declared)?,
        CodecTag::Zlib(_) => {
            let mut out = Vec::with_capacity(declared);
            ZlibDecoder::new(payload).read_to_end(&mut out)?;
            out
        }
        CodecTag::BinaryTree | CodecTag::HuffmanRle => {
            return Err(SagePackError::unsupported_method(tag.name()));
        }
    };

    if out.len() != declared {
        return Err(SagePackError::length_mismatch(declared, out.len()));
    }
    Ok(out)
}
