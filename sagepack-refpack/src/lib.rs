//! # SagePack RefPack
//!
//! Pure Rust implementation of RefPack: a byte-aligned LZ77 format with a
//! two-byte magic header, a big-endian uncompressed length, and three
//! fixed-width back-reference instruction forms plus literal-run and stop
//! opcodes.
//!
//! Unlike LightZhl there is no entropy coder; the format trades ratio for
//! very cheap decoding.
//!
//! ## Example
//!
//! ```rust
//! use sagepack_refpack::{decode_to_vec, encode_to_vec, uncompressed_size};
//! use std::io::Cursor;
//!
//! let data = b"hello world hello world hello world";
//! let packed = encode_to_vec(data).unwrap();
//!
//! assert_eq!(
//!     uncompressed_size(&mut Cursor::new(&packed)).unwrap(),
//!     data.len()
//! );
//! assert_eq!(decode_to_vec(&mut Cursor::new(&packed)).unwrap(), data);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod decode;
pub mod encode;
mod header;

// Re-exports
pub use decode::{decode, decode_to_vec, uncompressed_size};
pub use encode::{encode, encode_to_vec};
