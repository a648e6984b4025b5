//! # SagePack LightZhl
//!
//! Pure Rust implementation of LightZhl compression: an LZ77 sliding-window
//! matcher over a 64 KiB history combined with an adaptive Huffman coder
//! whose 274-symbol alphabet is periodically regrouped from observed
//! frequencies.
//!
//! The format interleaves literal symbols, match symbols (length plus a
//! 16-bit displacement) and two sentinels: one announcing a model rebuild,
//! one ending the stream. Compression and decompression are whole-buffer
//! operations; a codec instance serves exactly one call.
//!
//! ## Example
//!
//! ```rust
//! use sagepack_lightzhl::{compress, decompress, max_compressed_size};
//!
//! let data = b"the quick brown fox jumps over the quick brown dog";
//! let mut packed = vec![0u8; max_compressed_size(data.len())];
//! let n = compress(data, &mut packed).unwrap();
//!
//! let mut unpacked = vec![0u8; data.len()];
//! let (_, written) = decompress(&packed[..n], &mut unpacked).unwrap();
//! assert_eq!(&unpacked[..written], data);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod decode;
pub mod encode;
mod huffman;
mod tables;

// Re-exports
pub use decode::{Decompressor, decompress, decompress_to_vec};
pub use encode::{Compressor, compress, compress_to_vec, max_compressed_size};
pub use tables::{MAX_MATCH, MAX_MATCH_OVER, MIN_MATCH, NGROUPS, NSYMBOLS};
