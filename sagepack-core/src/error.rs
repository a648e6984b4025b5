//! Error types for sagepack codec operations.
//!
//! One error enum covers every failure mode of the codecs and the frame
//! container: destination sizing, truncated or corrupted compressed
//! streams, and unknown or unsupported frame tags.

use std::io;
use thiserror::Error;

/// The main error type for sagepack operations.
#[derive(Debug, Error)]
pub enum SagePackError {
    /// I/O error from an underlying reader/writer.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The destination buffer is too small for the bytes being written.
    #[error("output overflow: need {needed} bytes, destination holds {available}")]
    OutputOverflow {
        /// Bytes the writer was about to emit.
        needed: usize,
        /// Destination capacity.
        available: usize,
    },

    /// The compressed stream ended while more bits were required.
    #[error("compressed stream truncated at bit {bit_position}")]
    Truncated {
        /// Bit offset at which input ran out.
        bit_position: u64,
    },

    /// A decoded code points outside the symbol alphabet.
    #[error("invalid symbol position {position} (alphabet holds {alphabet})")]
    InvalidSymbol {
        /// Position the code selected.
        position: usize,
        /// Alphabet size.
        alphabet: usize,
    },

    /// A transmitted group layout claims more code slots than permitted.
    #[error("invalid group layout: {slots} code slots exceed the limit of {limit}")]
    InvalidGroupLayout {
        /// Slot total implied by the layout.
        slots: usize,
        /// Maximum slot total a valid layout can reach.
        limit: usize,
    },

    /// A back-reference points outside the available history.
    #[error("invalid back-reference: displacement {displacement} outside window of {window}")]
    InvalidBackReference {
        /// The offending displacement.
        displacement: usize,
        /// History available at that point.
        window: usize,
    },

    /// A copy would run past the declared uncompressed length.
    #[error("copy of {requested} bytes exceeds declared output of {declared}")]
    ExcessiveCopy {
        /// Bytes the instruction wants to produce.
        requested: usize,
        /// Declared output length.
        declared: usize,
    },

    /// A frame carries a tag no codec claims.
    #[error("unknown frame tag {tag:02x?}")]
    HeaderMismatch {
        /// The four tag bytes as read.
        tag: [u8; 4],
    },

    /// A frame tag is recognized but its codec is not available.
    #[error("unsupported compression method: {method}")]
    UnsupportedMethod {
        /// Name of the method.
        method: String,
    },

    /// A header field is malformed.
    #[error("invalid header: {message}")]
    InvalidHeader {
        /// Description of the problem.
        message: String,
    },

    /// A payload decoded to a different size than its header declared.
    #[error("length mismatch: header declares {declared} bytes, payload yields {actual}")]
    LengthMismatch {
        /// Length from the header.
        declared: usize,
        /// Length actually produced.
        actual: usize,
    },
}

/// Result type alias for sagepack operations.
pub type Result<T> = std::result::Result<T, SagePackError>;

impl SagePackError {
    /// Create an output overflow error.
    pub fn output_overflow(needed: usize, available: usize) -> Self {
        Self::OutputOverflow { needed, available }
    }

    /// Create a truncated stream error.
    pub fn truncated(bit_position: u64) -> Self {
        Self::Truncated { bit_position }
    }

    /// Create an invalid symbol error.
    pub fn invalid_symbol(position: usize, alphabet: usize) -> Self {
        Self::InvalidSymbol { position, alphabet }
    }

    /// Create an invalid group layout error.
    pub fn invalid_group_layout(slots: usize, limit: usize) -> Self {
        Self::InvalidGroupLayout { slots, limit }
    }

    /// Create an invalid back-reference error.
    pub fn invalid_back_reference(displacement: usize, window: usize) -> Self {
        Self::InvalidBackReference {
            displacement,
            window,
        }
    }

    /// Create an excessive copy error.
    pub fn excessive_copy(requested: usize, declared: usize) -> Self {
        Self::ExcessiveCopy {
            requested,
            declared,
        }
    }

    /// Create an unknown-tag error.
    pub fn header_mismatch(tag: [u8; 4]) -> Self {
        Self::HeaderMismatch { tag }
    }

    /// Create an unsupported method error.
    pub fn unsupported_method(method: impl Into<String>) -> Self {
        Self::UnsupportedMethod {
            method: method.into(),
        }
    }

    /// Create an invalid header error.
    pub fn invalid_header(message: impl Into<String>) -> Self {
        Self::InvalidHeader {
            message: message.into(),
        }
    }

    /// Create a length mismatch error.
    pub fn length_mismatch(declared: usize, actual: usize) -> Self {
        Self::LengthMismatch { declared, actual }
    }
}
