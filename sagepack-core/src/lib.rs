//! # SagePack Core
//!
//! Core components for the sagepack codec family.
//!
//! This crate provides the building blocks shared by the LightZhl and
//! RefPack codecs and the frame container:
//!
//! - [`bitpack`]: MSB-first bit packing over in-memory buffers
//! - [`window`]: 64 KiB sliding history window for LZ77-style matching
//! - [`error`]: error types
//!
//! ## Architecture
//!
//! The codec stack is layered:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │ L3: Frame container                                     │
//! │     4-byte tag + length header, codec dispatch          │
//! ├─────────────────────────────────────────────────────────┤
//! │ L2: Codecs                                              │
//! │     LightZhl (LZ77 + adaptive Huffman), RefPack (LZ77)  │
//! ├─────────────────────────────────────────────────────────┤
//! │ L1: Primitives (this crate)                             │
//! │     BitReader/BitWriter, HistoryWindow                  │
//! └─────────────────────────────────────────────────────────┘
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod bitpack;
pub mod error;
pub mod window;

// Re-exports for convenience
pub use bitpack::{BitReader, BitWriter};
pub use error::{Result, SagePackError};
pub use window::{HistoryWindow, WINDOW_MASK, WINDOW_SIZE};
