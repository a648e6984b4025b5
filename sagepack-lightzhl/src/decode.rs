//! LightZhl decompression.
//!
//! A single pass over the bitstream: each step decodes one symbol through
//! the adaptive model and either emits a literal, replays a back-reference
//! out of the history window, rebuilds the model, or terminates. Every
//! value read off the wire is validated before use; corrupt input fails
//! with a typed error and never reads or writes out of bounds.

use crate::huffman::DecoderModel;
use crate::tables::{DISP_RANGES, MATCH_OVER_RANGES, MIN_MATCH, SYM_END, SYM_MATCH_BASE,
    SYM_REBUILD};
use sagepack_core::bitpack::BitReader;
use sagepack_core::error::{Result, SagePackError};
use sagepack_core::window::{HistoryWindow, WINDOW_SIZE};

/// LightZhl decompressor. Holds the adaptive model and history window for
/// a single `decompress` call.
#[derive(Debug)]
pub struct Decompressor {
    model: DecoderModel,
    window: HistoryWindow,
}

impl Decompressor {
    /// Create a decompressor with fresh model state.
    pub fn new() -> Self {
        Self {
            model: DecoderModel::new(),
            window: HistoryWindow::new(),
        }
    }

    /// Decompress `src` into `dst`. Returns `(bytes consumed, bytes
    /// written)`; decoding ends at the end-of-stream symbol, which may
    /// arrive before `src` is exhausted.
    pub fn decompress(mut self, src: &[u8], dst: &mut [u8]) -> Result<(usize, usize)> {
        let mut reader = BitReader::new(src);
        let mut out = 0usize;

        loop {
            let symbol = self.model.read_symbol(&mut reader)? as usize;
            match symbol {
                0..=255 => {
                    if out >= dst.len() {
                        return Err(SagePackError::output_overflow(out + 1, dst.len()));
                    }
                    dst[out] = symbol as u8;
                    out += 1;
                    self.window.push(symbol as u8);
                    self.model.count(symbol);
                }
                SYM_REBUILD => self.model.rebuild(&mut reader)?,
                SYM_END => return Ok((reader.bytes_consumed(), out)),
                _ => {
                    self.model.count(symbol);
                    let over = read_match_over(symbol, &mut reader)?;
                    let disp = read_displacement(&mut reader)?;
                    let len = over + MIN_MATCH;

                    if disp as usize >= WINDOW_SIZE {
                        return Err(SagePackError::invalid_back_reference(
                            disp as usize,
                            WINDOW_SIZE,
                        ));
                    }
                    if out + len > dst.len() {
                        return Err(SagePackError::excessive_copy(len, dst.len()));
                    }

                    // Byte-at-a-time keeps the len > disp self-extension
                    // case correct: each copied byte is in the window
                    // before a later offset can read it.
                    let from = self.window.position().wrapping_sub(disp as u32);
                    for i in 0..len {
                        let b = self.window.byte_at(from.wrapping_add(i as u32));
                        dst[out] = b;
                        out += 1;
                        self.window.push(b);
                    }
                }
            }
        }
    }
}

impl Default for Decompressor {
    fn default() -> Self {
        Self::new()
    }
}

fn read_match_over(symbol: usize, r: &mut BitReader<'_>) -> Result<usize> {
    if symbol < SYM_MATCH_BASE + 8 {
        return Ok(symbol - SYM_MATCH_BASE);
    }
    let range = MATCH_OVER_RANGES[symbol - (SYM_MATCH_BASE + 8)];
    let extra = r.get_bits(range.extra_bits as u32)?;
    Ok(range.base as usize + extra as usize)
}

fn read_displacement(r: &mut BitReader<'_>) -> Result<u16> {
    let range = DISP_RANGES[r.get_bits(3)? as usize];
    let nbits = range.extra_bits as u32 + 9;
    // Always wider than one byte: read 8 bits, then the remainder.
    let hi = r.get_bits(8)?;
    let lo = r.get_bits(nbits - 8)?;
    let value = (hi << (nbits - 8)) | lo;
    Ok((((range.base_top as u32) << 9) | value) as u16)
}

/// Decompress `src` into `dst`; returns `(bytes consumed, bytes written)`.
pub fn decompress(src: &[u8], dst: &mut [u8]) -> Result<(usize, usize)> {
    Decompressor::new().decompress(src, dst)
}

/// Decompress a stream whose uncompressed size is known.
pub fn decompress_to_vec(src: &[u8], expected_len: usize) -> Result<Vec<u8>> {
    let mut out = vec![0u8; expected_len];
    let (_, written) = decompress(src, &mut out)?;
    out.truncate(written);
    Ok(out)
}
