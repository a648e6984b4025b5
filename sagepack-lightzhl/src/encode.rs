//! LightZhl compression.
//!
//! The matcher is a 32 768-bucket hash table holding one previous position
//! per 5-byte rolling hash. That single slot trades match quality for
//! throughput; three refinements claw most of it back:
//!
//! - *overlap extension*: a match that runs into the write head keeps going
//!   over the bytes it is itself about to produce,
//! - *backward extension*: a match absorbs matching bytes out of the
//!   pending literal run behind it,
//! - *lazy matching*: a found match is deferred one byte in case the next
//!   position starts a strictly longer one.

use crate::huffman::EncoderModel;
use crate::tables::{
    DISP_CODES, MATCH_OVER_HIGH, MATCH_OVER_MID, MAX_MATCH, MAX_MATCH_OVER, MIN_MATCH,
    SYM_END, SYM_MATCH_BASE,
};
use sagepack_core::bitpack::BitWriter;
use sagepack_core::error::Result;
use sagepack_core::window::{HistoryWindow, WINDOW_MASK, WINDOW_SIZE};

/// Bytes covered by the rolling hash; also the smallest match the scanner
/// takes without backward extension.
const HASH_LEN: usize = 5;

/// Hash table size (15-bit bucket index).
const HASH_TABLE_SIZE: usize = 1 << 15;

/// Longest literal run scanned between match attempts.
const MAX_RAW_RUN: usize = 64;

/// Worst-case compressed size for `raw` input bytes. Destinations at least
/// this large never overflow on inputs with ordinary symbol statistics.
pub fn max_compressed_size(raw: usize) -> usize {
    raw + raw / 2 + 32
}

fn seed_hash(bytes: &[u8]) -> u32 {
    let mut h = 0u32;
    for &b in &bytes[..HASH_LEN] {
        h = (h ^ b as u32).rotate_left(5);
    }
    h
}

/// Slide the hash window one byte: drop `out` (rotated to where five
/// updates left it), take in `inn`.
#[inline]
fn roll_hash(h: u32, out: u8, inn: u8) -> u32 {
    (h ^ (out as u32).rotate_left(25) ^ inn as u32).rotate_left(5)
}

#[inline]
fn bucket(h: u32) -> usize {
    (h.wrapping_mul(0x343FD).wrapping_add(0x269EC3) >> 17) as usize
}

/// A match deferred one step to see whether the next position offers a
/// strictly longer one.
#[derive(Debug, Clone, Copy)]
struct LazyMatch {
    len: usize,
    raw: usize,
    disp: u16,
}

/// LightZhl compressor. Holds the adaptive model, the history window and
/// the match table for a single `compress` call.
#[derive(Debug)]
pub struct Compressor {
    model: EncoderModel,
    window: HistoryWindow,
    buckets: Vec<u16>,
}

impl Compressor {
    /// Create a compressor with fresh model state.
    pub fn new() -> Self {
        Self {
            model: EncoderModel::new(),
            window: HistoryWindow::new(),
            buckets: vec![0u16; HASH_TABLE_SIZE],
        }
    }

    /// Compress `src` into `dst`, returning the number of bytes written.
    ///
    /// Fails with `OutputOverflow` when `dst` runs out; size it with
    /// [`max_compressed_size`].
    pub fn compress(mut self, src: &[u8], dst: &mut [u8]) -> Result<usize> {
        let mut writer = BitWriter::new(dst);
        let mut pos = 0usize;

        while src.len() - pos >= HASH_LEN {
            pos = self.scan_run(src, pos, &mut writer)?;
        }
        if pos < src.len() {
            self.put_raw(&src[pos..], &mut writer)?;
            self.window.extend(&src[pos..]);
        }

        self.model.put_symbol(SYM_END, &mut writer)?;
        writer.finish()
    }

    /// Scan forward from `pos`, accumulating a literal run until a match
    /// is emitted or the run fills. Returns the next unprocessed position.
    fn scan_run(&mut self, src: &[u8], pos: usize, w: &mut BitWriter<'_>) -> Result<usize> {
        let remaining = src.len() - pos;
        let max_raw = MAX_RAW_RUN.min(remaining - HASH_LEN);
        let mut hash = seed_hash(&src[pos..]);
        let mut raw = 0usize;
        let mut lazy: Option<LazyMatch> = None;

        loop {
            let head = self.window.position();
            let slot = bucket(hash);
            let prior = self.buckets[slot];
            self.buckets[slot] = (head & WINDOW_MASK) as u16;

            let disp = (head as u16).wrapping_sub(prior);
            let mut len = 0usize;
            let mut start = raw;
            let mut forced = false;

            if disp != 0 && disp != u16::MAX {
                let d = disp as usize;
                let limit = d.min(remaining - raw).min(MAX_MATCH);
                len = self
                    .window
                    .match_length(prior, &src[pos + raw..pos + raw + limit]);

                // The matched span ends at the write head: it may keep
                // going over the bytes it is itself about to produce.
                if prior.wrapping_add(len as u16) == head as u16 {
                    let cap = (MAX_MATCH - len).min(remaining - raw - len);
                    let mut extra = 0;
                    while extra < cap && src[pos + raw + extra] == src[pos + raw + len + extra] {
                        extra += 1;
                    }
                    len += extra;
                }

                // Absorb matching bytes out of the pending literal run.
                if len >= MIN_MATCH {
                    let cap = (MAX_MATCH - len)
                        .min(raw)
                        .min(d.saturating_sub(len))
                        .min(WINDOW_SIZE - d);
                    let mut extra = 0usize;
                    while extra < cap
                        && self.window.byte_at(prior.wrapping_sub(extra as u16 + 1) as u32)
                            == src[pos + raw - extra - 1]
                    {
                        extra += 1;
                    }
                    if extra > 0 {
                        forced = true;
                        len += extra;
                        start = raw - extra;
                    }
                }
            }

            let usable = len >= HASH_LEN || (forced && len >= MIN_MATCH);

            if usable {
                if let Some(l) = lazy {
                    // One deferred step: keep whichever match is longer.
                    return if l.len >= len {
                        self.emit_match(src, pos, l.raw, l.len, l.disp, w)
                    } else {
                        self.emit_match(src, pos, start, len, disp, w)
                    };
                }
                if !forced && raw + 1 <= max_raw {
                    lazy = Some(LazyMatch {
                        len,
                        raw: start,
                        disp,
                    });
                    self.window.push(src[pos + raw]);
                    hash = roll_hash(hash, src[pos + raw], src[pos + raw + HASH_LEN]);
                    raw += 1;
                    continue;
                }
                return self.emit_match(src, pos, start, len, disp, w);
            }

            if let Some(l) = lazy {
                return self.emit_match(src, pos, l.raw, l.len, l.disp, w);
            }
            if raw + 1 > max_raw {
                self.window.push(src[pos + raw]);
                raw += 1;
                self.put_raw(&src[pos..pos + raw], w)?;
                return Ok(pos + raw);
            }
            self.window.push(src[pos + raw]);
            hash = roll_hash(hash, src[pos + raw], src[pos + raw + HASH_LEN]);
            raw += 1;
        }
    }

    /// Emit `raw` literals then a match of `len` at displacement `disp`,
    /// and re-align the window with the emitted byte stream.
    fn emit_match(
        &mut self,
        src: &[u8],
        pos: usize,
        raw: usize,
        len: usize,
        disp: u16,
        w: &mut BitWriter<'_>,
    ) -> Result<usize> {
        self.put_raw(&src[pos..pos + raw], w)?;
        self.put_match_over(len - MIN_MATCH, w)?;
        self.put_displacement(disp, w)?;

        // Scanned-ahead literals may sit past the match start; the matched
        // span re-covers them with identical bytes.
        let match_start = (pos + raw) as u32;
        let scanned_past = self.window.position().wrapping_sub(match_start);
        self.window.rewind(scanned_past);
        self.window.extend(&src[pos + raw..pos + raw + len]);

        Ok(pos + raw + len)
    }

    fn put_raw(&mut self, bytes: &[u8], w: &mut BitWriter<'_>) -> Result<()> {
        for &b in bytes {
            self.model.put_symbol(b as usize, w)?;
        }
        Ok(())
    }

    fn put_match_over(&mut self, over: usize, w: &mut BitWriter<'_>) -> Result<()> {
        debug_assert!(over <= MAX_MATCH_OVER);

        if over < 8 {
            return self.model.put_symbol(SYM_MATCH_BASE + over, w);
        }
        if over < 38 {
            let x = (over - 8) as u32;
            let e = MATCH_OVER_MID[(x >> 1) as usize];
            self.model.put_symbol(e.symbol as usize, w)?;
            return w.put_bits(e.nbits as u32, e.bits as u32 | (x & 1));
        }
        let x = (over - 38) as u32;
        let e = MATCH_OVER_HIGH[(x >> 5) as usize];
        self.model.put_symbol(e.symbol as usize, w)?;
        w.put_bits(e.nbits as u32 + 4, ((e.bits as u32) << 4) | (x & 0x1F))
    }

    fn put_displacement(&mut self, disp: u16, w: &mut BitWriter<'_>) -> Result<()> {
        let e = DISP_CODES[(disp >> 9) as usize];
        let total = e.nbits as u32 + 9;
        let low = (disp & 0x1FF) as u32;
        if total <= 16 {
            w.put_bits(total, ((e.bits as u32) << 9) | low)
        } else {
            w.put_bits(e.nbits as u32, e.bits as u32)?;
            w.put_bits(9, low)
        }
    }
}

impl Default for Compressor {
    fn default() -> Self {
        Self::new()
    }
}

/// Compress `src` into `dst`; returns the number of bytes written.
pub fn compress(src: &[u8], dst: &mut [u8]) -> Result<usize> {
    Compressor::new().compress(src, dst)
}

/// Compress `src` into a freshly allocated buffer.
pub fn compress_to_vec(src: &[u8]) -> Result<Vec<u8>> {
    let mut out = vec![0u8; max_compressed_size(src.len())];
    let n = compress(src, &mut out)?;
    out.truncate(n);
    Ok(out)
}
