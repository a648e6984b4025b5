//! RefPack compression.
//!
//! A hash-chain matcher feeds the three fixed reference forms. Each
//! candidate is scored by `length - cost` for the cheapest form its
//! length/displacement pair fits (2, 3 or 4 opcode bytes); pending
//! literals flow out through four-aligned run instructions, leaving at
//! most three to ride along with the next reference or the stop opcode.

use crate::header::write_header;
use sagepack_core::error::Result;
use std::io::Write;

/// Hash table buckets (one per 16-bit hash).
const HASH_BUCKETS: usize = 1 << 16;

/// Collision links, indexed by `position & LINK_MASK`.
const LINK_SLOTS: usize = 1 << 17;
const LINK_MASK: usize = LINK_SLOTS - 1;

/// Candidates examined per position.
const CHAIN_LIMIT: usize = 128;

/// Longest encodable match (4-byte form).
const MAX_MATCH: usize = 1028;

/// Largest displacement any form can carry.
const MAX_DISP: usize = 0x1FFFF;

/// Longest literal run instruction.
const MAX_LITERAL_RUN: usize = 112;

#[derive(Debug, Clone, Copy)]
struct Reference {
    len: usize,
    disp: usize,
    cost: usize,
}

/// Pick the best instruction form for a raw match, if any fits.
fn best_form(len: usize, disp: usize) -> Option<Reference> {
    let mut best: Option<Reference> = None;
    let mut consider = |len: usize, disp: usize, cost: usize| {
        let gain = len as isize - cost as isize;
        if gain > 0 && best.is_none_or(|b| gain > b.len as isize - b.cost as isize) {
            best = Some(Reference { len, disp, cost });
        }
    };

    if len >= 3 && disp <= 0x3FF {
        consider(len.min(10), disp, 2);
    }
    if len >= 4 && disp <= 0x3FFF {
        consider(len.min(67), disp, 3);
    }
    if len >= 5 && disp <= MAX_DISP {
        consider(len.min(MAX_MATCH), disp, 4);
    }
    best
}

/// Three-byte hash over the window the reference forms address.
#[inline]
fn hash3(src: &[u8], p: usize) -> usize {
    ((((src[p] as usize) << 8) | src[p + 2] as usize) ^ ((src[p + 1] as usize) << 4)) & 0xFFFF
}

struct ChainMatcher {
    head: Vec<i32>,
    link: Vec<i32>,
}

impl ChainMatcher {
    fn new() -> Self {
        Self {
            head: vec![-1; HASH_BUCKETS],
            link: vec![-1; LINK_SLOTS],
        }
    }

    fn insert(&mut self, src: &[u8], p: usize) {
        if p + 2 < src.len() {
            let h = hash3(src, p);
            self.link[p & LINK_MASK] = self.head[h];
            self.head[h] = p as i32;
        }
    }

    /// Best encodable reference at `p`, or None.
    fn find(&self, src: &[u8], p: usize) -> Option<Reference> {
        if p + 2 >= src.len() {
            return None;
        }
        let max_len = (src.len() - p).min(MAX_MATCH);
        let mut cand = self.head[hash3(src, p)];
        let mut best: Option<Reference> = None;
        let mut chains = 0;

        while cand >= 0 && chains < CHAIN_LIMIT {
            let c = cand as usize;
            let disp = p - c - 1;
            if disp > MAX_DISP {
                break;
            }

            let mut len = 0;
            while len < max_len && src[c + len] == src[p + len] {
                len += 1;
            }

            if let Some(r) = best_form(len, disp) {
                let better = best.is_none_or(|b| {
                    r.len as isize - r.cost as isize > b.len as isize - b.cost as isize
                });
                if better {
                    best = Some(r);
                    if r.len >= MAX_MATCH {
                        break;
                    }
                }
            }

            // The link slot aliases every 128 KiB of input; a link that
            // fails to point strictly backward is stale.
            let next = self.link[c & LINK_MASK];
            if next >= cand {
                break;
            }
            cand = next;
            chains += 1;
        }
        best
    }
}

/// Compress `src` as a RefPack stream (header plus payload) into `sink`.
pub fn encode<W: Write>(src: &[u8], sink: &mut W) -> Result<()> {
    write_header(sink, src.len())?;

    let mut matcher = ChainMatcher::new();
    let mut pos = 0usize;
    let mut anchor = 0usize;

    while pos < src.len() {
        if let Some(r) = matcher.find(src, pos) {
            flush_literal_runs(sink, src, &mut anchor, pos)?;
            emit_reference(sink, &src[anchor..pos], r)?;

            let end = (pos + r.len).min(src.len());
            for p in pos..end {
                matcher.insert(src, p);
            }
            pos += r.len;
            anchor = pos;
        } else {
            matcher.insert(src, pos);
            pos += 1;
        }
    }

    flush_literal_runs(sink, src, &mut anchor, src.len())?;
    let tail = src.len() - anchor;
    sink.write_all(&[(0xFC | tail) as u8])?;
    sink.write_all(&src[anchor..])?;
    Ok(())
}

/// Drain pending literals down to at most three through run instructions.
fn flush_literal_runs<W: Write>(
    sink: &mut W,
    src: &[u8],
    anchor: &mut usize,
    upto: usize,
) -> Result<()> {
    while upto - *anchor > 3 {
        let block = ((upto - *anchor) & !3).min(MAX_LITERAL_RUN);
        sink.write_all(&[(0xE0 | ((block - 4) >> 2)) as u8])?;
        sink.write_all(&src[*anchor..*anchor + block])?;
        *anchor += block;
    }
    Ok(())
}

/// Emit one reference instruction with its 0-3 inline literals.
fn emit_reference<W: Write>(sink: &mut W, literals: &[u8], r: Reference) -> Result<()> {
    debug_assert!(literals.len() <= 3);
    let lit = literals.len();

    match r.cost {
        2 => {
            sink.write_all(&[
                (((r.disp >> 3) & 0x60) | ((r.len - 3) << 2) | lit) as u8,
                (r.disp & 0xFF) as u8,
            ])?;
        }
        3 => {
            sink.write_all(&[
                (0x80 | (r.len - 4)) as u8,
                ((lit << 6) | (r.disp >> 8)) as u8,
                (r.disp & 0xFF) as u8,
            ])?;
        }
        _ => {
            sink.write_all(&[
                (0xC0 | ((r.disp >> 12) & 0x10) | (((r.len - 5) >> 6) & 0x0C) | lit) as u8,
                ((r.disp >> 8) & 0xFF) as u8,
                (r.disp & 0xFF) as u8,
                ((r.len - 5) & 0xFF) as u8,
            ])?;
        }
    }
    sink.write_all(literals)?;
    Ok(())
}

/// Compress `src` into a freshly allocated RefPack stream.
pub fn encode_to_vec(src: &[u8]) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(src.len() / 2 + 16);
    encode(src, &mut out)?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_best_form_prefers_cheapest() {
        // Short close match: the 2-byte form wins.
        let r = best_form(5, 100).unwrap();
        assert_eq!(r.cost, 2);
        assert_eq!(r.len, 5);

        // Long close match: the 2-byte form caps at 10, the 4-byte wins.
        let r = best_form(500, 100).unwrap();
        assert_eq!(r.cost, 4);
        assert_eq!(r.len, 500);

        // Far match of length 4 only fits the 3-byte form.
        let r = best_form(4, 0x2000).unwrap();
        assert_eq!(r.cost, 3);

        // Too short for its distance.
        assert!(best_form(3, 0x2000).is_none());
        assert!(best_form(2, 1).is_none());
    }

    #[test]
    fn test_empty_input() {
        let out = encode_to_vec(b"").unwrap();
        assert_eq!(out, [0x10, 0xFB, 0x00, 0x00, 0x00, 0xFC]);
    }

    #[test]
    fn test_short_literals_ride_the_stop_opcode() {
        let out = encode_to_vec(b"hi!").unwrap();
        assert_eq!(out, [0x10, 0xFB, 0x00, 0x00, 0x03, 0xFF, b'h', b'i', b'!']);
    }

    #[test]
    fn test_literal_runs_are_four_aligned() {
        let data: Vec<u8> = (0u8..=229).collect();
        let out = encode_to_vec(&data).unwrap();
        // 230 unmatched bytes: two full 112-byte runs, one 4-byte run, and
        // two bytes on the stop opcode.
        assert_eq!(out[5], 0xE0 | ((112 - 4) >> 2) as u8);
        assert_eq!(out[5 + 113], 0xE0 | ((112 - 4) >> 2) as u8);
        assert_eq!(out[5 + 2 * 113], 0xE0);
        assert_eq!(out[5 + 2 * 113 + 5], 0xFE);
    }
}
