//! Static code tables for the LightZhl bitstream.
//!
//! LightZhl transmits symbols through 16 power-of-two-sized Huffman groups
//! that are periodically re-derived from observed frequencies. The tables
//! here are the fixed part of the format: the initial symbol layout both
//! sides start from, and the variable-length codes for match lengths and
//! displacements. All of them are wire format; changing a value breaks
//! compatibility with existing streams.

/// Symbol alphabet size: 256 literals, 16 match codes, two sentinels.
pub const NSYMBOLS: usize = 274;

/// Number of Huffman groups.
pub const NGROUPS: usize = 16;

/// Bits that select a group at the start of every symbol.
pub(crate) const GROUP_SELECT_BITS: u32 = 4;

/// First match-length symbol.
pub(crate) const SYM_MATCH_BASE: usize = 256;

/// Sentinel requesting a model rebuild.
pub(crate) const SYM_REBUILD: usize = 272;

/// End-of-stream sentinel.
pub(crate) const SYM_END: usize = 273;

/// Minimum encodable match length.
pub const MIN_MATCH: usize = 4;

/// Maximum amount a match length may exceed [`MIN_MATCH`].
pub const MAX_MATCH_OVER: usize = 517;

/// Maximum encodable match length.
pub const MAX_MATCH: usize = MIN_MATCH + MAX_MATCH_OVER;

/// Symbols between adaptive regroupings.
pub(crate) const RECALC_INTERVAL: i32 = 4096;

/// Hard ceiling on the code slots a transmitted group layout may claim.
/// A conforming encoder can reach exactly this value, never more.
pub(crate) const MAX_GROUP_SLOTS: usize = NSYMBOLS + 255;

/// Widest group a conforming layout can contain (a single group covering
/// all 274 ranked positions needs nine bits).
pub(crate) const MAX_GROUP_WIDTH: u32 = 9;

/// Group widths both sides start from. Together with
/// [`INITIAL_PERMUTATION`] this fixes the starting code of every symbol.
pub(crate) const INITIAL_GROUP_WIDTHS: [u8; NGROUPS] =
    [2, 3, 3, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 5, 5, 5];

/// Initial ranking of the alphabet (position -> symbol). The head of the
/// table holds the symbols cheapest to emit before any statistics exist:
/// the blank and leading digits common in ANSI text take the 6-bit slots,
/// the 16 match-length symbols take the 7-bit slots, the rest of the
/// low half precedes the high half, and the sentinels rank last.
pub(crate) const INITIAL_PERMUTATION: [u16; NSYMBOLS] = [
    32, 48, 49, 50, 256, 257, 258, 259, 260, 261, 262, 263,
    264, 265, 266, 267, 268, 269, 270, 271, 0, 1, 2, 3,
    4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15,
    16, 17, 18, 19, 20, 21, 22, 23, 24, 25, 26, 27,
    28, 29, 30, 31, 33, 34, 35, 36, 37, 38, 39, 40,
    41, 42, 43, 44, 45, 46, 47, 51, 52, 53, 54, 55,
    56, 57, 58, 59, 60, 61, 62, 63, 64, 65, 66, 67,
    68, 69, 70, 71, 72, 73, 74, 75, 76, 77, 78, 79,
    80, 81, 82, 83, 84, 85, 86, 87, 88, 89, 90, 91,
    92, 93, 94, 95, 96, 97, 98, 99, 100, 101, 102, 103,
    104, 105, 106, 107, 108, 109, 110, 111, 112, 113, 114, 115,
    116, 117, 118, 119, 120, 121, 122, 123, 124, 125, 126, 127,
    128, 129, 130, 131, 132, 133, 134, 135, 136, 137, 138, 139,
    140, 141, 142, 143, 144, 145, 146, 147, 148, 149, 150, 151,
    152, 153, 154, 155, 156, 157, 158, 159, 160, 161, 162, 163,
    164, 165, 166, 167, 168, 169, 170, 171, 172, 173, 174, 175,
    176, 177, 178, 179, 180, 181, 182, 183, 184, 185, 186, 187,
    188, 189, 190, 191, 192, 193, 194, 195, 196, 197, 198, 199,
    200, 201, 202, 203, 204, 205, 206, 207, 208, 209, 210, 211,
    212, 213, 214, 215, 216, 217, 218, 219, 220, 221, 222, 223,
    224, 225, 226, 227, 228, 229, 230, 231, 232, 233, 234, 235,
    236, 237, 238, 239, 240, 241, 242, 243, 244, 245, 246, 247,
    248, 249, 250, 251, 252, 253, 254, 255, 272, 273,
];

/// Encoder-side code of one symbol: `nbits` total bits of `code`
/// (4 group-select bits plus the in-group offset).
#[derive(Debug, Clone, Copy)]
pub(crate) struct SymbolCode {
    pub nbits: u8,
    pub code: u16,
}

/// Initial encoder table: the inverse of [`INITIAL_PERMUTATION`] under the
/// initial group layout, expanded at compile time.
pub(crate) const INITIAL_CODES: [SymbolCode; NSYMBOLS] = build_initial_codes();

const fn build_initial_codes() -> [SymbolCode; NSYMBOLS] {
    let mut table = [SymbolCode { nbits: 0, code: 0 }; NSYMBOLS];
    let mut pos = 0usize;
    let mut group = 0usize;
    while group < NGROUPS {
        let width = INITIAL_GROUP_WIDTHS[group] as usize;
        let count = 1usize << width;
        let mut k = 0usize;
        while k < count {
            if pos + k < NSYMBOLS {
                let symbol = INITIAL_PERMUTATION[pos + k] as usize;
                table[symbol] = SymbolCode {
                    nbits: (width + 4) as u8,
                    code: ((group << width) | k) as u16,
                };
            }
            k += 1;
        }
        pos += count;
        group += 1;
    }
    table
}

/// Encoder entry for a match-over range: emit `symbol`, then `nbits` bits
/// formed from `bits` and the low bits of the range offset.
#[derive(Debug, Clone, Copy)]
pub(crate) struct MatchOverCode {
    pub symbol: u16,
    pub nbits: u8,
    pub bits: u16,
}

/// Match-over 8..=37, indexed by `(over - 8) >> 1`; the emitted value is
/// `bits | ((over - 8) & 1)`.
pub(crate) const MATCH_OVER_MID: [MatchOverCode; 15] = [
    MatchOverCode { symbol: 264, nbits: 1, bits: 0x00 },
    MatchOverCode { symbol: 265, nbits: 2, bits: 0x00 },
    MatchOverCode { symbol: 265, nbits: 2, bits: 0x02 },
    MatchOverCode { symbol: 266, nbits: 3, bits: 0x00 },
    MatchOverCode { symbol: 266, nbits: 3, bits: 0x02 },
    MatchOverCode { symbol: 266, nbits: 3, bits: 0x04 },
    MatchOverCode { symbol: 266, nbits: 3, bits: 0x06 },
    MatchOverCode { symbol: 267, nbits: 4, bits: 0x00 },
    MatchOverCode { symbol: 267, nbits: 4, bits: 0x02 },
    MatchOverCode { symbol: 267, nbits: 4, bits: 0x04 },
    MatchOverCode { symbol: 267, nbits: 4, bits: 0x06 },
    MatchOverCode { symbol: 267, nbits: 4, bits: 0x08 },
    MatchOverCode { symbol: 267, nbits: 4, bits: 0x0A },
    MatchOverCode { symbol: 267, nbits: 4, bits: 0x0C },
    MatchOverCode { symbol: 267, nbits: 4, bits: 0x0E },
];

/// Match-over 38..=517, indexed by `(over - 38) >> 5`; the emitted value is
/// `nbits + 4` bits of `(bits << 4) | ((over - 38) & 0x1F)`.
pub(crate) const MATCH_OVER_HIGH: [MatchOverCode; 15] = [
    MatchOverCode { symbol: 268, nbits: 1, bits: 0x00 },
    MatchOverCode { symbol: 269, nbits: 2, bits: 0x00 },
    MatchOverCode { symbol: 269, nbits: 2, bits: 0x02 },
    MatchOverCode { symbol: 270, nbits: 3, bits: 0x00 },
    MatchOverCode { symbol: 270, nbits: 3, bits: 0x02 },
    MatchOverCode { symbol: 270, nbits: 3, bits: 0x04 },
    MatchOverCode { symbol: 270, nbits: 3, bits: 0x06 },
    MatchOverCode { symbol: 271, nbits: 4, bits: 0x00 },
    MatchOverCode { symbol: 271, nbits: 4, bits: 0x02 },
    MatchOverCode { symbol: 271, nbits: 4, bits: 0x04 },
    MatchOverCode { symbol: 271, nbits: 4, bits: 0x06 },
    MatchOverCode { symbol: 271, nbits: 4, bits: 0x08 },
    MatchOverCode { symbol: 271, nbits: 4, bits: 0x0A },
    MatchOverCode { symbol: 271, nbits: 4, bits: 0x0C },
    MatchOverCode { symbol: 271, nbits: 4, bits: 0x0E },
];

/// Decoder entry for match symbols 264..=271: read `extra_bits` and add
/// `base`.
#[derive(Debug, Clone, Copy)]
pub(crate) struct MatchOverRange {
    pub extra_bits: u8,
    pub base: u16,
}

/// One entry per match symbol 264..=271; the last covers overs up to 517.
pub(crate) const MATCH_OVER_RANGES: [MatchOverRange; 8] = [
    MatchOverRange { extra_bits: 1, base: 8 },
    MatchOverRange { extra_bits: 2, base: 10 },
    MatchOverRange { extra_bits: 3, base: 14 },
    MatchOverRange { extra_bits: 4, base: 22 },
    MatchOverRange { extra_bits: 5, base: 38 },
    MatchOverRange { extra_bits: 6, base: 70 },
    MatchOverRange { extra_bits: 7, base: 134 },
    MatchOverRange { extra_bits: 8, base: 262 },
];

/// Decoder entry for a 3-bit displacement prefix: read `extra_bits + 9`
/// further bits and offset the top seven displacement bits by `base_top`.
#[derive(Debug, Clone, Copy)]
pub(crate) struct DispRange {
    pub extra_bits: u8,
    pub base_top: u8,
}

/// Exponential prefix code over `disp >> 9`; the eight ranges tile 0..128.
pub(crate) const DISP_RANGES: [DispRange; 8] = [
    DispRange { extra_bits: 0, base_top: 0 },
    DispRange { extra_bits: 0, base_top: 1 },
    DispRange { extra_bits: 1, base_top: 2 },
    DispRange { extra_bits: 2, base_top: 4 },
    DispRange { extra_bits: 3, base_top: 8 },
    DispRange { extra_bits: 4, base_top: 16 },
    DispRange { extra_bits: 5, base_top: 32 },
    DispRange { extra_bits: 6, base_top: 64 },
];

/// Encoder entry indexed by the top seven bits of a displacement: emit
/// `nbits + 9` bits of `(bits << 9) | (disp & 0x1FF)`.
#[derive(Debug, Clone, Copy)]
pub(crate) struct DispCode {
    pub nbits: u8,
    pub bits: u16,
}

/// Inverse of [`DISP_RANGES`], expanded at compile time.
pub(crate) const DISP_CODES: [DispCode; 128] = build_disp_codes();

const fn build_disp_codes() -> [DispCode; 128] {
    let mut table = [DispCode { nbits: 0, bits: 0 }; 128];
    let mut prefix = 0usize;
    while prefix < 8 {
        let range = DISP_RANGES[prefix];
        let count = 1usize << range.extra_bits;
        let mut k = 0usize;
        while k < count {
            table[range.base_top as usize + k] = DispCode {
                nbits: 3 + range.extra_bits,
                bits: ((prefix as u16) << range.extra_bits) | k as u16,
            };
            k += 1;
        }
        prefix += 1;
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_permutation_is_a_permutation() {
        let mut seen = [false; NSYMBOLS];
        for &symbol in &INITIAL_PERMUTATION {
            assert!(!seen[symbol as usize]);
            seen[symbol as usize] = true;
        }
    }

    #[test]
    fn test_initial_layout_tiles_alphabet() {
        let slots: usize = INITIAL_GROUP_WIDTHS.iter().map(|&w| 1usize << w).sum();
        assert!(slots >= NSYMBOLS);
        assert!(slots <= MAX_GROUP_SLOTS);

        let bases: Vec<usize> = INITIAL_GROUP_WIDTHS
            .iter()
            .scan(0usize, |pos, &w| {
                let base = *pos;
                *pos += 1 << w;
                Some(base)
            })
            .collect();
        assert_eq!(
            bases,
            [0, 4, 12, 20, 36, 52, 68, 84, 100, 116, 132, 148, 164, 180, 212, 244]
        );
    }

    #[test]
    fn test_initial_codes_invert_permutation() {
        let mut pos = 0usize;
        for (group, &width) in INITIAL_GROUP_WIDTHS.iter().enumerate() {
            let count = 1usize << width;
            for k in 0..count.min(NSYMBOLS.saturating_sub(pos)) {
                let symbol = INITIAL_PERMUTATION[pos + k] as usize;
                let code = INITIAL_CODES[symbol];
                assert_eq!(code.nbits, width + 4);
                assert_eq!(code.code >> width, group as u16);
                assert_eq!(code.code & ((1 << width) - 1), k as u16);
            }
            pos += count;
        }
    }

    #[test]
    fn test_match_over_tables_agree() {
        for over in 0..=MAX_MATCH_OVER {
            let (symbol, extra_nbits, extra) = if over < 8 {
                ((SYM_MATCH_BASE + over) as u16, 0u32, 0u32)
            } else if over < 38 {
                let x = (over - 8) as u32;
                let e = MATCH_OVER_MID[(x >> 1) as usize];
                (e.symbol, e.nbits as u32, e.bits as u32 | (x & 1))
            } else {
                let x = (over - 38) as u32;
                let e = MATCH_OVER_HIGH[(x >> 5) as usize];
                (e.symbol, e.nbits as u32 + 4, ((e.bits as u32) << 4) | (x & 0x1F))
            };
            assert!(extra < (1 << extra_nbits.max(1)));

            // Replay the decoder's interpretation.
            let decoded = if (symbol as usize) < SYM_MATCH_BASE + 8 {
                symbol as usize - SYM_MATCH_BASE
            } else {
                let r = MATCH_OVER_RANGES[symbol as usize - (SYM_MATCH_BASE + 8)];
                assert_eq!(extra_nbits, r.extra_bits as u32);
                r.base as usize + extra as usize
            };
            assert_eq!(decoded, over);
        }
    }

    #[test]
    fn test_disp_ranges_tile_top_bits() {
        let slots: usize = DISP_RANGES.iter().map(|r| 1usize << r.extra_bits).sum();
        assert_eq!(slots, 128);
    }

    #[test]
    fn test_disp_codes_invert_ranges() {
        for disp in (0u32..65536).step_by(97) {
            let code = DISP_CODES[(disp >> 9) as usize];
            // Split the emitted bits back into prefix and extension.
            let extra_bits = code.nbits as u32 - 3;
            let prefix = (code.bits as u32) >> extra_bits;
            let ext = (code.bits as u32) & ((1 << extra_bits) - 1);
            let range = DISP_RANGES[prefix as usize];
            assert_eq!(range.extra_bits as u32, extra_bits);
            let decoded = (((range.base_top as u32) + ext) << 9) | (disp & 0x1FF);
            assert_eq!(decoded, disp);
        }
    }
}
