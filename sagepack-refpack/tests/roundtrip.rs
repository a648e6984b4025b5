//! End-to-end round-trip tests for the RefPack codec.

use sagepack_refpack::{decode, decode_to_vec, encode_to_vec, uncompressed_size};
use std::io::Cursor;

fn roundtrip(data: &[u8]) {
    let packed = encode_to_vec(data).unwrap();
    assert_eq!(
        uncompressed_size(&mut Cursor::new(&packed)).unwrap(),
        data.len()
    );
    let unpacked = decode_to_vec(&mut Cursor::new(&packed)).unwrap();
    assert_eq!(unpacked, data, "round-trip mismatch for {} bytes", data.len());
}

fn lcg_bytes(size: usize, mut seed: u64) -> Vec<u8> {
    let mut data = Vec::with_capacity(size);
    for _ in 0..size {
        seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        data.push((seed >> 32) as u8);
    }
    data
}

#[test]
fn test_empty() {
    roundtrip(b"");
}

#[test]
fn test_tiny_inputs() {
    for len in 1..=8 {
        let data: Vec<u8> = b"abcdefgh"[..len].to_vec();
        roundtrip(&data);
    }
}

#[test]
fn test_declared_size_from_raw_header() {
    // Header parsing alone: three-byte big-endian length.
    let header_only = b"\x10\xFB\x00\x00\x03ABC";
    assert_eq!(
        uncompressed_size(&mut Cursor::new(&header_only[..])).unwrap(),
        3
    );
}

#[test]
fn test_simple_text() {
    roundtrip(b"hello world hello world hello world");
}

#[test]
fn test_overlapping_run() {
    // Single-byte runs decode through overlapped copies (disp smaller
    // than length).
    roundtrip(&vec![0x42u8; 10_000]);
}

#[test]
fn test_each_reference_form_is_reachable() {
    // Close short matches: 2-byte form.
    let close: Vec<u8> = (0..600).map(|i| b"pattern!"[i % 8]).collect();
    roundtrip(&close);

    // Matches a few KiB back: 3-byte form.
    let mut mid = lcg_bytes(6000, 3);
    let chunk = mid[100..160].to_vec();
    mid.extend_from_slice(&chunk);
    roundtrip(&mid);

    // Matches far beyond 16 KiB: only the 4-byte form reaches them.
    let mut far = lcg_bytes(40_000, 4);
    let chunk = far[..300].to_vec();
    far.extend_from_slice(&chunk);
    roundtrip(&far);
}

#[test]
fn test_long_literal_stretches() {
    for &size in &[3usize, 4, 111, 112, 113, 115, 116, 500] {
        roundtrip(&lcg_bytes(size, size as u64));
    }
}

#[test]
fn test_large_mixed_input() {
    let mut data = Vec::new();
    for i in 0u32..3000 {
        if i % 3 == 0 {
            data.extend_from_slice(b"a well-worn repeated phrase, ");
        } else {
            data.extend_from_slice(&lcg_bytes(17, i as u64));
        }
    }
    roundtrip(&data);
}

#[test]
fn test_input_above_16_mib_uses_wide_header() {
    // Compressible so the stream stays small.
    let data = vec![0u8; 0x0100_0100];
    let packed = encode_to_vec(&data).unwrap();
    assert_eq!(packed[0], 0x90);
    assert_eq!(packed[1], 0xFB);
    assert_eq!(
        uncompressed_size(&mut Cursor::new(&packed)).unwrap(),
        data.len()
    );
    let unpacked = decode_to_vec(&mut Cursor::new(&packed)).unwrap();
    assert_eq!(unpacked.len(), data.len());
    assert!(unpacked.iter().all(|&b| b == 0));
}

#[test]
fn test_determinism() {
    let data = lcg_bytes(30_000, 99);
    assert_eq!(encode_to_vec(&data).unwrap(), encode_to_vec(&data).unwrap());
}

#[test]
fn test_undersized_destination_rejected() {
    let packed = encode_to_vec(b"twelve bytes").unwrap();
    let mut small = [0u8; 4];
    let err = decode(&mut Cursor::new(&packed), &mut small).unwrap_err();
    assert!(matches!(
        err,
        sagepack_core::SagePackError::OutputOverflow { .. }
    ));
}
