//! Frame-level integration tests across all carried codecs.

use sagepack_container::{CodecTag, compress, declared_len, decompress};

fn lcg_bytes(size: usize, mut seed: u64) -> Vec<u8> {
    let mut data = Vec::with_capacity(size);
    for _ in 0..size {
        seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        data.push((seed >> 32) as u8);
    }
    data
}

#[test]
fn test_codec_matrix() {
    let inputs: Vec<Vec<u8>> = vec![
        Vec::new(),
        b"x".to_vec(),
        b"hello world".to_vec(),
        b"abcabcabcabcabcabc".repeat(100),
        lcg_bytes(10_000, 7),
        {
            let mut mixed = lcg_bytes(5_000, 11);
            mixed.extend_from_slice(&mixed.clone()[..2_500]);
            mixed
        },
    ];

    for data in &inputs {
        for tag in [
            CodecTag::RefPack,
            CodecTag::LightZhl,
            CodecTag::Zlib(1),
            CodecTag::Zlib(6),
            CodecTag::Zlib(9),
        ] {
            let framed = compress(data, tag).unwrap();
            assert_eq!(&framed[..4], &tag.magic());
            assert_eq!(declared_len(&framed), Some(data.len()));
            assert_eq!(
                decompress(&framed).unwrap(),
                *data,
                "codec {tag} failed on {} bytes",
                data.len()
            );
        }
    }
}

#[test]
fn test_hello_world_refpack_frame_layout() {
    let framed = compress(b"hello world", CodecTag::RefPack).unwrap();
    assert_eq!(&framed[..4], b"EAR\0");
    // Little-endian length field.
    assert_eq!(framed[4..8], [11, 0, 0, 0]);
    // The payload itself opens with the RefPack magic.
    assert_eq!(framed[8..10], [0x10, 0xFB]);
    assert_eq!(decompress(&framed).unwrap(), b"hello world");
}

#[test]
fn test_uncompressed_passthrough_roundtrip() {
    // Anything without a known tag comes back verbatim, byte for byte.
    let raw = lcg_bytes(1000, 23);
    assert_eq!(decompress(&raw).unwrap(), raw);
}

#[test]
fn test_corrupt_payload_is_an_error_not_a_panic() {
    let mut framed = compress(&lcg_bytes(4_000, 3), CodecTag::LightZhl).unwrap();
    let mid = framed.len() / 2;
    for i in mid..framed.len().min(mid + 32) {
        framed[i] ^= 0x5A;
    }
    // Corruption may or may not be detectable, but it must come back as a
    // clean Result either way.
    let _ = decompress(&framed);
}
