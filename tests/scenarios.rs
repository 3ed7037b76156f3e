//! The concrete end-to-end scenarios of spec §8 (S1-S6), checked against the
//! public `compute`/`apply` surface plus the raw container bytes (no access
//! to internal framing types needed: the header layout is part of the
//! external contract, spec §6).

use rand::{Rng, SeedableRng};
use rand::rngs::StdRng;

fn compute(old: &[u8], new: &[u8]) -> Vec<u8> {
    let mut patch = Vec::new();
    qbdelta::compute(old, new, &mut patch).unwrap();
    patch
}

fn apply(old: &[u8], patch: &[u8]) -> Result<Vec<u8>, qbdelta::Error> {
    let mut out = Vec::new();
    qbdelta::apply(old, patch, &mut out)?;
    Ok(out)
}

fn read_i64_be(buf: &[u8]) -> i64 {
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&buf[..8]);
    i64::from_be_bytes(bytes)
}

#[test]
fn s1_one_byte_capitalization_change() {
    let old = b"Hello, world!".to_vec();
    let new = b"Hello, World!".to_vec();
    let patch = compute(&old, &new);
    assert_eq!(apply(&old, &patch).unwrap(), new);
}

#[test]
fn s2_identical_1024_zero_buffers_round_trip() {
    let old = vec![0u8; 1024];
    let new = vec![0u8; 1024];
    let patch = compute(&old, &new);
    assert_eq!(apply(&old, &patch).unwrap(), new);
}

#[test]
fn s3_empty_old_uses_full_container_with_correct_new_size_field() {
    let new = b"abcdef".to_vec();
    let patch = compute(b"", &new);

    assert_eq!(&patch[0..5], b"QBDF1");
    let new_size = read_i64_be(&patch[69..77]);
    assert_eq!(new_size, 6);

    assert_eq!(apply(b"", &patch).unwrap(), b"abcdef".to_vec());
}

#[test]
fn s4_seeded_65536_byte_buffer_with_a_100_byte_overwrite_round_trips() {
    let mut rng = StdRng::seed_from_u64(0x51_42_44_31);
    let mut old = vec![0u8; 65536];
    rng.fill(&mut old[..]);

    let mut new = old.clone();
    for b in &mut new[30000..30100] {
        *b = 0x5a;
    }

    let patch = compute(&old, &new);
    assert_eq!(apply(&old, &patch).unwrap(), new);
}

#[test]
fn s5_zeroing_the_embedded_checksum_is_caught_as_bad_checksum() {
    let mut rng = StdRng::seed_from_u64(0x51_42_44_32);
    let mut old = vec![0u8; 65536];
    rng.fill(&mut old[..]);
    let mut new = old.clone();
    for b in &mut new[30000..30100] {
        *b = 0x5a;
    }

    let mut patch = compute(&old, &new);
    for b in &mut patch[5..69] {
        *b = 0;
    }

    let err = apply(&old, &patch).unwrap_err();
    assert!(matches!(err, qbdelta::Error::BadCksum));
}

#[test]
fn s6_truncating_a_big_patch_to_132_bytes_is_truncpatch() {
    let old = b"the quick brown fox jumps over the lazy dog".repeat(8);
    let mut new = old.clone();
    new[10] = b'X';
    let patch = compute(&old, &new);
    assert_eq!(&patch[0..5], b"QBDB1", "expected a BIG container for this input");

    let truncated = &patch[..132];
    let err = apply(&old, truncated).unwrap_err();
    assert!(matches!(err, qbdelta::Error::TruncPatch(_)));
}
