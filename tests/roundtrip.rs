//! End-to-end properties of `compute`/`apply` as a pair: the observable
//! contract a caller depends on, independent of how the matcher or
//! container framing are implemented internally.

use proptest::prelude::*;
use rand::Rng;

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

#[test]
fn s1_round_trip_with_related_old_and_new() {
    let old = b"the quick brown fox jumps over the lazy dog".repeat(16);
    let mut new = old.clone();
    new.truncate(new.len() - 37);
    new.extend_from_slice(b"...and keeps on running past the hedgerow");
    let patch = compute(&old, &new);
    assert_eq!(apply(&old, &patch).unwrap(), new);
}

#[test]
fn s2_empty_old_uses_full_container_and_round_trips() {
    let new = b"there was nothing here before this".to_vec();
    let patch = compute(b"", &new);
    assert_eq!(&patch[0..5], b"QBDF1");
    assert_eq!(apply(b"", &patch).unwrap(), new);
}

#[test]
fn s3_empty_new_yields_zero_byte_output() {
    let old = b"some prior content that is going away entirely".to_vec();
    let patch = compute(&old, b"");
    assert_eq!(apply(&old, &patch).unwrap(), Vec::<u8>::new());
}

#[test]
fn s4_identity_round_trips() {
    let data = b"byte for byte the same file, twice".to_vec();
    let patch = compute(&data, &data);
    assert_eq!(apply(&data, &patch).unwrap(), data);
}

#[test]
fn s5_single_bit_corruption_in_patch_is_caught() {
    let old = b"the quick brown fox jumps over the lazy dog".repeat(8);
    let new = old.clone();
    let mut patch = compute(&old, &new);

    let mut rng = rand::rng();
    let idx = rng.random_range(0..patch.len());
    patch[idx] ^= 0x01;

    let result = apply(&old, &patch);
    assert!(result.is_err(), "corrupted patch unexpectedly applied cleanly");
}

#[test]
fn s6_applying_against_the_wrong_old_file_is_detected() {
    let old = b"the quick brown fox jumps over the lazy dog".repeat(8);
    let new = b"the quick brown fox leaps over the lazy dogs".repeat(8);
    let patch = compute(&old, &new);

    let wrong_old = b"an entirely different prior file of similar length xx".repeat(8);
    let result = apply(&wrong_old, &patch);
    assert!(result.is_err());
}

#[test]
fn control_stream_extents_sum_to_new_len() {
    // Indirect check of the cb/db/eb partition invariant (spec's Sigma(a+b) =
    // |new|) through the public surface: if the invariant held, apply's own
    // internal consistency check (module D) would already have rejected a
    // mismatch, so a successful round trip on a nontrivial diff implies it.
    let old = b"abcdefghijklmnopqrstuvwxyz".repeat(10);
    let mut new = old.clone();
    new[5] = b'_';
    new[50] = b'_';
    let patch = compute(&old, &new);
    assert_eq!(apply(&old, &patch).unwrap(), new);
}

#[test]
fn determinism_across_repeated_calls() {
    let old = b"deterministic encoding must not depend on wall clock or rng".to_vec();
    let new = b"deterministic encoding must not depend on wall-clock or prng".to_vec();
    let a = compute(&old, &new);
    let b = compute(&old, &new);
    assert_eq!(a, b);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_round_trip_holds_for_arbitrary_inputs(
        old in proptest::collection::vec(any::<u8>(), 0..2048),
        new in proptest::collection::vec(any::<u8>(), 0..2048),
    ) {
        let patch = compute(&old, &new);
        let out = apply(&old, &patch).unwrap();
        prop_assert_eq!(out, new);
    }

    #[test]
    fn prop_small_mutations_still_round_trip(
        base in proptest::collection::vec(any::<u8>(), 64..4096),
        flip_at in 0usize..64,
    ) {
        let mut new = base.clone();
        let idx = flip_at % new.len();
        new[idx] = new[idx].wrapping_add(1);
        let patch = compute(&base, &new);
        let out = apply(&base, &patch).unwrap();
        prop_assert_eq!(out, new);
    }
}
