//! Module F: BLAKE2b-512 checksumming and the on-disk wire types for the
//! i64 fields everything else in the crate treats as black boxes per spec
//! §1. The control triple is laid out with `zerocopy`, the same crate
//! `djugei-ddelta-rs`'s `diff.rs`/`patch.rs` use for `EntryHeader`/
//! `PatchHeader`, so a triple's bytes can be read and written without any
//! hand-rolled `to_be_bytes`/`from_be_bytes` shuffling.

use blake2::{Blake2b512, Digest};
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout, I64};

/// Width of the embedded checksum (BLAKE2b-512 digest).
pub const CHECKSUM_LEN: usize = 64;

/// Size in bytes of one on-disk `(a, b, c)` control triple (spec §3).
pub const TRIPLE_LEN: usize = 24;

/// BLAKE2b-512 over `data`, keyless, single-shot.
pub fn checksum(data: &[u8]) -> [u8; CHECKSUM_LEN] {
    let mut hasher = Blake2b512::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// One `CB` control record: big-endian `(a, b, c)` as laid out on disk
/// (spec §3). `FromBytes`/`IntoBytes` give `CB`'s reader and writer a
/// zero-copy cast to and from the wire bytes instead of a manual
/// field-by-field big-endian encode/decode.
#[derive(Clone, Copy, FromBytes, IntoBytes, KnownLayout, Immutable)]
#[repr(C)]
pub struct ControlTriple {
    pub a: I64,
    pub b: I64,
    pub c: I64,
}

impl ControlTriple {
    pub fn new(a: i64, b: i64, c: i64) -> Self {
        ControlTriple {
            a: I64::new(a),
            b: I64::new(b),
            c: I64::new(c),
        }
    }
}
