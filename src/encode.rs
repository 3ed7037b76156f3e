//! Module C: the matcher/encoder. Walks `new` left to right against the
//! suffix array of `old`, committing a three-tuple `(a, b, c)` into `CB` plus
//! the matching bytes of `DB`/`EB` each time the approximate match search
//! stops explaining `new` better than just continuing the previous
//! alignment (spec §4.3).
//!
//! This is a direct, width-generic port of the outer/inner loop in
//! `original_source/src/libqbdiff.c`'s `qbdiff_compute`, which is what
//! spec §4.3 was distilled from; the `djugei-ddelta-rs` teacher's `diff.rs`
//! follows the same two-loop shape (it is itself a port of the same
//! bsdiff lineage) and is the idiom this module's control flow borrows,
//! down to pushing `DB` bytes one at a time through `byteorder`'s
//! `WriteBytesExt::write_u8`.

use byteorder::WriteBytesExt;
use zerocopy::IntoBytes;

use crate::error::Error;
use crate::primitives::ControlTriple;
use crate::search;
use crate::suffix::SuffixArray;

/// The fixed "is this drift still good enough" slack from spec §4.3 step 3.
const FUZZ_THRESHOLD: i64 = 8;

/// The three uncompressed streams produced by the matcher (spec §3).
pub struct EncodedStreams {
    /// Big-endian `(a, b, c)` triples, 24 bytes each.
    pub cb: Vec<u8>,
    /// `new[p] - old[q]` bytes for each triple's additive run.
    pub db: Vec<u8>,
    /// Literal bytes of `new` for each triple's extra run.
    pub eb: Vec<u8>,
}

impl EncodedStreams {
    fn with_capacity(new_len: usize) -> Result<Self, Error> {
        // Matches the memory budget in spec §5: each stream transiently
        // reserves roughly `|new| + |new|/50 + 5` bytes.
        let reserve = new_len + new_len / 50 + 5;
        let mut cb = Vec::new();
        let mut db = Vec::new();
        let mut eb = Vec::new();
        cb.try_reserve(reserve).map_err(|_| Error::NoMem)?;
        db.try_reserve(reserve).map_err(|_| Error::NoMem)?;
        eb.try_reserve(reserve).map_err(|_| Error::NoMem)?;
        Ok(EncodedStreams { cb, db, eb })
    }
}

/// Encode `new` against `old` into the three-stream representation of spec
/// §4.3. Requires `old` non-empty; the empty-`old` case is a container-level
/// concern (§4.5) handled above this module.
pub fn encode(old: &[u8], new: &[u8]) -> Result<EncodedStreams, Error> {
    debug_assert!(!old.is_empty(), "encode() requires a non-empty `old`");

    log::debug!(
        "encode: building suffix array over {} bytes of old",
        old.len()
    );
    let sa = SuffixArray::build(old)?;

    let old_len = old.len() as i64;
    let new_len = new.len() as i64;

    let mut streams = EncodedStreams::with_capacity(new.len())?;

    let mut new_pos: i64 = 0;
    let mut old_pos: i64 = 0;
    let mut match_len: i64 = 0;
    let mut last_new_pos: i64 = 0;
    let mut last_old_pos: i64 = 0;
    let mut last_offset: i64 = 0;

    while new_pos < new_len {
        let mut old_score: i64 = 0;
        new_pos += match_len;
        let mut new_peek = new_pos;

        while new_pos < new_len {
            let (pos, len) = search::longest_match(&sa, old, &new[new_pos as usize..]);
            old_pos = pos;
            match_len = len;

            while new_peek < new_pos + match_len {
                if aligned_match(old, new, new_peek, last_offset, old_len) {
                    old_score += 1;
                }
                new_peek += 1;
            }

            if (match_len == old_score && match_len != 0) || match_len > old_score + FUZZ_THRESHOLD
            {
                break;
            }

            if aligned_match(old, new, new_pos, last_offset, old_len) {
                old_score -= 1;
            }

            new_pos += 1;
        }

        if match_len != old_score || new_pos == new_len {
            let back = commit_triple(
                old,
                new,
                last_new_pos,
                last_old_pos,
                new_pos,
                old_pos,
                &mut streams,
            )?;

            last_new_pos = new_pos - back;
            last_old_pos = old_pos - back;
            last_offset = old_pos - new_pos;
        }
    }

    log::debug!(
        "encode: cb={} db={} eb={} bytes",
        streams.cb.len(),
        streams.db.len(),
        streams.eb.len()
    );

    Ok(streams)
}

/// Whether `new[i]` agrees with `old` under the alignment implied by the
/// previous commit (`old[i + last_offset]`). Positions outside `old` never
/// count as aligned (spec §4.3 step 2).
#[inline]
fn aligned_match(old: &[u8], new: &[u8], i: i64, last_offset: i64, old_len: i64) -> bool {
    let old_idx = i + last_offset;
    old_idx >= 0 && old_idx < old_len && old[old_idx as usize] == new[i as usize]
}

/// Compute the forward/backward fuzzy extensions and overlap resolution of
/// spec §4.3 step 4, emit the triple plus `DB`/`EB` bytes, and return `back`
/// so the caller can slide `last_new_pos`/`last_old_pos`.
#[allow(clippy::too_many_arguments)]
fn commit_triple(
    old: &[u8],
    new: &[u8],
    last_new_pos: i64,
    last_old_pos: i64,
    new_pos: i64,
    old_pos: i64,
    streams: &mut EncodedStreams,
) -> Result<i64, Error> {
    let old_len = old.len() as i64;
    let new_len = new.len() as i64;

    // Forward fuzzy extension: maximize 2*matches - length from
    // (last_new_pos, last_old_pos).
    let mut bytes = 0i64;
    let mut best = 0i64;
    let mut fwd = 0i64;
    let mut i = 0i64;
    while last_new_pos + i < new_pos && last_old_pos + i < old_len {
        if old[(last_old_pos + i) as usize] == new[(last_new_pos + i) as usize] {
            bytes += 1;
        }
        i += 1;
        if bytes * 2 - i > best * 2 - fwd {
            best = bytes;
            fwd = i;
        }
    }

    // Backward fuzzy extension from (new_pos, old_pos).
    let mut back = 0i64;
    if new_pos < new_len {
        bytes = 0;
        best = 0;
        let mut i = 1i64;
        while new_pos >= last_new_pos + i && old_pos >= i {
            if old[(old_pos - i) as usize] == new[(new_pos - i) as usize] {
                bytes += 1;
            }
            if bytes * 2 - i > best * 2 - back {
                best = bytes;
                back = i;
            }
            i += 1;
        }
    }

    // Overlap resolution (spec §4.3 step 4, last bullet).
    if last_new_pos + fwd > new_pos - back {
        let overlap = (last_new_pos + fwd) - (new_pos - back);
        let mut bytes = 0i64;
        let mut best = 0i64;
        let mut shift = 0i64;
        for i in 0..overlap {
            if new[(last_new_pos + fwd - overlap + i) as usize]
                == old[(last_old_pos + fwd - overlap + i) as usize]
            {
                bytes += 1;
            }
            if new[(new_pos - back + i) as usize] == old[(old_pos - back + i) as usize] {
                bytes -= 1;
            }
            if bytes > best {
                best = bytes;
                shift = i + 1;
            }
        }
        fwd += shift - overlap;
        back -= shift;
    }

    if fwd < 0 || (new_pos - back) - (last_new_pos + fwd) < 0 {
        return Err(Error::bad_patch(
            "invalid state while matching: fuzzy extents overlapped inconsistently",
        ));
    }

    for i in 0..fwd {
        streams
            .db
            .write_u8(new[(last_new_pos + i) as usize].wrapping_sub(old[(last_old_pos + i) as usize]))
            .expect("writes to a Vec<u8> never fail");
    }

    let extra_len = (new_pos - back) - (last_new_pos + fwd);
    if extra_len > 0 {
        let start = (last_new_pos + fwd) as usize;
        let end = (new_pos - back) as usize;
        streams.eb.extend_from_slice(&new[start..end]);
    }

    let a = fwd;
    let b = extra_len;
    let c = (old_pos - back) - (last_old_pos + fwd);

    streams.cb.extend_from_slice(ControlTriple::new(a, b, c).as_bytes());

    Ok(back)
}
