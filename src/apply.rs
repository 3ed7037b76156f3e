//! Module D: the patch applier. Replays the `(a, b, c)` triples of `CB`
//! against `old`, `DB`, and `EB` to reconstruct `new` (spec §4.4).
//!
//! Mirrors the inner loop of `original_source/src/libqbdiff.c`'s
//! `qbdiff_patch`, but every bounds check that the C ancestor only logged to
//! stderr and shrugged off becomes a real `Err` here: a malformed triple
//! must never read or write out of bounds, and never silently truncate.

use zerocopy::FromBytes;

use crate::error::Error;
use crate::primitives::{ControlTriple, TRIPLE_LEN};

/// Reconstruct `new` of length `new_size` from `old` and the three streams
/// produced by [`crate::encode::encode`].
pub(crate) fn apply(
    old: &[u8],
    cb: &[u8],
    db: &[u8],
    eb: &[u8],
    new_size: usize,
) -> Result<Vec<u8>, Error> {
    if cb.len() % TRIPLE_LEN != 0 {
        return Err(Error::trunc("control stream length is not a multiple of 24"));
    }

    let mut new_data = Vec::new();
    new_data
        .try_reserve_exact(new_size)
        .map_err(|_| Error::NoMem)?;

    let mut new_pos: usize = 0;
    let mut old_pos: i64 = 0;
    let mut db_pos: usize = 0;
    let mut eb_pos: usize = 0;

    for chunk in cb.chunks_exact(TRIPLE_LEN) {
        let triple = ControlTriple::read_from_bytes(chunk)
            .expect("chunks_exact(TRIPLE_LEN) always yields a well-sized slice");
        let (a, b, c) = (triple.a.get(), triple.b.get(), triple.c.get());

        if a < 0 || b < 0 {
            return Err(Error::bad_patch("control triple has a negative extent"));
        }

        let a = a as usize;
        let b = b as usize;

        if new_pos + a > new_size {
            return Err(Error::bad_patch("additive run overruns new_size"));
        }
        if db_pos + a > db.len() {
            return Err(Error::trunc("additive data stream ended early"));
        }

        for i in 0..a {
            let old_idx = old_pos + i as i64;
            let old_byte = if old_idx >= 0 && (old_idx as usize) < old.len() {
                old[old_idx as usize]
            } else {
                0
            };
            new_data.push(old_byte.wrapping_add(db[db_pos + i]));
        }
        db_pos += a;
        new_pos += a;
        old_pos += a as i64;

        if new_pos + b > new_size {
            return Err(Error::bad_patch("literal run overruns new_size"));
        }
        if eb_pos + b > eb.len() {
            return Err(Error::trunc("literal data stream ended early"));
        }

        new_data.extend_from_slice(&eb[eb_pos..eb_pos + b]);
        eb_pos += b;
        new_pos += b;

        old_pos += c;
        if old_pos < 0 || old_pos > old.len() as i64 {
            return Err(Error::bad_patch(
                "control triple seeks old position out of bounds",
            ));
        }
    }

    if new_pos != new_size {
        return Err(Error::bad_patch(
            "control stream did not produce exactly new_size bytes",
        ));
    }
    if db_pos != db.len() {
        return Err(Error::bad_patch("additive data stream was not fully consumed"));
    }
    if eb_pos != eb.len() {
        return Err(Error::bad_patch("literal data stream was not fully consumed"));
    }

    Ok(new_data)
}
