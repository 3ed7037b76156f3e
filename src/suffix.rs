//! Module A: the suffix indexer. `SuffixArray::build(old)` produces a total
//! lexicographic ordering `I` of `old`'s suffixes, length `|old|` (spec §3).
//!
//! Width policy (spec §4.1): below `2^31 - 8` entries we delegate to the
//! `divsufsort` crate (the same dependency `djugei-ddelta-rs` uses), which
//! only hands back `i32` indices; that ceiling is exactly where the C
//! ancestor's `libsais`/`libsais64` split lives too (see
//! `original_source/include/libsais.h` vs `libsais64.h`). Above it there is
//! no off-the-shelf `i64` suffix-array crate in this dependency stack, so we
//! fall back to a self-contained prefix-doubling construction. Both branches
//! are exposed through the same `SuffixArray` type and the same `get`/`len`
//! accessors, so §4.2's search is written once, generically, per the
//! redesign note in spec §9.

use crate::error::Error;

/// `|old|` below which a 32-bit suffix array is used. Matches the C
/// ancestor's `int32_t` suffix-array ceiling.
const NARROW_LIMIT: usize = (1u64 << 31) as usize - 8;

/// A suffix array over some `old` buffer, stored at whichever integer width
/// fits, per spec §3's width-bifurcation invariant.
pub enum SuffixArray {
    Narrow(Vec<i32>),
    Wide(Vec<i64>),
}

impl SuffixArray {
    /// Build a total lexicographic ordering of `old`'s suffixes.
    pub fn build(old: &[u8]) -> Result<Self, Error> {
        if old.len() < NARROW_LIMIT {
            let mut sa = Vec::new();
            sa.try_reserve_exact(old.len())
                .map_err(|_| Error::NoMem)?;
            sa.resize(old.len(), 0i32);
            divsufsort::sort_in_place(old, &mut sa);
            Ok(SuffixArray::Narrow(sa))
        } else {
            build_wide(old).map(SuffixArray::Wide)
        }
    }

    /// Number of entries (equals `old.len()`).
    pub fn len(&self) -> usize {
        match self {
            SuffixArray::Narrow(v) => v.len(),
            SuffixArray::Wide(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The starting position in `old` of the `i`-th suffix in sorted order.
    pub fn get(&self, i: usize) -> i64 {
        match self {
            SuffixArray::Narrow(v) => v[i] as i64,
            SuffixArray::Wide(v) => v[i],
        }
    }
}

/// Prefix-doubling suffix array construction for `old.len() >= NARROW_LIMIT`.
/// Not linear-time (spec §1 treats the suffix-array algorithm itself as an
/// out-of-scope black box; only the `build(old) -> I` contract matters), but
/// deterministic and correct, which is all the contract in spec §4.1
/// requires.
fn build_wide(old: &[u8]) -> Result<Vec<i64>, Error> {
    let n = old.len();
    let mut sa: Vec<i64> = Vec::new();
    sa.try_reserve_exact(n).map_err(|_| Error::NoMem)?;
    sa.extend(0..n as i64);

    let mut rank: Vec<i64> = Vec::new();
    rank.try_reserve_exact(n).map_err(|_| Error::NoMem)?;
    rank.extend(old.iter().map(|&b| b as i64));

    let mut tmp: Vec<i64> = Vec::new();
    tmp.try_reserve_exact(n).map_err(|_| Error::NoMem)?;
    tmp.resize(n, 0);

    let mut k = 1usize;
    while k < n {
        let key = |i: i64, rank: &[i64]| -> (i64, i64) {
            let r1 = rank[i as usize];
            let r2 = if (i as usize + k) < n {
                rank[i as usize + k]
            } else {
                -1
            };
            (r1, r2)
        };

        sa.sort_unstable_by(|&a, &b| key(a, &rank).cmp(&key(b, &rank)));

        tmp[sa[0] as usize] = 0;
        for idx in 1..n {
            let bump = if key(sa[idx - 1], &rank) < key(sa[idx], &rank) {
                1
            } else {
                0
            };
            tmp[sa[idx] as usize] = tmp[sa[idx - 1] as usize] + bump;
        }
        rank.copy_from_slice(&tmp);

        if rank[sa[n - 1] as usize] as usize == n - 1 {
            break;
        }
        k = k.saturating_mul(2);
    }

    Ok(sa)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn naive_suffix_array(s: &[u8]) -> Vec<i32> {
        let mut idx: Vec<i32> = (0..s.len() as i32).collect();
        idx.sort_by(|&a, &b| s[a as usize..].cmp(&s[b as usize..]));
        idx
    }

    #[test]
    fn narrow_path_matches_naive_ordering() {
        let s = b"banana bandana";
        let sa = SuffixArray::build(s).unwrap();
        let expected = naive_suffix_array(s);
        assert_eq!(sa.len(), expected.len());
        for i in 0..expected.len() {
            assert_eq!(sa.get(i), expected[i] as i64);
        }
    }

    #[test]
    fn empty_old_yields_empty_array() {
        let sa = SuffixArray::build(b"").unwrap();
        assert_eq!(sa.len(), 0);
        assert!(sa.is_empty());
    }

    #[test]
    fn build_wide_matches_naive_ordering_on_small_input() {
        let s = b"mississippi river mississippi";
        let wide = build_wide(s).unwrap();
        let expected = naive_suffix_array(s);
        assert_eq!(wide.len(), expected.len());
        for i in 0..expected.len() {
            assert_eq!(wide[i], expected[i] as i64);
        }
    }

    #[test]
    fn single_byte_input() {
        let sa = SuffixArray::build(b"x").unwrap();
        assert_eq!(sa.len(), 1);
        assert_eq!(sa.get(0), 0);
    }
}
