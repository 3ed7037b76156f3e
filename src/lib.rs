//! A bsdiff-family binary delta encoder and decoder: suffix-array matching,
//! a three-stream (control/diff/extra) encoding, LZMA-family stream
//! compression, and a BLAKE2b-512 checksum embedded in every patch so
//! `apply` never has to trust its input.
//!
//! ```no_run
//! # fn run() -> Result<(), qbdelta::Error> {
//! let old = std::fs::read("old.bin")?;
//! let new = std::fs::read("new.bin")?;
//!
//! let mut patch = Vec::new();
//! qbdelta::compute(&old, &new, &mut patch)?;
//!
//! let mut reconstructed = Vec::new();
//! qbdelta::apply(&old, &patch, &mut reconstructed)?;
//! assert_eq!(reconstructed, new);
//! # Ok(())
//! # }
//! ```

mod apply;
mod container;
mod encode;
mod error;
mod primitives;
mod search;
mod suffix;

use std::io::Write;

pub use error::{error_message, Error, ErrorKind};

/// Compute a patch transforming `old` into `new`, writing the framed,
/// compressed, checksummed patch to `sink`.
pub fn compute<W: Write>(old: &[u8], new: &[u8], sink: &mut W) -> Result<(), Error> {
    container::compute(old, new, sink)
}

/// Apply a patch previously produced by [`compute`] to `old`, writing the
/// reconstructed data to `sink` only after its BLAKE2b-512 checksum has been
/// verified against the one embedded in the patch.
pub fn apply<W: Write>(old: &[u8], patch: &[u8], sink: &mut W) -> Result<(), Error> {
    container::apply(old, patch, sink)
}

/// The crate's version, as recorded in `Cargo.toml`.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_api_round_trips() {
        let old = b"the quick brown fox jumps over the lazy dog".to_vec();
        let new = b"the quick brown fox leaps over the lazy dogs".to_vec();

        let mut patch = Vec::new();
        compute(&old, &new, &mut patch).unwrap();

        let mut out = Vec::new();
        apply(&old, &patch, &mut out).unwrap();
        assert_eq!(out, new);
    }

    #[test]
    fn version_is_nonempty() {
        assert!(!version().is_empty());
    }
}
