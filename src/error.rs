//! Error taxonomy (spec §4.6, §7): `OK, NOMEM, IOERR, TRUNCPATCH, BADPATCH,
//! BADCKSUM, LZMAERR, SAIS`. `Error` is what the library returns; `ErrorKind`
//! is the flat classification the C ancestor exposed as `QBERR_*` constants,
//! kept here so callers that want to match on "which of the seven kinds" can
//! do so without matching on message payloads.

use thiserror::Error as ThisError;

type Str = Box<str>;

/// Errors a `compute`/`apply` call can return.
#[derive(ThisError, Debug)]
pub enum Error {
    /// A buffer allocation could not be satisfied.
    #[error("allocation failed")]
    NoMem,

    /// The sink refused a write, or a source read failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// The patch is too short for its headers, or declares negative/
    /// inconsistent stream lengths.
    #[error("patch is truncated: {0}")]
    TruncPatch(Str),

    /// A control triple violates its bounds, or a stream cursor did not
    /// land exactly on end-of-stream after replay.
    #[error("patch is malformed: {0}")]
    BadPatch(Str),

    /// The reconstructed `new` does not hash to the embedded checksum.
    #[error("checksum mismatch: reconstructed output does not match the embedded digest")]
    BadCksum,

    /// The LZMA-family codec failed to compress or decompress a stream.
    #[error("lzma codec error: {0}")]
    Lzma(Str),

    /// Suffix-array construction failed.
    #[error("suffix array construction failed")]
    Sais,
}

impl Error {
    pub(crate) fn trunc(msg: impl Into<Str>) -> Self {
        Error::TruncPatch(msg.into())
    }

    pub(crate) fn bad_patch(msg: impl Into<Str>) -> Self {
        Error::BadPatch(msg.into())
    }

    pub(crate) fn lzma(msg: impl Into<Str>) -> Self {
        Error::Lzma(msg.into())
    }

    /// Classify this error into the flat `QBERR_*`-style taxonomy.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::NoMem => ErrorKind::NoMem,
            Error::Io(_) => ErrorKind::IoErr,
            Error::TruncPatch(_) => ErrorKind::TruncPatch,
            Error::BadPatch(_) => ErrorKind::BadPatch,
            Error::BadCksum => ErrorKind::BadCksum,
            Error::Lzma(_) => ErrorKind::LzmaErr,
            Error::Sais => ErrorKind::Sais,
        }
    }
}

/// The flat error classification from spec §4.6 (`QBERR_*` in the C
/// ancestor). `Ok` has no corresponding `Error` variant; it exists only so
/// `error_message` can describe success too.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Ok,
    NoMem,
    IoErr,
    TruncPatch,
    BadPatch,
    BadCksum,
    LzmaErr,
    Sais,
}

/// Human-readable message for an `ErrorKind`, per the `error_message(code)`
/// entry of the library surface (spec §6).
pub fn error_message(kind: ErrorKind) -> &'static str {
    match kind {
        ErrorKind::Ok => "success",
        ErrorKind::NoMem => "allocation failed",
        ErrorKind::IoErr => "i/o error",
        ErrorKind::TruncPatch => "patch is truncated",
        ErrorKind::BadPatch => "patch is malformed",
        ErrorKind::BadCksum => "checksum mismatch against embedded digest",
        ErrorKind::LzmaErr => "lzma codec error",
        ErrorKind::Sais => "suffix array construction failed",
    }
}
