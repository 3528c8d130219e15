//! Error types for the `bbhash` crate

use std::collections::TryReserveError;
use std::io;
use bincode::error::{DecodeError,EncodeError};

/// Message attached to a [`DecodeError`] when the magic number is wrong.
pub(crate) const BAD_MAGIC : &str = "bad magic";

/// Errors from building, saving or loading an MPHF
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The construction gamma was zero, negative or not finite.
    #[error("gamma must be positive and finite, got {0}")]
    InvalidGamma(f64),

    /// Construction placed fewer keys than expected and gave up.
    ///
    /// With unique keys and a sensible gamma this is astronomically
    /// unlikely; it usually means the input contained duplicates.
    #[error("construction did not converge within {0} levels (duplicate keys?)")]
    TooManyLevels(usize),

    /// A level's bit vector could not be allocated.
    #[error("allocation failed: {0}")]
    Allocation(#[from] TryReserveError),

    /// The input does not start with the expected magic number.
    #[error("not a BBHash file (bad magic)")]
    BadMagic,

    /// The input ended before the structure was complete.
    #[error("BBHash file is truncated")]
    Truncated,

    /// The input was read completely but describes an impossible structure.
    #[error("BBHash file is corrupt: {0}")]
    Corrupt(&'static str),

    /// Reading or writing the underlying file failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The serializer failed for a reason other than I/O.
    #[error("encoding failed: {0}")]
    Encode(String),
}

impl From<DecodeError> for Error {
    fn from(err: DecodeError) -> Self {
        match err {
            DecodeError::UnexpectedEnd { .. } => Error::Truncated,
            DecodeError::Io { inner, .. } if inner.kind() == io::ErrorKind::UnexpectedEof => Error::Truncated,
            DecodeError::Io { inner, .. } => Error::Io(inner),
            DecodeError::Other(msg) if msg == BAD_MAGIC => Error::BadMagic,
            DecodeError::Other(msg) => Error::Corrupt(msg),
            _ => Error::Corrupt("undecodable input"),
        }
    }
}

impl From<EncodeError> for Error {
    fn from(err: EncodeError) -> Self {
        match err {
            EncodeError::Io { inner, .. } => Error::Io(inner),
            other => Error::Encode(other.to_string()),
        }
    }
}
