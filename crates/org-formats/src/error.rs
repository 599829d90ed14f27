//! Load error types.

use std::collections::TryReserveError;

/// The song or bank bytes are not a valid file of the expected format.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    /// First five bytes are not the Org magic
    #[error("invalid Org magic {0:02x?}")]
    InvalidMagic([u8; 5]),
    /// Version digit other than '1' or '2'
    #[error("expected version 1 or 2, got {0:?}")]
    UnsupportedVersion(char),
    /// Header fields are unreadable or inconsistent
    #[error("malformed header: {0}")]
    MalformedHeader(String),
}

/// A required asset is missing or does not fit the song.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum AssetError {
    #[error("song {0:?} not found")]
    MissingSong(String),
    #[error("sample bank {0:?} not found")]
    MissingBank(String),
    #[error("expected {expected} instruments in bank, got {found}")]
    SampleCountMismatch { expected: usize, found: usize },
}

/// Any failure while loading a song or bank.
#[derive(thiserror::Error, Debug)]
pub enum LoadError {
    #[error("format error: {0}")]
    Format(#[from] FormatError),
    #[error("asset error: {0}")]
    Asset(#[from] AssetError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("out of memory: {0}")]
    OutOfMemory(#[from] TryReserveError),
}

impl From<binrw::Error> for LoadError {
    fn from(err: binrw::Error) -> Self {
        match err {
            binrw::Error::Io(e) => LoadError::Io(e),
            // Derived readers wrap field errors with context
            binrw::Error::Backtrace(bt) => LoadError::from(*bt.error),
            other => LoadError::Format(FormatError::MalformedHeader(other.to_string())),
        }
    }
}

/// Result type for load operations.
pub type Result<T> = std::result::Result<T, LoadError>;
