//! Error types for the OPDx reader.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for OPDx operations.
///
/// Decode variants carry the byte offset at which the problem was detected,
/// so a failing file can be inspected in a hex viewer.
#[derive(Error, Debug)]
pub enum Error {
    /// File does not exist or cannot be accessed
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// Invalid magic bytes at start of file
    #[error("Invalid OPDx file: expected \"VCA DATA\" magic bytes")]
    BadMagic,

    /// Fewer bytes remain than a field requires
    #[error("Truncated input at offset {offset}: needed {needed} bytes, {remaining} remain")]
    TruncatedInput {
        offset: usize,
        needed: usize,
        remaining: usize,
    },

    /// Size selector byte was not 1, 2 or 4
    #[error("Bad size selector {selector:#04x} at offset {offset}")]
    BadSizeWidth { offset: usize, selector: u8 },

    /// A name or string field was not valid UTF-8
    #[error("Invalid UTF-8 text at offset {offset}")]
    InvalidText { offset: usize },

    /// Type tag not present in the dispatch table
    #[error("Unknown type code {code:#04x} at offset {offset}")]
    UnknownTypeCode { offset: usize, code: u8 },

    /// A declared payload size is inconsistent with its contents
    #[error("Corrupt size at offset {offset}: {reason}")]
    CorruptSize { offset: usize, reason: String },

    /// Terminator record payload was not `FF FF`
    #[error("Malformed terminator at offset {offset}")]
    MalformedTerminator { offset: usize },

    /// Container nesting exceeded the defensive depth cap
    #[error("Container nesting at offset {offset} exceeds {limit} levels")]
    NestingTooDeep { offset: usize, limit: usize },

    /// Path lookup failed
    #[error("Value not found: {0}")]
    NotFound(String),

    /// A looked-up value had a different kind than required
    #[error("Type mismatch: expected {expected}, got {actual}")]
    TypeMismatch { expected: String, actual: String },

    /// Memory mapping failed
    #[error("Memory mapping failed: {0}")]
    MmapFailed(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an "other" error from a string.
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }

    /// Create a corrupt-size error at the given offset.
    pub fn corrupt(offset: usize, reason: impl Into<String>) -> Self {
        Self::CorruptSize {
            offset,
            reason: reason.into(),
        }
    }

    /// Create a type-mismatch error.
    pub fn mismatch(expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Self::TypeMismatch {
            expected: expected.into(),
            actual: actual.into(),
        }
    }
}

/// Result type alias for OPDx operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let e = Error::BadMagic;
        assert!(e.to_string().contains("magic"));

        let e = Error::TruncatedInput {
            offset: 12,
            needed: 8,
            remaining: 3,
        };
        assert!(e.to_string().contains("12"));
        assert!(e.to_string().contains("8"));

        let e = Error::UnknownTypeCode {
            offset: 0,
            code: 0x99,
        };
        assert!(e.to_string().contains("0x99"));
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "test");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
