//! Error types for MARC codec operations.
//!
//! This module provides the [`FormatError`] type returned by every decode and
//! encode operation, and the [`Result`] convenience alias.

use thiserror::Error;

/// Error type for all codec operations.
///
/// Each variant identifies one distinguishable failure of the ISO 2709 layout
/// or of the field model invariants. None of them is fatal to the process.
#[derive(Error, Debug)]
pub enum FormatError {
    /// The leader was not exactly 24 bytes long.
    #[error("Leader must be exactly 24 bytes, got {actual}")]
    BadLeaderLength {
        /// Number of bytes supplied
        actual: usize,
    },

    /// A positionally-coded leader value was malformed.
    #[error("Invalid leader value at position {position}: {detail}")]
    BadLeaderField {
        /// Byte offset of the offending value within the leader
        position: usize,
        /// Description of what was found
        detail: String,
    },

    /// A directory entry or the directory terminator was malformed.
    #[error("Invalid directory entry {index}: {detail}")]
    BadDirectoryEntry {
        /// Zero-based entry index (equal to the entry count for terminator problems)
        index: usize,
        /// Description of what was found
        detail: String,
    },

    /// A record's declared geometry runs past the bytes available.
    #[error("Truncated record: expected {expected} bytes, only {actual} available")]
    TruncatedRecord {
        /// Bytes required by the declared geometry
        expected: usize,
        /// Bytes actually available
        actual: usize,
    },

    /// The stream ended in the middle of a record.
    #[error("Truncated stream at offset {offset}: {detail}")]
    TruncatedStream {
        /// Stream offset of the record that could not be completed
        offset: u64,
        /// Description of what was missing
        detail: String,
    },

    /// An expected field or record terminator was absent.
    #[error("Missing terminator: {detail}")]
    DanglingTerminator {
        /// Where the terminator was expected
        detail: String,
    },

    /// A field variant invariant was violated.
    #[error("Invalid field: {0}")]
    InvalidField(String),

    /// A structural delimiter byte was supplied as content.
    #[error("Illegal delimiter byte 0x{byte:02X} at position {position}")]
    IllegalDelimiter {
        /// The delimiter byte found
        byte: u8,
        /// Offset of the byte within the rejected content
        position: usize,
    },

    /// A computed length or offset does not fit its fixed-width encoding.
    #[error("{what} value {value} exceeds maximum {max}")]
    ValueOutOfRange {
        /// Which value overflowed
        what: &'static str,
        /// The computed value
        value: usize,
        /// Largest value the encoding can hold
        max: usize,
    },

    /// A single-record buffer held more bytes than its leader declared.
    #[error("Record declares {declared} bytes but buffer holds {actual}")]
    TrailingData {
        /// Length declared in the leader
        declared: usize,
        /// Length of the supplied buffer
        actual: usize,
    },

    /// IO error from the underlying source/destination.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for [`std::result::Result`] with [`FormatError`].
pub type Result<T> = std::result::Result<T, FormatError>;
