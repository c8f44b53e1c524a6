//! Error types for message buffer operations.

use std::fmt;

/// Result type for message buffer operations.
pub type BitResult<T> = Result<T, BitError>;

/// Errors that can occur while writing or reading a message buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BitError {
    /// The backing storage has no room for even a single byte.
    ZeroCapacity,

    /// A write did not fit in the remaining capacity.
    ///
    /// Only returned under [`OverflowPolicy::Fatal`](crate::OverflowPolicy::Fatal).
    Overflow {
        /// Number of bits the write needed.
        requested: usize,
        /// Number of bits left in the buffer.
        available: usize,
    },

    /// Attempted to read past the written end of the message.
    EndOfMessage {
        /// Number of bits requested.
        requested: usize,
        /// Number of bits available.
        available: usize,
    },

    /// Bit width outside `-32..=32`.
    InvalidBitCount {
        /// The invalid width provided.
        bits: i32,
        /// Maximum allowed magnitude.
        max_bits: i32,
    },

    /// Out-of-band buffers only move whole bytes.
    OutOfBandWidth {
        /// The rejected width.
        bits: i32,
    },

    /// No terminating zero byte before the end of the message.
    UnterminatedString {
        /// Bytes scanned before running out of data.
        scanned: usize,
    },

    /// String longer than the ordinary per-message string budget.
    StringTooLong {
        /// Length in bytes, excluding the terminator.
        len: usize,
        /// Maximum length in bytes, excluding the terminator.
        max: usize,
    },

    /// String contains a zero byte that would terminate it early.
    InteriorNul {
        /// Byte offset of the zero byte.
        position: usize,
    },
}

impl fmt::Display for BitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroCapacity => write!(f, "message buffer has zero capacity"),
            Self::Overflow {
                requested,
                available,
            } => {
                write!(
                    f,
                    "attempted to write {requested} bits but only {available} bits of capacity remain"
                )
            }
            Self::EndOfMessage {
                requested,
                available,
            } => {
                write!(
                    f,
                    "attempted to read {requested} bits but only {available} bits available"
                )
            }
            Self::InvalidBitCount { bits, max_bits } => {
                write!(f, "invalid bit count {bits}, magnitude must not exceed {max_bits}")
            }
            Self::OutOfBandWidth { bits } => {
                write!(f, "out-of-band access must be 8, 16 or 32 bits wide, got {bits}")
            }
            Self::UnterminatedString { scanned } => {
                write!(f, "string not terminated after {scanned} bytes")
            }
            Self::StringTooLong { len, max } => {
                write!(f, "string of {len} bytes exceeds limit of {max}")
            }
            Self::InteriorNul { position } => {
                write!(f, "string contains a zero byte at offset {position}")
            }
        }
    }
}

impl std::error::Error for BitError {}
