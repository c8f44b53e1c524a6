//! Error types for codec operations.

use std::fmt;

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// Errors that can occur during delta encoding/decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// Header or protocol error.
    Wire(wire::WireError),

    /// Bitstream error.
    Bitstream(bitstream::BitError),

    /// A built-in record layout failed validation.
    Schema(schema::SchemaError),

    /// Simulation entity number does not fit the wire.
    InvalidEntityNumber { number: i32 },

    /// Mask carries bits with no field behind them for the active flags.
    UnexpectedBits { record: &'static str, bits: u32 },

    /// Entities are not provided in ascending order.
    InvalidEntityOrder { previous: u16, current: u16 },

    /// Removal for an entity the baseline frame does not hold.
    UnknownEntity { number: u16 },

    /// Peer layout fingerprint does not match ours.
    SchemaMismatch { expected: u64, found: u64 },

    /// The outbound message overflowed and was discarded.
    MessageOverflowed { capacity: usize },

    /// Limits exceeded.
    LimitsExceeded {
        kind: LimitKind,
        limit: usize,
        actual: usize,
    },
}

/// Specific limit that was exceeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitKind {
    PacketEntities,
    MessageBytes,
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Wire(e) => write!(f, "wire error: {e}"),
            Self::Bitstream(e) => write!(f, "bitstream error: {e}"),
            Self::Schema(e) => write!(f, "schema error: {e}"),
            Self::InvalidEntityNumber { number } => {
                write!(f, "entity number {number} outside 1..=65535")
            }
            Self::UnexpectedBits { record, bits } => {
                write!(f, "{record} mask has unexpected bits 0x{bits:X}")
            }
            Self::InvalidEntityOrder { previous, current } => {
                write!(f, "entity order invalid: {previous} then {current}")
            }
            Self::UnknownEntity { number } => {
                write!(f, "entity {number} not found in baseline frame")
            }
            Self::SchemaMismatch { expected, found } => {
                write!(
                    f,
                    "layout fingerprint mismatch: expected 0x{expected:016X}, found 0x{found:016X}"
                )
            }
            Self::MessageOverflowed { capacity } => {
                write!(f, "message overflowed {capacity}-byte buffer and was discarded")
            }
            Self::LimitsExceeded {
                kind,
                limit,
                actual,
            } => {
                write!(f, "{kind} limit exceeded: {actual} > {limit}")
            }
        }
    }
}

impl fmt::Display for LimitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::PacketEntities => "packet entities",
            Self::MessageBytes => "message bytes",
        };
        write!(f, "{name}")
    }
}

impl std::error::Error for CodecError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Wire(e) => Some(e),
            Self::Bitstream(e) => Some(e),
            Self::Schema(e) => Some(e),
            _ => None,
        }
    }
}

impl From<wire::WireError> for CodecError {
    fn from(err: wire::WireError) -> Self {
        Self::Wire(err)
    }
}

impl From<bitstream::BitError> for CodecError {
    fn from(err: bitstream::BitError) -> Self {
        Self::Bitstream(err)
    }
}

impl From<schema::SchemaError> for CodecError {
    fn from(err: schema::SchemaError) -> Self {
        Self::Schema(err)
    }
}
