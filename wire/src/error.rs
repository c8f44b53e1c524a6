//! Error types for wire format operations.

use std::fmt;

use bitstream::BitError;

use crate::protocol::ProtocolVersion;

/// Result type for wire format operations.
pub type WireResult<T> = Result<T, WireError>;

/// Errors raised while writing or reading delta headers and flags.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum WireError {
    /// Unsupported protocol revision.
    UnsupportedVersion { found: u16 },

    /// A change mask has reserved bits set.
    ReservedBits { mask: &'static str, bits: u32 },

    /// A removal mask also selects fields.
    RemovalWithFields { bits: u32 },

    /// The extension word is not part of this protocol revision.
    ExtensionUnsupported { version: ProtocolVersion },

    /// Entity number zero is the stream terminator.
    ZeroEntityNumber,

    /// Entity number does not fit in the configured width.
    EntityNumberOutOfRange { number: u16, max: u16 },

    /// Entity number width outside `1..=16`.
    InvalidNumberBits { bits: u32 },

    /// Limits that cannot describe a usable configuration.
    InvalidLimits { reason: &'static str },

    /// Player-state flags request contradictory suppression.
    ConflictingFlags { flags: u8 },

    /// Player-state flags contain undefined bits.
    UnknownFlags { flags: u8 },

    /// Underlying buffer failure.
    Bitstream(BitError),
}

impl fmt::Display for WireError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedVersion { found } => {
                write!(f, "unsupported protocol version: {found}")
            }
            Self::ReservedBits { mask, bits } => {
                write!(f, "reserved bits 0x{bits:04X} set in {mask}")
            }
            Self::RemovalWithFields { bits } => {
                write!(f, "removal combined with field bits: 0x{bits:04X}")
            }
            Self::ExtensionUnsupported { version } => {
                write!(f, "extension word is not part of protocol {version}")
            }
            Self::ZeroEntityNumber => {
                write!(f, "entity number 0 is reserved as the stream terminator")
            }
            Self::EntityNumberOutOfRange { number, max } => {
                write!(f, "entity number {number} exceeds maximum {max}")
            }
            Self::InvalidNumberBits { bits } => {
                write!(f, "entity number width {bits} outside 1..=16")
            }
            Self::InvalidLimits { reason } => write!(f, "invalid limits: {reason}"),
            Self::ConflictingFlags { flags } => {
                write!(
                    f,
                    "conflicting player-state flags 0x{flags:02X}: view angles and prediction cannot both be ignored"
                )
            }
            Self::UnknownFlags { flags } => {
                write!(f, "unknown player-state flags 0x{flags:02X}")
            }
            Self::Bitstream(err) => write!(f, "bitstream error: {err}"),
        }
    }
}

impl std::error::Error for WireError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Bitstream(err) => Some(err),
            _ => None,
        }
    }
}

impl From<BitError> for WireError {
    fn from(err: BitError) -> Self {
        Self::Bitstream(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn display_reserved_bits() {
        let err = WireError::ReservedBits {
            mask: "EntityBits",
            bits: 0x8000,
        };
        let msg = err.to_string();
        assert!(msg.contains("8000"), "should mention the bits");
        assert!(msg.contains("EntityBits"), "should mention the mask");
    }

    #[test]
    fn display_conflicting_flags() {
        let msg = WireError::ConflictingFlags { flags: 5 }.to_string();
        assert!(msg.contains("0x05"));
        assert!(msg.contains("prediction"));
    }

    #[test]
    fn display_version() {
        let msg = WireError::ExtensionUnsupported {
            version: ProtocolVersion::Legacy,
        }
        .to_string();
        assert!(msg.contains("legacy"));
    }

    #[test]
    fn bitstream_error_is_source() {
        let err = WireError::from(BitError::ZeroCapacity);
        assert!(err.source().is_some());
        assert!(err.to_string().contains("zero capacity"));
        assert!(WireError::ZeroEntityNumber.source().is_none());
    }
}
