//! Schema validation errors.

use std::fmt;

/// Result type for schema operations.
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Errors that can occur when validating a record schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// Mask width outside `1..=32`.
    InvalidMaskWidth { record: &'static str, bits: u32 },

    /// Two fields claim the same mask bit.
    DuplicateBit {
        record: &'static str,
        field: &'static str,
        bit: u32,
    },

    /// A field bit lies outside the mask.
    BitOutOfRange {
        record: &'static str,
        field: &'static str,
        bit: u32,
        mask_bits: u32,
    },

    /// A field bit collides with a control or reserved bit.
    ControlBitOverlap {
        record: &'static str,
        field: &'static str,
        bit: u32,
    },
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidMaskWidth { record, bits } => {
                write!(f, "{record}: mask width {bits} outside 1..=32")
            }
            Self::DuplicateBit { record, field, bit } => {
                write!(f, "{record}.{field}: bit {bit} already assigned")
            }
            Self::BitOutOfRange {
                record,
                field,
                bit,
                mask_bits,
            } => {
                write!(
                    f,
                    "{record}.{field}: bit {bit} outside {mask_bits}-bit mask"
                )
            }
            Self::ControlBitOverlap { record, field, bit } => {
                write!(f, "{record}.{field}: bit {bit} is a control or reserved bit")
            }
        }
    }
}

impl std::error::Error for SchemaError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_record_and_field() {
        let msg = SchemaError::DuplicateBit {
            record: "entity",
            field: "origin",
            bit: 0,
        }
        .to_string();
        assert!(msg.contains("entity.origin"), "should name the field");
        assert!(msg.contains("bit 0"), "should name the bit");
    }

    #[test]
    fn display_out_of_range() {
        let msg = SchemaError::BitOutOfRange {
            record: "cmd",
            field: "msec",
            bit: 12,
            mask_bits: 9,
        }
        .to_string();
        assert!(msg.contains("12"));
        assert!(msg.contains("9-bit"));
    }
}
