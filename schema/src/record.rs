//! Record schemas: the ordered field list that drives encode and decode.

use std::fmt;

use crate::error::{SchemaError, SchemaResult};
use crate::field::FieldDef;

/// Field list of one record type.
///
/// The slice order is the wire order. Encode and decode both walk this list,
/// so they cannot disagree on order or width.
pub struct RecordSchema<R: 'static> {
    pub name: &'static str,
    /// Width of the combined change mask.
    pub mask_bits: u32,
    /// Mask bits with a meaning other than "field present" (removal markers).
    pub control_bits: u32,
    /// Mask bits that must be zero.
    pub reserved_bits: u32,
    pub fields: &'static [FieldDef<R>],
}

impl<R: 'static> RecordSchema<R> {
    /// Union of every field bit.
    #[must_use]
    pub fn field_mask(&self) -> u32 {
        self.fields.iter().fold(0, |acc, field| acc | field.mask())
    }

    /// Looks a field up by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldDef<R>> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// Checks that every field owns a distinct in-range bit that is neither
    /// a control bit nor reserved.
    pub fn validate(&self) -> SchemaResult<()> {
        if self.mask_bits == 0 || self.mask_bits > 32 {
            return Err(SchemaError::InvalidMaskWidth {
                record: self.name,
                bits: self.mask_bits,
            });
        }
        let mut seen = 0u32;
        for field in self.fields {
            if field.bit >= self.mask_bits {
                return Err(SchemaError::BitOutOfRange {
                    record: self.name,
                    field: field.name,
                    bit: field.bit,
                    mask_bits: self.mask_bits,
                });
            }
            if seen & field.mask() != 0 {
                return Err(SchemaError::DuplicateBit {
                    record: self.name,
                    field: field.name,
                    bit: field.bit,
                });
            }
            if (self.control_bits | self.reserved_bits) & field.mask() != 0 {
                return Err(SchemaError::ControlBitOverlap {
                    record: self.name,
                    field: field.name,
                    bit: field.bit,
                });
            }
            seen |= field.mask();
        }
        Ok(())
    }

    /// Names the fields selected by `mask`, in wire order.
    #[must_use]
    pub fn describe_mask(&self, mask: u32) -> Vec<&'static str> {
        self.fields
            .iter()
            .filter(|field| mask & field.mask() != 0)
            .map(|field| field.name)
            .collect()
    }
}

impl<R: 'static> fmt::Debug for RecordSchema<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordSchema")
            .field("name", &self.name)
            .field("mask_bits", &self.mask_bits)
            .field("control_bits", &self.control_bits)
            .field("reserved_bits", &self.reserved_bits)
            .field("fields", &self.fields)
            .finish()
    }
}
