//! Deterministic layout fingerprints.

use blake3::Hasher;
use wire::ProtocolVersion;

use crate::record::RecordSchema;

/// Incremental fingerprint over one or more record layouts.
///
/// Every encoding decision that affects the wire (bit positions, field
/// order, resolved scalar codecs, suppression groups) feeds the hash, so
/// two peers with equal fingerprints agree on the layout.
pub struct LayoutHasher {
    hasher: Hasher,
    version: ProtocolVersion,
}

impl LayoutHasher {
    #[must_use]
    pub fn new(version: ProtocolVersion) -> Self {
        let mut hasher = Hasher::new();
        write_u16(&mut hasher, version.raw());
        Self { hasher, version }
    }

    /// Adds one record layout.
    pub fn record<R: 'static>(&mut self, schema: &RecordSchema<R>) -> &mut Self {
        write_str(&mut self.hasher, schema.name);
        write_u32(&mut self.hasher, schema.mask_bits);
        write_u32(&mut self.hasher, schema.control_bits);
        write_u32(&mut self.hasher, schema.reserved_bits);
        write_u32(&mut self.hasher, schema.fields.len() as u32);
        for field in schema.fields {
            write_str(&mut self.hasher, field.name);
            write_u8(&mut self.hasher, field.bit as u8);
            write_u8(&mut self.hasher, field.group.tag());
            let (shape, scalar) = field.codec.layout_tag(self.version);
            write_u8(&mut self.hasher, shape);
            write_u8(&mut self.hasher, scalar);
        }
        self
    }

    #[must_use]
    pub fn finish(&self) -> u64 {
        let hash = self.hasher.finalize();
        let mut first = [0u8; 8];
        first.copy_from_slice(&hash.as_bytes()[..8]);
        u64::from_le_bytes(first)
    }
}

impl<R: 'static> RecordSchema<R> {
    /// Fingerprint of this layout under `version`.
    #[must_use]
    pub fn fingerprint(&self, version: ProtocolVersion) -> u64 {
        LayoutHasher::new(version).record(self).finish()
    }
}

fn write_u8(hasher: &mut Hasher, value: u8) {
    hasher.update(&[value]);
}

fn write_u16(hasher: &mut Hasher, value: u16) {
    hasher.update(&value.to_le_bytes());
}

fn write_u32(hasher: &mut Hasher, value: u32) {
    hasher.update(&value.to_le_bytes());
}

fn write_str(hasher: &mut Hasher, value: &str) {
    write_u32(hasher, value.len() as u32);
    hasher.update(value.as_bytes());
}
