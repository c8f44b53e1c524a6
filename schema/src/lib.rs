//! Declarative field lists for the qdelta codec.
//!
//! Each record type is described once, as an ordered slice of [`FieldDef`]s.
//! The delta encoder and decoder both walk that slice, so field order, width
//! and presence can never drift between writer and reader.
//!
//! - [`FieldCodec`] / [`ScalarSpec`]: how a field is laid out, fixed or per protocol revision
//! - [`FieldValue`]: a field lifted out of a record, compared bit-exactly
//! - [`RecordSchema`]: the ordered list plus mask metadata, validation and naming
//! - [`LayoutHasher`]: deterministic fingerprints for layout agreement checks
//!
//! # Design Principles
//!
//! - **One list per record** - Encode and decode are derived from the same table.
//! - **Explicit layouts** - No reflection on arbitrary Rust types.
//! - **Deterministic hashing** - The fingerprint is stable given the same layout and protocol.

mod error;
mod field;
mod hash;
mod record;
mod value;

pub use error::{SchemaError, SchemaResult};
pub use field::{FieldCodec, FieldDef, FieldGroup, ScalarSpec};
pub use hash::LayoutHasher;
pub use record::RecordSchema;
pub use value::{FieldValue, MAX_STATS};

#[cfg(test)]
mod tests {
    use super::*;
    use wire::{PrecisionClass, ProtocolVersion, ScalarCodec};

    #[test]
    fn public_api_exports() {
        let _ = FieldCodec::fixed(ScalarCodec::Byte);
        let _ = FieldCodec::ShortArray;
        let _ = ScalarSpec::Versioned(PrecisionClass::PlayerAngles);
        let _ = FieldGroup::Prediction;
        let _ = FieldValue::Int(0);
        let _ = LayoutHasher::new(ProtocolVersion::Legacy).finish();
        let _ = MAX_STATS;

        let _: SchemaResult<()> = Ok(());
    }

    #[test]
    fn empty_layouts_hash_per_version() {
        assert_ne!(
            LayoutHasher::new(ProtocolVersion::Legacy).finish(),
            LayoutHasher::new(ProtocolVersion::Precise).finish()
        );
    }
}
