//! Field definitions and their wire codecs.

use std::fmt;

use bitstream::{BitResult, MsgBuffer};
use wire::{PrecisionClass, ProtocolVersion, ScalarCodec};

use crate::value::FieldValue;

/// Scalar encoding of a field, fixed or resolved through the protocol table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarSpec {
    Fixed(ScalarCodec),
    Versioned(PrecisionClass),
}

impl ScalarSpec {
    #[must_use]
    pub const fn resolve(self, version: ProtocolVersion) -> ScalarCodec {
        match self {
            Self::Fixed(codec) => codec,
            Self::Versioned(class) => version.codec_for(class),
        }
    }
}

/// How a field is laid out on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldCodec {
    /// One scalar. Real encodings carry [`FieldValue::Float`], the rest [`FieldValue::Int`].
    Scalar(ScalarSpec),
    /// Three scalars.
    Vec3(ScalarSpec),
    /// Four scalars.
    Vec4(ScalarSpec),
    /// A 32-bit sub-mask followed by one short per changed entry.
    ShortArray,
}

impl FieldCodec {
    #[must_use]
    pub const fn fixed(codec: ScalarCodec) -> Self {
        Self::Scalar(ScalarSpec::Fixed(codec))
    }

    #[must_use]
    pub const fn versioned(class: PrecisionClass) -> Self {
        Self::Scalar(ScalarSpec::Versioned(class))
    }

    #[must_use]
    pub const fn vec3(class: PrecisionClass) -> Self {
        Self::Vec3(ScalarSpec::Versioned(class))
    }

    /// Writes the `to` value. `from` only matters for short arrays.
    pub fn write<B>(
        self,
        msg: &mut MsgBuffer<B>,
        version: ProtocolVersion,
        from: &FieldValue,
        to: &FieldValue,
    ) -> BitResult<()>
    where
        B: AsRef<[u8]> + AsMut<[u8]>,
    {
        match self {
            Self::Scalar(spec) => {
                let codec = spec.resolve(version);
                if codec.is_real() {
                    codec.write_real(msg, to.as_float())
                } else {
                    codec.write_int(msg, to.as_int())
                }
            }
            Self::Vec3(spec) => write_reals(msg, spec.resolve(version), &to.as_vec3()),
            Self::Vec4(spec) => write_reals(msg, spec.resolve(version), &to.as_vec4()),
            Self::ShortArray => {
                let from = from.as_shorts();
                let to = to.as_shorts();
                let mut changed = 0u32;
                for (index, (a, b)) in from.iter().zip(&to).enumerate() {
                    if a != b {
                        changed |= 1 << index;
                    }
                }
                msg.write_long(changed as i32)?;
                for (index, value) in to.iter().enumerate() {
                    if changed & (1 << index) != 0 {
                        msg.write_short(*value)?;
                    }
                }
                Ok(())
            }
        }
    }

    /// Reads a value written by [`write`](Self::write) against the same `from`.
    pub fn read<B>(
        self,
        msg: &mut MsgBuffer<B>,
        version: ProtocolVersion,
        from: &FieldValue,
    ) -> BitResult<FieldValue>
    where
        B: AsRef<[u8]> + AsMut<[u8]>,
    {
        match self {
            Self::Scalar(spec) => {
                let codec = spec.resolve(version);
                if codec.is_real() {
                    Ok(FieldValue::Float(codec.read_real(msg)?))
                } else {
                    Ok(FieldValue::Int(codec.read_int(msg)?))
                }
            }
            Self::Vec3(spec) => {
                let codec = spec.resolve(version);
                let mut out = [0.0; 3];
                for slot in &mut out {
                    *slot = codec.read_real(msg)?;
                }
                Ok(FieldValue::Vec3(out))
            }
            Self::Vec4(spec) => {
                let codec = spec.resolve(version);
                let mut out = [0.0; 4];
                for slot in &mut out {
                    *slot = codec.read_real(msg)?;
                }
                Ok(FieldValue::Vec4(out))
            }
            Self::ShortArray => {
                let mut out = from.as_shorts();
                let changed = msg.read_long()? as u32;
                for (index, slot) in out.iter_mut().enumerate() {
                    if changed & (1 << index) != 0 {
                        *slot = msg.read_short()?;
                    }
                }
                Ok(FieldValue::Shorts(out))
            }
        }
    }

    /// Stable tag for fingerprinting, resolved for `version`.
    pub(crate) fn layout_tag(self, version: ProtocolVersion) -> (u8, u8) {
        match self {
            Self::Scalar(spec) => (1, spec.resolve(version).tag()),
            Self::Vec3(spec) => (2, spec.resolve(version).tag()),
            Self::Vec4(spec) => (3, spec.resolve(version).tag()),
            Self::ShortArray => (4, 0),
        }
    }
}

fn write_reals<B>(msg: &mut MsgBuffer<B>, codec: ScalarCodec, values: &[f32]) -> BitResult<()>
where
    B: AsRef<[u8]> + AsMut<[u8]>,
{
    for value in values {
        codec.write_real(msg, *value)?;
    }
    Ok(())
}

/// Which suppression rule, if any, can exclude a field from a delta.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldGroup {
    /// Always eligible.
    Core,
    /// Entity position and orientation; the player state owns these for the view entity.
    ViewEntity,
    /// Player view angles.
    ViewAngles,
    /// Player delta angles.
    DeltaAngles,
    /// Player movement fields the client predicts.
    Prediction,
}

impl FieldGroup {
    pub(crate) const fn tag(self) -> u8 {
        match self {
            Self::Core => 0,
            Self::ViewEntity => 1,
            Self::ViewAngles => 2,
            Self::DeltaAngles => 3,
            Self::Prediction => 4,
        }
    }
}

/// One field of a record: where it sits in the mask, how it is encoded, and
/// how to lift it out of and put it back into the record.
pub struct FieldDef<R> {
    pub name: &'static str,
    /// Bit index in the record's combined mask.
    pub bit: u32,
    pub group: FieldGroup,
    pub codec: FieldCodec,
    pub get: fn(&R) -> FieldValue,
    pub set: fn(&mut R, FieldValue),
}

impl<R> FieldDef<R> {
    #[must_use]
    pub const fn new(
        name: &'static str,
        bit: u32,
        group: FieldGroup,
        codec: FieldCodec,
        get: fn(&R) -> FieldValue,
        set: fn(&mut R, FieldValue),
    ) -> Self {
        Self {
            name,
            bit,
            group,
            codec,
            get,
            set,
        }
    }

    /// Mask value of this field's bit.
    #[must_use]
    pub const fn mask(&self) -> u32 {
        match 1u32.checked_shl(self.bit) {
            Some(mask) => mask,
            None => 0,
        }
    }
}

impl<R> Clone for FieldDef<R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R> Copy for FieldDef<R> {}

impl<R> fmt::Debug for FieldDef<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDef")
            .field("name", &self.name)
            .field("bit", &self.bit)
            .field("group", &self.group)
            .field("codec", &self.codec)
            .finish_non_exhaustive()
    }
}
