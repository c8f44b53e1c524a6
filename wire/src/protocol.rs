//! Protocol revisions and the per-field precision table.

use std::fmt;

use bitstream::{BitResult, MsgBuffer};

use crate::error::{WireError, WireResult};

/// Wire protocol revision negotiated by both peers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
#[repr(u16)]
pub enum ProtocolVersion {
    /// Fixed-point coordinates, 16-bit angles, no player-state extension word.
    Legacy = 1,
    /// Full float precision for positions and angles, extension word present.
    #[default]
    Precise = 2,
}

impl ProtocolVersion {
    /// Every revision this build understands, oldest first.
    pub const ALL: [Self; 2] = [Self::Legacy, Self::Precise];

    /// Parses a raw revision number.
    pub const fn from_raw(raw: u16) -> WireResult<Self> {
        match raw {
            1 => Ok(Self::Legacy),
            2 => Ok(Self::Precise),
            found => Err(WireError::UnsupportedVersion { found }),
        }
    }

    #[must_use]
    pub const fn raw(self) -> u16 {
        self as u16
    }

    /// Returns the scalar encoding used for `class` under this revision.
    ///
    /// This is the single source of truth for versioned field precision.
    #[must_use]
    pub const fn codec_for(self, class: PrecisionClass) -> ScalarCodec {
        match (self, class) {
            (Self::Legacy, PrecisionClass::EntityOrigin | PrecisionClass::PlayerOrigin) => {
                ScalarCodec::Coord
            }
            (Self::Legacy, PrecisionClass::EntityAngles | PrecisionClass::PlayerAngles) => {
                ScalarCodec::Angle16
            }
            (Self::Precise, _) => ScalarCodec::Float,
        }
    }

    /// Returns `true` if player-state deltas carry the 16-bit extension word.
    #[must_use]
    pub const fn has_extension_word(self) -> bool {
        matches!(self, Self::Precise)
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Legacy => "legacy",
            Self::Precise => "precise",
        }
    }
}

impl fmt::Display for ProtocolVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (v{})", self.name(), self.raw())
    }
}

/// Groups of fields whose precision depends on the protocol revision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrecisionClass {
    /// Entity origin and old origin.
    EntityOrigin,
    /// Entity angles.
    EntityAngles,
    /// Player origin, velocity, view offset and gun offset.
    PlayerOrigin,
    /// Player view, delta, kick and gun angles.
    PlayerAngles,
}

/// Scalar wire encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarCodec {
    Char,
    Byte,
    Short,
    Word,
    Long,
    Float,
    Angle16,
    Coord,
}

impl ScalarCodec {
    /// Width on the wire in bits.
    #[must_use]
    pub const fn bit_width(self) -> u32 {
        match self {
            Self::Char | Self::Byte => 8,
            Self::Short | Self::Word | Self::Angle16 | Self::Coord => 16,
            Self::Long | Self::Float => 32,
        }
    }

    /// Returns `true` for encodings that carry a real number.
    #[must_use]
    pub const fn is_real(self) -> bool {
        matches!(self, Self::Float | Self::Angle16 | Self::Coord)
    }

    /// Stable one-byte tag used when fingerprinting layouts.
    #[must_use]
    pub const fn tag(self) -> u8 {
        match self {
            Self::Char => 1,
            Self::Byte => 2,
            Self::Short => 3,
            Self::Word => 4,
            Self::Long => 5,
            Self::Float => 6,
            Self::Angle16 => 7,
            Self::Coord => 8,
        }
    }

    /// Writes an integer, truncating it to the encoding width.
    pub fn write_int<B>(self, msg: &mut MsgBuffer<B>, value: i32) -> BitResult<()>
    where
        B: AsRef<[u8]> + AsMut<[u8]>,
    {
        match self {
            Self::Char => msg.write_char(value as i8),
            Self::Byte => msg.write_byte(value as u8),
            Self::Short => msg.write_short(value as i16),
            Self::Word => msg.write_word(value as u16),
            Self::Long => msg.write_long(value),
            Self::Float | Self::Angle16 | Self::Coord => self.write_real(msg, value as f32),
        }
    }

    /// Reads an integer written by [`write_int`](Self::write_int).
    pub fn read_int<B>(self, msg: &mut MsgBuffer<B>) -> BitResult<i32>
    where
        B: AsRef<[u8]> + AsMut<[u8]>,
    {
        match self {
            Self::Char => msg.read_char().map(i32::from),
            Self::Byte => msg.read_byte().map(i32::from),
            Self::Short => msg.read_short().map(i32::from),
            Self::Word => msg.read_word().map(i32::from),
            Self::Long => msg.read_long(),
            Self::Float | Self::Angle16 | Self::Coord => Ok(self.read_real(msg)? as i32),
        }
    }

    /// Writes a real number, quantizing it for lossy encodings.
    pub fn write_real<B>(self, msg: &mut MsgBuffer<B>, value: f32) -> BitResult<()>
    where
        B: AsRef<[u8]> + AsMut<[u8]>,
    {
        match self {
            Self::Float => msg.write_float(value),
            Self::Angle16 => msg.write_angle16(value),
            Self::Coord => msg.write_coord(value),
            _ => self.write_int(msg, value as i32),
        }
    }

    /// Reads a real number written by [`write_real`](Self::write_real).
    pub fn read_real<B>(self, msg: &mut MsgBuffer<B>) -> BitResult<f32>
    where
        B: AsRef<[u8]> + AsMut<[u8]>,
    {
        match self {
            Self::Float => msg.read_float(),
            Self::Angle16 => msg.read_angle16(),
            Self::Coord => msg.read_coord(),
            _ => Ok(self.read_int(msg)? as f32),
        }
    }
}

impl fmt::Display for ScalarCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Char => "char",
            Self::Byte => "byte",
            Self::Short => "short",
            Self::Word => "word",
            Self::Long => "long",
            Self::Float => "float",
            Self::Angle16 => "angle16",
            Self::Coord => "coord",
        };
        write!(f, "{name}")
    }
}
