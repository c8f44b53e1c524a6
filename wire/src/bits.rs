//! Change-mask layouts.
//!
//! Each mask is a newtype over its raw bits with the bit assignments as
//! associated constants. Reserved bits must be zero on the wire.

use std::fmt;

use crate::error::{WireError, WireResult};

macro_rules! change_mask {
    (
        $(#[$meta:meta])*
        $name:ident, width = $width:expr, reserved = $reserved:expr,
        { $($(#[$bit_meta:meta])* $bit:ident = $index:expr,)* }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        pub struct $name(u32);

        impl $name {
            $($(#[$bit_meta])* pub const $bit: u32 = 1 << $index;)*

            /// Width of the mask on the wire.
            pub const WIDTH: u32 = $width;

            /// Bits that no field occupies.
            pub const RESERVED_MASK: u32 = $reserved;

            /// Bit names indexed by bit position.
            pub const NAMES: &'static [(u32, &'static str)] = &[$(($index, stringify!($bit)),)*];

            #[must_use]
            pub const fn empty() -> Self {
                Self(0)
            }

            #[must_use]
            pub const fn from_raw(raw: u32) -> Self {
                Self(raw)
            }

            #[must_use]
            pub const fn raw(self) -> u32 {
                self.0
            }

            #[must_use]
            pub const fn is_empty(self) -> bool {
                self.0 == 0
            }

            #[must_use]
            pub const fn contains(self, bits: u32) -> bool {
                self.0 & bits == bits
            }

            #[must_use]
            pub const fn intersects(self, bits: u32) -> bool {
                self.0 & bits != 0
            }

            pub fn insert(&mut self, bits: u32) {
                self.0 |= bits;
            }

            pub fn remove(&mut self, bits: u32) {
                self.0 &= !bits;
            }

            #[must_use]
            pub const fn has_reserved(self) -> bool {
                self.0 & Self::RESERVED_MASK != 0
            }

            /// Rejects masks with reserved bits set.
            pub const fn validate(self) -> WireResult<Self> {
                if self.has_reserved() {
                    return Err(WireError::ReservedBits {
                        mask: stringify!($name),
                        bits: self.0 & Self::RESERVED_MASK,
                    });
                }
                Ok(self)
            }

            /// Names of the set bits in wire order.
            pub fn names(self) -> impl Iterator<Item = &'static str> {
                Self::NAMES
                    .iter()
                    .filter(move |(index, _)| self.0 & (1u32 << *index) != 0)
                    .map(|(_, name)| *name)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                let mut first = true;
                for name in self.names() {
                    if !first {
                        f.write_str(" ")?;
                    }
                    f.write_str(name)?;
                    first = false;
                }
                if self.has_reserved() {
                    if !first {
                        f.write_str(" ")?;
                    }
                    write!(f, "reserved(0x{:X})", self.0 & Self::RESERVED_MASK)?;
                }
                Ok(())
            }
        }
    };
}

change_mask! {
    /// Entity change mask, 16 bits after the entity number.
    EntityBits, width = 16, reserved = 1 << 15,
    {
        ORIGIN = 0,
        ANGLES = 1,
        OLD_ORIGIN = 2,
        MODEL = 3,
        MODEL2 = 4,
        MODEL3 = 5,
        MODEL4 = 6,
        SKIN = 7,
        EFFECTS = 8,
        RENDERFX = 9,
        SOLID = 10,
        FRAME = 11,
        SOUND = 12,
        EVENT = 13,
        /// Entity left the snapshot. Never combined with field bits.
        REMOVE = 14,
    }
}

impl EntityBits {
    /// Every bit that selects a field.
    pub const FIELD_MASK: u32 = (1 << 14) - 1;

    /// Returns `true` for a bare removal.
    #[must_use]
    pub const fn is_removal(self) -> bool {
        self.0 & Self::REMOVE != 0
    }
}

change_mask! {
    /// Player-state main change word.
    PlayerBits, width = 16, reserved = 0,
    {
        M_TYPE = 0,
        M_ORIGIN = 1,
        M_VELOCITY = 2,
        M_TIME = 3,
        M_FLAGS = 4,
        M_GRAVITY = 5,
        M_DELTA_ANGLES = 6,
        VIEW_OFFSET = 7,
        VIEW_ANGLES = 8,
        KICK_ANGLES = 9,
        BLEND = 10,
        FOV = 11,
        GUN_INDEX = 12,
        GUN_FRAME = 13,
        STATS = 14,
        /// Player state is gone. Never combined with field bits.
        REMOVE = 15,
    }
}

impl PlayerBits {
    /// Every bit that selects a field.
    pub const FIELD_MASK: u32 = (1 << 15) - 1;

    #[must_use]
    pub const fn is_removal(self) -> bool {
        self.0 & Self::REMOVE != 0
    }
}

change_mask! {
    /// Player-state extension word, only present under the precise protocol.
    PlayerExtraBits, width = 16, reserved = 0xFFF8,
    {
        GUN_OFFSET = 0,
        GUN_ANGLES = 1,
        RD_FLAGS = 2,
    }
}

change_mask! {
    /// Movement-command change mask.
    CmdBits, width = 9, reserved = 0,
    {
        ANGLE1 = 0,
        ANGLE2 = 1,
        ANGLE3 = 2,
        FORWARD = 3,
        SIDE = 4,
        UP = 5,
        BUTTONS = 6,
        IMPULSE = 7,
        MSEC = 8,
    }
}

/// Sub-mask selecting which stats follow a `STATS` bit.
pub const STATS_MASK_BITS: u32 = 32;
