//! Protocol revisions, change-mask layouts and delta headers for the qdelta codec.
//!
//! This crate pins the parts of the wire format that are independent of any
//! particular record: which scalar encoding each field class uses per
//! protocol revision, the bit assignment of every change mask, the per-call
//! message flags, and the headers that precede each delta.
//!
//! # Design Principles
//!
//! - **One precision table** - [`ProtocolVersion::codec_for`] is the only place field precision is decided.
//! - **Reserved means zero** - A reserved mask bit on decode is a version mismatch, never ignored.
//! - **Illegal flag combinations are unrepresentable** - Raw player-state flags must be validated into [`PlayerStateOptions`].
//! - **No record knowledge** - Field lists live in `schema`; records live in `codec`.

mod bits;
mod error;
mod flags;
mod header;
mod limits;
mod protocol;

pub use bits::{CmdBits, EntityBits, PlayerBits, PlayerExtraBits, STATS_MASK_BITS};
pub use error::{WireError, WireResult};
pub use flags::{EntityMsgFlags, PlayerStateMsgFlags, PlayerStateOptions, ViewSuppression};
pub use header::{
    check_number, encode_entity_terminator, EntityHeader, PlayerStateHeader, ENTITY_TERMINATOR,
};
pub use limits::Limits;
pub use protocol::{PrecisionClass, ProtocolVersion, ScalarCodec};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_api_exports() {
        let _ = ProtocolVersion::default();
        let _ = PrecisionClass::EntityOrigin;
        let _ = ScalarCodec::Angle16;
        let _ = EntityBits::empty();
        let _ = PlayerBits::empty();
        let _ = PlayerExtraBits::empty();
        let _ = CmdBits::empty();
        let _ = EntityMsgFlags::empty();
        let _ = PlayerStateOptions::default();
        let _ = PlayerStateHeader::default();
        let _ = Limits::default();
        let _ = ENTITY_TERMINATOR;

        let _: WireResult<()> = Ok(());
    }

    #[test]
    fn default_limits_fit_every_protocol() {
        let limits = Limits::default();
        for version in ProtocolVersion::ALL {
            assert!(limits.validate().is_ok(), "{version}");
        }
    }
}
