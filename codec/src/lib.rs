//! Entity, player-state and movement-command delta codecs for qdelta.
//!
//! This is the main codec crate that ties together bitstream, wire, and schema.
//! Each record type has one field table; the delta engine derives mask
//! computation, encode and decode from that table, so writer and reader walk
//! the same fields in the same order.
//!
//! # Features
//!
//! - Entity deltas with removal, force/new-entity, first-person and beam flags
//! - Packet-entity streams merged from two sorted entity lists
//! - Player-state deltas with view, delta-angle and prediction suppression
//! - Movement-command deltas against the previous command
//! - Per-connection session buffers with overflow handling
//!
//! # Example
//!
//! ```
//! use codec::{
//!     read_delta_usercmd, write_delta_usercmd, CodecConfig, Session, UserCmd, NULL_USER_CMD,
//! };
//!
//! let mut session = Session::new(CodecConfig::default()).unwrap();
//! let cmd = UserCmd { forward_move: 200, msec: 16, ..NULL_USER_CMD };
//! write_delta_usercmd(session.begin_message(), &NULL_USER_CMD, &cmd).unwrap();
//! let bytes = session.finish_message().unwrap().to_vec();
//!
//! let inbound = session.receive(&bytes).unwrap();
//! assert_eq!(read_delta_usercmd(inbound, &NULL_USER_CMD).unwrap(), cmd);
//! ```
//!
//! # Design Principles
//!
//! - **Correctness first** - All invariants are documented and tested.
//! - **Bitwise deltas** - A field is sent exactly when its wire bits differ.
//! - **Malformed input is an error** - Reserved or unexpected mask bits never decode silently.
//! - **Deterministic** - Same inputs produce same outputs.

mod config;
mod delta;
mod entity;
mod error;
mod fields;
mod player;
mod session;
mod solid;
mod types;
mod usercmd;

pub use config::CodecConfig;
pub use delta::TRACE_TARGET;
pub use entity::{
    entity_delta_bits, read_delta_entity, read_entity_deltas, read_entity_header,
    read_packet_entities, write_delta_entity, write_entity_stream_end, write_packet_entities,
    EntityDelta, PacketEntityStats,
};
pub use error::{CodecError, CodecResult, LimitKind};
pub use fields::{protocol_fingerprint, CMD_SCHEMA, ENTITY_SCHEMA, PLAYER_SCHEMA};
pub use player::{
    read_delta_player_state, read_player_state_fields, read_player_state_header,
    write_delta_player_state, PlayerStateUpdate,
};
pub use session::Session;
pub use solid::{pack_solid16, pack_solid32, unpack_solid16, unpack_solid32};
pub use types::{
    pack_entity, EntityState, PackedEntity, PlayerMoveState, PlayerState, UserCmd,
    NULL_ENTITY_STATE, NULL_PLAYER_STATE, NULL_USER_CMD,
};
pub use usercmd::{read_delta_usercmd, write_delta_usercmd};

pub use bitstream::{MsgBuffer, OverflowPolicy};
pub use wire::{
    CmdBits, EntityBits, EntityHeader, EntityMsgFlags, Limits, PlayerBits, PlayerExtraBits,
    PlayerStateHeader, PlayerStateMsgFlags, PlayerStateOptions, ProtocolVersion, ViewSuppression,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_api_exports() {
        // Verify all expected items are exported
        let _ = CodecConfig::default();
        let _ = NULL_ENTITY_STATE;
        let _ = NULL_PLAYER_STATE;
        let _ = NULL_USER_CMD;
        let _ = PacketEntityStats::default();
        let _ = pack_solid16([0.0; 3], [0.0; 3]);
        let _ = protocol_fingerprint(ProtocolVersion::default());
        let _ = EntityMsgFlags::empty();
        let _ = PlayerStateOptions::default();
        let _ = Limits::default();

        // Error types
        let _: CodecResult<()> = Ok(());
    }

    #[test]
    fn trace_target_is_namespaced() {
        assert!(TRACE_TARGET.starts_with("qdelta::"));
    }
}
