//! Player-state delta encoding/decoding.

use bitstream::MsgBuffer;
use schema::{FieldDef, FieldGroup};
use wire::{PlayerBits, PlayerExtraBits, PlayerStateHeader, PlayerStateOptions, ProtocolVersion};

use crate::config::CodecConfig;
use crate::delta::{compute_mask, copy_unrouted, read_fields, trace_delta, write_fields, Direction};
use crate::error::CodecResult;
use crate::fields::PLAYER_SCHEMA;
use crate::types::PlayerState;

/// Result of decoding one player-state delta.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum PlayerStateUpdate {
    State(PlayerState),
    /// The sender dropped this player state.
    Removed,
}

fn player_route(
    options: PlayerStateOptions,
    version: ProtocolVersion,
) -> impl Fn(&FieldDef<PlayerState>) -> Option<u32> {
    move |field: &FieldDef<PlayerState>| {
        if field.bit >= PlayerBits::WIDTH && !version.has_extension_word() {
            return None;
        }
        let suppressed = match field.group {
            FieldGroup::ViewAngles => options.ignores_view_angles(),
            FieldGroup::DeltaAngles => options.ignore_delta_angles,
            FieldGroup::Prediction => options.ignores_prediction(),
            FieldGroup::Core | FieldGroup::ViewEntity => false,
        };
        (!suppressed).then(|| field.mask())
    }
}

fn split_mask(mask: u32) -> PlayerStateHeader {
    PlayerStateHeader::new(
        PlayerBits::from_raw(mask & PlayerBits::FIELD_MASK),
        PlayerExtraBits::from_raw(mask >> PlayerBits::WIDTH),
    )
}

const fn join_mask(header: PlayerStateHeader) -> u32 {
    header.bits.raw() | (header.extra.raw() << PlayerBits::WIDTH)
}

/// Writes the delta from `from` to `to`.
///
/// Fields the options suppress, and extension fields under the legacy
/// protocol, are copied from `from` into `to` first, so the caller's
/// retained `to` matches what the receiver reconstructs.
pub fn write_delta_player_state<B>(
    msg: &mut MsgBuffer<B>,
    from: &PlayerState,
    to: &mut PlayerState,
    options: PlayerStateOptions,
    config: &CodecConfig,
) -> CodecResult<PlayerStateHeader>
where
    B: AsRef<[u8]> + AsMut<[u8]>,
{
    if options.remove {
        let header = PlayerStateHeader::removal();
        header.encode(msg, config.protocol)?;
        trace_delta(&PLAYER_SCHEMA, Direction::Write, 0, join_mask(header));
        return Ok(header);
    }

    let route = player_route(options, config.protocol);
    copy_unrouted(&PLAYER_SCHEMA, from, to, &route);
    let mask = compute_mask(&PLAYER_SCHEMA, from, to, options.force, &route);
    let header = split_mask(mask);
    header.encode(msg, config.protocol)?;
    write_fields(msg, &PLAYER_SCHEMA, config.protocol, from, to, mask, &route)?;
    trace_delta(&PLAYER_SCHEMA, Direction::Write, 0, mask);
    Ok(header)
}

/// Reads the main word and, under the precise protocol, the extension word.
pub fn read_player_state_header<B>(
    msg: &mut MsgBuffer<B>,
    config: &CodecConfig,
) -> CodecResult<PlayerStateHeader>
where
    B: AsRef<[u8]> + AsMut<[u8]>,
{
    Ok(PlayerStateHeader::decode(msg, config.protocol)?)
}

/// Reads a full player-state delta against `from`.
pub fn read_delta_player_state<B>(
    msg: &mut MsgBuffer<B>,
    from: &PlayerState,
    config: &CodecConfig,
) -> CodecResult<PlayerStateUpdate>
where
    B: AsRef<[u8]> + AsMut<[u8]>,
{
    let header = read_player_state_header(msg, config)?;
    read_player_state_fields(msg, from, header, config)
}

/// Reads the fields announced by an already decoded header.
pub fn read_player_state_fields<B>(
    msg: &mut MsgBuffer<B>,
    from: &PlayerState,
    header: PlayerStateHeader,
    config: &CodecConfig,
) -> CodecResult<PlayerStateUpdate>
where
    B: AsRef<[u8]> + AsMut<[u8]>,
{
    let mask = join_mask(header);
    trace_delta(&PLAYER_SCHEMA, Direction::Read, 0, mask);
    if header.bits.is_removal() {
        return Ok(PlayerStateUpdate::Removed);
    }
    let route = player_route(PlayerStateOptions::new(), config.protocol);
    let state = read_fields(msg, &PLAYER_SCHEMA, config.protocol, from, mask, &route)?;
    Ok(PlayerStateUpdate::State(state))
}
