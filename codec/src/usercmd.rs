//! Movement-command delta encoding/decoding.

use bitstream::MsgBuffer;
use wire::{CmdBits, ProtocolVersion};

use crate::delta::{compute_mask, direct, read_fields, trace_delta, write_fields, Direction};
use crate::error::CodecResult;
use crate::fields::CMD_SCHEMA;
use crate::types::UserCmd;

// Every command field has a fixed encoding, so any revision resolves the same layout.
const CMD_PROTOCOL: ProtocolVersion = ProtocolVersion::Precise;

/// Writes the 9-bit mask and the fields of `cmd` that differ from `from`.
pub fn write_delta_usercmd<B>(
    msg: &mut MsgBuffer<B>,
    from: &UserCmd,
    cmd: &UserCmd,
) -> CodecResult<CmdBits>
where
    B: AsRef<[u8]> + AsMut<[u8]>,
{
    let mask = compute_mask(&CMD_SCHEMA, from, cmd, false, &direct::<UserCmd>);
    msg.write_bits(mask as i32, CmdBits::WIDTH as i32)?;
    write_fields(
        msg,
        &CMD_SCHEMA,
        CMD_PROTOCOL,
        from,
        cmd,
        mask,
        &direct::<UserCmd>,
    )?;
    trace_delta(&CMD_SCHEMA, Direction::Write, 0, mask);
    Ok(CmdBits::from_raw(mask))
}

/// Reads a command written by [`write_delta_usercmd`] against the same `from`.
pub fn read_delta_usercmd<B>(msg: &mut MsgBuffer<B>, from: &UserCmd) -> CodecResult<UserCmd>
where
    B: AsRef<[u8]> + AsMut<[u8]>,
{
    let bits = CmdBits::from_raw(msg.read_bits(CmdBits::WIDTH as i32)? as u32).validate()?;
    trace_delta(&CMD_SCHEMA, Direction::Read, 0, bits.raw());
    read_fields(
        msg,
        &CMD_SCHEMA,
        CMD_PROTOCOL,
        from,
        bits.raw(),
        &direct::<UserCmd>,
    )
}
