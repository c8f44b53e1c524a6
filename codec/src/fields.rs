//! Field tables for the three delta-coded records.
//!
//! Each table lists fields in wire order. The bit of a field is its index in
//! the record's combined change mask; the player state combines the main
//! word (bits 0..16) with the extension word (bits 16..32).

use schema::{FieldCodec, FieldDef, FieldGroup, FieldValue, LayoutHasher, RecordSchema, ScalarSpec};
use wire::{
    CmdBits, EntityBits, PlayerBits, PlayerExtraBits, PrecisionClass, ProtocolVersion, ScalarCodec,
};

use crate::types::{PackedEntity, PlayerState, UserCmd};

macro_rules! field {
    ($rec:ty, $name:literal, $bit:expr, $group:ident, $codec:expr,
     get |$r:ident| $get:expr, set |$w:ident, $v:ident| $set:expr) => {
        FieldDef::new(
            $name,
            $bit,
            FieldGroup::$group,
            $codec,
            |$r: &$rec| $get,
            |$w: &mut $rec, $v: FieldValue| $set,
        )
    };
}

const fn bit(mask: u32) -> u32 {
    mask.trailing_zeros()
}

const fn extra_bit(mask: u32) -> u32 {
    PlayerBits::WIDTH + mask.trailing_zeros()
}

const BYTE: FieldCodec = FieldCodec::fixed(ScalarCodec::Byte);
const SHORT: FieldCodec = FieldCodec::fixed(ScalarCodec::Short);
const WORD: FieldCodec = FieldCodec::fixed(ScalarCodec::Word);
const LONG: FieldCodec = FieldCodec::fixed(ScalarCodec::Long);

static ENTITY_FIELDS: [FieldDef<PackedEntity>; 14] = [
    field!(PackedEntity, "origin", bit(EntityBits::ORIGIN), ViewEntity,
        FieldCodec::vec3(PrecisionClass::EntityOrigin),
        get |e| FieldValue::Vec3(e.origin), set |e, v| e.origin = v.as_vec3()),
    field!(PackedEntity, "angles", bit(EntityBits::ANGLES), ViewEntity,
        FieldCodec::vec3(PrecisionClass::EntityAngles),
        get |e| FieldValue::Vec3(e.angles), set |e, v| e.angles = v.as_vec3()),
    field!(PackedEntity, "old_origin", bit(EntityBits::OLD_ORIGIN), Core,
        FieldCodec::vec3(PrecisionClass::EntityOrigin),
        get |e| FieldValue::Vec3(e.old_origin), set |e, v| e.old_origin = v.as_vec3()),
    field!(PackedEntity, "model_index", bit(EntityBits::MODEL), Core, BYTE,
        get |e| FieldValue::Int(i32::from(e.model_index)), set |e, v| e.model_index = v.as_int() as u8),
    field!(PackedEntity, "model_index2", bit(EntityBits::MODEL2), Core, BYTE,
        get |e| FieldValue::Int(i32::from(e.model_index2)), set |e, v| e.model_index2 = v.as_int() as u8),
    field!(PackedEntity, "model_index3", bit(EntityBits::MODEL3), Core, BYTE,
        get |e| FieldValue::Int(i32::from(e.model_index3)), set |e, v| e.model_index3 = v.as_int() as u8),
    field!(PackedEntity, "model_index4", bit(EntityBits::MODEL4), Core, BYTE,
        get |e| FieldValue::Int(i32::from(e.model_index4)), set |e, v| e.model_index4 = v.as_int() as u8),
    field!(PackedEntity, "skin_number", bit(EntityBits::SKIN), Core, LONG,
        get |e| FieldValue::Int(e.skin_number as i32), set |e, v| e.skin_number = v.as_int() as u32),
    field!(PackedEntity, "effects", bit(EntityBits::EFFECTS), Core, LONG,
        get |e| FieldValue::Int(e.effects as i32), set |e, v| e.effects = v.as_int() as u32),
    field!(PackedEntity, "render_effects", bit(EntityBits::RENDERFX), Core, LONG,
        get |e| FieldValue::Int(e.render_effects as i32), set |e, v| e.render_effects = v.as_int() as u32),
    field!(PackedEntity, "solid", bit(EntityBits::SOLID), Core, LONG,
        get |e| FieldValue::Int(e.solid as i32), set |e, v| e.solid = v.as_int() as u32),
    field!(PackedEntity, "frame", bit(EntityBits::FRAME), Core, WORD,
        get |e| FieldValue::Int(i32::from(e.frame)), set |e, v| e.frame = v.as_int() as u16),
    field!(PackedEntity, "sound", bit(EntityBits::SOUND), Core, BYTE,
        get |e| FieldValue::Int(i32::from(e.sound)), set |e, v| e.sound = v.as_int() as u8),
    field!(PackedEntity, "event", bit(EntityBits::EVENT), Core, BYTE,
        get |e| FieldValue::Int(i32::from(e.event)), set |e, v| e.event = v.as_int() as u8),
];

/// Entity layout: 16-bit mask, `REMOVE` as control bit.
pub static ENTITY_SCHEMA: RecordSchema<PackedEntity> = RecordSchema {
    name: "entity",
    mask_bits: EntityBits::WIDTH,
    control_bits: EntityBits::REMOVE,
    reserved_bits: EntityBits::RESERVED_MASK,
    fields: &ENTITY_FIELDS,
};

static PLAYER_FIELDS: [FieldDef<PlayerState>; 18] = [
    field!(PlayerState, "pm_type", bit(PlayerBits::M_TYPE), Core, BYTE,
        get |p| FieldValue::Int(i32::from(p.pmove.pm_type)), set |p, v| p.pmove.pm_type = v.as_int() as u8),
    field!(PlayerState, "origin", bit(PlayerBits::M_ORIGIN), Core,
        FieldCodec::vec3(PrecisionClass::PlayerOrigin),
        get |p| FieldValue::Vec3(p.pmove.origin), set |p, v| p.pmove.origin = v.as_vec3()),
    field!(PlayerState, "velocity", bit(PlayerBits::M_VELOCITY), Prediction,
        FieldCodec::vec3(PrecisionClass::PlayerOrigin),
        get |p| FieldValue::Vec3(p.pmove.velocity), set |p, v| p.pmove.velocity = v.as_vec3()),
    field!(PlayerState, "pm_time", bit(PlayerBits::M_TIME), Prediction, BYTE,
        get |p| FieldValue::Int(i32::from(p.pmove.pm_time)), set |p, v| p.pmove.pm_time = v.as_int() as u8),
    field!(PlayerState, "pm_flags", bit(PlayerBits::M_FLAGS), Prediction, BYTE,
        get |p| FieldValue::Int(i32::from(p.pmove.pm_flags)), set |p, v| p.pmove.pm_flags = v.as_int() as u8),
    field!(PlayerState, "gravity", bit(PlayerBits::M_GRAVITY), Prediction, SHORT,
        get |p| FieldValue::Int(i32::from(p.pmove.gravity)), set |p, v| p.pmove.gravity = v.as_int() as i16),
    field!(PlayerState, "delta_angles", bit(PlayerBits::M_DELTA_ANGLES), DeltaAngles,
        FieldCodec::vec3(PrecisionClass::PlayerAngles),
        get |p| FieldValue::Vec3(p.pmove.delta_angles), set |p, v| p.pmove.delta_angles = v.as_vec3()),
    field!(PlayerState, "view_offset", bit(PlayerBits::VIEW_OFFSET), Core,
        FieldCodec::vec3(PrecisionClass::PlayerOrigin),
        get |p| FieldValue::Vec3(p.view_offset), set |p, v| p.view_offset = v.as_vec3()),
    field!(PlayerState, "view_angles", bit(PlayerBits::VIEW_ANGLES), ViewAngles,
        FieldCodec::vec3(PrecisionClass::PlayerAngles),
        get |p| FieldValue::Vec3(p.view_angles), set |p, v| p.view_angles = v.as_vec3()),
    field!(PlayerState, "kick_angles", bit(PlayerBits::KICK_ANGLES), Core,
        FieldCodec::vec3(PrecisionClass::PlayerAngles),
        get |p| FieldValue::Vec3(p.kick_angles), set |p, v| p.kick_angles = v.as_vec3()),
    field!(PlayerState, "blend", bit(PlayerBits::BLEND), Core,
        FieldCodec::Vec4(ScalarSpec::Fixed(ScalarCodec::Float)),
        get |p| FieldValue::Vec4(p.blend), set |p, v| p.blend = v.as_vec4()),
    field!(PlayerState, "fov", bit(PlayerBits::FOV), Core, BYTE,
        get |p| FieldValue::Int(i32::from(p.fov)), set |p, v| p.fov = v.as_int() as u8),
    field!(PlayerState, "gun_index", bit(PlayerBits::GUN_INDEX), Core, BYTE,
        get |p| FieldValue::Int(i32::from(p.gun_index)), set |p, v| p.gun_index = v.as_int() as u8),
    field!(PlayerState, "gun_frame", bit(PlayerBits::GUN_FRAME), Core, BYTE,
        get |p| FieldValue::Int(i32::from(p.gun_frame)), set |p, v| p.gun_frame = v.as_int() as u8),
    field!(PlayerState, "stats", bit(PlayerBits::STATS), Core, FieldCodec::ShortArray,
        get |p| FieldValue::Shorts(p.stats), set |p, v| p.stats = v.as_shorts()),
    field!(PlayerState, "gun_offset", extra_bit(PlayerExtraBits::GUN_OFFSET), Core,
        FieldCodec::vec3(PrecisionClass::PlayerOrigin),
        get |p| FieldValue::Vec3(p.gun_offset), set |p, v| p.gun_offset = v.as_vec3()),
    field!(PlayerState, "gun_angles", extra_bit(PlayerExtraBits::GUN_ANGLES), Core,
        FieldCodec::vec3(PrecisionClass::PlayerAngles),
        get |p| FieldValue::Vec3(p.gun_angles), set |p, v| p.gun_angles = v.as_vec3()),
    field!(PlayerState, "rd_flags", extra_bit(PlayerExtraBits::RD_FLAGS), Core, BYTE,
        get |p| FieldValue::Int(i32::from(p.rd_flags)), set |p, v| p.rd_flags = v.as_int() as u8),
];

/// Player-state layout: main word in the low half, extension word in the high half.
pub static PLAYER_SCHEMA: RecordSchema<PlayerState> = RecordSchema {
    name: "player_state",
    mask_bits: PlayerBits::WIDTH + PlayerExtraBits::WIDTH,
    control_bits: PlayerBits::REMOVE,
    reserved_bits: PlayerExtraBits::RESERVED_MASK << PlayerBits::WIDTH,
    fields: &PLAYER_FIELDS,
};

static CMD_FIELDS: [FieldDef<UserCmd>; 9] = [
    field!(UserCmd, "angle1", bit(CmdBits::ANGLE1), Core, SHORT,
        get |c| FieldValue::Int(i32::from(c.angles[0])), set |c, v| c.angles[0] = v.as_int() as i16),
    field!(UserCmd, "angle2", bit(CmdBits::ANGLE2), Core, SHORT,
        get |c| FieldValue::Int(i32::from(c.angles[1])), set |c, v| c.angles[1] = v.as_int() as i16),
    field!(UserCmd, "angle3", bit(CmdBits::ANGLE3), Core, SHORT,
        get |c| FieldValue::Int(i32::from(c.angles[2])), set |c, v| c.angles[2] = v.as_int() as i16),
    field!(UserCmd, "forward_move", bit(CmdBits::FORWARD), Core, SHORT,
        get |c| FieldValue::Int(i32::from(c.forward_move)), set |c, v| c.forward_move = v.as_int() as i16),
    field!(UserCmd, "side_move", bit(CmdBits::SIDE), Core, SHORT,
        get |c| FieldValue::Int(i32::from(c.side_move)), set |c, v| c.side_move = v.as_int() as i16),
    field!(UserCmd, "up_move", bit(CmdBits::UP), Core, SHORT,
        get |c| FieldValue::Int(i32::from(c.up_move)), set |c, v| c.up_move = v.as_int() as i16),
    field!(UserCmd, "buttons", bit(CmdBits::BUTTONS), Core, BYTE,
        get |c| FieldValue::Int(i32::from(c.buttons)), set |c, v| c.buttons = v.as_int() as u8),
    field!(UserCmd, "impulse", bit(CmdBits::IMPULSE), Core, BYTE,
        get |c| FieldValue::Int(i32::from(c.impulse)), set |c, v| c.impulse = v.as_int() as u8),
    field!(UserCmd, "msec", bit(CmdBits::MSEC), Core, BYTE,
        get |c| FieldValue::Int(i32::from(c.msec)), set |c, v| c.msec = v.as_int() as u8),
];

/// Movement-command layout: 9-bit mask, no control bits.
pub static CMD_SCHEMA: RecordSchema<UserCmd> = RecordSchema {
    name: "usercmd",
    mask_bits: CmdBits::WIDTH,
    control_bits: 0,
    reserved_bits: CmdBits::RESERVED_MASK,
    fields: &CMD_FIELDS,
};

/// Fingerprint of every record layout under `version`.
///
/// Peers that exchange this value at connection time can refuse to talk
/// when their layouts drifted apart.
#[must_use]
pub fn protocol_fingerprint(version: ProtocolVersion) -> u64 {
    LayoutHasher::new(version)
        .record(&ENTITY_SCHEMA)
        .record(&PLAYER_SCHEMA)
        .record(&CMD_SCHEMA)
        .finish()
}
