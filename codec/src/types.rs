//! Record types carried by the delta codecs.

use schema::MAX_STATS;

use crate::error::{CodecError, CodecResult};

/// Wire form of one entity.
///
/// Every field has its wire width already. Positions and angles are kept at
/// full float precision; the protocol revision decides how they are quantized.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PackedEntity {
    /// Entity number. Zero is reserved for "no entity".
    pub number: u16,
    pub origin: [f32; 3],
    pub angles: [f32; 3],
    pub old_origin: [f32; 3],
    pub model_index: u8,
    pub model_index2: u8,
    pub model_index3: u8,
    pub model_index4: u8,
    pub skin_number: u32,
    pub effects: u32,
    pub render_effects: u32,
    /// Packed bounding box, see [`pack_solid16`](crate::pack_solid16).
    pub solid: u32,
    pub frame: u16,
    pub sound: u8,
    pub event: u8,
}

/// Implicit baseline for an entity the receiver has never seen.
pub const NULL_ENTITY_STATE: PackedEntity = PackedEntity {
    number: 0,
    origin: [0.0; 3],
    angles: [0.0; 3],
    old_origin: [0.0; 3],
    model_index: 0,
    model_index2: 0,
    model_index3: 0,
    model_index4: 0,
    skin_number: 0,
    effects: 0,
    render_effects: 0,
    solid: 0,
    frame: 0,
    sound: 0,
    event: 0,
};

impl PackedEntity {
    /// Null state carrying `number`, the baseline for a new entity.
    #[must_use]
    pub const fn null(number: u16) -> Self {
        Self {
            number,
            ..NULL_ENTITY_STATE
        }
    }
}

/// Entity state as the simulation produces it.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EntityState {
    pub number: i32,
    pub origin: [f32; 3],
    pub angles: [f32; 3],
    pub old_origin: [f32; 3],
    pub model_index: i32,
    pub model_index2: i32,
    pub model_index3: i32,
    pub model_index4: i32,
    pub skin_number: i32,
    pub effects: u32,
    pub render_effects: i32,
    pub solid: u32,
    pub frame: i32,
    pub sound: i32,
    pub event: i32,
}

/// Quantizes a simulation entity into its wire form.
///
/// The number must be in `1..=65535`. Other fields are truncated to their
/// wire width without validation.
pub fn pack_entity(state: &EntityState) -> CodecResult<PackedEntity> {
    let number = u16::try_from(state.number)
        .ok()
        .filter(|number| *number != 0)
        .ok_or(CodecError::InvalidEntityNumber {
            number: state.number,
        })?;
    Ok(PackedEntity {
        number,
        origin: state.origin,
        angles: state.angles,
        old_origin: state.old_origin,
        model_index: state.model_index as u8,
        model_index2: state.model_index2 as u8,
        model_index3: state.model_index3 as u8,
        model_index4: state.model_index4 as u8,
        skin_number: state.skin_number as u32,
        effects: state.effects,
        render_effects: state.render_effects as u32,
        solid: state.solid,
        frame: state.frame as u16,
        sound: state.sound as u8,
        event: state.event as u8,
    })
}

impl From<&PackedEntity> for EntityState {
    fn from(packed: &PackedEntity) -> Self {
        Self {
            number: i32::from(packed.number),
            origin: packed.origin,
            angles: packed.angles,
            old_origin: packed.old_origin,
            model_index: i32::from(packed.model_index),
            model_index2: i32::from(packed.model_index2),
            model_index3: i32::from(packed.model_index3),
            model_index4: i32::from(packed.model_index4),
            skin_number: packed.skin_number as i32,
            effects: packed.effects,
            render_effects: packed.render_effects as i32,
            solid: packed.solid,
            frame: i32::from(packed.frame),
            sound: i32::from(packed.sound),
            event: i32::from(packed.event),
        }
    }
}

/// Movement state the client predicts.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlayerMoveState {
    pub pm_type: u8,
    pub origin: [f32; 3],
    pub velocity: [f32; 3],
    pub pm_flags: u8,
    /// Duration of the current movement special state, in 8 ms units.
    pub pm_time: u8,
    pub gravity: i16,
    /// Added to command angles to get view angles.
    pub delta_angles: [f32; 3],
}

/// One client's view and movement state.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlayerState {
    pub pmove: PlayerMoveState,
    pub view_angles: [f32; 3],
    pub view_offset: [f32; 3],
    pub kick_angles: [f32; 3],
    pub gun_angles: [f32; 3],
    pub gun_offset: [f32; 3],
    pub gun_index: u8,
    pub gun_frame: u8,
    /// RGBA screen blend.
    pub blend: [f32; 4],
    pub fov: u8,
    pub rd_flags: u8,
    pub stats: [i16; MAX_STATS],
}

/// Implicit baseline for a player state the receiver has never seen.
pub const NULL_PLAYER_STATE: PlayerState = PlayerState {
    pmove: PlayerMoveState {
        pm_type: 0,
        origin: [0.0; 3],
        velocity: [0.0; 3],
        pm_flags: 0,
        pm_time: 0,
        gravity: 0,
        delta_angles: [0.0; 3],
    },
    view_angles: [0.0; 3],
    view_offset: [0.0; 3],
    kick_angles: [0.0; 3],
    gun_angles: [0.0; 3],
    gun_offset: [0.0; 3],
    gun_index: 0,
    gun_frame: 0,
    blend: [0.0; 4],
    fov: 0,
    rd_flags: 0,
    stats: [0; MAX_STATS],
};

impl Default for PlayerState {
    fn default() -> Self {
        NULL_PLAYER_STATE
    }
}

/// One client movement command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UserCmd {
    /// View angles at command time, 16-bit quantized.
    pub angles: [i16; 3],
    pub forward_move: i16,
    pub side_move: i16,
    pub up_move: i16,
    pub buttons: u8,
    pub impulse: u8,
    /// Command duration in milliseconds.
    pub msec: u8,
}

/// Baseline for the first command of a connection.
pub const NULL_USER_CMD: UserCmd = UserCmd {
    angles: [0; 3],
    forward_move: 0,
    side_move: 0,
    up_move: 0,
    buttons: 0,
    impulse: 0,
    msec: 0,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_states_are_default() {
        assert_eq!(PackedEntity::default(), NULL_ENTITY_STATE);
        assert_eq!(PlayerState::default(), NULL_PLAYER_STATE);
        assert_eq!(UserCmd::default(), NULL_USER_CMD);
    }

    #[test]
    fn null_with_number() {
        let null = PackedEntity::null(12);
        assert_eq!(null.number, 12);
        assert_eq!(PackedEntity { number: 0, ..null }, NULL_ENTITY_STATE);
    }

    #[test]
    fn pack_entity_truncates_to_wire_widths() {
        let state = EntityState {
            number: 5,
            model_index: 0x1FF,
            frame: 70000,
            skin_number: -1,
            sound: 300,
            ..EntityState::default()
        };
        let packed = pack_entity(&state).unwrap();
        assert_eq!(packed.number, 5);
        assert_eq!(packed.model_index, 0xFF);
        assert_eq!(packed.frame, (70000 % 65536) as u16);
        assert_eq!(packed.skin_number, u32::MAX);
        assert_eq!(packed.sound, 44);
    }

    #[test]
    fn pack_entity_rejects_bad_numbers() {
        for number in [0, -1, 65536] {
            let state = EntityState {
                number,
                ..EntityState::default()
            };
            assert_eq!(
                pack_entity(&state).unwrap_err(),
                CodecError::InvalidEntityNumber { number }
            );
        }
    }

    #[test]
    fn unpack_widens() {
        let packed = PackedEntity {
            number: 9,
            origin: [1.0, 2.0, 3.0],
            frame: 65535,
            skin_number: u32::MAX,
            ..NULL_ENTITY_STATE
        };
        let state = EntityState::from(&packed);
        assert_eq!(state.number, 9);
        assert_eq!(state.frame, 65535);
        assert_eq!(state.skin_number, -1);
        assert_eq!(pack_entity(&state).unwrap(), packed);
    }
}
