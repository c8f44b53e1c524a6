use codec::{
    entity_delta_bits, read_delta_entity, read_delta_player_state, read_delta_usercmd,
    read_entity_header, write_delta_entity, write_delta_player_state, write_delta_usercmd,
    CodecConfig, EntityDelta, EntityMsgFlags, MsgBuffer, OverflowPolicy, PackedEntity,
    PlayerState, PlayerStateOptions, PlayerStateUpdate, UserCmd, NULL_PLAYER_STATE,
};
use proptest::prelude::*;

fn coord() -> impl Strategy<Value = f32> {
    -4096.0f32..4096.0
}

fn vec3() -> impl Strategy<Value = [f32; 3]> {
    [coord(), coord(), coord()]
}

fn entity_strategy() -> impl Strategy<Value = PackedEntity> {
    (
        (1u16..=1023, vec3(), vec3(), vec3()),
        (any::<[u8; 4]>(), any::<u32>(), any::<u32>(), any::<u32>()),
        (any::<u32>(), any::<u16>(), any::<u8>(), any::<u8>()),
    )
        .prop_map(
            |(
                (number, origin, angles, old_origin),
                (models, skin_number, effects, render_effects),
                (solid, frame, sound, event),
            )| PackedEntity {
                number,
                origin,
                angles,
                old_origin,
                model_index: models[0],
                model_index2: models[1],
                model_index3: models[2],
                model_index4: models[3],
                skin_number,
                effects,
                render_effects,
                solid,
                frame,
                sound,
                event,
            },
        )
}

fn player_strategy() -> impl Strategy<Value = PlayerState> {
    (
        (any::<u8>(), vec3(), vec3(), any::<u8>(), any::<u8>(), any::<i16>()),
        (vec3(), vec3(), vec3(), vec3(), vec3()),
        (any::<[u8; 4]>(), [0.0f32..1.0, 0.0f32..1.0, 0.0f32..1.0, 0.0f32..1.0]),
        (vec3(), proptest::collection::vec(any::<i16>(), 32)),
    )
        .prop_map(
            |(
                (pm_type, origin, velocity, pm_flags, pm_time, gravity),
                (delta_angles, view_angles, view_offset, kick_angles, gun_angles),
                (bytes, blend),
                (gun_offset, stats),
            )| {
                let mut state = NULL_PLAYER_STATE;
                state.pmove.pm_type = pm_type;
                state.pmove.origin = origin;
                state.pmove.velocity = velocity;
                state.pmove.pm_flags = pm_flags;
                state.pmove.pm_time = pm_time;
                state.pmove.gravity = gravity;
                state.pmove.delta_angles = delta_angles;
                state.view_angles = view_angles;
                state.view_offset = view_offset;
                state.kick_angles = kick_angles;
                state.gun_angles = gun_angles;
                state.gun_offset = gun_offset;
                state.gun_index = bytes[0];
                state.gun_frame = bytes[1];
                state.fov = bytes[2];
                state.rd_flags = bytes[3];
                state.blend = blend;
                state.stats.copy_from_slice(&stats);
                state
            },
        )
}

fn cmd_strategy() -> impl Strategy<Value = UserCmd> {
    (
        any::<[i16; 3]>(),
        any::<i16>(),
        any::<i16>(),
        any::<i16>(),
        any::<u8>(),
        any::<u8>(),
        any::<u8>(),
    )
        .prop_map(
            |(angles, forward_move, side_move, up_move, buttons, impulse, msec)| UserCmd {
                angles,
                forward_move,
                side_move,
                up_move,
                buttons,
                impulse,
                msec,
            },
        )
}

fn buffer() -> MsgBuffer {
    MsgBuffer::with_capacity(4096, OverflowPolicy::Fatal).unwrap()
}

proptest! {
    #[test]
    fn entity_delta_reconstructs_target(from in entity_strategy(), mut to in entity_strategy()) {
        let config = CodecConfig::for_testing();
        to.number = from.number;
        let mut msg = buffer();
        let bits = write_delta_entity(&mut msg, &from, Some(&to), EntityMsgFlags::empty(), &config)
            .unwrap();
        prop_assert_eq!(bits, entity_delta_bits(&from, &to, EntityMsgFlags::empty()));

        msg.begin_reading();
        let header = read_entity_header(&mut msg, &config).unwrap().unwrap();
        let delta = read_delta_entity(&mut msg, &from, header, EntityMsgFlags::empty(), &config)
            .unwrap();
        prop_assert_eq!(delta, EntityDelta::Update { bits, state: to });
        prop_assert_eq!(msg.bits_read(), msg.bits_written());
    }

    #[test]
    fn identical_entities_need_no_fields(entity in entity_strategy()) {
        prop_assert!(entity_delta_bits(&entity, &entity, EntityMsgFlags::empty()).is_empty());
    }

    #[test]
    fn player_delta_reconstructs_target(from in player_strategy(), to in player_strategy()) {
        let config = CodecConfig::for_testing();
        let mut msg = buffer();
        let mut sent = to;
        write_delta_player_state(&mut msg, &from, &mut sent, PlayerStateOptions::new(), &config)
            .unwrap();
        prop_assert_eq!(sent, to);

        msg.begin_reading();
        let update = read_delta_player_state(&mut msg, &from, &config).unwrap();
        prop_assert_eq!(update, PlayerStateUpdate::State(to));
    }

    #[test]
    fn player_decode_is_deterministic(from in player_strategy(), to in player_strategy()) {
        let config = CodecConfig::for_testing();
        let mut msg = buffer();
        let mut sent = to;
        write_delta_player_state(&mut msg, &from, &mut sent, PlayerStateOptions::new(), &config)
            .unwrap();

        msg.begin_reading();
        let first = read_delta_player_state(&mut msg, &from, &config).unwrap();
        msg.begin_reading();
        let second = read_delta_player_state(&mut msg, &from, &config).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn entity_decode_is_deterministic(from in entity_strategy(), mut to in entity_strategy()) {
        let config = CodecConfig::for_testing();
        to.number = from.number;
        let mut msg = buffer();
        write_delta_entity(&mut msg, &from, Some(&to), EntityMsgFlags::empty(), &config).unwrap();

        let decode = |msg: &mut MsgBuffer| {
            msg.begin_reading();
            let header = read_entity_header(msg, &config).unwrap().unwrap();
            let delta =
                read_delta_entity(msg, &from, header, EntityMsgFlags::empty(), &config).unwrap();
            (delta, msg.bits_read())
        };
        let first = decode(&mut msg);
        let second = decode(&mut msg);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn usercmd_decode_is_deterministic(from in cmd_strategy(), cmd in cmd_strategy()) {
        let mut msg = buffer();
        write_delta_usercmd(&mut msg, &from, &cmd).unwrap();

        msg.begin_reading();
        let first = read_delta_usercmd(&mut msg, &from).unwrap();
        let first_bits = msg.bits_read();
        msg.begin_reading();
        let second = read_delta_usercmd(&mut msg, &from).unwrap();
        prop_assert_eq!(first, second);
        prop_assert_eq!(first_bits, msg.bits_read());
    }

    #[test]
    fn usercmd_delta_reconstructs_target(from in cmd_strategy(), cmd in cmd_strategy()) {
        let mut msg = buffer();
        write_delta_usercmd(&mut msg, &from, &cmd).unwrap();
        msg.begin_reading();
        prop_assert_eq!(read_delta_usercmd(&mut msg, &from).unwrap(), cmd);
    }
}
