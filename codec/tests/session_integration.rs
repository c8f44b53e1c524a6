use codec::{
    protocol_fingerprint, read_delta_player_state, read_delta_usercmd, read_packet_entities,
    write_delta_player_state, write_delta_usercmd, write_packet_entities, CodecConfig, CodecError,
    OverflowPolicy, PackedEntity, PlayerState, PlayerStateOptions, PlayerStateUpdate,
    ProtocolVersion, Session, UserCmd, NULL_ENTITY_STATE, NULL_PLAYER_STATE, NULL_USER_CMD,
};

fn player(step: u8) -> PlayerState {
    let mut state = NULL_PLAYER_STATE;
    state.pmove.origin = [f32::from(step) * 4.0, 0.0, 24.0];
    state.pmove.velocity = [f32::from(step) * 10.0, 0.0, 0.0];
    state.view_angles = [0.0, f32::from(step) * 11.25, 0.0];
    state.gun_index = 2;
    state.stats[0] = 100 - i16::from(step);
    state
}

fn entities(step: u8) -> Vec<PackedEntity> {
    (1..=u16::from(step % 4) + 1)
        .map(|number| PackedEntity {
            number,
            origin: [f32::from(step), f32::from(number), 0.0],
            model_index: 1,
            ..NULL_ENTITY_STATE
        })
        .collect()
}

#[test]
fn server_frame_sequence() {
    let config = CodecConfig::for_testing();
    let mut server = Session::new(config.clone()).unwrap();
    let mut client = Session::new(config.clone()).unwrap();
    client.check_peer_fingerprint(server.fingerprint()).unwrap();

    let mut server_player = NULL_PLAYER_STATE;
    let mut server_entities: Vec<PackedEntity> = Vec::new();
    let mut client_player = NULL_PLAYER_STATE;
    let mut client_entities: Vec<PackedEntity> = Vec::new();

    for step in 0..8u8 {
        let mut next_player = player(step);
        let next_entities = entities(step);

        let msg = server.begin_message();
        write_delta_player_state(
            msg,
            &server_player,
            &mut next_player,
            PlayerStateOptions::new(),
            &config,
        )
        .unwrap();
        write_packet_entities(msg, &server_entities, &next_entities, &config).unwrap();
        let bytes = server.finish_message().unwrap().to_vec();
        server_player = next_player;
        server_entities = next_entities;

        let inbound = client.receive(&bytes).unwrap();
        let update = read_delta_player_state(inbound, &client_player, &config).unwrap();
        let PlayerStateUpdate::State(state) = update else {
            panic!("expected player state");
        };
        client_player = state;
        client_entities = read_packet_entities(inbound, &client_entities, &config).unwrap();
        assert!(inbound.bits_remaining() < 8, "should consume whole message");
        client.message_consumed();

        assert_eq!(client_player, server_player);
        assert_eq!(client_entities, server_entities);
    }
}

#[test]
fn client_command_sequence() {
    let config = CodecConfig::for_testing();
    let mut client = Session::new(config.clone()).unwrap();
    let mut server = Session::new(config).unwrap();

    let commands: Vec<UserCmd> = (0..5i16)
        .map(|i| UserCmd {
            angles: [i * 10, -i * 20, 0],
            forward_move: 400,
            side_move: if i % 2 == 0 { 0 } else { -200 },
            buttons: u8::from(i == 3),
            msec: 16,
            ..NULL_USER_CMD
        })
        .collect();

    let msg = client.begin_message();
    let mut previous = NULL_USER_CMD;
    for cmd in &commands {
        write_delta_usercmd(msg, &previous, cmd).unwrap();
        previous = *cmd;
    }
    let bytes = client.finish_message().unwrap().to_vec();

    let inbound = server.receive(&bytes).unwrap();
    let mut previous = NULL_USER_CMD;
    for expected in &commands {
        let cmd = read_delta_usercmd(inbound, &previous).unwrap();
        assert_eq!(&cmd, expected);
        previous = cmd;
    }
}

#[test]
fn mismatched_protocol_fingerprint_rejected() {
    let legacy = Session::new(CodecConfig::new(ProtocolVersion::Legacy)).unwrap();
    let precise = Session::new(CodecConfig::new(ProtocolVersion::Precise)).unwrap();
    assert_ne!(
        protocol_fingerprint(ProtocolVersion::Legacy),
        protocol_fingerprint(ProtocolVersion::Precise)
    );
    let err = legacy
        .check_peer_fingerprint(precise.fingerprint())
        .unwrap_err();
    assert!(matches!(err, CodecError::SchemaMismatch { .. }));
}

#[test]
fn overflowing_frame_is_discarded_and_session_recovers() {
    let mut config = CodecConfig::for_testing().with_overflow(OverflowPolicy::Allow);
    config.limits.max_message_bytes = 16;
    let mut session = Session::new(config.clone()).unwrap();

    let many: Vec<PackedEntity> = (1..=8)
        .map(|number| PackedEntity {
            number,
            model_index: 1,
            ..NULL_ENTITY_STATE
        })
        .collect();
    let msg = session.begin_message();
    write_packet_entities(msg, &[], &many, &config).unwrap();
    assert!(matches!(
        session.finish_message(),
        Err(CodecError::MessageOverflowed { capacity: 16 })
    ));

    let msg = session.begin_message();
    write_delta_usercmd(msg, &NULL_USER_CMD, &NULL_USER_CMD).unwrap();
    assert_eq!(session.finish_message().unwrap().len(), 2);
}

#[test]
fn garbage_input_never_panics() {
    let config = CodecConfig::for_testing();
    let mut session = Session::new(config.clone()).unwrap();
    let mut seed = 0x1234_5678u32;
    for _ in 0..256 {
        let bytes: Vec<u8> = (0..32)
            .map(|_| {
                seed = seed.wrapping_mul(1_103_515_245).wrapping_add(12_345);
                (seed >> 16) as u8
            })
            .collect();
        let inbound = session.receive(&bytes).unwrap();
        let _ = read_packet_entities(inbound, &[], &config);
        let inbound = session.receive(&bytes).unwrap();
        let _ = read_delta_player_state(inbound, &NULL_PLAYER_STATE, &config);
        let inbound = session.receive(&bytes).unwrap();
        let _ = read_delta_usercmd(inbound, &NULL_USER_CMD);
    }
}
