use codec::{
    pack_entity, read_packet_entities, write_packet_entities, CodecConfig, CodecError,
    EntityState, MsgBuffer, OverflowPolicy, PackedEntity, ProtocolVersion, NULL_ENTITY_STATE,
};

fn entity(number: u16, x: f32) -> PackedEntity {
    PackedEntity {
        number,
        origin: [x, -16.0, 24.0],
        angles: [0.0, 90.0, 0.0],
        model_index: 3,
        frame: 7,
        ..NULL_ENTITY_STATE
    }
}

fn buffer(config: &CodecConfig) -> MsgBuffer {
    MsgBuffer::with_capacity(config.limits.max_message_bytes, OverflowPolicy::Fatal).unwrap()
}

fn transmit(
    old: &[PackedEntity],
    new: &[PackedEntity],
    config: &CodecConfig,
) -> Vec<PackedEntity> {
    let mut msg = buffer(config);
    write_packet_entities(&mut msg, old, new, config).unwrap();
    let mut inbound = buffer(config);
    inbound.load(msg.as_bytes()).unwrap();
    inbound.begin_reading();
    read_packet_entities(&mut inbound, old, config).unwrap()
}

#[test]
fn frame_sequence_tracks_sender() {
    let config = CodecConfig::for_testing();
    let frames = [
        vec![entity(1, 0.0), entity(4, 8.0)],
        vec![entity(1, 16.0), entity(2, 0.0), entity(4, 8.0)],
        vec![entity(2, 32.0), entity(9, 1.0)],
        vec![],
        vec![entity(3, 5.0)],
    ];

    let mut client: Vec<PackedEntity> = Vec::new();
    let mut server: Vec<PackedEntity> = Vec::new();
    for frame in frames {
        client = transmit(&server, &frame, &config);
        assert_eq!(client, frame);
        server = frame;
    }
    assert_eq!(client, server);
}

#[test]
fn legacy_stream_quantizes_on_grid_values_exactly() {
    let config = CodecConfig::for_testing().with_protocol(ProtocolVersion::Legacy);
    let new = vec![entity(1, 12.5), entity(2, -300.125)];
    assert_eq!(transmit(&[], &new, &config), new);
}

#[test]
fn simulation_entities_pack_and_transmit() {
    let config = CodecConfig::for_testing();
    let sim = EntityState {
        number: 17,
        origin: [1.0, 2.0, 3.0],
        model_index: 256 + 4,
        frame: 12,
        ..EntityState::default()
    };
    let packed = pack_entity(&sim).unwrap();
    assert_eq!(packed.model_index, 4);

    let received = transmit(&[], &[packed], &config);
    assert_eq!(EntityState::from(&received[0]).frame, 12);
}

#[test]
fn stream_referencing_missing_baseline_fails() {
    let config = CodecConfig::for_testing();
    let mut msg = buffer(&config);
    write_packet_entities(&mut msg, &[entity(6, 0.0)], &[], &config).unwrap();
    msg.begin_reading();
    let err = read_packet_entities(&mut msg, &[], &config).unwrap_err();
    assert_eq!(err, CodecError::UnknownEntity { number: 6 });
}

#[test]
fn truncated_stream_fails() {
    let config = CodecConfig::for_testing();
    let mut msg = buffer(&config);
    write_packet_entities(&mut msg, &[], &[entity(1, 4.0), entity(2, 4.0)], &config).unwrap();
    let bytes = msg.as_bytes();
    let mut inbound = buffer(&config);
    inbound.load(&bytes[..bytes.len() / 2]).unwrap();
    inbound.begin_reading();
    assert!(read_packet_entities(&mut inbound, &[], &config).is_err());
}

#[test]
fn removals_count_toward_packet_limit() {
    let old = [entity(1, 0.0), entity(2, 0.0)];
    let new = [entity(3, 8.0), entity(4, 8.0)];

    let mut config = CodecConfig::for_testing();
    config.limits.max_packet_entities = 4;
    assert_eq!(transmit(&old, &new, &config), new.to_vec());

    config.limits.max_packet_entities = 3;
    let mut msg = buffer(&config);
    let err = write_packet_entities(&mut msg, &old, &new, &config).unwrap_err();
    assert!(matches!(err, CodecError::LimitsExceeded { actual: 4, .. }));
    assert!(msg.is_empty());
}
