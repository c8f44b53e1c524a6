#![no_main]

use codec::{
    read_delta_player_state, read_delta_usercmd, read_packet_entities, CodecConfig,
    PackedEntity, ProtocolVersion, Session, NULL_ENTITY_STATE, NULL_PLAYER_STATE, NULL_USER_CMD,
};
use libfuzzer_sys::fuzz_target;

fn baseline() -> Vec<PackedEntity> {
    [1u16, 2, 7, 40]
        .into_iter()
        .map(|number| PackedEntity {
            number,
            model_index: 1,
            ..NULL_ENTITY_STATE
        })
        .collect()
}

fuzz_target!(|data: &[u8]| {
    let Some((&selector, payload)) = data.split_first() else {
        return;
    };
    let protocol = if selector & 1 == 0 {
        ProtocolVersion::Legacy
    } else {
        ProtocolVersion::Precise
    };
    let config = CodecConfig::for_testing().with_protocol(protocol);
    let Ok(mut session) = Session::new(config.clone()) else {
        return;
    };
    let Ok(msg) = session.receive(payload) else {
        return;
    };

    match selector % 6 / 2 {
        0 => {
            let old = baseline();
            if let Ok(new) = read_packet_entities(msg, &old, &config) {
                assert!(new.windows(2).all(|pair| pair[0].number < pair[1].number));
            }
        }
        1 => {
            let _ = read_delta_player_state(msg, &NULL_PLAYER_STATE, &config);
        }
        _ => {
            let _ = read_delta_usercmd(msg, &NULL_USER_CMD);
        }
    }
});
