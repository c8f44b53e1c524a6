use bitstream::{BitError, MsgBuffer, OverflowPolicy};

#[test]
fn borrowed_buffer_roundtrip_mixed() {
    let mut storage = [0u8; 64];
    let mut msg = MsgBuffer::new(&mut storage[..], OverflowPolicy::Fatal).unwrap();
    msg.write_bits(1, 1).unwrap();
    msg.write_byte(0xAB).unwrap();
    msg.write_short(-12345).unwrap();
    msg.write_long(0x0102_0304).unwrap();
    msg.write_float(3.5).unwrap();
    msg.write_angle16(45.0).unwrap();
    msg.write_string("player").unwrap();
    msg.write_bits(-7, -6).unwrap();

    msg.begin_reading();
    assert_eq!(msg.read_bits(1).unwrap(), 1);
    assert_eq!(msg.read_byte().unwrap(), 0xAB);
    assert_eq!(msg.read_short().unwrap(), -12345);
    assert_eq!(msg.read_long().unwrap(), 0x0102_0304);
    assert_eq!(msg.read_float().unwrap(), 3.5);
    assert!((msg.read_angle16().unwrap() - 45.0).abs() < 0.01);
    assert_eq!(msg.read_string().unwrap(), "player");
    assert_eq!(msg.read_bits(-6).unwrap(), -7);
    assert!(msg.bits_remaining() < 8, "only padding left");
}

#[test]
fn transported_bytes_decode_in_fresh_buffer() {
    let mut tx = MsgBuffer::with_capacity(32, OverflowPolicy::Fatal).unwrap();
    tx.write_word(40000).unwrap();
    tx.write_bits(3, 2).unwrap();
    tx.write_coord(-64.5).unwrap();

    let mut rx = MsgBuffer::with_capacity(32, OverflowPolicy::Fatal).unwrap();
    rx.load(tx.as_bytes()).unwrap();
    assert_eq!(rx.read_word().unwrap(), 40000);
    assert_eq!(rx.read_bits(2).unwrap(), 3);
    assert_eq!(rx.read_coord().unwrap(), -64.5);
}

#[test]
fn oversized_string_respects_sentinels() {
    const SENTINEL: u8 = 0xA5;
    let mut backing = [SENTINEL; 64];
    {
        let mut msg = MsgBuffer::new(&mut backing[..10], OverflowPolicy::Allow).unwrap();
        let long = "z".repeat(500);
        msg.write_string(&long).unwrap();
        assert!(msg.overflowed(), "overflow flag must be set");
        assert!(msg.len() <= msg.capacity());
    }
    assert!(
        backing[10..].iter().all(|&b| b == SENTINEL),
        "bytes past the capacity must be untouched"
    );
}

#[test]
fn oversized_string_fails_under_fatal_policy() {
    let mut backing = [0u8; 16];
    let mut msg = MsgBuffer::new(&mut backing[..10], OverflowPolicy::Fatal).unwrap();
    let err = msg.write_big_string(&"q".repeat(500)).unwrap_err();
    assert!(matches!(err, BitError::Overflow { .. }));
    assert!(msg.overflowed());
}

#[test]
fn truncated_message_is_detected() {
    let mut msg = MsgBuffer::with_capacity(8, OverflowPolicy::Fatal).unwrap();
    msg.load(&[0x01, 0x02, 0x03]).unwrap();
    assert!(matches!(
        msg.read_long(),
        Err(BitError::EndOfMessage {
            requested: 32,
            available: 24
        })
    ));
}

#[test]
fn oob_payload_is_byte_oriented() {
    let mut msg = MsgBuffer::new_oob(vec![0u8; 16], OverflowPolicy::Fatal).unwrap();
    msg.write_long(-1).unwrap();
    msg.write_data(b"blob").unwrap();
    msg.begin_reading_oob();
    assert_eq!(msg.read_long().unwrap(), -1);
    let mut out = [0u8; 4];
    msg.read_data(&mut out).unwrap();
    assert_eq!(&out, b"blob");
    assert!(matches!(
        msg.read_bits(4),
        Err(BitError::OutOfBandWidth { bits: 4 })
    ));
}
