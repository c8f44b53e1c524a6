use bitstream::{angle_to_short, short_to_angle, MsgBuffer, OverflowPolicy};
use proptest::prelude::*;

#[derive(Clone, Debug)]
enum Op {
    Bits { bits: i32, value: i32 },
    Char(i8),
    Byte(u8),
    Short(i16),
    Word(u16),
    Long(i32),
    Float(f32),
    Str(String),
}

fn expected_bits(bits: i32, value: i32) -> i32 {
    let width = bits.unsigned_abs();
    if width == 32 {
        return value;
    }
    let masked = (value as u32) & ((1u32 << width) - 1);
    if bits < 0 {
        let shift = 32 - width;
        ((masked << shift) as i32) >> shift
    } else {
        masked as i32
    }
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (prop_oneof![1i32..=32, -32i32..=-1], any::<i32>())
            .prop_map(|(bits, value)| Op::Bits { bits, value }),
        any::<i8>().prop_map(Op::Char),
        any::<u8>().prop_map(Op::Byte),
        any::<i16>().prop_map(Op::Short),
        any::<u16>().prop_map(Op::Word),
        any::<i32>().prop_map(Op::Long),
        any::<u32>().prop_map(|bits| Op::Float(f32::from_bits(bits))),
        "[a-zA-Z0-9 ]{0,40}".prop_map(Op::Str),
    ]
}

proptest! {
    #[test]
    fn prop_roundtrip_ops(ops in prop::collection::vec(op_strategy(), 1..64)) {
        let mut msg = MsgBuffer::with_capacity(4096, OverflowPolicy::Fatal).unwrap();

        for op in &ops {
            match op {
                Op::Bits { bits, value } => msg.write_bits(*value, *bits).unwrap(),
                Op::Char(v) => msg.write_char(*v).unwrap(),
                Op::Byte(v) => msg.write_byte(*v).unwrap(),
                Op::Short(v) => msg.write_short(*v).unwrap(),
                Op::Word(v) => msg.write_word(*v).unwrap(),
                Op::Long(v) => msg.write_long(*v).unwrap(),
                Op::Float(v) => msg.write_float(*v).unwrap(),
                Op::Str(s) => msg.write_string(s).unwrap(),
            }
        }

        msg.begin_reading();
        for op in &ops {
            match op {
                Op::Bits { bits, value } => {
                    prop_assert_eq!(msg.read_bits(*bits).unwrap(), expected_bits(*bits, *value));
                }
                Op::Char(v) => prop_assert_eq!(msg.read_char().unwrap(), *v),
                Op::Byte(v) => prop_assert_eq!(msg.read_byte().unwrap(), *v),
                Op::Short(v) => prop_assert_eq!(msg.read_short().unwrap(), *v),
                Op::Word(v) => prop_assert_eq!(msg.read_word().unwrap(), *v),
                Op::Long(v) => prop_assert_eq!(msg.read_long().unwrap(), *v),
                Op::Float(v) => prop_assert_eq!(msg.read_float().unwrap().to_bits(), v.to_bits()),
                Op::Str(s) => prop_assert_eq!(&msg.read_string().unwrap(), s),
            }
        }
        prop_assert!(msg.bits_remaining() < 8);
    }

    #[test]
    fn prop_angle_error_bound(angle in 0.0f32..360.0) {
        let step = 360.0 / 65536.0;
        let decoded = short_to_angle(angle_to_short(angle));
        let error = (f64::from(decoded) - f64::from(angle)).abs();
        // f32 rounding of the decoded value adds at most a few ulps near 360.
        prop_assert!(error <= step + 1e-4, "angle {} decoded to {}", angle, decoded);
    }

    #[test]
    fn prop_overflow_never_exceeds_capacity(
        capacity in 1usize..32,
        writes in prop::collection::vec((1i32..=32, any::<i32>()), 0..40),
    ) {
        let mut msg = MsgBuffer::with_capacity(capacity, OverflowPolicy::Allow).unwrap();
        for (bits, value) in writes {
            msg.write_bits(value, bits).unwrap();
            prop_assert!(msg.len() <= msg.capacity());
        }
    }
}
