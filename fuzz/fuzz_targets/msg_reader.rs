#![no_main]

use bitstream::{MsgBuffer, OverflowPolicy};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(mut msg) = MsgBuffer::with_capacity(data.len().max(1), OverflowPolicy::Fatal) else {
        return;
    };
    if msg.load(data).is_err() {
        return;
    }
    msg.begin_reading();
    let mut idx = 0usize;

    // Use input bytes to drive a bounded sequence of reads.
    while idx < data.len() && idx < 1024 {
        let op = data[idx] % 8;
        idx += 1;

        match op {
            0 => {
                let bits = i32::from(data[idx.saturating_sub(1)] % 65) - 32;
                let _ = msg.read_bits(bits);
            }
            1 => {
                let _ = msg.read_byte();
            }
            2 => {
                let _ = msg.read_short();
            }
            3 => {
                let _ = msg.read_long();
            }
            4 => {
                let _ = msg.read_float();
            }
            5 => {
                let _ = msg.read_angle16();
            }
            6 => {
                let _ = msg.read_coord();
            }
            _ => {
                let _ = msg.read_string();
            }
        }
    }
});
