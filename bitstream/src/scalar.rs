//! Typed scalar encodings on top of the raw bit API.
//!
//! Every scalar has a fixed width; strings are zero-terminated. Angles and
//! coordinates are the only lossy encodings.

use crate::buffer::MsgBuffer;
use crate::error::{BitError, BitResult};

/// Ordinary string budget in bytes, terminator included.
pub const MAX_STRING_CHARS: usize = 1024;

const ANGLE_STEPS: f64 = 65536.0;
const COORD_SCALE: f64 = 8.0;

/// Quantizes an angle in degrees to 16 bits. Any angle wraps into `[0, 360)`.
#[must_use]
pub fn angle_to_short(angle: f32) -> u16 {
    ((f64::from(angle) * ANGLE_STEPS / 360.0) as i64 & 0xFFFF) as u16
}

/// Expands a 16-bit angle back to degrees in `[0, 360)`.
#[must_use]
pub fn short_to_angle(raw: u16) -> f32 {
    (f64::from(raw) * 360.0 / ANGLE_STEPS) as f32
}

/// Quantizes a coordinate to 13.3 fixed point.
#[must_use]
pub fn coord_to_short(value: f32) -> i16 {
    (f64::from(value) * COORD_SCALE) as i32 as i16
}

/// Expands a 13.3 fixed-point coordinate.
#[must_use]
pub fn short_to_coord(raw: i16) -> f32 {
    f32::from(raw) / COORD_SCALE as f32
}

#[derive(Clone, Copy)]
enum StringEnd {
    Nul,
    NulOrNewline,
}

impl<B> MsgBuffer<B>
where
    B: AsRef<[u8]> + AsMut<[u8]>,
{
    pub fn write_char(&mut self, value: i8) -> BitResult<()> {
        self.write_bits(i32::from(value), 8)
    }

    pub fn write_byte(&mut self, value: u8) -> BitResult<()> {
        self.write_bits(i32::from(value), 8)
    }

    pub fn write_short(&mut self, value: i16) -> BitResult<()> {
        self.write_bits(i32::from(value), 16)
    }

    pub fn write_word(&mut self, value: u16) -> BitResult<()> {
        self.write_bits(i32::from(value), 16)
    }

    pub fn write_long(&mut self, value: i32) -> BitResult<()> {
        self.write_bits(value, 32)
    }

    /// Writes the IEEE-754 bit pattern. Round-trips exactly, NaN payloads included.
    pub fn write_float(&mut self, value: f32) -> BitResult<()> {
        self.write_bits(value.to_bits() as i32, 32)
    }

    pub fn write_angle16(&mut self, angle: f32) -> BitResult<()> {
        self.write_word(angle_to_short(angle))
    }

    pub fn write_coord(&mut self, value: f32) -> BitResult<()> {
        self.write_short(coord_to_short(value))
    }

    pub fn write_vector3(&mut self, value: [f32; 3]) -> BitResult<()> {
        for component in value {
            self.write_float(component)?;
        }
        Ok(())
    }

    pub fn write_data(&mut self, bytes: &[u8]) -> BitResult<()> {
        self.write_bytes(bytes)
    }

    /// Writes a zero-terminated string of at most `MAX_STRING_CHARS - 1` bytes.
    pub fn write_string(&mut self, value: &str) -> BitResult<()> {
        let bytes = check_string(value)?;
        if bytes.len() >= MAX_STRING_CHARS {
            return Err(BitError::StringTooLong {
                len: bytes.len(),
                max: MAX_STRING_CHARS - 1,
            });
        }
        self.write_terminated(bytes)
    }

    /// Writes a zero-terminated string limited only by the remaining capacity.
    pub fn write_big_string(&mut self, value: &str) -> BitResult<()> {
        let bytes = check_string(value)?;
        self.write_terminated(bytes)
    }

    pub fn read_char(&mut self) -> BitResult<i8> {
        Ok(self.read_bits(-8)? as i8)
    }

    pub fn read_byte(&mut self) -> BitResult<u8> {
        Ok(self.read_bits(8)? as u8)
    }

    pub fn read_short(&mut self) -> BitResult<i16> {
        Ok(self.read_bits(-16)? as i16)
    }

    pub fn read_word(&mut self) -> BitResult<u16> {
        Ok(self.read_bits(16)? as u16)
    }

    pub fn read_long(&mut self) -> BitResult<i32> {
        self.read_bits(32)
    }

    pub fn read_float(&mut self) -> BitResult<f32> {
        Ok(f32::from_bits(self.read_bits(32)? as u32))
    }

    pub fn read_angle16(&mut self) -> BitResult<f32> {
        Ok(short_to_angle(self.read_word()?))
    }

    pub fn read_coord(&mut self) -> BitResult<f32> {
        Ok(short_to_coord(self.read_short()?))
    }

    pub fn read_vector3(&mut self) -> BitResult<[f32; 3]> {
        Ok([self.read_float()?, self.read_float()?, self.read_float()?])
    }

    /// Reads an ordinary string. Invalid UTF-8 is replaced, not rejected.
    pub fn read_string(&mut self) -> BitResult<String> {
        self.read_terminated(Some(MAX_STRING_CHARS - 1), StringEnd::Nul)
    }

    /// Reads a string with no length cap.
    pub fn read_big_string(&mut self) -> BitResult<String> {
        self.read_terminated(None, StringEnd::Nul)
    }

    /// Reads an ordinary string that also ends at `\n`. The newline is consumed.
    pub fn read_string_line(&mut self) -> BitResult<String> {
        self.read_terminated(Some(MAX_STRING_CHARS - 1), StringEnd::NulOrNewline)
    }

    fn read_terminated(&mut self, max: Option<usize>, end: StringEnd) -> BitResult<String> {
        let mut bytes = Vec::new();
        loop {
            if self.bits_remaining() < 8 {
                return Err(BitError::UnterminatedString {
                    scanned: bytes.len(),
                });
            }
            let byte = self.read_byte()?;
            match (byte, end) {
                (0, _) | (b'\n', StringEnd::NulOrNewline) => break,
                _ => {}
            }
            if let Some(max) = max {
                if bytes.len() == max {
                    return Err(BitError::StringTooLong {
                        len: bytes.len() + 1,
                        max,
                    });
                }
            }
            bytes.push(byte);
        }
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

fn check_string(value: &str) -> BitResult<&[u8]> {
    let bytes = value.as_bytes();
    if let Some(position) = bytes.iter().position(|&b| b == 0) {
        return Err(BitError::InteriorNul { position });
    }
    Ok(bytes)
}
