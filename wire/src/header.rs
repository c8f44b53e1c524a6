//! Delta headers: the parts of a delta read before any field.

use bitstream::MsgBuffer;

use crate::bits::{EntityBits, PlayerBits, PlayerExtraBits};
use crate::error::{WireError, WireResult};
use crate::protocol::ProtocolVersion;

/// Entity number reserved as the end-of-stream marker.
pub const ENTITY_TERMINATOR: u16 = 0;

/// Entity delta header: the entity number followed by its change mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityHeader {
    pub number: u16,
    pub bits: EntityBits,
}

impl EntityHeader {
    #[must_use]
    pub const fn new(number: u16, bits: EntityBits) -> Self {
        Self { number, bits }
    }

    /// Largest entity number representable in `number_bits`.
    #[must_use]
    pub const fn max_number(number_bits: u32) -> u16 {
        if number_bits >= 16 {
            u16::MAX
        } else {
            ((1u32 << number_bits) - 1) as u16
        }
    }

    /// Writes the header. `number_bits` comes from the negotiated limits.
    pub fn encode<B>(&self, msg: &mut MsgBuffer<B>, number_bits: u32) -> WireResult<()>
    where
        B: AsRef<[u8]> + AsMut<[u8]>,
    {
        if self.number == ENTITY_TERMINATOR {
            return Err(WireError::ZeroEntityNumber);
        }
        check_number(self.number, number_bits)?;
        validate_entity_bits(self.bits)?;
        msg.write_bits(i32::from(self.number), number_bits as i32)?;
        msg.write_bits(self.bits.raw() as i32, EntityBits::WIDTH as i32)?;
        Ok(())
    }

    /// Reads a header, or `None` at the stream terminator.
    pub fn decode<B>(msg: &mut MsgBuffer<B>, number_bits: u32) -> WireResult<Option<Self>>
    where
        B: AsRef<[u8]> + AsMut<[u8]>,
    {
        check_number_bits(number_bits)?;
        let number = msg.read_bits(number_bits as i32)? as u16;
        if number == ENTITY_TERMINATOR {
            return Ok(None);
        }
        let bits = EntityBits::from_raw(msg.read_bits(EntityBits::WIDTH as i32)? as u32);
        validate_entity_bits(bits)?;
        Ok(Some(Self { number, bits }))
    }
}

/// Writes the zero entity number that ends an entity stream.
pub fn encode_entity_terminator<B>(msg: &mut MsgBuffer<B>, number_bits: u32) -> WireResult<()>
where
    B: AsRef<[u8]> + AsMut<[u8]>,
{
    check_number_bits(number_bits)?;
    msg.write_bits(i32::from(ENTITY_TERMINATOR), number_bits as i32)?;
    Ok(())
}

/// Rejects entity numbers that do not fit in `number_bits`.
pub fn check_number(number: u16, number_bits: u32) -> WireResult<()> {
    check_number_bits(number_bits)?;
    if number > EntityHeader::max_number(number_bits) {
        return Err(WireError::EntityNumberOutOfRange {
            number,
            max: EntityHeader::max_number(number_bits),
        });
    }
    Ok(())
}

fn check_number_bits(number_bits: u32) -> WireResult<()> {
    if !(1..=16).contains(&number_bits) {
        return Err(WireError::InvalidNumberBits { bits: number_bits });
    }
    Ok(())
}

fn validate_entity_bits(bits: EntityBits) -> WireResult<()> {
    bits.validate()?;
    if bits.is_removal() && bits.intersects(EntityBits::FIELD_MASK) {
        return Err(WireError::RemovalWithFields { bits: bits.raw() });
    }
    Ok(())
}

/// Player-state delta header: the main word and, under the precise
/// protocol, the extension word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlayerStateHeader {
    pub bits: PlayerBits,
    pub extra: PlayerExtraBits,
}

impl PlayerStateHeader {
    #[must_use]
    pub const fn new(bits: PlayerBits, extra: PlayerExtraBits) -> Self {
        Self { bits, extra }
    }

    /// Header of a removal.
    #[must_use]
    pub const fn removal() -> Self {
        Self {
            bits: PlayerBits::from_raw(PlayerBits::REMOVE),
            extra: PlayerExtraBits::empty(),
        }
    }

    pub fn encode<B>(&self, msg: &mut MsgBuffer<B>, version: ProtocolVersion) -> WireResult<()>
    where
        B: AsRef<[u8]> + AsMut<[u8]>,
    {
        self.validate(version)?;
        msg.write_bits(self.bits.raw() as i32, PlayerBits::WIDTH as i32)?;
        if version.has_extension_word() {
            msg.write_bits(self.extra.raw() as i32, PlayerExtraBits::WIDTH as i32)?;
        }
        Ok(())
    }

    pub fn decode<B>(msg: &mut MsgBuffer<B>, version: ProtocolVersion) -> WireResult<Self>
    where
        B: AsRef<[u8]> + AsMut<[u8]>,
    {
        let bits = PlayerBits::from_raw(msg.read_bits(PlayerBits::WIDTH as i32)? as u32);
        let extra = if version.has_extension_word() {
            PlayerExtraBits::from_raw(msg.read_bits(PlayerExtraBits::WIDTH as i32)? as u32)
        } else {
            PlayerExtraBits::empty()
        };
        let header = Self { bits, extra };
        header.validate(version)?;
        Ok(header)
    }

    fn validate(&self, version: ProtocolVersion) -> WireResult<()> {
        self.bits.validate()?;
        self.extra.validate()?;
        if !version.has_extension_word() && !self.extra.is_empty() {
            return Err(WireError::ExtensionUnsupported { version });
        }
        if self.bits.is_removal()
            && (self.bits.intersects(PlayerBits::FIELD_MASK) || !self.extra.is_empty())
        {
            return Err(WireError::RemovalWithFields {
                bits: self.bits.raw(),
            });
        }
        Ok(())
    }
}
