//! Fixed-capacity message buffer with a sub-byte bit cursor.

use crate::error::{BitError, BitResult};

/// Largest magnitude accepted for a single bit-level read or write.
pub const MAX_BITS: i32 = 32;

/// What happens when a write does not fit in the remaining capacity.
///
/// The policy is fixed when the buffer is constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OverflowPolicy {
    /// Mark the buffer overflowed and silently drop this and every later write.
    Allow,
    /// Mark the buffer overflowed and fail the write. The message must be abandoned.
    #[default]
    Fatal,
}

/// A message buffer bound to fixed-capacity backing storage.
///
/// Bits are packed least-significant first: the first bit written lands in
/// bit 0 of byte 0. A byte-aligned 16- or 32-bit write therefore produces
/// little-endian bytes.
///
/// Writes never touch storage past the capacity, and reads never look past
/// the written length.
#[derive(Debug, Clone)]
pub struct MsgBuffer<B = Vec<u8>> {
    data: B,
    /// Bits written since the last clear.
    write_pos: usize,
    /// Bits consumed since the last `begin_reading`.
    read_pos: usize,
    overflowed: bool,
    oob: bool,
    policy: OverflowPolicy,
}

impl MsgBuffer<Vec<u8>> {
    /// Allocates a zeroed buffer of `capacity` bytes.
    pub fn with_capacity(capacity: usize, policy: OverflowPolicy) -> BitResult<Self> {
        Self::new(vec![0; capacity], policy)
    }
}

impl<B> MsgBuffer<B>
where
    B: AsRef<[u8]> + AsMut<[u8]>,
{
    /// Binds a buffer to `storage`. The capacity is the storage length.
    ///
    /// # Errors
    ///
    /// Returns [`BitError::ZeroCapacity`] for empty storage.
    pub fn new(storage: B, policy: OverflowPolicy) -> BitResult<Self> {
        if storage.as_ref().is_empty() {
            return Err(BitError::ZeroCapacity);
        }
        Ok(Self {
            data: storage,
            write_pos: 0,
            read_pos: 0,
            overflowed: false,
            oob: false,
            policy,
        })
    }

    /// Binds an out-of-band buffer, which only moves whole bytes.
    pub fn new_oob(storage: B, policy: OverflowPolicy) -> BitResult<Self> {
        let mut buffer = Self::new(storage, policy)?;
        buffer.oob = true;
        Ok(buffer)
    }

    /// Returns the capacity in bytes.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.data.as_ref().len()
    }

    /// Returns the number of bytes touched by writes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.write_pos.div_ceil(8)
    }

    /// Returns `true` if nothing has been written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.write_pos == 0
    }

    /// Returns the sub-byte write cursor (`0..8`).
    #[must_use]
    pub fn bit(&self) -> u8 {
        (self.write_pos % 8) as u8
    }

    /// Returns the number of bits written.
    #[must_use]
    pub fn bits_written(&self) -> usize {
        self.write_pos
    }

    /// Returns the number of bytes touched by reads.
    #[must_use]
    pub fn read_count(&self) -> usize {
        self.read_pos.div_ceil(8)
    }

    /// Returns the number of bits consumed by reads.
    #[must_use]
    pub fn bits_read(&self) -> usize {
        self.read_pos
    }

    /// Returns the number of bits left to read.
    #[must_use]
    pub fn bits_remaining(&self) -> usize {
        (self.len() * 8).saturating_sub(self.read_pos)
    }

    /// Returns `true` once a write has failed to fit.
    #[must_use]
    pub fn overflowed(&self) -> bool {
        self.overflowed
    }

    /// Returns `true` if the buffer carries an out-of-band payload.
    #[must_use]
    pub fn is_oob(&self) -> bool {
        self.oob
    }

    /// Returns the overflow policy chosen at construction.
    #[must_use]
    pub fn policy(&self) -> OverflowPolicy {
        self.policy
    }

    /// Returns the written bytes. A trailing partial byte is zero-padded.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data.as_ref()[..self.len()]
    }

    /// Releases the backing storage.
    pub fn into_inner(self) -> B {
        self.data
    }

    /// Resets size, cursors and the overflow flag without touching storage.
    pub fn clear(&mut self) {
        self.write_pos = 0;
        self.read_pos = 0;
        self.overflowed = false;
    }

    /// Replaces the contents with a received message and rewinds the read cursor.
    pub fn load(&mut self, bytes: &[u8]) -> BitResult<()> {
        self.clear();
        if bytes.len() > self.capacity() {
            self.overflowed = true;
            return Err(BitError::Overflow {
                requested: bytes.len() * 8,
                available: self.capacity() * 8,
            });
        }
        self.data.as_mut()[..bytes.len()].copy_from_slice(bytes);
        self.write_pos = bytes.len() * 8;
        Ok(())
    }

    /// Writes the low `|bits|` bits of `value`.
    ///
    /// The sign of `bits` only matters on read. A width of zero is a no-op.
    pub fn write_bits(&mut self, value: i32, bits: i32) -> BitResult<()> {
        let width = self.check_width(bits)?;
        if width == 0 {
            return Ok(());
        }
        if !self.reserve(width as usize)? {
            return Ok(());
        }
        self.put_bits(value as u32, width);
        Ok(())
    }

    /// Writes raw bytes, byte-aligned or not.
    pub fn write_bytes(&mut self, bytes: &[u8]) -> BitResult<()> {
        if bytes.is_empty() {
            return Ok(());
        }
        if !self.reserve(bytes.len() * 8)? {
            return Ok(());
        }
        self.put_bytes(bytes);
        Ok(())
    }

    /// Writes `bytes` followed by a zero byte as one write.
    pub(crate) fn write_terminated(&mut self, bytes: &[u8]) -> BitResult<()> {
        if !self.reserve((bytes.len() + 1) * 8)? {
            return Ok(());
        }
        self.put_bytes(bytes);
        self.put_bytes(&[0]);
        Ok(())
    }

    fn put_bytes(&mut self, bytes: &[u8]) {
        if self.write_pos % 8 == 0 {
            let start = self.write_pos / 8;
            self.data.as_mut()[start..start + bytes.len()].copy_from_slice(bytes);
            self.write_pos += bytes.len() * 8;
        } else {
            for &byte in bytes {
                self.put_bits(u32::from(byte), 8);
            }
        }
    }

    /// Rewinds the read cursor for a framed protocol message.
    pub fn begin_reading(&mut self) {
        self.read_pos = 0;
        self.oob = false;
    }

    /// Rewinds the read cursor for an opaque out-of-band payload.
    pub fn begin_reading_oob(&mut self) {
        self.read_pos = 0;
        self.oob = true;
    }

    /// Reads `|bits|` bits. A negative width sign-extends the result.
    pub fn read_bits(&mut self, bits: i32) -> BitResult<i32> {
        let width = self.check_width(bits)?;
        if width == 0 {
            return Ok(0);
        }
        self.ensure_readable(width as usize)?;
        let raw = self.take_bits(width);
        if bits < 0 && width < 32 {
            let shift = 32 - width;
            Ok(((raw << shift) as i32) >> shift)
        } else {
            Ok(raw as i32)
        }
    }

    /// Fills `out` with the next `out.len()` bytes.
    pub fn read_data(&mut self, out: &mut [u8]) -> BitResult<()> {
        if out.is_empty() {
            return Ok(());
        }
        self.ensure_readable(out.len() * 8)?;
        if self.read_pos % 8 == 0 {
            let start = self.read_pos / 8;
            out.copy_from_slice(&self.data.as_ref()[start..start + out.len()]);
            self.read_pos += out.len() * 8;
        } else {
            for byte in out.iter_mut() {
                *byte = self.take_bits(8) as u8;
            }
        }
        Ok(())
    }

    fn check_width(&self, bits: i32) -> BitResult<u32> {
        let width = bits.unsigned_abs();
        if width > MAX_BITS.unsigned_abs() {
            return Err(BitError::InvalidBitCount {
                bits,
                max_bits: MAX_BITS,
            });
        }
        if self.oob && !matches!(width, 0 | 8 | 16 | 32) {
            return Err(BitError::OutOfBandWidth { bits });
        }
        Ok(width)
    }

    /// Applies the overflow policy. `Ok(false)` means the write is dropped.
    fn reserve(&mut self, bits: usize) -> BitResult<bool> {
        let available = self.capacity() * 8 - self.write_pos;
        if !self.overflowed && bits <= available {
            return Ok(true);
        }
        self.overflowed = true;
        match self.policy {
            OverflowPolicy::Allow => Ok(false),
            OverflowPolicy::Fatal => Err(BitError::Overflow {
                requested: bits,
                available,
            }),
        }
    }

    fn ensure_readable(&self, bits: usize) -> BitResult<()> {
        let available = self.bits_remaining();
        if bits > available {
            return Err(BitError::EndOfMessage {
                requested: bits,
                available,
            });
        }
        Ok(())
    }

    fn put_bits(&mut self, mut value: u32, width: u32) {
        let data = self.data.as_mut();
        let mut pos = self.write_pos;
        let mut remaining = width;
        while remaining > 0 {
            let byte = pos / 8;
            let offset = (pos % 8) as u32;
            if offset == 0 {
                // Stale bytes from an earlier message must not leak into this one.
                data[byte] = 0;
            }
            let take = (8 - offset).min(remaining);
            let chunk = (value & ((1u32 << take) - 1)) as u8;
            data[byte] |= chunk << offset;
            value = value.checked_shr(take).unwrap_or(0);
            remaining -= take;
            pos += take as usize;
        }
        self.write_pos = pos;
    }

    fn take_bits(&mut self, width: u32) -> u32 {
        let data = self.data.as_ref();
        let mut pos = self.read_pos;
        let mut value = 0u32;
        let mut filled = 0u32;
        while filled < width {
            let byte = data[pos / 8];
            let offset = (pos % 8) as u32;
            let take = (8 - offset).min(width - filled);
            let chunk = (u32::from(byte) >> offset) & ((1u32 << take) - 1);
            value |= chunk << filled;
            filled += take;
            pos += take as usize;
        }
        self.read_pos = pos;
        value
    }
}
