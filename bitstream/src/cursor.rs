//! Bit-granular cursor over a single message buffer.

use std::borrow::Cow;
use std::io::Read;

use flate2::read::ZlibDecoder;

use crate::error::{BitError, BitResult};

/// A bounds-checked cursor that consumes a message at bit granularity.
///
/// Bit reads draw from a one-byte cache, most significant bit first, and
/// fetch a fresh byte from the buffer when the cache is empty. Byte-level
/// reads always start at the next unread byte: the unread remainder of the
/// cached byte is padding that closes the bit region. Nothing else is
/// realigned implicitly.
///
/// The cursor never panics on malformed input; every read past the end of
/// the buffer returns [`BitError::OutOfData`].
#[derive(Debug, Clone)]
pub struct BitCursor<'a> {
    data: Cow<'a, [u8]>,
    byte_pos: usize,
    bit_cache: u8,
    /// Unread bits left in `bit_cache` (0-8).
    bits_left: u8,
}

impl BitCursor<'static> {
    /// Creates a cursor that owns its buffer.
    #[must_use]
    pub fn from_vec(data: Vec<u8>) -> Self {
        Self {
            data: Cow::Owned(data),
            byte_pos: 0,
            bit_cache: 0,
            bits_left: 0,
        }
    }
}

impl<'a> BitCursor<'a> {
    /// Creates a cursor over a borrowed message buffer.
    #[must_use]
    pub const fn new(data: &'a [u8]) -> Self {
        Self {
            data: Cow::Borrowed(data),
            byte_pos: 0,
            bit_cache: 0,
            bits_left: 0,
        }
    }

    /// Returns the length of the current buffer in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if the current buffer is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the number of whole bytes not yet touched by any read.
    #[must_use]
    pub fn bytes_remaining(&self) -> usize {
        self.data.len().saturating_sub(self.byte_pos)
    }

    /// Returns the number of bits still readable, including cached bits.
    #[must_use]
    pub fn bits_remaining(&self) -> usize {
        self.bytes_remaining()
            .saturating_mul(8)
            .saturating_add(usize::from(self.bits_left))
    }

    /// Returns the current bit position.
    #[must_use]
    pub fn bit_position(&self) -> usize {
        self.byte_pos * 8 - usize::from(self.bits_left)
    }

    /// Returns `true` once every byte of the buffer has been consumed.
    ///
    /// Unread bits in the last cached byte count as padding.
    #[must_use]
    pub fn is_at_end(&self) -> bool {
        self.byte_pos >= self.data.len()
    }

    /// Reads a single bit.
    pub fn read_bit(&mut self) -> BitResult<bool> {
        if self.bits_left == 0 {
            let Some(&byte) = self.data.get(self.byte_pos) else {
                return Err(BitError::OutOfData {
                    requested: 1,
                    available: 0,
                });
            };
            self.bit_cache = byte;
            self.byte_pos += 1;
            self.bits_left = 8;
        }
        self.bits_left -= 1;
        Ok((self.bit_cache >> self.bits_left) & 1 == 1)
    }

    /// Reads up to 64 bits, most significant bit first.
    pub fn read_bits(&mut self, bits: u8) -> BitResult<u64> {
        if bits > 64 {
            return Err(BitError::InvalidBitCount { bits, max_bits: 64 });
        }
        if bits == 0 {
            return Ok(0);
        }
        self.ensure_bits(usize::from(bits))?;

        let mut value = 0u64;
        for _ in 0..bits {
            value = (value << 1) | u64::from(self.read_bit()?);
        }
        Ok(value)
    }

    /// Ends the current bit region, discarding any cached bits.
    pub fn flush_bits(&mut self) {
        self.bits_left = 0;
    }

    /// Reads a byte.
    pub fn read_u8(&mut self) -> BitResult<u8> {
        let [byte] = self.read_array::<1>()?;
        Ok(byte)
    }

    /// Reads a byte-sized boolean (any non-zero value is `true`).
    pub fn read_bool(&mut self) -> BitResult<bool> {
        Ok(self.read_u8()? != 0)
    }

    /// Reads a little-endian `u16`.
    pub fn read_u16(&mut self) -> BitResult<u16> {
        Ok(u16::from_le_bytes(self.read_array()?))
    }

    /// Reads a little-endian `u32`.
    pub fn read_u32(&mut self) -> BitResult<u32> {
        Ok(u32::from_le_bytes(self.read_array()?))
    }

    /// Reads a little-endian `i32`.
    pub fn read_i32(&mut self) -> BitResult<i32> {
        Ok(i32::from_le_bytes(self.read_array()?))
    }

    /// Reads a little-endian `u64`.
    pub fn read_u64(&mut self) -> BitResult<u64> {
        Ok(u64::from_le_bytes(self.read_array()?))
    }

    /// Reads a little-endian IEEE-754 `f32`.
    pub fn read_f32(&mut self) -> BitResult<f32> {
        Ok(f32::from_le_bytes(self.read_array()?))
    }

    /// Reads a NUL-terminated string and returns the bytes before the
    /// terminator. The terminator is consumed.
    pub fn read_cstring(&mut self) -> BitResult<Vec<u8>> {
        self.flush_bits();
        let rest = &self.data[self.byte_pos.min(self.data.len())..];
        let Some(nul) = rest.iter().position(|&b| b == 0) else {
            return Err(BitError::OutOfData {
                requested: (rest.len() + 1) * 8,
                available: rest.len() * 8,
            });
        };
        let value = rest[..nul].to_vec();
        self.byte_pos += nul + 1;
        Ok(value)
    }

    /// Reads exactly `length` bytes verbatim.
    pub fn read_fixed_string(&mut self, length: usize) -> BitResult<Vec<u8>> {
        self.flush_bits();
        self.ensure_bytes(length)?;
        let value = self.data[self.byte_pos..self.byte_pos + length].to_vec();
        self.byte_pos += length;
        Ok(value)
    }

    /// Reads one byte and returns it XOR-ed with `target`.
    pub fn read_xor_byte(&mut self, target: u8) -> BitResult<u8> {
        Ok(self.read_u8()? ^ target)
    }

    /// Replaces the unread remainder of the buffer with its zlib inflation.
    ///
    /// Every remaining byte is treated as compressed input and must inflate
    /// to exactly `declared_size` bytes. A declared size of zero yields an
    /// empty buffer without touching the decompressor. The cursor is reset
    /// to the start of the inflated region.
    ///
    /// `declared_size` is preallocated, so callers bound it first.
    pub fn inflate(&mut self, declared_size: usize) -> BitResult<()> {
        self.flush_bits();
        let start = self.byte_pos.min(self.data.len());
        let inflated = if declared_size == 0 {
            Vec::new()
        } else {
            let compressed = &self.data[start..];
            let limit = u64::try_from(declared_size)
                .unwrap_or(u64::MAX)
                .saturating_add(1);
            let mut out = Vec::with_capacity(declared_size);
            ZlibDecoder::new(compressed)
                .take(limit)
                .read_to_end(&mut out)
                .map_err(|err| BitError::Inflate {
                    reason: err.to_string(),
                })?;
            if out.len() != declared_size {
                return Err(BitError::InflatedSizeMismatch {
                    declared: declared_size,
                    actual: out.len(),
                });
            }
            out
        };
        self.data = Cow::Owned(inflated);
        self.byte_pos = 0;
        self.bits_left = 0;
        Ok(())
    }

    fn ensure_bits(&self, bits: usize) -> BitResult<()> {
        let available = self.bits_remaining();
        if bits > available {
            return Err(BitError::OutOfData {
                requested: bits,
                available,
            });
        }
        Ok(())
    }

    fn ensure_bytes(&self, bytes: usize) -> BitResult<()> {
        let available = self.bytes_remaining();
        if bytes > available {
            return Err(BitError::OutOfData {
                requested: bytes.saturating_mul(8),
                available: available * 8,
            });
        }
        Ok(())
    }

    fn read_array<const N: usize>(&mut self) -> BitResult<[u8; N]> {
        self.flush_bits();
        self.ensure_bytes(N)?;
        let idx = self.byte_pos;
        let mut out = [0u8; N];
        out.copy_from_slice(&self.data[idx..idx + N]);
        self.byte_pos += N;
        Ok(out)
    }
}
