//! Obfuscated identifier reconstruction.
//!
//! Identifiers in bit-packed messages travel as one presence bit per byte
//! followed, often much later, by the present bytes themselves. Each byte is
//! XOR-masked against the value assumed so far, which is zero for every
//! byte that has not been absorbed yet. Absent bytes are zero and never
//! appear on the wire.

use bitstream::{BitCursor, BitResult};
use protocol::Identifier;

/// Scratch state for one identifier while its message is being decoded.
///
/// The builder is created by [`begin`](Self::begin), fed presence bits and
/// then masked bytes in whatever order the layout dictates, and consumed by
/// [`finish`](Self::finish). Only the order of calls differs between
/// layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdentifierBuilder {
    bytes: [u8; 8],
    present: u8,
    order: [u8; 8],
}

/// Presence order `0..8`, for layouts that interleave presence bits with
/// other fields and mark each byte explicitly.
pub const NATURAL_ORDER: [u8; 8] = [0, 1, 2, 3, 4, 5, 6, 7];

impl Default for IdentifierBuilder {
    fn default() -> Self {
        Self::begin(NATURAL_ORDER)
    }
}

impl IdentifierBuilder {
    /// Starts an identifier whose presence bits arrive in `order` when read
    /// in a single pass.
    #[must_use]
    pub const fn begin(order: [u8; 8]) -> Self {
        Self {
            bytes: [0; 8],
            present: 0,
            order,
        }
    }

    /// Returns the declared presence-bit order.
    #[must_use]
    pub const fn order(&self) -> [u8; 8] {
        self.order
    }

    /// Reads one presence bit for byte `index`.
    ///
    /// Reading a second bit for the same byte replaces the first.
    pub fn mark_present(&mut self, cursor: &mut BitCursor<'_>, index: u8) -> BitResult<bool> {
        let present = cursor.read_bit()?;
        let mask = 1u8 << (index & 7);
        if present {
            self.present |= mask;
        } else {
            self.present &= !mask;
        }
        Ok(present)
    }

    /// Reads all eight presence bits in the declared order.
    pub fn read_presence(&mut self, cursor: &mut BitCursor<'_>) -> BitResult<()> {
        for index in self.order {
            self.mark_present(cursor, index)?;
        }
        Ok(())
    }

    /// Returns `true` if byte `index` was flagged as transmitted.
    #[must_use]
    pub const fn is_present(&self, index: u8) -> bool {
        self.present & (1 << (index & 7)) != 0
    }

    /// Folds the next stream byte into byte `index` if it was flagged as
    /// transmitted. Absent bytes consume nothing.
    pub fn absorb(&mut self, cursor: &mut BitCursor<'_>, index: u8) -> BitResult<Option<u8>> {
        if !self.is_present(index) {
            return Ok(None);
        }
        let slot = &mut self.bytes[usize::from(index & 7)];
        *slot = cursor.read_xor_byte(*slot)?;
        Ok(Some(*slot))
    }

    /// Absorbs several bytes in sequence.
    pub fn absorb_all(&mut self, cursor: &mut BitCursor<'_>, indices: &[u8]) -> BitResult<()> {
        for &index in indices {
            self.absorb(cursor, index)?;
        }
        Ok(())
    }

    /// Finalizes the identifier from its bytes in little-endian order.
    #[must_use]
    pub const fn finish(self) -> Identifier {
        Identifier::from_le_bytes(self.bytes)
    }
}

/// Reads a packed identifier: a byte mask followed by one byte for each set
/// bit, lowest byte first.
pub fn read_packed_identifier(cursor: &mut BitCursor<'_>) -> BitResult<Identifier> {
    let mask = cursor.read_u8()?;
    let mut bytes = [0u8; 8];
    for (index, byte) in bytes.iter_mut().enumerate() {
        if mask & (1 << index) != 0 {
            *byte = cursor.read_u8()?;
        }
    }
    Ok(Identifier::from_le_bytes(bytes))
}
