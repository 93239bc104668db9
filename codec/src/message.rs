//! Per-message decoding context and the decode entry point.

use bitstream::BitCursor;
use log::{debug, trace, warn};
use protocol::{Identifier, Opcode, ProtocolBuild};
use wire::RawMessage;

use crate::error::{CodecError, CodecResult, LimitKind};
use crate::guid::{read_packed_identifier, IdentifierBuilder};
use crate::limits::CodecLimits;
use crate::registry::Registry;
use crate::sink::{FieldValue, StructuredSink};
use crate::state::StateHandles;

/// Outcome of a successful [`decode_message`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct DecodeSummary {
    pub opcode: Opcode,
    pub build: ProtocolBuild,
    /// Name of the procedure that ran.
    pub handler: &'static str,
    /// Bytes the procedure left unread.
    pub trailing_bytes: usize,
}

/// Decodes one message.
///
/// The envelope is validated, the procedure for `(opcode, build)` is
/// resolved and run over a fresh cursor. If the procedure fails, every list
/// it left open is closed, the sink is marked incomplete and the error is
/// returned; fields already recorded are kept.
///
/// # Errors
///
/// Returns [`CodecError::Envelope`] for a bad envelope,
/// [`CodecError::UnsupportedVersion`] when no procedure covers the build
/// (nothing is recorded), and whatever the procedure fails with.
pub fn decode_message(
    registry: &Registry,
    message: &RawMessage<'_>,
    sink: &mut dyn StructuredSink,
    state: StateHandles<'_>,
    wire_limits: &wire::Limits,
    limits: &CodecLimits,
) -> CodecResult<DecodeSummary> {
    message.validate(wire_limits)?;

    let registration = registry
        .resolve(message.opcode, message.build)
        .map_err(|err| {
            warn!("skipping {} at build {}: {err}", message.opcode, message.build);
            err
        })?;
    debug!(
        "decoding {} at build {} with {}",
        message.opcode, message.build, registration.name
    );

    let mut decoder = MessageDecoder {
        cursor: BitCursor::new(message.payload),
        sink,
        state,
        registry,
        limits,
        opcode: message.opcode,
        build: message.build,
        open_lists: 0,
        redispatch_depth: 0,
    };

    if let Err(err) = (registration.decode)(&mut decoder) {
        decoder.abort(&err);
        warn!(
            "{} at build {} decoded partially: {err}",
            message.opcode, message.build
        );
        return Err(err);
    }

    let trailing_bytes = decoder.cursor.bytes_remaining();
    if trailing_bytes > 0 {
        warn!(
            "{} at build {} left {trailing_bytes} bytes unread",
            message.opcode, message.build
        );
    }

    Ok(DecodeSummary {
        opcode: message.opcode,
        build: message.build,
        handler: registration.name,
        trailing_bytes,
    })
}

/// Context threaded through a decoding procedure.
///
/// Every read goes through the combinators here, which consume from the
/// cursor and record under a field name in one step.
pub struct MessageDecoder<'a> {
    cursor: BitCursor<'a>,
    sink: &'a mut dyn StructuredSink,
    state: StateHandles<'a>,
    registry: &'a Registry,
    limits: &'a CodecLimits,
    opcode: Opcode,
    build: ProtocolBuild,
    open_lists: usize,
    redispatch_depth: usize,
}

impl<'a> MessageDecoder<'a> {
    /// Returns the opcode being decoded.
    #[must_use]
    pub const fn opcode(&self) -> Opcode {
        self.opcode
    }

    /// Returns the build the message was captured on.
    #[must_use]
    pub const fn build(&self) -> ProtocolBuild {
        self.build
    }

    /// Returns the cross-message registries.
    #[must_use]
    pub const fn state(&self) -> StateHandles<'a> {
        self.state
    }

    /// Returns the cursor, for identifier bits and bytes.
    pub fn cursor(&mut self) -> &mut BitCursor<'a> {
        &mut self.cursor
    }

    /// Records a value that was not read directly, such as a field
    /// assembled from earlier reads.
    pub fn record(&mut self, name: &'static str, value: FieldValue, indices: &[usize]) {
        self.sink.record(name, value, indices);
    }

    /// Records an identifier.
    pub fn record_identifier(&mut self, name: &'static str, id: Identifier, indices: &[usize]) {
        self.record(name, FieldValue::Identifier(id), indices);
    }

    pub fn read_u8(&mut self, name: &'static str, indices: &[usize]) -> CodecResult<u8> {
        let value = self.cursor.read_u8()?;
        self.record(name, FieldValue::UInt(value.into()), indices);
        Ok(value)
    }

    pub fn read_u32(&mut self, name: &'static str, indices: &[usize]) -> CodecResult<u32> {
        let value = self.cursor.read_u32()?;
        self.record(name, FieldValue::UInt(value.into()), indices);
        Ok(value)
    }

    pub fn read_i32(&mut self, name: &'static str, indices: &[usize]) -> CodecResult<i32> {
        let value = self.cursor.read_i32()?;
        self.record(name, FieldValue::Int(value.into()), indices);
        Ok(value)
    }

    pub fn read_f32(&mut self, name: &'static str, indices: &[usize]) -> CodecResult<f32> {
        let value = self.cursor.read_f32()?;
        self.record(name, FieldValue::Float(value), indices);
        Ok(value)
    }

    /// Reads a byte-sized boolean.
    pub fn read_bool(&mut self, name: &'static str, indices: &[usize]) -> CodecResult<bool> {
        let value = self.cursor.read_bool()?;
        self.record(name, FieldValue::Bool(value), indices);
        Ok(value)
    }

    /// Reads a single bit flag.
    pub fn read_flag(&mut self, name: &'static str, indices: &[usize]) -> CodecResult<bool> {
        let value = self.cursor.read_bit()?;
        self.record(name, FieldValue::Bool(value), indices);
        Ok(value)
    }

    /// Reads a bit-packed unsigned field.
    pub fn read_bits(
        &mut self,
        name: &'static str,
        bits: u8,
        indices: &[usize],
    ) -> CodecResult<u64> {
        let value = self.cursor.read_bits(bits)?;
        self.record(name, FieldValue::UInt(value), indices);
        Ok(value)
    }

    /// Reads a NUL-terminated string.
    pub fn read_cstring(&mut self, name: &'static str, indices: &[usize]) -> CodecResult<String> {
        let bytes = self.cursor.read_cstring()?;
        let value = String::from_utf8_lossy(&bytes).into_owned();
        self.record(name, FieldValue::Str(value.clone()), indices);
        Ok(value)
    }

    /// Reads a string whose length was announced earlier.
    pub fn read_fixed_string(
        &mut self,
        name: &'static str,
        length: usize,
        indices: &[usize],
    ) -> CodecResult<String> {
        let bytes = self.cursor.read_fixed_string(length)?;
        let value = String::from_utf8_lossy(&bytes).into_owned();
        self.record(name, FieldValue::Str(value.clone()), indices);
        Ok(value)
    }

    /// Reads three consecutive floats as one position.
    pub fn read_vector3(
        &mut self,
        name: &'static str,
        indices: &[usize],
    ) -> CodecResult<[f32; 3]> {
        let x = self.cursor.read_f32()?;
        let y = self.cursor.read_f32()?;
        let z = self.cursor.read_f32()?;
        self.record(name, FieldValue::Vector3 { x, y, z }, indices);
        Ok([x, y, z])
    }

    /// Reads a plain little-endian 64-bit identifier.
    pub fn read_identifier(
        &mut self,
        name: &'static str,
        indices: &[usize],
    ) -> CodecResult<Identifier> {
        let id = Identifier::new(self.cursor.read_u64()?);
        self.record_identifier(name, id, indices);
        Ok(id)
    }

    /// Reads a mask-packed identifier.
    pub fn read_packed_identifier(
        &mut self,
        name: &'static str,
        indices: &[usize],
    ) -> CodecResult<Identifier> {
        let id = read_packed_identifier(&mut self.cursor)?;
        self.record_identifier(name, id, indices);
        Ok(id)
    }

    /// Reads one presence bit of an obfuscated identifier.
    pub fn mark(&mut self, guid: &mut IdentifierBuilder, index: u8) -> CodecResult<bool> {
        Ok(guid.mark_present(&mut self.cursor, index)?)
    }

    /// Absorbs one byte of an obfuscated identifier if it was transmitted.
    pub fn absorb(&mut self, guid: &mut IdentifierBuilder, index: u8) -> CodecResult<()> {
        guid.absorb(&mut self.cursor, index)?;
        Ok(())
    }

    /// Absorbs several bytes of an obfuscated identifier in sequence.
    pub fn absorb_all(&mut self, guid: &mut IdentifierBuilder, indices: &[u8]) -> CodecResult<()> {
        Ok(guid.absorb_all(&mut self.cursor, indices)?)
    }

    /// Consumes bits with no known meaning.
    pub fn skip_bits(&mut self, bits: u8) -> CodecResult<()> {
        self.cursor.read_bits(bits)?;
        Ok(())
    }

    /// Consumes a byte with no known meaning.
    pub fn skip_u8(&mut self) -> CodecResult<()> {
        self.cursor.read_u8()?;
        Ok(())
    }

    /// Opens a nested list.
    pub fn begin_list(&mut self, name: &'static str, indices: &[usize]) {
        self.sink.begin_list(name, indices);
        self.open_lists += 1;
    }

    /// Closes the innermost list.
    pub fn end_list(&mut self) {
        if self.open_lists > 0 {
            self.sink.end_list();
            self.open_lists -= 1;
        }
    }

    /// Runs `body` inside a list. On failure the list stays open and is
    /// closed when the message is aborted.
    pub fn list<T>(
        &mut self,
        name: &'static str,
        indices: &[usize],
        body: impl FnOnce(&mut Self) -> CodecResult<T>,
    ) -> CodecResult<T> {
        self.begin_list(name, indices);
        let value = body(self)?;
        self.end_list();
        Ok(value)
    }

    /// Validates an untrusted repeat count before anything is allocated
    /// for it.
    ///
    /// `min_entry_bits` is the smallest wire size one entry can have.
    pub fn checked_count(
        &self,
        field: &'static str,
        count: i64,
        min_entry_bits: usize,
    ) -> CodecResult<usize> {
        let available_bits = self.cursor.bits_remaining();
        let Ok(entries) = usize::try_from(count) else {
            return Err(CodecError::MalformedCount {
                field,
                count,
                needed_bits: 0,
                available_bits,
            });
        };
        if entries > self.limits.max_list_entries {
            return Err(CodecError::LimitsExceeded {
                kind: LimitKind::ListEntries,
                limit: self.limits.max_list_entries,
                actual: entries,
            });
        }
        let needed_bits = entries.saturating_mul(min_entry_bits);
        if needed_bits > available_bits {
            return Err(CodecError::MalformedCount {
                field,
                count,
                needed_bits,
                available_bits,
            });
        }
        Ok(entries)
    }

    /// Replaces the rest of the message with its inflation.
    pub fn inflate_remaining(&mut self, declared_size: usize) -> CodecResult<()> {
        if declared_size > self.limits.max_inflated_bytes {
            return Err(CodecError::LimitsExceeded {
                kind: LimitKind::InflatedBytes,
                limit: self.limits.max_inflated_bytes,
                actual: declared_size,
            });
        }
        trace!(
            "inflating {} compressed bytes to {declared_size}",
            self.cursor.bytes_remaining()
        );
        self.cursor.inflate(declared_size)?;
        Ok(())
    }

    /// Continues decoding the current cursor with the procedure registered
    /// for `opcode` at this message's build.
    pub fn redispatch(&mut self, opcode: Opcode) -> CodecResult<()> {
        if self.redispatch_depth >= self.limits.max_redispatch_depth {
            return Err(CodecError::LimitsExceeded {
                kind: LimitKind::RedispatchDepth,
                limit: self.limits.max_redispatch_depth,
                actual: self.redispatch_depth + 1,
            });
        }
        let registration = *self.registry.resolve(opcode, self.build)?;
        debug!(
            "{} redispatching to {} ({})",
            self.opcode, opcode, registration.name
        );

        let outer = self.opcode;
        self.opcode = opcode;
        self.redispatch_depth += 1;
        let result = (registration.decode)(self);
        self.redispatch_depth -= 1;
        self.opcode = outer;
        result
    }

    fn abort(&mut self, err: &CodecError) {
        while self.open_lists > 0 {
            self.end_list();
        }
        self.sink.mark_incomplete(err);
    }
}
