//! Demultiplexed message envelope.

use protocol::{Opcode, ProtocolBuild};

use crate::error::{EnvelopeError, EnvelopeResult, LimitKind};
use crate::limits::Limits;

/// One captured message, already demultiplexed and tagged by the capture
/// reader.
///
/// The payload is borrowed and never mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawMessage<'a> {
    /// Logical message type.
    pub opcode: Opcode,
    /// Build the message was captured on.
    pub build: ProtocolBuild,
    /// Length announced by the transport.
    pub declared_len: usize,
    /// Message body.
    pub payload: &'a [u8],
}

impl<'a> RawMessage<'a> {
    /// Creates an envelope whose declared length is the payload length.
    #[must_use]
    pub const fn new(opcode: Opcode, build: ProtocolBuild, payload: &'a [u8]) -> Self {
        Self {
            opcode,
            build,
            declared_len: payload.len(),
            payload,
        }
    }

    /// Overrides the declared length.
    #[must_use]
    pub const fn with_declared_len(self, declared_len: usize) -> Self {
        Self {
            declared_len,
            ..self
        }
    }

    /// Validates the envelope against `limits`.
    ///
    /// # Errors
    ///
    /// Returns [`EnvelopeError::LimitsExceeded`] if the payload exceeds
    /// `max_message_bytes` and [`EnvelopeError::LengthMismatch`] if the
    /// declared length differs from the payload length.
    pub fn validate(&self, limits: &Limits) -> EnvelopeResult<()> {
        if self.payload.len() > limits.max_message_bytes {
            return Err(EnvelopeError::LimitsExceeded {
                kind: LimitKind::MessageBytes,
                limit: limits.max_message_bytes,
                actual: self.payload.len(),
            });
        }
        if self.declared_len != self.payload.len() {
            return Err(EnvelopeError::LengthMismatch {
                declared: self.declared_len,
                actual: self.payload.len(),
            });
        }
        Ok(())
    }
}
