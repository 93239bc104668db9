//! Message envelope for the opdec decoding engine.
//!
//! The capture reader hands the engine one [`RawMessage`] per message:
//! opcode, build, declared length and the flat payload. This crate checks
//! that envelope before any field is read. It does not know about field
//! layouts.
//!
//! # Design Principles
//!
//! - **Bounded input** - Payload sizes are validated against [`Limits`] up front.
//! - **No framing guesses** - A declared length that disagrees with the payload is rejected.
//! - **No domain knowledge** - This crate handles envelopes, not field tables.

mod error;
mod limits;
mod message;

pub use error::{EnvelopeError, EnvelopeResult, LimitKind};
pub use limits::Limits;
pub use message::RawMessage;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_api_exports() {
        let _ = Limits::default();
        let _ = LimitKind::MessageBytes;
        let _: EnvelopeResult<()> = Ok(());
    }

    #[test]
    fn limits_default_is_reasonable() {
        let limits = Limits::default();
        assert!(
            limits.max_message_bytes >= 64 * 1024,
            "default must fit a full character roster"
        );
    }
}
