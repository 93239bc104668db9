//! Protocol value types for the opdec decoding engine.
//!
//! This crate defines the vocabulary shared by every layer:
//! - [`ProtocolBuild`], the totally ordered build number observed on a capture
//! - [`BuildRange`], the half-open build interval a decoding procedure covers
//! - [`Opcode`], the logical message type
//! - [`Identifier`], the 64-bit entity identifier produced by decoding
//! - [`catalogue_hash`], a deterministic fingerprint of a registration list
//!
//! # Design Principles
//!
//! - **Builds are opaque** - Only range membership is ever tested.
//! - **Explicit catalogue** - Opcodes are a closed enum, not discovered at runtime.
//! - **Deterministic hashing** - The fingerprint is stable given the same registrations.

mod build;
mod error;
mod hash;
mod identifier;
mod opcode;

pub use build::{BuildRange, ProtocolBuild};
pub use error::{ProtocolError, ProtocolResult};
pub use hash::catalogue_hash;
pub use identifier::Identifier;
pub use opcode::Opcode;

/// Response code signalling success in server replies.
pub const RESPONSE_SUCCESS: u8 = 0;
