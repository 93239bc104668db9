//! Versioned opcode decoding engine.
//!
//! This crate ties the [`bitstream`] cursor, the [`protocol`] value types and
//! the [`wire`] envelope together: a [`Registry`] maps `(opcode, build)` to
//! one decoding procedure, [`decode_message`] runs it against a
//! [`StructuredSink`] and the cross-message registries in [`StateHandles`].
//!
//! # Features
//!
//! - Build-range dispatch with overlap detection at registration
//! - Obfuscated identifier reconstruction ([`IdentifierBuilder`])
//! - Character roster, currency, level and session message catalogue
//! - Compressed rosters inflated and redispatched in place
//! - Partial results kept and flagged when a message is truncated
//!
//! # Design Principles
//!
//! - **No panics on untrusted input** - Every count is checked against the
//!   remaining data and the configured limits before anything is allocated.
//! - **Literal layouts** - Each procedure is one read per line in wire
//!   order.
//! - **Explicit state** - Registries are passed in, never global.
//!
//! # Example
//!
//! ```
//! use codec::{catalogue, decode_message, CodecLimits, InMemoryState, RecordTree, WireLimits};
//! use protocol::{Opcode, ProtocolBuild};
//! use wire::RawMessage;
//!
//! let registry = catalogue().unwrap();
//! let state = InMemoryState::new();
//! let mut tree = RecordTree::new();
//!
//! let payload = 3i32.to_le_bytes();
//! let message = RawMessage::new(
//!     Opcode::CmsgStandStateChange,
//!     ProtocolBuild::V4_3_4_15595,
//!     &payload,
//! );
//! let summary = decode_message(
//!     &registry,
//!     &message,
//!     &mut tree,
//!     state.handles(),
//!     &WireLimits::default(),
//!     &CodecLimits::default(),
//! )
//! .unwrap();
//!
//! assert_eq!(summary.handler, "stand_state_change");
//! assert_eq!(tree.field_count(), 1);
//! ```

mod error;
mod guid;
mod handlers;
mod limits;
mod message;
mod registry;
mod sink;
mod state;

pub use error::{CodecError, CodecResult, LimitKind};
pub use guid::{read_packed_identifier, IdentifierBuilder, NATURAL_ORDER};
pub use handlers::{catalogue, register_all};
pub use limits::CodecLimits;
pub use message::{decode_message, DecodeSummary, MessageDecoder};
pub use registry::{DecodeFn, Registration, Registry, RegistryBuilder};
pub use sink::{FieldValue, RecordNode, RecordTree, StructuredSink};
pub use state::{
    EntityAttributes, EntityKind, EntityRecord, InMemoryState, NameRegistry, ObjectRegistry,
    SessionRegistry, StateHandles, StateSnapshot,
};
pub use wire::Limits as WireLimits;
