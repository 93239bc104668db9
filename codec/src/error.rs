//! Error types for codec operations.

use std::fmt;

use bitstream::BitError;
use protocol::{BuildRange, Opcode, ProtocolBuild, ProtocolError};
use wire::EnvelopeError;

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// Errors that can occur while building the catalogue or decoding a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// The message buffer ran out mid-read.
    OutOfData { requested: usize, available: usize },

    /// Bitstream error other than running out of data.
    Bitstream(BitError),

    /// Envelope validation failed before any field was read.
    Envelope(EnvelopeError),

    /// No registered procedure covers this opcode at this build.
    UnsupportedVersion {
        opcode: Opcode,
        build: ProtocolBuild,
    },

    /// A repeat count implies more data than the message still holds.
    MalformedCount {
        field: &'static str,
        count: i64,
        needed_bits: usize,
        available_bits: usize,
    },

    /// Two registrations for one opcode cover a common build.
    RegistrationConflict {
        opcode: Opcode,
        existing: BuildRange,
        conflicting: BuildRange,
    },

    /// A registration range whose lower bound is not below its upper bound.
    EmptyRange {
        from: ProtocolBuild,
        to: ProtocolBuild,
    },

    /// An opcode name outside the catalogue.
    UnknownOpcode { name: String },

    /// Limits exceeded.
    LimitsExceeded {
        kind: LimitKind,
        limit: usize,
        actual: usize,
    },
}

/// Specific limit that was exceeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitKind {
    ListEntries,
    InflatedBytes,
    RedispatchDepth,
}

impl CodecError {
    /// Returns `true` if the message ended before its layout did.
    ///
    /// A count that cannot fit in the remaining buffer is classed with
    /// plain exhaustion.
    #[must_use]
    pub const fn is_out_of_data(&self) -> bool {
        matches!(self, Self::OutOfData { .. } | Self::MalformedCount { .. })
    }

    /// Returns `true` for catalogue configuration defects.
    #[must_use]
    pub const fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::RegistrationConflict { .. } | Self::EmptyRange { .. }
        )
    }
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfData {
                requested,
                available,
            } => {
                write!(
                    f,
                    "out of data: needed {requested} bits, {available} bits left"
                )
            }
            Self::Bitstream(e) => write!(f, "bitstream error: {e}"),
            Self::Envelope(e) => write!(f, "envelope error: {e}"),
            Self::UnsupportedVersion { opcode, build } => {
                write!(f, "no handler for {opcode} at build {build}")
            }
            Self::MalformedCount {
                field,
                count,
                needed_bits,
                available_bits,
            } => {
                write!(
                    f,
                    "malformed count {count} for {field}: needs at least {needed_bits} bits, {available_bits} left"
                )
            }
            Self::RegistrationConflict {
                opcode,
                existing,
                conflicting,
            } => {
                write!(
                    f,
                    "overlapping registrations for {opcode}: {existing} and {conflicting}"
                )
            }
            Self::EmptyRange { from, to } => {
                write!(f, "empty build range [{}, {})", from.raw(), to.raw())
            }
            Self::UnknownOpcode { name } => write!(f, "unknown opcode {name:?}"),
            Self::LimitsExceeded {
                kind,
                limit,
                actual,
            } => {
                write!(f, "{kind} limit exceeded: {actual} > {limit}")
            }
        }
    }
}

impl fmt::Display for LimitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::ListEntries => "list entries",
            Self::InflatedBytes => "inflated bytes",
            Self::RedispatchDepth => "redispatch depth",
        };
        write!(f, "{name}")
    }
}

impl std::error::Error for CodecError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Bitstream(e) => Some(e),
            Self::Envelope(e) => Some(e),
            _ => None,
        }
    }
}

impl From<BitError> for CodecError {
    fn from(err: BitError) -> Self {
        match err {
            BitError::OutOfData {
                requested,
                available,
            } => Self::OutOfData {
                requested,
                available,
            },
            other => Self::Bitstream(other),
        }
    }
}

impl From<EnvelopeError> for CodecError {
    fn from(err: EnvelopeError) -> Self {
        Self::Envelope(err)
    }
}

impl From<ProtocolError> for CodecError {
    fn from(err: ProtocolError) -> Self {
        match err {
            ProtocolError::EmptyRange { from, to } => Self::EmptyRange { from, to },
            ProtocolError::UnknownOpcode { name } => Self::UnknownOpcode { name },
        }
    }
}
