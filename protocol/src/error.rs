//! Protocol value-type errors.

use std::fmt;

use crate::ProtocolBuild;

/// Result type for protocol operations.
pub type ProtocolResult<T> = Result<T, ProtocolError>;

/// Errors that can occur when constructing protocol values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// A build range whose lower bound is not below its upper bound.
    EmptyRange {
        /// Inclusive lower bound.
        from: ProtocolBuild,
        /// Exclusive upper bound.
        to: ProtocolBuild,
    },

    /// An opcode name that is not part of the catalogue.
    UnknownOpcode {
        /// The name as given.
        name: String,
    },
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyRange { from, to } => {
                write!(f, "build range [{from}, {to}) is empty")
            }
            Self::UnknownOpcode { name } => write!(f, "unknown opcode {name:?}"),
        }
    }
}

impl std::error::Error for ProtocolError {}
