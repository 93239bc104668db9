//! Error types for message envelopes.

use std::fmt;

/// Result type for envelope operations.
pub type EnvelopeResult<T> = Result<T, EnvelopeError>;

/// Errors raised while validating a message envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum EnvelopeError {
    /// Declared length does not match the payload actually delivered.
    LengthMismatch { declared: usize, actual: usize },

    /// Limits exceeded.
    LimitsExceeded {
        kind: LimitKind,
        limit: usize,
        actual: usize,
    },
}

/// Specific envelope limits that can be exceeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitKind {
    MessageBytes,
}

impl fmt::Display for EnvelopeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LengthMismatch { declared, actual } => {
                write!(
                    f,
                    "message length mismatch: declared {declared} bytes, payload has {actual}"
                )
            }
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
        match self {
            Self::MessageBytes => write!(f, "message bytes"),
        }
    }
}

impl std::error::Error for EnvelopeError {}
