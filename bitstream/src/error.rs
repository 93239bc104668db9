//! Error types for bitstream operations.

use std::fmt;

/// Result type for bitstream operations.
pub type BitResult<T> = Result<T, BitError>;

/// Errors that can occur while consuming a message buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BitError {
    /// Attempted to read past the end of the buffer.
    OutOfData {
        /// Number of bits requested.
        requested: usize,
        /// Number of bits available.
        available: usize,
    },

    /// Invalid bit count for the operation.
    ///
    /// Bit widths are constants in the decoding tables, so this only
    /// surfaces when a table itself is wrong.
    InvalidBitCount {
        /// The invalid bit count provided.
        bits: u8,
        /// Maximum allowed bits for this operation.
        max_bits: u8,
    },

    /// Value exceeds the range representable by the specified number of bits.
    ValueOutOfRange {
        /// The value that was out of range.
        value: u64,
        /// Number of bits available.
        bits: u8,
    },

    /// The compressed remainder of a message could not be inflated.
    Inflate {
        /// Decompressor diagnostic.
        reason: String,
    },

    /// The inflated payload did not match its declared size.
    InflatedSizeMismatch {
        /// Size announced by the message.
        declared: usize,
        /// Size actually produced by the decompressor.
        actual: usize,
    },
}

impl BitError {
    /// Returns `true` if the buffer ran out mid-read.
    #[must_use]
    pub const fn is_out_of_data(&self) -> bool {
        matches!(self, Self::OutOfData { .. })
    }
}

impl fmt::Display for BitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfData {
                requested,
                available,
            } => {
                write!(
                    f,
                    "attempted to read {requested} bits but only {available} bits available"
                )
            }
            Self::InvalidBitCount { bits, max_bits } => {
                write!(f, "invalid bit count {bits}, maximum allowed is {max_bits}")
            }
            Self::ValueOutOfRange { value, bits } => {
                write!(f, "value {value} cannot be represented in {bits} bits")
            }
            Self::Inflate { reason } => write!(f, "inflate failed: {reason}"),
            Self::InflatedSizeMismatch { declared, actual } => {
                write!(
                    f,
                    "inflated size mismatch: declared {declared} bytes, got {actual}"
                )
            }
        }
    }
}

impl std::error::Error for BitError {}
