//! Limits for codec-level decoding.

/// Codec-specific limits enforced while a decoding procedure runs.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CodecLimits {
    /// Maximum entries in one dynamically counted list.
    pub max_list_entries: usize,
    /// Maximum declared size of an inflated sub-payload.
    pub max_inflated_bytes: usize,
    /// Maximum nesting of one procedure handing off to another.
    pub max_redispatch_depth: usize,
}

impl Default for CodecLimits {
    fn default() -> Self {
        Self {
            max_list_entries: 4096,
            max_inflated_bytes: 1024 * 1024,
            max_redispatch_depth: 2,
        }
    }
}

impl CodecLimits {
    /// Creates limits suitable for testing with smaller values.
    #[must_use]
    pub const fn for_testing() -> Self {
        Self {
            max_list_entries: 256,
            max_inflated_bytes: 64 * 1024,
            max_redispatch_depth: 2,
        }
    }

    /// Creates limits with no restrictions (use with caution).
    #[must_use]
    pub const fn unlimited() -> Self {
        Self {
            max_list_entries: usize::MAX,
            max_inflated_bytes: usize::MAX,
            max_redispatch_depth: usize::MAX,
        }
    }
}
