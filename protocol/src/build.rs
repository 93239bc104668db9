//! Protocol builds and half-open build ranges.

use std::fmt;

use crate::error::{ProtocolError, ProtocolResult};

/// An observed client/server build number.
///
/// Builds are totally ordered and only ever compared against
/// [`BuildRange`] bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProtocolBuild(u32);

impl ProtocolBuild {
    /// The lowest possible build.
    pub const ZERO: Self = Self(0);
    /// 3.0.2.9056, first build with character customization flags.
    pub const V3_0_2_9056: Self = Self(9056);
    /// 3.3.3.11685, first build with four bag slots per roster entry.
    pub const V3_3_3_11685: Self = Self(11685);
    /// 3.3.5.12340.
    pub const V3_3_5_12340: Self = Self(12340);
    /// 4.0.1.13164.
    pub const V4_0_1_13164: Self = Self(13164);
    /// 4.0.3.13329, first build carrying a full guild identifier.
    pub const V4_0_3_13329: Self = Self(13329);
    /// 4.2.2.14545.
    pub const V4_2_2_14545: Self = Self(14545);
    /// 4.3.0.15005.
    pub const V4_3_0_15005: Self = Self(15005);
    /// 4.3.3.15354.
    pub const V4_3_3_15354: Self = Self(15354);
    /// 4.3.4.15595.
    pub const V4_3_4_15595: Self = Self(15595);

    const KNOWN: [(Self, &'static str); 9] = [
        (Self::V3_0_2_9056, "3.0.2"),
        (Self::V3_3_3_11685, "3.3.3"),
        (Self::V3_3_5_12340, "3.3.5"),
        (Self::V4_0_1_13164, "4.0.1"),
        (Self::V4_0_3_13329, "4.0.3"),
        (Self::V4_2_2_14545, "4.2.2"),
        (Self::V4_3_0_15005, "4.3.0"),
        (Self::V4_3_3_15354, "4.3.3"),
        (Self::V4_3_4_15595, "4.3.4"),
    ];

    /// Creates a build from its raw number.
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns the raw build number.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Returns the client version string for a named build.
    #[must_use]
    pub fn version_name(self) -> Option<&'static str> {
        Self::KNOWN
            .iter()
            .find(|(build, _)| *build == self)
            .map(|(_, name)| *name)
    }
}

impl From<u32> for ProtocolBuild {
    fn from(raw: u32) -> Self {
        Self(raw)
    }
}

impl From<ProtocolBuild> for u32 {
    fn from(build: ProtocolBuild) -> Self {
        build.0
    }
}

impl fmt::Display for ProtocolBuild {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.version_name() {
            Some(version) => write!(f, "{version}.{}", self.0),
            None => write!(f, "{}", self.0),
        }
    }
}

/// A half-open interval `[from, to)` of builds.
///
/// An absent upper bound means the range covers every later build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BuildRange {
    from: ProtocolBuild,
    to: Option<ProtocolBuild>,
}

impl BuildRange {
    /// Creates the closed range `[from, to)`.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::EmptyRange`] if `from >= to`.
    pub fn new(from: ProtocolBuild, to: ProtocolBuild) -> ProtocolResult<Self> {
        if from >= to {
            return Err(ProtocolError::EmptyRange { from, to });
        }
        Ok(Self { from, to: Some(to) })
    }

    /// Creates the open range `[from, ∞)`.
    #[must_use]
    pub const fn starting_at(from: ProtocolBuild) -> Self {
        Self { from, to: None }
    }

    /// Creates the range covering every build.
    #[must_use]
    pub const fn all() -> Self {
        Self::starting_at(ProtocolBuild::ZERO)
    }

    /// Returns the inclusive lower bound.
    #[must_use]
    pub const fn start(&self) -> ProtocolBuild {
        self.from
    }

    /// Returns the exclusive upper bound, if any.
    #[must_use]
    pub const fn end(&self) -> Option<ProtocolBuild> {
        self.to
    }

    /// Returns `true` if the range has no upper bound.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.to.is_none()
    }

    /// Returns `true` if `build` falls inside the range.
    #[must_use]
    pub fn contains(&self, build: ProtocolBuild) -> bool {
        build >= self.from && self.to.map_or(true, |to| build < to)
    }

    /// Returns `true` if the two ranges share at least one build.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        let self_before_other = self.to.is_some_and(|to| to <= other.from);
        let other_before_self = other.to.is_some_and(|to| to <= self.from);
        !self_before_other && !other_before_self
    }
}

impl fmt::Display for BuildRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to {
            Some(to) => write!(f, "[{}, {})", self.from.raw(), to.raw()),
            None => write!(f, "[{}, ..)", self.from.raw()),
        }
    }
}
