//! Build-range dispatch from `(opcode, build)` to one decoding procedure.

use std::collections::BTreeMap;
use std::fmt;

use protocol::{catalogue_hash, BuildRange, Opcode, ProtocolBuild};

use crate::error::{CodecError, CodecResult};
use crate::message::MessageDecoder;

/// A decoding procedure.
pub type DecodeFn = fn(&mut MessageDecoder<'_>) -> CodecResult<()>;

/// One `(opcode, range, procedure)` entry of the catalogue.
#[derive(Clone, Copy)]
pub struct Registration {
    pub opcode: Opcode,
    pub range: BuildRange,
    /// Procedure name, for diagnostics.
    pub name: &'static str,
    pub decode: DecodeFn,
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("opcode", &self.opcode)
            .field("range", &self.range)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Collects registrations and validates them into a [`Registry`].
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    registrations: Vec<Registration>,
}

impl RegistryBuilder {
    /// Adds a procedure for `opcode` over `range`.
    #[must_use]
    pub fn register(
        self,
        opcode: Opcode,
        range: BuildRange,
        name: &'static str,
        decode: DecodeFn,
    ) -> Self {
        self.add(Registration {
            opcode,
            range,
            name,
            decode,
        })
    }

    /// Adds an existing registration.
    #[must_use]
    pub fn add(mut self, registration: Registration) -> Self {
        self.registrations.push(registration);
        self
    }

    /// Validates and freezes the registrations.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::RegistrationConflict`] if two ranges for the same
    /// opcode overlap.
    pub fn build(self) -> CodecResult<Registry> {
        let mut by_opcode: BTreeMap<Opcode, Vec<Registration>> = BTreeMap::new();
        for registration in &self.registrations {
            by_opcode
                .entry(registration.opcode)
                .or_default()
                .push(*registration);
        }

        for (opcode, ranges) in &mut by_opcode {
            ranges.sort_by_key(|registration| registration.range.start());
            // Sorted by start, any overlap shows up between neighbours.
            for pair in ranges.windows(2) {
                if pair[0].range.overlaps(&pair[1].range) {
                    return Err(CodecError::RegistrationConflict {
                        opcode: *opcode,
                        existing: pair[0].range,
                        conflicting: pair[1].range,
                    });
                }
            }
        }

        Ok(Registry {
            ordered: self.registrations,
            by_opcode,
        })
    }
}

/// Immutable lookup from `(opcode, build)` to a procedure.
#[derive(Debug, Clone)]
pub struct Registry {
    ordered: Vec<Registration>,
    by_opcode: BTreeMap<Opcode, Vec<Registration>>,
}

impl Registry {
    /// Starts an empty builder.
    #[must_use]
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// Returns the registration whose range contains `build`.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::UnsupportedVersion`] if no range matches.
    pub fn resolve(&self, opcode: Opcode, build: ProtocolBuild) -> CodecResult<&Registration> {
        let unsupported = || CodecError::UnsupportedVersion { opcode, build };
        let ranges = self.by_opcode.get(&opcode).ok_or_else(unsupported)?;
        let after = ranges.partition_point(|registration| registration.range.start() <= build);
        let candidate = after
            .checked_sub(1)
            .and_then(|index| ranges.get(index))
            .ok_or_else(unsupported)?;
        if candidate.range.contains(build) {
            Ok(candidate)
        } else {
            Err(unsupported())
        }
    }

    /// Returns every registration in declaration order.
    pub fn registrations(&self) -> impl Iterator<Item = &Registration> {
        self.ordered.iter()
    }

    /// Returns the registrations for `opcode`, sorted by range start.
    #[must_use]
    pub fn registrations_for(&self, opcode: Opcode) -> &[Registration] {
        self.by_opcode.get(&opcode).map_or(&[], Vec::as_slice)
    }

    /// Returns the number of registrations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    /// Returns `true` if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }

    /// Returns the deterministic fingerprint of the registration list.
    #[must_use]
    pub fn fingerprint(&self) -> u64 {
        let entries: Vec<_> = self
            .ordered
            .iter()
            .map(|registration| (registration.opcode, registration.range))
            .collect();
        catalogue_hash(&entries)
    }
}
