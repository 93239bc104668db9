//! The decoding catalogue.
//!
//! Every procedure reads its message with the [`MessageDecoder`] combinators
//! in literal wire order. Procedures for the same opcode differ only in that
//! order and in which fields exist; each is registered for the build range
//! in which its layout was observed.
//!
//! [`MessageDecoder`]: crate::MessageDecoder

mod char_enum;
mod character;
mod common;
mod currency;
mod stats;

use crate::error::CodecResult;
use crate::registry::{Registry, RegistryBuilder};

/// Adds every catalogue procedure to `builder`.
pub fn register_all(builder: RegistryBuilder) -> CodecResult<RegistryBuilder> {
    let builder = char_enum::register(builder)?;
    let builder = character::register(builder)?;
    let builder = currency::register(builder)?;
    stats::register(builder)
}

/// Builds the registry holding the full catalogue.
///
/// # Errors
///
/// Fails only if two catalogue ranges for one opcode overlap.
pub fn catalogue() -> CodecResult<Registry> {
    register_all(Registry::builder())?.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use protocol::{Opcode, ProtocolBuild};

    #[test]
    fn catalogue_builds_without_conflicts() {
        let registry = catalogue().unwrap();
        assert!(!registry.is_empty());
    }

    #[test]
    fn every_opcode_is_covered_at_every_known_build() {
        let registry = catalogue().unwrap();
        let builds = [
            ProtocolBuild::ZERO,
            ProtocolBuild::V3_0_2_9056,
            ProtocolBuild::V3_3_3_11685,
            ProtocolBuild::V3_3_5_12340,
            ProtocolBuild::V4_0_1_13164,
            ProtocolBuild::V4_0_3_13329,
            ProtocolBuild::V4_2_2_14545,
            ProtocolBuild::V4_3_0_15005,
            ProtocolBuild::V4_3_3_15354,
            ProtocolBuild::V4_3_4_15595,
        ];
        for &opcode in Opcode::ALL {
            for build in builds {
                let resolved = registry.resolve(opcode, build);
                if opcode == Opcode::SmsgCompressedCharEnum && build < ProtocolBuild::V4_2_2_14545 {
                    assert!(resolved.is_err(), "{opcode} at {build}");
                } else {
                    assert!(resolved.is_ok(), "{opcode} at {build}");
                }
            }
        }
    }

    #[test]
    fn roster_boundaries_select_adjacent_layouts() {
        let registry = catalogue().unwrap();
        let name = |raw| {
            registry
                .resolve(Opcode::SmsgCharEnum, ProtocolBuild::new(raw))
                .unwrap()
                .name
        };
        assert_eq!(name(15_353), "char_enum_430");
        assert_eq!(name(15_354), "char_enum_433");
        assert_eq!(name(15_594), "char_enum_433");
        assert_eq!(name(15_595), "char_enum_434");
        assert_eq!(name(99_999), "char_enum_434");
        assert_eq!(name(12_340), "char_enum_333");
    }

    #[test]
    fn fingerprint_is_stable() {
        assert_eq!(
            catalogue().unwrap().fingerprint(),
            catalogue().unwrap().fingerprint()
        );
    }
}
