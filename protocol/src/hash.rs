//! Deterministic catalogue fingerprint.

use blake3::Hasher;

use crate::{BuildRange, Opcode};

/// Computes a deterministic fingerprint of an ordered registration list.
///
/// Two catalogues hash equal only if they register the same opcodes over
/// the same ranges in the same order.
#[must_use]
pub fn catalogue_hash(registrations: &[(Opcode, BuildRange)]) -> u64 {
    let mut hasher = Hasher::new();
    write_len(&mut hasher, registrations.len());

    for (opcode, range) in registrations {
        let name = opcode.name().as_bytes();
        write_len(&mut hasher, name.len());
        hasher.update(name);
        write_range(&mut hasher, range);
    }

    let hash = hasher.finalize();
    let mut prefix = [0u8; 8];
    prefix.copy_from_slice(&hash.as_bytes()[..8]);
    u64::from_le_bytes(prefix)
}

fn write_range(hasher: &mut Hasher, range: &BuildRange) {
    write_u32(hasher, range.start().raw());
    match range.end() {
        Some(end) => {
            write_u8(hasher, 1);
            write_u32(hasher, end.raw());
        }
        None => {
            write_u8(hasher, 0);
        }
    }
}

fn write_len(hasher: &mut Hasher, len: usize) {
    hasher.update(&(len as u64).to_le_bytes());
}

fn write_u8(hasher: &mut Hasher, value: u8) {
    hasher.update(&[value]);
}

fn write_u32(hasher: &mut Hasher, value: u32) {
    hasher.update(&value.to_le_bytes());
}
