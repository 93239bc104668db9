//! Character roster layouts, one per build family, plus the compressed
//! wrapper that inflates and redispatches to them.

use protocol::{BuildRange, Opcode, ProtocolBuild};

use super::common::{
    between, commit_player, entry_bits, finish_entry, read_slots, EntryBit, PendingEntry,
    PlayerFacts, SlotField, EQUIPMENT_SLOTS, SLOT_BYTES,
};
use crate::error::CodecResult;
use crate::message::MessageDecoder;
use crate::registry::RegistryBuilder;
use crate::sink::FieldValue;

use super::common::EntryBit::{Character as C, FirstLogin, Guild as G, NameLength, Unknown};
use super::common::SlotField::{AuraId, DisplayId, EnchantId, InventoryType};

const BAG_SLOTS: usize = 4;
const SLOT_LIST_BYTES: usize = (EQUIPMENT_SLOTS + BAG_SLOTS) * SLOT_BYTES;

/// One `u32` and one `u8` per trailing unknown entry.
const UNKNOWN_ENTRY_BITS: usize = 5 * 8;

pub(super) fn register(builder: RegistryBuilder) -> CodecResult<RegistryBuilder> {
    use ProtocolBuild as B;

    Ok(builder
        .register(
            Opcode::SmsgCharEnum,
            between(B::ZERO, B::V3_0_2_9056)?,
            "char_enum_classic",
            char_enum_classic,
        )
        .register(
            Opcode::SmsgCharEnum,
            between(B::V3_0_2_9056, B::V3_3_3_11685)?,
            "char_enum_302",
            char_enum_302,
        )
        .register(
            Opcode::SmsgCharEnum,
            between(B::V3_3_3_11685, B::V4_0_3_13329)?,
            "char_enum_333",
            char_enum_333,
        )
        .register(
            Opcode::SmsgCharEnum,
            between(B::V4_0_3_13329, B::V4_2_2_14545)?,
            "char_enum_403",
            char_enum_403,
        )
        .register(
            Opcode::SmsgCharEnum,
            between(B::V4_2_2_14545, B::V4_3_0_15005)?,
            "char_enum_422",
            char_enum_422,
        )
        .register(
            Opcode::SmsgCharEnum,
            between(B::V4_3_0_15005, B::V4_3_3_15354)?,
            "char_enum_430",
            char_enum_430,
        )
        .register(
            Opcode::SmsgCharEnum,
            between(B::V4_3_3_15354, B::V4_3_4_15595)?,
            "char_enum_433",
            char_enum_433,
        )
        .register(
            Opcode::SmsgCharEnum,
            BuildRange::starting_at(B::V4_3_4_15595),
            "char_enum_434",
            char_enum_434,
        )
        .register(
            Opcode::SmsgCompressedCharEnum,
            BuildRange::starting_at(B::V4_2_2_14545),
            "compressed_char_enum",
            compressed_char_enum,
        ))
}

/// Shape differences between the byte-aligned rosters.
#[derive(Debug, Clone, Copy)]
struct LegacyLayout {
    customization_flags: bool,
    bag_slots: usize,
    guild_identifier: bool,
}

impl LegacyLayout {
    const fn min_entry_bytes(self) -> usize {
        // guid, empty name, nine appearance bytes, zone, map, position,
        // guild, flags, first login, three pet fields
        let fixed = 8 + 1 + 9 + 4 + 4 + 12 + 4 + 4 + 1 + 12;
        let guild = if self.guild_identifier { 4 } else { 0 };
        let customization = if self.customization_flags { 4 } else { 0 };
        fixed + guild + customization + (EQUIPMENT_SLOTS + self.bag_slots) * SLOT_BYTES
    }
}

const LEGACY_SLOT: [SlotField; 3] = [DisplayId, InventoryType, AuraId];

fn char_enum_classic(m: &mut MessageDecoder<'_>) -> CodecResult<()> {
    legacy_roster(
        m,
        LegacyLayout {
            customization_flags: false,
            bag_slots: 1,
            guild_identifier: false,
        },
    )
}

fn char_enum_302(m: &mut MessageDecoder<'_>) -> CodecResult<()> {
    legacy_roster(
        m,
        LegacyLayout {
            customization_flags: true,
            bag_slots: 1,
            guild_identifier: false,
        },
    )
}

fn char_enum_333(m: &mut MessageDecoder<'_>) -> CodecResult<()> {
    legacy_roster(
        m,
        LegacyLayout {
            customization_flags: true,
            bag_slots: BAG_SLOTS,
            guild_identifier: false,
        },
    )
}

fn char_enum_403(m: &mut MessageDecoder<'_>) -> CodecResult<()> {
    legacy_roster(
        m,
        LegacyLayout {
            customization_flags: true,
            bag_slots: BAG_SLOTS,
            guild_identifier: true,
        },
    )
}

fn legacy_roster(m: &mut MessageDecoder<'_>, layout: LegacyLayout) -> CodecResult<()> {
    let count = m.read_u8("Count", &[])?;
    let count = m.checked_count("Characters", count.into(), layout.min_entry_bytes() * 8)?;

    m.list("Characters", &[], |m| {
        for c in 0..count {
            let idx = [c];
            let guid = m.read_identifier("Character GUID", &idx)?;
            let name = m.read_cstring("Name", &idx)?;
            let race = m.read_u8("Race", &idx)?;
            let class = m.read_u8("Class", &idx)?;
            m.read_u8("Gender", &idx)?;
            m.read_u8("Skin", &idx)?;
            m.read_u8("Face", &idx)?;
            m.read_u8("Hair Style", &idx)?;
            m.read_u8("Hair Color", &idx)?;
            m.read_u8("Facial Hair", &idx)?;
            let level = m.read_u8("Level", &idx)?;
            m.read_u32("Zone Id", &idx)?;
            m.read_i32("Map Id", &idx)?;
            m.read_vector3("Position", &idx)?;
            if layout.guild_identifier {
                m.read_identifier("Guild GUID", &idx)?;
            } else {
                m.read_i32("Guild Id", &idx)?;
            }
            m.read_i32("Character Flags", &idx)?;
            if layout.customization_flags {
                m.read_u32("Customization Flags", &idx)?;
            }
            let first_login = m.read_bool("First Login", &idx)?;
            m.read_i32("Pet Display Id", &idx)?;
            m.read_i32("Pet Level", &idx)?;
            m.read_i32("Pet Family", &idx)?;
            read_slots(m, "Equipment", c, EQUIPMENT_SLOTS, &LEGACY_SLOT)?;
            read_slots(m, "Bags", c, layout.bag_slots, &LEGACY_SLOT)?;

            commit_player(
                m,
                guid,
                PlayerFacts {
                    name,
                    race,
                    class,
                    level,
                    first_login,
                },
            );
        }
        Ok(())
    })
}

#[rustfmt::skip]
const BITS_422: [EntryBit; 17] = [
    G(5), C(4), G(3), G(7), G(1), G(6), C(5), C(6),
    C(3), C(2), G(4), C(0), C(1), G(2), C(7), G(0),
    FirstLogin,
];

// empty name, scalars, position, slots, customization
const BODY_BYTES_422: usize = 1 + 34 + 12 + SLOT_LIST_BYTES + 4;

fn char_enum_422(m: &mut MessageDecoder<'_>) -> CodecResult<()> {
    m.read_u8("Unknown Flag", &[])?;
    let count = m.read_i32("Character Count", &[])?;
    m.read_i32("Unknown Count", &[])?;
    let count = m.checked_count(
        "Character Count",
        count.into(),
        entry_bits(&BITS_422) + BODY_BYTES_422 * 8,
    )?;

    let mut entries = Vec::with_capacity(count);
    for _ in 0..count {
        entries.push(PendingEntry::read(m, &BITS_422)?);
    }

    const SLOT: [SlotField; 3] = [EnchantId, InventoryType, DisplayId];
    m.list("Characters", &[], |m| {
        for (c, mut e) in entries.into_iter().enumerate() {
            let idx = [c];
            let name = m.read_cstring("Name", &idx)?;
            m.absorb(&mut e.guild, 5)?;
            m.read_u8("Face", &idx)?;
            m.read_i32("Map Id", &idx)?;
            m.absorb(&mut e.character, 1)?;
            m.absorb(&mut e.character, 4)?;
            m.absorb(&mut e.guild, 4)?;
            m.absorb(&mut e.guild, 0)?;
            m.read_vector3("Position", &idx)?;
            m.absorb(&mut e.character, 0)?;
            m.read_i32("Zone Id", &idx)?;
            m.read_i32("Pet Level", &idx)?;
            m.absorb(&mut e.character, 3)?;
            m.absorb(&mut e.character, 7)?;
            m.read_u8("Facial Hair", &idx)?;
            m.read_u8("Skin", &idx)?;
            let class = m.read_u8("Class", &idx)?;
            m.read_i32("Pet Family", &idx)?;
            m.read_i32("Character Flags", &idx)?;
            m.absorb(&mut e.character, 2)?;
            m.read_i32("Pet Display Id", &idx)?;
            m.absorb(&mut e.guild, 7)?;
            let level = m.read_u8("Level", &idx)?;
            m.absorb(&mut e.character, 6)?;
            m.read_u8("Hair Style", &idx)?;
            m.absorb(&mut e.guild, 2)?;
            let race = m.read_u8("Race", &idx)?;
            m.read_u8("Hair Color", &idx)?;
            m.absorb(&mut e.guild, 6)?;
            m.read_u8("Gender", &idx)?;
            m.absorb(&mut e.character, 5)?;
            m.absorb(&mut e.guild, 3)?;
            m.read_u8("List Order", &idx)?;
            read_slots(m, "Equipment", c, EQUIPMENT_SLOTS, &SLOT)?;
            read_slots(m, "Bags", c, BAG_SLOTS, &SLOT)?;
            m.read_u32("Customization Flags", &idx)?;
            m.absorb(&mut e.guild, 1)?;

            let character = e.character.finish();
            m.record_identifier("Character GUID", character, &idx);
            m.record_identifier("Guild GUID", e.guild.finish(), &idx);
            m.record("First Login", FieldValue::Bool(e.first_login), &idx);
            commit_player(
                m,
                character,
                PlayerFacts {
                    name,
                    race,
                    class,
                    level,
                    first_login: e.first_login,
                },
            );
        }
        Ok(())
    })
}

#[rustfmt::skip]
const BITS_430: [EntryBit; 18] = [
    G(2), C(2), C(6), C(5), C(4), G(4), G(3), G(7),
    NameLength(7),
    G(0), C(0), C(3), C(1), FirstLogin, G(5), C(7), G(6), G(1),
];

// slots, ten byte fields, position, zone, map, three pet fields, flags,
// customization
const BODY_BYTES_430: usize = SLOT_LIST_BYTES + 10 + 12 + 4 + 4 + 12 + 4 + 4;

fn char_enum_430(m: &mut MessageDecoder<'_>) -> CodecResult<()> {
    let count = m.read_bits("Character Count", 17, &[])?;
    let count = m.checked_count(
        "Character Count",
        count_from_bits(count),
        entry_bits(&BITS_430) + BODY_BYTES_430 * 8,
    )?;

    let mut entries = Vec::with_capacity(count);
    for _ in 0..count {
        entries.push(PendingEntry::read(m, &BITS_430)?);
    }
    let unknown = m.read_bits("Unknown Counter", 23, &[])?;
    m.skip_bits(1)?;
    let unknown = m.checked_count("Unknown Counter", count_from_bits(unknown), UNKNOWN_ENTRY_BITS)?;

    const SLOT: [SlotField; 3] = [InventoryType, DisplayId, EnchantId];
    m.list("Characters", &[], |m| {
        for (c, mut e) in entries.into_iter().enumerate() {
            let idx = [c];
            read_slots(m, "Equipment", c, EQUIPMENT_SLOTS, &SLOT)?;
            read_slots(m, "Bags", c, BAG_SLOTS, &SLOT)?;
            m.absorb(&mut e.guild, 0)?;
            m.absorb(&mut e.guild, 1)?;
            m.read_u8("Face", &idx)?;
            m.read_i32("Pet Display Id", &idx)?;
            m.absorb(&mut e.guild, 7)?;
            m.read_u8("Gender", &idx)?;
            let level = m.read_u8("Level", &idx)?;
            m.read_i32("Pet Level", &idx)?;
            m.read_u32("Zone Id", &idx)?;
            let y = m.read_f32("Position Y", &idx)?;
            m.read_i32("Pet Family", &idx)?;
            m.read_u8("Hair Style", &idx)?;
            m.absorb(&mut e.character, 1)?;
            let name = m.read_fixed_string("Name", e.name_length, &idx)?;
            m.absorb(&mut e.character, 0)?;
            let race = m.read_u8("Race", &idx)?;
            m.read_u8("List Order", &idx)?;
            m.absorb(&mut e.character, 7)?;
            let z = m.read_f32("Position Z", &idx)?;
            m.read_i32("Map Id", &idx)?;
            m.absorb(&mut e.guild, 4)?;
            m.read_u8("Hair Color", &idx)?;
            m.absorb(&mut e.character, 3)?;
            m.read_i32("Character Flags", &idx)?;
            m.read_u8("Skin", &idx)?;
            m.absorb_all(&mut e.character, &[4, 5])?;
            m.absorb(&mut e.guild, 5)?;
            m.read_u32("Customization Flags", &idx)?;
            let x = m.read_f32("Position X", &idx)?;
            m.read_u8("Facial Hair", &idx)?;
            m.absorb(&mut e.character, 6)?;
            m.absorb(&mut e.guild, 3)?;
            m.absorb(&mut e.character, 2)?;
            let class = m.read_u8("Class", &idx)?;
            m.absorb_all(&mut e.guild, &[6, 2])?;

            finish_entry(
                m,
                c,
                e,
                [x, y, z],
                PlayerFacts {
                    name,
                    race,
                    class,
                    level,
                    first_login: false,
                },
            );
        }
        Ok(())
    })?;

    unknown_entries(m, unknown, UnknownEntry::IntThenByte)
}

#[rustfmt::skip]
const BITS_433: [EntryBit; 21] = [
    C(0), G(0), C(2), G(2), FirstLogin, C(3), C(6), G(2),
    C(4), C(5), NameLength(4), G(3), G(4),
    G(5), C(1), Unknown, G(6), C(7), G(7), Unknown, Unknown,
];

// as 4.3.0 without the list order, which is conditional here
const BODY_BYTES_433: usize = SLOT_LIST_BYTES + 9 + 12 + 4 + 4 + 12 + 4 + 4;

/// Layout of 4.3.3. Several bytes are only read when an unrelated presence
/// bit is set, and the guild identifier only ever receives byte 0.
fn char_enum_433(m: &mut MessageDecoder<'_>) -> CodecResult<()> {
    let unknown = m.read_bits("Unknown Counter", 23, &[])?;
    let count = m.read_bits("Character Count", 17, &[])?;
    let count = m.checked_count(
        "Character Count",
        count_from_bits(count),
        entry_bits(&BITS_433) + BODY_BYTES_433 * 8,
    )?;

    let mut entries = Vec::with_capacity(count);
    for _ in 0..count {
        entries.push(PendingEntry::read(m, &BITS_433)?);
    }
    m.skip_u8()?;
    let unknown = m.checked_count("Unknown Counter", count_from_bits(unknown), UNKNOWN_ENTRY_BITS)?;

    const SLOT: [SlotField; 3] = [EnchantId, DisplayId, InventoryType];
    m.list("Characters", &[], |m| {
        for (c, mut e) in entries.into_iter().enumerate() {
            let idx = [c];
            read_slots(m, "Equipment", c, EQUIPMENT_SLOTS, &SLOT)?;
            read_slots(m, "Bags", c, BAG_SLOTS, &SLOT)?;
            m.read_u32("Zone Id", &idx)?;
            m.read_i32("Pet Level", &idx)?;
            m.read_i32("Character Flags", &idx)?;
            m.read_u8("Facial Hair", &idx)?;
            m.absorb(&mut e.guild, 0)?;
            m.absorb_all(&mut e.character, &[0, 2])?;
            if e.guild.is_present(2) {
                m.absorb(&mut e.character, 7)?;
            }
            if e.guild.is_present(7) {
                m.read_u8("List Order", &idx)?;
            }
            m.read_i32("Pet Display Id", &idx)?;
            m.absorb(&mut e.character, 4)?;
            if [4, 5, 1, 3, 6].iter().all(|&i| e.guild.is_present(i))
                && e.character.is_present(5)
            {
                m.absorb(&mut e.character, 3)?;
            }
            let class = m.read_u8("Class", &idx)?;
            m.absorb(&mut e.character, 6)?;
            let x = m.read_f32("Position X", &idx)?;
            m.absorb(&mut e.character, 1)?;
            let race = m.read_u8("Race", &idx)?;
            m.read_i32("Pet Family", &idx)?;
            let y = m.read_f32("Position Y", &idx)?;
            m.read_u8("Gender", &idx)?;
            m.read_u8("Hair Style", &idx)?;
            let level = m.read_u8("Level", &idx)?;
            let z = m.read_f32("Position Z", &idx)?;
            m.read_u32("Customization Flags", &idx)?;
            m.read_u8("Skin", &idx)?;
            m.read_u8("Hair Color", &idx)?;
            m.read_u8("Face", &idx)?;
            m.read_i32("Map Id", &idx)?;
            let name = m.read_fixed_string("Name", e.name_length, &idx)?;

            finish_entry(
                m,
                c,
                e,
                [x, y, z],
                PlayerFacts {
                    name,
                    race,
                    class,
                    level,
                    first_login: false,
                },
            );
        }
        Ok(())
    })?;

    unknown_entries(m, unknown, UnknownEntry::IntThenByte)
}

#[rustfmt::skip]
const BITS_434: [EntryBit; 18] = [
    C(3), G(1), G(7), G(2), NameLength(7),
    C(4), C(7), G(3), C(5), G(6), C(1), G(5), G(4),
    FirstLogin, C(0), C(2), C(6), G(0),
];

const BODY_BYTES_434: usize = BODY_BYTES_430;

fn char_enum_434(m: &mut MessageDecoder<'_>) -> CodecResult<()> {
    let unknown = m.read_bits("Unknown Counter", 23, &[])?;
    m.read_flag("Unknown Bit", &[])?;
    let count = m.read_bits("Character Count", 17, &[])?;
    let count = m.checked_count(
        "Character Count",
        count_from_bits(count),
        entry_bits(&BITS_434) + BODY_BYTES_434 * 8,
    )?;

    let mut entries = Vec::with_capacity(count);
    for _ in 0..count {
        entries.push(PendingEntry::read(m, &BITS_434)?);
    }
    let unknown = m.checked_count("Unknown Counter", count_from_bits(unknown), UNKNOWN_ENTRY_BITS)?;

    const SLOT: [SlotField; 3] = [InventoryType, DisplayId, EnchantId];
    m.list("Characters", &[], |m| {
        for (c, mut e) in entries.into_iter().enumerate() {
            let idx = [c];
            let class = m.read_u8("Class", &idx)?;
            read_slots(m, "Equipment", c, EQUIPMENT_SLOTS, &SLOT)?;
            read_slots(m, "Bags", c, BAG_SLOTS, &SLOT)?;
            m.read_i32("Pet Family", &idx)?;
            m.absorb(&mut e.guild, 2)?;
            m.read_u8("List Order", &idx)?;
            m.read_u8("Hair Style", &idx)?;
            m.absorb(&mut e.guild, 3)?;
            m.read_i32("Pet Display Id", &idx)?;
            m.read_i32("Character Flags", &idx)?;
            m.read_u8("Hair Color", &idx)?;
            m.absorb(&mut e.character, 4)?;
            m.read_i32("Map Id", &idx)?;
            m.absorb(&mut e.guild, 5)?;
            let z = m.read_f32("Position Z", &idx)?;
            m.absorb(&mut e.guild, 6)?;
            m.read_i32("Pet Level", &idx)?;
            m.absorb(&mut e.character, 3)?;
            let y = m.read_f32("Position Y", &idx)?;
            m.read_u32("Customization Flags", &idx)?;
            m.read_u8("Facial Hair", &idx)?;
            m.absorb(&mut e.character, 7)?;
            m.read_u8("Gender", &idx)?;
            let name = m.read_fixed_string("Name", e.name_length, &idx)?;
            m.read_u8("Face", &idx)?;
            m.absorb_all(&mut e.character, &[0, 2])?;
            m.absorb_all(&mut e.guild, &[1, 7])?;
            let x = m.read_f32("Position X", &idx)?;
            m.read_u8("Skin", &idx)?;
            let race = m.read_u8("Race", &idx)?;
            let level = m.read_u8("Level", &idx)?;
            m.absorb(&mut e.character, 6)?;
            m.absorb_all(&mut e.guild, &[4, 0])?;
            m.absorb_all(&mut e.character, &[5, 1])?;
            m.read_u32("Zone Id", &idx)?;

            finish_entry(
                m,
                c,
                e,
                [x, y, z],
                PlayerFacts {
                    name,
                    race,
                    class,
                    level,
                    first_login: false,
                },
            );
        }
        Ok(())
    })?;

    unknown_entries(m, unknown, UnknownEntry::ByteThenInt)
}

fn compressed_char_enum(m: &mut MessageDecoder<'_>) -> CodecResult<()> {
    let size = m.read_u32("Inflated Size", &[])?;
    if size == 0 {
        return Ok(());
    }
    m.inflate_remaining(usize::try_from(size).unwrap_or(usize::MAX))?;
    m.redispatch(Opcode::SmsgCharEnum)
}

#[derive(Debug, Clone, Copy)]
enum UnknownEntry {
    IntThenByte,
    ByteThenInt,
}

fn unknown_entries(m: &mut MessageDecoder<'_>, count: usize, layout: UnknownEntry) -> CodecResult<()> {
    m.list("Unknown Entries", &[], |m| {
        for i in 0..count {
            let idx = [i];
            match layout {
                UnknownEntry::IntThenByte => {
                    m.read_u32("Unknown UInt32", &idx)?;
                    m.read_u8("Unknown Byte", &idx)?;
                }
                UnknownEntry::ByteThenInt => {
                    m.read_u8("Unknown Byte", &idx)?;
                    m.read_u32("Unknown UInt32", &idx)?;
                }
            }
        }
        Ok(())
    })
}

fn count_from_bits(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}
