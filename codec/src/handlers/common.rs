//! Read combinators shared by several layouts.

use protocol::{BuildRange, Identifier, ProtocolBuild};

use crate::error::CodecResult;
use crate::guid::IdentifierBuilder;
use crate::message::MessageDecoder;
use crate::sink::FieldValue;
use crate::state::{EntityAttributes, EntityKind};

/// Equipment slots per roster entry.
pub const EQUIPMENT_SLOTS: usize = 19;

/// Wire size of one equipment or bag slot.
pub const SLOT_BYTES: usize = 9;

/// Creates the closed range `[from, to)`.
pub fn between(from: ProtocolBuild, to: ProtocolBuild) -> CodecResult<BuildRange> {
    Ok(BuildRange::new(from, to)?)
}

/// One field of an equipment or bag slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotField {
    DisplayId,
    InventoryType,
    EnchantId,
    AuraId,
}

/// Reads `count` slots into list `name` of roster entry `entry`, each slot
/// laid out as `order`.
pub fn read_slots(
    m: &mut MessageDecoder<'_>,
    name: &'static str,
    entry: usize,
    count: usize,
    order: &[SlotField; 3],
) -> CodecResult<()> {
    m.list(name, &[entry], |m| {
        for slot in 0..count {
            let idx = [entry, slot];
            for field in order {
                match field {
                    SlotField::DisplayId => {
                        m.read_i32("Display Id", &idx)?;
                    }
                    SlotField::InventoryType => {
                        m.read_u8("Inventory Type", &idx)?;
                    }
                    SlotField::EnchantId => {
                        m.read_i32("Enchant Id", &idx)?;
                    }
                    SlotField::AuraId => {
                        m.read_i32("Aura Id", &idx)?;
                    }
                }
            }
        }
        Ok(())
    })
}

/// One bit of a roster entry's presence block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryBit {
    Character(u8),
    Guild(u8),
    FirstLogin,
    NameLength(u8),
    Unknown,
}

/// Returns the number of bits a presence block occupies.
pub const fn entry_bits(table: &[EntryBit]) -> usize {
    let mut total = 0;
    let mut i = 0;
    while i < table.len() {
        total += match table[i] {
            EntryBit::NameLength(bits) => bits as usize,
            _ => 1,
        };
        i += 1;
    }
    total
}

/// Identifier scratch and flags of one roster entry, carried from the
/// presence pass to the body pass.
#[derive(Debug, Clone, Copy, Default)]
pub struct PendingEntry {
    pub character: IdentifierBuilder,
    pub guild: IdentifierBuilder,
    pub first_login: bool,
    pub name_length: usize,
}

impl PendingEntry {
    /// Reads one entry's presence block as laid out by `table`.
    pub fn read(m: &mut MessageDecoder<'_>, table: &[EntryBit]) -> CodecResult<Self> {
        let mut entry = Self::default();
        for bit in table {
            match *bit {
                EntryBit::Character(index) => {
                    m.mark(&mut entry.character, index)?;
                }
                EntryBit::Guild(index) => {
                    m.mark(&mut entry.guild, index)?;
                }
                EntryBit::FirstLogin => entry.first_login = m.cursor().read_bit()?,
                EntryBit::NameLength(bits) => {
                    let length = m.cursor().read_bits(bits)?;
                    entry.name_length = usize::try_from(length).unwrap_or(usize::MAX);
                }
                EntryBit::Unknown => {
                    m.skip_bits(1)?;
                }
            }
        }
        Ok(entry)
    }
}

/// Player facts gathered while a roster entry is decoded.
#[derive(Debug, Clone, Default)]
pub struct PlayerFacts {
    pub name: String,
    pub race: u8,
    pub class: u8,
    pub level: u8,
    pub first_login: bool,
}

/// Pushes the derived records of a finished roster entry.
pub fn commit_player(m: &MessageDecoder<'_>, id: Identifier, facts: PlayerFacts) {
    let state = m.state();
    state.names.register_display_name(id, &facts.name);
    state.objects.register_entity(
        id,
        EntityKind::Player,
        EntityAttributes {
            name: facts.name,
            race: facts.race,
            class: facts.class,
            level: facts.level.into(),
            first_login: facts.first_login,
        },
    );
}

/// Records the identifiers and flags assembled for a bit-packed roster
/// entry and pushes its derived records.
pub fn finish_entry(
    m: &mut MessageDecoder<'_>,
    c: usize,
    entry: PendingEntry,
    position: [f32; 3],
    mut facts: PlayerFacts,
) {
    let idx = [c];
    let character = entry.character.finish();
    m.record_identifier("Character GUID", character, &idx);
    m.record_identifier("Guild GUID", entry.guild.finish(), &idx);
    m.record("First Login", FieldValue::Bool(entry.first_login), &idx);
    let [x, y, z] = position;
    m.record("Position", FieldValue::Vector3 { x, y, z }, &idx);
    facts.first_login = entry.first_login;
    commit_player(m, character, facts);
}
