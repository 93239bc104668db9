//! Fixture writers mirroring the decoding catalogue.

#![allow(dead_code)]

use bitstream::BitWriter;
use codec::{
    catalogue, decode_message, CodecLimits, CodecResult, DecodeSummary, InMemoryState,
    RecordTree, Registry, WireLimits,
};
use protocol::{Opcode, ProtocolBuild};
use wire::RawMessage;

/// Writes an identifier the way an obfuscating sender does: a presence bit
/// per non-zero byte, then each non-zero byte XORed with the zero mask.
#[derive(Debug, Clone, Copy)]
pub struct MaskedId {
    bytes: [u8; 8],
}

impl MaskedId {
    pub fn new(raw: u64) -> Self {
        Self {
            bytes: raw.to_le_bytes(),
        }
    }

    pub fn bytes_present(&self, index: u8) -> bool {
        self.bytes[usize::from(index)] != 0
    }

    pub fn presence(&self, w: &mut BitWriter, index: u8) {
        w.write_bit(self.bytes[usize::from(index)] != 0);
    }

    pub fn presence_all(&self, w: &mut BitWriter, order: &[u8]) {
        for &index in order {
            self.presence(w, index);
        }
    }

    pub fn byte(&self, w: &mut BitWriter, index: u8) {
        let byte = self.bytes[usize::from(index)];
        if byte != 0 {
            w.write_u8(byte);
        }
    }

    pub fn bytes(&self, w: &mut BitWriter, order: &[u8]) {
        for &index in order {
            self.byte(w, index);
        }
    }
}

/// One roster entry.
#[derive(Debug, Clone)]
pub struct CharacterFixture {
    pub guid: u64,
    pub guild: u64,
    pub name: &'static str,
    pub race: u8,
    pub class: u8,
    pub gender: u8,
    pub skin: u8,
    pub face: u8,
    pub hair_style: u8,
    pub hair_color: u8,
    pub facial_hair: u8,
    pub level: u8,
    pub zone: u32,
    pub map: i32,
    pub position: [f32; 3],
    pub flags: i32,
    pub customization: u32,
    pub first_login: bool,
    pub pet_display: i32,
    pub pet_level: i32,
    pub pet_family: i32,
    pub list_order: u8,
}

pub fn thrall() -> CharacterFixture {
    CharacterFixture {
        guid: 0x0000_0000_0012_3456,
        guild: 0x1F00_0000_0000_0007,
        name: "Thrall",
        race: 2,
        class: 7,
        gender: 0,
        skin: 3,
        face: 4,
        hair_style: 5,
        hair_color: 6,
        facial_hair: 1,
        level: 85,
        zone: 1637,
        map: 1,
        position: [1_629.5, -4_373.25, 31.0],
        flags: 0x0200_0000,
        customization: 0,
        first_login: false,
        pet_display: 0,
        pet_level: 0,
        pet_family: 0,
        list_order: 0,
    }
}

pub fn jaina() -> CharacterFixture {
    CharacterFixture {
        guid: 0x0700_0000_0000_0089,
        guild: 0,
        name: "Jaina",
        race: 1,
        class: 8,
        gender: 1,
        skin: 0,
        face: 2,
        hair_style: 9,
        hair_color: 1,
        facial_hair: 0,
        level: 12,
        zone: 1519,
        map: 0,
        position: [-8_913.0, 554.5, 93.75],
        flags: 0,
        customization: 1,
        first_login: true,
        pet_display: 100,
        pet_level: 10,
        pet_family: 1,
        list_order: 1,
    }
}

pub const EQUIPMENT: usize = 19;

/// Field order of one equipment or bag slot.
#[derive(Debug, Clone, Copy)]
pub enum Slot {
    Display,
    Inventory,
    Enchant,
}

pub fn write_slots(w: &mut BitWriter, count: usize, order: [Slot; 3]) {
    for slot in 0..count {
        for field in order {
            match field {
                Slot::Display => w.write_i32(1_000 + slot as i32),
                Slot::Inventory => w.write_u8(slot as u8),
                Slot::Enchant => w.write_i32(0),
            }
        }
    }
}

/// Byte-aligned roster as sent before 4.2.2.
pub fn legacy_roster(
    chars: &[CharacterFixture],
    customization: bool,
    bags: usize,
    guild_identifier: bool,
) -> Vec<u8> {
    let mut w = BitWriter::new();
    w.write_u8(chars.len() as u8);
    for c in chars {
        w.write_u64(c.guid);
        w.write_cstring(c.name.as_bytes());
        for byte in [
            c.race,
            c.class,
            c.gender,
            c.skin,
            c.face,
            c.hair_style,
            c.hair_color,
            c.facial_hair,
            c.level,
        ] {
            w.write_u8(byte);
        }
        w.write_u32(c.zone);
        w.write_i32(c.map);
        for axis in c.position {
            w.write_f32(axis);
        }
        if guild_identifier {
            w.write_u64(c.guild);
        } else {
            w.write_i32(c.guild as i32);
        }
        w.write_i32(c.flags);
        if customization {
            w.write_u32(c.customization);
        }
        w.write_bool(c.first_login);
        w.write_i32(c.pet_display);
        w.write_i32(c.pet_level);
        w.write_i32(c.pet_family);
        let order = [Slot::Display, Slot::Inventory, Slot::Enchant];
        write_slots(&mut w, EQUIPMENT, order);
        write_slots(&mut w, bags, order);
    }
    w.finish()
}

pub fn roster_422(chars: &[CharacterFixture]) -> Vec<u8> {
    let mut w = BitWriter::new();
    w.write_u8(0);
    w.write_i32(chars.len() as i32);
    w.write_i32(0);
    for c in chars {
        let (p, g) = (MaskedId::new(c.guid), MaskedId::new(c.guild));
        g.presence(&mut w, 5);
        p.presence(&mut w, 4);
        g.presence_all(&mut w, &[3, 7, 1, 6]);
        p.presence_all(&mut w, &[5, 6, 3, 2]);
        g.presence(&mut w, 4);
        p.presence_all(&mut w, &[0, 1]);
        g.presence(&mut w, 2);
        p.presence(&mut w, 7);
        g.presence(&mut w, 0);
        w.write_bit(c.first_login);
    }
    for c in chars {
        let (p, g) = (MaskedId::new(c.guid), MaskedId::new(c.guild));
        w.write_cstring(c.name.as_bytes());
        g.byte(&mut w, 5);
        w.write_u8(c.face);
        w.write_i32(c.map);
        p.bytes(&mut w, &[1, 4]);
        g.bytes(&mut w, &[4, 0]);
        for axis in c.position {
            w.write_f32(axis);
        }
        p.byte(&mut w, 0);
        w.write_i32(c.zone as i32);
        w.write_i32(c.pet_level);
        p.bytes(&mut w, &[3, 7]);
        w.write_u8(c.facial_hair);
        w.write_u8(c.skin);
        w.write_u8(c.class);
        w.write_i32(c.pet_family);
        w.write_i32(c.flags);
        p.byte(&mut w, 2);
        w.write_i32(c.pet_display);
        g.byte(&mut w, 7);
        w.write_u8(c.level);
        p.byte(&mut w, 6);
        w.write_u8(c.hair_style);
        g.byte(&mut w, 2);
        w.write_u8(c.race);
        w.write_u8(c.hair_color);
        g.byte(&mut w, 6);
        w.write_u8(c.gender);
        p.byte(&mut w, 5);
        g.byte(&mut w, 3);
        w.write_u8(c.list_order);
        let order = [Slot::Enchant, Slot::Inventory, Slot::Display];
        write_slots(&mut w, EQUIPMENT, order);
        write_slots(&mut w, 4, order);
        w.write_u32(c.customization);
        g.byte(&mut w, 1);
    }
    w.finish()
}

pub fn roster_430(chars: &[CharacterFixture], unknown: &[(u32, u8)]) -> Vec<u8> {
    let mut w = BitWriter::new();
    w.write_bits(chars.len() as u64, 17).unwrap();
    for c in chars {
        let (p, g) = (MaskedId::new(c.guid), MaskedId::new(c.guild));
        g.presence(&mut w, 2);
        p.presence_all(&mut w, &[2, 6, 5, 4]);
        g.presence_all(&mut w, &[4, 3, 7]);
        w.write_bits(c.name.len() as u64, 7).unwrap();
        g.presence(&mut w, 0);
        p.presence_all(&mut w, &[0, 3, 1]);
        w.write_bit(c.first_login);
        g.presence(&mut w, 5);
        p.presence(&mut w, 7);
        g.presence_all(&mut w, &[6, 1]);
    }
    w.write_bits(unknown.len() as u64, 23).unwrap();
    w.write_bit(false);
    for c in chars {
        let (p, g) = (MaskedId::new(c.guid), MaskedId::new(c.guild));
        let order = [Slot::Inventory, Slot::Display, Slot::Enchant];
        write_slots(&mut w, EQUIPMENT, order);
        write_slots(&mut w, 4, order);
        g.bytes(&mut w, &[0, 1]);
        w.write_u8(c.face);
        w.write_i32(c.pet_display);
        g.byte(&mut w, 7);
        w.write_u8(c.gender);
        w.write_u8(c.level);
        w.write_i32(c.pet_level);
        w.write_u32(c.zone);
        w.write_f32(c.position[1]);
        w.write_i32(c.pet_family);
        w.write_u8(c.hair_style);
        p.byte(&mut w, 1);
        w.write_bytes(c.name.as_bytes());
        p.byte(&mut w, 0);
        w.write_u8(c.race);
        w.write_u8(c.list_order);
        p.byte(&mut w, 7);
        w.write_f32(c.position[2]);
        w.write_i32(c.map);
        g.byte(&mut w, 4);
        w.write_u8(c.hair_color);
        p.byte(&mut w, 3);
        w.write_i32(c.flags);
        w.write_u8(c.skin);
        p.bytes(&mut w, &[4, 5]);
        g.byte(&mut w, 5);
        w.write_u32(c.customization);
        w.write_f32(c.position[0]);
        w.write_u8(c.facial_hair);
        p.byte(&mut w, 6);
        g.byte(&mut w, 3);
        p.byte(&mut w, 2);
        w.write_u8(c.class);
        g.bytes(&mut w, &[6, 2]);
    }
    for &(int, byte) in unknown {
        w.write_u32(int);
        w.write_u8(byte);
    }
    w.finish()
}

/// 4.3.3 roster. The layout only transmits identifier bytes whose guards
/// are satisfiable, so fixtures keep character byte 3 zero, and character
/// byte 7 zero unless guild byte 2 is set. Guild bytes are never sent.
pub fn roster_433(chars: &[CharacterFixture], unknown: &[(u32, u8)]) -> Vec<u8> {
    let mut w = BitWriter::new();
    w.write_bits(unknown.len() as u64, 23).unwrap();
    w.write_bits(chars.len() as u64, 17).unwrap();
    for c in chars {
        let (p, g) = (MaskedId::new(c.guid), MaskedId::new(c.guild));
        p.presence(&mut w, 0);
        g.presence(&mut w, 0);
        p.presence(&mut w, 2);
        g.presence(&mut w, 2);
        w.write_bit(c.first_login);
        p.presence_all(&mut w, &[3, 6]);
        g.presence(&mut w, 2);
        p.presence_all(&mut w, &[4, 5]);
        w.write_bits(c.name.len() as u64, 4).unwrap();
        g.presence_all(&mut w, &[3, 4, 5]);
        p.presence(&mut w, 1);
        w.write_bit(false);
        g.presence(&mut w, 6);
        p.presence(&mut w, 7);
        g.presence(&mut w, 7);
        w.write_bit(false);
        w.write_bit(false);
    }
    w.write_u8(0);
    for c in chars {
        let (p, g) = (MaskedId::new(c.guid), MaskedId::new(c.guild));
        let order = [Slot::Enchant, Slot::Display, Slot::Inventory];
        write_slots(&mut w, EQUIPMENT, order);
        write_slots(&mut w, 4, order);
        w.write_u32(c.zone);
        w.write_i32(c.pet_level);
        w.write_i32(c.flags);
        w.write_u8(c.facial_hair);
        g.byte(&mut w, 0);
        p.bytes(&mut w, &[0, 2]);
        if g.bytes_present(2) {
            p.byte(&mut w, 7);
        }
        if g.bytes_present(7) {
            w.write_u8(c.list_order);
        }
        w.write_i32(c.pet_display);
        p.byte(&mut w, 4);
        w.write_u8(c.class);
        p.byte(&mut w, 6);
        w.write_f32(c.position[0]);
        p.byte(&mut w, 1);
        w.write_u8(c.race);
        w.write_i32(c.pet_family);
        w.write_f32(c.position[1]);
        w.write_u8(c.gender);
        w.write_u8(c.hair_style);
        w.write_u8(c.level);
        w.write_f32(c.position[2]);
        w.write_u32(c.customization);
        w.write_u8(c.skin);
        w.write_u8(c.hair_color);
        w.write_u8(c.face);
        w.write_i32(c.map);
        w.write_bytes(c.name.as_bytes());
    }
    for &(int, byte) in unknown {
        w.write_u32(int);
        w.write_u8(byte);
    }
    w.finish()
}

pub fn roster_434(chars: &[CharacterFixture], unknown: &[(u8, u32)]) -> Vec<u8> {
    let mut w = BitWriter::new();
    w.write_bits(unknown.len() as u64, 23).unwrap();
    w.write_bit(true);
    w.write_bits(chars.len() as u64, 17).unwrap();
    for c in chars {
        let (p, g) = (MaskedId::new(c.guid), MaskedId::new(c.guild));
        p.presence(&mut w, 3);
        g.presence_all(&mut w, &[1, 7, 2]);
        w.write_bits(c.name.len() as u64, 7).unwrap();
        p.presence_all(&mut w, &[4, 7]);
        g.presence(&mut w, 3);
        p.presence(&mut w, 5);
        g.presence(&mut w, 6);
        p.presence(&mut w, 1);
        g.presence_all(&mut w, &[5, 4]);
        w.write_bit(c.first_login);
        p.presence_all(&mut w, &[0, 2, 6]);
        g.presence(&mut w, 0);
    }
    for c in chars {
        let (p, g) = (MaskedId::new(c.guid), MaskedId::new(c.guild));
        w.write_u8(c.class);
        let order = [Slot::Inventory, Slot::Display, Slot::Enchant];
        write_slots(&mut w, EQUIPMENT, order);
        write_slots(&mut w, 4, order);
        w.write_i32(c.pet_family);
        g.byte(&mut w, 2);
        w.write_u8(c.list_order);
        w.write_u8(c.hair_style);
        g.byte(&mut w, 3);
        w.write_i32(c.pet_display);
        w.write_i32(c.flags);
        w.write_u8(c.hair_color);
        p.byte(&mut w, 4);
        w.write_i32(c.map);
        g.byte(&mut w, 5);
        w.write_f32(c.position[2]);
        g.byte(&mut w, 6);
        w.write_i32(c.pet_level);
        p.byte(&mut w, 3);
        w.write_f32(c.position[1]);
        w.write_u32(c.customization);
        w.write_u8(c.facial_hair);
        p.byte(&mut w, 7);
        w.write_u8(c.gender);
        w.write_bytes(c.name.as_bytes());
        w.write_u8(c.face);
        p.bytes(&mut w, &[0, 2]);
        g.bytes(&mut w, &[1, 7]);
        w.write_f32(c.position[0]);
        w.write_u8(c.skin);
        w.write_u8(c.race);
        w.write_u8(c.level);
        p.byte(&mut w, 6);
        g.bytes(&mut w, &[4, 0]);
        p.bytes(&mut w, &[5, 1]);
        w.write_u32(c.zone);
    }
    for &(byte, int) in unknown {
        w.write_u8(byte);
        w.write_u32(int);
    }
    w.finish()
}

/// Result of decoding one fixture against the full catalogue.
pub struct Decoded {
    pub result: CodecResult<DecodeSummary>,
    pub tree: RecordTree,
    pub state: InMemoryState,
}

pub fn registry() -> Registry {
    catalogue().unwrap()
}

pub fn decode(opcode: Opcode, build: ProtocolBuild, payload: &[u8]) -> Decoded {
    decode_with(&registry(), opcode, build, payload, &CodecLimits::for_testing())
}

pub fn decode_with(
    registry: &Registry,
    opcode: Opcode,
    build: ProtocolBuild,
    payload: &[u8],
    limits: &CodecLimits,
) -> Decoded {
    let _ = env_logger::builder().is_test(true).try_init();
    let state = InMemoryState::new();
    let mut tree = RecordTree::new();
    let message = RawMessage::new(opcode, build, payload);
    let result = decode_message(
        registry,
        &message,
        &mut tree,
        state.handles(),
        &WireLimits::for_testing(),
        limits,
    );
    Decoded {
        result,
        tree,
        state,
    }
}
