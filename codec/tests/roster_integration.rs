mod common;

use codec::{CodecError, CodecLimits, FieldValue, LimitKind};
use common::{
    decode, decode_with, jaina, legacy_roster, registry, roster_422, roster_430, roster_433,
    roster_434, thrall, CharacterFixture, Decoded,
};
use protocol::{Identifier, Opcode, ProtocolBuild};

fn assert_roster(decoded: &Decoded, chars: &[CharacterFixture], guids: &[u64], bags: usize) {
    let summary = decoded.result.as_ref().unwrap();
    assert_eq!(summary.trailing_bytes, 0);
    assert!(decoded.tree.is_balanced());
    assert!(!decoded.tree.is_incomplete());

    let tree = &decoded.tree;
    assert_eq!(tree.list("Characters").unwrap().entry_count(), chars.len());

    let equipment = tree.lists("Equipment");
    let bag_lists = tree.lists("Bags");
    assert_eq!(equipment.len(), chars.len());
    assert_eq!(bag_lists.len(), chars.len());

    for (i, (c, &guid)) in chars.iter().zip(guids).enumerate() {
        assert_eq!(equipment[i].entry_count(), 19);
        assert_eq!(bag_lists[i].entry_count(), bags);
        assert_eq!(
            tree.field("Name", &[i]),
            Some(&FieldValue::Str(c.name.to_owned()))
        );
        assert_eq!(
            tree.field("Character GUID", &[i]),
            Some(&FieldValue::Identifier(Identifier::new(guid)))
        );
        assert_eq!(tree.field("Level", &[i]), Some(&FieldValue::UInt(c.level.into())));
        assert_eq!(tree.field("Display Id", &[i, 18]), Some(&FieldValue::Int(1_018)));

        let id = Identifier::new(guid);
        assert_eq!(decoded.state.display_name(id).as_deref(), Some(c.name));
        let entity = decoded.state.entity(id).unwrap();
        assert_eq!(entity.attributes.name, c.name);
        assert_eq!(entity.attributes.race, c.race);
        assert_eq!(entity.attributes.class, c.class);
        assert_eq!(entity.attributes.level, u32::from(c.level));
        assert_eq!(entity.attributes.first_login, c.first_login);
    }

    assert_eq!(decoded.state.entity_count(), chars.len());
    assert_eq!(decoded.state.name_count(), chars.len());
}

fn guids(chars: &[CharacterFixture]) -> Vec<u64> {
    chars.iter().map(|c| c.guid).collect()
}

#[test]
fn legacy_rosters_decode_at_each_build() {
    let chars = [thrall(), jaina()];
    let cases = [
        (ProtocolBuild::new(8_606), false, 1, false),
        (ProtocolBuild::V3_0_2_9056, true, 1, false),
        (ProtocolBuild::V3_3_5_12340, true, 4, false),
        (ProtocolBuild::V4_0_3_13329, true, 4, true),
    ];
    for (build, customization, bags, guild_identifier) in cases {
        let payload = legacy_roster(&chars, customization, bags, guild_identifier);
        let decoded = decode(Opcode::SmsgCharEnum, build, &payload);
        assert_roster(&decoded, &chars, &guids(&chars), bags);
        assert_eq!(
            decoded.tree.field("Customization Flags", &[1]).is_some(),
            customization,
            "build {build}"
        );
    }
}

#[test]
fn legacy_guild_field_switches_to_identifier() {
    let chars = [thrall()];
    let payload = legacy_roster(&chars, true, 4, true);
    let decoded = decode(Opcode::SmsgCharEnum, ProtocolBuild::V4_0_3_13329, &payload);
    assert_eq!(
        decoded.tree.field("Guild GUID", &[0]),
        Some(&FieldValue::Identifier(Identifier::new(thrall().guild)))
    );
    assert!(decoded.tree.field("Guild Id", &[0]).is_none());
}

#[test]
fn roster_422_reassembles_identifiers() {
    let chars = [thrall(), jaina()];
    let decoded = decode(
        Opcode::SmsgCharEnum,
        ProtocolBuild::V4_2_2_14545,
        &roster_422(&chars),
    );
    assert_roster(&decoded, &chars, &guids(&chars), 4);
    assert_eq!(
        decoded.tree.field("Guild GUID", &[0]),
        Some(&FieldValue::Identifier(Identifier::new(thrall().guild)))
    );
    assert_eq!(
        decoded.tree.field("First Login", &[1]),
        Some(&FieldValue::Bool(true))
    );
}

#[test]
fn roster_430_records_position_and_trailing_list() {
    let chars = [thrall(), jaina()];
    let payload = roster_430(&chars, &[(7, 1), (9, 2), (11, 3)]);
    let decoded = decode(Opcode::SmsgCharEnum, ProtocolBuild::V4_3_0_15005, &payload);
    assert_roster(&decoded, &chars, &guids(&chars), 4);

    let [x, y, z] = thrall().position;
    assert_eq!(
        decoded.tree.field("Position", &[0]),
        Some(&FieldValue::Vector3 { x, y, z })
    );
    assert_eq!(
        decoded.tree.list("Unknown Entries").unwrap().entry_count(),
        3
    );
}

#[test]
fn roster_433_follows_recovered_guards() {
    let chars = [thrall(), jaina()];
    let payload = roster_433(&chars, &[(5, 5)]);
    let decoded = decode(Opcode::SmsgCharEnum, ProtocolBuild::V4_3_3_15354, &payload);

    // character byte 7 is only read when guild byte 2 is present
    let expected = [thrall().guid, jaina().guid & 0x00FF_FFFF_FFFF_FFFF];
    assert_roster(&decoded, &chars, &expected, 4);
    // guild byte 0 is the only guild byte on the wire
    assert_eq!(
        decoded.tree.field("Guild GUID", &[0]),
        Some(&FieldValue::Identifier(Identifier::new(0x07)))
    );
    // list order is guarded by guild byte 7
    assert!(decoded.tree.field("List Order", &[0]).is_some());
    assert!(decoded.tree.field("List Order", &[1]).is_none());
}

#[test]
fn roster_433_with_every_guild_byte_present() {
    let c = CharacterFixture {
        guid: 0x4200_0000_0012_3456,
        guild: 0x0807_0605_0403_02AB,
        list_order: 3,
        pet_display: 5,
        map: 16,
        ..thrall()
    };
    let payload = roster_433(std::slice::from_ref(&c), &[]);
    let decoded = decode(Opcode::SmsgCharEnum, ProtocolBuild::V4_3_3_15354, &payload);

    assert_roster(&decoded, std::slice::from_ref(&c), &[c.guid], 4);
    let tree = &decoded.tree;
    let field = |name: &str| tree.field(name, &[0]).cloned();
    assert_eq!(
        field("Guild GUID"),
        Some(FieldValue::Identifier(Identifier::new(0xAB)))
    );
    assert_eq!(field("Zone Id"), Some(FieldValue::UInt(c.zone.into())));
    assert_eq!(field("Pet Level"), Some(FieldValue::Int(c.pet_level.into())));
    assert_eq!(field("Character Flags"), Some(FieldValue::Int(c.flags.into())));
    assert_eq!(field("Facial Hair"), Some(FieldValue::UInt(c.facial_hair.into())));
    assert_eq!(field("List Order"), Some(FieldValue::UInt(3)));
    assert_eq!(field("Pet Display Id"), Some(FieldValue::Int(5)));
    assert_eq!(field("Class"), Some(FieldValue::UInt(c.class.into())));
    assert_eq!(field("Race"), Some(FieldValue::UInt(c.race.into())));
    assert_eq!(field("Pet Family"), Some(FieldValue::Int(c.pet_family.into())));
    assert_eq!(field("Gender"), Some(FieldValue::UInt(c.gender.into())));
    assert_eq!(field("Hair Style"), Some(FieldValue::UInt(c.hair_style.into())));
    assert_eq!(
        field("Customization Flags"),
        Some(FieldValue::UInt(c.customization.into()))
    );
    assert_eq!(field("Skin"), Some(FieldValue::UInt(c.skin.into())));
    assert_eq!(field("Hair Color"), Some(FieldValue::UInt(c.hair_color.into())));
    assert_eq!(field("Face"), Some(FieldValue::UInt(c.face.into())));
    assert_eq!(field("Map Id"), Some(FieldValue::Int(16)));
    let [x, y, z] = c.position;
    assert_eq!(field("Position"), Some(FieldValue::Vector3 { x, y, z }));
}

#[test]
fn roster_434_decodes_two_characters() {
    let chars = [thrall(), jaina()];
    let payload = roster_434(&chars, &[(1, 2)]);
    let decoded = decode(Opcode::SmsgCharEnum, ProtocolBuild::V4_3_4_15595, &payload);
    assert_roster(&decoded, &chars, &guids(&chars), 4);
    assert_eq!(
        decoded.tree.field("Unknown Bit", &[]),
        Some(&FieldValue::Bool(true))
    );
    assert_eq!(
        decoded.tree.field("Guild GUID", &[1]),
        Some(&FieldValue::Identifier(Identifier::EMPTY))
    );
    assert_eq!(decoded.result.as_ref().unwrap().handler, "char_enum_434");
}

#[test]
fn later_builds_reuse_open_ended_layout() {
    let chars = [jaina()];
    let payload = roster_434(&chars, &[]);
    let decoded = decode(Opcode::SmsgCharEnum, ProtocolBuild::new(16_000), &payload);
    assert_roster(&decoded, &chars, &guids(&chars), 4);
}

#[test]
fn empty_roster_records_empty_list() {
    let decoded = decode(
        Opcode::SmsgCharEnum,
        ProtocolBuild::V4_3_4_15595,
        &roster_434(&[], &[]),
    );
    assert!(decoded.result.is_ok());
    assert_eq!(decoded.tree.list("Characters").unwrap().entry_count(), 0);
    assert_eq!(decoded.state.entity_count(), 0);
}

#[test]
fn decoding_twice_registers_each_character_once() {
    let chars = [thrall(), jaina()];
    let payload = roster_434(&chars, &[]);
    let registry = registry();
    let state = codec::InMemoryState::new();
    for _ in 0..2 {
        let mut tree = codec::RecordTree::new();
        let message = wire::RawMessage::new(
            Opcode::SmsgCharEnum,
            ProtocolBuild::V4_3_4_15595,
            &payload,
        );
        codec::decode_message(
            &registry,
            &message,
            &mut tree,
            state.handles(),
            &codec::WireLimits::for_testing(),
            &CodecLimits::for_testing(),
        )
        .unwrap();
    }
    assert_eq!(state.entity_count(), 2);
    assert_eq!(state.name_count(), 2);
}

#[test]
fn truncated_roster_keeps_partial_records() {
    let chars = [thrall(), jaina()];
    let payload = roster_434(&chars, &[]);
    // drop the second character's tail
    let cut = &payload[..payload.len() - 10];
    let decoded = decode(Opcode::SmsgCharEnum, ProtocolBuild::V4_3_4_15595, cut);

    let err = decoded.result.unwrap_err();
    assert!(err.is_out_of_data(), "{err}");
    assert!(decoded.tree.is_balanced());
    assert!(decoded.tree.is_incomplete());
    assert_eq!(
        decoded.tree.field("Name", &[0]),
        Some(&FieldValue::Str("Thrall".into()))
    );
    // the first character completed and was registered
    assert_eq!(decoded.state.entity_count(), 1);
}

#[test]
fn oversized_count_is_rejected_before_allocation() {
    let mut w = bitstream::BitWriter::new();
    w.write_bits(0, 23).unwrap();
    w.write_bit(false);
    w.write_bits(100_000, 17).unwrap();
    let payload = w.finish();

    let decoded = decode_with(
        &registry(),
        Opcode::SmsgCharEnum,
        ProtocolBuild::V4_3_4_15595,
        &payload,
        &CodecLimits::unlimited(),
    );
    let err = decoded.result.unwrap_err();
    assert!(matches!(err, CodecError::MalformedCount { .. }), "{err}");
    assert!(err.is_out_of_data());
}

#[test]
fn count_above_limit_is_rejected() {
    let mut w = bitstream::BitWriter::new();
    w.write_u8(0);
    w.write_i32(300);
    w.write_i32(0);
    let payload = w.finish();

    let decoded = decode(Opcode::SmsgCharEnum, ProtocolBuild::V4_2_2_14545, &payload);
    assert!(matches!(
        decoded.result,
        Err(CodecError::LimitsExceeded {
            kind: LimitKind::ListEntries,
            ..
        })
    ));
}

#[test]
fn negative_count_is_malformed() {
    let mut w = bitstream::BitWriter::new();
    w.write_u8(0);
    w.write_i32(-1);
    w.write_i32(0);
    let payload = w.finish();

    let decoded = decode(Opcode::SmsgCharEnum, ProtocolBuild::V4_2_2_14545, &payload);
    assert!(matches!(
        decoded.result,
        Err(CodecError::MalformedCount { count: -1, .. })
    ));
}
