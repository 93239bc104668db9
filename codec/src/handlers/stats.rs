//! Level, health and power updates, and the identifier-obfuscated
//! experience and roster-order messages.

use protocol::{BuildRange, Opcode, ProtocolBuild};

use super::common::between;
use crate::error::CodecResult;
use crate::guid::IdentifierBuilder;
use crate::message::MessageDecoder;
use crate::registry::RegistryBuilder;
use crate::sink::FieldValue;

const STAT_COUNT: usize = 5;

pub(super) fn register(builder: RegistryBuilder) -> CodecResult<RegistryBuilder> {
    use ProtocolBuild as B;

    Ok(builder
        .register(
            Opcode::SmsgLevelupInfo,
            between(B::ZERO, B::V3_0_2_9056)?,
            "levelup_info_classic",
            levelup_info_classic,
        )
        .register(
            Opcode::SmsgLevelupInfo,
            between(B::V3_0_2_9056, B::V4_0_1_13164)?,
            "levelup_info_wotlk",
            levelup_info_wotlk,
        )
        .register(
            Opcode::SmsgLevelupInfo,
            BuildRange::starting_at(B::V4_0_1_13164),
            "levelup_info_cata",
            levelup_info_cata,
        )
        .register(
            Opcode::SmsgHealthUpdate,
            BuildRange::all(),
            "health_update",
            health_update,
        )
        .register(
            Opcode::SmsgPowerUpdate,
            between(B::ZERO, B::V4_0_1_13164)?,
            "power_update_single",
            power_update_single,
        )
        .register(
            Opcode::SmsgPowerUpdate,
            BuildRange::starting_at(B::V4_0_1_13164),
            "power_update",
            power_update,
        )
        .register(
            Opcode::SmsgXpGainAborted,
            BuildRange::all(),
            "xp_gain_aborted",
            xp_gain_aborted,
        )
        .register(
            Opcode::CmsgReorderCharacters,
            BuildRange::all(),
            "reorder_characters",
            reorder_characters,
        ))
}

fn levelup_info_classic(m: &mut MessageDecoder<'_>) -> CodecResult<()> {
    levelup_info(m, 5)
}

fn levelup_info_wotlk(m: &mut MessageDecoder<'_>) -> CodecResult<()> {
    levelup_info(m, 7)
}

fn levelup_info_cata(m: &mut MessageDecoder<'_>) -> CodecResult<()> {
    levelup_info(m, 5)
}

fn levelup_info(m: &mut MessageDecoder<'_>, powers: usize) -> CodecResult<()> {
    let level = m.read_u32("Level", &[])?;
    m.read_i32("Health", &[])?;

    typed_values(m, "Powers", "Power Type", powers)?;
    typed_values(m, "Stats", "Stat Type", STAT_COUNT)?;

    let state = m.state();
    if let Some(id) = state.session.current_session_entity() {
        state.objects.update_level(id, level);
    }
    Ok(())
}

/// Records `count` values, each preceded by its position as the type.
fn typed_values(
    m: &mut MessageDecoder<'_>,
    list: &'static str,
    kind: &'static str,
    count: usize,
) -> CodecResult<()> {
    m.list(list, &[], |m| {
        for (i, type_id) in (0..count).zip(0u64..) {
            m.record(kind, FieldValue::UInt(type_id), &[i]);
            m.read_i32("Value", &[i])?;
        }
        Ok(())
    })
}

fn health_update(m: &mut MessageDecoder<'_>) -> CodecResult<()> {
    m.read_packed_identifier("GUID", &[])?;
    m.read_u32("Value", &[])?;
    Ok(())
}

fn power_update_single(m: &mut MessageDecoder<'_>) -> CodecResult<()> {
    m.read_packed_identifier("GUID", &[])?;
    power_entries(m, 1)
}

fn power_update(m: &mut MessageDecoder<'_>) -> CodecResult<()> {
    m.read_packed_identifier("GUID", &[])?;
    let count = m.read_i32("Count", &[])?;
    let count = m.checked_count("Count", count.into(), 5 * 8)?;
    power_entries(m, count)
}

fn power_entries(m: &mut MessageDecoder<'_>, count: usize) -> CodecResult<()> {
    m.list("Powers", &[], |m| {
        for i in 0..count {
            m.read_u8("Power Type", &[i])?;
            m.read_i32("Value", &[i])?;
        }
        Ok(())
    })
}

fn xp_gain_aborted(m: &mut MessageDecoder<'_>) -> CodecResult<()> {
    let mut guid = IdentifierBuilder::begin([4, 0, 1, 2, 6, 7, 5, 3]);
    guid.read_presence(m.cursor())?;

    m.absorb_all(&mut guid, &[7, 1, 4, 0, 2])?;
    m.read_i32("Unknown Int32 1", &[])?;
    m.absorb(&mut guid, 6)?;
    m.read_i32("Unknown Int32 2", &[])?;
    m.absorb_all(&mut guid, &[3, 5])?;
    m.read_i32("Unknown Int32 3", &[])?;

    m.record_identifier("Guid", guid.finish(), &[]);
    Ok(())
}

const REORDER_PRESENCE: [u8; 8] = [1, 4, 5, 3, 0, 7, 6, 2];

fn reorder_characters(m: &mut MessageDecoder<'_>) -> CodecResult<()> {
    let count = m.read_bits("Count", 10, &[])?;
    // eight presence bits and the slot byte
    let count = m.checked_count("Count", i64::try_from(count).unwrap_or(i64::MAX), 16)?;

    let mut guids = Vec::with_capacity(count);
    for _ in 0..count {
        let mut guid = IdentifierBuilder::begin(REORDER_PRESENCE);
        guid.read_presence(m.cursor())?;
        guids.push(guid);
    }

    m.list("Characters", &[], |m| {
        for (i, mut guid) in guids.into_iter().enumerate() {
            m.absorb_all(&mut guid, &[6, 5, 1, 4, 0, 3])?;
            m.read_u8("Slot", &[i])?;
            m.absorb_all(&mut guid, &[2, 7])?;
            m.record_identifier("Character Guid", guid.finish(), &[i]);
        }
        Ok(())
    })
}
