//! Currency messages.

use protocol::{BuildRange, Opcode, ProtocolBuild};

use super::common::between;
use crate::error::CodecResult;
use crate::message::MessageDecoder;
use crate::registry::RegistryBuilder;
use crate::sink::FieldValue;

pub(super) fn register(builder: RegistryBuilder) -> CodecResult<RegistryBuilder> {
    use ProtocolBuild as B;

    Ok(builder
        .register(
            Opcode::SmsgInitCurrency,
            between(B::ZERO, B::V4_2_2_14545)?,
            "init_currency",
            init_currency,
        )
        .register(
            Opcode::SmsgInitCurrency,
            between(B::V4_2_2_14545, B::V4_3_4_15595)?,
            "init_currency_422",
            init_currency_422,
        )
        .register(
            Opcode::SmsgInitCurrency,
            BuildRange::starting_at(B::V4_3_4_15595),
            "init_currency_434",
            init_currency_434,
        )
        .register(
            Opcode::SmsgUpdateCurrency,
            between(B::ZERO, B::V4_3_4_15595)?,
            "update_currency",
            update_currency,
        )
        .register(
            Opcode::SmsgUpdateCurrency,
            BuildRange::starting_at(B::V4_3_4_15595),
            "update_currency_434",
            update_currency_434,
        )
        .register(
            Opcode::SmsgUpdateCurrencyWeekLimit,
            BuildRange::all(),
            "update_currency_week_limit",
            update_currency_week_limit,
        )
        .register(
            Opcode::CmsgSetCurrencyFlags,
            BuildRange::all(),
            "set_currency_flags",
            set_currency_flags,
        ))
}

fn init_currency(m: &mut MessageDecoder<'_>) -> CodecResult<()> {
    let count = m.read_u32("Count", &[])?;
    let count = m.checked_count("Count", count.into(), 21 * 8)?;

    m.list("Currencies", &[], |m| {
        for i in 0..count {
            let idx = [i];
            m.read_u32("Week Count", &idx)?;
            m.read_u8("Unknown Byte", &idx)?;
            m.read_u32("Currency Id", &idx)?;
            m.read_u32("Reset Time", &idx)?;
            m.read_u32("Week Cap", &idx)?;
            m.read_i32("Total Count", &idx)?;
        }
        Ok(())
    })
}

fn init_currency_422(m: &mut MessageDecoder<'_>) -> CodecResult<()> {
    let count = m.read_u32("Count", &[])?;
    let count = m.checked_count("Count", count.into(), 3 + 9 * 8)?;

    let mut flags = Vec::with_capacity(count);
    for _ in 0..count {
        let cursor = m.cursor();
        flags.push([cursor.read_bit()?, cursor.read_bit()?, cursor.read_bit()?]);
    }

    m.list("Currencies", &[], |m| {
        for (i, [has_week_cap, has_season_total, has_week_count]) in
            flags.into_iter().enumerate()
        {
            let idx = [i];
            m.read_i32("Currency Id", &idx)?;
            if has_week_cap {
                m.read_i32("Week Cap", &idx)?;
            }
            m.read_i32("Total Count", &idx)?;
            m.read_u8("Unknown Byte", &idx)?;
            if has_season_total {
                m.read_i32("Season Total Earned", &idx)?;
            }
            if has_week_count {
                m.read_u32("Week Count", &idx)?;
            }
        }
        Ok(())
    })
}

#[derive(Debug, Clone, Copy)]
struct CurrencyBits {
    has_week_count: bool,
    flags: u64,
    has_week_cap: bool,
    has_season_total: bool,
}

fn init_currency_434(m: &mut MessageDecoder<'_>) -> CodecResult<()> {
    let count = m.read_bits("Count", 23, &[])?;
    let count = m.checked_count("Count", i64::try_from(count).unwrap_or(i64::MAX), 7 + 8 * 8)?;

    let mut entries = Vec::with_capacity(count);
    for _ in 0..count {
        let cursor = m.cursor();
        entries.push(CurrencyBits {
            has_week_count: cursor.read_bit()?,
            flags: cursor.read_bits(4)?,
            has_week_cap: cursor.read_bit()?,
            has_season_total: cursor.read_bit()?,
        });
    }

    m.list("Currencies", &[], |m| {
        for (i, bits) in entries.into_iter().enumerate() {
            let idx = [i];
            m.record("Flags", FieldValue::UInt(bits.flags), &idx);
            m.read_u32("Currency Count", &idx)?;
            if bits.has_week_cap {
                m.read_u32("Week Cap", &idx)?;
            }
            if bits.has_season_total {
                m.read_u32("Season Total Earned", &idx)?;
            }
            m.read_u32("Currency Id", &idx)?;
            if bits.has_week_count {
                m.read_u32("Week Count", &idx)?;
            }
        }
        Ok(())
    })
}

fn update_currency(m: &mut MessageDecoder<'_>) -> CodecResult<()> {
    m.read_u32("Currency Id", &[])?;
    m.read_u32("Week Count", &[])?;
    m.read_u32("Total Count", &[])?;
    Ok(())
}

fn update_currency_434(m: &mut MessageDecoder<'_>) -> CodecResult<()> {
    let has_week_count = m.cursor().read_bit()?;
    let has_season_total = m.cursor().read_bit()?;
    m.read_flag("Print In Log", &[])?;

    if has_season_total {
        m.read_i32("Season Total Earned", &[])?;
    }
    m.read_i32("Total Count", &[])?;
    m.read_i32("Currency Id", &[])?;
    if has_week_count {
        m.read_i32("Week Count", &[])?;
    }
    Ok(())
}

fn update_currency_week_limit(m: &mut MessageDecoder<'_>) -> CodecResult<()> {
    m.read_u32("Week Cap", &[])?;
    m.read_u32("Currency Id", &[])?;
    Ok(())
}

fn set_currency_flags(m: &mut MessageDecoder<'_>) -> CodecResult<()> {
    m.read_u32("Flags", &[])?;
    m.read_u32("Currency Id", &[])?;
    Ok(())
}
