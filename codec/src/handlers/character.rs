//! Character management and session requests with build-independent
//! layouts.

use protocol::{BuildRange, Opcode, RESPONSE_SUCCESS};

use crate::error::CodecResult;
use crate::message::MessageDecoder;
use crate::registry::RegistryBuilder;

pub(super) fn register(builder: RegistryBuilder) -> CodecResult<RegistryBuilder> {
    let all = BuildRange::all();
    Ok(builder
        .register(Opcode::CmsgStandStateChange, all, "stand_state_change", stand_state_change)
        .register(Opcode::SmsgStandStateUpdate, all, "stand_state_update", stand_state_update)
        .register(Opcode::CmsgCharCreate, all, "char_create", char_create)
        .register(Opcode::CmsgCharDelete, all, "char_delete", char_delete)
        .register(Opcode::CmsgCharRename, all, "char_rename_request", char_rename_request)
        .register(Opcode::SmsgCharRename, all, "char_rename", char_rename)
        .register(Opcode::SmsgCharCreate, all, "char_response", char_response)
        .register(Opcode::SmsgCharDelete, all, "char_response", char_response)
        .register(Opcode::CmsgAlterAppearance, all, "alter_appearance", alter_appearance)
        .register(Opcode::SmsgBarberShopResult, all, "barber_shop_result", barber_shop_result)
        .register(Opcode::CmsgCharCustomize, all, "char_customize_request", char_customize_request)
        .register(Opcode::SmsgCharCustomize, all, "char_customize", char_customize)
        .register(Opcode::SmsgPlayerVehicleData, all, "player_vehicle_data", player_vehicle_data)
        .register(Opcode::CmsgPlayedTime, all, "played_time_request", played_time_request)
        .register(Opcode::SmsgPlayedTime, all, "played_time", played_time)
        .register(Opcode::SmsgLogXpGain, all, "log_xp_gain", log_xp_gain)
        .register(Opcode::SmsgTitleEarned, all, "title_earned", title_earned)
        .register(Opcode::CmsgSetTitle, all, "set_title", set_title)
        .register(
            Opcode::SmsgFailedPlayerCondition,
            all,
            "failed_player_condition",
            failed_player_condition,
        )
        .register(Opcode::CmsgShowingCloak, all, "showing_equipment", showing_equipment)
        .register(Opcode::CmsgShowingHelm, all, "showing_equipment", showing_equipment)
        .register(
            Opcode::CmsgAutoDeclineGuildInvites,
            all,
            "auto_decline_guild_invites",
            auto_decline_guild_invites,
        )
        .register(Opcode::CmsgCharEnum, all, "empty", empty)
        .register(Opcode::CmsgHearthAndResurrect, all, "empty", empty)
        .register(Opcode::CmsgSelfRes, all, "empty", empty))
}

fn stand_state_change(m: &mut MessageDecoder<'_>) -> CodecResult<()> {
    m.read_i32("Stand State", &[])?;
    Ok(())
}

fn stand_state_update(m: &mut MessageDecoder<'_>) -> CodecResult<()> {
    m.read_u8("Stand State", &[])?;
    Ok(())
}

fn char_create(m: &mut MessageDecoder<'_>) -> CodecResult<()> {
    m.read_cstring("Name", &[])?;
    for field in [
        "Race",
        "Class",
        "Gender",
        "Skin",
        "Face",
        "Hair Style",
        "Hair Color",
        "Facial Hair",
        "Outfit Id",
    ] {
        m.read_u8(field, &[])?;
    }
    Ok(())
}

fn char_delete(m: &mut MessageDecoder<'_>) -> CodecResult<()> {
    m.read_identifier("GUID", &[])?;
    Ok(())
}

fn char_rename_request(m: &mut MessageDecoder<'_>) -> CodecResult<()> {
    m.read_identifier("GUID", &[])?;
    m.read_cstring("New Name", &[])?;
    Ok(())
}

/// Reads the response code and, on success, the renamed character, whose
/// display name is registered.
fn renamed_character(m: &mut MessageDecoder<'_>) -> CodecResult<bool> {
    if m.read_u8("Response", &[])? != RESPONSE_SUCCESS {
        return Ok(false);
    }
    let guid = m.read_identifier("GUID", &[])?;
    let name = m.read_cstring("Name", &[])?;
    m.state().names.register_display_name(guid, &name);
    Ok(true)
}

fn char_rename(m: &mut MessageDecoder<'_>) -> CodecResult<()> {
    renamed_character(m)?;
    Ok(())
}

fn char_response(m: &mut MessageDecoder<'_>) -> CodecResult<()> {
    m.read_u8("Response", &[])?;
    Ok(())
}

fn alter_appearance(m: &mut MessageDecoder<'_>) -> CodecResult<()> {
    for field in ["Hair Style", "Hair Color", "Facial Hair", "Skin Color"] {
        m.read_i32(field, &[])?;
    }
    Ok(())
}

fn barber_shop_result(m: &mut MessageDecoder<'_>) -> CodecResult<()> {
    m.read_i32("Result", &[])?;
    Ok(())
}

const APPEARANCE: [&str; 6] = [
    "Gender",
    "Skin",
    "Face",
    "Hair Style",
    "Hair Color",
    "Facial Hair",
];

fn char_customize_request(m: &mut MessageDecoder<'_>) -> CodecResult<()> {
    m.read_identifier("GUID", &[])?;
    m.read_cstring("New Name", &[])?;
    for field in APPEARANCE {
        m.read_u8(field, &[])?;
    }
    Ok(())
}

fn char_customize(m: &mut MessageDecoder<'_>) -> CodecResult<()> {
    if !renamed_character(m)? {
        return Ok(());
    }
    for field in APPEARANCE {
        m.read_u8(field, &[])?;
    }
    Ok(())
}

fn player_vehicle_data(m: &mut MessageDecoder<'_>) -> CodecResult<()> {
    m.read_packed_identifier("GUID", &[])?;
    m.read_i32("Vehicle Id", &[])?;
    Ok(())
}

fn played_time_request(m: &mut MessageDecoder<'_>) -> CodecResult<()> {
    m.read_bool("Print In Chat", &[])?;
    Ok(())
}

fn played_time(m: &mut MessageDecoder<'_>) -> CodecResult<()> {
    m.read_i32("Time Played", &[])?;
    m.read_i32("Total", &[])?;
    m.read_bool("Print In Chat", &[])?;
    Ok(())
}

/// Experience source that carries the kill breakdown.
const XP_TYPE_KILL: u8 = 0;

fn log_xp_gain(m: &mut MessageDecoder<'_>) -> CodecResult<()> {
    m.read_identifier("GUID", &[])?;
    m.read_u32("Total XP", &[])?;
    if m.read_u8("XP Type", &[])? == XP_TYPE_KILL {
        m.read_u32("Base XP", &[])?;
        m.read_f32("Group Rate", &[])?;
    }
    m.read_bool("RAF Bonus", &[])?;
    Ok(())
}

fn title_earned(m: &mut MessageDecoder<'_>) -> CodecResult<()> {
    m.read_u32("Title Id", &[])?;
    m.read_u32("Earned", &[])?;
    Ok(())
}

fn set_title(m: &mut MessageDecoder<'_>) -> CodecResult<()> {
    m.read_u32("Title Id", &[])?;
    Ok(())
}

fn failed_player_condition(m: &mut MessageDecoder<'_>) -> CodecResult<()> {
    m.read_i32("Id", &[])?;
    Ok(())
}

fn showing_equipment(m: &mut MessageDecoder<'_>) -> CodecResult<()> {
    m.read_bool("Showing", &[])?;
    Ok(())
}

fn auto_decline_guild_invites(m: &mut MessageDecoder<'_>) -> CodecResult<()> {
    m.read_bool("Auto Decline", &[])?;
    Ok(())
}

#[allow(clippy::unnecessary_wraps)]
fn empty(_: &mut MessageDecoder<'_>) -> CodecResult<()> {
    Ok(())
}
