//! Logical message types.

use std::fmt;
use std::str::FromStr;

use crate::error::ProtocolError;

macro_rules! opcodes {
    ($($variant:ident => $name:literal,)+) => {
        /// A logical message type, stable across builds even when its wire
        /// layout is not.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        pub enum Opcode {
            $(
                #[doc = concat!("`", $name, "`")]
                $variant,
            )+
        }

        impl Opcode {
            /// Every opcode in the catalogue, in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant,)+];

            /// Returns the canonical protocol name, e.g. `SMSG_CHAR_ENUM`.
            #[must_use]
            pub const fn name(self) -> &'static str {
                match self {
                    $(Self::$variant => $name,)+
                }
            }
        }
    };
}

opcodes! {
    CmsgStandStateChange => "CMSG_STANDSTATECHANGE",
    SmsgStandStateUpdate => "SMSG_STANDSTATE_UPDATE",
    CmsgCharCreate => "CMSG_CHAR_CREATE",
    CmsgCharDelete => "CMSG_CHAR_DELETE",
    CmsgCharRename => "CMSG_CHAR_RENAME",
    SmsgCharRename => "SMSG_CHAR_RENAME",
    SmsgCharCreate => "SMSG_CHAR_CREATE",
    SmsgCharDelete => "SMSG_CHAR_DELETE",
    CmsgAlterAppearance => "CMSG_ALTER_APPEARANCE",
    SmsgBarberShopResult => "SMSG_BARBER_SHOP_RESULT",
    CmsgCharCustomize => "CMSG_CHAR_CUSTOMIZE",
    SmsgCharCustomize => "SMSG_CHAR_CUSTOMIZE",
    SmsgCharEnum => "SMSG_CHAR_ENUM",
    SmsgCompressedCharEnum => "SMSG_COMPRESSED_CHAR_ENUM",
    SmsgPlayerVehicleData => "SMSG_PLAYER_VEHICLE_DATA",
    CmsgPlayedTime => "CMSG_PLAYED_TIME",
    SmsgPlayedTime => "SMSG_PLAYED_TIME",
    SmsgLogXpGain => "SMSG_LOG_XPGAIN",
    SmsgTitleEarned => "SMSG_TITLE_EARNED",
    CmsgSetTitle => "CMSG_SET_TITLE",
    SmsgInitCurrency => "SMSG_INIT_CURRENCY",
    SmsgUpdateCurrency => "SMSG_UPDATE_CURRENCY",
    SmsgUpdateCurrencyWeekLimit => "SMSG_UPDATE_CURRENCY_WEEK_LIMIT",
    CmsgSetCurrencyFlags => "CMSG_SET_CURRENCY_FLAGS",
    SmsgXpGainAborted => "SMSG_XP_GAIN_ABORTED",
    SmsgFailedPlayerCondition => "SMSG_FAILED_PLAYER_CONDITION",
    CmsgShowingCloak => "CMSG_SHOWING_CLOAK",
    CmsgShowingHelm => "CMSG_SHOWING_HELM",
    CmsgAutoDeclineGuildInvites => "CMSG_AUTO_DECLINE_GUILD_INVITES",
    CmsgReorderCharacters => "CMSG_REORDER_CHARACTERS",
    SmsgLevelupInfo => "SMSG_LEVELUP_INFO",
    SmsgHealthUpdate => "SMSG_HEALTH_UPDATE",
    SmsgPowerUpdate => "SMSG_POWER_UPDATE",
    CmsgCharEnum => "CMSG_CHAR_ENUM",
    CmsgHearthAndResurrect => "CMSG_HEARTH_AND_RESURRECT",
    CmsgSelfRes => "CMSG_SELF_RES",
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Opcode {
    type Err = ProtocolError;

    /// Parses a protocol name, ignoring ASCII case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|opcode| opcode.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| ProtocolError::UnknownOpcode {
                name: s.to_string(),
            })
    }
}
