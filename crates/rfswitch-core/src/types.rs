//! Switch types and event operations from `linux/rfkill.h`.

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::error::RfkillError;

/// Category of RF device behind a switch.
///
/// Values the kernel may add later decode to [`RfkillType::Unknown`], which keeps the raw
/// byte so a record can be re-encoded unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RfkillType {
    /// Every type. Only meaningful in change-all requests.
    All,
    /// 802.11 wireless LAN.
    Wlan,
    Bluetooth,
    /// Ultra-wideband.
    Uwb,
    Wimax,
    /// Wireless WAN (cellular modems).
    Wwan,
    Gps,
    /// FM radio.
    Fm,
    Nfc,
    /// A type value this crate has no name for.
    Unknown(u8),
}

impl RfkillType {
    /// Convert the raw type byte of a record.
    ///
    /// Never fails: unmapped values become [`RfkillType::Unknown`].
    pub fn from_u8(value: u8) -> Self {
        match value {
            0 => RfkillType::All,
            1 => RfkillType::Wlan,
            2 => RfkillType::Bluetooth,
            3 => RfkillType::Uwb,
            4 => RfkillType::Wimax,
            5 => RfkillType::Wwan,
            6 => RfkillType::Gps,
            7 => RfkillType::Fm,
            8 => RfkillType::Nfc,
            other => RfkillType::Unknown(other),
        }
    }

    /// Raw type byte as written to the device.
    pub fn as_u8(self) -> u8 {
        match self {
            RfkillType::All => 0,
            RfkillType::Wlan => 1,
            RfkillType::Bluetooth => 2,
            RfkillType::Uwb => 3,
            RfkillType::Wimax => 4,
            RfkillType::Wwan => 5,
            RfkillType::Gps => 6,
            RfkillType::Fm => 7,
            RfkillType::Nfc => 8,
            RfkillType::Unknown(value) => value,
        }
    }

    /// Canonical lower-case name, as printed by `rfkill list`.
    pub fn name(self) -> &'static str {
        match self {
            RfkillType::All => "all",
            RfkillType::Wlan => "wlan",
            RfkillType::Bluetooth => "bluetooth",
            RfkillType::Uwb => "uwb",
            RfkillType::Wimax => "wimax",
            RfkillType::Wwan => "wwan",
            RfkillType::Gps => "gps",
            RfkillType::Fm => "fm",
            RfkillType::Nfc => "nfc",
            RfkillType::Unknown(_) => "unknown",
        }
    }
}

impl fmt::Display for RfkillType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Parses the canonical names only (`all`, `wlan`, ... `nfc`); matching is case-sensitive.
impl FromStr for RfkillType {
    type Err = RfkillError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        (0..=8)
            .map(RfkillType::from_u8)
            .find(|t| t.name() == s)
            .ok_or_else(|| RfkillError::InvalidType(s.to_string()))
    }
}

impl Serialize for RfkillType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

/// rfkill event operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RfkillOp {
    /// A switch appeared (also sent for every existing switch right after open).
    Add,
    /// A switch went away.
    Del,
    /// One switch changed state, or a request to change it.
    Change,
    /// Every switch of one type changed state.
    ChangeAll,
    /// Not defined by the kernel; rejected when applied.
    Unknown(u8),
}

impl RfkillOp {
    /// Convert the raw op byte of a record. Unmapped values become [`RfkillOp::Unknown`].
    pub fn from_u8(value: u8) -> Self {
        match value {
            0 => RfkillOp::Add,
            1 => RfkillOp::Del,
            2 => RfkillOp::Change,
            3 => RfkillOp::ChangeAll,
            other => RfkillOp::Unknown(other),
        }
    }

    /// Raw op byte as written to the device.
    pub fn as_u8(self) -> u8 {
        match self {
            RfkillOp::Add => 0,
            RfkillOp::Del => 1,
            RfkillOp::Change => 2,
            RfkillOp::ChangeAll => 3,
            RfkillOp::Unknown(value) => value,
        }
    }

    /// Lower-case name used in logs and JSON output.
    pub fn name(self) -> &'static str {
        match self {
            RfkillOp::Add => "add",
            RfkillOp::Del => "delete",
            RfkillOp::Change => "change",
            RfkillOp::ChangeAll => "change_all",
            RfkillOp::Unknown(_) => "unknown",
        }
    }
}

impl fmt::Display for RfkillOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RfkillOp::Unknown(value) => write!(f, "unknown({value})"),
            other => f.write_str(other.name()),
        }
    }
}

impl Serialize for RfkillOp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_names() {
        let names: Vec<&str> = (0..=8).map(|v| RfkillType::from_u8(v).name()).collect();
        assert_eq!(
            names,
            ["all", "wlan", "bluetooth", "uwb", "wimax", "wwan", "gps", "fm", "nfc"]
        );
        assert_eq!(RfkillType::from_u8(9).name(), "unknown");
        assert_eq!(RfkillType::from_u8(200).to_string(), "unknown");
    }

    #[test]
    fn test_type_raw_value_preserved() {
        for value in 0..=u8::MAX {
            assert_eq!(RfkillType::from_u8(value).as_u8(), value);
            assert_eq!(RfkillOp::from_u8(value).as_u8(), value);
        }
    }

    #[test]
    fn test_type_from_str() {
        assert_eq!("bluetooth".parse::<RfkillType>().unwrap(), RfkillType::Bluetooth);
        assert_eq!("all".parse::<RfkillType>().unwrap(), RfkillType::All);
        assert!("Bluetooth".parse::<RfkillType>().is_err());
        assert!("unknown".parse::<RfkillType>().is_err());
    }

    #[test]
    fn test_op_display() {
        assert_eq!(RfkillOp::ChangeAll.to_string(), "change_all");
        assert_eq!(RfkillOp::from_u8(99).to_string(), "unknown(99)");
    }
}
