use std::collections::HashMap;

use serde::Serialize;

use crate::error::{Result, RfkillError};
use crate::event::Event;
use crate::types::{RfkillOp, RfkillType};

/// Last known state of one switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SwitchState {
    /// Switch index (matches /sys/class/rfkill/rfkill{idx})
    pub idx: u32,
    /// Device type (WLAN, Bluetooth, etc.)
    #[serde(rename = "type")]
    pub type_: RfkillType,
    /// Software block status (can be changed by user)
    pub soft_blocked: bool,
    /// Hardware block status (hardware switch, cannot be changed by software)
    pub hard_blocked: bool,
}

impl SwitchState {
    fn from_event(event: &Event) -> Self {
        SwitchState {
            idx: event.idx,
            type_: event.type_,
            soft_blocked: event.soft,
            hard_blocked: event.hard,
        }
    }
}

/// Index-keyed mirror of the kernel's switch list, built from the event stream.
#[derive(Debug, Default, Clone)]
pub struct SwitchTable {
    entries: HashMap<u32, SwitchState>,
}

impl SwitchTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one event.
    ///
    /// * `Add` inserts or replaces the entry for the index.
    /// * `Del` removes it, if present.
    /// * `Change` replaces type and flags of an existing entry.
    /// * `ChangeAll` sets the flags of every entry of the event's type.
    ///
    /// # Errors
    ///
    /// * `DeviceNotFound` - `Change` for an index that is not in the table
    /// * `UnknownOp` - op byte not defined by the kernel
    ///
    /// On error the table is left untouched.
    pub fn apply(&mut self, event: &Event) -> Result<()> {
        match event.op {
            RfkillOp::Add => {
                self.entries.insert(event.idx, SwitchState::from_event(event));
            }
            RfkillOp::Del => {
                self.entries.remove(&event.idx);
            }
            RfkillOp::Change => {
                let entry = self
                    .entries
                    .get_mut(&event.idx)
                    .ok_or(RfkillError::DeviceNotFound(event.idx))?;
                *entry = SwitchState::from_event(event);
            }
            RfkillOp::ChangeAll => {
                for entry in self.entries.values_mut().filter(|s| s.type_ == event.type_) {
                    entry.soft_blocked = event.soft;
                    entry.hard_blocked = event.hard;
                }
            }
            RfkillOp::Unknown(op) => return Err(RfkillError::UnknownOp(op)),
        }
        Ok(())
    }

    /// State of the switch with index `idx`, if known.
    pub fn get(&self, idx: u32) -> Option<&SwitchState> {
        self.entries.get(&idx)
    }

    /// All known switches, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &SwitchState> {
        self.entries.values()
    }

    /// Number of known switches.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn add(idx: u32, type_: RfkillType, soft: bool, hard: bool) -> Event {
        Event {
            idx,
            type_,
            op: RfkillOp::Add,
            soft,
            hard,
        }
    }

    fn change(idx: u32, type_: RfkillType, soft: bool) -> Event {
        Event {
            idx,
            type_,
            op: RfkillOp::Change,
            soft,
            hard: false,
        }
    }

    fn delete(idx: u32) -> Event {
        Event {
            idx,
            type_: RfkillType::All,
            op: RfkillOp::Del,
            soft: false,
            hard: false,
        }
    }

    #[test]
    fn test_add_change_delete_in_order() {
        let mut table = SwitchTable::new();
        table.apply(&add(1, RfkillType::Wlan, false, false)).unwrap();
        table.apply(&change(1, RfkillType::Wlan, true)).unwrap();
        assert!(table.get(1).unwrap().soft_blocked);
        table.apply(&delete(1)).unwrap();
        assert!(table.get(1).is_none());
        assert!(table.is_empty());
    }

    #[test]
    fn test_change_after_delete_is_consistency_error() {
        let mut table = SwitchTable::new();
        table.apply(&add(1, RfkillType::Wlan, false, false)).unwrap();
        table.apply(&delete(1)).unwrap();
        let err = table.apply(&change(1, RfkillType::Wlan, true)).unwrap_err();
        assert!(matches!(err, RfkillError::DeviceNotFound(1)));
        assert!(table.is_empty());
    }

    #[test]
    fn test_delete_unknown_is_noop() {
        let mut table = SwitchTable::new();
        table.apply(&add(2, RfkillType::Gps, false, false)).unwrap();
        table.apply(&delete(7)).unwrap();
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_add_overwrites() {
        let mut table = SwitchTable::new();
        table.apply(&add(4, RfkillType::Wlan, false, false)).unwrap();
        table.apply(&add(4, RfkillType::Bluetooth, true, true)).unwrap();
        let state = table.get(4).unwrap();
        assert_eq!(state.type_, RfkillType::Bluetooth);
        assert!(state.soft_blocked && state.hard_blocked);
    }

    #[test]
    fn test_change_all_touches_only_matching_type() {
        let mut table = SwitchTable::new();
        table.apply(&add(0, RfkillType::Wlan, false, false)).unwrap();
        table.apply(&add(1, RfkillType::Bluetooth, false, false)).unwrap();
        table.apply(&add(2, RfkillType::Wlan, false, true)).unwrap();

        let all = Event {
            idx: 0,
            type_: RfkillType::Wlan,
            op: RfkillOp::ChangeAll,
            soft: true,
            hard: false,
        };
        table.apply(&all).unwrap();
        let once = table.clone();
        table.apply(&all).unwrap();

        assert_eq!(table.entries, once.entries);
        assert!(table.get(0).unwrap().soft_blocked);
        assert!(table.get(2).unwrap().soft_blocked);
        assert!(!table.get(2).unwrap().hard_blocked);
        assert_eq!(table.get(2).unwrap().idx, 2);
        assert!(!table.get(1).unwrap().soft_blocked);
    }

    #[test]
    fn test_unknown_op_leaves_state() {
        let mut table = SwitchTable::new();
        table.apply(&add(1, RfkillType::Wlan, false, false)).unwrap();
        let before = table.entries.clone();
        let bogus = Event {
            op: RfkillOp::from_u8(99),
            ..add(1, RfkillType::Wlan, true, true)
        };
        assert!(matches!(table.apply(&bogus), Err(RfkillError::UnknownOp(99))));
        assert_eq!(table.entries, before);
    }
}
