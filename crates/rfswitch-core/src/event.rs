//! Fixed-size `struct rfkill_event` records exchanged with `/dev/rfkill`.

use std::fmt;

use serde::Serialize;

use crate::error::{Result, RfkillError};
use crate::types::{RfkillOp, RfkillType};

/// Size of one record on the wire.
pub const EVENT_SIZE: usize = 8;

/// One rfkill event.
///
/// Layout: `idx` as little-endian u32, then one byte each for type, op, soft and hard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Event {
    pub idx: u32,
    #[serde(rename = "type")]
    pub type_: RfkillType,
    pub op: RfkillOp,
    pub soft: bool,
    pub hard: bool,
}

impl Event {
    /// Soft block/unblock request for a single switch. The type is ignored by the kernel.
    pub fn change(idx: u32, soft: bool) -> Self {
        Event {
            idx,
            type_: RfkillType::All,
            op: RfkillOp::Change,
            soft,
            hard: false,
        }
    }

    /// Soft block/unblock request for every switch of `type_`.
    pub fn change_all(type_: RfkillType, soft: bool) -> Self {
        Event {
            idx: 0,
            type_,
            op: RfkillOp::ChangeAll,
            soft,
            hard: false,
        }
    }

    pub fn from_bytes(bytes: &[u8; EVENT_SIZE]) -> Self {
        Event {
            idx: u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]),
            type_: RfkillType::from_u8(bytes[4]),
            op: RfkillOp::from_u8(bytes[5]),
            soft: bytes[6] != 0,
            hard: bytes[7] != 0,
        }
    }

    /// Decode a record read from the device, rejecting any other length.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let record: &[u8; EVENT_SIZE] = bytes
            .try_into()
            .map_err(|_| RfkillError::ShortRead(bytes.len()))?;
        Ok(Self::from_bytes(record))
    }

    pub fn to_bytes(&self) -> [u8; EVENT_SIZE] {
        let idx = self.idx.to_le_bytes();
        [
            idx[0],
            idx[1],
            idx[2],
            idx[3],
            self.type_.as_u8(),
            self.op.as_u8(),
            u8::from(self.soft),
            u8::from(self.hard),
        ]
    }

    pub fn is_blocked(&self) -> bool {
        self.soft || self.hard
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} ({}), Soft blocked: {}, Hard blocked: {}",
            self.idx, self.op, self.type_, self.soft, self.hard
        )
    }
}
