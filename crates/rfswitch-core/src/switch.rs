use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde::ser::{Serialize, SerializeStruct, Serializer};
use rfswitch_logging::targets::T_RFKILL;
use tracing::warn;

use crate::error::Result;
use crate::event::Event;
use crate::session::Shared;
use crate::sysfs;
use crate::table::SwitchState;
use crate::types::RfkillType;

/// One RF switch as of the drain that produced it.
///
/// A `Switch` is a snapshot: later drains do not update it. Query the session again for
/// fresh state. Block/unblock/listen still go through the session that produced it.
#[derive(Clone)]
pub struct Switch {
    state: SwitchState,
    session: Arc<Shared>,
}

impl Switch {
    pub(crate) fn new(state: SwitchState, session: Arc<Shared>) -> Self {
        Switch { state, session }
    }

    pub fn index(&self) -> u32 {
        self.state.idx
    }

    pub fn rf_type(&self) -> RfkillType {
        self.state.type_
    }

    pub fn soft_blocked(&self) -> bool {
        self.state.soft_blocked
    }

    pub fn hard_blocked(&self) -> bool {
        self.state.hard_blocked
    }

    pub fn blocked(&self) -> bool {
        self.state.soft_blocked || self.state.hard_blocked
    }

    pub fn state(&self) -> &SwitchState {
        &self.state
    }

    /// "hard blocked", "soft blocked" or "unblocked".
    pub fn state_string(&self) -> &'static str {
        if self.state.hard_blocked {
            "hard blocked"
        } else if self.state.soft_blocked {
            "soft blocked"
        } else {
            "unblocked"
        }
    }

    /// Name from sysfs, e.g. `phy0` or `hci0`. Empty if it cannot be read.
    pub fn name(&self) -> String {
        match sysfs::read_name(&self.session.config().sysfs_root, self.state.idx) {
            Ok(name) => name,
            Err(err) => {
                warn!(target: T_RFKILL, idx = self.state.idx, "failed to read name, {err}");
                String::new()
            }
        }
    }

    /// Soft-block the switch.
    pub fn block(&self) -> Result<()> {
        self.session.send(Event::change(self.state.idx, true))
    }

    /// Remove the soft block. A hard block stays in place.
    pub fn unblock(&self) -> Result<()> {
        self.session.send(Event::change(self.state.idx, false))
    }

    /// Call `callback` for every future event on this index and keep draining every
    /// `interval` until the session closes.
    ///
    /// Replaces a callback registered earlier for the same index. The registration is
    /// dropped once a delete event for the index has been dispatched.
    pub fn listen<F>(&self, callback: F, interval: Duration)
    where
        F: Fn(Event) + Send + Sync + 'static,
    {
        self.session
            .set_switch_callback(self.state.idx, Arc::new(callback));
        self.session
            .spawn_listener(format!("rfkill{}-listener", self.state.idx), interval);
    }
}

impl fmt::Display for Switch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} ({}), Soft blocked: {}, Hard blocked: {}",
            self.state.idx,
            self.name(),
            self.state.type_,
            self.state.soft_blocked,
            self.state.hard_blocked
        )
    }
}

impl fmt::Debug for Switch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Switch").field("state", &self.state).finish()
    }
}

impl Serialize for Switch {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("Switch", 6)?;
        s.serialize_field("idx", &self.state.idx)?;
        s.serialize_field("name", &self.name())?;
        s.serialize_field("type", &self.state.type_)?;
        s.serialize_field("soft_blocked", &self.state.soft_blocked)?;
        s.serialize_field("hard_blocked", &self.state.hard_blocked)?;
        s.serialize_field("state", self.state_string())?;
        s.end()
    }
}
