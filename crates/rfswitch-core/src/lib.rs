//! Control and monitoring of Linux RF kill switches through `/dev/rfkill`.
//!
//! A [`Session`] owns the control device and mirrors the kernel's switch list from its
//! event stream. Query it with a [`Filter`], block or unblock the returned [`Switch`]es,
//! or [`listen`](Session::listen) for add/delete/change events.
#[cfg(not(target_os = "linux"))]
compile_error!("rfswitch-core drives /dev/rfkill and only builds for Linux targets.");

pub mod cancel;
pub mod config;
pub mod device;
pub mod error;
pub mod event;
pub mod filter;
pub mod session;
pub mod switch;
pub mod sysfs;
pub mod table;
pub mod types;

pub use config::RfkillConfig;
pub use device::{open_device, Device};
pub use error::{ErrorKind, Result, RfkillError};
pub use event::{Event, EVENT_SIZE};
pub use filter::Filter;
pub use session::{DrainReport, EventCallback, Session};
pub use switch::Switch;
pub use table::{SwitchState, SwitchTable};
pub use types::{RfkillOp, RfkillType};
