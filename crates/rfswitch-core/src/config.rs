use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_DEVICE_PATH: &str = "/dev/rfkill";
pub const DEFAULT_SYSFS_ROOT: &str = "/sys/class/rfkill";
pub const DEFAULT_NET_ROOT: &str = "/sys/class/net";
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 100;
pub const DEFAULT_STOP_TICK_MS: u64 = 50;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RfkillConfig {
    pub device_path: PathBuf,
    /// Holds one `rfkill{idx}` directory per switch.
    pub sysfs_root: PathBuf,
    pub net_root: PathBuf,
    /// Default pause between listener drains.
    pub poll_interval: Duration,
    /// How often idle background loops check for shutdown.
    pub stop_tick: Duration,
}

impl Default for RfkillConfig {
    fn default() -> Self {
        Self {
            device_path: PathBuf::from(DEFAULT_DEVICE_PATH),
            sysfs_root: PathBuf::from(DEFAULT_SYSFS_ROOT),
            net_root: PathBuf::from(DEFAULT_NET_ROOT),
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            stop_tick: Duration::from_millis(DEFAULT_STOP_TICK_MS),
        }
    }
}

impl RfkillConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let device_path = lookup("RFSWITCH_DEVICE")
            .map(PathBuf::from)
            .unwrap_or(defaults.device_path);
        let sysfs_root = lookup("RFSWITCH_SYSFS_ROOT")
            .map(PathBuf::from)
            .unwrap_or(defaults.sysfs_root);
        let net_root = lookup("RFSWITCH_NET_ROOT")
            .map(PathBuf::from)
            .unwrap_or(defaults.net_root);
        let poll_interval = lookup("RFSWITCH_POLL_MS")
            .and_then(|v| v.parse::<u64>().ok())
            .map(Duration::from_millis)
            .unwrap_or(defaults.poll_interval);
        let stop_tick = lookup("RFSWITCH_STOP_TICK_MS")
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|ms| *ms > 0)
            .map(Duration::from_millis)
            .unwrap_or(defaults.stop_tick);

        Self {
            device_path,
            sysfs_root,
            net_root,
            poll_interval,
            stop_tick,
        }
    }
}
