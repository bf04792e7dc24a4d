//! Per-switch attributes under `/sys/class/rfkill`.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, RfkillError};

pub fn switch_dir(sysfs_root: &Path, idx: u32) -> PathBuf {
    sysfs_root.join(format!("rfkill{idx}"))
}

/// Read `rfkill{idx}/name`, trimmed.
pub fn read_name(sysfs_root: &Path, idx: u32) -> Result<String> {
    fs::read_to_string(switch_dir(sysfs_root, idx).join("name"))
        .map(|s| s.trim().to_string())
        .map_err(|source| RfkillError::NameLookup { idx, source })
}

/// Find the rfkill index backing a network interface such as `wlan0`.
///
/// Matches when the interface's `device` link and the switch's `device` link resolve to the
/// same sysfs device or one sits below the other. Missing directories yield `None`.
pub fn index_for_interface(sysfs_root: &Path, net_root: &Path, interface: &str) -> Option<u32> {
    let iface_dev = fs::canonicalize(net_root.join(interface).join("device")).ok()?;
    let entries = fs::read_dir(sysfs_root).ok()?;

    let mut found: Vec<u32> = entries
        .flatten()
        .filter_map(|entry| {
            let path = entry.path();
            let idx = path
                .file_name()
                .and_then(|name| name.to_str())
                .and_then(|name| name.strip_prefix("rfkill"))
                .and_then(|idx| idx.parse::<u32>().ok())?;
            let rfkill_dev = fs::canonicalize(path.join("device")).ok()?;
            (iface_dev.starts_with(&rfkill_dev) || rfkill_dev.starts_with(&iface_dev))
                .then_some(idx)
        })
        .collect();
    found.sort_unstable();
    found.into_iter().next()
}
