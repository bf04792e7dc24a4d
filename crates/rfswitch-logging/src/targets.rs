/// Raw `/dev/rfkill` traffic: records read, written and applied.
pub const T_RFKILL: &str = "rfkill";
/// Command front end.
pub const T_CLI: &str = "cli";
