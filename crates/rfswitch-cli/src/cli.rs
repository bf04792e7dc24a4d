use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(
    name = "rfswitch",
    author,
    version,
    about = "Tool for listing, blocking and watching wireless kill switches"
)]
pub struct Cli {
    /// rfkill control device (defaults to $RFSWITCH_DEVICE or /dev/rfkill)
    #[arg(long, global = true)]
    pub device: Option<PathBuf>,

    /// sysfs directory holding rfkillN entries (defaults to /sys/class/rfkill)
    #[arg(long = "sysfs-root", global = true)]
    pub sysfs_root: Option<PathBuf>,

    /// Output format for command responses
    #[arg(
        long = "output",
        value_enum,
        default_value_t = OutputFormat::Text,
        global = true
    )]
    pub output_format: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Text,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List switches
    List(SelectArgs),
    /// Block the selected switches
    Block(SelectArgs),
    /// Unblock the selected switches
    Unblock(SelectArgs),
    /// Listen for switch events until interrupted
    Event(EventArgs),
}

/// Switch selection. The first given of index, type, name, interface wins.
#[derive(Args, Debug, Default, Clone)]
pub struct SelectArgs {
    /// Switch index
    #[arg(short = 'i', long = "idx")]
    pub idx: Option<u32>,

    /// Switch type (wlan, bluetooth, uwb, wimax, wwan, gps, fm, nfc)
    #[arg(short = 't', long = "type")]
    pub type_name: Option<String>,

    /// Switch name as found in sysfs (e.g. phy0, hci0)
    #[arg(short = 'n', long)]
    pub name: Option<String>,

    /// Network interface backed by the switch (e.g. wlan0)
    #[arg(long)]
    pub interface: Option<String>,
}

#[derive(Args, Debug)]
pub struct EventArgs {
    /// Milliseconds between drains of the event queue (defaults to $RFSWITCH_POLL_MS or 100)
    #[arg(long = "interval-ms")]
    pub interval_ms: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_list_with_type() {
        let cli = Cli::parse_from(["rfswitch", "list", "--type", "wlan"]);
        match cli.command {
            Commands::List(args) => {
                assert_eq!(args.type_name.as_deref(), Some("wlan"));
                assert!(args.idx.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
        assert_eq!(cli.output_format, OutputFormat::Text);
    }

    #[test]
    fn test_parse_block_short_flags_and_globals() {
        let cli = Cli::parse_from([
            "rfswitch", "block", "-i", "3", "--output", "json", "--device", "/tmp/rfkill",
        ]);
        match cli.command {
            Commands::Block(args) => assert_eq!(args.idx, Some(3)),
            other => panic!("unexpected command: {other:?}"),
        }
        assert_eq!(cli.output_format, OutputFormat::Json);
        assert_eq!(cli.device, Some(PathBuf::from("/tmp/rfkill")));
    }

    #[test]
    fn test_event_interval_unset_by_default() {
        let cli = Cli::parse_from(["rfswitch", "event"]);
        match cli.command {
            Commands::Event(args) => assert!(args.interval_ms.is_none()),
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
