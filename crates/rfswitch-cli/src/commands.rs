use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use rfswitch_core::{sysfs, Filter, RfkillConfig, RfkillType, Session, Switch};
use rfswitch_logging::targets::T_CLI;
use serde_json::{json, Value};

use crate::cli::{Cli, Commands, EventArgs, OutputFormat, SelectArgs};

#[derive(Clone, Copy)]
enum Action {
    Block,
    Unblock,
}

impl Action {
    fn label(self) -> &'static str {
        match self {
            Action::Block => "blocked",
            Action::Unblock => "unblocked",
        }
    }

    fn apply(self, switch: &Switch) -> rfswitch_core::Result<()> {
        match self {
            Action::Block => switch.block(),
            Action::Unblock => switch.unblock(),
        }
    }
}

pub fn config_for(cli: &Cli) -> RfkillConfig {
    let mut config = RfkillConfig::from_env();
    if let Some(device) = &cli.device {
        config.device_path = device.clone();
    }
    if let Some(root) = &cli.sysfs_root {
        config.sysfs_root = root.clone();
    }
    config
}

/// Build the filter for a selection: index, then type, then name, then interface.
pub fn select(args: &SelectArgs, config: &RfkillConfig) -> Result<Filter> {
    if let Some(idx) = args.idx {
        return Ok(Filter::with_index(idx));
    }
    if let Some(type_name) = &args.type_name {
        let type_ = type_name.parse::<RfkillType>()?;
        return Ok(Filter::with_type(type_));
    }
    if let Some(name) = &args.name {
        return Ok(Filter::with_name(name.as_str()));
    }
    if let Some(interface) = &args.interface {
        let idx = sysfs::index_for_interface(&config.sysfs_root, &config.net_root, interface)
            .ok_or_else(|| anyhow!("no rfkill switch found for interface {interface}"))?;
        tracing::debug!(target: T_CLI, interface = %interface, idx, "resolved interface");
        return Ok(Filter::with_index(idx));
    }
    Ok(Filter::any())
}

pub fn run(cli: Cli) -> Result<()> {
    let config = config_for(&cli);
    let format = cli.output_format;
    let path = config.device_path.clone();
    let session = Session::open_with_config(config)
        .with_context(|| format!("opening rfkill control device {}", path.display()))?;

    let result = match &cli.command {
        Commands::List(args) => list(&session, args, format),
        Commands::Block(args) => set_state(&session, args, format, Action::Block),
        Commands::Unblock(args) => set_state(&session, args, format, Action::Unblock),
        Commands::Event(args) => watch(&session, args, format),
    };
    session.close();
    result
}

fn selected(session: &Session, args: &SelectArgs) -> Result<Vec<Switch>> {
    let filter = select(args, session.config())?;
    let mut switches = session
        .switches(&filter)
        .context("reading rfkill switches")?;
    switches.sort_by_key(Switch::index);
    Ok(switches)
}

fn list(session: &Session, args: &SelectArgs, format: OutputFormat) -> Result<()> {
    let switches = selected(session, args)?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string(&switches)?),
        OutputFormat::Text => {
            for switch in &switches {
                println!("{switch}");
            }
        }
    }
    Ok(())
}

fn set_state(
    session: &Session,
    args: &SelectArgs,
    format: OutputFormat,
    action: Action,
) -> Result<()> {
    let switches = selected(session, args)?;
    let mut results = Vec::with_capacity(switches.len());
    let mut failures = 0usize;

    for switch in &switches {
        let outcome = action.apply(switch);
        if let Err(err) = &outcome {
            failures += 1;
            tracing::warn!(target: T_CLI, idx = switch.index(), "{} failed: {err}", action.label());
        }
        results.push(json!({
            "idx": switch.index(),
            "type": switch.rf_type().name(),
            "status": if outcome.is_ok() { action.label() } else { "failed" },
            "error": outcome.err().map(|e| e.to_string()),
        }));
    }

    match format {
        OutputFormat::Json => println!("{}", Value::Array(results)),
        OutputFormat::Text => {
            for result in &results {
                match result["error"].as_str() {
                    Some(err) => println!("{}: {}", result["idx"], err),
                    None => println!("{}: {}", result["idx"], action.label()),
                }
            }
        }
    }

    if failures > 0 {
        bail!("{failures} of {} switches could not be {}", switches.len(), action.label());
    }
    Ok(())
}

/// Pause between drains for `event`: the flag, else the configured poll interval.
pub fn event_interval(args: &EventArgs, config: &RfkillConfig) -> Duration {
    args.interval_ms
        .map(Duration::from_millis)
        .unwrap_or(config.poll_interval)
}

fn watch(session: &Session, args: &EventArgs, format: OutputFormat) -> Result<()> {
    let interval = event_interval(args, session.config());
    tracing::debug!(target: T_CLI, interval_ms = interval.as_millis() as u64, "listening for events");
    session.listen(
        move |event| match format {
            OutputFormat::Json => match serde_json::to_string(&event) {
                Ok(line) => println!("{line}"),
                Err(err) => tracing::warn!(target: T_CLI, "failed to encode event: {err}"),
            },
            OutputFormat::Text => println!("event: {event}"),
        },
        interval,
    );
    loop {
        std::thread::park();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_config_overrides() {
        let cli = Cli::parse_from([
            "rfswitch",
            "--device",
            "/tmp/rfkill",
            "--sysfs-root",
            "/tmp/sys",
            "list",
        ]);
        let config = config_for(&cli);
        assert_eq!(config.device_path, std::path::PathBuf::from("/tmp/rfkill"));
        assert_eq!(config.sysfs_root, std::path::PathBuf::from("/tmp/sys"));
    }

    #[test]
    fn test_event_interval_falls_back_to_config() {
        let config = RfkillConfig {
            poll_interval: Duration::from_millis(250),
            ..RfkillConfig::default()
        };
        let unset = EventArgs { interval_ms: None };
        assert_eq!(event_interval(&unset, &config), Duration::from_millis(250));

        let set = EventArgs {
            interval_ms: Some(20),
        };
        assert_eq!(event_interval(&set, &config), Duration::from_millis(20));
    }

    #[test]
    fn test_type_selection_rejects_unknown_names() {
        let config = RfkillConfig::default();
        let args = SelectArgs {
            type_name: Some("wifi".to_string()),
            ..SelectArgs::default()
        };
        let err = select(&args, &config).err().expect("unknown type must fail");
        assert!(matches!(
            err.downcast_ref::<rfswitch_core::RfkillError>(),
            Some(rfswitch_core::RfkillError::InvalidType(name)) if name == "wifi"
        ));

        let args = SelectArgs {
            type_name: Some("bluetooth".to_string()),
            ..SelectArgs::default()
        };
        assert!(select(&args, &config).is_ok());
    }

    #[test]
    fn test_unknown_interface_is_error() {
        let config = RfkillConfig {
            sysfs_root: "/nonexistent/rfkill".into(),
            net_root: "/nonexistent/net".into(),
            ..RfkillConfig::default()
        };
        let args = SelectArgs {
            interface: Some("wlan9".to_string()),
            ..SelectArgs::default()
        };
        assert!(select(&args, &config).is_err());

        let args = SelectArgs {
            idx: Some(1),
            interface: Some("wlan9".to_string()),
            ..SelectArgs::default()
        };
        assert!(select(&args, &config).is_ok());
    }
}
