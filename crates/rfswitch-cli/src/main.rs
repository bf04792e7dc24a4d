mod cli;
mod commands;

use clap::Parser;
use rfswitch_logging::LoggingConfig;
use serde_json::json;

use crate::cli::{Cli, OutputFormat};

fn main() {
    let cli = Cli::parse();
    let format = cli.output_format;
    let _guards = rfswitch_logging::init("rfswitch", &LoggingConfig::from_env())
        .map_err(|err| eprintln!("Logging disabled: {err:#}"))
        .ok();

    if let Err(err) = commands::run(cli) {
        emit_error(format, &err);
        std::process::exit(1);
    }
}

fn emit_error(format: OutputFormat, err: &anyhow::Error) {
    let details: Vec<String> = err.chain().map(|cause| cause.to_string()).collect();

    match format {
        OutputFormat::Json => {
            let payload = json!({
                "status": "error",
                "message": err.to_string(),
                "details": details,
            });
            println!("{payload}");
        }
        OutputFormat::Text => {
            eprintln!("Error: {err}");
            for detail in details.iter().skip(1) {
                eprintln!("  -> {detail}");
            }
        }
    }
}
