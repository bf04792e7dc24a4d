use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter, Layer};

use crate::config::LoggingConfig;

pub struct LoggingGuards {
    _file_guards: Vec<WorkerGuard>,
}

/// Install the global subscriber for `component`.
///
/// `RUST_LOG` wins over the configured level. Installing twice is a no-op.
pub fn init(component: &str, cfg: &LoggingConfig) -> Result<LoggingGuards> {
    let mut guards = Vec::new();

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_level(true)
        .with_writer(std::io::stderr)
        .compact();

    let file_layer = match &cfg.log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("creating log dir {}", dir.display()))?;
            let appender = tracing_appender::rolling::daily(dir, format!("{component}.log"));
            let (writer, guard) = tracing_appender::non_blocking(appender);
            guards.push(guard);
            Some(
                fmt::layer()
                    .with_target(true)
                    .with_level(true)
                    .with_thread_ids(true)
                    .with_line_number(true)
                    .with_ansi(false)
                    .compact()
                    .with_writer(writer)
                    .boxed(),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(build_filter(cfg))
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .ok();

    Ok(LoggingGuards {
        _file_guards: guards,
    })
}

fn build_filter(cfg: &LoggingConfig) -> EnvFilter {
    if !cfg.enabled {
        return EnvFilter::new("off");
    }
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(cfg.level.clone()))
        .unwrap_or_else(|_| EnvFilter::new(crate::config::DEFAULT_LEVEL))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_twice_is_harmless() {
        let dir = std::env::temp_dir().join(format!("rfswitch-log-{}", std::process::id()));
        let cfg = LoggingConfig {
            log_dir: Some(dir.clone()),
            ..LoggingConfig::default()
        };
        let _first = init("rfswitch-test", &cfg).unwrap();
        let _second = init("rfswitch-test", &cfg).unwrap();
        assert!(dir.is_dir());
        let _ = std::fs::remove_dir_all(&dir);
    }
}
