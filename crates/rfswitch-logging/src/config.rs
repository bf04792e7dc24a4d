use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

pub const DEFAULT_LEVEL: &str = "warn";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub enabled: bool,
    pub level: String,
    /// Directory for rolling log files. Stderr only when unset.
    pub log_dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            level: DEFAULT_LEVEL.to_string(),
            log_dir: None,
        }
    }
}

impl LoggingConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let enabled = env::var("RFSWITCH_LOG")
            .map(|v| !(v == "0" || v.eq_ignore_ascii_case("false") || v.eq_ignore_ascii_case("off")))
            .unwrap_or(defaults.enabled);
        let level = env::var("RFSWITCH_LOG_LEVEL")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or(defaults.level);
        let log_dir = env::var("RFSWITCH_LOG_DIR")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);

        Self {
            enabled,
            level,
            log_dir,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let cfg = LoggingConfig::default();
        assert!(cfg.enabled);
        assert_eq!(cfg.level, "warn");
        assert!(cfg.log_dir.is_none());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let cfg: LoggingConfig = serde_json::from_str(r#"{"level":"debug"}"#).unwrap();
        assert!(cfg.enabled);
        assert_eq!(cfg.level, "debug");
        assert!(cfg.log_dir.is_none());
    }
}
