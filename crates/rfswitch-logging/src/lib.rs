pub mod config;
pub mod init;
pub mod targets;

pub use config::LoggingConfig;
pub use init::{init, LoggingGuards};
