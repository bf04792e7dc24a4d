use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RfkillError {
    #[error("Failed to open {}: {source}", path.display())]
    DeviceOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read rfkill event: {0}")]
    ReadEvent(#[source] std::io::Error),

    #[error("Failed to write rfkill event: {0}")]
    WriteEvent(#[source] std::io::Error),

    #[error("Wrong rfkill event size on read: {0}")]
    ShortRead(usize),

    #[error("Wrong rfkill event size on write: {0}")]
    ShortWrite(usize),

    #[error("Unknown rfkill event op: {0}")]
    UnknownOp(u8),

    #[error("Changing non-existing switch idx: {0}")]
    DeviceNotFound(u32),

    #[error("Failed to read name of rfkill{idx}: {source}")]
    NameLookup {
        idx: u32,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid rfkill type: {0}")]
    InvalidType(String),

    #[error("Failed to start rfkill worker thread: {0}")]
    WorkerSpawn(#[source] std::io::Error),

    #[error("rfkill session is closed")]
    SessionClosed,
}

/// Broad category of an [`RfkillError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The control device could not be acquired.
    Open,
    /// A record of the wrong size, a failed read/write, or an undecodable op.
    Protocol,
    /// An event referenced a switch the session does not know.
    Consistency,
    /// A per-switch sysfs attribute could not be read.
    Resource,
    /// The session was closed before the request could be served.
    Closed,
    /// A background thread could not be started.
    Runtime,
    /// Bad caller input.
    Usage,
}

impl RfkillError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RfkillError::DeviceOpen { .. } => ErrorKind::Open,
            RfkillError::ReadEvent(_)
            | RfkillError::WriteEvent(_)
            | RfkillError::ShortRead(_)
            | RfkillError::ShortWrite(_)
            | RfkillError::UnknownOp(_) => ErrorKind::Protocol,
            RfkillError::DeviceNotFound(_) => ErrorKind::Consistency,
            RfkillError::NameLookup { .. } => ErrorKind::Resource,
            RfkillError::SessionClosed => ErrorKind::Closed,
            RfkillError::WorkerSpawn(_) => ErrorKind::Runtime,
            RfkillError::InvalidType(_) => ErrorKind::Usage,
        }
    }
}

pub type Result<T> = std::result::Result<T, RfkillError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds() {
        assert_eq!(RfkillError::UnknownOp(99).kind(), ErrorKind::Protocol);
        assert_eq!(RfkillError::ShortRead(3).kind(), ErrorKind::Protocol);
        assert_eq!(RfkillError::DeviceNotFound(1).kind(), ErrorKind::Consistency);
        assert_eq!(RfkillError::SessionClosed.kind(), ErrorKind::Closed);
        assert_eq!(
            RfkillError::WorkerSpawn(std::io::Error::from(std::io::ErrorKind::OutOfMemory)).kind(),
            ErrorKind::Runtime
        );
        assert_eq!(RfkillError::InvalidType("wifi".into()).kind(), ErrorKind::Usage);
        let err = RfkillError::DeviceOpen {
            path: PathBuf::from("/dev/rfkill"),
            source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        };
        assert_eq!(err.kind(), ErrorKind::Open);
        assert!(err.to_string().starts_with("Failed to open /dev/rfkill"));
    }
}
