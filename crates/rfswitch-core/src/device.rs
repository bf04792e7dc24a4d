//! Access to the rfkill control device.

use std::fs::{File, OpenOptions};
use std::io::{self, Read, Write};
use std::os::unix::fs::OpenOptionsExt;
use std::path::Path;

use crate::error::{Result, RfkillError};

/// Byte-level record transport behind a session.
///
/// Reads must be non-blocking: an empty backlog is reported as
/// [`io::ErrorKind::WouldBlock`].
pub trait Device: Send {
    fn read_record(&mut self, buf: &mut [u8]) -> io::Result<usize>;
    fn write_record(&mut self, buf: &[u8]) -> io::Result<usize>;
}

impl Device for File {
    fn read_record(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.read(buf)
    }

    fn write_record(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.write(buf)
    }
}

/// Open the control device read-write in non-blocking mode.
pub fn open_device(path: &Path) -> Result<File> {
    OpenOptions::new()
        .read(true)
        .write(true)
        .custom_flags(libc::O_NONBLOCK)
        .open(path)
        .map_err(|source| RfkillError::DeviceOpen {
            path: path.to_path_buf(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_missing_device() {
        let err = open_device(Path::new("/nonexistent/rfkill")).unwrap_err();
        match err {
            RfkillError::DeviceOpen { path, source } => {
                assert_eq!(path, Path::new("/nonexistent/rfkill"));
                assert_eq!(source.kind(), io::ErrorKind::NotFound);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
