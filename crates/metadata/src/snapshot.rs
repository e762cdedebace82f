use std::fs;
use std::io;
use std::path::Path;

use crate::error::MetadataError;

#[cfg(unix)]
use std::os::unix::fs::MetadataExt;

/// Permission bits carried by a snapshot (the 12-bit mode value).
#[cfg(unix)]
const MODE_MASK: u32 = 0o7777;

/// Point-in-time record of a file's metadata.
///
/// A snapshot of a missing file is valid and carries `exists: false`; the
/// remaining fields are zero in that case and must not be interpreted.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct FileSnapshot {
    /// Permission bits (12-bit value, no file-type bits).
    pub mode: u32,
    /// Numeric owner id.
    pub uid: u32,
    /// Numeric group id.
    pub gid: u32,
    /// Whether the file existed when the snapshot was taken.
    pub exists: bool,
}

impl FileSnapshot {
    /// Snapshot describing a path that does not exist.
    #[must_use]
    pub const fn missing() -> Self {
        Self {
            mode: 0,
            uid: 0,
            gid: 0,
            exists: false,
        }
    }
}

/// Captures a [`FileSnapshot`] for `path`, following symbolic links.
///
/// A missing file yields a snapshot with `exists: false`; any other stat
/// failure is an error.
pub fn snapshot(path: &Path) -> Result<FileSnapshot, MetadataError> {
    match fs::metadata(path) {
        Ok(metadata) => Ok(from_metadata(&metadata)),
        Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(FileSnapshot::missing()),
        Err(error) => Err(MetadataError::new("stat", path, error)),
    }
}

#[cfg(unix)]
fn from_metadata(metadata: &fs::Metadata) -> FileSnapshot {
    FileSnapshot {
        mode: metadata.mode() & MODE_MASK,
        uid: metadata.uid(),
        gid: metadata.gid(),
        exists: true,
    }
}

#[cfg(not(unix))]
fn from_metadata(_metadata: &fs::Metadata) -> FileSnapshot {
    FileSnapshot {
        mode: 0,
        uid: 0,
        gid: 0,
        exists: true,
    }
}
