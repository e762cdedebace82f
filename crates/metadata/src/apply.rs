use std::path::Path;

use crate::error::MetadataError;
use crate::resolve::TargetMetadata;
use crate::snapshot::FileSnapshot;

#[cfg(unix)]
use crate::ownership;
#[cfg(unix)]
use rustix::fs::{self as unix_fs, AtFlags, CWD};
#[cfg(unix)]
use std::fs;
#[cfg(unix)]
use std::io;

/// Which resolved metadata fields may be applied.
///
/// Suppression flags never change what [`crate::resolve`] computes, only
/// whether the resolved value is stamped onto the file.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ApplyMask {
    /// Apply the resolved mode.
    pub mode: bool,
    /// Apply the resolved owner.
    pub owner: bool,
    /// Apply the resolved group.
    pub group: bool,
}

impl ApplyMask {
    /// Mask that permits every field.
    #[must_use]
    pub const fn all() -> Self {
        Self {
            mode: true,
            owner: true,
            group: true,
        }
    }
}

/// Applies `target` metadata to `path`, restricted by `mask`.
///
/// `current` is a snapshot of `path` itself; fields that already match are
/// skipped so that, for example, a file already owned by the calling user is
/// never redundantly chowned. Ownership is applied before permissions so a
/// mode carrying setuid/setgid bits is not stripped by a later `chown`.
/// Every failure is fatal.
pub fn apply(
    path: &Path,
    target: &TargetMetadata,
    mask: ApplyMask,
    current: &FileSnapshot,
) -> Result<(), MetadataError> {
    #[cfg(unix)]
    {
        let owner = match target.uid {
            Some(uid) if mask.owner && (!current.exists || uid != current.uid) => {
                Some(ownership::uid_from_raw(uid))
            }
            _ => None,
        };
        let group = match target.gid {
            Some(gid) if mask.group && (!current.exists || gid != current.gid) => {
                Some(ownership::gid_from_raw(gid))
            }
            _ => None,
        };

        if owner.is_some() || group.is_some() {
            unix_fs::chownat(CWD, path, owner, group, AtFlags::empty()).map_err(|errno| {
                MetadataError::new("change ownership of", path, io::Error::from(errno))
            })?;
        }

        if mask.mode
            && let Some(mode) = target.mode
            && (!current.exists || mode != current.mode)
        {
            use std::os::unix::fs::PermissionsExt;

            fs::set_permissions(path, fs::Permissions::from_mode(mode)).map_err(|error| {
                MetadataError::new("change permissions of", path, error)
            })?;
        }

        Ok(())
    }

    #[cfg(not(unix))]
    {
        let _ = current;
        if (mask.owner && target.uid.is_some()) || (mask.group && target.gid.is_some()) {
            return Err(MetadataError::new(
                "change ownership of",
                path,
                std::io::Error::new(
                    std::io::ErrorKind::Unsupported,
                    "ownership is not supported on this platform",
                ),
            ));
        }
        if mask.mode && target.mode.is_some() {
            return Err(MetadataError::new(
                "change permissions of",
                path,
                std::io::Error::new(
                    std::io::ErrorKind::Unsupported,
                    "permission bits are not supported on this platform",
                ),
            ));
        }
        Ok(())
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::snapshot::snapshot;
    use std::fs;
    use std::os::unix::fs::PermissionsExt;

    #[test]
    fn applies_mode_when_it_differs() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("file");
        fs::write(&path, b"content").expect("write");
        fs::set_permissions(&path, fs::Permissions::from_mode(0o600)).expect("chmod");

        let current = snapshot(&path).expect("snapshot");
        let target = TargetMetadata {
            mode: Some(0o644),
            uid: None,
            gid: None,
        };
        apply(&path, &target, ApplyMask::all(), &current).expect("apply");

        let after = snapshot(&path).expect("snapshot");
        assert_eq!(after.mode, 0o644);
    }

    #[test]
    fn suppressed_mode_is_not_applied() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("file");
        fs::write(&path, b"content").expect("write");
        fs::set_permissions(&path, fs::Permissions::from_mode(0o600)).expect("chmod");

        let current = snapshot(&path).expect("snapshot");
        let target = TargetMetadata {
            mode: Some(0o644),
            uid: None,
            gid: None,
        };
        let mask = ApplyMask {
            mode: false,
            owner: true,
            group: true,
        };
        apply(&path, &target, mask, &current).expect("apply");

        let after = snapshot(&path).expect("snapshot");
        assert_eq!(after.mode, 0o600);
    }

    #[test]
    fn matching_ownership_is_a_no_op() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("file");
        fs::write(&path, b"content").expect("write");

        let current = snapshot(&path).expect("snapshot");
        let target = TargetMetadata {
            mode: None,
            uid: Some(current.uid),
            gid: Some(current.gid),
        };
        // Would require privileges if it actually issued a chown.
        apply(&path, &target, ApplyMask::all(), &current).expect("apply");
    }
}
