//! Materialization of new content into a temporary artifact.
//!
//! The artifact is created in the target's directory so the final rename
//! stays on one filesystem. Its deletion is registered the moment it is
//! created ([`TempPath`] drop) and cancelled only by a successful rename in
//! the engine; every error branch between here and there cleans up by
//! simply unwinding.

use std::env;
use std::ffi::OsString;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use supplant_metadata::{ApplyMask, TargetMetadata, apply, snapshot};
use tempfile::TempPath;

use crate::config::RunConfig;
use crate::error::{ReplaceError, ReplaceResult};

/// Writes `reader` byte-for-byte into a fresh temporary file.
///
/// In write mode the artifact lives beside the target and is pre-stamped
/// with the resolved metadata (restricted by `mask`); in no-write mode, and
/// in dry-run mode when the parent directory is missing, it is a throwaway
/// in the system temporary directory and is left unstamped.
pub(crate) fn materialize(
    config: &RunConfig,
    target: &TargetMetadata,
    mask: ApplyMask,
    reader: &mut dyn Read,
) -> ReplaceResult<TempPath> {
    let placement = destination_dir(config)?;

    let mut temp = tempfile::Builder::new()
        .prefix(&temp_prefix(&config.file))
        .tempfile_in(placement.dir())
        .map_err(|error| ReplaceError::io("create temporary file in", placement.dir(), &error))?;

    if matches!(placement, Placement::Destination(_)) {
        let current = snapshot(temp.path())
            .map_err(|error| ReplaceError::Internal(error.to_string()))?;
        apply(temp.path(), target, mask, &current)?;
    }

    io::copy(reader, temp.as_file_mut())
        .map_err(|error| ReplaceError::io("write new content to", temp.path(), &error))?;
    temp.as_file()
        .sync_all()
        .map_err(|error| ReplaceError::io("flush", temp.path(), &error))?;

    Ok(temp.into_temp_path())
}

/// Where the temporary artifact is created.
enum Placement {
    /// Beside the target file; the artifact may be renamed into place.
    Destination(PathBuf),
    /// In the system temporary directory; the artifact is throwaway.
    Scratch(PathBuf),
}

impl Placement {
    fn dir(&self) -> &Path {
        match self {
            Self::Destination(dir) | Self::Scratch(dir) => dir,
        }
    }
}

/// Decides where the artifact goes, creating parent directories when the
/// run is allowed to.
fn destination_dir(config: &RunConfig) -> ReplaceResult<Placement> {
    if !config.write {
        return Ok(Placement::Scratch(env::temp_dir()));
    }

    let dir = parent_dir(&config.file);
    if dir.is_dir() {
        return Ok(Placement::Destination(dir));
    }

    if config.no_parents {
        return Err(ReplaceError::General(format!(
            "parent directory {} does not exist",
            dir.display()
        )));
    }

    if !config.commit {
        // Dry-run must not leave directories behind either.
        return Ok(Placement::Scratch(env::temp_dir()));
    }

    fs::create_dir_all(&dir)
        .map_err(|error| ReplaceError::io("create directory", &dir, &error))?;
    Ok(Placement::Destination(dir))
}

fn parent_dir(file: &Path) -> PathBuf {
    match file.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Temporary-file prefix derived from the target's base name.
fn temp_prefix(file: &Path) -> OsString {
    let mut prefix = OsString::from(".");
    if let Some(base) = file.file_name() {
        prefix.push(base);
    }
    prefix.push(".");
    prefix
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_embeds_the_base_name() {
        let prefix = temp_prefix(Path::new("/etc/resolv.conf"));
        assert_eq!(prefix, OsString::from(".resolv.conf."));
    }

    #[test]
    fn parent_of_bare_name_is_current_dir() {
        assert_eq!(parent_dir(Path::new("motd")), PathBuf::from("."));
        assert_eq!(parent_dir(Path::new("sub/motd")), PathBuf::from("sub"));
    }

    #[test]
    fn materialized_bytes_are_exact() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = RunConfig::new(dir.path().join("out.bin"));
        let payload: Vec<u8> = (0u16..512).map(|v| (v % 256) as u8).collect();

        let temp = materialize(
            &config,
            &TargetMetadata::default(),
            ApplyMask::all(),
            &mut payload.as_slice(),
        )
        .expect("materialize");

        let written = fs::read(&temp).expect("read temp");
        assert_eq!(written, payload);
        assert_eq!(temp.parent(), Some(dir.path()));
    }

    #[test]
    fn no_write_uses_the_scratch_directory() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut config = RunConfig::new(dir.path().join("out.bin"));
        config.write = false;

        let temp = materialize(
            &config,
            &TargetMetadata::default(),
            ApplyMask::all(),
            &mut &b"payload"[..],
        )
        .expect("materialize");

        assert_ne!(temp.parent(), Some(dir.path()));
        assert_eq!(fs::read_dir(dir.path()).expect("read_dir").count(), 0);
    }

    #[test]
    fn missing_parent_with_no_parents_fails_before_creating_anything() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut config = RunConfig::new(dir.path().join("missing/out.bin"));
        config.no_parents = true;

        let error = materialize(
            &config,
            &TargetMetadata::default(),
            ApplyMask::all(),
            &mut &b"payload"[..],
        )
        .expect_err("must fail");
        assert!(matches!(error, ReplaceError::General(_)));
        assert!(!dir.path().join("missing").exists());
    }

    #[test]
    fn missing_parent_is_created_when_committing() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = RunConfig::new(dir.path().join("a/b/out.bin"));

        let temp = materialize(
            &config,
            &TargetMetadata::default(),
            ApplyMask::all(),
            &mut &b"payload"[..],
        )
        .expect("materialize");

        assert!(dir.path().join("a/b").is_dir());
        assert_eq!(temp.parent(), Some(dir.path().join("a/b").as_path()));
    }

    #[test]
    fn dry_run_does_not_create_missing_parents() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut config = RunConfig::new(dir.path().join("missing/out.bin"));
        config.commit = false;

        let _temp = materialize(
            &config,
            &TargetMetadata::default(),
            ApplyMask::all(),
            &mut &b"payload"[..],
        )
        .expect("materialize");

        assert!(!dir.path().join("missing").exists());
    }
}
