//! Immutable run configuration.

use std::ffi::OsString;
use std::path::PathBuf;

use supplant_metadata::ApplyMask;

use crate::error::{ReplaceError, ReplaceResult};

/// Validated configuration for one replace run.
///
/// Constructed once by the CLI front-end and passed by reference to every
/// component; nothing mutates it afterwards.
#[derive(Clone, Debug)]
pub struct RunConfig {
    /// Target file to replace.
    pub file: PathBuf,
    /// Generator program and arguments; empty means read standard input.
    pub generator: Vec<OsString>,
    /// Render a unified diff when the content is text and changed.
    pub show_diff: bool,
    /// Write to the filesystem at all; `false` is `--no-write`.
    pub write: bool,
    /// Perform the final rename; `false` is `--dry-run`.
    pub commit: bool,
    /// Hard-link the pre-replace file to this path before committing.
    pub backup: Option<PathBuf>,
    /// Update the target's mtime when the content is unchanged.
    pub touch: bool,
    /// Explicit target mode (12-bit value).
    pub mode: Option<u32>,
    /// Explicit target owner (name or decimal uid).
    pub owner: Option<String>,
    /// Explicit target group (name or decimal gid).
    pub group: Option<String>,
    /// Do not copy the owner from the old file.
    pub no_owner: bool,
    /// Do not copy the group from the old file.
    pub no_group: bool,
    /// Do not copy owner or group from the old file.
    pub no_ownership: bool,
    /// Do not copy the mode from the old file.
    pub no_mode: bool,
    /// Treat content as opaque bytes; never attempt a textual diff.
    pub opaque: bool,
    /// Fail instead of creating missing parent directories.
    pub no_parents: bool,
    /// Exit 1 when the content changed.
    pub exit_on_change: bool,
}

impl RunConfig {
    /// Creates a configuration with default flags for `file`.
    #[must_use]
    pub fn new(file: PathBuf) -> Self {
        Self {
            file,
            generator: Vec::new(),
            show_diff: true,
            write: true,
            commit: true,
            backup: None,
            touch: false,
            mode: None,
            owner: None,
            group: None,
            no_owner: false,
            no_group: false,
            no_ownership: false,
            no_mode: false,
            opaque: false,
            no_parents: false,
            exit_on_change: false,
        }
    }

    /// Checks the option mutual exclusions.
    ///
    /// Suppressing a field and overriding the same field explicitly is
    /// contradictory and rejected before any I/O happens.
    pub fn validate(&self) -> ReplaceResult<()> {
        if self.no_ownership && self.owner.is_some() {
            return Err(usage("--owner", "--no-ownership"));
        }
        if self.no_ownership && self.group.is_some() {
            return Err(usage("--group", "--no-ownership"));
        }
        if self.no_owner && self.owner.is_some() {
            return Err(usage("--owner", "--no-owner"));
        }
        if self.no_group && self.group.is_some() {
            return Err(usage("--group", "--no-group"));
        }
        if self.no_mode && self.mode.is_some() {
            return Err(usage("--mode", "--no-mode"));
        }
        Ok(())
    }

    /// Mask governing which resolved fields are stamped onto the temporary
    /// artifact. Suppression flags gate the copy-from-old-file behavior
    /// here; the unchanged-branch reconciliation ignores this mask.
    #[must_use]
    pub(crate) fn apply_mask(&self) -> ApplyMask {
        ApplyMask {
            mode: !self.no_mode,
            owner: !(self.no_owner || self.no_ownership),
            group: !(self.no_group || self.no_ownership),
        }
    }
}

fn usage(flag: &str, conflicting: &str) -> ReplaceError {
    ReplaceError::Usage(format!("cannot combine {flag} with {conflicting}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn config() -> RunConfig {
        RunConfig::new(Path::new("target.txt").to_path_buf())
    }

    #[test]
    fn default_configuration_is_valid() {
        config().validate().expect("defaults must validate");
    }

    #[test]
    fn ownership_suppression_conflicts_with_explicit_owner() {
        let mut config = config();
        config.no_ownership = true;
        config.owner = Some("root".to_owned());
        let error = config.validate().expect_err("must reject");
        assert!(matches!(error, ReplaceError::Usage(_)));
    }

    #[test]
    fn ownership_suppression_conflicts_with_explicit_group() {
        let mut config = config();
        config.no_ownership = true;
        config.group = Some("wheel".to_owned());
        assert!(config.validate().is_err());
    }

    #[test]
    fn owner_suppression_conflicts_with_explicit_owner() {
        let mut config = config();
        config.no_owner = true;
        config.owner = Some("root".to_owned());
        assert!(config.validate().is_err());
    }

    #[test]
    fn group_suppression_conflicts_with_explicit_group() {
        let mut config = config();
        config.no_group = true;
        config.group = Some("wheel".to_owned());
        assert!(config.validate().is_err());
    }

    #[test]
    fn mode_suppression_conflicts_with_explicit_mode() {
        let mut config = config();
        config.no_mode = true;
        config.mode = Some(0o644);
        assert!(config.validate().is_err());
    }

    #[test]
    fn suppressions_without_overrides_are_fine() {
        let mut config = config();
        config.no_ownership = true;
        config.no_mode = true;
        config.validate().expect("suppressions alone are valid");
    }

    #[test]
    fn apply_mask_reflects_suppression_flags() {
        let mut config = config();
        config.no_mode = true;
        config.no_group = true;
        let mask = config.apply_mask();
        assert!(!mask.mode);
        assert!(mask.owner);
        assert!(!mask.group);

        config.no_group = false;
        config.no_ownership = true;
        let mask = config.apply_mask();
        assert!(!mask.owner);
        assert!(!mask.group);
    }
}
