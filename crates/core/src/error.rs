//! Error taxonomy for the replace engine.

use std::io;
use std::path::Path;

use supplant_metadata::MetadataError;

use crate::exit_code::ExitCode;

/// Result type for replace operations.
pub type ReplaceResult<T> = Result<T, ReplaceError>;

/// Fatal errors raised while replacing a file.
///
/// Every variant maps onto exactly one process exit code; no variant is
/// recoverable and none is retried. Cleanup of the temporary artifact is
/// carried by its drop guard, so error paths need no explicit teardown.
#[derive(Debug, thiserror::Error)]
pub enum ReplaceError {
    /// Bad or conflicting options, rejected before any I/O (exit 64).
    #[error("{0}")]
    Usage(String),

    /// Filesystem, permission, lookup, rename, link, chmod, or chown
    /// failure (exit 2).
    #[error("{0}")]
    General(String),

    /// The generator program exited with a non-zero code (exit 100).
    #[error("generator exited with code {0}")]
    ChildExited(i32),

    /// The generator program was killed by a signal (exit 199).
    #[error("generator killed by signal {0}")]
    ChildSignaled(i32),

    /// The comparison helper returned an unrecognized status (exit 101).
    #[error("cannot determine whether content changed: {0}")]
    Indeterminate(String),

    /// Invariant violation inside the engine itself (exit 200).
    #[error("internal error: {0}")]
    Internal(String),
}

impl ReplaceError {
    /// Returns the process exit code for this error.
    #[must_use]
    pub const fn exit_code(&self) -> ExitCode {
        match self {
            Self::Usage(_) => ExitCode::Usage,
            Self::General(_) => ExitCode::General,
            Self::ChildExited(_) => ExitCode::ChildExited,
            Self::ChildSignaled(_) => ExitCode::ChildSignaled,
            Self::Indeterminate(_) => ExitCode::Indeterminate,
            Self::Internal(_) => ExitCode::Internal,
        }
    }

    /// Builds a general error from a failed I/O action on a path.
    pub(crate) fn io(action: &str, path: &Path, source: &io::Error) -> Self {
        Self::General(format!(
            "failed to {action} {}: {source}",
            path.display()
        ))
    }
}

impl From<MetadataError> for ReplaceError {
    fn from(error: MetadataError) -> Self {
        Self::General(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_variant_maps_to_its_exit_code() {
        assert_eq!(
            ReplaceError::Usage(String::new()).exit_code(),
            ExitCode::Usage
        );
        assert_eq!(
            ReplaceError::General(String::new()).exit_code(),
            ExitCode::General
        );
        assert_eq!(ReplaceError::ChildExited(3).exit_code(), ExitCode::ChildExited);
        assert_eq!(
            ReplaceError::ChildSignaled(9).exit_code(),
            ExitCode::ChildSignaled
        );
        assert_eq!(
            ReplaceError::Indeterminate(String::new()).exit_code(),
            ExitCode::Indeterminate
        );
        assert_eq!(
            ReplaceError::Internal(String::new()).exit_code(),
            ExitCode::Internal
        );
    }

    #[test]
    fn io_errors_carry_action_and_path() {
        let error = ReplaceError::io(
            "rename temporary file over",
            Path::new("/etc/motd"),
            &io::Error::new(io::ErrorKind::PermissionDenied, "permission denied"),
        );
        let rendered = error.to_string();
        assert!(rendered.contains("rename temporary file over /etc/motd"));
        assert_eq!(error.exit_code(), ExitCode::General);
    }
}
