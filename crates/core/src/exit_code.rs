//! Centralized exit code definitions for the supplant binary.
//!
//! All error types across the workspace map onto this single table so the
//! process exit code is decided in exactly one place.

use std::fmt;

/// Exit codes returned by a supplant run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum ExitCode {
    /// Successful completion; content unchanged, or changed without `--exit`.
    Ok = 0,

    /// Content changed and `--exit` was given.
    Changed = 1,

    /// General error: filesystem, permission, lookup, rename, link, chmod,
    /// or chown failure.
    General = 2,

    /// Usage error: bad or conflicting options, rejected before any I/O.
    Usage = 64,

    /// The generator program exited with a non-zero code; the code is
    /// echoed on standard output.
    ChildExited = 100,

    /// The comparison helper returned a status other than "same" or
    /// "different", so the change could not be determined.
    Indeterminate = 101,

    /// The generator program was killed by a signal.
    ChildSignaled = 199,

    /// Internal invariant violation, such as failing to stat a freshly
    /// created temporary file.
    Internal = 200,
}

impl ExitCode {
    /// Returns the numeric exit code value.
    #[must_use]
    pub const fn as_i32(self) -> i32 {
        self as i32
    }

    /// Returns a human-readable description of this exit code.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Ok => "success",
            Self::Changed => "content changed",
            Self::General => "general error",
            Self::Usage => "usage error",
            Self::ChildExited => "generator exited non-zero",
            Self::Indeterminate => "cannot determine change",
            Self::ChildSignaled => "generator killed by signal",
            Self::Internal => "internal error",
        }
    }
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.as_i32(), self.description())
    }
}
