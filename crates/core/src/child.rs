//! Generator program supervision.
//!
//! The generator runs concurrently with this process; the pipe between them
//! provides the only coupling. Its exit status is knowable only after its
//! stdout has been fully drained and closed, so the handle is two-phase:
//! [`Generator::take_stdout`] first, [`Generator::wait`] after the stream
//! is gone.

use std::ffi::{OsStr, OsString};
use std::process::{Child, ChildStdout, Command, Stdio};

use crate::error::{ReplaceError, ReplaceResult};

/// Terminal status of a generator program.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ExitOutcome {
    /// Normal exit with code 0.
    Success,
    /// Normal exit with the given non-zero code.
    NonZero(i32),
    /// Killed by the given signal.
    Signaled(i32),
}

/// Running generator program with a piped stdout.
///
/// Stderr is inherited so the generator's own diagnostics reach the user
/// directly.
#[derive(Debug)]
pub struct Generator {
    child: Child,
    program: OsString,
}

impl Generator {
    /// Spawns `program` with `args`. Spawn failure is a general error.
    pub fn spawn(program: &OsStr, args: &[OsString]) -> ReplaceResult<Self> {
        let child = Command::new(program)
            .args(args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|error| {
                ReplaceError::General(format!(
                    "failed to run {}: {error}",
                    program.to_string_lossy()
                ))
            })?;
        Ok(Self {
            child,
            program: program.to_os_string(),
        })
    }

    /// Takes the readable stdout stream. Valid exactly once.
    pub fn take_stdout(&mut self) -> ReplaceResult<ChildStdout> {
        self.child.stdout.take().ok_or_else(|| {
            ReplaceError::Internal("generator did not expose a readable stdout".to_owned())
        })
    }

    /// Reaps the generator and reports its terminal status.
    ///
    /// Must only be called once the stream returned by
    /// [`Self::take_stdout`] has been fully drained and dropped; the status
    /// is not meaningful earlier.
    pub fn wait(mut self) -> ReplaceResult<ExitOutcome> {
        let status = self.child.wait().map_err(|error| {
            ReplaceError::General(format!(
                "failed to wait for {}: {error}",
                self.program.to_string_lossy()
            ))
        })?;

        match status.code() {
            Some(0) => Ok(ExitOutcome::Success),
            Some(code) => Ok(ExitOutcome::NonZero(code)),
            None => {
                #[cfg(unix)]
                {
                    use std::os::unix::process::ExitStatusExt;

                    if let Some(signal) = status.signal() {
                        return Ok(ExitOutcome::Signaled(signal));
                    }
                }
                Err(ReplaceError::Internal(format!(
                    "{} terminated without an exit code",
                    self.program.to_string_lossy()
                )))
            }
        }
    }
}
