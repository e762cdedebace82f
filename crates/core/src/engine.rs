//! The commit engine: one run of the replace state machine.
//!
//! Sequence: snapshot the old file, resolve target metadata, obtain the
//! content stream, materialize it into the temporary artifact, settle the
//! generator's exit status, compare, and finally rename into place or
//! discard. The artifact's deletion is armed at creation and disarmed only
//! by the rename, so every early return below cleans up by unwinding.

use std::fs;
use std::io::{self, Read, Write};

use filetime::FileTime;
use supplant_metadata::{
    ApplyMask, MetadataOverrides, TargetMetadata, apply, resolve, resolve_overrides, snapshot,
};

use crate::child::{ExitOutcome, Generator};
use crate::config::RunConfig;
use crate::diff::{Difference, compare};
use crate::error::{ReplaceError, ReplaceResult};
use crate::materialize::materialize;
use crate::supplant_warning;

/// Result of a completed run.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Outcome {
    /// Whether the content differed from the old file.
    pub changed: bool,
}

/// Runs one replace operation.
///
/// Diff output and the echoed generator exit code go to `stdout`; warnings
/// go to `stderr`. The caller maps the returned [`Outcome`] and any
/// [`ReplaceError`] onto the process exit code.
pub fn run_replace<Out, Err>(
    config: &RunConfig,
    stdout: &mut Out,
    stderr: &mut Err,
) -> ReplaceResult<Outcome>
where
    Out: Write,
    Err: Write,
{
    config.validate()?;

    let old = snapshot(&config.file)?;
    let explicit = resolve_overrides(&MetadataOverrides {
        mode: config.mode,
        owner: config.owner.as_deref(),
        group: config.group.as_deref(),
    })?;
    let resolved = resolve(&old, &explicit);

    let mut generator = match config.generator.split_first() {
        Some((program, args)) => Some(Generator::spawn(program, args)?),
        None => None,
    };

    let temp = {
        let mut reader: Box<dyn Read> = match generator.as_mut() {
            Some(generator) => Box::new(generator.take_stdout()?),
            None => Box::new(io::stdin().lock()),
        };
        materialize(config, &resolved, config.apply_mask(), reader.as_mut())?
    };

    // The stream is drained and closed; the generator's status is now
    // meaningful. A failed generator invalidates the materialized content.
    if let Some(generator) = generator.take() {
        match generator.wait()? {
            ExitOutcome::Success => {}
            ExitOutcome::NonZero(code) => {
                let _ = writeln!(stdout, "{code}");
                return Err(ReplaceError::ChildExited(code));
            }
            ExitOutcome::Signaled(signal) => {
                return Err(ReplaceError::ChildSignaled(signal));
            }
        }
    }

    match compare(config, old.exists, &temp, stdout)? {
        Difference::Different => {
            if !config.write {
                return Ok(Outcome { changed: true });
            }
            if !config.commit {
                warn(
                    stderr,
                    &supplant_warning!(
                        "--dry-run given, leaving {} unmodified",
                        config.file.display()
                    ),
                );
                return Ok(Outcome { changed: true });
            }

            if let Some(backup) = &config.backup {
                if old.exists {
                    match fs::remove_file(backup) {
                        Ok(()) => {}
                        Err(error) if error.kind() == io::ErrorKind::NotFound => {}
                        Err(error) => {
                            return Err(ReplaceError::io("remove stale backup", backup, &error));
                        }
                    }
                    fs::hard_link(&config.file, backup).map_err(|error| {
                        ReplaceError::io("link backup to", backup, &error)
                    })?;
                } else {
                    warn(
                        stderr,
                        &supplant_warning!(
                            "{} does not exist, skipping backup",
                            config.file.display()
                        ),
                    );
                }
            }

            temp.persist(&config.file).map_err(|error| {
                ReplaceError::io("rename temporary file over", &config.file, &error.error)
            })?;
            Ok(Outcome { changed: true })
        }
        Difference::Identical => {
            if config.write {
                reconcile_unchanged(config, &explicit, stderr)?;
            }
            Ok(Outcome { changed: false })
        }
    }
}

/// Metadata-only path for unchanged content.
///
/// Only explicit overrides are honored here; values copied from the old
/// snapshot never count as drift, and suppression flags do not apply
/// because an explicit `--mode`/`--owner`/`--group` always takes effect.
fn reconcile_unchanged<Err: Write>(
    config: &RunConfig,
    explicit: &TargetMetadata,
    stderr: &mut Err,
) -> ReplaceResult<()> {
    if config.touch {
        filetime::set_file_mtime(&config.file, FileTime::now())
            .map_err(|error| ReplaceError::io("update mtime of", &config.file, &error))?;
    }

    if explicit.mode.is_none() && explicit.uid.is_none() && explicit.gid.is_none() {
        return Ok(());
    }

    let current = snapshot(&config.file)?;
    if let Some(uid) = explicit.uid
        && current.exists
        && uid != current.uid
    {
        warn(
            stderr,
            &supplant_warning!(
                "changing owner of {} from {} to {uid}",
                config.file.display(),
                current.uid
            ),
        );
    }
    apply(&config.file, explicit, ApplyMask::all(), &current)?;
    Ok(())
}

/// Best-effort warning emission; a broken stderr never aborts the run.
fn warn<Err: Write>(stderr: &mut Err, message: &crate::message::Message) {
    let _ = writeln!(stderr, "{message}");
}
