//! Difference detection between the old file and the materialized content.
//!
//! Both sides are always real paths by the time this module runs, which
//! keeps the comparison a single synchronous call: either a chunked byte
//! comparison, or one invocation of the external `diff -u` helper whose
//! output is forwarded to the run's stdout.

use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::Path;
use std::process::{Command, Stdio};

use crate::config::RunConfig;
use crate::error::{ReplaceError, ReplaceResult};

/// Whether the old and new content differ.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Difference {
    /// Contents are byte-identical (or the helper reported no differences).
    Identical,
    /// Contents differ, or exactly one side is missing.
    Different,
}

/// Compares the old file against `new_path`.
///
/// A missing old file is trivially different and never consults the helper.
/// Opaque content and suppressed diff display use the byte comparison;
/// otherwise the textual helper runs and its rendering is forwarded to
/// `stdout` as a side effect.
pub(crate) fn compare<Out: Write>(
    config: &RunConfig,
    old_exists: bool,
    new_path: &Path,
    stdout: &mut Out,
) -> ReplaceResult<Difference> {
    if !old_exists {
        return Ok(Difference::Different);
    }
    if config.opaque || !config.show_diff {
        return bytes_differ(&config.file, new_path);
    }
    render_unified(&config.file, new_path, stdout)
}

/// Byte-for-byte comparison of two existing files.
fn bytes_differ(old: &Path, new: &Path) -> ReplaceResult<Difference> {
    let old_len = fs::metadata(old)
        .map_err(|error| ReplaceError::io("stat", old, &error))?
        .len();
    let new_len = fs::metadata(new)
        .map_err(|error| ReplaceError::io("stat", new, &error))?
        .len();
    if old_len != new_len {
        return Ok(Difference::Different);
    }

    let mut old_file = File::open(old).map_err(|error| ReplaceError::io("open", old, &error))?;
    let mut new_file = File::open(new).map_err(|error| ReplaceError::io("open", new, &error))?;

    let mut old_buf = [0u8; 64 * 1024];
    let mut new_buf = [0u8; 64 * 1024];
    loop {
        let old_read = read_full(&mut old_file, &mut old_buf)
            .map_err(|error| ReplaceError::io("read", old, &error))?;
        let new_read = read_full(&mut new_file, &mut new_buf)
            .map_err(|error| ReplaceError::io("read", new, &error))?;
        if old_buf[..old_read] != new_buf[..new_read] {
            return Ok(Difference::Different);
        }
        if old_read == 0 {
            return Ok(Difference::Identical);
        }
    }
}

/// Reads until `buf` is full or the reader hits end of stream, so both
/// sides of the comparison always observe aligned chunks.
fn read_full(reader: &mut impl Read, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(read) => filled += read,
            Err(error) if error.kind() == io::ErrorKind::Interrupted => {}
            Err(error) => return Err(error),
        }
    }
    Ok(filled)
}

/// Runs the external `diff -u` helper, forwarding its rendering to `stdout`.
///
/// The old side is labeled `old`, the new side with the target's path. The
/// helper's status is the verdict: 0 identical, 1 different, anything else
/// (including failure to run it at all) leaves the change undetermined.
fn render_unified<Out: Write>(
    old: &Path,
    new: &Path,
    stdout: &mut Out,
) -> ReplaceResult<Difference> {
    let mut child = Command::new("diff")
        .arg("-u")
        .arg("-L")
        .arg("old")
        .arg("-L")
        .arg(old)
        .arg(old)
        .arg(new)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::inherit())
        .spawn()
        .map_err(|error| ReplaceError::Indeterminate(format!("failed to run diff: {error}")))?;

    if let Some(mut rendered) = child.stdout.take() {
        io::copy(&mut rendered, stdout).map_err(|error| {
            ReplaceError::General(format!("failed to forward diff output: {error}"))
        })?;
    }

    let status = child
        .wait()
        .map_err(|error| ReplaceError::Indeterminate(format!("failed to wait for diff: {error}")))?;

    match status.code() {
        Some(0) => Ok(Difference::Identical),
        Some(1) => Ok(Difference::Different),
        _ => Err(ReplaceError::Indeterminate(format!(
            "diff terminated with unexpected status {status}"
        ))),
    }
}
