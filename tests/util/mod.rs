//! Shared infrastructure for the end-to-end tests.
//!
//! Every test drives the real `supplant` binary through [`SupplantCommand`],
//! so the full pipeline is exercised: argument parsing, generator spawning,
//! materialization, comparison, and commit.

// Each test binary uses a different subset of these helpers.
#![allow(dead_code)]

use std::ffi::OsStr;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

/// Builder around one invocation of the compiled binary.
pub struct SupplantCommand {
    binary: PathBuf,
    current_dir: Option<PathBuf>,
    args: Vec<std::ffi::OsString>,
    envs: Vec<(std::ffi::OsString, std::ffi::OsString)>,
    stdin: Option<Vec<u8>>,
}

impl SupplantCommand {
    /// Creates a command for the binary Cargo built for this test run.
    pub fn new() -> Self {
        Self {
            binary: PathBuf::from(env!("CARGO_BIN_EXE_supplant")),
            current_dir: None,
            args: Vec::new(),
            envs: Vec::new(),
            stdin: None,
        }
    }

    /// Appends one argument.
    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    /// Appends several arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        for arg in args {
            self.args.push(arg.as_ref().to_os_string());
        }
        self
    }

    /// Runs the binary from `dir`.
    pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.current_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Overrides one environment variable for the child.
    pub fn env(mut self, key: impl AsRef<OsStr>, value: impl AsRef<OsStr>) -> Self {
        self.envs
            .push((key.as_ref().to_os_string(), value.as_ref().to_os_string()));
        self
    }

    /// Feeds `bytes` to the binary's standard input.
    pub fn stdin(mut self, bytes: impl Into<Vec<u8>>) -> Self {
        self.stdin = Some(bytes.into());
        self
    }

    /// Spawns the binary and collects its output.
    pub fn output(self) -> Output {
        let mut command = Command::new(&self.binary);
        command.args(&self.args);
        if let Some(dir) = &self.current_dir {
            command.current_dir(dir);
        }
        for (key, value) in &self.envs {
            command.env(key, value);
        }
        match self.stdin {
            Some(bytes) => {
                command.stdin(Stdio::piped());
                command.stdout(Stdio::piped());
                command.stderr(Stdio::piped());
                let mut child = command.spawn().expect("spawn supplant");
                child
                    .stdin
                    .take()
                    .expect("piped stdin")
                    .write_all(&bytes)
                    .expect("write stdin");
                child.wait_with_output().expect("wait for supplant")
            }
            None => {
                command.stdin(Stdio::null());
                command.output().expect("run supplant")
            }
        }
    }
}

/// Asserts the exit code, printing both streams on mismatch.
#[track_caller]
pub fn assert_exit_code(output: &Output, expected: i32, context: &str) {
    let actual = output.status.code().unwrap_or(-1);
    if actual != expected {
        eprintln!("=== Exit Code Mismatch ===");
        eprintln!("Context:  {context}");
        eprintln!("Expected: {expected}");
        eprintln!("Actual:   {actual}");
        eprintln!("=== stdout ===");
        eprintln!("{}", String::from_utf8_lossy(&output.stdout));
        eprintln!("=== stderr ===");
        eprintln!("{}", String::from_utf8_lossy(&output.stderr));
        panic!("exit code mismatch for {context}: expected {expected}, got {actual}");
    }
}

/// Lossy view of a stream for content assertions.
pub fn text(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}
