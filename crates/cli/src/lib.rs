#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `supplant_cli` implements the thin command-line front-end for the
//! `supplant` workspace. The crate recognises the full option surface
//! (`--exit`, `--no-write`, `--dry-run`, `--quiet`, `--backup`, `--mtime`,
//! `--mode`, `--owner`, `--group`, the `--no-*` suppression family,
//! `--no-text`, and `--no-parents`), builds a validated
//! [`RunConfig`](supplant_core::config::RunConfig), and delegates the actual
//! work to [`supplant_core::engine::run_replace`].
//!
//! # Design
//!
//! The crate exposes [`run`] as the primary entry point. The function
//! accepts an iterator of arguments together with handles for standard
//! output and error. Internally a [`clap`](https://docs.rs/clap/) command
//! definition parses the options while treating everything from `FILE`
//! onward as operands, so generator arguments pass through untouched even
//! when they start with a hyphen.
//!
//! # Invariants
//!
//! - `run` never panics; all failures surface as non-zero exit codes drawn
//!   from [`ExitCode`](supplant_core::exit_code::ExitCode).
//! - Parse failures and option conflicts exit with the usage code before
//!   any filesystem access.
//! - Diagnostics are rendered through the central
//!   [`supplant_core::message`] utilities so formatting stays uniform.

use std::ffi::OsString;
use std::io::Write;
use std::path::PathBuf;

use clap::{Arg, ArgAction, Command, builder::OsStringValueParser};
use supplant_core::{
    config::RunConfig,
    engine::run_replace,
    exit_code::ExitCode,
    message::Message,
    supplant_error,
};
use supplant_logging::MessageSink;

/// Largest mode value expressible in the 12 permission bits.
const MODE_MAX: u32 = 0o7777;

/// Deterministic help text describing the CLI surface.
const HELP_TEXT: &str = concat!(
    "supplant ",
    env!("CARGO_PKG_VERSION"),
    "\n",
    "\n",
    "Usage: supplant [OPTIONS] FILE [PROGRAM [ARGS...]]\n",
    "\n",
    "Atomically replace FILE's contents with the output of PROGRAM, or with\n",
    "standard input when PROGRAM is omitted. The old file's permission bits,\n",
    "owner, and group carry over unless overridden or suppressed; readers\n",
    "never observe a partially written file.\n",
    "\n",
    "  -e, --exit           Exit 1 when the content changed.\n",
    "  -W, --no-write       Compare and report only; never touch the filesystem.\n",
    "  -n, --dry-run        Prepare everything but skip the final rename.\n",
    "  -q, --quiet          No diff rendering; compare bytes only.\n",
    "  -b, --backup=PATH    Hard-link FILE to PATH before replacing it.\n",
    "  -t, --mtime          Update FILE's mtime when the content is unchanged.\n",
    "  -m, --mode=OCTAL     Explicit target mode.\n",
    "  -o, --owner=NAME     Explicit target owner (name or numeric id).\n",
    "  -g, --group=NAME     Explicit target group (name or numeric id).\n",
    "      --no-owner       Do not copy the owner from the old file.\n",
    "      --no-group       Do not copy the group from the old file.\n",
    "      --no-ownership   Do not copy owner or group from the old file.\n",
    "      --no-mode        Do not copy the mode from the old file.\n",
    "      --no-text        Treat content as opaque; compare bytes only.\n",
    "      --no-parents     Fail instead of creating missing parent directories.\n",
    "  -h, --help           Show this help message and exit.\n",
    "  -V, --version        Output version information and exit.\n",
    "\n",
    "Exit codes: 0 success or unchanged; 1 changed (with --exit); 2 general\n",
    "error; 64 usage error; 100 PROGRAM exited non-zero (code echoed on\n",
    "stdout); 101 change could not be determined; 199 PROGRAM killed by a\n",
    "signal; 200 internal error.\n",
);

/// Parsed command produced by [`parse_args`].
#[derive(Debug, Default)]
struct ParsedArgs {
    show_help: bool,
    show_version: bool,
    exit_on_change: bool,
    no_write: bool,
    dry_run: bool,
    quiet: bool,
    backup: Option<OsString>,
    mtime: bool,
    mode: Option<String>,
    owner: Option<String>,
    group: Option<String>,
    no_owner: bool,
    no_group: bool,
    no_ownership: bool,
    no_mode: bool,
    no_text: bool,
    no_parents: bool,
    operands: Vec<OsString>,
}

/// Builds the `clap` command used for parsing.
fn clap_command() -> Command {
    Command::new("supplant")
        .disable_help_flag(true)
        .disable_version_flag(true)
        .arg_required_else_help(false)
        .arg(
            Arg::new("help")
                .long("help")
                .short('h')
                .help("Show this help message and exit.")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("version")
                .long("version")
                .short('V')
                .help("Output version information and exit.")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("exit")
                .long("exit")
                .short('e')
                .help("Exit 1 when the content changed.")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("no-write")
                .long("no-write")
                .short('W')
                .help("Compare and report only; never touch the filesystem.")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("dry-run")
                .long("dry-run")
                .short('n')
                .help("Prepare everything but skip the final rename.")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("quiet")
                .long("quiet")
                .short('q')
                .help("No diff rendering; compare bytes only.")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("backup")
                .long("backup")
                .short('b')
                .value_name("PATH")
                .help("Hard-link FILE to PATH before replacing it.")
                .num_args(1)
                .action(ArgAction::Set)
                .value_parser(OsStringValueParser::new()),
        )
        .arg(
            Arg::new("mtime")
                .long("mtime")
                .short('t')
                .help("Update FILE's mtime when the content is unchanged.")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("mode")
                .long("mode")
                .short('m')
                .value_name("OCTAL")
                .help("Explicit target mode.")
                .num_args(1)
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("owner")
                .long("owner")
                .short('o')
                .value_name("NAME")
                .help("Explicit target owner (name or numeric id).")
                .num_args(1)
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("group")
                .long("group")
                .short('g')
                .value_name("NAME")
                .help("Explicit target group (name or numeric id).")
                .num_args(1)
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("no-owner")
                .long("no-owner")
                .help("Do not copy the owner from the old file.")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("no-group")
                .long("no-group")
                .help("Do not copy the group from the old file.")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("no-ownership")
                .long("no-ownership")
                .help("Do not copy owner or group from the old file.")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("no-mode")
                .long("no-mode")
                .help("Do not copy the mode from the old file.")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("no-text")
                .long("no-text")
                .help("Treat content as opaque; compare bytes only.")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("no-parents")
                .long("no-parents")
                .help("Fail instead of creating missing parent directories.")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("args")
                .action(ArgAction::Append)
                .num_args(0..)
                .trailing_var_arg(true)
                .value_parser(OsStringValueParser::new()),
        )
}

/// Parses command-line arguments into a [`ParsedArgs`] structure.
fn parse_args<I, S>(arguments: I) -> Result<ParsedArgs, clap::Error>
where
    I: IntoIterator<Item = S>,
    S: Into<OsString>,
{
    let mut args: Vec<OsString> = arguments.into_iter().map(Into::into).collect();
    if args.is_empty() {
        args.push(OsString::from("supplant"));
    }

    let mut matches = clap_command().try_get_matches_from(args)?;

    let operands = matches
        .remove_many::<OsString>("args")
        .map(|values| values.collect())
        .unwrap_or_default();

    Ok(ParsedArgs {
        show_help: matches.get_flag("help"),
        show_version: matches.get_flag("version"),
        exit_on_change: matches.get_flag("exit"),
        no_write: matches.get_flag("no-write"),
        dry_run: matches.get_flag("dry-run"),
        quiet: matches.get_flag("quiet"),
        backup: matches.remove_one::<OsString>("backup"),
        mtime: matches.get_flag("mtime"),
        mode: matches.remove_one::<String>("mode"),
        owner: matches.remove_one::<String>("owner"),
        group: matches.remove_one::<String>("group"),
        no_owner: matches.get_flag("no-owner"),
        no_group: matches.get_flag("no-group"),
        no_ownership: matches.get_flag("no-ownership"),
        no_mode: matches.get_flag("no-mode"),
        no_text: matches.get_flag("no-text"),
        no_parents: matches.get_flag("no-parents"),
        operands,
    })
}

/// Parses an explicit `--mode` value as a 12-bit octal mode.
fn parse_mode(value: &str) -> Result<u32, Message> {
    match u32::from_str_radix(value, 8) {
        Ok(mode) if mode <= MODE_MAX => Ok(mode),
        _ => Err(supplant_error!(
            ExitCode::Usage.as_i32(),
            "invalid mode '{value}': expected an octal value between 0 and 7777"
        )),
    }
}

/// Builds the validated [`RunConfig`] from parsed arguments.
fn build_config(parsed: ParsedArgs) -> Result<RunConfig, Message> {
    let mut operands = parsed.operands.into_iter();
    let Some(file) = operands.next() else {
        return Err(supplant_error!(
            ExitCode::Usage.as_i32(),
            "missing FILE operand"
        ));
    };

    let mut config = RunConfig::new(PathBuf::from(file));
    config.generator = operands.collect();
    config.show_diff = !parsed.quiet;
    config.write = !parsed.no_write;
    config.commit = !parsed.dry_run;
    config.backup = parsed.backup.map(PathBuf::from);
    config.touch = parsed.mtime;
    config.mode = parsed.mode.as_deref().map(parse_mode).transpose()?;
    config.owner = parsed.owner;
    config.group = parsed.group;
    config.no_owner = parsed.no_owner;
    config.no_group = parsed.no_group;
    config.no_ownership = parsed.no_ownership;
    config.no_mode = parsed.no_mode;
    config.opaque = parsed.no_text;
    config.no_parents = parsed.no_parents;
    config.exit_on_change = parsed.exit_on_change;
    Ok(config)
}

/// Writes a [`Message`] to the sink, falling back to the raw writer.
fn write_message<W: Write>(message: &Message, sink: &mut MessageSink<W>) {
    if sink.write(message).is_err() {
        let _ = writeln!(sink.writer_mut(), "{message}");
    }
}

/// Runs the CLI using the provided argument iterator and output handles.
///
/// Returns the process exit code the caller should use. Diff text and the
/// echoed generator exit code go to `stdout`; diagnostics go to `stderr`.
pub fn run<I, S, Out, Err>(arguments: I, stdout: &mut Out, stderr: &mut Err) -> i32
where
    I: IntoIterator<Item = S>,
    S: Into<OsString>,
    Out: Write,
    Err: Write,
{
    let mut sink = MessageSink::new(stderr);

    let parsed = match parse_args(arguments) {
        Ok(parsed) => parsed,
        Err(error) => {
            let message = supplant_error!(ExitCode::Usage.as_i32(), "{error}");
            write_message(&message, &mut sink);
            return ExitCode::Usage.as_i32();
        }
    };

    if parsed.show_help {
        if stdout.write_all(HELP_TEXT.as_bytes()).is_err() {
            return ExitCode::General.as_i32();
        }
        return ExitCode::Ok.as_i32();
    }

    if parsed.show_version {
        let banner = concat!("supplant ", env!("CARGO_PKG_VERSION"), "\n");
        if stdout.write_all(banner.as_bytes()).is_err() {
            return ExitCode::General.as_i32();
        }
        return ExitCode::Ok.as_i32();
    }

    let config = match build_config(parsed) {
        Ok(config) => config,
        Err(message) => {
            let code = message.code().unwrap_or(ExitCode::Usage.as_i32());
            write_message(&message, &mut sink);
            return code;
        }
    };

    match run_replace(&config, stdout, sink.writer_mut()) {
        Ok(outcome) => {
            if outcome.changed && config.exit_on_change {
                ExitCode::Changed.as_i32()
            } else {
                ExitCode::Ok.as_i32()
            }
        }
        Err(error) => {
            let code = error.exit_code();
            let message = supplant_error!(code.as_i32(), "{error}");
            write_message(&message, &mut sink);
            code.as_i32()
        }
    }
}
