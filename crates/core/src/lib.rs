#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `supplant_core` implements the atomic replace-and-reconcile engine behind
//! the `supplant` binary: it materializes new content (from standard input
//! or a generator program) into a temporary file beside the target,
//! determines whether the content changed, reconciles permission and
//! ownership metadata, and commits the result with an atomic rename.
//!
//! # Design
//!
//! The crate is organised around one orchestrator and a set of leaves:
//!
//! - [`config::RunConfig`] — the immutable, validated run configuration.
//! - [`child::Generator`] — two-phase handle over the generator program:
//!   first drain its stdout, then ask for its [`child::ExitOutcome`].
//! - `materialize` (private) — writes the new content into a
//!   [`tempfile::TempPath`] whose drop guarantee is the single cleanup path
//!   for every failure branch.
//! - `diff` (private) — byte comparison, or the external `diff -u` helper
//!   when a textual rendering was requested.
//! - [`engine::run_replace`] — the commit state machine tying it together.
//!
//! # Errors
//!
//! Every failure is fatal and mapped onto the process exit-code contract by
//! [`error::ReplaceError::exit_code`]; see [`exit_code::ExitCode`] for the
//! full table. The temporary artifact is deleted on every designed error
//! branch because its deletion is registered at creation time and cancelled
//! only by the final rename.

pub mod child;
pub mod config;
mod diff;
pub mod engine;
pub mod error;
pub mod exit_code;
mod materialize;
pub mod message;
