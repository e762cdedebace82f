#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `supplant_metadata` captures, resolves, and applies the permission and
//! ownership metadata that `supplant` reconciles when it replaces a file.
//!
//! The crate exposes four operations:
//!
//! - [`snapshot`] records a [`FileSnapshot`] of a path (mode bits, owner,
//!   group, existence) without following error-prone side channels — a
//!   missing file is a valid snapshot, not an error.
//! - [`resolve_overrides`] turns the user-supplied `--mode`/`--owner`/
//!   `--group` values into a numeric [`TargetMetadata`], consulting the
//!   passwd and group databases for names.
//! - [`resolve`] merges explicit overrides with an old-file snapshot using
//!   first-match precedence: explicit value, then the old file's value, then
//!   unspecified.
//! - [`apply`] stamps a [`TargetMetadata`] onto a path, issuing `chown` and
//!   `chmod` only for fields that differ from the current on-disk state and
//!   only where the [`ApplyMask`] permits.
//!
//! # Errors
//!
//! All failures surface as [`MetadataError`], which records the attempted
//! action, the path involved, and the underlying [`std::io::Error`]. Callers
//! treat every metadata failure as fatal; this crate never downgrades a
//! failed `chown` or `chmod` to a warning.

mod apply;
mod error;
mod id_lookup;
#[cfg(unix)]
mod ownership;
mod resolve;
mod snapshot;

pub use apply::{ApplyMask, apply};
pub use error::MetadataError;
pub use id_lookup::{resolve_group, resolve_user};
pub use resolve::{MetadataOverrides, TargetMetadata, resolve, resolve_overrides};
pub use snapshot::{FileSnapshot, snapshot};
