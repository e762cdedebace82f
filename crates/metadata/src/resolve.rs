use crate::error::MetadataError;
use crate::id_lookup::{resolve_group, resolve_user};
use crate::snapshot::FileSnapshot;

/// Explicit metadata overrides supplied on the command line.
#[derive(Clone, Copy, Debug, Default)]
pub struct MetadataOverrides<'a> {
    /// Explicit permission bits, already parsed from octal.
    pub mode: Option<u32>,
    /// Explicit owner name or decimal uid.
    pub owner: Option<&'a str>,
    /// Explicit group name or decimal gid.
    pub group: Option<&'a str>,
}

/// Resolved target metadata for the replacement file.
///
/// Each field is independently either "apply this value" or unspecified.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct TargetMetadata {
    /// Permission bits to apply, if any.
    pub mode: Option<u32>,
    /// Numeric owner id to apply, if any.
    pub uid: Option<u32>,
    /// Numeric group id to apply, if any.
    pub gid: Option<u32>,
}

/// Resolves explicit overrides to numeric form.
///
/// Owner and group names are looked up here, once per run; a name that does
/// not resolve is a fatal error.
pub fn resolve_overrides(overrides: &MetadataOverrides<'_>) -> Result<TargetMetadata, MetadataError> {
    let uid = overrides.owner.map(resolve_user).transpose()?;
    let gid = overrides.group.map(resolve_group).transpose()?;
    Ok(TargetMetadata {
        mode: overrides.mode,
        uid,
        gid,
    })
}

/// Merges explicit overrides with the old file's snapshot.
///
/// Per-field precedence, first match wins: the explicit value, the old
/// file's value when it exists, otherwise unspecified.
#[must_use]
pub fn resolve(old: &FileSnapshot, explicit: &TargetMetadata) -> TargetMetadata {
    TargetMetadata {
        mode: explicit.mode.or_else(|| old.exists.then_some(old.mode)),
        uid: explicit.uid.or_else(|| old.exists.then_some(old.uid)),
        gid: explicit.gid.or_else(|| old.exists.then_some(old.gid)),
    }
}
