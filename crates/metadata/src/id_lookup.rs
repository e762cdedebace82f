//! Resolution of `--owner`/`--group` names to numeric ids.
//!
//! Decimal strings are accepted directly; anything else is looked up in the
//! passwd or group database. An unknown name is an error, never a silent
//! fallback.

use std::io;

use crate::error::MetadataError;

/// Resolves a user name or decimal uid string to a numeric uid.
pub fn resolve_user(name: &str) -> Result<u32, MetadataError> {
    if let Ok(uid) = name.parse::<u32>() {
        return Ok(uid);
    }
    lookup_user(name)
}

/// Resolves a group name or decimal gid string to a numeric gid.
pub fn resolve_group(name: &str) -> Result<u32, MetadataError> {
    if let Ok(gid) = name.parse::<u32>() {
        return Ok(gid);
    }
    lookup_group(name)
}

#[cfg(unix)]
fn lookup_user(name: &str) -> Result<u32, MetadataError> {
    match nix::unistd::User::from_name(name) {
        Ok(Some(user)) => Ok(user.uid.as_raw()),
        Ok(None) => Err(MetadataError::new(
            "resolve user",
            name,
            io::Error::new(io::ErrorKind::NotFound, "no such user"),
        )),
        Err(errno) => Err(MetadataError::new(
            "resolve user",
            name,
            io::Error::from(errno),
        )),
    }
}

#[cfg(unix)]
fn lookup_group(name: &str) -> Result<u32, MetadataError> {
    match nix::unistd::Group::from_name(name) {
        Ok(Some(group)) => Ok(group.gid.as_raw()),
        Ok(None) => Err(MetadataError::new(
            "resolve group",
            name,
            io::Error::new(io::ErrorKind::NotFound, "no such group"),
        )),
        Err(errno) => Err(MetadataError::new(
            "resolve group",
            name,
            io::Error::from(errno),
        )),
    }
}

#[cfg(not(unix))]
fn lookup_user(name: &str) -> Result<u32, MetadataError> {
    Err(MetadataError::new(
        "resolve user",
        name,
        io::Error::new(
            io::ErrorKind::Unsupported,
            "user name lookup is not supported on this platform",
        ),
    ))
}

#[cfg(not(unix))]
fn lookup_group(name: &str) -> Result<u32, MetadataError> {
    Err(MetadataError::new(
        "resolve group",
        name,
        io::Error::new(
            io::ErrorKind::Unsupported,
            "group name lookup is not supported on this platform",
        ),
    ))
}
