#![allow(unsafe_code)]

//! Raw uid/gid conversions for the rustix chown calls in [`crate::apply`].

pub(crate) fn uid_from_raw(raw: rustix::process::RawUid) -> rustix::fs::Uid {
    rustix::fs::Uid::from_raw(raw)
}

pub(crate) fn gid_from_raw(raw: rustix::process::RawGid) -> rustix::fs::Gid {
    rustix::fs::Gid::from_raw(raw)
}
