//! Target user and group for the supervised process.

use nix::unistd::{getegid, geteuid, Gid, Group, Uid, User};

use crate::error::SupervisorError;

/// Marker for "keep the current identity".
pub const UNCHANGED: &str = "-";

/// Identity switch to apply before exec. `None` keeps the current id.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Identity {
    pub uid: Option<Uid>,
    pub gid: Option<Gid>,
}

impl Identity {
    /// Resolve names or numeric ids. Ids equal to the effective ones are
    /// dropped so that an unprivileged supervisor can run as itself.
    pub fn resolve(user: &str, group: &str) -> Result<Self, SupervisorError> {
        let uid = lookup_user(user)?.filter(|uid| *uid != geteuid());
        let gid = lookup_group(group)?.filter(|gid| *gid != getegid());
        Ok(Self { uid, gid })
    }
}

fn lookup_user(spec: &str) -> Result<Option<Uid>, SupervisorError> {
    if spec.is_empty() || spec == UNCHANGED {
        return Ok(None);
    }
    if let Ok(id) = spec.parse::<u32>() {
        return Ok(Some(Uid::from_raw(id)));
    }
    match User::from_name(spec) {
        Ok(Some(user)) => Ok(Some(user.uid)),
        Ok(None) => Err(SupervisorError::UnknownIdentity {
            kind: "user",
            name: spec.to_string(),
        }),
        Err(source) => Err(SupervisorError::Lookup {
            kind: "user",
            name: spec.to_string(),
            source,
        }),
    }
}

fn lookup_group(spec: &str) -> Result<Option<Gid>, SupervisorError> {
    if spec.is_empty() || spec == UNCHANGED {
        return Ok(None);
    }
    if let Ok(id) = spec.parse::<u32>() {
        return Ok(Some(Gid::from_raw(id)));
    }
    match Group::from_name(spec) {
        Ok(Some(group)) => Ok(Some(group.gid)),
        Ok(None) => Err(SupervisorError::UnknownIdentity {
            kind: "group",
            name: spec.to_string(),
        }),
        Err(source) => Err(SupervisorError::Lookup {
            kind: "group",
            name: spec.to_string(),
            source,
        }),
    }
}
