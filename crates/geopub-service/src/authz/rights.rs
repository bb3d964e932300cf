//! Access-rights records and partial-update completion.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// The full access-rights record of a publication.
///
/// Both sets hold principal names (usernames and role names mixed, possibly
/// including the `EVERYONE` pseudo-role). Both keys are always present once
/// a record reaches the authorizer; `write` is not required to be a subset
/// of `read`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessRights {
    pub read: HashSet<String>,
    pub write: HashSet<String>,
}

impl AccessRights {
    /// A record granting one principal both rights, the default for a
    /// freshly created publication.
    #[must_use]
    pub fn owned_by(principal: &str) -> Self {
        Self {
            read: HashSet::from([principal.to_string()]),
            write: HashSet::from([principal.to_string()]),
        }
    }
}

/// Access rights as they arrive in a PATCH or POST body, where either key
/// may be omitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PartialAccessRights {
    pub read: Option<HashSet<String>>,
    pub write: Option<HashSet<String>>,
}

/// Completes partially-specified access rights against the publication's
/// current full record.
///
/// A key present in `partial` replaces the stored value verbatim; it is not
/// unioned with it. A missing key (or a missing `partial` altogether) keeps
/// the stored value.
#[must_use]
pub fn complete_access_rights(
    partial: Option<&PartialAccessRights>,
    full_defaults: &AccessRights,
) -> AccessRights {
    let Some(partial) = partial else {
        return full_defaults.clone();
    };

    AccessRights {
        read: partial
            .read
            .clone()
            .unwrap_or_else(|| full_defaults.read.clone()),
        write: partial
            .write
            .clone()
            .unwrap_or_else(|| full_defaults.write.clone()),
    }
}
