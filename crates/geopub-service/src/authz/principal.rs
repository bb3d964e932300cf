//! Principal name classification.
//!
//! Principals are plain strings; whether a name denotes a user or a role is
//! inferred from its characters alone. Role names are all-uppercase by
//! naming convention (enforced where roles are created), so any lowercase
//! letter marks a username. Keeping the rule in one place means a future
//! switch to tagged principal types only touches this module.

use std::collections::HashSet;

/// Returns `true` iff the name contains at least one lowercase letter.
///
/// Pure classification, no registry lookup.
#[must_use]
pub fn is_user_name(name: &str) -> bool {
    name.chars().any(char::is_lowercase)
}

/// Partitions principal names into usernames and role names.
///
/// The role side is simply the complement of the user side; no separate
/// uppercase check is applied.
pub fn split_principals<I, S>(names: I) -> (HashSet<String>, HashSet<String>)
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut user_names = HashSet::new();
    let mut role_names = HashSet::new();

    for name in names {
        let name = name.as_ref();
        if is_user_name(name) {
            user_names.insert(name.to_string());
        } else {
            role_names.insert(name.to_string());
        }
    }

    (user_names, role_names)
}
