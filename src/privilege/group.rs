//! Merge privileges sharing a target so that each target needs one statement

use std::collections::BTreeMap;

use tracing::warn;

use super::{Privilege, PrivilegeType};

/// Combine privileges with the same `(type, identifier)` into one privilege each.
///
/// Buckets come out sorted by type then identifier, and names inside a bucket are
/// sorted, so any permutation of the input yields the same output. Repeated names
/// in a bucket are kept as they are and reported with a warning.
pub fn group_privileges(privileges: &[Privilege]) -> Vec<Privilege> {
    let mut buckets: BTreeMap<(PrivilegeType, &str), Vec<&str>> = BTreeMap::new();

    for privilege in privileges {
        let names = buckets
            .entry((privilege.privilege_type, privilege.identifier.as_str()))
            .or_default();
        for name in privilege.names() {
            if names.contains(&name) {
                warn!(
                    "Privilege {:?} is listed more than once for {} target {:?}",
                    name, privilege.privilege_type, privilege.identifier
                );
            }
            names.push(name);
        }
    }

    buckets
        .into_iter()
        .map(|((privilege_type, identifier), mut names)| {
            names.sort_unstable();
            Privilege::new(privilege_type, names.join(", "), identifier)
        })
        .collect()
}

/// Group privileges and render each group as its canonical grant clause.
pub fn group(privileges: &[Privilege]) -> Vec<String> {
    group_privileges(privileges)
        .iter()
        .map(ToString::to_string)
        .collect()
}
