//! Rendering of grant clauses and GRANT/REVOKE statements
//!
//! Clause rendering is the inverse of the clause parser: for every privilege the
//! parser produces, parsing the rendered clause yields the same privilege.

use itertools::Itertools;

use super::{escape_string, principal_ident};
use crate::privilege::{Privilege, PrivilegeType};

/// Render the grant clause for a privilege, e.g. `SELECT, INSERT ON SCHEMA SALES`.
pub fn render_privilege_clause(privilege: &Privilege) -> String {
    let names = &privilege.name;
    let target = &privilege.identifier;

    match privilege.privilege_type {
        PrivilegeType::System => names.clone(),
        PrivilegeType::Source => format!("{} ON REMOTE SOURCE {}", names, target),
        PrivilegeType::Schema => format!("{} ON SCHEMA {}", names, target),
        PrivilegeType::Object => format!("{} ON {}", names, target),
        PrivilegeType::UserGroup => format!("USERGROUP OPERATOR ON USERGROUP {}", target),
        PrivilegeType::ColumnKey => {
            format!("USAGE ON CLIENTSIDE ENCRYPTION COLUMN KEY {}", target)
        }
        PrivilegeType::Structured => format!("STRUCTURED PRIVILEGE {}", target),
    }
}

pub fn render_grant_statement(clause: &str, grantee: &str) -> String {
    format!("GRANT {} TO {}", clause, principal_ident(grantee))
}

pub fn render_revoke_statement(clause: &str, grantee: &str) -> String {
    format!("REVOKE {} FROM {}", clause, principal_ident(grantee))
}

/// Render one statement granting all `roles`. Role names are passed through as written.
pub fn render_grant_roles<S: AsRef<str>>(roles: &[S], grantee: &str) -> String {
    format!(
        "GRANT {} TO {}",
        roles.iter().map(AsRef::as_ref).join(", "),
        principal_ident(grantee)
    )
}

pub fn render_revoke_roles<S: AsRef<str>>(roles: &[S], grantee: &str) -> String {
    format!(
        "REVOKE {} FROM {}",
        roles.iter().map(AsRef::as_ref).join(", "),
        principal_ident(grantee)
    )
}

pub fn render_add_ldap_groups<S: AsRef<str>>(role: &str, groups: &[S]) -> String {
    format!(
        "ALTER ROLE {} ADD LDAP GROUP {}",
        principal_ident(role),
        groups.iter().map(|g| escape_string(g.as_ref())).join(", ")
    )
}

pub fn render_drop_ldap_groups<S: AsRef<str>>(role: &str, groups: &[S]) -> String {
    format!(
        "ALTER ROLE {} DROP LDAP GROUP {}",
        principal_ident(role),
        groups.iter().map(|g| escape_string(g.as_ref())).join(", ")
    )
}
