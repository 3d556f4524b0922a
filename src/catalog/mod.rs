//! Read granted privileges, roles and principal details back from the catalog

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::render::quote_ident;

pub mod principal;
pub mod privileges;
pub mod roles;

pub use principal::{PrivilegeObservation, RoleObservation, UserObservation, observe_role, observe_user};
pub use privileges::{query_privileges, render_privilege_row};
pub use roles::{query_roles, render_role_row};

/// Kind of principal a grant was made to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GranteeType {
    User,
    Role,
}

impl GranteeType {
    /// Value of the catalog's grantee type column.
    pub fn as_catalog_str(&self) -> &'static str {
        match self {
            GranteeType::User => "USER",
            GranteeType::Role => "ROLE",
        }
    }
}

impl fmt::Display for GranteeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_catalog_str())
    }
}

impl FromStr for GranteeType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "USER" => Ok(GranteeType::User),
            "ROLE" => Ok(GranteeType::Role),
            _ => Err(format!("unknown grantee type: {}", s)),
        }
    }
}

/// Split `SCHEMA.NAME` into its parts; `None` when the name is not qualified.
pub(crate) fn split_qualified(name: &str) -> Option<(&str, &str)> {
    name.split_once('.')
        .filter(|(schema, object)| !schema.is_empty() && !object.is_empty())
}

/// Render a catalog name so the clause parser reads it back unchanged.
///
/// Names the database stores folded to upper case stay bare; anything else was
/// created quoted and is quoted again.
pub(crate) fn catalog_ident(name: &str) -> String {
    let mut chars = name.chars();
    let folded = chars
        .next()
        .is_some_and(|c| c.is_ascii_uppercase() || c == '_')
        && chars.all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || matches!(c, '_' | '#' | '$'));

    if folded {
        name.to_string()
    } else {
        quote_ident(name)
    }
}
