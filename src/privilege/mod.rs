//! Typed model of a grant clause such as `SELECT, INSERT ON SCHEMA SALES`

use std::fmt;

use serde::Serialize;

pub mod group;
pub mod parser;

pub use group::{group, group_privileges};
pub use parser::{parse, parse_all};

/// What a privilege is granted on.
///
/// The declaration order doubles as the emission order of grouped statements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PrivilegeType {
    System,
    Source,
    Schema,
    Object,
    UserGroup,
    ColumnKey,
    Structured,
}

impl PrivilegeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PrivilegeType::System => "system",
            PrivilegeType::Source => "source",
            PrivilegeType::Schema => "schema",
            PrivilegeType::Object => "object",
            PrivilegeType::UserGroup => "usergroup",
            PrivilegeType::ColumnKey => "column key",
            PrivilegeType::Structured => "structured",
        }
    }
}

impl fmt::Display for PrivilegeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parsed grant clause.
///
/// `name` holds one or more comma-joined privilege names (`"SELECT, INSERT"`).
/// `identifier` is the grant target and is empty only for system privileges;
/// object identifiers are always schema-qualified.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Privilege {
    pub privilege_type: PrivilegeType,
    pub name: String,
    pub identifier: String,
}

impl Privilege {
    pub fn new(
        privilege_type: PrivilegeType,
        name: impl Into<String>,
        identifier: impl Into<String>,
    ) -> Self {
        Self {
            privilege_type,
            name: name.into(),
            identifier: identifier.into(),
        }
    }

    pub fn system(name: impl Into<String>) -> Self {
        Self::new(PrivilegeType::System, name, "")
    }

    /// Individual privilege names making up `name`.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.name
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }

    /// Whether `other` can be merged into the same GRANT statement as `self`.
    pub fn same_group(&self, other: &Privilege) -> bool {
        self.privilege_type == other.privilege_type && self.identifier == other.identifier
    }
}

impl fmt::Display for Privilege {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::render::grant::render_privilege_clause(self))
    }
}

/// Collapse whitespace inside each comma-separated name and join them with `", "`.
pub(crate) fn normalize_names(raw: &str) -> String {
    raw.split(',')
        .map(|name| name.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|name| !name.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}
