//! Canned catalog contents for driving the engine through `StubExecutor`

use grantsync::db::{CatalogRow, StubExecutor};

/// One `SYS.GRANTED_PRIVILEGES` row.
pub fn privilege_row(
    object_type: &str,
    privilege: &str,
    schema: Option<&str>,
    object: Option<&str>,
) -> CatalogRow {
    CatalogRow::from_values([Some(object_type), Some(privilege), schema, object])
}

pub fn system_privilege(privilege: &str) -> CatalogRow {
    privilege_row("SYSTEMPRIVILEGE", privilege, None, None)
}

pub fn schema_privilege(privilege: &str, schema: &str) -> CatalogRow {
    privilege_row("SCHEMA", privilege, Some(schema), None)
}

/// A catalog holding one existing user with the given privileges and roles.
pub fn catalog_with_user(name: &str, privileges: Vec<CatalogRow>, roles: &[&str]) -> StubExecutor {
    StubExecutor::new()
        .with_rows(
            "SYS.USERS",
            vec![CatalogRow::from_values([Some(name), Some("DEFAULT")])],
        )
        .with_rows("SYS.GRANTED_PRIVILEGES", privileges)
        .with_rows(
            "SYS.GRANTED_ROLES",
            roles
                .iter()
                .map(|role| CatalogRow::from_values([None, Some(*role)]))
                .collect(),
        )
}

/// A catalog holding one existing role mapped to the given LDAP groups.
pub fn catalog_with_role(name: &str, ldap_groups: &[&str]) -> StubExecutor {
    StubExecutor::new()
        .with_rows(
            "SYS.ROLES",
            vec![CatalogRow::from_values([None, Some(name)])],
        )
        .with_rows(
            "SYS.ROLE_LDAP_GROUPS",
            ldap_groups
                .iter()
                .map(|group| CatalogRow::from_values([Some(*group)]))
                .collect(),
        )
}
