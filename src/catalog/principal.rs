//! Observe a user or role: its catalog row plus everything granted to it
//!
//! The independent reads that make up one observation run concurrently and are
//! joined with `try_join!`. The first failing read is returned and the reads
//! still in flight are dropped, which cancels them.

use std::collections::BTreeMap;

use tracing::debug;

use super::{GranteeType, query_privileges, query_roles, split_qualified};
use crate::db::StatementExecutor;
use crate::error::{GrantError, Result};

/// An observation whose privilege list the management policy filter may narrow.
pub trait PrivilegeObservation: Clone {
    fn privileges(&self) -> &[String];

    /// The same observation with its privileges replaced; every other field is kept.
    fn with_privileges(self, privileges: Vec<String>) -> Self;

    fn roles(&self) -> &[String];

    /// LDAP groups mapped to the principal, for principals that support them.
    fn ldap_groups(&self) -> Option<&[String]> {
        None
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserObservation {
    pub name: String,
    pub usergroup: Option<String>,
    pub parameters: BTreeMap<String, String>,
    pub privileges: Vec<String>,
    pub roles: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleObservation {
    pub name: String,
    pub schema: Option<String>,
    pub ldap_groups: Vec<String>,
    pub privileges: Vec<String>,
    pub roles: Vec<String>,
}

impl PrivilegeObservation for UserObservation {
    fn privileges(&self) -> &[String] {
        &self.privileges
    }

    fn with_privileges(self, privileges: Vec<String>) -> Self {
        Self { privileges, ..self }
    }

    fn roles(&self) -> &[String] {
        &self.roles
    }
}

impl PrivilegeObservation for RoleObservation {
    fn privileges(&self) -> &[String] {
        &self.privileges
    }

    fn with_privileges(self, privileges: Vec<String>) -> Self {
        Self { privileges, ..self }
    }

    fn roles(&self) -> &[String] {
        &self.roles
    }

    fn ldap_groups(&self) -> Option<&[String]> {
        Some(&self.ldap_groups)
    }
}

const USER_ROW: &str = "SELECT USER_NAME, USERGROUP_NAME FROM SYS.USERS WHERE USER_NAME = ?";

const USER_PARAMETERS: &str =
    "SELECT PARAMETER, VALUE FROM SYS.USER_PARAMETERS WHERE USER_NAME = ? ORDER BY PARAMETER";

const ROLE_ROW: &str = "SELECT ROLE_SCHEMA_NAME, ROLE_NAME FROM SYS.ROLES WHERE ROLE_NAME = ?";

const ROLE_ROW_QUALIFIED: &str =
    "SELECT ROLE_SCHEMA_NAME, ROLE_NAME FROM SYS.ROLES WHERE ROLE_SCHEMA_NAME = ? AND ROLE_NAME = ?";

const ROLE_LDAP_GROUPS: &str =
    "SELECT LDAP_GROUP_NAME FROM SYS.ROLE_LDAP_GROUPS WHERE ROLE_NAME = ? ORDER BY LDAP_GROUP_NAME";

const ROLE_LDAP_GROUPS_QUALIFIED: &str = "SELECT LDAP_GROUP_NAME FROM SYS.ROLE_LDAP_GROUPS \
    WHERE ROLE_SCHEMA_NAME = ? AND ROLE_NAME = ? ORDER BY LDAP_GROUP_NAME";

/// Observe a user. Returns `None` when the user does not exist.
pub async fn observe_user<E: StatementExecutor + ?Sized>(
    executor: &E,
    name: &str,
) -> Result<Option<UserObservation>> {
    let (row, parameters, privileges, roles) = tokio::try_join!(
        read_user_row(executor, name),
        read_user_parameters(executor, name),
        query_privileges(executor, name, GranteeType::User),
        query_roles(executor, name, GranteeType::User),
    )?;

    let Some(usergroup) = row else {
        debug!("User {} does not exist", name);
        return Ok(None);
    };

    Ok(Some(UserObservation {
        name: name.to_string(),
        usergroup,
        parameters,
        privileges,
        roles,
    }))
}

/// Observe a role, schema-local when `name` is `SCHEMA.ROLE`. Returns `None` when
/// the role does not exist.
pub async fn observe_role<E: StatementExecutor + ?Sized>(
    executor: &E,
    name: &str,
) -> Result<Option<RoleObservation>> {
    let (row, ldap_groups, privileges, roles) = tokio::try_join!(
        read_role_row(executor, name),
        read_role_ldap_groups(executor, name),
        query_privileges(executor, name, GranteeType::Role),
        query_roles(executor, name, GranteeType::Role),
    )?;

    let Some(schema) = row else {
        debug!("Role {} does not exist", name);
        return Ok(None);
    };

    Ok(Some(RoleObservation {
        name: name.to_string(),
        schema,
        ldap_groups,
        privileges,
        roles,
    }))
}

/// `Some(usergroup)` when the user exists.
async fn read_user_row<E: StatementExecutor + ?Sized>(
    executor: &E,
    name: &str,
) -> Result<Option<Option<String>>> {
    let context = format!("user {}", name);
    let rows = executor
        .query(USER_ROW, &[name])
        .await
        .map_err(|source| GrantError::Query {
            context: context.clone(),
            source,
        })?;

    Ok(rows.first().map(|row| row.get(1).map(str::to_string)))
}

async fn read_user_parameters<E: StatementExecutor + ?Sized>(
    executor: &E,
    name: &str,
) -> Result<BTreeMap<String, String>> {
    let context = format!("parameters of user {}", name);
    let rows = executor
        .query(USER_PARAMETERS, &[name])
        .await
        .map_err(|source| GrantError::Query {
            context: context.clone(),
            source,
        })?;

    rows.iter()
        .map(|row| {
            let parameter = row.require(0, &context)?;
            let value = row.get(1).unwrap_or_default();
            Ok((parameter.to_string(), value.to_string()))
        })
        .collect()
}

/// `Some(schema)` when the role exists.
async fn read_role_row<E: StatementExecutor + ?Sized>(
    executor: &E,
    name: &str,
) -> Result<Option<Option<String>>> {
    let context = format!("role {}", name);
    let rows = match split_qualified(name) {
        Some((schema, role)) => executor.query(ROLE_ROW_QUALIFIED, &[schema, role]).await,
        None => executor.query(ROLE_ROW, &[name]).await,
    }
    .map_err(|source| GrantError::Query {
        context: context.clone(),
        source,
    })?;

    Ok(rows.first().map(|row| row.get(0).map(str::to_string)))
}

async fn read_role_ldap_groups<E: StatementExecutor + ?Sized>(
    executor: &E,
    name: &str,
) -> Result<Vec<String>> {
    let context = format!("LDAP groups of role {}", name);
    let rows = match split_qualified(name) {
        Some((schema, role)) => {
            executor
                .query(ROLE_LDAP_GROUPS_QUALIFIED, &[schema, role])
                .await
        }
        None => executor.query(ROLE_LDAP_GROUPS, &[name]).await,
    }
    .map_err(|source| GrantError::Query {
        context: context.clone(),
        source,
    })?;

    rows.iter()
        .map(|row| row.require(0, &context).map(str::to_string))
        .collect()
}
