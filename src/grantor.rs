//! Issue GRANT and REVOKE statements for privileges, roles and LDAP groups
//!
//! Statements run one at a time in the order the grouper emits them. Execution
//! stops at the first failing statement and its error is returned; statements
//! that already ran stay applied, and the next reconciliation pass picks up the
//! remaining difference.

use tracing::debug;

use crate::db::StatementExecutor;
use crate::error::{GrantError, Result};
use crate::privilege::{group, parse_all};
use crate::render::{
    render_add_ldap_groups, render_drop_ldap_groups, render_grant_roles, render_grant_statement,
    render_revoke_roles, render_revoke_statement,
};

pub struct Grantor<'a, E: ?Sized> {
    executor: &'a E,
    default_schema: String,
}

impl<'a, E: StatementExecutor + ?Sized> Grantor<'a, E> {
    pub fn new(executor: &'a E, default_schema: impl Into<String>) -> Self {
        Self {
            executor,
            default_schema: default_schema.into(),
        }
    }

    pub fn default_schema(&self) -> &str {
        &self.default_schema
    }

    pub async fn grant_privileges<S: AsRef<str>>(&self, grantee: &str, privileges: &[S]) -> Result<()> {
        for clause in self.grouped(privileges)? {
            self.execute(render_grant_statement(&clause, grantee)).await?;
        }
        Ok(())
    }

    pub async fn revoke_privileges<S: AsRef<str>>(&self, grantee: &str, privileges: &[S]) -> Result<()> {
        for clause in self.grouped(privileges)? {
            self.execute(render_revoke_statement(&clause, grantee)).await?;
        }
        Ok(())
    }

    /// Grant all `roles` in a single statement. Role names are not parsed.
    pub async fn grant_roles<S: AsRef<str>>(&self, grantee: &str, roles: &[S]) -> Result<()> {
        if roles.is_empty() {
            return Ok(());
        }
        self.execute(render_grant_roles(roles, grantee)).await
    }

    pub async fn revoke_roles<S: AsRef<str>>(&self, grantee: &str, roles: &[S]) -> Result<()> {
        if roles.is_empty() {
            return Ok(());
        }
        self.execute(render_revoke_roles(roles, grantee)).await
    }

    pub async fn add_ldap_groups<S: AsRef<str>>(&self, role: &str, groups: &[S]) -> Result<()> {
        if groups.is_empty() {
            return Ok(());
        }
        self.execute(render_add_ldap_groups(role, groups)).await
    }

    pub async fn remove_ldap_groups<S: AsRef<str>>(&self, role: &str, groups: &[S]) -> Result<()> {
        if groups.is_empty() {
            return Ok(());
        }
        self.execute(render_drop_ldap_groups(role, groups)).await
    }

    /// Parse and group privileges into one clause per target, in emission order.
    pub fn grouped<S: AsRef<str>>(&self, privileges: &[S]) -> Result<Vec<String>> {
        let parsed = parse_all(privileges, &self.default_schema)?;
        Ok(group(&parsed))
    }

    async fn execute(&self, statement: String) -> Result<()> {
        debug!("Executing: {}", statement);
        self.executor
            .exec(&statement)
            .await
            .map_err(|source| GrantError::Execution { statement, source })
    }
}
