//! Fetch roles granted to a principal

use super::{GranteeType, catalog_ident, split_qualified};
use crate::db::{CatalogRow, StatementExecutor};
use crate::error::{GrantError, Result};

const GRANTED_ROLES: &str = r#"
    SELECT ROLE_SCHEMA_NAME, ROLE_NAME
    FROM SYS.GRANTED_ROLES
    WHERE GRANTEE = ? AND GRANTEE_TYPE = ?
    ORDER BY ROLE_SCHEMA_NAME, ROLE_NAME
"#;

const GRANTED_ROLES_QUALIFIED: &str = r#"
    SELECT ROLE_SCHEMA_NAME, ROLE_NAME
    FROM SYS.GRANTED_ROLES
    WHERE GRANTEE_SCHEMA_NAME = ? AND GRANTEE = ? AND GRANTEE_TYPE = ?
    ORDER BY ROLE_SCHEMA_NAME, ROLE_NAME
"#;

/// Roles currently granted to `grantee`, schema-local roles as `SCHEMA.ROLE`.
pub async fn query_roles<E: StatementExecutor + ?Sized>(
    executor: &E,
    grantee: &str,
    grantee_type: GranteeType,
) -> Result<Vec<String>> {
    let context = format!("roles granted to {} {}", grantee_type, grantee);
    let kind = grantee_type.as_catalog_str();

    let rows = match split_qualified(grantee) {
        Some((schema, name)) => {
            executor
                .query(GRANTED_ROLES_QUALIFIED, &[schema, name, kind])
                .await
        }
        None => executor.query(GRANTED_ROLES, &[grantee, kind]).await,
    }
    .map_err(|source| GrantError::Query {
        context: context.clone(),
        source,
    })?;

    rows.iter().map(|row| render_role_row(row, &context)).collect()
}

/// Render one `(ROLE_SCHEMA_NAME, ROLE_NAME)` row.
pub fn render_role_row(row: &CatalogRow, context: &str) -> Result<String> {
    let role = catalog_ident(row.require(1, context)?);
    Ok(match row.get(0) {
        Some(schema) => format!("{}.{}", catalog_ident(schema), role),
        None => role,
    })
}
