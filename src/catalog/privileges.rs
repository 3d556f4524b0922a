//! Fetch privileges granted to a principal and render them as grant clauses

use tracing::debug;

use super::{GranteeType, catalog_ident, split_qualified};
use crate::db::{CatalogRow, StatementExecutor};
use crate::error::{GrantError, Result};

const GRANTED_PRIVILEGES: &str = r#"
    SELECT OBJECT_TYPE, PRIVILEGE, SCHEMA_NAME, OBJECT_NAME
    FROM SYS.GRANTED_PRIVILEGES
    WHERE GRANTEE = ? AND GRANTEE_TYPE = ?
    ORDER BY OBJECT_TYPE, SCHEMA_NAME, OBJECT_NAME, PRIVILEGE
"#;

const GRANTED_PRIVILEGES_QUALIFIED: &str = r#"
    SELECT OBJECT_TYPE, PRIVILEGE, SCHEMA_NAME, OBJECT_NAME
    FROM SYS.GRANTED_PRIVILEGES
    WHERE GRANTEE_SCHEMA_NAME = ? AND GRANTEE = ? AND GRANTEE_TYPE = ?
    ORDER BY OBJECT_TYPE, SCHEMA_NAME, OBJECT_NAME, PRIVILEGE
"#;

pub const OBJECT_TYPE_SYSTEM: &str = "SYSTEMPRIVILEGE";
pub const OBJECT_TYPE_SCHEMA: &str = "SCHEMA";
pub const OBJECT_TYPE_SOURCE: &str = "SOURCE";
pub const OBJECT_TYPE_USERGROUP: &str = "USERGROUP";
pub const OBJECT_TYPE_COLUMN_KEY: &str = "CLIENTSIDE ENCRYPTION COLUMN KEY";
pub const OBJECT_TYPE_STRUCTURED: &str = "STRUCTUREDPRIVILEGE";

/// Privileges currently granted to `grantee`, one canonical clause per catalog row.
///
/// A grantee written as `SCHEMA.NAME` is looked up as a schema-local principal.
pub async fn query_privileges<E: StatementExecutor + ?Sized>(
    executor: &E,
    grantee: &str,
    grantee_type: GranteeType,
) -> Result<Vec<String>> {
    let context = format!("privileges granted to {} {}", grantee_type, grantee);
    let kind = grantee_type.as_catalog_str();

    let rows = match split_qualified(grantee) {
        Some((schema, name)) => {
            executor
                .query(GRANTED_PRIVILEGES_QUALIFIED, &[schema, name, kind])
                .await
        }
        None => executor.query(GRANTED_PRIVILEGES, &[grantee, kind]).await,
    }
    .map_err(|source| GrantError::Query {
        context: context.clone(),
        source,
    })?;

    let privileges = rows
        .iter()
        .map(|row| render_privilege_row(row, &context))
        .collect::<Result<Vec<_>>>()?;

    debug!("Observed {} privilege(s) for {}", privileges.len(), grantee);
    Ok(privileges)
}

/// Render one `(OBJECT_TYPE, PRIVILEGE, SCHEMA_NAME, OBJECT_NAME)` row as a grant clause.
pub fn render_privilege_row(row: &CatalogRow, context: &str) -> Result<String> {
    let object_type = row.require(0, context)?;
    let privilege = row.require(1, context)?;
    let object = || row.require(3, context).map(catalog_ident);

    let clause = match object_type {
        OBJECT_TYPE_SYSTEM => privilege.to_string(),
        OBJECT_TYPE_SCHEMA => {
            let schema = row.require(2, context)?;
            format!("{} ON SCHEMA {}", privilege, catalog_ident(schema))
        }
        OBJECT_TYPE_SOURCE => format!("{} ON REMOTE SOURCE {}", privilege, object()?),
        OBJECT_TYPE_USERGROUP => format!("{} ON USERGROUP {}", privilege, object()?),
        OBJECT_TYPE_COLUMN_KEY => {
            format!("{} ON CLIENTSIDE ENCRYPTION COLUMN KEY {}", privilege, object()?)
        }
        OBJECT_TYPE_STRUCTURED => format!("STRUCTURED PRIVILEGE {}", object()?),
        _ => match row.get(2) {
            Some(schema) => format!("{} ON {}.{}", privilege, catalog_ident(schema), object()?),
            None => format!("{} ON {}", privilege, object()?),
        },
    };

    Ok(clause)
}
