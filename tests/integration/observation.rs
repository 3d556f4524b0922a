use std::time::Duration;

use async_trait::async_trait;
use grantsync::GrantError;
use grantsync::catalog::observe_user;
use grantsync::db::{CatalogRow, StatementExecutor};

/// Fails reads of granted roles at once and never answers anything else.
struct StalledCatalog;

#[async_trait]
impl StatementExecutor for StalledCatalog {
    async fn exec(&self, _statement: &str) -> Result<(), sqlx::Error> {
        Ok(())
    }

    async fn query(&self, statement: &str, _args: &[&str]) -> Result<Vec<CatalogRow>, sqlx::Error> {
        if statement.contains("SYS.GRANTED_ROLES") {
            return Err(sqlx::Error::Protocol("connection reset".to_string()));
        }
        std::future::pending().await
    }
}

#[tokio::test]
async fn test_first_failed_read_cancels_the_rest() {
    let result = tokio::time::timeout(
        Duration::from_secs(5),
        observe_user(&StalledCatalog, "APP_USER"),
    )
    .await
    .expect("observation should not wait for stalled reads");

    let err = result.unwrap_err();
    assert!(matches!(err, GrantError::Query { ref context, .. } if context.contains("roles granted")));
}
