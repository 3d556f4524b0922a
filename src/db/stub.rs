//! In-memory executor for tests and offline planning

use std::sync::Mutex;

use async_trait::async_trait;

use super::executor::{CatalogRow, StatementExecutor};

/// Records executed statements and answers catalog reads from canned rows.
///
/// Canned rows are keyed by a fragment of the statement text, usually the catalog
/// view name; the first registered fragment found in a statement wins. Reads that
/// match nothing return no rows.
#[derive(Default)]
pub struct StubExecutor {
    rows: Vec<(String, Vec<CatalogRow>)>,
    fail_exec: Vec<String>,
    fail_query: Vec<String>,
    executed: Mutex<Vec<String>>,
    queries: Mutex<Vec<(String, Vec<String>)>>,
}

impl StubExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rows(mut self, fragment: impl Into<String>, rows: Vec<CatalogRow>) -> Self {
        self.rows.push((fragment.into(), rows));
        self
    }

    /// Fail any executed statement containing `fragment`.
    pub fn failing_exec(mut self, fragment: impl Into<String>) -> Self {
        self.fail_exec.push(fragment.into());
        self
    }

    /// Fail any catalog read containing `fragment`.
    pub fn failing_query(mut self, fragment: impl Into<String>) -> Self {
        self.fail_query.push(fragment.into());
        self
    }

    /// Statements that executed successfully, in order.
    pub fn executed(&self) -> Vec<String> {
        self.executed
            .lock()
            .map(|statements| statements.clone())
            .unwrap_or_default()
    }

    /// Catalog reads issued so far with their bound arguments.
    pub fn queries(&self) -> Vec<(String, Vec<String>)> {
        self.queries
            .lock()
            .map(|queries| queries.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl StatementExecutor for StubExecutor {
    async fn exec(&self, statement: &str) -> Result<(), sqlx::Error> {
        if self.fail_exec.iter().any(|f| statement.contains(f.as_str())) {
            return Err(sqlx::Error::Protocol(format!(
                "injected failure for {}",
                statement
            )));
        }
        if let Ok(mut executed) = self.executed.lock() {
            executed.push(statement.to_string());
        }
        Ok(())
    }

    async fn query(&self, statement: &str, args: &[&str]) -> Result<Vec<CatalogRow>, sqlx::Error> {
        if let Ok(mut queries) = self.queries.lock() {
            queries.push((
                statement.to_string(),
                args.iter().map(|a| a.to_string()).collect(),
            ));
        }
        if self.fail_query.iter().any(|f| statement.contains(f.as_str())) {
            return Err(sqlx::Error::Protocol(format!(
                "injected failure for {}",
                statement
            )));
        }

        Ok(self
            .rows
            .iter()
            .find(|(fragment, _)| statement.contains(fragment.as_str()))
            .map(|(_, rows)| rows.clone())
            .unwrap_or_default())
    }
}
